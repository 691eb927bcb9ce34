//! Deterministic key hashing for memo tables and cache keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit key hash computed using XXH3.
///
/// Two structurally equal inputs always produce the same `KeyHash`, which is
/// what makes the feature-reducer memo table and the build-cache key space
/// stable across processes. The hash is not cryptographic; it is only used
/// to address cache slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHash([u8; 16]);

impl KeyHash {
    /// Computes a key hash directly from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental builder for a [`KeyHash`] over structured inputs.
///
/// Every string is framed with its length before being fed to the digest,
/// so `["ab", "c"]` and `["a", "bc"]` hash differently. Field order matters:
/// callers must write fields in a fixed order to get deterministic keys.
#[derive(Default)]
pub struct KeyHasher {
    buf: Vec<u8>,
}

impl KeyHasher {
    /// Creates an empty hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a length-framed string field.
    pub fn write_str(&mut self, s: &str) {
        self.buf
            .extend_from_slice(&(s.len() as u64).to_le_bytes());
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Writes every string in a slice, preserving order, preceded by the
    /// slice length so adjacent sequences cannot collide.
    pub fn write_seq(&mut self, items: &[String]) {
        self.buf
            .extend_from_slice(&(items.len() as u64).to_le_bytes());
        for item in items {
            self.write_str(item);
        }
    }

    /// Writes a boolean flag as a single byte.
    pub fn write_flag(&mut self, flag: bool) {
        self.buf.push(u8::from(flag));
    }

    /// Consumes the hasher and returns the final key hash.
    pub fn finish(self) -> KeyHash {
        KeyHash::from_bytes(&self.buf)
    }
}
