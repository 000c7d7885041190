//! Content digests using blake3.
//!
//! Every cache key and every id sent to viewers is derived here, so the
//! same bytes always produce the same digest within a process and across
//! restarts.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash::{ContentHash, KeyHasher, stable_id};
//!
//! let key = KeyHasher::new().part(content).part(cwd_bytes).finish();
//! let id = stable_id(html); // -> u64 below 2^53
//! ```

use std::path::Path;

/// Ids handed to viewers stay below 2^53 so they survive a round trip
/// through a JavaScript number.
const JS_SAFE_MASK: u64 = (1 << 53) - 1;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a single byte slice.
    #[inline]
    pub fn of<T: AsRef<[u8]> + ?Sized>(data: &T) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Convert to hex string (for debugging/display).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Fold the digest into an integer id that a browser can hold exactly.
    pub fn to_id(self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(head) & JS_SAFE_MASK
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Incremental digest over several key parts.
///
/// Each part is length-prefixed, so `("ab", "c")` and `("a", "bc")` never
/// collide.
pub struct KeyHasher(blake3::Hasher);

impl KeyHasher {
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }

    /// Append one key part.
    pub fn part<T: AsRef<[u8]> + ?Sized>(mut self, data: &T) -> Self {
        let data = data.as_ref();
        self.0.update(&(data.len() as u64).to_le_bytes());
        self.0.update(data);
        self
    }

    /// Append a path as a key part.
    pub fn path(self, path: &Path) -> Self {
        self.part(path.as_os_str().as_encoded_bytes())
    }

    pub fn finish(self) -> ContentHash {
        ContentHash::new(*self.0.finalize().as_bytes())
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable integer id for a piece of rendered output.
#[inline]
pub fn stable_id<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    ContentHash::of(data).to_id()
}
