//! Content hashing for banner comments and cache keys.
//!
//! Spec §8 (lock file banner) and §9 (fuzzy schedule scatter) both need a
//! stable, deterministic hash of arbitrary byte content. SHA-256 truncated
//! to 16 hex characters is used consistently across the compiler so the
//! same helper backs `frontmatter-hash`, `Creator Prompt Hash`, and the
//! schedule scatter seed.

use sha2::{Digest, Sha256};

/// Hash `content` and return the first 16 hex characters of the digest.
pub fn content_hash16(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    let full = hex_encode(&digest);
    full[..16].to_string()
}

/// Hash `content` and return the full digest as an unsigned 64-bit integer,
/// for use as a deterministic seed (e.g. fuzzy schedule scatter).
pub fn content_hash_u64(content: &[u8]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash16_is_deterministic_and_16_chars() {
        let a = content_hash16(b"hello world");
        let b = content_hash16(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn different_content_hashes_differ() {
        assert_ne!(content_hash16(b"a"), content_hash16(b"b"));
    }

    #[test]
    fn content_hash_u64_is_deterministic() {
        let a = content_hash_u64(b".github/workflows/nightly.md");
        let b = content_hash_u64(b".github/workflows/nightly.md");
        assert_eq!(a, b);
    }
}
