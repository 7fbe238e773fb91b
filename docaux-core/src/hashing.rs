//! Hashing - XXH32 for Glyph Names, SHA-256 for Provenance
//!
//! The hash2unicode table is keyed by the 32-bit XXH32 of each glyph name
//! with seed 0. Generated check programs link against libxxhash and must
//! agree with `name_hash` bit for bit.

use sha2::{Digest, Sha256};
use twox_hash::XxHash32;

/// Seed the table generator uses for every name.
pub const NAME_HASH_SEED: u32 = 0;

/// XXH32 of `data` with the given seed
pub fn xxh32(data: &[u8], seed: u32) -> u32 {
    XxHash32::oneshot(seed, data)
}

/// Hash of a glyph name as stored in the hash2unicode table
pub fn name_hash(name: &str) -> u32 {
    xxh32(name.as_bytes(), NAME_HASH_SEED)
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh32_reference_vectors() {
        assert_eq!(xxh32(b"", 0), 0x02cc5d05);
        assert_eq!(xxh32(b"abc", 0), 0x32d153ff);
    }

    #[test]
    fn test_name_hash_glyph_names() {
        assert_eq!(name_hash("alpha"), 0x540493c8);
        assert_eq!(name_hash("beta"), 0x9c5df589);
        assert_eq!(name_hash("Aacute"), 0xdb36c0cb);
    }

    #[test]
    fn test_name_hash_long_input() {
        // 16+ bytes takes the striped path
        assert_eq!(name_hash("abcdefghijklmnopqrstuvwxyz"), 0x63a14d5f);
    }

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
