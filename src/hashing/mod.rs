//! BLAKE3 fingerprints used to seed the deterministic stub collaborators and to tag
//! uploads in logs.

use blake3::Hasher;

/// First 8 bytes of the BLAKE3 hash, little-endian.
///
/// Not collision resistant enough for content addressing; only used for seeding and
/// log correlation.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Domain-separated variant of [`hash_to_u64`]: equal `data` under different `domain`s
/// hashes differently.
#[inline]
pub fn hash_with_domain(domain: &str, data: &[u8]) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(domain.as_bytes());
    hasher.update(b"|");
    hasher.update(data);

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Short hex fingerprint of an upload for log fields.
#[inline]
pub fn content_fingerprint(data: &[u8]) -> String {
    blake3::hash(data).to_hex()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"shiba-inu.jpg";
        assert_eq!(hash_to_u64(data), hash_to_u64(data));
    }

    #[test]
    fn test_hash_to_u64_uniqueness() {
        let inputs = [
            b"image-001".as_slice(),
            b"image-002".as_slice(),
            b"IMAGE-001".as_slice(),
            b"image-001 ".as_slice(),
        ];

        let hashes: HashSet<_> = inputs.iter().map(|i| hash_to_u64(i)).collect();
        assert_eq!(hashes.len(), inputs.len());
    }

    #[test]
    fn test_domain_separation() {
        let image = hash_with_domain("image", b"same bytes");
        let text = hash_with_domain("text", b"same bytes");
        assert_ne!(image, text);
        assert_eq!(image, hash_with_domain("image", b"same bytes"));
    }

    #[test]
    fn test_fingerprint_is_short_hex() {
        let fp = content_fingerprint(b"\x89PNG");
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
