use md5::{Digest, Md5};

/// Compute the canonical fingerprint of an entry.
///
/// The entry is trimmed, lowercased, and MD5-hashed; the digest is rendered
/// as 32 lowercase hex characters. Deterministic for any input, including
/// the empty string.
pub fn fingerprint(entry: &str) -> String {
    let normalized = entry.trim().to_lowercase();
    hex::encode(Md5::digest(normalized.as_bytes()))
}

/// Whether an entry is already in fingerprint form: exactly 32 ASCII hex
/// digits, case-insensitive.
///
/// This is a heuristic. A raw entry that happens to be 32 hex characters is
/// indistinguishable from a real fingerprint and will be passed through
/// unhashed by the suppression set builder.
#[inline]
pub fn is_fingerprint(entry: &str) -> bool {
    entry.len() == 32 && entry.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_digest() {
        assert_eq!(fingerprint("a@b.com"), "357a20e8c56e69d6f9734d23ef9517e8");
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("someone@example.com"), fingerprint("someone@example.com"));
    }

    #[test]
    fn test_fingerprint_normalizes_case_and_whitespace() {
        assert_eq!(fingerprint(" S@X.com "), fingerprint("s@x.com"));
        assert_eq!(fingerprint("\tA@B.COM\n"), fingerprint("a@b.com"));
    }

    #[test]
    fn test_fingerprint_empty_string() {
        assert_eq!(fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(fingerprint("   "), fingerprint(""));
    }

    #[test]
    fn test_fingerprint_shape() {
        let digest = fingerprint("anything at all");
        assert_eq!(digest.len(), 32);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_is_fingerprint_accepts_hashes() {
        assert!(is_fingerprint("357a20e8c56e69d6f9734d23ef9517e8"));
        assert!(is_fingerprint("357A20E8C56E69D6F9734D23EF9517E8"));
    }

    #[test]
    fn test_is_fingerprint_rejects_non_hashes() {
        assert!(!is_fingerprint("a@b.com"));
        assert!(!is_fingerprint(""));
        // 31 and 33 hex digits
        assert!(!is_fingerprint("357a20e8c56e69d6f9734d23ef9517e"));
        assert!(!is_fingerprint("357a20e8c56e69d6f9734d23ef9517e8a"));
        // right length, non-hex character
        assert!(!is_fingerprint("357a20e8c56e69d6f9734d23ef9517g8"));
        // multibyte characters never qualify
        assert!(!is_fingerprint("é57a20e8c56e69d6f9734d23ef9517e"));
    }
}
