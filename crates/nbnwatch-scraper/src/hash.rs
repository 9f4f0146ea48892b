//! Content hashing for change detection.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a fetched page body.
///
/// Compared against a provider's stored hash to decide whether the page
/// changed since the last successful check; equal hashes skip parsing
/// entirely.
#[must_use]
pub fn content_hash(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let html = "<html><body>NBN 50 $69.99</body></html>";
        assert_eq!(content_hash(html), content_hash(html));
        assert_eq!(content_hash(html).len(), 64, "SHA-256 hex is 64 chars");
    }

    #[test]
    fn any_byte_difference_changes_the_hash() {
        let a = "<html><body>NBN 50 $69.99</body></html>";
        let b = "<html><body>NBN 50 $69.98</body></html>";
        assert_ne!(content_hash(a), content_hash(b));
    }

    #[test]
    fn empty_input_hashes() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
