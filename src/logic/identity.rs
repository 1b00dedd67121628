//! User Anonymization
//!
//! Stable keyed hash of the client identifier. The same identifier always
//! maps to the same short id so downstream correlation across analysis runs
//! keeps working; raw identifiers never leave this module.

use sha2::{Digest, Sha256};

use crate::logic::logs::LogEntry;

/// Hex chars kept from the digest
const USER_ID_LEN: usize = 8;

/// Identifier used when a batch has no client information
const UNKNOWN_IDENTIFIER: &str = "unknown";

/// Anonymize the batch's client identifier (the first entry's `client_ip`)
pub fn anonymize_user(key: &str, logs: &[LogEntry]) -> String {
    let identifier = logs
        .first()
        .map(|l| l.client_ip.as_str())
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_IDENTIFIER);

    hash_identifier(key, identifier)
}

/// Keyed SHA-256, truncated to a short hex digest
pub fn hash_identifier(key: &str, identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(b"|");
    hasher.update(identifier.as_bytes());
    let digest = hasher.finalize();

    hex::encode(digest)[..USER_ID_LEN].to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_ip(ip: &str) -> LogEntry {
        LogEntry {
            client_ip: ip.to_string(),
            ..LogEntry::default()
        }
    }

    #[test]
    fn test_stable_for_same_identifier() {
        let a = anonymize_user("key", &[entry_with_ip("192.168.1.10")]);
        let b = anonymize_user("key", &[entry_with_ip("192.168.1.10")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), USER_ID_LEN);
    }

    #[test]
    fn test_different_identifiers_differ() {
        let a = anonymize_user("key", &[entry_with_ip("192.168.1.10")]);
        let b = anonymize_user("key", &[entry_with_ip("192.168.1.11")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_changes_hash() {
        let a = hash_identifier("key-a", "192.168.1.10");
        let b = hash_identifier("key-b", "192.168.1.10");
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_batch_uses_unknown() {
        let a = anonymize_user("key", &[]);
        let b = anonymize_user("key", &[entry_with_ip("")]);
        assert_eq!(a, b);
        assert_eq!(a, hash_identifier("key", UNKNOWN_IDENTIFIER));
    }

    #[test]
    fn test_only_hex_chars() {
        let id = anonymize_user("key", &[entry_with_ip("10.0.0.1")]);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
