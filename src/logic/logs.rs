//! DNS Log Entries
//!
//! Input records and the accepted input shapes. Entries are consumed
//! read-only; missing fields get documented defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// LOG ENTRY
// ============================================================================

fn default_query_type() -> String {
    "A".to_string()
}

fn default_status() -> String {
    "NOERROR".to_string()
}

/// One DNS query record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 timestamp, may be empty
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_query_type")]
    pub query_type: String,
    /// Requesting client identifier
    #[serde(default)]
    pub client_ip: String,
    /// Resolution status ("NOERROR", "blocked", ...)
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub reasons: String,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp: String::new(),
            domain: String::new(),
            query_type: default_query_type(),
            client_ip: String::new(),
            status: default_status(),
            reasons: String::new(),
        }
    }
}

impl LogEntry {
    /// True if the query was blocked by the resolver
    pub fn is_blocked(&self) -> bool {
        self.status.eq_ignore_ascii_case("blocked")
    }
}

// ============================================================================
// INPUT NORMALIZATION
// ============================================================================

#[derive(Debug)]
pub struct LogLoadError(pub String);

impl std::fmt::Display for LogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogLoadError: {}", self.0)
    }
}

impl std::error::Error for LogLoadError {}

/// Accept a bare array or an object wrapping the array under `logs` / `data`
pub fn normalize(value: serde_json::Value) -> Result<Vec<LogEntry>, LogLoadError> {
    let array = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => {
            let inner = map.remove("logs").or_else(|| map.remove("data"));
            match inner {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(LogLoadError(
                        "expected an array or an object with a 'logs'/'data' array".to_string(),
                    ))
                }
            }
        }
        _ => {
            return Err(LogLoadError(
                "expected an array or an object with a 'logs'/'data' array".to_string(),
            ))
        }
    };

    let mut entries = Vec::with_capacity(array.len());
    for item in array {
        match serde_json::from_value::<LogEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::debug!("Skipping malformed log entry: {}", e),
        }
    }

    Ok(entries)
}

/// Load and normalize a JSON log file
pub fn load_from_file(path: &Path) -> Result<Vec<LogEntry>, LogLoadError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| LogLoadError(format!("read {}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| LogLoadError(format!("parse {}: {}", path.display(), e)))?;

    let entries = normalize(value)?;
    log::info!("Loaded {} log entries from {}", entries.len(), path.display());
    Ok(entries)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_defaults() {
        let entry: LogEntry = serde_json::from_str(r#"{"domain": "example.com"}"#).unwrap();
        assert_eq!(entry.domain, "example.com");
        assert_eq!(entry.query_type, "A");
        assert_eq!(entry.status, "NOERROR");
        assert_eq!(entry.timestamp, "");
        assert_eq!(entry.client_ip, "");
    }

    #[test]
    fn test_normalize_bare_array() {
        let v: serde_json::Value =
            serde_json::from_str(r#"[{"domain": "a.com"}, {"domain": "b.com"}]"#).unwrap();
        let entries = normalize(v).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_normalize_wrapped() {
        let v: serde_json::Value =
            serde_json::from_str(r#"{"logs": [{"domain": "a.com"}]}"#).unwrap();
        assert_eq!(normalize(v).unwrap().len(), 1);

        let v: serde_json::Value =
            serde_json::from_str(r#"{"data": [{"domain": "a.com"}]}"#).unwrap();
        assert_eq!(normalize(v).unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_rejects_scalar() {
        let v = serde_json::Value::from(42);
        assert!(normalize(v).is_err());
    }

    #[test]
    fn test_is_blocked() {
        let mut entry = LogEntry::default();
        assert!(!entry.is_blocked());
        entry.status = "blocked".to_string();
        assert!(entry.is_blocked());
        entry.status = "BLOCKED".to_string();
        assert!(entry.is_blocked());
    }
}
