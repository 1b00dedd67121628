//! Category Types
//!
//! Core types for domain categorization. No logic here - data structures only.

use serde::{Deserialize, Serialize};

// ============================================================================
// BEHAVIOR CATEGORY
// ============================================================================

/// Behavioral category for a domain or a whole activity window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    /// Streaming, gaming, social media
    Entertainment,
    /// Development tools, office suites, cloud consoles
    Work,
    /// Job hunting / recruitment activity
    Unethical,
    /// E-commerce and retail
    Shopping,
    /// Search, news, infrastructure - default bucket
    Neutral,
}

/// All labels in encoder order
pub const ALL_LABELS: [CategoryLabel; 5] = [
    CategoryLabel::Entertainment,
    CategoryLabel::Work,
    CategoryLabel::Unethical,
    CategoryLabel::Shopping,
    CategoryLabel::Neutral,
];

impl CategoryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Entertainment => "entertainment",
            CategoryLabel::Work => "work",
            CategoryLabel::Unethical => "unethical",
            CategoryLabel::Shopping => "shopping",
            CategoryLabel::Neutral => "neutral",
        }
    }

    /// Parse a label string (category files, training data)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entertainment" => Some(CategoryLabel::Entertainment),
            "work" => Some(CategoryLabel::Work),
            "unethical" => Some(CategoryLabel::Unethical),
            "shopping" => Some(CategoryLabel::Shopping),
            "neutral" => Some(CategoryLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SUBCATEGORY
// ============================================================================

/// Whether a domain was content itself or an ad/analytics asset attributed
/// to a content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subcategory {
    Pure,
    Tracking,
}

impl Subcategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcategory::Pure => "pure",
            Subcategory::Tracking => "tracking",
        }
    }
}

impl std::fmt::Display for Subcategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for label in ALL_LABELS {
            assert_eq!(CategoryLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(CategoryLabel::parse("ENTERTAINMENT"), Some(CategoryLabel::Entertainment));
        assert_eq!(CategoryLabel::parse("bogus"), None);
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&CategoryLabel::Work).unwrap();
        assert_eq!(json, "\"work\"");
        let back: CategoryLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CategoryLabel::Work);
    }
}
