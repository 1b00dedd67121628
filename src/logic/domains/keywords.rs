//! Categorization Keywords & Prefixes
//!
//! Substring pattern lists for domains not present in the category store.
//! No logic here - constants only.

// ============================================================================
// SUBDOMAIN PREFIXES
// ============================================================================

/// Known subdomain prefixes stripped before lookup, in order.
/// Only the first matching prefix is removed.
pub const STRIP_PREFIXES: &[&str] = &[
    "www.", "api.", "cdn.", "m.", "mobile.", "app.", "static.", "assets.",
];

// ============================================================================
// CATEGORY PATTERNS
// ============================================================================

pub const ENTERTAINMENT_PATTERNS: &[&str] = &[
    "facebook", "instagram", "youtube", "whatsapp", "tiktok", "snapchat", "twitter",
    "netflix", "hulu", "disney", "prime", "spotify", "soundcloud", "twitch",
    "gaming", "game", "steam", "xbox", "playstation", "nintendo",
    "entertainment", "media", "video", "music", "streaming",
];

pub const WORK_PATTERNS: &[&str] = &[
    "github", "stackoverflow", "aws", "cloud", "docker", "microsoft", "office",
    "slack", "zoom", "teams", "confluence", "jira", "gitlab", "bitbucket",
    "developer", "dev", "api", "tech", "programming", "code",
];

pub const SHOPPING_PATTERNS: &[&str] = &[
    "amazon", "ebay", "shop", "store", "cart", "buy", "purchase", "retail",
    "commerce", "market", "mall", "shopping",
];

/// Job hunting / recruitment indicators
pub const UNETHICAL_PATTERNS: &[&str] = &[
    "linkedin", "indeed", "naukri", "job", "career", "resume", "recruitment",
];

// ============================================================================
// TRACKING / AD NETWORKS
// ============================================================================

pub const TRACKING_PATTERNS: &[&str] = &[
    "tracking", "analytics", "ads", "doubleclick", "googletagmanager",
    "google-analytics", "googleads", "adsystem", "googlesyndication",
    "adsense", "adnxs", "amazon-adsystem", "connect.facebook.net",
    "scorecardresearch", "quantserve", "outbrain", "taboola",
];

// ============================================================================
// INFRASTRUCTURE NOISE
// ============================================================================

/// SDK/infra chatter excluded from category percentages. These lookups are
/// issued by libraries, not by the user; they still count for the domain
/// frequency table and blocked-query stats.
pub const INFRA_NOISE_PATTERNS: &[&str] = &[
    "crashlytics", "app-measurement", "firebaseinstallations", "firebaselogging",
    "sentry.io", "bugsnag", "akamai", "cloudfront", "fastly", "edgekey",
    "telemetry", "safebrowsing",
];

// ============================================================================
// SUB-SIGNAL PATTERNS
// ============================================================================

pub const SOCIAL_MEDIA_PATTERNS: &[&str] = &[
    "facebook", "instagram", "twitter", "x.com", "tiktok", "snapchat", "linkedin",
];

pub const STREAMING_PATTERNS: &[&str] = &[
    "youtube", "netflix", "primevideo", "hotstar", "disney", "hulu", "spotify",
];

pub const DEV_TOOLS_PATTERNS: &[&str] = &[
    "github", "stackoverflow", "gitlab", "docker", "npm", "maven", "gradle",
];

pub const CLOUD_SERVICE_PATTERNS: &[&str] = &[
    "aws", "azure", "gcp", "cloud.google", "herokuapp", "netlify", "vercel",
];

/// True if `domain` (already lowercased) contains any of the patterns
pub fn matches_any(domain: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| domain.contains(p))
}
