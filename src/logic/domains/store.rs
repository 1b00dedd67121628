//! Domain Category Store
//!
//! Static domain -> category mapping with prefix stripping and a
//! subdomain-suffix walk. Unknown domains fall back to keyword patterns.

use std::collections::HashMap;
use std::path::Path;

use super::keywords::{
    matches_any, ENTERTAINMENT_PATTERNS, SHOPPING_PATTERNS, STRIP_PREFIXES,
    UNETHICAL_PATTERNS, WORK_PATTERNS,
};
use super::types::CategoryLabel;

// ============================================================================
// DEFAULT CATEGORIES
// ============================================================================

/// Seed map used when no category file is supplied or it fails to load
const DEFAULT_CATEGORIES: &[(&str, CategoryLabel)] = &[
    // Entertainment
    ("youtube.com", CategoryLabel::Entertainment),
    ("netflix.com", CategoryLabel::Entertainment),
    ("tiktok.com", CategoryLabel::Entertainment),
    ("twitch.tv", CategoryLabel::Entertainment),
    ("spotify.com", CategoryLabel::Entertainment),
    ("instagram.com", CategoryLabel::Entertainment),
    ("facebook.com", CategoryLabel::Entertainment),
    ("twitter.com", CategoryLabel::Entertainment),
    ("reddit.com", CategoryLabel::Entertainment),
    ("steam.com", CategoryLabel::Entertainment),
    ("discord.com", CategoryLabel::Entertainment),
    ("snapchat.com", CategoryLabel::Entertainment),
    ("pinterest.com", CategoryLabel::Entertainment),
    ("hulu.com", CategoryLabel::Entertainment),
    ("disneyplus.com", CategoryLabel::Entertainment),
    ("primevideo.com", CategoryLabel::Entertainment),
    ("gaming.youtube.com", CategoryLabel::Entertainment),
    ("epicgames.com", CategoryLabel::Entertainment),
    ("battle.net", CategoryLabel::Entertainment),
    ("origin.com", CategoryLabel::Entertainment),
    ("ubisoft.com", CategoryLabel::Entertainment),
    ("rockstargames.com", CategoryLabel::Entertainment),
    ("ea.com", CategoryLabel::Entertainment),
    ("riotgames.com", CategoryLabel::Entertainment),
    // Work
    ("github.com", CategoryLabel::Work),
    ("stackoverflow.com", CategoryLabel::Work),
    ("aws.amazon.com", CategoryLabel::Work),
    ("console.aws.amazon.com", CategoryLabel::Work),
    ("azure.microsoft.com", CategoryLabel::Work),
    ("cloud.google.com", CategoryLabel::Work),
    ("docs.google.com", CategoryLabel::Work),
    ("drive.google.com", CategoryLabel::Work),
    ("gmail.com", CategoryLabel::Work),
    ("outlook.com", CategoryLabel::Work),
    ("slack.com", CategoryLabel::Work),
    ("teams.microsoft.com", CategoryLabel::Work),
    ("zoom.us", CategoryLabel::Work),
    ("atlassian.com", CategoryLabel::Work),
    ("jira.com", CategoryLabel::Work),
    ("confluence.com", CategoryLabel::Work),
    ("docker.com", CategoryLabel::Work),
    ("jenkins.io", CategoryLabel::Work),
    ("kubernetes.io", CategoryLabel::Work),
    ("apache.org", CategoryLabel::Work),
    ("mongodb.com", CategoryLabel::Work),
    ("postgresql.org", CategoryLabel::Work),
    ("mysql.com", CategoryLabel::Work),
    ("npmjs.com", CategoryLabel::Work),
    ("pypi.org", CategoryLabel::Work),
    ("maven.apache.org", CategoryLabel::Work),
    ("bitbucket.org", CategoryLabel::Work),
    ("gitlab.com", CategoryLabel::Work),
    ("codepen.io", CategoryLabel::Work),
    ("replit.com", CategoryLabel::Work),
    ("heroku.com", CategoryLabel::Work),
    ("vercel.com", CategoryLabel::Work),
    ("netlify.com", CategoryLabel::Work),
    ("digitalocean.com", CategoryLabel::Work),
    // Job hunting
    ("indeed.com", CategoryLabel::Unethical),
    ("linkedin.com", CategoryLabel::Unethical),
    ("monster.com", CategoryLabel::Unethical),
    ("glassdoor.com", CategoryLabel::Unethical),
    ("dice.com", CategoryLabel::Unethical),
    ("careerbuilder.com", CategoryLabel::Unethical),
    ("ziprecruiter.com", CategoryLabel::Unethical),
    ("simplyhired.com", CategoryLabel::Unethical),
    ("angel.co", CategoryLabel::Unethical),
    ("upwork.com", CategoryLabel::Unethical),
    ("freelancer.com", CategoryLabel::Unethical),
    ("fiverr.com", CategoryLabel::Unethical),
    ("toptal.com", CategoryLabel::Unethical),
    ("remotework.com", CategoryLabel::Unethical),
    ("weworkremotely.com", CategoryLabel::Unethical),
    ("jobs.com", CategoryLabel::Unethical),
    ("careerjet.com", CategoryLabel::Unethical),
    ("jobstreet.com", CategoryLabel::Unethical),
    ("seek.com", CategoryLabel::Unethical),
    ("workable.com", CategoryLabel::Unethical),
    ("lever.co", CategoryLabel::Unethical),
    ("greenhouse.io", CategoryLabel::Unethical),
    ("bamboohr.com", CategoryLabel::Unethical),
    ("99designs.com", CategoryLabel::Unethical),
    ("peopleperhour.com", CategoryLabel::Unethical),
    // Neutral
    ("google.com", CategoryLabel::Neutral),
    ("bing.com", CategoryLabel::Neutral),
    ("yahoo.com", CategoryLabel::Neutral),
    ("wikipedia.org", CategoryLabel::Neutral),
    ("weather.com", CategoryLabel::Neutral),
    ("cnn.com", CategoryLabel::Neutral),
    ("bbc.com", CategoryLabel::Neutral),
    ("microsoft.com", CategoryLabel::Neutral),
    ("apple.com", CategoryLabel::Neutral),
    ("amazon.com", CategoryLabel::Neutral),
    ("news.google.com", CategoryLabel::Neutral),
    ("reuters.com", CategoryLabel::Neutral),
    ("npr.org", CategoryLabel::Neutral),
    ("techcrunch.com", CategoryLabel::Neutral),
    ("arstechnica.com", CategoryLabel::Neutral),
    ("medium.com", CategoryLabel::Neutral),
    ("dropbox.com", CategoryLabel::Neutral),
    ("onedrive.live.com", CategoryLabel::Neutral),
    ("icloud.com", CategoryLabel::Neutral),
    ("duckduckgo.com", CategoryLabel::Neutral),
];

// ============================================================================
// STORE
// ============================================================================

/// Domain -> category lookup table
#[derive(Debug, Clone)]
pub struct DomainCategoryStore {
    categories: HashMap<String, CategoryLabel>,
}

impl DomainCategoryStore {
    /// Build the store from the embedded default map
    pub fn with_defaults() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(d, c)| (d.to_string(), *c))
            .collect();
        Self { categories }
    }

    /// Build the store from explicit entries
    pub fn from_entries(entries: HashMap<String, CategoryLabel>) -> Self {
        Self { categories: entries }
    }

    /// Load a flat JSON map (domain -> label string) from disk.
    /// Falls back to the embedded defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => {
                log::info!("Loaded {} domain categories from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                log::warn!(
                    "Could not load domain categories from {}: {} - using defaults",
                    path.display(),
                    e
                );
                Self::with_defaults()
            }
        }
    }

    /// Load a flat JSON map from disk
    pub fn load(path: &Path) -> Result<Self, CategoryStoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CategoryStoreError(format!("read {}: {}", path.display(), e)))?;
        let map: HashMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| CategoryStoreError(format!("parse {}: {}", path.display(), e)))?;

        let mut categories = HashMap::with_capacity(map.len());
        for (domain, label) in map {
            match CategoryLabel::parse(&label) {
                Some(cat) => {
                    categories.insert(domain.to_ascii_lowercase(), cat);
                }
                None => {
                    log::debug!("Skipping '{}': unknown category '{}'", domain, label);
                }
            }
        }

        if categories.is_empty() {
            return Err(CategoryStoreError("no valid entries".to_string()));
        }

        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Add or replace a single mapping
    pub fn insert(&mut self, domain: &str, category: CategoryLabel) {
        self.categories.insert(domain.to_ascii_lowercase(), category);
    }

    /// Strip the first matching known prefix
    pub fn strip_prefix(domain: &str) -> &str {
        for prefix in STRIP_PREFIXES {
            if let Some(rest) = domain.strip_prefix(prefix) {
                return rest;
            }
        }
        domain
    }

    /// Categorize a domain. Never fails; unknown or empty domains are Neutral.
    pub fn lookup(&self, domain: &str) -> CategoryLabel {
        let domain = domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
            return CategoryLabel::Neutral;
        }

        let stripped = Self::strip_prefix(&domain);

        // Exact match, stripped form first
        if let Some(&cat) = self.categories.get(stripped) {
            return cat;
        }
        if let Some(&cat) = self.categories.get(domain.as_str()) {
            return cat;
        }

        // Subdomain walk: drop leading labels until a suffix matches
        let mut rest = stripped;
        while let Some(dot) = rest.find('.') {
            rest = &rest[dot + 1..];
            if let Some(&cat) = self.categories.get(rest) {
                return cat;
            }
        }

        // Keyword fallback
        if matches_any(&domain, ENTERTAINMENT_PATTERNS) {
            CategoryLabel::Entertainment
        } else if matches_any(&domain, WORK_PATTERNS) {
            CategoryLabel::Work
        } else if matches_any(&domain, SHOPPING_PATTERNS) {
            CategoryLabel::Shopping
        } else if matches_any(&domain, UNETHICAL_PATTERNS) {
            CategoryLabel::Unethical
        } else {
            CategoryLabel::Neutral
        }
    }
}

impl Default for DomainCategoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// ERROR
// ============================================================================

#[derive(Debug)]
pub struct CategoryStoreError(pub String);

impl std::fmt::Display for CategoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CategoryStoreError: {}", self.0)
    }
}

impl std::error::Error for CategoryStoreError {}

// ============================================================================
// TESTS
// ============================================================================
