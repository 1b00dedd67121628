//! Domain Categorization
//!
//! - `types` - category labels and subcategories
//! - `keywords` - pattern lists and prefixes
//! - `store` - static domain -> category lookup
//! - `context` - tracking attribution with a sliding context window

pub mod context;
pub mod keywords;
pub mod store;
pub mod types;

pub use context::{BatchBreakdown, DomainContextResolver, SubcategoryCounts};
pub use store::{CategoryStoreError, DomainCategoryStore};
pub use types::{CategoryLabel, Subcategory, ALL_LABELS};
