//! imdedup-core - Duplicate detection for titled records
//!
//! Two tiers of confidence:
//!
//! - **High-confidence duplicates**: records whose normalized titles are
//!   identical (case, punctuation and whitespace ignored)
//! - **Potential duplicates**: remaining records whose normalized titles are
//!   similar enough by the Ratcliff/Obershelp ratio
//!
//! # Example
//!
//! ```
//! use imdedup_core::{DeduplicationConfig, Deduplicator};
//!
//! let titles = ["A Tale of Two Cities", "a tale of two cities!", "Bleak House"];
//! let report = Deduplicator::new(DeduplicationConfig::default())
//!     .unwrap()
//!     .classify(&titles);
//!
//! assert!(report.classifications[0].high_confidence_duplicate);
//! assert!(!report.classifications[2].high_confidence_duplicate);
//! ```
//!
//! Reading and writing tabular files lives in the `imdedup-io` crate.

pub mod config;
pub mod fuzzy;
pub mod grouping;
pub mod normalization;
pub mod orchestration;
pub mod record;
pub mod similarity;

pub use config::{ConfigError, DeduplicationConfig};
pub use fuzzy::{FuzzyMatcher, FuzzyScan, PairOutcome, ScanStats};
pub use grouping::{group_exact, ExactGrouping};
pub use normalization::{
    normalize_title, MissingTitlePolicy, TitleNormalizer, MISSING_TITLE_PLACEHOLDER,
};
pub use orchestration::{
    classify_titles, DeduplicationReport, DeduplicationSummary, Deduplicator,
};
pub use record::{Classification, Titled};
pub use similarity::{similarity_ratio, MatchBlock, SequenceMatcher};
