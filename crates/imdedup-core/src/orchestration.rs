//! Duplicate detection orchestration
//!
//! Normalizes every title, flags exact duplicates, then runs the fuzzy scan
//! over the remaining records and merges both results into one
//! classification per record, in input order.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, DeduplicationConfig};
use crate::fuzzy::{FuzzyMatcher, ScanStats};
use crate::grouping::group_exact;
use crate::normalization::TitleNormalizer;
use crate::record::{Classification, Titled};

/// Duplicate counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeduplicationSummary {
    pub total_records: usize,
    pub high_confidence_duplicates: usize,
    pub potential_duplicates: usize,
}

/// Per-record classifications for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeduplicationReport {
    /// Indexed by the record's position in the input
    pub classifications: Vec<Classification>,
    pub scan_stats: ScanStats,
}

impl DeduplicationReport {
    pub fn len(&self) -> usize {
        self.classifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifications.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Classification> {
        self.classifications.get(id)
    }

    /// `(record id, classification)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Classification)> {
        self.classifications.iter().enumerate()
    }

    pub fn summary(&self) -> DeduplicationSummary {
        DeduplicationSummary {
            total_records: self.classifications.len(),
            high_confidence_duplicates: self
                .classifications
                .iter()
                .filter(|c| c.high_confidence_duplicate)
                .count(),
            potential_duplicates: self
                .classifications
                .iter()
                .filter(|c| c.potential_duplicate)
                .count(),
        }
    }
}

/// Validated duplicate detector
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DeduplicationConfig,
    normalizer: TitleNormalizer,
    matcher: FuzzyMatcher,
}

impl Deduplicator {
    /// Validate the configuration up front; no record is processed with an
    /// invalid one.
    pub fn new(config: DeduplicationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer: config.normalizer(),
            matcher: FuzzyMatcher::new(config.similarity_threshold, config.length_ratio_cutoff),
            config,
        })
    }

    pub fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Classify every record
    pub fn classify<T: Titled>(&self, records: &[T]) -> DeduplicationReport {
        let grouping = group_exact(records, &self.normalizer);
        let mut classifications = vec![Classification::default(); records.len()];
        for &id in &grouping.duplicate_ids {
            classifications[id].high_confidence_duplicate = true;
        }

        // Records without a matching key stay out of the scan
        let (residual_ids, residual_titles): (Vec<usize>, Vec<&str>) = grouping
            .residual_ids()
            .into_iter()
            .filter_map(|id| {
                grouping.normalized_titles[id]
                    .as_deref()
                    .map(|title| (id, title))
            })
            .unzip();

        let scan = self.matcher.scan(&residual_titles);
        for (&id, &flagged) in residual_ids.iter().zip(&scan.flags) {
            classifications[id].potential_duplicate = flagged;
        }

        let report = DeduplicationReport {
            classifications,
            scan_stats: scan.stats,
        };

        let summary = report.summary();
        tracing::info!(
            records = summary.total_records,
            high_confidence = summary.high_confidence_duplicates,
            potential = summary.potential_duplicates,
            "Deduplication complete"
        );

        report
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            config: DeduplicationConfig::default(),
            normalizer: TitleNormalizer::default(),
            matcher: FuzzyMatcher::default(),
        }
    }
}

/// Classify records with the default configuration
pub fn classify_titles<T: Titled>(records: &[T]) -> DeduplicationReport {
    Deduplicator::default().classify(records)
}
