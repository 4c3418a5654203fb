//! Pruned pairwise similarity scan over the residual records
//!
//! Every unordered pair is visited once. A pair is skipped without computing
//! the similarity ratio when the relative length difference of the two titles
//! exceeds the configured cutoff, or when the multiset upper bound on the
//! ratio already falls below the threshold. The scan is quadratic in the
//! number of titles.
//!
//! # Parallel Processing
//!
//! When the `parallel` feature is enabled, the outer loop of the scan runs on
//! the rayon thread pool. Flags only ever go from `false` to `true`, so the
//! result is identical to the sequential scan.

use std::ops::AddAssign;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_LENGTH_RATIO_CUTOFF, DEFAULT_SIMILARITY_THRESHOLD};
use crate::similarity::SequenceMatcher;

/// Pair counters collected during a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub pairs_considered: u64,
    /// Skipped by the length-ratio filter
    pub pairs_length_pruned: u64,
    /// Skipped because the ratio upper bound is below the threshold
    pub pairs_bound_pruned: u64,
    /// Full similarity ratio computed
    pub pairs_compared: u64,
    pub pairs_flagged: u64,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.pairs_considered += other.pairs_considered;
        self.pairs_length_pruned += other.pairs_length_pruned;
        self.pairs_bound_pruned += other.pairs_bound_pruned;
        self.pairs_compared += other.pairs_compared;
        self.pairs_flagged += other.pairs_flagged;
    }
}

/// Outcome of comparing one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    LengthPruned,
    BoundPruned,
    Compared { ratio: f64, similar: bool },
}

/// Result of a fuzzy scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzyScan {
    /// One flag per scanned title, in input order
    pub flags: Vec<bool>,
    pub stats: ScanStats,
}

impl FuzzyScan {
    pub fn flagged_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

/// Pairwise fuzzy matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    similarity_threshold: f64,
    length_ratio_cutoff: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_LENGTH_RATIO_CUTOFF)
    }
}

impl FuzzyMatcher {
    /// Thresholds are expected to be validated by
    /// [`DeduplicationConfig::validate`](crate::DeduplicationConfig::validate).
    pub fn new(similarity_threshold: f64, length_ratio_cutoff: f64) -> Self {
        Self {
            similarity_threshold,
            length_ratio_cutoff,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    pub fn length_ratio_cutoff(&self) -> f64 {
        self.length_ratio_cutoff
    }

    /// Whether the length filter skips a pair with these character lengths
    pub fn length_filter_skips(&self, len1: usize, len2: usize) -> bool {
        let longest = len1.max(len2);
        if longest == 0 {
            return false;
        }
        let diff = len1.abs_diff(len2);
        diff as f64 / longest as f64 > self.length_ratio_cutoff
    }

    /// Compare two titles given as character sequences
    pub fn compare_chars(&self, a: &[char], b: &[char]) -> PairOutcome {
        if self.length_filter_skips(a.len(), b.len()) {
            return PairOutcome::LengthPruned;
        }

        let matcher = SequenceMatcher::from_chars(a, b);
        if matcher.quick_ratio() < self.similarity_threshold {
            return PairOutcome::BoundPruned;
        }

        let ratio = matcher.ratio();
        PairOutcome::Compared {
            ratio,
            similar: ratio >= self.similarity_threshold,
        }
    }

    /// Whether two titles count as a fuzzy pair
    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        matches!(
            self.compare_chars(&a, &b),
            PairOutcome::Compared { similar: true, .. }
        )
    }

    /// Flag every title that forms at least one similar pair with another title
    pub fn scan<S: AsRef<str> + Sync>(&self, titles: &[S]) -> FuzzyScan {
        #[cfg(feature = "parallel")]
        let scan = self.scan_parallel(titles);

        #[cfg(not(feature = "parallel"))]
        let scan = self.scan_sequential(titles);

        tracing::debug!(
            titles = titles.len(),
            considered = scan.stats.pairs_considered,
            length_pruned = scan.stats.pairs_length_pruned,
            bound_pruned = scan.stats.pairs_bound_pruned,
            compared = scan.stats.pairs_compared,
            flagged_pairs = scan.stats.pairs_flagged,
            "Fuzzy scan complete"
        );

        scan
    }

    /// Single-threaded scan
    pub fn scan_sequential<S: AsRef<str>>(&self, titles: &[S]) -> FuzzyScan {
        let chars = to_char_vecs(titles);
        let mut flags = vec![false; chars.len()];
        let mut stats = ScanStats::default();

        for i in 0..chars.len() {
            for j in (i + 1)..chars.len() {
                if self.visit_pair(&chars[i], &chars[j], &mut stats) {
                    flags[i] = true;
                    flags[j] = true;
                }
            }
        }

        FuzzyScan { flags, stats }
    }

    /// Scan with the outer loop spread over the rayon pool
    #[cfg(feature = "parallel")]
    pub fn scan_parallel<S: AsRef<str> + Sync>(&self, titles: &[S]) -> FuzzyScan {
        let chars = to_char_vecs(titles);
        let flags: Vec<AtomicBool> = (0..chars.len()).map(|_| AtomicBool::new(false)).collect();

        let stats = (0..chars.len())
            .into_par_iter()
            .map(|i| {
                let mut stats = ScanStats::default();
                for j in (i + 1)..chars.len() {
                    if self.visit_pair(&chars[i], &chars[j], &mut stats) {
                        flags[i].store(true, Ordering::Relaxed);
                        flags[j].store(true, Ordering::Relaxed);
                    }
                }
                stats
            })
            .reduce(ScanStats::default, |mut total, part| {
                total += part;
                total
            });

        FuzzyScan {
            flags: flags.into_iter().map(AtomicBool::into_inner).collect(),
            stats,
        }
    }

    fn visit_pair(&self, a: &[char], b: &[char], stats: &mut ScanStats) -> bool {
        stats.pairs_considered += 1;
        match self.compare_chars(a, b) {
            PairOutcome::LengthPruned => {
                stats.pairs_length_pruned += 1;
                false
            }
            PairOutcome::BoundPruned => {
                stats.pairs_bound_pruned += 1;
                false
            }
            PairOutcome::Compared { similar, .. } => {
                stats.pairs_compared += 1;
                if similar {
                    stats.pairs_flagged += 1;
                }
                similar
            }
        }
    }
}

fn to_char_vecs<S: AsRef<str>>(titles: &[S]) -> Vec<Vec<char>> {
    titles.iter().map(|t| t.as_ref().chars().collect()).collect()
}
