//! Exact-duplicate grouping by normalized title

use std::collections::{BTreeSet, HashMap};

use crate::normalization::TitleNormalizer;
use crate::record::Titled;

/// Result of exact grouping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactGrouping {
    /// Normalized title of every record, by position. `None` means the record
    /// has no matching key.
    pub normalized_titles: Vec<Option<String>>,
    /// Positions of records whose normalized title occurs more than once
    pub duplicate_ids: BTreeSet<usize>,
}

impl ExactGrouping {
    pub fn is_duplicate(&self, id: usize) -> bool {
        self.duplicate_ids.contains(&id)
    }

    /// Records not flagged as exact duplicates, in original order
    pub fn residual_ids(&self) -> Vec<usize> {
        (0..self.normalized_titles.len())
            .filter(|id| !self.duplicate_ids.contains(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.normalized_titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_titles.is_empty()
    }
}

/// Normalize every title once and flag titles that occur at least twice
pub fn group_exact<T: Titled>(records: &[T], normalizer: &TitleNormalizer) -> ExactGrouping {
    let normalized_titles: Vec<Option<String>> = records
        .iter()
        .map(|record| normalizer.normalize(record.title()))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for title in normalized_titles.iter().flatten() {
        *counts.entry(title.as_str()).or_insert(0) += 1;
    }

    let duplicate_ids: BTreeSet<usize> = normalized_titles
        .iter()
        .enumerate()
        .filter_map(|(id, title)| {
            let title = title.as_deref()?;
            (counts.get(title).copied().unwrap_or(0) > 1).then_some(id)
        })
        .collect();

    tracing::debug!(
        records = normalized_titles.len(),
        distinct_titles = counts.len(),
        exact_duplicates = duplicate_ids.len(),
        "Exact grouping complete"
    );

    ExactGrouping {
        normalized_titles,
        duplicate_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::MissingTitlePolicy;

    #[test]
    fn test_group_exact_flags_shared_titles() {
        let titles = ["Deep Learning", "deep   learning!!", "Shallow Learning"];
        let grouping = group_exact(&titles, &TitleNormalizer::default());

        assert!(grouping.is_duplicate(0));
        assert!(grouping.is_duplicate(1));
        assert!(!grouping.is_duplicate(2));
        assert_eq!(grouping.residual_ids(), vec![2]);
        assert_eq!(
            grouping.normalized_titles[1].as_deref(),
            Some("deep learning")
        );
    }

    #[test]
    fn test_group_exact_empty_input() {
        let titles: Vec<String> = Vec::new();
        let grouping = group_exact(&titles, &TitleNormalizer::default());
        assert!(grouping.is_empty());
        assert!(grouping.duplicate_ids.is_empty());
        assert!(grouping.residual_ids().is_empty());
    }

    #[test]
    fn test_missing_titles_collide_under_placeholder() {
        let titles: Vec<Option<&str>> = vec![None, Some("A Title"), None, Some("NaN")];
        let grouping = group_exact(&titles, &TitleNormalizer::default());
        assert_eq!(grouping.duplicate_ids, BTreeSet::from([0, 2, 3]));
    }

    #[test]
    fn test_missing_titles_never_match_under_empty_policy() {
        let titles: Vec<Option<&str>> = vec![None, Some("A Title"), None];
        let normalizer = TitleNormalizer::new(MissingTitlePolicy::Empty, false);
        let grouping = group_exact(&titles, &normalizer);
        assert!(grouping.duplicate_ids.is_empty());
        assert_eq!(grouping.normalized_titles[0], None);
        assert_eq!(grouping.residual_ids(), vec![0, 1, 2]);
    }
}
