//! Record access and per-record classification

use serde::{Deserialize, Serialize};

/// Anything that exposes a (possibly missing) title.
///
/// A record's identity is its position in the slice handed to the core;
/// the core only ever borrows records.
pub trait Titled {
    fn title(&self) -> Option<&str>;
}

impl Titled for str {
    fn title(&self) -> Option<&str> {
        Some(self)
    }
}

impl Titled for String {
    fn title(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Titled for Option<String> {
    fn title(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl Titled for Option<&str> {
    fn title(&self) -> Option<&str> {
        *self
    }
}

impl<T: Titled + ?Sized> Titled for &T {
    fn title(&self) -> Option<&str> {
        (**self).title()
    }
}

/// Duplicate classification of a single record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Shares its normalized title with at least one other record
    pub high_confidence_duplicate: bool,
    /// Not an exact duplicate, but similar enough to another residual record
    pub potential_duplicate: bool,
}

impl Classification {
    pub fn is_duplicate(&self) -> bool {
        self.high_confidence_duplicate || self.potential_duplicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_title<T: Titled>(records: &[T]) -> Option<&str> {
        records.first().and_then(|r| r.title())
    }

    #[test]
    fn test_titled_impls() {
        assert_eq!(first_title(&["Dune"]), Some("Dune"));
        assert_eq!(first_title(&["Dune".to_string()]), Some("Dune"));
        assert_eq!(first_title(&[Some("Dune".to_string())]), Some("Dune"));
        assert_eq!(first_title::<Option<&str>>(&[None]), None);
    }

    #[test]
    fn test_classification_default() {
        let c = Classification::default();
        assert!(!c.high_confidence_duplicate);
        assert!(!c.potential_duplicate);
        assert!(!c.is_duplicate());
    }
}
