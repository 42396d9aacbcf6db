//! Name-equality strategies used by by-name column queries.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;

static ORDINAL: Lazy<Arc<dyn NameComparer>> = Lazy::new(|| Arc::new(Ordinal));

/// Strategy deciding whether a column name matches the requested name.
pub trait NameComparer: Send + Sync + fmt::Debug {
    /// Returns true when `actual` is considered equal to `expected`.
    fn equals(&self, expected: &str, actual: &str) -> bool;

    /// Short label used when rendering queries.
    fn label(&self) -> &'static str {
        "custom"
    }
}

/// Byte-wise, case-sensitive equality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ordinal;

impl NameComparer for Ordinal {
    fn equals(&self, expected: &str, actual: &str) -> bool {
        expected == actual
    }

    fn label(&self) -> &'static str {
        "ordinal"
    }
}

/// Equality ignoring ASCII case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IgnoreAsciiCase;

impl NameComparer for IgnoreAsciiCase {
    fn equals(&self, expected: &str, actual: &str) -> bool {
        expected.eq_ignore_ascii_case(actual)
    }

    fn label(&self) -> &'static str {
        "ignore-ascii-case"
    }
}

/// Equality under Unicode lower-case folding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IgnoreCase;

impl NameComparer for IgnoreCase {
    fn equals(&self, expected: &str, actual: &str) -> bool {
        expected
            .chars()
            .flat_map(char::to_lowercase)
            .eq(actual.chars().flat_map(char::to_lowercase))
    }

    fn label(&self) -> &'static str {
        "ignore-case"
    }
}

/// Returns the shared ordinal comparer.
#[must_use]
pub fn default_comparer() -> Arc<dyn NameComparer> {
    Arc::clone(&ORDINAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_is_case_sensitive() {
        assert!(Ordinal.equals("price", "price"));
        assert!(!Ordinal.equals("price", "Price"));
        assert!(default_comparer().equals("id", "id"));
        assert_eq!(default_comparer().label(), "ordinal");
    }

    #[test]
    fn case_insensitive_comparers() {
        assert!(IgnoreAsciiCase.equals("PRICE", "price"));
        assert!(!IgnoreAsciiCase.equals("STRASSE", "straße"));
        assert!(IgnoreCase.equals("ÄPFEL", "äpfel"));
        assert!(!IgnoreCase.equals("apple", "apples"));
    }
}
