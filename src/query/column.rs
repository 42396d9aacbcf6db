//! Single matching rule against a column descriptor.

use std::{fmt, sync::Arc};

use arrow::datatypes::{Field, FieldRef};

use super::comparer::{default_comparer, NameComparer};
use crate::table::{OriginGuard, OriginGuarded};

/// Caller-supplied column predicate.
pub type ColumnPredicate = Arc<dyn Fn(&Field) -> bool + Send + Sync>;

/// Matching strategy of a [`ColumnQuery`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnQueryKind {
    /// Empty query, matches nothing.
    None,
    /// Column name compared with a [`NameComparer`].
    Name,
    /// Arbitrary predicate over the column field.
    Predicate,
    /// Identity of a specific column.
    Object,
}

#[derive(Clone, Default)]
enum Matcher {
    #[default]
    None,
    Name {
        name: Arc<str>,
        comparer: Arc<dyn NameComparer>,
    },
    Predicate(ColumnPredicate),
    Object(FieldRef),
}

/// Immutable rule selecting columns by name, predicate or identity.
///
/// The default value is the empty query: it matches no column and marks the
/// absence of a query when combined into expressions.
#[derive(Clone, Default)]
pub struct ColumnQuery {
    guard: OriginGuard,
    matcher: Matcher,
}

impl ColumnQuery {
    /// Matches columns whose name equals `name` byte for byte.
    #[must_use]
    pub fn by_name(guard: OriginGuard, name: impl Into<Arc<str>>) -> Self {
        Self::by_name_with(guard, name, default_comparer())
    }

    /// Matches columns whose name equals `name` under `comparer`.
    #[must_use]
    pub fn by_name_with(
        guard: OriginGuard,
        name: impl Into<Arc<str>>,
        comparer: Arc<dyn NameComparer>,
    ) -> Self {
        Self {
            guard,
            matcher: Matcher::Name {
                name: name.into(),
                comparer,
            },
        }
    }

    /// Matches columns accepted by `predicate`.
    #[must_use]
    pub fn by_predicate<F>(guard: OriginGuard, predicate: F) -> Self
    where
        F: Fn(&Field) -> bool + Send + Sync + 'static,
    {
        Self {
            guard,
            matcher: Matcher::Predicate(Arc::new(predicate)),
        }
    }

    /// Matches exactly `column`, by identity.
    #[must_use]
    pub fn by_column(guard: OriginGuard, column: &FieldRef) -> Self {
        Self {
            guard,
            matcher: Matcher::Object(Arc::clone(column)),
        }
    }

    /// Returns the matching strategy.
    #[must_use]
    pub fn kind(&self) -> ColumnQueryKind {
        match self.matcher {
            Matcher::None => ColumnQueryKind::None,
            Matcher::Name { .. } => ColumnQueryKind::Name,
            Matcher::Predicate(_) => ColumnQueryKind::Predicate,
            Matcher::Object(_) => ColumnQueryKind::Object,
        }
    }

    /// Returns true for the empty query.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self.matcher, Matcher::None)
    }

    /// Evaluates the query against `column`.
    #[must_use]
    pub fn matches(&self, column: &FieldRef) -> bool {
        match &self.matcher {
            Matcher::None => false,
            Matcher::Name { name, comparer } => comparer.equals(name, column.name()),
            Matcher::Predicate(predicate) => predicate(column.as_ref()),
            Matcher::Object(expected) => Arc::ptr_eq(expected, column),
        }
    }
}

impl OriginGuarded for ColumnQuery {
    fn guard(&self) -> &OriginGuard {
        &self.guard
    }
}

impl fmt::Display for ColumnQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            Matcher::None => f.write_str("<none>"),
            Matcher::Name { name, comparer } => match comparer.label() {
                "ordinal" => write!(f, "name({name:?})"),
                label => write!(f, "name({name:?}, {label})"),
            },
            Matcher::Predicate(_) => f.write_str("predicate"),
            Matcher::Object(column) => write!(f, "column({:?})", column.name()),
        }
    }
}

impl fmt::Debug for ColumnQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnQuery")
            .field("query", &format_args!("{self}"))
            .field("guard", &self.guard)
            .finish()
    }
}
