//! Column queries and their `&`/`|` expressions.
//!
//! A [`ColumnQuery`] matches a single column by name, predicate or identity.
//! Queries combine into a [`ColumnQueryExpression`], a flat operator sequence
//! evaluated by precedence climbing against one column at a time.

mod column;
mod comparer;
mod eval;
mod expression;
mod operator;

pub use column::{ColumnPredicate, ColumnQuery, ColumnQueryKind};
pub use comparer::{default_comparer, IgnoreAsciiCase, IgnoreCase, NameComparer, Ordinal};
pub use expression::{ColumnQueryExpression, Terms};
pub use operator::LogicOperator;
