//! Flat `&`/`|` sequences of column queries.

use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

use arrow::datatypes::FieldRef;

use super::{
    column::ColumnQuery,
    eval::{self, Entry},
    operator::LogicOperator,
};
use crate::{
    buffer::AppendBuffer,
    error::QueryError,
    table::{OriginGuard, OriginGuarded},
};

/// Column queries joined by logical operators, evaluated with `&` binding
/// tighter than `|`.
///
/// Combining expressions splices the right-hand sequence onto the left-hand
/// one: `(a | b) & c` is stored and evaluated as `a | b & c`. Grouping comes
/// from operator precedence only.
///
/// Expressions are immutable. Combining never changes the operands, and the
/// operands share their backing storage with the result whenever possible.
#[derive(Clone, Default)]
pub struct ColumnQueryExpression {
    first: ColumnQuery,
    tail: AppendBuffer<Entry>,
}

impl ColumnQueryExpression {
    /// Wraps a single query.
    #[must_use]
    pub fn new(query: ColumnQuery) -> Self {
        Self {
            first: query,
            tail: AppendBuffer::empty(),
        }
    }

    /// Returns true when the expression holds no query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_default()
    }

    /// Number of queries in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            1 + self.tail.len()
        }
    }

    /// Iterates the `(operator, query)` sequence; the first operator is [`LogicOperator::None`].
    pub fn terms(&self) -> Terms<'_> {
        Terms {
            expression: self,
            index: 0,
        }
    }

    /// Evaluates the expression against `column`. Empty expressions match nothing.
    #[must_use]
    pub fn matches(&self, column: &FieldRef) -> bool {
        if self.is_empty() {
            return false;
        }
        eval::evaluate(&self.first, &self.tail, column)
    }

    /// Returns `self & rhs`, failing when the operands come from different tables.
    pub fn try_and(&self, rhs: &ColumnQueryExpression) -> Result<Self, QueryError> {
        self.concat(LogicOperator::And, rhs)
    }

    /// Returns `self | rhs`, failing when the operands come from different tables.
    pub fn try_or(&self, rhs: &ColumnQueryExpression) -> Result<Self, QueryError> {
        self.concat(LogicOperator::Or, rhs)
    }

    fn concat(&self, op: LogicOperator, rhs: &ColumnQueryExpression) -> Result<Self, QueryError> {
        if self.is_empty() {
            return Ok(rhs.clone());
        }
        if rhs.is_empty() {
            return Ok(self.clone());
        }
        self.guard().assert_same_source(rhs.guard())?;

        // Copy out first: `rhs` may read from the store the append extends.
        let rhs_tail = rhs.tail.to_vec();
        let tail = self
            .tail
            .try_add((op, rhs.first.clone()))?
            .try_add_range(&rhs_tail)?;
        Ok(Self {
            first: self.first.clone(),
            tail,
        })
    }
}

impl From<ColumnQuery> for ColumnQueryExpression {
    fn from(query: ColumnQuery) -> Self {
        Self::new(query)
    }
}

impl OriginGuarded for ColumnQueryExpression {
    fn guard(&self) -> &OriginGuard {
        self.first.guard()
    }
}

impl fmt::Display for ColumnQueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<empty>");
        }
        for (op, query) in self.terms() {
            match op {
                LogicOperator::None => write!(f, "{query}")?,
                op => write!(f, " {op} {query}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ColumnQueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnQueryExpression")
            .field("expression", &format_args!("{self}"))
            .field("guard", self.guard())
            .finish()
    }
}

/// Iterator over the `(operator, query)` pairs of an expression.
pub struct Terms<'a> {
    expression: &'a ColumnQueryExpression,
    index: usize,
}

impl Iterator for Terms<'_> {
    type Item = (LogicOperator, ColumnQuery);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.expression.len() {
            return None;
        }
        let item = match self.index {
            0 => Some((LogicOperator::None, self.expression.first.clone())),
            index => self.expression.tail.get(index - 1),
        };
        self.index += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.expression.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Terms<'_> {}

macro_rules! impl_logic_ops {
    ($($lhs:ty, $rhs:ty);* $(;)?) => {$(
        impl BitAnd<$rhs> for $lhs {
            type Output = ColumnQueryExpression;

            /// # Panics
            ///
            /// Panics when the operands were built from different tables.
            fn bitand(self, rhs: $rhs) -> ColumnQueryExpression {
                combine(self, rhs, ColumnQueryExpression::try_and)
            }
        }

        impl BitOr<$rhs> for $lhs {
            type Output = ColumnQueryExpression;

            /// # Panics
            ///
            /// Panics when the operands were built from different tables.
            fn bitor(self, rhs: $rhs) -> ColumnQueryExpression {
                combine(self, rhs, ColumnQueryExpression::try_or)
            }
        }
    )*};
}

impl_logic_ops! {
    ColumnQueryExpression, ColumnQueryExpression;
    &ColumnQueryExpression, &ColumnQueryExpression;
    ColumnQueryExpression, ColumnQuery;
    ColumnQuery, ColumnQueryExpression;
    ColumnQuery, ColumnQuery;
}

trait IntoExpression {
    fn into_expression(self) -> ColumnQueryExpression;
}

impl IntoExpression for ColumnQueryExpression {
    fn into_expression(self) -> ColumnQueryExpression {
        self
    }
}

impl IntoExpression for &ColumnQueryExpression {
    fn into_expression(self) -> ColumnQueryExpression {
        self.clone()
    }
}

impl IntoExpression for ColumnQuery {
    fn into_expression(self) -> ColumnQueryExpression {
        ColumnQueryExpression::new(self)
    }
}

fn combine<L, R, F>(lhs: L, rhs: R, op: F) -> ColumnQueryExpression
where
    L: IntoExpression,
    R: IntoExpression,
    F: FnOnce(
        &ColumnQueryExpression,
        &ColumnQueryExpression,
    ) -> Result<ColumnQueryExpression, QueryError>,
{
    match op(&lhs.into_expression(), &rhs.into_expression()) {
        Ok(expression) => expression,
        Err(err) => panic!("{err}"),
    }
}
