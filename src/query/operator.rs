//! Logical operators joining column queries.

use std::fmt;

/// Binary logical operator joining two column queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LogicOperator {
    /// Placeholder for the first query of an expression, which has no left neighbour.
    #[default]
    None,
    /// Conjunction (`&`).
    And,
    /// Disjunction (`|`).
    Or,
}

impl LogicOperator {
    /// Binding strength; higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            LogicOperator::And => 2,
            LogicOperator::Or => 1,
            LogicOperator::None => 0,
        }
    }

    /// Returns true when chains of this operator fold right-to-left.
    #[must_use]
    pub fn is_right_associative(self) -> bool {
        false
    }

    /// Applies the operator to both operands. Both operands are always computed.
    #[must_use]
    pub fn evaluate(self, lhs: bool, rhs: bool) -> bool {
        match self {
            LogicOperator::And => lhs & rhs,
            LogicOperator::Or => lhs | rhs,
            LogicOperator::None => rhs,
        }
    }

    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicOperator::And => "&",
            LogicOperator::Or => "|",
            LogicOperator::None => "",
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
