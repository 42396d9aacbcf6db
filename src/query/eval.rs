//! Precedence-climbing evaluation of flat query sequences.
//!
//! An expression is stored as `q0 (op1, q1) (op2, q2) ...`. The walk below
//! folds it into a single verdict without building a tree: `&` binds tighter
//! than `|` and both associate to the left. Every query is evaluated exactly
//! once, in sequence order, and operators never short-circuit.

use arrow::datatypes::FieldRef;

use super::{column::ColumnQuery, operator::LogicOperator};
use crate::buffer::AppendBuffer;

pub(crate) type Entry = (LogicOperator, ColumnQuery);

pub(crate) fn evaluate(
    first: &ColumnQuery,
    tail: &AppendBuffer<Entry>,
    column: &FieldRef,
) -> bool {
    let lhs = first.matches(column);
    let mut climber = Climber {
        tail,
        column,
        next: 0,
        lookahead: None,
    };
    climber.climb(lhs, LogicOperator::None.precedence())
}

struct Climber<'a> {
    tail: &'a AppendBuffer<Entry>,
    column: &'a FieldRef,
    next: usize,
    lookahead: Option<Entry>,
}

impl Climber<'_> {
    fn climb(&mut self, mut lhs: bool, min_precedence: u8) -> bool {
        while let Some(op) = self.peek_operator() {
            if op.precedence() < min_precedence {
                break;
            }
            let mut rhs = self.next_operand();
            while let Some(next) = self.peek_operator() {
                let tighter = next.precedence() > op.precedence();
                let right_assoc =
                    next.is_right_associative() && next.precedence() == op.precedence();
                if !tighter && !right_assoc {
                    break;
                }
                let threshold = op.precedence() + u8::from(tighter);
                rhs = self.climb(rhs, threshold);
            }
            lhs = op.evaluate(lhs, rhs);
        }
        lhs
    }

    fn peek_operator(&mut self) -> Option<LogicOperator> {
        if self.lookahead.is_none() {
            self.lookahead = self.tail.get(self.next);
        }
        self.lookahead.as_ref().map(|(op, _)| *op)
    }

    fn next_operand(&mut self) -> bool {
        let entry = self.lookahead.take().or_else(|| self.tail.get(self.next));
        self.next += 1;
        entry.map_or(false, |(_, query)| query.matches(self.column))
    }
}
