//! Comparison and fuzzy-classification operators of utility functions.

use crate::error::{GoalError, GoalResult};
use crate::fuzzy::{left_shoulder, right_shoulder, triangle};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The operator a utility function applies to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operator {
    Equal,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    NotEqual,
    /// Truthy operand.
    Existence,
    /// Falsy operand.
    Nonexistence,
    /// First operand is an element of the second.
    Membership,
    Nonmembership,
    /// Left shoulder over `(value, target, deviation)`.
    FuzzyLeft,
    /// Right shoulder over `(value, target, deviation)`.
    FuzzyRight,
    /// Triangle over `(value, target, deviation)`.
    FuzzyTriangle,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Operator; 13] = [
        Operator::Equal,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::NotEqual,
        Operator::Existence,
        Operator::Nonexistence,
        Operator::Membership,
        Operator::Nonmembership,
        Operator::FuzzyLeft,
        Operator::FuzzyRight,
        Operator::FuzzyTriangle,
    ];

    /// Name used in the `type` attribute of a function element.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::Greater => "greater",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::Less => "less",
            Operator::LessOrEqual => "less_or_equal",
            Operator::NotEqual => "not_equal",
            Operator::Existence => "existence",
            Operator::Nonexistence => "nonexistence",
            Operator::Membership => "membership",
            Operator::Nonmembership => "nonmembership",
            Operator::FuzzyLeft => "fuzzy_left",
            Operator::FuzzyRight => "fuzzy_right",
            Operator::FuzzyTriangle => "fuzzy_triangle",
        }
    }

    /// Number of operands the operator takes.
    pub fn arity(&self) -> usize {
        match self {
            Operator::Existence | Operator::Nonexistence => 1,
            Operator::FuzzyLeft | Operator::FuzzyRight | Operator::FuzzyTriangle => 3,
            _ => 2,
        }
    }

    /// Whether the result is always exactly 0.0 or 1.0.
    pub fn is_crisp(&self) -> bool {
        !matches!(
            self,
            Operator::FuzzyLeft | Operator::FuzzyRight | Operator::FuzzyTriangle
        )
    }

    /// Applies the operator to already-resolved operands.
    pub fn apply(&self, args: &[Value]) -> GoalResult<f64> {
        let truth = |b: bool| if b { 1.0 } else { 0.0 };
        match (self, args) {
            (Operator::Equal, [x, y]) => Ok(truth(x.loose_eq(y))),
            (Operator::NotEqual, [x, y]) => Ok(truth(!x.loose_eq(y))),
            (Operator::Greater, [x, y]) => Ok(truth(x.compare(y)? == Ordering::Greater)),
            (Operator::GreaterOrEqual, [x, y]) => Ok(truth(x.compare(y)? != Ordering::Less)),
            (Operator::Less, [x, y]) => Ok(truth(x.compare(y)? == Ordering::Less)),
            (Operator::LessOrEqual, [x, y]) => Ok(truth(x.compare(y)? != Ordering::Greater)),
            (Operator::Existence, [x]) => Ok(truth(x.is_truthy())),
            (Operator::Nonexistence, [x]) => Ok(truth(!x.is_truthy())),
            (Operator::Membership, [x, y]) => Ok(truth(x.is_member_of(y)?)),
            (Operator::Nonmembership, [x, y]) => Ok(truth(!x.is_member_of(y)?)),
            (Operator::FuzzyLeft, [x, t, d]) => left_shoulder(
                x.to_number("value")?,
                t.to_number("target")?,
                d.to_number("deviation")?,
            ),
            (Operator::FuzzyRight, [x, t, d]) => right_shoulder(
                x.to_number("value")?,
                t.to_number("target")?,
                d.to_number("deviation")?,
            ),
            (Operator::FuzzyTriangle, [x, t, d]) => triangle(
                x.to_number("value")?,
                t.to_number("target")?,
                d.to_number("deviation")?,
            ),
            (op, args) => Err(GoalError::ArityMismatch {
                operator: op.name(),
                expected: op.arity(),
                got: args.len(),
            }),
        }
    }
}

impl FromStr for Operator {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| GoalError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
