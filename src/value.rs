//! Operand values and the coercions utility functions apply to them.

use crate::error::{GoalError, GoalResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// A snapshot of external state variables for one evaluation step.
pub type Values = HashMap<String, Value>;

/// A dynamically typed operand value.
///
/// Literal operands and entries of a [`Values`] mapping share this type.
/// Comparison operators coerce across the numeric-like variants
/// (`Number` and `Bool`); text compares only with text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// A real number.
    Number(f64),
    /// A boolean flag.
    Bool(bool),
    /// A string.
    Text(String),
    /// A collection, used as the container side of membership tests.
    List(Vec<Value>),
}

impl Value {
    /// Truthiness: non-zero numbers, `true`, non-empty text and lists.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Numeric coercion: numbers as-is, booleans as 1/0, text parsed as a
    /// float. Lists never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::List(_) => None,
        }
    }

    /// Like [`as_number`](Self::as_number) but fails with
    /// [`GoalError::InvalidArgument`] naming the operand role.
    pub fn to_number(&self, role: &str) -> GoalResult<f64> {
        self.as_number()
            .ok_or_else(|| GoalError::InvalidArgument(format!("invalid numeric {role}: \"{self}\"")))
    }

    fn numeric_pair(&self, other: &Value) -> Option<(f64, f64)> {
        match (self, other) {
            (Value::Number(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_)) => {
                Some((self.as_number()?, other.as_number()?))
            }
            _ => None,
        }
    }

    /// Equality with numeric coercion between numbers and booleans.
    ///
    /// Text never equals a number, even when it parses as one.
    pub fn loose_eq(&self, other: &Value) -> bool {
        if let Some((a, b)) = self.numeric_pair(other) {
            return a == b;
        }
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => false,
        }
    }

    /// Ordering for the relational operators.
    ///
    /// Numeric-like pairs compare numerically, text pairs
    /// lexicographically. Anything else (or a NaN) is an
    /// [`GoalError::InvalidArgument`].
    pub fn compare(&self, other: &Value) -> GoalResult<Ordering> {
        if let Some((a, b)) = self.numeric_pair(other) {
            return a.partial_cmp(&b).ok_or_else(|| {
                GoalError::InvalidArgument(format!("cannot order {self} and {other}"))
            });
        }
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            _ => Err(GoalError::InvalidArgument(format!(
                "cannot order {self} and {other}"
            ))),
        }
    }

    /// Membership of `self` in `container`: element of a list, or
    /// substring of a text.
    pub fn is_member_of(&self, container: &Value) -> GoalResult<bool> {
        match (self, container) {
            (_, Value::List(items)) => Ok(items.iter().any(|item| item.loose_eq(self))),
            (Value::Text(needle), Value::Text(hay)) => Ok(hay.contains(needle.as_str())),
            _ => Err(GoalError::InvalidArgument(format!(
                "{container} is not a collection containing {self}"
            ))),
        }
    }

    /// Removes one layer of matching quotes from text values.
    pub(crate) fn unquoted(self) -> Value {
        match self {
            Value::Text(s) => match strip_quotes(&s) {
                Some(inner) => Value::Text(inner.to_string()),
                None => Value::Text(s),
            },
            other => other,
        }
    }
}

/// Returns the inside of `s` when it is wrapped in matching single or
/// double quotes.
pub(crate) fn strip_quotes(s: &str) -> Option<&str> {
    if s.len() < 2 {
        return None;
    }
    let quoted = (s.starts_with('"') && s.ends_with('"'))
        || (s.starts_with('\'') && s.ends_with('\''));
    quoted.then(|| &s[1..s.len() - 1])
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Number(x as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
