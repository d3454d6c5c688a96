//! Error types for goal model construction and evaluation.
//!
//! Every failure is raised at the point of detection and propagated to the
//! caller unchanged. A failing child aborts the evaluation of its whole
//! ancestor chain for that call; there are no partial results.

use thiserror::Error;

/// Errors raised while building or evaluating a goal model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    /// The value mapping lacks free parameters referenced by the tree.
    ///
    /// Names are sorted and de-duplicated.
    #[error("Missing utility parameters: {}", .0.join(" "))]
    MissingParameters(Vec<String>),

    /// A connective has a child count it cannot evaluate.
    #[error("Malformed {kind} expression: {children} children")]
    MalformedExpression {
        /// Connective name (e.g. `conditional`).
        kind: &'static str,
        /// Number of children actually present.
        children: usize,
    },

    /// A utility function names an operator outside the operator table.
    #[error("Invalid operation type \"{0}\"")]
    UnknownOperator(String),

    /// A utility function has the wrong number of operands for its operator.
    #[error("Invalid number of arguments for {operator}: expected {expected}, got {got}")]
    ArityMismatch {
        /// Operator name.
        operator: &'static str,
        /// Operator arity.
        expected: usize,
        /// Operand count supplied.
        got: usize,
    },

    /// An operand could not be coerced to the type an operator needs.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GoalError {
    /// Whether the error stems from how the tree or config was put together,
    /// as opposed to the values supplied for one evaluation step.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedExpression { .. }
                | Self::UnknownOperator(_)
                | Self::ArityMismatch { .. }
                | Self::InvalidConfig(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type GoalResult<T> = Result<T, GoalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let err = GoalError::MissingParameters(vec!["power_level".into(), "speed".into()]);
        assert_eq!(err.to_string(), "Missing utility parameters: power_level speed");
    }

    #[test]
    fn test_arity_message() {
        let err = GoalError::ArityMismatch {
            operator: "greater",
            expected: 2,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid number of arguments for greater: expected 2, got 3"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(GoalError::UnknownOperator("between".into()).is_configuration_error());
        assert!(GoalError::MalformedExpression {
            kind: "conditional",
            children: 0
        }
        .is_configuration_error());
        assert!(!GoalError::MissingParameters(vec![]).is_configuration_error());
        assert!(!GoalError::InvalidArgument("x".into()).is_configuration_error());
    }
}
