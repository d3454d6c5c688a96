//! Goal tree nodes.
//!
//! A goal tree is built from four fuzzy connectives over utility-function
//! leaves:
//!
//! - [`Conjunction`] / [`Disjunction`]: n-ary minimum / maximum, with
//!   optional short-circuiting.
//! - [`Conditional`]: "if pre then post", vacuously satisfied when the
//!   antecedent stays below the threshold.
//! - [`Biconditional`]: fuzzy equivalence of two children.
//! - [`UtilityFunction`]: a comparison or membership-shape [`Operator`]
//!   applied to literal and parameter [`Operand`]s.
//!
//! Every kind implements [`GoalNode`]: evaluation against a snapshot of
//! values (recording a per-step [`History`](crate::history::History)),
//! satisfaction over a window of that history, and violation reporting.
//! [`Node`] is the closed sum of the kinds.

mod conditional;
mod junction;
mod objective;
mod operator;
mod tree;
mod types;
mod utility;

pub use conditional::{Biconditional, Conditional};
pub use junction::{Conjunction, Disjunction};
pub use objective::{satisfaction, Objective};
pub use operator::Operator;
pub use tree::Node;
pub(crate) use types::clamp_threshold;
pub use types::{EvalOptions, GoalNode, SatisfactionQuery, DEFAULT_THRESHOLD};
pub use utility::{Operand, UtilityFunction};
