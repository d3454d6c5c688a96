//! Fuzzy evaluation of KAOS goal models.
//!
//! A goal model is a forest of logical connectives over leaf utility
//! functions. Given a snapshot of external state variables, every node
//! yields a fuzzy satisfaction degree in [0, 1]; repeated evaluation steps
//! build a per-node history from which longer-term satisfaction and the
//! set of violated goals are derived.
//!
//! - **Fuzzy primitives** ([`fuzzy`]): min/max/complement connectives and
//!   left-shoulder, right-shoulder and triangular membership shapes.
//! - **Nodes** ([`node`]): conjunction, disjunction, conditional and
//!   biconditional connectives, and utility-function leaves with
//!   achieve/avoid/maintain objectives.
//! - **Goal model** ([`model`]): the root aggregator that checks
//!   parameters, advances the step counter, and answers satisfaction and
//!   violation queries across the forest.
//! - **Construction** ([`build`]): builds the typed tree from neutral
//!   structured-document elements.
//!
//! # Architecture
//!
//! Evaluation is a synchronous recursive walk with no I/O. Each node owns
//! its history and is mutated only by its own `evaluate`; callers that
//! share a model across threads must serialize access to it.

pub mod build;
pub mod error;
pub mod fuzzy;
pub mod history;
pub mod model;
pub mod node;
pub mod value;

pub use error::{GoalError, GoalResult};
