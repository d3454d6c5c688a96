//! Goal model evaluation.
//!
//! A [`GoalModel`] owns a forest of goal trees and drives them through
//! evaluation steps:
//!
//! 1. The caller supplies a snapshot of state values.
//! 2. The model checks that every parameter referenced in the forest is
//!    present.
//! 3. Each top-level goal is evaluated recursively, every visited node
//!    recording its degree under the current step.
//! 4. The step counter advances.
//!
//! Satisfaction and violation queries read recorded history only and never
//! evaluate anything.
//!
//! # Key Types
//!
//! - [`ModelConfig`]: short-circuiting, default threshold, parallel queries
//! - [`GoalModel`]: the root aggregator
//! - [`Evaluation`]: per-goal results of a model-level call
//!
//! # References
//!
//! van Lamsweerde (2009), *Requirements Engineering: From System Goals to
//! UML Models to Software Specifications*

mod config;
mod goal_model;

pub use config::ModelConfig;
pub use goal_model::{Evaluation, GoalModel};
