//! Fuzzy logic primitives.
//!
//! Stateless numeric functions over degrees in [0, 1]:
//!
//! - **Connectives**: [`fuzzy_and`] (minimum), [`fuzzy_or`] (maximum),
//!   [`fuzzy_not`] (complement), [`fuzzy_equiv`] (one minus distance).
//! - **Membership shapes**: [`left_shoulder`], [`right_shoulder`],
//!   [`triangle`], each parameterized by a target value and a deviation
//!   width.
//!
//! # References
//!
//! Zadeh (1965), "Fuzzy sets", *Information and Control* 8(3), 338-353.

mod membership;
mod ops;

pub use membership::{left_shoulder, right_shoulder, triangle};
pub use ops::{fuzzy_and, fuzzy_and_all, fuzzy_equiv, fuzzy_not, fuzzy_or, fuzzy_or_all};
