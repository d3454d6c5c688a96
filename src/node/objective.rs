//! Satisfaction-over-time policies for utility functions.

use std::fmt;
use std::str::FromStr;

/// How a utility function's recorded degrees reduce to one verdict.
///
/// A utility function without an objective is judged on its most recent
/// degree in the window ("instant").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Objective {
    /// Satisfied if the degree reaches the threshold at least once.
    Achieve,
    /// Satisfied if the degree never reaches the threshold.
    Avoid,
    /// Satisfied if the degree is at or above the threshold at every step.
    Maintain,
}

impl Objective {
    /// Lower-case name as it appears in goal model documents.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::Achieve => "achieve",
            Objective::Avoid => "avoid",
            Objective::Maintain => "maintain",
        }
    }
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "achieve" => Ok(Objective::Achieve),
            "avoid" => Ok(Objective::Avoid),
            "maintain" => Ok(Objective::Maintain),
            other => Err(format!("unknown objective \"{other}\"")),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduces a window of degrees to 1.0 (satisfied) or 0.0.
///
/// An empty window satisfies `avoid` and `maintain` vacuously and fails
/// `achieve` and instant satisfaction. Callers decide what a node that was
/// never evaluated means.
pub fn satisfaction(objective: Option<Objective>, degrees: &[f64], threshold: f64) -> f64 {
    let reached = |d: &f64| *d >= threshold;
    let verdict = match objective {
        Some(Objective::Achieve) => degrees.iter().any(reached),
        Some(Objective::Avoid) => !degrees.iter().any(reached),
        Some(Objective::Maintain) => degrees.iter().all(reached),
        None => degrees.last().is_some_and(reached),
    };
    if verdict {
        1.0
    } else {
        0.0
    }
}
