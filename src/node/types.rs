//! The capability shared by every node kind, and the option structs
//! threaded through evaluation and satisfaction queries.

use super::utility::UtilityFunction;
use crate::error::GoalResult;
use crate::history::History;
use crate::value::Values;
use std::collections::{BTreeMap, BTreeSet};

/// Default high-value threshold for evaluation and queries.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Clamps a threshold into [0, 1]. NaN falls back to [`DEFAULT_THRESHOLD`].
pub(crate) fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        DEFAULT_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// Whether a satisfaction degree counts as satisfied when reporting
/// violations. Satisfaction verdicts are crisp, so only a full 1.0 holds.
#[inline]
pub(crate) fn holds(degree: f64) -> bool {
    degree >= 1.0
}

/// Per-call evaluation options.
///
/// # Examples
///
/// ```
/// use u_kaos::node::EvalOptions;
///
/// let options = EvalOptions::default().with_step(3).with_shortcircuit(true);
/// assert_eq!(options.step, Some(3));
/// assert_eq!(options.threshold, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalOptions {
    /// Allow connectives to stop visiting children once the result can no
    /// longer cross the threshold.
    pub shortcircuit: bool,

    /// Step under which every visited node records its degree.
    ///
    /// `None` evaluates without touching any history.
    pub step: Option<u64>,

    /// High-value threshold used by short-circuiting and conditionals.
    pub threshold: f64,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            shortcircuit: false,
            step: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EvalOptions {
    /// Sets the step to record under.
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = Some(step);
        self
    }

    /// Enables or disables short-circuit evaluation.
    pub fn with_shortcircuit(mut self, shortcircuit: bool) -> Self {
        self.shortcircuit = shortcircuit;
        self
    }

    /// Sets the threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }
}

/// Parameters of a satisfaction or violation query over recorded history.
///
/// The window is half-open: steps `start <= s < end`. Unset bounds default
/// to each node's first recorded step and one past its last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatisfactionQuery {
    /// First step of the window (inclusive).
    pub start: Option<u64>,
    /// End of the window (exclusive).
    pub end: Option<u64>,
    /// Allow connectives to stop folding early.
    pub shortcircuit: bool,
    /// High-value threshold.
    pub threshold: f64,
}

impl Default for SatisfactionQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            shortcircuit: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SatisfactionQuery {
    /// Sets the first step of the window.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the exclusive end of the window.
    pub fn with_end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    /// Enables or disables short-circuit folding.
    pub fn with_shortcircuit(mut self, shortcircuit: bool) -> Self {
        self.shortcircuit = shortcircuit;
        self
    }

    /// Sets the threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }
}

/// Operations every node in a goal tree supports.
///
/// Implemented by each concrete node kind and by the [`Node`](super::Node)
/// enum, which dispatches to them.
pub trait GoalNode {
    /// Stable identifier used in reports and violation sets.
    fn key(&self) -> Option<&str>;

    /// Degrees this node recorded, by step.
    fn history(&self) -> &History;

    /// Computes this node's degree for one snapshot of values.
    ///
    /// Records the result under `options.step` when one is given.
    fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64>;

    /// Satisfaction over the query window, computed from history only.
    ///
    /// Leaves apply their objective; connectives combine their children's
    /// verdicts with the same fuzzy rules they use for evaluation.
    fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64>;

    /// Keys of the nodes judged unsatisfied over the query window.
    fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>>;

    /// Adds every reachable keyed utility function to `out`. An existing
    /// entry for the same key is kept.
    fn collect_utility_functions<'a>(&'a self, out: &mut BTreeMap<String, &'a UtilityFunction>);

    /// Adds the names of all free parameters referenced below this node.
    fn collect_parameters(&self, out: &mut BTreeSet<String>);
}
