//! Per-node evaluation history.

use std::collections::BTreeMap;

/// Degrees recorded by a node, keyed by evaluation step.
///
/// Entries are appended by the owning node's `evaluate` and are never
/// removed. Recording twice at the same step replaces the earlier degree
/// instead of adding an entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    entries: BTreeMap<u64, f64>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `degree` at `step`, overwriting any earlier entry there.
    pub fn record(&mut self, step: u64, degree: f64) {
        self.entries.insert(step, degree);
    }

    /// Degree recorded at `step`, if any.
    pub fn get(&self, step: u64) -> Option<f64> {
        self.entries.get(&step).copied()
    }

    /// The entry with the highest step.
    pub fn latest(&self) -> Option<(u64, f64)> {
        self.entries.last_key_value().map(|(&s, &d)| (s, d))
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in step order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.entries.iter().map(|(&s, &d)| (s, d))
    }

    /// Degrees whose step lies in the half-open window `[start, end)`.
    ///
    /// `start` defaults to the first recorded step and `end` to one past the
    /// last, so `window(None, None)` yields the whole history.
    pub fn window(&self, start: Option<u64>, end: Option<u64>) -> Vec<f64> {
        let (Some((&first, _)), Some((&last, _))) =
            (self.entries.first_key_value(), self.entries.last_key_value())
        else {
            return Vec::new();
        };
        let start = start.unwrap_or(first);
        let end = end.unwrap_or(last.saturating_add(1));
        if start >= end {
            return Vec::new();
        }
        self.entries.range(start..end).map(|(_, &d)| d).collect()
    }

    /// Borrow the underlying step map.
    pub fn as_map(&self) -> &BTreeMap<u64, f64> {
        &self.entries
    }
}
