//! Gödel connectives: AND = min, OR = max, NOT = 1 - x.

/// Fuzzy conjunction of two degrees.
#[inline]
pub fn fuzzy_and(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Fuzzy disjunction of two degrees.
#[inline]
pub fn fuzzy_or(a: f64, b: f64) -> f64 {
    a.max(b)
}

/// Fuzzy negation.
#[inline]
pub fn fuzzy_not(value: f64) -> f64 {
    1.0 - value
}

/// Fuzzy equivalence: `1 - |a - b|`.
///
/// Commutative, 1.0 when both degrees agree, 0.0 when one is fully true
/// and the other fully false.
#[inline]
pub fn fuzzy_equiv(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs()
}

/// Minimum over any number of degrees. `None` for an empty input.
pub fn fuzzy_and_all<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(fuzzy_and)
}

/// Maximum over any number of degrees. `None` for an empty input.
pub fn fuzzy_or_all<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(fuzzy_or)
}
