//! Piecewise-linear membership shapes.
//!
//! Each shape maps a value's distance from `target` into [0, 1] over a
//! ramp of width `deviation`. A deviation of 0 collapses the ramp into a
//! crisp step; the interpolation branch is only reachable when
//! `deviation > 0`.

use crate::error::{GoalError, GoalResult};

fn check_finite(value: f64, target: f64, deviation: f64) -> GoalResult<()> {
    for (name, x) in [("value", value), ("target", target), ("deviation", deviation)] {
        if !x.is_finite() {
            return Err(GoalError::InvalidArgument(format!(
                "invalid numeric {name}: \"{x}\""
            )));
        }
    }
    Ok(())
}

/// Rising ramp: 0.0 at or below `target - deviation`, 1.0 at or above
/// `target`, linear in between.
///
/// # Examples
///
/// ```
/// use u_kaos::fuzzy::left_shoulder;
///
/// assert_eq!(left_shoulder(0.5, 0.5, 0.2).unwrap(), 1.0);
/// assert_eq!(left_shoulder(0.3, 0.5, 0.2).unwrap(), 0.0);
/// assert!((left_shoulder(0.4, 0.5, 0.2).unwrap() - 0.5).abs() < 1e-10);
/// ```
pub fn left_shoulder(value: f64, target: f64, deviation: f64) -> GoalResult<f64> {
    check_finite(value, target, deviation)?;
    if value >= target {
        Ok(1.0)
    } else if value <= target - deviation {
        Ok(0.0)
    } else {
        Ok(((value - (target - deviation)) / deviation).clamp(0.0, 1.0))
    }
}

/// Falling ramp: 1.0 at or below `target`, 0.0 at or above
/// `target + deviation`, linear in between.
pub fn right_shoulder(value: f64, target: f64, deviation: f64) -> GoalResult<f64> {
    check_finite(value, target, deviation)?;
    if value <= target {
        Ok(1.0)
    } else if value >= target + deviation {
        Ok(0.0)
    } else {
        Ok(((target + deviation - value) / deviation).clamp(0.0, 1.0))
    }
}

/// Peak at `target`: the left shoulder below it, the right shoulder above.
pub fn triangle(value: f64, target: f64, deviation: f64) -> GoalResult<f64> {
    check_finite(value, target, deviation)?;
    if value < target {
        left_shoulder(value, target, deviation)
    } else if value > target {
        right_shoulder(value, target, deviation)
    } else {
        Ok(1.0)
    }
}
