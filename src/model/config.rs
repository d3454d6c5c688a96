//! Goal model configuration.

use crate::error::{GoalError, GoalResult};
use crate::node::{clamp_threshold, DEFAULT_THRESHOLD};

/// Configuration for a [`GoalModel`](super::GoalModel).
///
/// # Defaults
///
/// ```
/// use u_kaos::model::ModelConfig;
///
/// let config = ModelConfig::default();
/// assert!(!config.shortcircuit);
/// assert_eq!(config.threshold, 0.5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_kaos::model::ModelConfig;
///
/// let config = ModelConfig::default()
///     .with_shortcircuit(true)
///     .with_threshold(0.7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Whether connectives may stop visiting children once their result
    /// can no longer cross the threshold.
    ///
    /// Children that are skipped record nothing for that step.
    pub shortcircuit: bool,

    /// High-value threshold used when none is passed to `evaluate`.
    pub threshold: f64,

    /// Whether satisfaction and violation queries over the top-level forest
    /// run in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature. Evaluation itself is
    /// always sequential.
    pub parallel: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            shortcircuit: false,
            threshold: DEFAULT_THRESHOLD,
            parallel: true,
        }
    }
}

impl ModelConfig {
    /// Enables or disables short-circuit evaluation.
    pub fn with_shortcircuit(mut self, shortcircuit: bool) -> Self {
        self.shortcircuit = shortcircuit;
        self
    }

    /// Sets the default threshold, clamped to [0, 1].
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }

    /// Enables or disables parallel queries.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GoalResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(GoalError::InvalidConfig(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert!(!config.shortcircuit);
        assert!((config.threshold - 0.5).abs() < 1e-10);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ModelConfig::default()
            .with_shortcircuit(true)
            .with_threshold(0.8)
            .with_parallel(false);
        assert!(config.shortcircuit);
        assert!((config.threshold - 0.8).abs() < 1e-10);
        assert!(!config.parallel);
    }

    #[test]
    fn test_clamp_threshold() {
        assert!((ModelConfig::default().with_threshold(1.5).threshold - 1.0).abs() < 1e-10);
        assert!(ModelConfig::default().with_threshold(-0.5).threshold.abs() < 1e-10);
        assert_eq!(
            ModelConfig::default().with_threshold(f64::NAN).threshold,
            DEFAULT_THRESHOLD
        );
    }

    #[test]
    fn test_validate_out_of_range() {
        let config = ModelConfig {
            threshold: 2.0,
            ..ModelConfig::default()
        };
        assert!(matches!(config.validate(), Err(GoalError::InvalidConfig(_))));

        let config = ModelConfig {
            threshold: f64::NAN,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
