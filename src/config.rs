//! Configuration for the dynamic-programming solvers.

use serde::{Deserialize, Serialize};

/// Discount, convergence threshold and optional sweep cap shared by both
/// solvers.
///
/// # Examples
///
/// ```
/// use ttt_planner::config::PlannerConfig;
///
/// let config = PlannerConfig::new()
///     .with_gamma(0.95)
///     .with_threshold(1e-6)
///     .with_max_iterations(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Discount factor γ, in `[0, 1)`
    pub gamma: f64,
    /// A fixed-point loop stops once the largest per-sweep change drops below this
    pub threshold: f64,
    /// Sweep cap per fixed-point loop; `None` runs until convergence
    pub max_iterations: Option<usize>,
}

impl PlannerConfig {
    pub const DEFAULT_GAMMA: f64 = 0.9;
    pub const DEFAULT_THRESHOLD: f64 = 0.0001;

    /// Create a configuration with γ = 0.9, threshold = 1e-4 and no sweep cap.
    pub fn new() -> Self {
        Self {
            gamma: Self::DEFAULT_GAMMA,
            threshold: Self::DEFAULT_THRESHOLD,
            max_iterations: None,
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Check that the parameters define a contraction that can terminate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if γ is outside `[0, 1)`,
    /// the threshold is not a positive finite number, or the sweep cap is zero.
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |message: String| Err(crate::Error::InvalidConfiguration { message });

        if !(0.0..1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1), got {}", self.gamma));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return invalid(format!(
                "threshold must be positive and finite, got {}",
                self.threshold
            ));
        }
        if self.max_iterations == Some(0) {
            return invalid("max_iterations must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = PlannerConfig::default();
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.threshold, 0.0001);
        assert_eq!(config.max_iterations, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_contracting_gamma() {
        assert!(PlannerConfig::new().with_gamma(1.0).validate().is_err());
        assert!(PlannerConfig::new().with_gamma(-0.1).validate().is_err());
        assert!(PlannerConfig::new().with_gamma(f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_bad_threshold_and_cap() {
        assert!(PlannerConfig::new().with_threshold(0.0).validate().is_err());
        assert!(
            PlannerConfig::new()
                .with_threshold(f64::INFINITY)
                .validate()
                .is_err()
        );
        let err = PlannerConfig::new()
            .with_max_iterations(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }
}
