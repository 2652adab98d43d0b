//! Balancer configuration.

/// Iteration policy for the [`Balancer`](super::Balancer).
///
/// # Examples
///
/// ```
/// use u_teamform::balance::BalanceConfig;
///
/// let config = BalanceConfig::default()
///     .with_max_skill_iterations(25)
///     .with_skill_gap_threshold(0.5)
///     .with_diversity_pass(false);
/// assert_eq!(config.max_skill_iterations, 25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    /// Maximum skill-pass iterations (one committed exchange each).
    pub max_skill_iterations: usize,

    /// The skill pass stops once `max_mean - min_mean` drops below this.
    pub skill_gap_threshold: f64,

    /// Run the skill-level pass.
    pub skill_pass: bool,

    /// Run the sub-category variety pass.
    pub variety_pass: bool,

    /// Run the functional-tag diversity pass.
    pub diversity_pass: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            max_skill_iterations: 10,
            skill_gap_threshold: 1.0,
            skill_pass: true,
            variety_pass: true,
            diversity_pass: true,
        }
    }
}

impl BalanceConfig {
    pub fn with_max_skill_iterations(mut self, n: usize) -> Self {
        self.max_skill_iterations = n;
        self
    }

    pub fn with_skill_gap_threshold(mut self, threshold: f64) -> Self {
        self.skill_gap_threshold = threshold;
        self
    }

    pub fn with_skill_pass(mut self, enabled: bool) -> Self {
        self.skill_pass = enabled;
        self
    }

    pub fn with_variety_pass(mut self, enabled: bool) -> Self {
        self.variety_pass = enabled;
        self
    }

    pub fn with_diversity_pass(mut self, enabled: bool) -> Self {
        self.diversity_pass = enabled;
        self
    }

    /// Disables every pass; the balancer becomes a no-op.
    pub fn disabled() -> Self {
        Self::default()
            .with_skill_pass(false)
            .with_variety_pass(false)
            .with_diversity_pass(false)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.skill_gap_threshold.is_finite() || self.skill_gap_threshold < 0.0 {
            return Err(format!(
                "skill_gap_threshold must be finite and non-negative, got {}",
                self.skill_gap_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BalanceConfig::default();
        assert_eq!(config.max_skill_iterations, 10);
        assert!((config.skill_gap_threshold - 1.0).abs() < 1e-10);
        assert!(config.skill_pass && config.variety_pass && config.diversity_pass);
    }

    #[test]
    fn test_disabled() {
        let config = BalanceConfig::disabled();
        assert!(!config.skill_pass);
        assert!(!config.variety_pass);
        assert!(!config.diversity_pass);
    }

    #[test]
    fn test_validate_bad_threshold() {
        assert!(BalanceConfig::default().with_skill_gap_threshold(-0.1).validate().is_err());
        assert!(BalanceConfig::default()
            .with_skill_gap_threshold(f64::NAN)
            .validate()
            .is_err());
    }
}
