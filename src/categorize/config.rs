//! Categorizer configuration.

use std::time::Duration;

/// Configuration for the [`Categorizer`](super::Categorizer).
///
/// `parallel` only has an effect when the crate is built with the
/// `parallel` feature; otherwise bucketing is always sequential.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_teamform::categorize::CategorizeConfig;
///
/// let config = CategorizeConfig::default()
///     .with_parallel(true)
///     .with_batch_size(64)
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CategorizeConfig {
    /// Whether to bucket batches on the rayon pool.
    pub parallel: bool,

    /// Candidates per parallel batch.
    pub batch_size: usize,

    /// Wall-clock budget for the parallel step before falling back to
    /// sequential bucketing.
    pub timeout: Duration,
}

impl Default for CategorizeConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            batch_size: 256,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CategorizeConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".into());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CategorizeConfig::default();
        assert!(config.parallel);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        assert!(CategorizeConfig::default().with_batch_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = CategorizeConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
