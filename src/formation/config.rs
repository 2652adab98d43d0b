//! Pipeline configuration.

use crate::balance::BalanceConfig;
use crate::categorize::CategorizeConfig;
use crate::rules::CompositionRules;

/// Configuration for [`BalancedStrategy`](super::BalancedStrategy).
///
/// # Examples
///
/// ```
/// use u_teamform::formation::FormationConfig;
/// use u_teamform::balance::BalanceConfig;
///
/// let config = FormationConfig::default()
///     .with_seed(42)
///     .with_balance(BalanceConfig::default().with_max_skill_iterations(50));
/// assert_eq!(config.seed, Some(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormationConfig {
    /// Composition rules shared by every stage.
    pub rules: CompositionRules,

    /// Balancer iteration policy.
    pub balance: BalanceConfig,

    /// Categorizer settings.
    pub categorize: CategorizeConfig,

    /// Random seed for reproducibility. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl FormationConfig {
    pub fn with_rules(mut self, rules: CompositionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_balance(mut self, balance: BalanceConfig) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_categorize(mut self, categorize: CategorizeConfig) -> Self {
        self.categorize = categorize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates every nested configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.rules.validate()?;
        self.balance.validate()?;
        self.categorize.validate()?;
        Ok(())
    }
}
