//! The default four-stage strategy.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::config::FormationConfig;
use super::types::{validate_request, FormationStrategy};
use crate::allocate::GreedyAllocator;
use crate::balance::{BalanceStats, Balancer, Exchange};
use crate::categorize::{BucketSizes, Categorizer};
use crate::error::{FormationError, Result};
use crate::model::{Assignment, Pool};

/// Everything a [`BalancedStrategy::run`] produced.
#[derive(Debug, Clone)]
pub struct FormationRun {
    /// The balanced groups.
    pub assignment: Assignment,
    /// Bucket sizes seen by the allocator.
    pub distribution: BucketSizes,
    /// Balancer counters.
    pub balance: BalanceStats,
    /// Exchanges committed by the balancer, in order.
    pub exchanges: Vec<Exchange>,
    /// Seed the run used; pass it back via
    /// [`FormationConfig::with_seed`] to reproduce the run.
    pub seed: u64,
}

/// Categorize → greedy allocate → local-search balance.
///
/// # Examples
///
/// ```
/// use u_teamform::formation::{BalancedStrategy, FormationConfig, FormationStrategy};
/// use u_teamform::model::{Candidate, Pool};
///
/// let pool: Pool = (0..8)
///     .map(|i| Candidate::new(format!("P{i}"), format!("Player {i}"), i % 10 + 1, 50 + i * 6, format!("game{}", i % 4), format!("role{}", i % 3)))
///     .collect();
///
/// let strategy = BalancedStrategy::new(FormationConfig::default().with_seed(7));
/// let assignment = strategy.form_groups(&pool, 4).unwrap();
/// assert_eq!(assignment.group_count(), 2);
/// assert!(assignment.all_full());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalancedStrategy {
    config: FormationConfig,
    categorizer: Categorizer,
    allocator: GreedyAllocator,
    balancer: Balancer,
}

impl BalancedStrategy {
    pub fn new(config: FormationConfig) -> Self {
        Self {
            categorizer: Categorizer::new(config.categorize.clone()),
            allocator: GreedyAllocator::new(config.rules.clone()),
            balancer: Balancer::new(config.rules.clone(), config.balance.clone()),
            config,
        }
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    /// Runs the full pipeline and returns the run's artifacts.
    ///
    /// Fails fast with a [`FormationError`] before any allocation work if
    /// the configuration or request is invalid.
    pub fn run(&self, pool: &Pool, group_size: usize) -> Result<FormationRun> {
        self.config.validate().map_err(FormationError::InvalidConfig)?;
        validate_request(pool, group_size)?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let group_count = pool.len() / group_size;
        info!(
            candidates = pool.len(),
            group_size,
            groups = group_count,
            used = group_count * group_size,
            seed,
            "starting group formation"
        );

        let buckets = self.categorizer.categorize(pool, &mut rng);
        let distribution = buckets.distribution();
        info!(%distribution, "category distribution");

        let assignment = self.allocator.allocate(pool, buckets, group_size);
        let outcome = self.balancer.balance(pool, assignment);

        info!(
            placed = outcome.assignment.placed_count(),
            unplaced = pool.len() - outcome.assignment.placed_count(),
            exchanges = outcome.exchanges.len(),
            "group formation complete"
        );

        Ok(FormationRun {
            assignment: outcome.assignment,
            distribution,
            balance: outcome.stats,
            exchanges: outcome.exchanges,
            seed,
        })
    }
}

impl FormationStrategy for BalancedStrategy {
    fn name(&self) -> &str {
        "balanced"
    }

    fn form_groups(&self, pool: &Pool, group_size: usize) -> Result<Assignment> {
        self.run(pool, group_size).map(|run| run.assignment)
    }
}
