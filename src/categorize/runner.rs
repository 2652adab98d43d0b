//! Bucketing and shuffling.
//!
//! # Algorithm
//!
//! 1. Append every candidate id to the bucket of its category, in pool
//!    order (optionally batch-parallel, merged by concatenation in batch
//!    order).
//! 2. Shuffle each bucket in [`Category::ALL`] order with the run's RNG.
//!
//! Because the merge preserves pool order, the parallel and sequential
//! paths produce identical buckets for the same RNG state.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::buckets::Buckets;
use super::config::CategorizeConfig;
use crate::model::{Category, Pool};

/// Partitions a pool into shuffled category buckets.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    config: CategorizeConfig,
}

impl Categorizer {
    pub fn new(config: CategorizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CategorizeConfig {
        &self.config
    }

    /// Buckets `pool` by category and shuffles each bucket uniformly.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use u_teamform::categorize::Categorizer;
    /// use u_teamform::model::{Candidate, Category, Pool};
    ///
    /// let pool: Pool = vec![
    ///     Candidate::new("a", "A", 5, 95, "Chess", "Lead"),
    ///     Candidate::new("b", "B", 6, 75, "Go", "Support"),
    /// ]
    /// .into();
    /// let buckets = Categorizer::default().categorize(&pool, &mut StdRng::seed_from_u64(7));
    /// assert_eq!(buckets.len(Category::Primary), 1);
    /// assert_eq!(buckets.len(Category::Mixed), 1);
    /// ```
    pub fn categorize<R: Rng>(&self, pool: &Pool, rng: &mut R) -> Buckets {
        let mut parts = self.bucket(pool);
        for category in Category::ALL {
            parts[category.index()].shuffle(rng);
        }
        let buckets = Buckets::from_parts(parts);
        debug!(distribution = %buckets.distribution(), "categorized pool");
        buckets
    }

    #[cfg(feature = "parallel")]
    fn bucket(&self, pool: &Pool) -> [Vec<crate::model::CandidateId>; 4] {
        if self.config.parallel && pool.len() > self.config.batch_size {
            if let Some(parts) = parallel::bucket(pool, &self.config) {
                return parts;
            }
            tracing::warn!("parallel categorization failed, using sequential fallback");
        }
        bucket_sequential(pool)
    }

    #[cfg(not(feature = "parallel"))]
    fn bucket(&self, pool: &Pool) -> [Vec<crate::model::CandidateId>; 4] {
        bucket_sequential(pool)
    }
}

fn bucket_sequential(pool: &Pool) -> [Vec<crate::model::CandidateId>; 4] {
    let mut parts: [Vec<_>; 4] = Default::default();
    for (id, candidate) in pool.iter() {
        parts[candidate.category().index()].push(id);
    }
    parts
}

#[cfg(feature = "parallel")]
mod parallel {
    use std::sync::mpsc;
    use std::time::Instant;

    use crate::categorize::CategorizeConfig;
    use crate::model::{CandidateId, Category, Pool};

    type Parts = [Vec<CandidateId>; 4];

    /// Buckets batches on the rayon pool.
    ///
    /// Returns `None` if any batch misses the deadline or its worker dies.
    /// The deadline covers the whole step, batching and spawning included.
    pub(super) fn bucket(pool: &Pool, config: &CategorizeConfig) -> Option<Parts> {
        let deadline = Instant::now() + config.timeout;
        let labels: Vec<(CandidateId, Category)> =
            pool.iter().map(|(id, c)| (id, c.category())).collect();
        let batches: Vec<Vec<(CandidateId, Category)>> = labels
            .chunks(config.batch_size.max(1))
            .map(<[_]>::to_vec)
            .collect();
        let batch_count = batches.len();

        let (tx, rx) = mpsc::channel::<(usize, Parts)>();
        for (index, batch) in batches.into_iter().enumerate() {
            let tx = tx.clone();
            rayon::spawn(move || {
                let mut local: Parts = Default::default();
                for (id, category) in batch {
                    local[category.index()].push(id);
                }
                // receiver gone means the deadline already passed
                let _ = tx.send((index, local));
            });
        }
        drop(tx);

        let mut results: Vec<Option<Parts>> = (0..batch_count).map(|_| None).collect();
        for _ in 0..batch_count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (index, local) = rx.recv_timeout(remaining).ok()?;
            results[index] = Some(local);
        }

        let mut merged: Parts = Default::default();
        for local in results {
            let local = local?;
            for (bucket, part) in merged.iter_mut().zip(local) {
                bucket.extend(part);
            }
        }
        Some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, CandidateId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(n: usize) -> Pool {
        (0..n)
            .map(|i| {
                let score = [95, 80, 60, 10][i % 4];
                Candidate::new(format!("c{i}"), format!("C{i}"), (i % 10) as u32 + 1, score, "g", "r")
            })
            .collect()
    }

    #[test]
    fn test_every_candidate_lands_in_its_bucket() {
        let pool = pool(40);
        let buckets = Categorizer::default().categorize(&pool, &mut StdRng::seed_from_u64(1));

        assert_eq!(buckets.total(), 40);
        for category in Category::ALL {
            assert_eq!(buckets.len(category), 10);
            for &id in buckets.get(category) {
                assert_eq!(pool[id].category(), category);
            }
        }
    }

    #[test]
    fn test_unknown_label_goes_to_catch_all() {
        let pool: Pool = vec![
            Candidate::new("a", "A", 3, 95, "g", "r").with_category(Category::from_label("Wizard")),
            Candidate::new("b", "B", 3, 20, "g", "r"),
        ]
        .into();
        let buckets = Categorizer::default().categorize(&pool, &mut StdRng::seed_from_u64(1));
        assert_eq!(buckets.len(Category::Unclassified), 2);
        assert_eq!(buckets.len(Category::Primary), 0);
    }

    #[test]
    fn test_same_seed_same_order() {
        let pool = pool(100);
        let categorizer = Categorizer::default();
        let a = categorizer.categorize(&pool, &mut StdRng::seed_from_u64(99));
        let b = categorizer.categorize(&pool, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_shuffle_differently() {
        let pool = pool(200);
        let categorizer = Categorizer::default();
        let a = categorizer.categorize(&pool, &mut StdRng::seed_from_u64(1));
        let b = categorizer.categorize(&pool, &mut StdRng::seed_from_u64(2));
        assert_ne!(a.get(Category::Mixed), b.get(Category::Mixed));
    }

    #[test]
    fn test_shuffle_is_not_identity() {
        let pool = pool(200);
        let buckets = Categorizer::default().categorize(&pool, &mut StdRng::seed_from_u64(5));
        let mixed = buckets.get(Category::Mixed);
        let mut sorted: Vec<CandidateId> = mixed.to_vec();
        sorted.sort();
        assert_ne!(mixed, sorted.as_slice());
    }

    #[test]
    fn test_take_drains_bucket() {
        let pool = pool(8);
        let mut buckets = Categorizer::default().categorize(&pool, &mut StdRng::seed_from_u64(3));
        let primary = buckets.take(Category::Primary);
        assert_eq!(primary.len(), 2);
        assert_eq!(buckets.len(Category::Primary), 0);
        assert_eq!(buckets.total(), 6);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        use std::time::Duration;

        let pool = pool(1_000);
        let parallel = Categorizer::new(
            CategorizeConfig::default()
                .with_batch_size(64)
                .with_timeout(Duration::from_secs(10)),
        );
        let sequential = Categorizer::new(CategorizeConfig::default().with_parallel(false));

        let a = parallel.categorize(&pool, &mut StdRng::seed_from_u64(11));
        let b = sequential.categorize(&pool, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_timeout_falls_back_to_sequential() {
        use std::time::Duration;

        let pool = pool(2_000);
        let config = CategorizeConfig::default()
            .with_batch_size(1)
            .with_timeout(Duration::from_nanos(1));
        let hurried = Categorizer::new(config.clone());
        let sequential = Categorizer::new(CategorizeConfig::default().with_parallel(false));

        // a 2000-batch run cannot report back within a nanosecond
        assert!(parallel::bucket(&pool, &config).is_none());

        let a = hurried.categorize(&pool, &mut StdRng::seed_from_u64(23));
        let b = sequential.categorize(&pool, &mut StdRng::seed_from_u64(23));
        assert_eq!(a, b);
        assert_eq!(a.total(), 2_000);
    }
}
