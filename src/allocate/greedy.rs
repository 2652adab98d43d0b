//! Quota-aware greedy allocation.
//!
//! # Algorithm
//!
//! Operating on `floor(pool / size)` empty groups:
//!
//! 1. **Quota seed**: up to `primary_max` `Primary` members per group,
//!    in bucket order.
//! 2. **Bounded top-up**: up to `secondary_max` `Secondary` members per
//!    group, bounded by remaining capacity and supply.
//! 3. **Unconstrained fill**: `Mixed` members until each group is full.
//! 4. **Gap sweep**: any still-unplaced pool members, regardless of
//!    category, into groups below capacity.
//!
//! Buckets are drained, never copied. When supply runs short the
//! trailing groups stay under-full; that is surfaced by the reporter,
//! not raised here.

use tracing::debug;

use crate::categorize::Buckets;
use crate::model::{Assignment, CandidateId, Category, Group, Pool};
use crate::rules::CompositionRules;

/// Greedy seat filler for the allocation stage.
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator {
    rules: CompositionRules,
}

impl GreedyAllocator {
    pub fn new(rules: CompositionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CompositionRules {
        &self.rules
    }

    /// Fills `floor(pool.len() / group_size)` groups from `buckets`, then
    /// sweeps the rest of `pool` into any open seats.
    ///
    /// The caller is responsible for `group_size >= 2`; with
    /// `group_size == 0` no groups are created.
    pub fn allocate(&self, pool: &Pool, mut buckets: Buckets, group_size: usize) -> Assignment {
        let mut assignment = Assignment::empty(pool.len(), group_size);

        let seeded = fill_round_robin(
            assignment.groups_mut(),
            buckets.take(Category::Primary),
            self.rules.primary_max,
            pool,
        );
        let topped = fill_round_robin(
            assignment.groups_mut(),
            buckets.take(Category::Secondary),
            self.rules.secondary_max,
            pool,
        );
        let filled = fill_round_robin(
            assignment.groups_mut(),
            buckets.take(Category::Mixed),
            group_size,
            pool,
        );

        let unplaced = assignment.unplaced(pool);
        let swept = sweep_gaps(assignment.groups_mut(), unplaced, pool);

        debug!(
            groups = assignment.group_count(),
            seeded, topped, filled, swept,
            placed = assignment.placed_count(),
            "greedy allocation complete"
        );
        assignment
    }
}

/// Gives each group, in order, up to `per_group` members from `supply`.
///
/// Full groups are skipped; stops as soon as the supply is exhausted.
/// Returns the number of members placed.
fn fill_round_robin(
    groups: &mut [Group],
    supply: Vec<CandidateId>,
    per_group: usize,
    pool: &Pool,
) -> usize {
    let mut supply = supply.into_iter();
    let mut placed = 0;

    'groups: for group in groups.iter_mut() {
        let quota = per_group.min(group.remaining());
        for _ in 0..quota {
            let Some(id) = supply.next() else {
                break 'groups;
            };
            if group.insert(id, pool) {
                placed += 1;
            }
        }
    }
    placed
}

/// Tops up every under-full group from `unplaced`, in order.
fn sweep_gaps(groups: &mut [Group], unplaced: Vec<CandidateId>, pool: &Pool) -> usize {
    let mut supply = unplaced.into_iter();
    let mut placed = 0;

    for group in groups.iter_mut() {
        while !group.is_full() {
            let Some(id) = supply.next() else {
                return placed;
            };
            if group.insert(id, pool) {
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::Categorizer;
    use crate::model::Candidate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn candidate(i: usize, score: u32) -> Candidate {
        Candidate::new(format!("c{i}"), format!("C{i}"), (i % 10) as u32 + 1, score, format!("g{}", i % 5), format!("r{}", i % 4))
    }

    fn pool_with(primary: usize, mixed: usize, secondary: usize, unclassified: usize) -> Pool {
        let mut v = Vec::new();
        let mut i = 0;
        for (n, score) in [(primary, 95), (mixed, 80), (secondary, 60), (unclassified, 10)] {
            for _ in 0..n {
                v.push(candidate(i, score));
                i += 1;
            }
        }
        v.into()
    }

    fn allocate(pool: &Pool, size: usize, seed: u64) -> Assignment {
        let buckets = Categorizer::default().categorize(pool, &mut StdRng::seed_from_u64(seed));
        GreedyAllocator::default().allocate(pool, buckets, size)
    }

    fn count(pool: &Pool, group: &Group, category: Category) -> usize {
        group.members().iter().filter(|&&m| pool[m].category() == category).count()
    }

    #[test]
    fn test_quota_seed_and_top_up() {
        let pool = pool_with(4, 4, 4, 0);
        let a = allocate(&pool, 4, 42);

        assert_eq!(a.group_count(), 3);
        assert!(a.all_full());
        // the surplus Primary is swept into the only group with an open seat
        let primaries: Vec<usize> = a.groups().iter().map(|g| count(&pool, g, Category::Primary)).collect();
        assert_eq!(primaries, vec![1, 1, 2]);
        for g in a.groups() {
            assert!(count(&pool, g, Category::Secondary) <= 2);
        }
    }

    #[test]
    fn test_secondary_top_up_is_front_loaded() {
        // 3 Secondary across 3 groups of 4: first group gets 2, second gets 1
        let pool = pool_with(3, 6, 3, 0);
        let a = allocate(&pool, 4, 7);
        let secondaries: Vec<usize> = a.groups().iter().map(|g| count(&pool, g, Category::Secondary)).collect();
        assert_eq!(secondaries, vec![2, 1, 0]);
    }

    #[test]
    fn test_gap_sweep_uses_any_category() {
        // No Mixed supply: leftovers from Primary and Unclassified fill seats
        let pool = pool_with(4, 0, 2, 2);
        let a = allocate(&pool, 4, 1);

        assert_eq!(a.group_count(), 2);
        assert!(a.all_full());
        assert_eq!(a.placed_count(), 8);
        let primaries: usize = a.groups().iter().map(|g| count(&pool, g, Category::Primary)).sum();
        assert_eq!(primaries, 4);
    }

    #[test]
    fn test_leftovers_are_excluded() {
        let pool = pool_with(1, 3, 1, 0);
        let a = allocate(&pool, 2, 3);
        assert_eq!(a.group_count(), 2);
        assert_eq!(a.placed_count(), 4);
        assert_eq!(a.unplaced(&pool).len(), 1);
    }

    #[test]
    fn test_no_duplicates_across_groups() {
        let pool = pool_with(5, 17, 9, 4);
        let a = allocate(&pool, 5, 9);
        let mut seen = HashSet::new();
        for g in a.groups() {
            assert!(g.len() <= g.capacity());
            for &m in g.members() {
                assert!(seen.insert(m), "candidate {m:?} placed twice");
            }
        }
        assert_eq!(a.group_count(), 35 / 5);
        assert!(a.all_full());
    }

    #[test]
    fn test_means_are_cached() {
        let pool = pool_with(2, 4, 2, 0);
        let a = allocate(&pool, 4, 5);
        for g in a.groups() {
            let expected: f64 =
                g.members().iter().map(|&m| pool[m].skill() as f64).sum::<f64>() / g.len() as f64;
            assert!((g.mean_skill() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fill_round_robin_stops_on_empty_supply() {
        let pool = pool_with(0, 2, 0, 0);
        let mut groups = vec![Group::new("a", 3), Group::new("b", 3)];
        let placed = fill_round_robin(&mut groups, vec![CandidateId(0), CandidateId(1)], 3, &pool);
        assert_eq!(placed, 2);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[1].is_empty());
    }
}
