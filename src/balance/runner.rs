//! Local-search balancing engine.
//!
//! # Algorithm
//!
//! Three first-improvement passes, in fixed order, each reading the
//! current state rather than a snapshot:
//!
//! 1. **Skill**: repeatedly take the lowest- and highest-mean full groups;
//!    commit the first valid (low member, high member) swap that strictly
//!    narrows their gap. Stop when the gap is below the threshold, no such
//!    swap exists, or the iteration cap is hit.
//! 2. **Variety**: for each sub-category value over the cap in a group,
//!    swap one holder with a non-holder from another group.
//! 3. **Diversity**: for each group with too few distinct functional tags,
//!    swap a duplicate-tag member for a member of another group carrying a
//!    missing tag.
//!
//! A swap is committed only if [`CompositionRules::permits_exchange`]
//! holds for both groups. Both cached means are recomputed on commit.

use std::cmp::Ordering;

use tracing::{debug, info};

use super::config::BalanceConfig;
use super::types::{BalanceOutcome, BalancePass, BalanceStats, Exchange, SkillOutcome};
use crate::model::{Assignment, CandidateId, Group, Pool};
use crate::rules::{Composition, CompositionRules};

/// Minimum gap reduction that counts as an improvement.
const IMPROVEMENT_EPS: f64 = 1e-9;

/// Pairwise-exchange local search over an [`Assignment`].
#[derive(Debug, Clone, Default)]
pub struct Balancer {
    rules: CompositionRules,
    config: BalanceConfig,
}

impl Balancer {
    pub fn new(rules: CompositionRules, config: BalanceConfig) -> Self {
        Self { rules, config }
    }

    pub fn rules(&self) -> &CompositionRules {
        &self.rules
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Runs the enabled passes and hands the assignment back.
    pub fn balance(&self, pool: &Pool, mut assignment: Assignment) -> BalanceOutcome {
        let mut exchanges = Vec::new();
        let mut stats = BalanceStats::default();

        if self.config.skill_pass {
            stats.skill = self.skill_pass(pool, &mut assignment, &mut exchanges);
        }
        if self.config.variety_pass {
            stats.variety_exchanges = self.variety_pass(pool, &mut assignment, &mut exchanges);
        }
        if self.config.diversity_pass {
            stats.diversity_exchanges = self.diversity_pass(pool, &mut assignment, &mut exchanges);
        }

        info!(
            skill_iterations = stats.skill.iterations,
            skill_converged = stats.skill.converged,
            skill_exchanges = stats.skill.exchanges,
            variety_exchanges = stats.variety_exchanges,
            diversity_exchanges = stats.diversity_exchanges,
            "balancing complete"
        );

        BalanceOutcome {
            assignment,
            exchanges,
            stats,
        }
    }

    /// Narrows the spread between the lowest- and highest-mean groups.
    ///
    /// Only full groups take part, since no exchange involving an
    /// under-full group is valid.
    pub fn skill_pass(
        &self,
        pool: &Pool,
        assignment: &mut Assignment,
        log: &mut Vec<Exchange>,
    ) -> SkillOutcome {
        let mut outcome = SkillOutcome::default();

        for _ in 0..self.config.max_skill_iterations {
            outcome.iterations += 1;

            let Some((low, high)) = extreme_groups(assignment.groups()) else {
                outcome.converged = true;
                return outcome;
            };
            let groups = assignment.groups();
            let gap = groups[high].mean_skill() - groups[low].mean_skill();
            if gap < self.config.skill_gap_threshold {
                outcome.converged = true;
                return outcome;
            }

            match self.find_skill_exchange(pool, &groups[low], &groups[high], gap) {
                Some((out_low, out_high)) => {
                    if self.commit(pool, assignment, BalancePass::Skill, low, out_low, high, out_high, log) {
                        outcome.exchanges += 1;
                    }
                }
                None => {
                    outcome.converged = true;
                    return outcome;
                }
            }
        }

        // the cap may coincide with convergence; check once more without committing
        outcome.converged = match extreme_groups(assignment.groups()) {
            None => true,
            Some((low, high)) => {
                let groups = assignment.groups();
                let gap = groups[high].mean_skill() - groups[low].mean_skill();
                gap < self.config.skill_gap_threshold
                    || self.find_skill_exchange(pool, &groups[low], &groups[high], gap).is_none()
            }
        };
        outcome
    }

    /// First valid `(low member, high member)` swap that strictly narrows
    /// `gap`, scanning both groups in member order.
    pub fn find_skill_exchange(
        &self,
        pool: &Pool,
        low: &Group,
        high: &Group,
        gap: f64,
    ) -> Option<(CandidateId, CandidateId)> {
        for &out_low in low.members() {
            for &out_high in high.members() {
                if !self.rules.permits_exchange(pool, low, out_low, high, out_high) {
                    continue;
                }
                let new_low = low.mean_after_swap(out_low, out_high, pool);
                let new_high = high.mean_after_swap(out_high, out_low, pool);
                if (new_high - new_low).abs() < gap - IMPROVEMENT_EPS {
                    return Some((out_low, out_high));
                }
            }
        }
        None
    }

    /// Moves holders of over-represented sub-category values out of each
    /// group. Returns the number of committed exchanges.
    pub fn variety_pass(&self, pool: &Pool, assignment: &mut Assignment, log: &mut Vec<Exchange>) -> usize {
        let mut committed = 0;

        for g in 0..assignment.group_count() {
            let over: Vec<&str> = Composition::of_group(pool, &assignment.groups()[g])
                .sub_categories()
                .iter()
                .filter(|&(_, &n)| n > self.rules.sub_category_cap)
                .map(|(&value, _)| value)
                .collect();

            for value in over {
                let current = Composition::of_group(pool, &assignment.groups()[g]);
                if current.sub_category_count(value) <= self.rules.sub_category_cap {
                    continue;
                }
                if let Some((h, out_g, out_h)) = self.find_variety_exchange(pool, assignment.groups(), g, value) {
                    if self.commit(pool, assignment, BalancePass::Variety, g, out_g, h, out_h, log) {
                        committed += 1;
                    }
                }
            }
        }
        committed
    }

    fn find_variety_exchange(
        &self,
        pool: &Pool,
        groups: &[Group],
        g: usize,
        value: &str,
    ) -> Option<(usize, CandidateId, CandidateId)> {
        let source = &groups[g];
        let holders = source
            .members()
            .iter()
            .copied()
            .filter(|&m| pool[m].sub_category() == value);

        for out_g in holders {
            for (h, target) in groups.iter().enumerate() {
                if h == g {
                    continue;
                }
                for &out_h in target.members() {
                    if pool[out_h].sub_category() == value {
                        continue;
                    }
                    if self.rules.permits_exchange(pool, source, out_g, target, out_h) {
                        return Some((h, out_g, out_h));
                    }
                }
            }
        }
        None
    }

    /// Brings missing functional tags into groups with too few distinct
    /// tags. Returns the number of committed exchanges.
    pub fn diversity_pass(&self, pool: &Pool, assignment: &mut Assignment, log: &mut Vec<Exchange>) -> usize {
        let mut committed = 0;

        for g in 0..assignment.group_count() {
            let composition = Composition::of_group(pool, &assignment.groups()[g]);
            if self.rules.diverse_enough(&composition) {
                continue;
            }
            if let Some((h, out_g, out_h)) = self.find_diversity_exchange(pool, assignment.groups(), g) {
                if self.commit(pool, assignment, BalancePass::Diversity, g, out_g, h, out_h, log) {
                    committed += 1;
                }
            }
        }
        committed
    }

    fn find_diversity_exchange(
        &self,
        pool: &Pool,
        groups: &[Group],
        g: usize,
    ) -> Option<(usize, CandidateId, CandidateId)> {
        let source = &groups[g];
        let present = Composition::of_group(pool, source);

        // only swapping out a duplicated tag can raise the distinct count
        let duplicates = source
            .members()
            .iter()
            .copied()
            .filter(|&m| present.tag_count(pool[m].functional_tag()) > 1);

        for out_g in duplicates {
            for (h, donor) in groups.iter().enumerate() {
                if h == g {
                    continue;
                }
                let donor_before = Composition::of_group(pool, donor).distinct_tags();
                let donor_floor = donor_before.min(self.rules.min_distinct_tags);

                for &out_h in donor.members() {
                    if present.tag_count(pool[out_h].functional_tag()) > 0 {
                        continue;
                    }
                    if !self.rules.permits_exchange(pool, source, out_g, donor, out_h) {
                        continue;
                    }
                    let donor_after = Composition::after_swap(pool, donor, out_h, out_g).distinct_tags();
                    if donor_after >= donor_floor {
                        return Some((h, out_g, out_h));
                    }
                }
            }
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn commit(
        &self,
        pool: &Pool,
        assignment: &mut Assignment,
        pass: BalancePass,
        group_a: usize,
        out_a: CandidateId,
        group_b: usize,
        out_b: CandidateId,
        log: &mut Vec<Exchange>,
    ) -> bool {
        if !assignment.exchange(group_a, out_a, group_b, out_b, pool) {
            return false;
        }
        debug!(
            ?pass,
            group_a,
            out = %pool[out_a].id(),
            group_b,
            incoming = %pool[out_b].id(),
            "committed exchange"
        );
        log.push(Exchange {
            pass,
            group_a,
            out_a,
            group_b,
            out_b,
        });
        true
    }
}

/// Indices of the lowest- and highest-mean full groups.
///
/// Ties keep group order. Returns `None` when fewer than two groups are full.
pub fn extreme_groups(groups: &[Group]) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..groups.len()).filter(|&i| groups[i].is_full()).collect();
    if order.len() < 2 {
        return None;
    }
    order.sort_by(|&a, &b| {
        groups[a]
            .mean_skill()
            .partial_cmp(&groups[b].mean_skill())
            .unwrap_or(Ordering::Equal)
    });
    Some((order[0], order[order.len() - 1]))
}
