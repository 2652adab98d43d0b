//! Read-only classification of a finished assignment.

use super::types::{GroupReport, Issue, Report, SkillStats};
use crate::model::{Assignment, Category, Group, Pool};
use crate::rules::{Composition, CompositionRules};

/// Classifies groups and computes skill statistics.
///
/// Never mutates the assignment; two calls on the same input return equal
/// reports.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    rules: CompositionRules,
}

impl Reporter {
    pub fn new(rules: CompositionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CompositionRules {
        &self.rules
    }

    /// Builds a [`Report`] for `assignment`.
    pub fn report(&self, pool: &Pool, assignment: &Assignment) -> Report {
        let groups: Vec<GroupReport> = assignment
            .groups()
            .iter()
            .map(|g| self.report_group(pool, g))
            .collect();

        let (compliant, non_compliant): (Vec<usize>, Vec<usize>) =
            (0..groups.len()).partition(|&i| groups[i].compliant);

        let placed = assignment.placed_count();
        let placed_total: f64 = assignment
            .groups()
            .iter()
            .flat_map(|g| g.members().iter())
            .map(|&m| pool[m].skill() as f64)
            .sum();

        Report {
            skill: skill_stats(assignment.groups()),
            compliant,
            non_compliant,
            placed,
            unplaced: pool.len().saturating_sub(placed),
            placed_mean_skill: if placed == 0 { 0.0 } else { placed_total / placed as f64 },
            groups,
        }
    }

    fn report_group(&self, pool: &Pool, group: &Group) -> GroupReport {
        let composition = Composition::of_group(pool, group);
        let rules = &self.rules;
        let mut issues = Vec::new();

        let primary = composition.count(Category::Primary);
        let secondary = composition.count(Category::Secondary);
        if primary > rules.primary_max {
            issues.push(Issue::TooManyPrimary { count: primary });
        }
        if secondary > rules.secondary_max {
            issues.push(Issue::TooManySecondary { count: secondary });
        }
        for (&value, &count) in composition.sub_categories() {
            if count > rules.sub_category_cap {
                issues.push(Issue::SubCategoryOverCap {
                    value: value.to_string(),
                    count,
                });
            }
        }
        if !rules.diverse_enough(&composition) {
            issues.push(Issue::TooFewTags {
                distinct: composition.distinct_tags(),
            });
        }
        if !group.is_full() {
            issues.push(Issue::Underfilled {
                size: group.len(),
                capacity: group.capacity(),
            });
        }

        GroupReport {
            label: group.label().to_string(),
            size: group.len(),
            capacity: group.capacity(),
            full: group.is_full(),
            mean_skill: group.mean_skill(),
            primary,
            mixed: composition.count(Category::Mixed),
            secondary,
            unclassified: composition.count(Category::Unclassified),
            sub_categories: composition
                .sub_categories()
                .iter()
                .map(|(&k, &v)| (k.to_string(), v))
                .collect(),
            distinct_tags: composition.distinct_tags(),
            compliant: rules.is_compliant(&composition),
            issues,
        }
    }
}

fn skill_stats(groups: &[Group]) -> SkillStats {
    let means: Vec<f64> = groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(Group::mean_skill)
        .collect();
    if means.is_empty() {
        return SkillStats::default();
    }
    let min = means.iter().copied().fold(f64::INFINITY, f64::min);
    let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    SkillStats {
        mean: means.iter().sum::<f64>() / means.len() as f64,
        min,
        max,
        spread: max - min,
    }
}
