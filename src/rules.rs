//! Group composition rules and per-group composition counts.
//!
//! [`CompositionRules`] is shared by the allocator (quota sizes), the
//! balancer (exchange validity), and the reporter (compliance), so every
//! stage judges a group by the same numbers.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{CandidateId, Category, Group, Pool};

/// Composition constraints applied to every group.
///
/// # Examples
///
/// ```
/// use u_teamform::rules::CompositionRules;
///
/// let rules = CompositionRules::default()
///     .with_sub_category_cap(3)
///     .with_min_distinct_tags(2);
/// assert_eq!(rules.primary_max, 1);
/// assert!(rules.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompositionRules {
    /// Maximum `Primary` members per group.
    pub primary_max: usize,

    /// Maximum `Secondary` members per group.
    pub secondary_max: usize,

    /// Maximum members sharing one sub-category value.
    pub sub_category_cap: usize,

    /// Minimum distinct functional tags for a compliant group.
    pub min_distinct_tags: usize,
}

impl Default for CompositionRules {
    fn default() -> Self {
        Self {
            primary_max: 1,
            secondary_max: 2,
            sub_category_cap: 2,
            min_distinct_tags: 3,
        }
    }
}

impl CompositionRules {
    pub fn with_primary_max(mut self, n: usize) -> Self {
        self.primary_max = n;
        self
    }

    pub fn with_secondary_max(mut self, n: usize) -> Self {
        self.secondary_max = n;
        self
    }

    pub fn with_sub_category_cap(mut self, n: usize) -> Self {
        self.sub_category_cap = n;
        self
    }

    pub fn with_min_distinct_tags(mut self, n: usize) -> Self {
        self.min_distinct_tags = n;
        self
    }

    /// Validates the rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.sub_category_cap == 0 {
            return Err("sub_category_cap must be at least 1".into());
        }
        Ok(())
    }

    /// Category quotas: `Primary <= primary_max` and `Secondary <= secondary_max`.
    pub fn quotas_hold(&self, composition: &Composition<'_>) -> bool {
        composition.count(Category::Primary) <= self.primary_max
            && composition.count(Category::Secondary) <= self.secondary_max
    }

    /// No sub-category value is held by more than `sub_category_cap` members.
    pub fn within_sub_category_cap(&self, composition: &Composition<'_>) -> bool {
        composition
            .sub_categories()
            .values()
            .all(|&n| n <= self.sub_category_cap)
    }

    /// At least `min_distinct_tags` distinct functional tags.
    pub fn diverse_enough(&self, composition: &Composition<'_>) -> bool {
        composition.distinct_tags() >= self.min_distinct_tags
    }

    /// Quotas, sub-category cap, and tag diversity all hold.
    ///
    /// Fullness is not part of compliance; see [`Group::is_full`].
    pub fn is_compliant(&self, composition: &Composition<'_>) -> bool {
        self.quotas_hold(composition)
            && self.within_sub_category_cap(composition)
            && self.diverse_enough(composition)
    }

    /// Whether swapping `out_a` (from `a`) with `out_b` (from `b`) leaves
    /// both groups full, within category quotas, and within the
    /// sub-category cap.
    pub fn permits_exchange(
        &self,
        pool: &Pool,
        a: &Group,
        out_a: CandidateId,
        b: &Group,
        out_b: CandidateId,
    ) -> bool {
        self.side_permits(pool, a, out_a, out_b) && self.side_permits(pool, b, out_b, out_a)
    }

    fn side_permits(&self, pool: &Pool, group: &Group, outgoing: CandidateId, incoming: CandidateId) -> bool {
        if group.len() != group.capacity() {
            return false;
        }
        let after = Composition::after_swap(pool, group, outgoing, incoming);
        after.size() == group.capacity()
            && self.quotas_hold(&after)
            && self.within_sub_category_cap(&after)
    }
}

/// Category, sub-category, and functional-tag counts for a member set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition<'p> {
    size: usize,
    categories: [usize; 4],
    sub_categories: BTreeMap<&'p str, usize>,
    tags: BTreeMap<&'p str, usize>,
}

impl<'p> Composition<'p> {
    /// Counts the given members.
    pub fn of<I>(pool: &'p Pool, members: I) -> Self
    where
        I: IntoIterator<Item = CandidateId>,
    {
        let mut composition = Self {
            size: 0,
            categories: [0; 4],
            sub_categories: BTreeMap::new(),
            tags: BTreeMap::new(),
        };
        for id in members {
            let c = &pool[id];
            composition.size += 1;
            composition.categories[c.category().index()] += 1;
            *composition.sub_categories.entry(c.sub_category()).or_insert(0) += 1;
            *composition.tags.entry(c.functional_tag()).or_insert(0) += 1;
        }
        composition
    }

    /// Counts a group's current members.
    pub fn of_group(pool: &'p Pool, group: &Group) -> Self {
        Self::of(pool, group.members().iter().copied())
    }

    /// Counts the members `group` would have after swapping `outgoing`
    /// for `incoming`.
    pub fn after_swap(pool: &'p Pool, group: &Group, outgoing: CandidateId, incoming: CandidateId) -> Self {
        Self::of(
            pool,
            group
                .members()
                .iter()
                .copied()
                .filter(|&m| m != outgoing)
                .chain(std::iter::once(incoming)),
        )
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories[category.index()]
    }

    /// Members per sub-category value, in lexical order of the value.
    pub fn sub_categories(&self) -> &BTreeMap<&'p str, usize> {
        &self.sub_categories
    }

    pub fn sub_category_count(&self, value: &str) -> usize {
        self.sub_categories.get(value).copied().unwrap_or(0)
    }

    /// Members per functional tag.
    pub fn tags(&self) -> &BTreeMap<&'p str, usize> {
        &self.tags
    }

    pub fn tag_count(&self, tag: &str) -> usize {
        self.tags.get(tag).copied().unwrap_or(0)
    }

    pub fn distinct_tags(&self) -> usize {
        self.tags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Candidate;

    // score 95 = Primary, 60 = Secondary, 80 = Mixed
    fn pool() -> Pool {
        vec![
            Candidate::new("p1", "P1", 5, 95, "Chess", "Attacker"),
            Candidate::new("p2", "P2", 6, 95, "Go", "Defender"),
            Candidate::new("s1", "S1", 4, 60, "Chess", "Support"),
            Candidate::new("s2", "S2", 3, 60, "Chess", "Support"),
            Candidate::new("m1", "M1", 7, 80, "Go", "Coordinator"),
            Candidate::new("m2", "M2", 8, 80, "Poker", "Attacker"),
        ]
        .into()
    }

    fn group(pool: &Pool, label: &str, ids: &[usize]) -> Group {
        let mut g = Group::new(label, ids.len());
        for &i in ids {
            g.insert(CandidateId(i), pool);
        }
        g
    }

    #[test]
    fn test_composition_counts() {
        let pool = pool();
        let g = group(&pool, "g", &[0, 2, 3, 4]);
        let c = Composition::of_group(&pool, &g);
        assert_eq!(c.size(), 4);
        assert_eq!(c.count(Category::Primary), 1);
        assert_eq!(c.count(Category::Secondary), 2);
        assert_eq!(c.count(Category::Mixed), 1);
        assert_eq!(c.sub_category_count("Chess"), 3);
        assert_eq!(c.distinct_tags(), 3);
        assert_eq!(c.tag_count("Support"), 2);
        let tags: Vec<(&str, usize)> = c.tags().iter().map(|(&t, &n)| (t, n)).collect();
        assert_eq!(tags, vec![("Attacker", 1), ("Coordinator", 1), ("Support", 2)]);
    }

    #[test]
    fn test_compliance() {
        let pool = pool();
        let rules = CompositionRules::default();

        let over_cap = Composition::of_group(&pool, &group(&pool, "g", &[0, 2, 3, 4]));
        assert!(rules.quotas_hold(&over_cap));
        assert!(!rules.within_sub_category_cap(&over_cap));
        assert!(!rules.is_compliant(&over_cap));

        let ok = Composition::of_group(&pool, &group(&pool, "g", &[0, 2, 4, 5]));
        assert!(rules.is_compliant(&ok));

        let two_primary = Composition::of_group(&pool, &group(&pool, "g", &[0, 1, 4]));
        assert!(!rules.quotas_hold(&two_primary));
    }

    #[test]
    fn test_permits_exchange_respects_quota() {
        let pool = pool();
        let rules = CompositionRules::default().with_sub_category_cap(4);
        let a = group(&pool, "a", &[0, 4]);
        let b = group(&pool, "b", &[1, 5]);

        // Primary for Primary keeps both quotas
        assert!(rules.permits_exchange(&pool, &a, CandidateId(0), &b, CandidateId(1)));
        // Mixed out of `a` for Primary in: `a` would hold two Primary
        assert!(!rules.permits_exchange(&pool, &a, CandidateId(4), &b, CandidateId(1)));
    }

    #[test]
    fn test_permits_exchange_respects_sub_category_cap() {
        let pool = pool();
        let rules = CompositionRules::default();
        let a = group(&pool, "a", &[0, 2, 4]); // Chess x2, Go
        let b = group(&pool, "b", &[3, 1, 5]); // Chess, Go, Poker

        // Go (m1) out of `a`, Chess (s2) in: `a` would hold three Chess
        assert!(!rules.permits_exchange(&pool, &a, CandidateId(4), &b, CandidateId(3)));
        // Chess (s1) out of `a`, Chess (s2) in: counts unchanged
        assert!(rules.permits_exchange(&pool, &a, CandidateId(2), &b, CandidateId(3)));
    }

    #[test]
    fn test_permits_exchange_requires_full_groups() {
        let pool = pool();
        let rules = CompositionRules::default();
        let mut a = Group::new("a", 3);
        a.insert(CandidateId(0), &pool);
        a.insert(CandidateId(4), &pool);
        let b = group(&pool, "b", &[1, 5]);
        assert!(!rules.permits_exchange(&pool, &a, CandidateId(0), &b, CandidateId(1)));
    }

    #[test]
    fn test_validate() {
        assert!(CompositionRules::default().validate().is_ok());
        assert!(CompositionRules::default().with_sub_category_cap(0).validate().is_err());
    }
}
