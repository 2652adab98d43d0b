//! Groups and the assignment a run produces.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::candidate::{CandidateId, Pool};

/// A fixed-capacity set of candidates.
///
/// Members are kept in insertion order; the order is observable because
/// the balancer scans exchange pairs in it. The mean skill is cached and
/// recomputed on every membership change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    label: String,
    capacity: usize,
    members: Vec<CandidateId>,
    mean_skill: f64,
}

impl Group {
    /// Creates an empty group.
    pub fn new(label: impl Into<String>, capacity: usize) -> Self {
        Self {
            label: label.into(),
            capacity,
            members: Vec::with_capacity(capacity),
            mean_skill: 0.0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `true` when `len() == capacity()`.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Seats left before the group is full.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    pub fn members(&self) -> &[CandidateId] {
        &self.members
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.members.contains(&id)
    }

    /// Mean skill of the current members, 0.0 when empty.
    pub fn mean_skill(&self) -> f64 {
        self.mean_skill
    }

    /// Adds a member if there is room and it is not already present.
    ///
    /// Returns `false` when the group is full, already holds `id`, or `id`
    /// is not in `pool`.
    pub fn insert(&mut self, id: CandidateId, pool: &Pool) -> bool {
        if self.is_full() || self.contains(id) || pool.get(id).is_none() {
            return false;
        }
        self.members.push(id);
        self.recompute_mean(pool);
        true
    }

    /// Replaces `outgoing` with `incoming`.
    ///
    /// The outgoing member is removed and the incoming one appended.
    /// Returns `false` (and leaves the group untouched) when `outgoing` is
    /// not a member, `incoming` already is, or `incoming` is not in `pool`.
    pub(crate) fn replace(&mut self, outgoing: CandidateId, incoming: CandidateId, pool: &Pool) -> bool {
        if self.contains(incoming) || pool.get(incoming).is_none() {
            return false;
        }
        let Some(pos) = self.members.iter().position(|&m| m == outgoing) else {
            return false;
        };
        self.members.remove(pos);
        self.members.push(incoming);
        self.recompute_mean(pool);
        true
    }

    /// Mean skill the group would have if `outgoing` were swapped for `incoming`.
    pub fn mean_after_swap(&self, outgoing: CandidateId, incoming: CandidateId, pool: &Pool) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total = self.skill_total(pool) - skill_of(pool, outgoing) + skill_of(pool, incoming);
        total / self.members.len() as f64
    }

    fn skill_total(&self, pool: &Pool) -> f64 {
        self.members.iter().map(|&m| skill_of(pool, m)).sum()
    }

    fn recompute_mean(&mut self, pool: &Pool) {
        self.mean_skill = if self.members.is_empty() {
            0.0
        } else {
            self.skill_total(pool) / self.members.len() as f64
        };
    }
}

/// Skill of `id`, 0.0 for ids outside the pool.
fn skill_of(pool: &Pool, id: CandidateId) -> f64 {
    pool.get(id).map_or(0.0, |c| c.skill() as f64)
}

/// The output of a run: groups whose combined membership is a subset of
/// the pool, with no candidate in more than one group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    groups: Vec<Group>,
    group_size: usize,
}

impl Assignment {
    /// Creates `floor(pool_len / group_size)` empty groups labelled
    /// `Group-1`, `Group-2`, ...
    pub fn empty(pool_len: usize, group_size: usize) -> Self {
        let count = if group_size == 0 { 0 } else { pool_len / group_size };
        let groups = (0..count)
            .map(|i| Group::new(format!("Group-{}", i + 1), group_size))
            .collect();
        Self { groups, group_size }
    }

    /// Wraps pre-built groups.
    pub fn from_groups(groups: Vec<Group>, group_size: usize) -> Self {
        Self { groups, group_size }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of placed candidates.
    pub fn placed_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Whether every group is at capacity.
    pub fn all_full(&self) -> bool {
        self.groups.iter().all(Group::is_full)
    }

    /// Per-candidate placement: `Some(group index)` or `None` when unplaced.
    pub fn placement(&self, pool: &Pool) -> Vec<Option<usize>> {
        let mut placed = vec![None; pool.len()];
        for (gi, group) in self.groups.iter().enumerate() {
            for &m in group.members() {
                if let Some(slot) = placed.get_mut(m.index()) {
                    *slot = Some(gi);
                }
            }
        }
        placed
    }

    /// Pool members that ended up in no group, in pool order.
    pub fn unplaced(&self, pool: &Pool) -> Vec<CandidateId> {
        self.placement(pool)
            .into_iter()
            .enumerate()
            .filter(|(_, g)| g.is_none())
            .map(|(i, _)| CandidateId(i))
            .collect()
    }

    /// Swaps `out_a` (in group `a`) with `out_b` (in group `b`).
    ///
    /// Returns `false` without mutating anything if the indices are equal,
    /// out of range, or the members are not where the caller claims.
    pub fn exchange(
        &mut self,
        a: usize,
        out_a: CandidateId,
        b: usize,
        out_b: CandidateId,
        pool: &Pool,
    ) -> bool {
        if a == b || a >= self.groups.len() || b >= self.groups.len() {
            return false;
        }
        let (ga, gb) = (&self.groups[a], &self.groups[b]);
        if !ga.contains(out_a) || !gb.contains(out_b) || ga.contains(out_b) || gb.contains(out_a) {
            return false;
        }
        if pool.get(out_a).is_none() || pool.get(out_b).is_none() {
            return false;
        }
        self.groups[a].replace(out_a, out_b, pool) && self.groups[b].replace(out_b, out_a, pool)
    }
}
