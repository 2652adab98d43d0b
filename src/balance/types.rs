//! Exchange records and balancing statistics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{Assignment, CandidateId};

/// Which balancing pass committed an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BalancePass {
    Skill,
    Variety,
    Diversity,
}

/// A committed one-for-one swap: `out_a` left group `group_a` for
/// `group_b`, and `out_b` went the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Exchange {
    pub pass: BalancePass,
    pub group_a: usize,
    pub out_a: CandidateId,
    pub group_b: usize,
    pub out_b: CandidateId,
}

/// Result of the skill-level pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkillOutcome {
    /// Loop iterations executed, including the one that detected convergence.
    pub iterations: usize,
    /// `true` when the pass stopped because the gap fell below the
    /// threshold or no improving valid exchange remained; `false` when it
    /// hit the iteration cap.
    pub converged: bool,
    /// Exchanges committed.
    pub exchanges: usize,
}

/// Counters for a whole balancing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BalanceStats {
    pub skill: SkillOutcome,
    pub variety_exchanges: usize,
    pub diversity_exchanges: usize,
}

impl BalanceStats {
    pub fn total_exchanges(&self) -> usize {
        self.skill.exchanges + self.variety_exchanges + self.diversity_exchanges
    }
}

/// Output of [`Balancer::balance`](super::Balancer::balance).
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// The balanced assignment.
    pub assignment: Assignment,
    /// Every committed exchange, in commit order.
    pub exchanges: Vec<Exchange>,
    pub stats: BalanceStats,
}
