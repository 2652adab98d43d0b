//! Report data structures.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rule a group breaks, or an informational condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Issue {
    /// More `Primary` members than the quota allows.
    TooManyPrimary { count: usize },
    /// More `Secondary` members than the quota allows.
    TooManySecondary { count: usize },
    /// One sub-category value held by more members than the cap.
    SubCategoryOverCap { value: String, count: usize },
    /// Fewer distinct functional tags than required.
    TooFewTags { distinct: usize },
    /// The group is below capacity. Informational; does not affect
    /// compliance.
    Underfilled { size: usize, capacity: usize },
}

impl Issue {
    /// Whether this issue makes a group non-compliant.
    pub fn breaks_rules(&self) -> bool {
        !matches!(self, Issue::Underfilled { .. })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::TooManyPrimary { count } => write!(f, "too many Primary members ({count})"),
            Issue::TooManySecondary { count } => write!(f, "too many Secondary members ({count})"),
            Issue::SubCategoryOverCap { value, count } => write!(f, "too many {value} players ({count})"),
            Issue::TooFewTags { distinct } => write!(f, "only {distinct} unique roles"),
            Issue::Underfilled { size, capacity } => write!(f, "underfilled ({size}/{capacity})"),
        }
    }
}

/// Classification and counts for one group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupReport {
    pub label: String,
    pub size: usize,
    pub capacity: usize,
    /// `size == capacity`, reported independently of `compliant`.
    pub full: bool,
    pub mean_skill: f64,
    pub primary: usize,
    pub mixed: usize,
    pub secondary: usize,
    pub unclassified: usize,
    /// Members per sub-category value.
    pub sub_categories: BTreeMap<String, usize>,
    pub distinct_tags: usize,
    /// Category quotas, sub-category cap, and tag diversity all hold.
    pub compliant: bool,
    pub issues: Vec<Issue>,
}

/// Aggregate statistics over the means of non-empty groups.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkillStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub spread: f64,
}

/// Result of [`Reporter::report`](super::Reporter::report).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    pub groups: Vec<GroupReport>,
    /// Indices of compliant groups, in group order.
    pub compliant: Vec<usize>,
    /// Indices of non-compliant groups, in group order.
    pub non_compliant: Vec<usize>,
    pub skill: SkillStats,
    /// Candidates placed in some group.
    pub placed: usize,
    /// Pool members left out of every group.
    pub unplaced: usize,
    /// Mean skill over placed candidates only.
    pub placed_mean_skill: f64,
}

impl Report {
    /// Share of compliant groups in `[0, 1]`; 0 when there are no groups.
    pub fn compliance_rate(&self) -> f64 {
        if self.groups.is_empty() {
            0.0
        } else {
            self.compliant.len() as f64 / self.groups.len() as f64
        }
    }

    /// Whether every group is at capacity.
    pub fn all_full(&self) -> bool {
        self.groups.iter().all(|g| g.full)
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.compliant { "VALID" } else { "INVALID" };
        writeln!(
            f,
            "{status} | {} | Avg Skill: {:.1} | Size: {}/{}",
            self.label, self.mean_skill, self.size, self.capacity
        )?;
        writeln!(
            f,
            "  Categories: Primary={}, Secondary={}, Mixed={}, Unclassified={}",
            self.primary, self.secondary, self.mixed, self.unclassified
        )?;
        writeln!(f, "  Roles: {} unique", self.distinct_tags)?;
        let games: Vec<String> = self
            .sub_categories
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        writeln!(f, "  Games: {}", games.join(", "))?;
        if !self.issues.is_empty() {
            let issues: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
            writeln!(f, "  Issues: {}", issues.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(72);
        writeln!(f, "{rule}")?;
        writeln!(f, "GROUP FORMATION RESULTS")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\nCompliant groups ({}):", self.compliant.len())?;
        for &i in &self.compliant {
            write!(f, "{}", self.groups[i])?;
        }
        writeln!(f, "\nNon-compliant groups ({}):", self.non_compliant.len())?;
        for &i in &self.non_compliant {
            write!(f, "{}", self.groups[i])?;
        }

        writeln!(f, "\n{rule}")?;
        writeln!(f, "Total groups: {}", self.groups.len())?;
        writeln!(f, "Compliance: {:.1}%", self.compliance_rate() * 100.0)?;
        writeln!(
            f,
            "Skill: mean {:.1}, range {:.1} - {:.1}, spread {:.2}",
            self.skill.mean, self.skill.min, self.skill.max, self.skill.spread
        )?;
        writeln!(f, "Placed: {} | Unplaced: {}", self.placed, self.unplaced)
    }
}
