//! Candidates, categories, and the candidate arena.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quota-bound classification derived from a candidate's aggregate score.
///
/// | Score range | Category       | Allocation role            |
/// |-------------|----------------|----------------------------|
/// | 90–100      | `Primary`      | quota-bound, leader-like   |
/// | 70–89       | `Mixed`        | unconstrained filler       |
/// | 50–69       | `Secondary`    | bounded, thinker-like      |
/// | otherwise   | `Unclassified` | catch-all, gap sweep only  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// Leader-equivalent category; at most one per group by default.
    Primary,
    /// Balanced category used to fill the remaining seats.
    Mixed,
    /// Second bounded category; at most two per group by default.
    Secondary,
    /// Catch-all for missing or out-of-range classifications.
    Unclassified,
}

impl Category {
    /// All categories in bucket order.
    pub const ALL: [Category; 4] = [
        Category::Primary,
        Category::Mixed,
        Category::Secondary,
        Category::Unclassified,
    ];

    /// Classifies an aggregate score.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_teamform::model::Category;
    ///
    /// assert_eq!(Category::from_score(95), Category::Primary);
    /// assert_eq!(Category::from_score(89), Category::Mixed);
    /// assert_eq!(Category::from_score(50), Category::Secondary);
    /// assert_eq!(Category::from_score(12), Category::Unclassified);
    /// ```
    pub fn from_score(score: u32) -> Self {
        match score {
            90..=100 => Category::Primary,
            70..=89 => Category::Mixed,
            50..=69 => Category::Secondary,
            _ => Category::Unclassified,
        }
    }

    /// Parses a category label, coercing anything unknown to `Unclassified`.
    ///
    /// Accepts both the category names and the personality labels used by
    /// roster files (`Leader`, `Balanced`, `Thinker`), case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "primary" | "leader" => Category::Primary,
            "mixed" | "balanced" => Category::Mixed,
            "secondary" | "thinker" => Category::Secondary,
            _ => Category::Unclassified,
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Primary => 0,
            Category::Mixed => 1,
            Category::Secondary => 2,
            Category::Unclassified => 3,
        }
    }

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Primary => "Primary",
            Category::Mixed => "Mixed",
            Category::Secondary => "Secondary",
            Category::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored individual to be placed in a group.
///
/// Immutable once constructed: the engine only reads these fields and
/// moves candidates between group memberships by [`CandidateId`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    id: String,
    name: String,
    skill: u32,
    score: u32,
    category: Category,
    sub_category: String,
    functional_tag: String,
}

impl Candidate {
    /// Creates a candidate, deriving its category from `score`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        skill: u32,
        score: u32,
        sub_category: impl Into<String>,
        functional_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill,
            score,
            category: Category::from_score(score),
            sub_category: sub_category.into(),
            functional_tag: functional_tag.into(),
        }
    }

    /// Overrides the score-derived category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Skill level, 1–10 for roster-loaded candidates.
    pub fn skill(&self) -> u32 {
        self.skill
    }

    /// Aggregate score the category was derived from.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Preferred sub-category (e.g. game), subject to a per-group cap.
    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    /// Preferred functional tag (e.g. role), tracked for diversity.
    pub fn functional_tag(&self) -> &str {
        &self.functional_tag
    }
}

/// Index of a candidate inside a [`Pool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateId(pub usize);

impl CandidateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of candidates supplied by the caller.
///
/// Stages borrow the pool immutably and refer to candidates by
/// [`CandidateId`]; nothing in the engine creates or drops candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pool {
    candidates: Vec<Candidate>,
}

impl Pool {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id.0)
    }

    /// All ids in pool order.
    pub fn ids(&self) -> impl Iterator<Item = CandidateId> + '_ {
        (0..self.candidates.len()).map(CandidateId)
    }

    /// `(id, candidate)` pairs in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &Candidate)> + '_ {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (CandidateId(i), c))
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl From<Vec<Candidate>> for Pool {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates)
    }
}

impl FromIterator<Candidate> for Pool {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<CandidateId> for Pool {
    type Output = Candidate;

    fn index(&self, id: CandidateId) -> &Candidate {
        &self.candidates[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_score_boundaries() {
        assert_eq!(Category::from_score(100), Category::Primary);
        assert_eq!(Category::from_score(90), Category::Primary);
        assert_eq!(Category::from_score(89), Category::Mixed);
        assert_eq!(Category::from_score(70), Category::Mixed);
        assert_eq!(Category::from_score(69), Category::Secondary);
        assert_eq!(Category::from_score(50), Category::Secondary);
        assert_eq!(Category::from_score(49), Category::Unclassified);
        assert_eq!(Category::from_score(101), Category::Unclassified);
    }

    #[test]
    fn test_category_label_coercion() {
        assert_eq!(Category::from_label("Leader"), Category::Primary);
        assert_eq!(Category::from_label(" thinker "), Category::Secondary);
        assert_eq!(Category::from_label("Balanced"), Category::Mixed);
        assert_eq!(Category::from_label("Secondary"), Category::Secondary);
        assert_eq!(Category::from_label(""), Category::Unclassified);
        assert_eq!(Category::from_label("Wizard"), Category::Unclassified);
    }

    #[test]
    fn test_category_index_matches_all() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_candidate_derives_category() {
        let c = Candidate::new("P1", "Ada", 7, 92, "Chess", "Strategist");
        assert_eq!(c.category(), Category::Primary);
        assert_eq!(c.skill(), 7);
        assert_eq!(c.sub_category(), "Chess");
        assert_eq!(c.functional_tag(), "Strategist");

        let overridden = c.with_category(Category::Unclassified);
        assert_eq!(overridden.category(), Category::Unclassified);
        assert_eq!(overridden.score(), 92);
    }

    #[test]
    fn test_pool_indexing() {
        let pool: Pool = vec![
            Candidate::new("a", "A", 1, 95, "x", "r"),
            Candidate::new("b", "B", 2, 60, "y", "s"),
        ]
        .into_iter()
        .collect();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool[CandidateId(1)].id(), "b");
        assert!(pool.get(CandidateId(2)).is_none());
        assert_eq!(pool.ids().collect::<Vec<_>>(), vec![CandidateId(0), CandidateId(1)]);

        let ids: Vec<String> = pool.into_candidates().into_iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
