//! Category buckets produced by the categorizer.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{CandidateId, Category};

/// Candidates grouped by [`Category`], each bucket in shuffled order.
///
/// The allocator drains buckets with [`Buckets::take`], so a candidate can
/// be drawn at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    buckets: [Vec<CandidateId>; 4],
}

impl Buckets {
    pub(crate) fn from_parts(buckets: [Vec<CandidateId>; 4]) -> Self {
        Self { buckets }
    }

    /// Members of one bucket in their current order.
    pub fn get(&self, category: Category) -> &[CandidateId] {
        &self.buckets[category.index()]
    }

    pub fn len(&self, category: Category) -> usize {
        self.buckets[category.index()].len()
    }

    /// Total candidates across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Removes and returns a whole bucket.
    pub fn take(&mut self, category: Category) -> Vec<CandidateId> {
        std::mem::take(&mut self.buckets[category.index()])
    }

    /// Bucket sizes.
    pub fn distribution(&self) -> BucketSizes {
        BucketSizes {
            primary: self.len(Category::Primary),
            mixed: self.len(Category::Mixed),
            secondary: self.len(Category::Secondary),
            unclassified: self.len(Category::Unclassified),
        }
    }
}

/// Per-category bucket sizes for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BucketSizes {
    pub primary: usize,
    pub mixed: usize,
    pub secondary: usize,
    pub unclassified: usize,
}

impl BucketSizes {
    pub fn total(&self) -> usize {
        self.primary + self.mixed + self.secondary + self.unclassified
    }
}

impl fmt::Display for BucketSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Primary (90-100): {}, Mixed (70-89): {}, Secondary (50-69): {}, Unclassified: {}",
            self.primary, self.mixed, self.secondary, self.unclassified
        )
    }
}
