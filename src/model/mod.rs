//! Data model: candidates, the candidate pool, groups, and assignments.
//!
//! Candidates live in a [`Pool`] arena and are referred to by
//! [`CandidateId`]. Groups hold ids, never candidates, so moving a
//! candidate between groups is an index swap.

mod candidate;
mod group;

pub use candidate::{Candidate, CandidateId, Category, Pool};
pub use group::{Assignment, Group};
