//! Constrained group formation engine.
//!
//! Partitions a pool of scored candidates into fixed-size groups that
//! respect category quotas, a sub-category cap, and a functional-tag
//! diversity target, then balances mean skill across groups:
//!
//! - **Categorize**: bucket candidates by category and shuffle each bucket
//!   with a seeded RNG (optionally in parallel, with a sequential fallback).
//! - **Allocate**: fill groups round-robin, quota-bound categories first,
//!   then sweep leftovers into remaining capacity.
//! - **Balance**: pairwise-exchange local search over skill, sub-category
//!   variety, and tag diversity. Every exchange preserves group sizes and
//!   keeps quotas and the sub-category cap intact.
//! - **Report**: per-group classification, compliance issues, and skill
//!   statistics over the placed candidates.
//!
//! # Architecture
//!
//! Candidates live in a [`model::Pool`] arena and groups refer to them by
//! [`model::CandidateId`]. Each stage takes ownership of its input and
//! returns the next stage's input, so the pipeline is a straight line of
//! values. [`formation::FormationStrategy`] is the seam for alternative
//! heuristics; [`report::Reporter`] depends only on the pool and the
//! assignment.
//!
//! # Examples
//!
//! ```
//! use u_teamform::formation::{BalancedStrategy, FormationConfig};
//! use u_teamform::model::{Candidate, Pool};
//! use u_teamform::report::Reporter;
//!
//! let pool: Pool = (0u32..12)
//!     .map(|i| {
//!         let score = [95, 80, 60][(i % 3) as usize];
//!         Candidate::new(format!("P{i:03}"), format!("Player {i}"), i % 10 + 1, score, format!("game{}", i % 4), format!("role{}", i % 5))
//!     })
//!     .collect();
//!
//! let config = FormationConfig::default().with_seed(42);
//! let run = BalancedStrategy::new(config).run(&pool, 4).unwrap();
//! let report = Reporter::default().report(&pool, &run.assignment);
//!
//! assert_eq!(report.groups.len(), 3);
//! assert_eq!(report.placed, 12);
//! ```

pub mod allocate;
pub mod balance;
pub mod categorize;
pub mod error;
pub mod formation;
pub mod model;
pub mod report;
pub mod roster;
pub mod rules;

pub use error::{FormationError, Result};
