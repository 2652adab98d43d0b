//! Local-Search Balancer: the third pipeline stage.
//!
//! Reduces cross-group disparity through single-for-single member
//! exchanges. Each pass is first-improvement with a bounded loop; the
//! balancer keeps the heuristic character of the stage and never
//! escalates to an exact solver.
//!
//! # References
//!
//! - Kernighan, B. W. & Lin, S. (1970). "An efficient heuristic procedure
//!   for partitioning graphs", *Bell System Technical Journal* 49(2).

mod config;
mod runner;
mod types;

pub use config::BalanceConfig;
pub use runner::{extreme_groups, Balancer};
pub use types::{BalanceOutcome, BalancePass, BalanceStats, Exchange, SkillOutcome};
