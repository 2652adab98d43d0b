//! Reporter: the final, read-only pipeline stage.
//!
//! Classifies each group as compliant or not, lists the rules it breaks,
//! and summarizes skill statistics. Fullness and compliance are reported
//! as separate values.

mod reporter;
mod types;

pub use reporter::Reporter;
pub use types::{GroupReport, Issue, Report, SkillStats};
