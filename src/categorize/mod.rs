//! Categorizer: the first pipeline stage.
//!
//! Partitions the candidate pool into [`Category`](crate::model::Category)
//! buckets in linear time and shuffles each bucket uniformly with an
//! explicitly seeded RNG, so repeated runs on the same pool give different
//! but statistically fair compositions while tests stay reproducible.

mod buckets;
mod config;
mod runner;

pub use buckets::{BucketSizes, Buckets};
pub use config::CategorizeConfig;
pub use runner::Categorizer;
