//! Formation strategies and the end-to-end pipeline.
//!
//! [`FormationStrategy`] is the capability interface
//! (`form_groups(pool, size) -> Assignment`); [`BalancedStrategy`] is the
//! default implementation wiring the categorizer, greedy allocator, and
//! local-search balancer together with a single seeded RNG.

mod balanced;
mod config;
mod types;

pub use balanced::{BalancedStrategy, FormationRun};
pub use config::FormationConfig;
pub use types::{validate_request, FormationStrategy};
