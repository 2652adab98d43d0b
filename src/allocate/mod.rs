//! Greedy Allocator: the second pipeline stage.
//!
//! Seeds groups with quota-bound categories first, then fills with the
//! unconstrained category, then sweeps leftovers into open seats.

mod greedy;

pub use greedy::GreedyAllocator;
