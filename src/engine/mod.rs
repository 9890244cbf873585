//! The probabilistic sampling engine.
//!
//! - **errors**: typed failure taxonomy
//! - **rng**: deterministic seeded randomness source
//! - **distribution**: categorical / gaussian / conditional sum type
//! - **graph**: attribute network and topological scheduler
//! - **constraints**: caller constraints and per-node filter resolution
//! - **sampler**: dependency-order sampling pass
//! - **assemble**: evidence map to fingerprint record
//! - **learner**: online distribution updates
//! - **query**: conditional-probability evidence queries
//! - **cache**: bounded LRU for repeated identical requests

pub mod assemble;
pub mod cache;
pub mod constraints;
pub mod distribution;
pub mod errors;
pub mod graph;
pub mod learner;
pub mod query;
pub mod rng;
pub mod sampler;
