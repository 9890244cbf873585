//! # Mimicnet - Probabilistic Browser Fingerprint Synthesis
//!
//! Mimicnet samples internally consistent browser fingerprints from a
//! Bayesian attribute network: a DAG of attributes (browser, platform,
//! screen, GPU, locale, ...) whose conditional distributions encode which
//! combinations occur together in the wild.
//!
//! ## Architecture
//!
//! - **engine**: network graph, distributions, sampler, constraint
//!   resolution, online learning, probability queries, and an LRU cache
//! - **data**: static market-share tables and the default network builder
//! - **headers**: HTTP header assembly for a sampled fingerprint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mimicnet::{BrowserConstraint, FingerprintConstraints, FingerprintEngine};
//!
//! let mut engine = FingerprintEngine::from_seed(42)?;
//! let constraints = FingerprintConstraints::new()
//!     .browser(BrowserConstraint::named("chrome").with_min(120))
//!     .device_type("desktop");
//! let fingerprint = engine.sample(&constraints)?;
//! assert_eq!(fingerprint.browser.name, "chrome");
//! ```

#![forbid(unsafe_code)]

pub mod data;
pub mod engine;
pub mod headers;

pub use engine::assemble::{
    BrowserInfo, DeviceInfo, Fingerprint, ScreenInfo, TimezoneInfo,
};
pub use engine::cache::SampleCache;
pub use engine::constraints::{BrowserConstraint, FingerprintConstraints};
pub use engine::distribution::{AttrValue, Distribution};
pub use engine::errors::EngineError;
pub use engine::graph::{AttributeNetwork, NetworkDefinition, NetworkStatistics};
pub use engine::sampler::Evidence;

use std::time::Instant;

use engine::rng::SampleRng;
use engine::{assemble, constraints, learner, query, sampler};

/// Seeded fingerprint generator over an attribute network.
///
/// Holds the network and a single rng stream; every operation that samples
/// or updates takes `&mut self`, so one engine serializes its generation
/// and learning passes. Engines with independent seeds are independent and
/// may run on separate threads.
pub struct FingerprintEngine {
    network: AttributeNetwork,
    rng: SampleRng,
}

impl FingerprintEngine {
    /// Engine over the built-in default network.
    pub fn from_seed(seed: u64) -> Result<Self, EngineError> {
        Self::with_network(data::default_network()?, seed)
    }

    /// Engine over a caller-supplied network.
    ///
    /// The network is validated up front: a cyclic graph fails here with
    /// [`EngineError::Cycle`] rather than at first sample.
    pub fn with_network(mut network: AttributeNetwork, seed: u64) -> Result<Self, EngineError> {
        network.topological_order()?;
        Ok(Self {
            network,
            rng: SampleRng::from_seed(seed),
        })
    }

    /// Samples one fingerprint satisfying `constraints`.
    ///
    /// Advances the engine's rng stream; two engines created from the same
    /// seed produce identical fingerprints for identical call sequences
    /// (`created_at` and `generation_millis` excepted).
    pub fn sample(
        &mut self,
        constraints: &FingerprintConstraints,
    ) -> Result<Fingerprint, EngineError> {
        let started = Instant::now();
        let filters = constraints::resolve(constraints)?;
        let order = self.network.topological_order()?;
        let outcome = sampler::sample_evidence(&self.network, &order, &filters, &mut self.rng)?;
        let generation_millis = started.elapsed().as_secs_f64() * 1_000.0;
        assemble::assemble(&outcome.evidence, outcome.fallbacks, generation_millis)
    }

    /// Like [`sample`](Self::sample), but consults `cache` first.
    ///
    /// Constraint sets are keyed by their canonical form, so field order
    /// does not matter. A hit returns the cached fingerprint without
    /// touching the rng; a miss samples, stores, and returns.
    pub fn sample_cached(
        &mut self,
        constraints: &FingerprintConstraints,
        cache: &mut SampleCache,
    ) -> Result<Fingerprint, EngineError> {
        if let Some(hit) = cache.get(constraints) {
            return Ok(hit);
        }
        let fingerprint = self.sample(constraints)?;
        cache.insert(constraints, fingerprint.clone());
        Ok(fingerprint)
    }

    /// Reinforces the network toward the attribute combinations seen in
    /// `observations`. Weight vectors stay normalized; unseen categorical
    /// values are admitted as new low-weight categories.
    pub fn learn(&mut self, observations: &[Fingerprint]) {
        learner::learn(&mut self.network, observations);
    }

    /// Probability-like score for `value` at `node_name` given partial
    /// parent evidence. See [`engine::query::probability`].
    pub fn probability(
        &self,
        node_name: &str,
        value: &AttrValue,
        evidence: &Evidence,
    ) -> Result<f64, EngineError> {
        query::probability(&self.network, node_name, value, evidence)
    }

    /// Structural summary of the current network.
    pub fn statistics(&self) -> NetworkStatistics {
        self.network.statistics()
    }

    /// Read access to the underlying network.
    pub fn network(&self) -> &AttributeNetwork {
        &self.network
    }
}
