//! Probability distributions attached to network nodes.
//!
//! A node's distribution is one of three closed variants:
//!
//! - **Categorical**: weighted discrete string values
//! - **Gaussian**: mean/variance with an explicit per-node clamp
//! - **Conditional**: nested distributions selected by a condition key
//!   built from the node's parents' sampled values, with a default used
//!   when no key matches
//!
//! Every consumer (sampler, evidence query, learner) matches exhaustively,
//! so adding a distribution kind is a compile-time-checked change.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::EngineError;
use crate::engine::rng::SampleRng;

/// Tolerance for categorical weight normalization checks.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weight added to an observed categorical value by one learning step.
pub const LEARNING_INCREMENT: f64 = 0.05;

/// Pseudo-observation count behind a Gaussian prior. Streaming updates
/// treat the declared mean/variance as this many prior observations, so a
/// single outlier cannot drag a table-derived prior far.
pub const PRIOR_PSEUDO_OBSERVATIONS: f64 = 25.0;

/// A sampled attribute value.
///
/// The evidence map is fixed-schema (keyed by the graph's node names) and
/// its values are this closed sum type rather than an open dynamic value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttrValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Text(_) => None,
            AttrValue::Number(n) => Some(*n),
        }
    }

    /// Canonical string form, used in condition keys and the content hash.
    /// Integral numbers print without a fractional part so that rounded
    /// Gaussian draws and integer literals map to the same key.
    pub fn canonical(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n:.6}")
                }
            }
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Builds the canonical condition key for a set of parent observations.
///
/// Pairs are sorted by parent name and joined as `name=value|name=value`,
/// so the key is order-independent with respect to how evidence was
/// accumulated. Returns `None` when any parent has no recorded value yet;
/// the caller then uses the conditional's default distribution.
pub fn condition_key(
    parents: &[String],
    evidence: &BTreeMap<String, AttrValue>,
) -> Option<String> {
    if parents.is_empty() {
        return None;
    }
    let mut pairs = Vec::with_capacity(parents.len());
    for parent in parents {
        let value = evidence.get(parent)?;
        pairs.push((parent.as_str(), value.canonical()));
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    Some(
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// Weighted discrete distribution over string values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Categorical {
    values: Vec<String>,
    weights: Vec<f64>,
}

impl Categorical {
    /// Creates a categorical distribution, validating that weights are
    /// non-negative, match the value list, and sum to 1 within tolerance.
    pub fn new(values: Vec<String>, weights: Vec<f64>) -> Result<Self, EngineError> {
        let dist = Self { values, weights };
        dist.validate()?;
        Ok(dist)
    }

    /// Creates a categorical distribution from raw non-negative weights,
    /// normalizing them to sum to 1.
    pub fn normalized(values: Vec<String>, raw_weights: Vec<f64>) -> Result<Self, EngineError> {
        if values.len() != raw_weights.len() {
            return Err(EngineError::Graph(format!(
                "categorical has {} values but {} weights",
                values.len(),
                raw_weights.len()
            )));
        }
        if raw_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::Graph(
                "categorical weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = raw_weights.iter().sum();
        if total <= 0.0 {
            return Err(EngineError::Graph(
                "categorical weights must have positive total".to_string(),
            ));
        }
        let weights = raw_weights.iter().map(|w| w / total).collect();
        Ok(Self { values, weights })
    }

    /// Uniform distribution over the given values.
    pub fn uniform(values: Vec<String>) -> Result<Self, EngineError> {
        let n = values.len();
        if n == 0 {
            return Err(EngineError::Graph(
                "categorical requires at least one value".to_string(),
            ));
        }
        let weights = vec![1.0 / n as f64; n];
        Ok(Self { values, weights })
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.values.is_empty() {
            return Err(EngineError::Graph(
                "categorical requires at least one value".to_string(),
            ));
        }
        if self.values.len() != self.weights.len() {
            return Err(EngineError::Graph(format!(
                "categorical has {} values but {} weights",
                self.values.len(),
                self.weights.len()
            )));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::Graph(
                "categorical weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = self.weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::Graph(format!(
                "categorical weights sum to {total}, expected 1.0"
            )));
        }
        Ok(())
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of one value; 0 when the value is outside the domain.
    pub fn weight_of(&self, value: &str) -> f64 {
        self.values
            .iter()
            .position(|v| v == value)
            .map(|i| self.weights[i])
            .unwrap_or(0.0)
    }

    pub fn sample(&self, rng: &mut SampleRng) -> AttrValue {
        let i = rng.pick_index(&self.weights);
        AttrValue::Text(self.values[i].clone())
    }

    /// One online-learning step: adds [`LEARNING_INCREMENT`] to the
    /// observed value's weight and renormalizes.
    ///
    /// A value outside the declared domain is admitted as a new category
    /// with one increment of weight. The new weight vector is built in
    /// full and swapped in, so a concurrent-looking reader sequenced
    /// after this call never observes a half-renormalized state.
    pub fn reinforce(&mut self, value: &str) {
        let mut values = self.values.clone();
        let mut weights = self.weights.clone();
        match values.iter().position(|v| v == value) {
            Some(i) => weights[i] += LEARNING_INCREMENT,
            None => {
                values.push(value.to_string());
                weights.push(LEARNING_INCREMENT);
            }
        }
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        self.values = values;
        self.weights = weights;
    }
}

/// Explicit clamp applied to every Gaussian draw for a numeric node.
///
/// Rounding and range clamping are declared here, per node, rather than
/// decided ad hoc at call sites: a hardware-concurrency node rounds and
/// floors at its minimum, a count node floors at zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NumericClamp {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub round: bool,
}

impl NumericClamp {
    pub fn apply(&self, raw: f64) -> f64 {
        let mut value = raw;
        if self.round {
            value = value.round();
        }
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }
}

/// Gaussian distribution for numeric attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gaussian {
    pub mean: f64,
    pub variance: f64,
    #[serde(default)]
    pub clamp: NumericClamp,
    /// Observations folded in by the online learner. The declared
    /// mean/variance count as [`PRIOR_PSEUDO_OBSERVATIONS`] on top.
    #[serde(default)]
    pub observations: u64,
}

impl Gaussian {
    pub fn new(mean: f64, variance: f64, clamp: NumericClamp) -> Result<Self, EngineError> {
        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(EngineError::Graph(format!(
                "gaussian requires finite mean and non-negative variance, got N({mean}, {variance})"
            )));
        }
        Ok(Self {
            mean,
            variance,
            clamp,
            observations: 0,
        })
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.mean.is_finite() || !self.variance.is_finite() || self.variance < 0.0 {
            return Err(EngineError::Graph(format!(
                "gaussian requires finite mean and non-negative variance, got N({}, {})",
                self.mean, self.variance
            )));
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut SampleRng) -> AttrValue {
        let raw = rng.gaussian(self.mean, self.variance.sqrt());
        AttrValue::Number(self.clamp.apply(raw))
    }

    /// Normal density at `x`, clamped to `[0, 1]` so it can serve as the
    /// evidence query's probability-like score for numeric nodes.
    pub fn density(&self, x: f64) -> f64 {
        let variance = self.variance.max(1e-12);
        let exponent = -(x - self.mean).powi(2) / (2.0 * variance);
        let density = exponent.exp() / (2.0 * std::f64::consts::PI * variance).sqrt();
        density.min(1.0)
    }

    /// Streaming moment update (Welford) with the prior treated as
    /// [`PRIOR_PSEUDO_OBSERVATIONS`] pseudo-observations:
    ///
    /// ```text
    /// n      = pseudo + observations + 1
    /// μ_new  = μ + (x - μ) / n
    /// σ²_new = ((n - 1)·σ² + (x - μ)·(x - μ_new)) / n
    /// ```
    pub fn observe(&mut self, x: f64) {
        if !x.is_finite() {
            return;
        }
        let n = PRIOR_PSEUDO_OBSERVATIONS + self.observations as f64 + 1.0;
        let delta = x - self.mean;
        let new_mean = self.mean + delta / n;
        self.variance = ((n - 1.0) * self.variance + delta * (x - new_mean)) / n;
        self.variance = self.variance.max(0.0);
        self.mean = new_mean;
        self.observations += 1;
    }
}

/// Conditional distribution: a mapping from condition keys to nested
/// distributions, plus a default used when no key matches the evidence.
///
/// Cases live in a `BTreeMap` so iteration, serialization, and statistics
/// derived from them are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditional {
    pub cases: BTreeMap<String, Distribution>,
    pub default: Box<Distribution>,
}

/// A node's probability distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Distribution {
    Categorical(Categorical),
    Gaussian(Gaussian),
    Conditional(Conditional),
}

impl Distribution {
    /// Validates the distribution tree. Deserialized definitions bypass
    /// the checked constructors, so the network loader calls this on
    /// every node before accepting a definition.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self {
            Distribution::Categorical(c) => c.validate(),
            Distribution::Gaussian(g) => g.validate(),
            Distribution::Conditional(c) => {
                for nested in c.cases.values() {
                    nested.validate()?;
                }
                c.default.validate()
            }
        }
    }

    /// Resolves the effective (non-conditional) distribution for a
    /// condition key, descending through nested conditionals. A `None`
    /// key or a lookup miss selects the default branch.
    pub fn effective(&self, key: Option<&str>) -> &Distribution {
        let mut current = self;
        loop {
            match current {
                Distribution::Conditional(c) => {
                    current = match key.and_then(|k| c.cases.get(k)) {
                        Some(nested) => nested,
                        None => &c.default,
                    };
                }
                _ => return current,
            }
        }
    }

    /// Mutable counterpart of [`effective`](Self::effective), used by the
    /// online learner to update the exact distribution the sampler would
    /// have consulted for the same evidence.
    pub fn effective_mut(&mut self, key: Option<&str>) -> &mut Distribution {
        let mut current = self;
        loop {
            match current {
                Distribution::Conditional(c) => {
                    current = match key.and_then(|k| c.cases.get_mut(k)) {
                        Some(nested) => nested,
                        None => &mut c.default,
                    };
                }
                _ => return current,
            }
        }
    }

    /// Union of all categorical values reachable anywhere in the tree.
    /// Sorted and deduplicated, so callers get deterministic output.
    pub fn support(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_support(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_support(&self, out: &mut Vec<String>) {
        match self {
            Distribution::Categorical(c) => out.extend(c.values().iter().cloned()),
            Distribution::Gaussian(_) => {}
            Distribution::Conditional(c) => {
                for nested in c.cases.values() {
                    nested.collect_support(out);
                }
                c.default.collect_support(out);
            }
        }
    }
}
