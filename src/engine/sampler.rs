//! The sampling pass: walks the topological order and draws one coherent
//! attribute vector.
//!
//! Per node the pass 1) builds the condition key from the parents'
//! already-sampled values, 2) resolves the effective distribution
//! (conditional lookup, default on miss), 3) narrows the support by the
//! node's filter, 4) draws, and 5) records the value in the evidence map.
//!
//! A filter that empties a node's support is never an error: the node
//! falls back to the caller's full allowed set reweighted uniformly, and
//! the fingerprint's quality score carries the discount. That keeps batch
//! generation robust against over-tight constraint combinations.

use std::collections::BTreeMap;

use crate::engine::constraints::{NodeFilter, NodeFilters, VersionRange};
use crate::engine::distribution::{condition_key, AttrValue, Categorical, Distribution};
use crate::engine::errors::EngineError;
use crate::engine::graph::AttributeNetwork;
use crate::engine::rng::SampleRng;

/// The evidence map: node name to sampled value. Owned by one sampling
/// pass, append-only while it runs, discarded after assembly.
pub type Evidence = BTreeMap<String, AttrValue>;

/// Result of one pass: the full evidence map plus how many constraint
/// fallbacks were taken (feeds the quality score).
#[derive(Debug)]
pub struct SampleOutcome {
    pub evidence: Evidence,
    pub fallbacks: u32,
}

/// Integer prefix of a version string: `"131.0.6778.85"` → 131.
pub fn major_of(version: &str) -> u32 {
    let digits: String = version.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Samples a full evidence map in dependency order.
///
/// The only side effect is advancing `rng`; the network is read-only for
/// the whole pass. Identical seed and identical constraints produce an
/// identical evidence map.
pub fn sample_evidence(
    network: &AttributeNetwork,
    order: &[String],
    filters: &NodeFilters,
    rng: &mut SampleRng,
) -> Result<SampleOutcome, EngineError> {
    let mut evidence = Evidence::new();
    let mut fallbacks = 0u32;

    for name in order {
        let node = network
            .node(name)
            .ok_or_else(|| EngineError::UnknownNode(name.clone()))?;
        let key = condition_key(&node.parents, &evidence);
        let effective = node.distribution.effective(key.as_deref());

        let value = match effective {
            Distribution::Categorical(categorical) => match filters.get(name.as_str()) {
                None => categorical.sample(rng),
                Some(NodeFilter::Allow(allowed)) => {
                    draw_allowed(categorical, allowed, rng, &mut fallbacks)
                }
                Some(NodeFilter::VersionRanges(ranges)) => {
                    draw_versioned(categorical, ranges, &evidence, rng, &mut fallbacks)
                }
            },
            Distribution::Gaussian(gaussian) => gaussian.sample(rng),
            Distribution::Conditional(_) => {
                // effective() descends conditionals to a leaf.
                unreachable!("effective distribution is never conditional")
            }
        };

        evidence.insert(name.clone(), value);
    }

    Ok(SampleOutcome { evidence, fallbacks })
}

/// Draws from the intersection of the distribution's support and the
/// allowed set, weights renormalized implicitly by the cumulative scan.
/// An empty intersection falls back to the full allowed set reweighted
/// uniformly and counts one fallback.
fn draw_allowed(
    categorical: &Categorical,
    allowed: &[String],
    rng: &mut SampleRng,
    fallbacks: &mut u32,
) -> AttrValue {
    let mut values: Vec<&str> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for (value, weight) in categorical.values().iter().zip(categorical.weights()) {
        if allowed.iter().any(|a| a == value) && *weight > 0.0 {
            values.push(value);
            weights.push(*weight);
        }
    }
    if values.is_empty() {
        *fallbacks += 1;
        let i = rng.pick_index(&vec![1.0; allowed.len()]);
        return AttrValue::Text(allowed[i].clone());
    }
    let i = rng.pick_index(&weights);
    AttrValue::Text(values[i].to_string())
}

/// Applies the major-version window for the already-sampled browser.
///
/// In-range versions keep their original weights (renormalized by the
/// scan). When nothing is in range, the declared version nearest a range
/// boundary is chosen deterministically — smallest boundary distance,
/// ties to the smaller major, then the lexicographically smaller string —
/// and counts one fallback.
fn draw_versioned(
    categorical: &Categorical,
    ranges: &rustc_hash::FxHashMap<String, VersionRange>,
    evidence: &Evidence,
    rng: &mut SampleRng,
    fallbacks: &mut u32,
) -> AttrValue {
    let browser = evidence
        .get(crate::data::NODE_BROWSER)
        .and_then(|v| v.as_text());
    let range = match browser.and_then(|b| ranges.get(b)) {
        Some(range) => range,
        None => return categorical.sample(rng),
    };

    let mut values: Vec<&str> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for (value, weight) in categorical.values().iter().zip(categorical.weights()) {
        if range.contains(major_of(value)) && *weight > 0.0 {
            values.push(value);
            weights.push(*weight);
        }
    }
    if values.is_empty() {
        *fallbacks += 1;
        let nearest = categorical
            .values()
            .iter()
            .min_by(|a, b| {
                let (da, db) = (
                    range.boundary_distance(major_of(a)),
                    range.boundary_distance(major_of(b)),
                );
                da.cmp(&db)
                    .then(major_of(a).cmp(&major_of(b)))
                    .then(a.cmp(b))
            })
            .expect("categorical support is never empty");
        return AttrValue::Text(nearest.clone());
    }
    let i = rng.pick_index(&weights);
    AttrValue::Text(values[i].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constraints::NodeFilter;
    use crate::engine::graph::NodeKind;
    use rustc_hash::FxHashMap;

    fn network_with_versions() -> AttributeNetwork {
        let mut network = AttributeNetwork::new();
        network
            .add_node(
                crate::data::NODE_BROWSER,
                NodeKind::Categorical,
                &[],
                Distribution::Categorical(
                    Categorical::new(vec!["chrome".into()], vec![1.0]).unwrap(),
                ),
            )
            .unwrap();
        network
            .add_node(
                crate::data::NODE_BROWSER_VERSION,
                NodeKind::Categorical,
                &[crate::data::NODE_BROWSER],
                Distribution::Categorical(
                    Categorical::new(
                        vec!["127.0.0.0".into(), "128.0.0.0".into(), "131.0.0.0".into()],
                        vec![0.2, 0.3, 0.5],
                    )
                    .unwrap(),
                ),
            )
            .unwrap();
        network
    }

    #[test]
    fn major_prefix_parse() {
        assert_eq!(major_of("131.0.6778.85"), 131);
        assert_eq!(major_of("17.5"), 17);
        assert_eq!(major_of("nonsense"), 0);
    }

    #[test]
    fn version_window_restricts_draws() {
        let mut network = network_with_versions();
        let order = network.topological_order().unwrap();
        let mut ranges = FxHashMap::default();
        ranges.insert(
            "chrome".to_string(),
            VersionRange {
                min: Some(128),
                max: Some(128),
            },
        );
        let mut filters = NodeFilters::default();
        filters.insert(
            crate::data::NODE_BROWSER_VERSION.to_string(),
            NodeFilter::VersionRanges(ranges),
        );
        let mut rng = SampleRng::from_seed(3);
        for _ in 0..200 {
            let outcome = sample_evidence(&network, &order, &filters, &mut rng).unwrap();
            assert_eq!(
                outcome.evidence[crate::data::NODE_BROWSER_VERSION],
                AttrValue::text("128.0.0.0")
            );
            assert_eq!(outcome.fallbacks, 0);
        }
    }

    #[test]
    fn empty_version_window_picks_nearest_boundary() {
        let mut network = network_with_versions();
        let order = network.topological_order().unwrap();
        let mut ranges = FxHashMap::default();
        ranges.insert(
            "chrome".to_string(),
            VersionRange {
                min: Some(200),
                max: Some(210),
            },
        );
        let mut filters = NodeFilters::default();
        filters.insert(
            crate::data::NODE_BROWSER_VERSION.to_string(),
            NodeFilter::VersionRanges(ranges),
        );
        let mut rng = SampleRng::from_seed(3);
        let outcome = sample_evidence(&network, &order, &filters, &mut rng).unwrap();
        // 131 is closest to the 200 boundary.
        assert_eq!(
            outcome.evidence[crate::data::NODE_BROWSER_VERSION],
            AttrValue::text("131.0.0.0")
        );
        assert_eq!(outcome.fallbacks, 1);
    }

    #[test]
    fn empty_allow_intersection_falls_back_uniformly() {
        let mut network = network_with_versions();
        let order = network.topological_order().unwrap();
        let mut filters = NodeFilters::default();
        filters.insert(
            crate::data::NODE_BROWSER.to_string(),
            NodeFilter::Allow(vec!["firefox".to_string()]),
        );
        let mut rng = SampleRng::from_seed(5);
        let outcome = sample_evidence(&network, &order, &filters, &mut rng).unwrap();
        assert_eq!(
            outcome.evidence[crate::data::NODE_BROWSER],
            AttrValue::text("firefox")
        );
        assert_eq!(outcome.fallbacks, 1);
    }
}
