//! Conditional-probability queries against the network.
//!
//! Resolves a node's effective distribution with the same condition-key
//! logic the sampler uses, then scores a candidate value: categorical
//! weight (0 when the value is outside the domain), or a clamped Gaussian
//! density for numeric nodes.

use crate::engine::distribution::{condition_key, AttrValue, Distribution};
use crate::engine::errors::EngineError;
use crate::engine::graph::AttributeNetwork;
use crate::engine::sampler::Evidence;

/// Probability-like score in `[0, 1]` for `value` at `node_name` given
/// partial evidence.
///
/// Evidence may cover any subset of the node's parents; a subset that
/// cannot form a full condition key resolves to the default branch, same
/// as a sampling-time key miss. Evidence naming anything that is *not* a
/// parent of the node is caller error and fails with
/// [`EngineError::InvalidEvidence`].
pub fn probability(
    network: &AttributeNetwork,
    node_name: &str,
    value: &AttrValue,
    evidence: &Evidence,
) -> Result<f64, EngineError> {
    let node = network
        .node(node_name)
        .ok_or_else(|| EngineError::UnknownNode(node_name.to_string()))?;

    for key in evidence.keys() {
        if !node.parents.iter().any(|p| p == key) {
            return Err(EngineError::InvalidEvidence(format!(
                "'{key}' is not a parent of '{node_name}'"
            )));
        }
    }

    let key = condition_key(&node.parents, evidence);
    match node.distribution.effective(key.as_deref()) {
        Distribution::Categorical(categorical) => Ok(categorical.weight_of(&value.canonical())),
        Distribution::Gaussian(gaussian) => {
            let x = value.as_number().ok_or_else(|| {
                EngineError::InvalidEvidence(format!(
                    "node '{node_name}' is numeric but the queried value is text"
                ))
            })?;
            Ok(gaussian.density(x))
        }
        Distribution::Conditional(_) => {
            unreachable!("effective distribution is never conditional")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::distribution::Categorical;
    use crate::engine::graph::NodeKind;

    fn tiny_network() -> AttributeNetwork {
        let mut network = AttributeNetwork::new();
        network
            .add_node(
                "a",
                NodeKind::Categorical,
                &[],
                Distribution::Categorical(
                    Categorical::new(vec!["x".into(), "y".into()], vec![0.7, 0.3]).unwrap(),
                ),
            )
            .unwrap();
        network
    }

    #[test]
    fn weight_lookup_for_known_value() {
        let network = tiny_network();
        let p = probability(&network, "a", &AttrValue::text("x"), &Evidence::new()).unwrap();
        assert!((p - 0.7).abs() < 1e-12);
    }

    #[test]
    fn absent_value_scores_zero() {
        let network = tiny_network();
        let p = probability(&network, "a", &AttrValue::text("z"), &Evidence::new()).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn unknown_node_rejected() {
        let network = tiny_network();
        let err = probability(&network, "ghost", &AttrValue::text("x"), &Evidence::new());
        assert!(matches!(err, Err(EngineError::UnknownNode(_))));
    }

    #[test]
    fn non_parent_evidence_rejected() {
        let network = tiny_network();
        let mut evidence = Evidence::new();
        evidence.insert("b".to_string(), AttrValue::text("x"));
        let err = probability(&network, "a", &AttrValue::text("x"), &evidence);
        assert!(matches!(err, Err(EngineError::InvalidEvidence(_))));
    }
}
