//! Online learning: folds observed fingerprints back into the network.
//!
//! Each observation is decomposed into the same node-name → value pairs
//! the network defines (features the network has no node for are skipped).
//! Categorical nodes get a fixed-increment weight reinforcement on the
//! condition-key-scoped distribution the sampler would have consulted for
//! that evidence; numeric nodes get a streaming moment update. Topology is
//! never touched, so the memoized sampling order stays valid across any
//! number of updates.

use crate::engine::assemble::{to_evidence, Fingerprint};
use crate::engine::distribution::{condition_key, Distribution};
use crate::engine::graph::AttributeNetwork;

/// Applies a batch of observed fingerprints to the network's
/// distributions.
///
/// Each per-node update builds its replacement weight vector in full
/// before swapping it in, so a sampling call sequenced after this one
/// never sees a partially renormalized distribution.
pub fn learn(network: &mut AttributeNetwork, observations: &[Fingerprint]) {
    for fingerprint in observations {
        let evidence = to_evidence(fingerprint);
        for (name, value) in &evidence {
            let parents = match network.node(name) {
                Some(node) => node.parents.clone(),
                None => continue,
            };
            let key = condition_key(&parents, &evidence);
            let node = network
                .node_mut(name)
                .expect("node presence checked above");
            match node.distribution.effective_mut(key.as_deref()) {
                Distribution::Categorical(categorical) => {
                    categorical.reinforce(&value.canonical());
                }
                Distribution::Gaussian(gaussian) => {
                    if let Some(x) = value.as_number() {
                        gaussian.observe(x);
                    }
                }
                Distribution::Conditional(_) => {
                    unreachable!("effective distribution is never conditional")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_network;
    use crate::engine::distribution::{AttrValue, WEIGHT_SUM_TOLERANCE};
    use crate::engine::query::probability;
    use crate::engine::sampler::Evidence;

    fn sample_fingerprint() -> Fingerprint {
        let mut engine = crate::FingerprintEngine::from_seed(11).unwrap();
        engine.sample(&Default::default()).unwrap()
    }

    #[test]
    fn reinforcement_targets_condition_scoped_distribution() {
        let mut network = default_network().unwrap();
        let mut observed = sample_fingerprint();
        observed.device.touch_support = true;

        for _ in 0..200 {
            learn(&mut network, &[observed.clone()]);
        }

        let mut evidence = Evidence::new();
        evidence.insert(
            crate::data::NODE_DEVICE_TYPE.to_string(),
            AttrValue::text(&observed.device.device_type),
        );
        let p = probability(
            &network,
            crate::data::NODE_TOUCH_SUPPORT,
            &AttrValue::text("true"),
            &evidence,
        )
        .unwrap();
        assert!(p > 0.9, "touch_support probability after learning: {p}");
    }

    #[test]
    fn weights_stay_normalized_after_learning() {
        let mut network = default_network().unwrap();
        let observed = sample_fingerprint();
        learn(&mut network, &vec![observed; 100]);

        let node = network.node(crate::data::NODE_BROWSER).unwrap();
        if let Distribution::Categorical(categorical) = &node.distribution {
            let total: f64 = categorical.weights().iter().sum();
            assert!((total - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        } else {
            panic!("browser node must be categorical");
        }
    }

    #[test]
    fn gaussian_node_tracks_observed_mean() {
        let mut network = default_network().unwrap();
        let mut observed = sample_fingerprint();
        observed.cookie_count = 120;
        learn(&mut network, &vec![observed; 5000]);

        let node = network.node(crate::data::NODE_COOKIE_COUNT).unwrap();
        if let Distribution::Gaussian(gaussian) = &node.distribution {
            assert!(
                (gaussian.mean - 120.0).abs() < 2.0,
                "mean after learning: {}",
                gaussian.mean
            );
        } else {
            panic!("cookie_count node must be gaussian");
        }
    }
}
