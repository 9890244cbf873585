//! The attribute network: a DAG of distribution-bearing nodes.
//!
//! Nodes are identified by name. Edges are derived from each node's parent
//! list; the network keeps the mirrored child lists consistent so an edge
//! appears in exactly one `parents` entry and one `children` entry. The
//! sampling order is computed by Kahn's algorithm and memoized for the
//! graph's lifetime — online learning only touches distribution weights,
//! never topology, so the cache is invalidated solely by structural
//! mutation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::engine::distribution::Distribution;
use crate::engine::errors::EngineError;

/// How a node's values are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Discrete string values.
    Categorical,
    /// Real-valued, sampled from a Gaussian with an explicit clamp.
    Numerical,
    /// Two-outcome categorical over `"true"` / `"false"`.
    Binary,
}

/// One attribute node.
#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub name: String,
    pub kind: NodeKind,
    pub parents: SmallVec<[String; 4]>,
    pub children: SmallVec<[String; 4]>,
    pub distribution: Distribution,
}

/// Serializable node description; children are derived, not declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub parents: Vec<String>,
    pub distribution: Distribution,
}

/// Serializable network description, loadable from JSON so a pre-trained
/// network can replace the built-in tables without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub nodes: Vec<NodeDefinition>,
}

/// Read-only diagnostic snapshot. Computed on demand, never cached, with
/// sorted vectors so repeated calls without intervening updates compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub browsers: Vec<String>,
    pub device_types: Vec<String>,
    pub platforms: Vec<String>,
}

/// The attribute network.
#[derive(Debug, Clone, Default)]
pub struct AttributeNetwork {
    nodes: FxHashMap<String, AttributeNode>,
    /// Insertion order, for deterministic iteration and tie-breaking.
    insertion_order: Vec<String>,
    order_cache: Option<Arc<[String]>>,
}

impl AttributeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Fails when the name already exists, a declared parent
    /// is missing, or the distribution is malformed. Structural mutation,
    /// so the memoized sampling order is invalidated.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        parents: &[&str],
        distribution: Distribution,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(EngineError::Graph(format!("node '{name}' already exists")));
        }
        distribution.validate()?;
        for parent in parents {
            if !self.nodes.contains_key(*parent) {
                return Err(EngineError::Graph(format!(
                    "node '{name}' declares missing parent '{parent}'"
                )));
            }
        }
        for parent in parents {
            let parent_node = self
                .nodes
                .get_mut(*parent)
                .expect("parent presence checked above");
            parent_node.children.push(name.clone());
        }
        self.nodes.insert(
            name.clone(),
            AttributeNode {
                name: name.clone(),
                kind,
                parents: parents.iter().map(|p| p.to_string()).collect(),
                children: SmallVec::new(),
                distribution,
            },
        );
        self.insertion_order.push(name);
        self.order_cache = None;
        Ok(())
    }

    /// Builds a network from a serialized definition.
    ///
    /// Nodes are created first and parents wired afterwards, so a
    /// definition may list nodes in any order. The sampling order is
    /// computed eagerly: a definition whose parent references form a cycle
    /// is rejected here with [`EngineError::Cycle`] instead of surfacing
    /// later during sampling.
    pub fn from_definition(definition: NetworkDefinition) -> Result<Self, EngineError> {
        let mut network = Self::new();
        for def in &definition.nodes {
            if network.nodes.contains_key(&def.name) {
                return Err(EngineError::Graph(format!(
                    "node '{}' already exists",
                    def.name
                )));
            }
            def.distribution.validate()?;
            network.nodes.insert(
                def.name.clone(),
                AttributeNode {
                    name: def.name.clone(),
                    kind: def.kind,
                    parents: def.parents.iter().cloned().collect(),
                    children: SmallVec::new(),
                    distribution: def.distribution.clone(),
                },
            );
            network.insertion_order.push(def.name.clone());
        }
        for def in &definition.nodes {
            for parent in &def.parents {
                if !network.nodes.contains_key(parent) {
                    return Err(EngineError::Graph(format!(
                        "node '{}' declares missing parent '{parent}'",
                        def.name
                    )));
                }
                let parent_node = network
                    .nodes
                    .get_mut(parent)
                    .expect("parent presence checked above");
                parent_node.children.push(def.name.clone());
            }
        }
        network.topological_order()?;
        Ok(network)
    }

    /// Loads a network definition from JSON bytes.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let definition: NetworkDefinition = serde_json::from_str(json)
            .map_err(|e| EngineError::Graph(format!("invalid network definition: {e}")))?;
        Self::from_definition(definition)
    }

    /// Exports the current network (including learned weights) as a
    /// definition, in insertion order.
    pub fn to_definition(&self) -> NetworkDefinition {
        let nodes = self
            .insertion_order
            .iter()
            .map(|name| {
                let node = &self.nodes[name];
                NodeDefinition {
                    name: node.name.clone(),
                    kind: node.kind,
                    parents: node.parents.iter().cloned().collect(),
                    distribution: node.distribution.clone(),
                }
            })
            .collect();
        NetworkDefinition { nodes }
    }

    pub fn node(&self, name: &str) -> Option<&AttributeNode> {
        self.nodes.get(name)
    }

    pub(crate) fn node_mut(&mut self, name: &str) -> Option<&mut AttributeNode> {
        // Distribution-only mutation path for the learner; topology stays
        // frozen so the order cache remains valid.
        self.nodes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.parents.len()).sum()
    }

    /// Node names in a valid sampling order: every parent strictly before
    /// all of its children. Memoized; invalidated only by [`add_node`].
    ///
    /// Kahn's algorithm over in-degrees, with the ready frontier kept in
    /// insertion order so the result is deterministic. An exhausted
    /// frontier with nodes remaining means a cycle.
    ///
    /// [`add_node`]: Self::add_node
    pub fn topological_order(&mut self) -> Result<Arc<[String]>, EngineError> {
        if let Some(order) = &self.order_cache {
            return Ok(Arc::clone(order));
        }

        let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
        for name in &self.insertion_order {
            in_degree.insert(name.as_str(), self.nodes[name].parents.len());
        }

        let mut ready: Vec<&str> = self
            .insertion_order
            .iter()
            .filter(|name| in_degree[name.as_str()] == 0)
            .map(|name| name.as_str())
            .collect();
        let mut order: Vec<String> = Vec::with_capacity(self.nodes.len());

        let mut cursor = 0;
        while cursor < ready.len() {
            let current = ready[cursor];
            cursor += 1;
            order.push(current.to_string());
            for child in &self.nodes[current].children {
                let degree = in_degree
                    .get_mut(child.as_str())
                    .expect("children reference existing nodes");
                *degree -= 1;
                if *degree == 0 {
                    ready.push(child.as_str());
                }
            }
        }

        if order.len() != self.nodes.len() {
            let mut stuck: Vec<&str> = in_degree
                .iter()
                .filter(|(_, d)| **d > 0)
                .map(|(name, _)| *name)
                .collect();
            stuck.sort_unstable();
            return Err(EngineError::Cycle(format!(
                "no sampling order exists; nodes on a cycle: {}",
                stuck.join(", ")
            )));
        }

        let order: Arc<[String]> = order.into();
        self.order_cache = Some(Arc::clone(&order));
        Ok(order)
    }

    /// Diagnostic statistics over the current graph.
    pub fn statistics(&self) -> NetworkStatistics {
        NetworkStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            browsers: self.support_of(crate::data::NODE_BROWSER),
            device_types: self.support_of(crate::data::NODE_DEVICE_TYPE),
            platforms: self.support_of(crate::data::NODE_PLATFORM),
        }
    }

    fn support_of(&self, name: &str) -> Vec<String> {
        self.nodes
            .get(name)
            .map(|node| node.distribution.support())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::distribution::Categorical;

    fn cat(values: &[&str]) -> Distribution {
        Distribution::Categorical(
            Categorical::uniform(values.iter().map(|v| v.to_string()).collect()).unwrap(),
        )
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut network = AttributeNetwork::new();
        network
            .add_node("a", NodeKind::Categorical, &[], cat(&["x"]))
            .unwrap();
        let err = network.add_node("a", NodeKind::Categorical, &[], cat(&["x"]));
        assert!(matches!(err, Err(EngineError::Graph(_))));
    }

    #[test]
    fn missing_parent_rejected() {
        let mut network = AttributeNetwork::new();
        let err = network.add_node("b", NodeKind::Categorical, &["ghost"], cat(&["x"]));
        assert!(matches!(err, Err(EngineError::Graph(_))));
    }

    #[test]
    fn parents_precede_children_in_order() {
        let mut network = AttributeNetwork::new();
        network
            .add_node("a", NodeKind::Categorical, &[], cat(&["x"]))
            .unwrap();
        network
            .add_node("b", NodeKind::Categorical, &["a"], cat(&["x"]))
            .unwrap();
        network
            .add_node("c", NodeKind::Categorical, &["a", "b"], cat(&["x"]))
            .unwrap();
        let order = network.topological_order().unwrap();
        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn cyclic_definition_rejected() {
        let definition = NetworkDefinition {
            nodes: vec![
                NodeDefinition {
                    name: "a".into(),
                    kind: NodeKind::Categorical,
                    parents: vec!["b".into()],
                    distribution: cat(&["x"]),
                },
                NodeDefinition {
                    name: "b".into(),
                    kind: NodeKind::Categorical,
                    parents: vec!["a".into()],
                    distribution: cat(&["x"]),
                },
            ],
        };
        let err = AttributeNetwork::from_definition(definition);
        assert!(matches!(err, Err(EngineError::Cycle(_))));
    }

    #[test]
    fn order_is_memoized_until_structural_change() {
        let mut network = AttributeNetwork::new();
        network
            .add_node("a", NodeKind::Categorical, &[], cat(&["x"]))
            .unwrap();
        let first = network.topological_order().unwrap();
        let second = network.topological_order().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        network
            .add_node("b", NodeKind::Categorical, &["a"], cat(&["x"]))
            .unwrap();
        let third = network.topological_order().unwrap();
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn edge_count_sums_parent_lists() {
        let mut network = AttributeNetwork::new();
        network
            .add_node("a", NodeKind::Categorical, &[], cat(&["x"]))
            .unwrap();
        network
            .add_node("b", NodeKind::Categorical, &["a"], cat(&["x"]))
            .unwrap();
        network
            .add_node("c", NodeKind::Categorical, &["a", "b"], cat(&["x"]))
            .unwrap();
        assert_eq!(network.edge_count(), 3);
        assert_eq!(network.node("a").unwrap().children.len(), 2);
    }
}
