//! Snapshot Types
//!
//! Serialization structs for per-step network snapshots.
//!
//! A snapshot captures the graph and every node's flags at one step. It is the
//! input handed to rendering collaborators.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID for the given step.
pub fn generate_snapshot_id(step: usize) -> String {
    format!("step_{:06}", step)
}

/// Four-way color encoding of a node's (distress, app) flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    /// Distressed and using the app
    Purple,
    /// Distressed without the app
    Red,
    /// Using the app, not distressed
    Green,
    /// Neither
    Blue,
}

impl NodeColor {
    /// Classifies a node by its flags.
    pub fn classify(distress: bool, app: bool) -> Self {
        match (distress, app) {
            (true, true) => NodeColor::Purple,
            (true, false) => NodeColor::Red,
            (false, true) => NodeColor::Green,
            (false, false) => NodeColor::Blue,
        }
    }

    /// Color name understood by GraphViz and most plotting tools.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeColor::Purple => "purple",
            NodeColor::Red => "red",
            NodeColor::Green => "green",
            NodeColor::Blue => "blue",
        }
    }
}

/// One node in a snapshot
///
/// Nodes that exist in the graph without a state record carry no flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub node_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<NodeColor>,
    #[serde(default)]
    pub distress_count: u32,
    #[serde(default)]
    pub app_count: u32,
    #[serde(default)]
    pub talking_len: usize,
    #[serde(default)]
    pub trust_len: usize,
}

impl NodeSnapshot {
    /// Creates a snapshot entry for a node with state.
    pub fn stateful(node_id: i64, distress: bool, app: bool) -> Self {
        Self {
            node_id,
            distress: Some(distress),
            app: Some(app),
            color: Some(NodeColor::classify(distress, app)),
            distress_count: 0,
            app_count: 0,
            talking_len: 0,
            trust_len: 0,
        }
    }

    /// Creates a snapshot entry for a graph node that has no state record.
    pub fn stateless(node_id: i64) -> Self {
        Self {
            node_id,
            distress: None,
            app: None,
            color: None,
            distress_count: 0,
            app_count: 0,
            talking_len: 0,
            trust_len: 0,
        }
    }

    pub fn with_counters(mut self, distress_count: u32, app_count: u32) -> Self {
        self.distress_count = distress_count;
        self.app_count = app_count;
        self
    }

    pub fn with_logs(mut self, talking_len: usize, trust_len: usize) -> Self {
        self.talking_len = talking_len;
        self.trust_len = trust_len;
        self
    }

    pub fn has_state(&self) -> bool {
        self.color.is_some()
    }
}

/// Undirected edge between two node IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: i64,
    pub target: i64,
}

/// Tallies of the four color classes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounts {
    pub distressed_with_app: usize,
    pub distressed: usize,
    pub app_only: usize,
    pub neither: usize,
    pub stateless: usize,
}

impl NetworkCounts {
    /// Counts the color classes in a node list.
    pub fn from_nodes(nodes: &[NodeSnapshot]) -> Self {
        let mut counts = Self::default();
        for node in nodes {
            match node.color {
                Some(NodeColor::Purple) => counts.distressed_with_app += 1,
                Some(NodeColor::Red) => counts.distressed += 1,
                Some(NodeColor::Green) => counts.app_only += 1,
                Some(NodeColor::Blue) => counts.neither += 1,
                None => counts.stateless += 1,
            }
        }
        counts
    }

    /// Nodes currently in distress, with or without the app.
    pub fn total_distressed(&self) -> usize {
        self.distressed_with_app + self.distressed
    }

    /// Nodes currently using the app.
    pub fn total_app_users(&self) -> usize {
        self.distressed_with_app + self.app_only
    }
}

/// Complete network snapshot at one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub snapshot_id: String,
    pub step: usize,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub counts: NetworkCounts,
}

impl NetworkSnapshot {
    /// Creates a snapshot and derives its counts from the nodes.
    pub fn new(step: usize, nodes: Vec<NodeSnapshot>, edges: Vec<EdgeSnapshot>) -> Self {
        let counts = NetworkCounts::from_nodes(&nodes);
        Self {
            snapshot_id: generate_snapshot_id(step),
            step,
            nodes,
            edges,
            counts,
        }
    }

    /// Finds a node by ID.
    pub fn find_node(&self, node_id: i64) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the snapshot to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_snapshot_id() {
        assert_eq!(generate_snapshot_id(0), "step_000000");
        assert_eq!(generate_snapshot_id(250), "step_000250");
    }

    #[test]
    fn test_color_classification() {
        assert_eq!(NodeColor::classify(true, true), NodeColor::Purple);
        assert_eq!(NodeColor::classify(true, false), NodeColor::Red);
        assert_eq!(NodeColor::classify(false, true), NodeColor::Green);
        assert_eq!(NodeColor::classify(false, false), NodeColor::Blue);
        assert_eq!(NodeColor::Purple.as_str(), "purple");
    }

    #[test]
    fn test_counts_from_nodes() {
        let nodes = vec![
            NodeSnapshot::stateful(1, true, true),
            NodeSnapshot::stateful(2, true, false),
            NodeSnapshot::stateful(3, false, true),
            NodeSnapshot::stateful(4, false, false),
            NodeSnapshot::stateless(5),
        ];
        let counts = NetworkCounts::from_nodes(&nodes);

        assert_eq!(counts.total_distressed(), 2);
        assert_eq!(counts.total_app_users(), 2);
        assert_eq!(counts.neither, 1);
        assert_eq!(counts.stateless, 1);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = NetworkSnapshot::new(
            3,
            vec![NodeSnapshot::stateful(7, true, false), NodeSnapshot::stateless(9)],
            vec![EdgeSnapshot { source: 7, target: 9 }],
        );

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("step_000003"));
        assert!(json.contains("\"red\""));

        let parsed = NetworkSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.step, 3);
        assert!(parsed.find_node(7).unwrap().has_state());
        assert!(!parsed.find_node(9).unwrap().has_state());
        assert_eq!(parsed.counts.distressed, 1);
    }
}
