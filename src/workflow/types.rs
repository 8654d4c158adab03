//! Workflow type definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Node kind tag.
///
/// Unknown tags deserialize into [`NodeType::Other`] so that a workflow
/// authored against a newer node catalog still loads; the interpreter skips
/// dispatch for unknown kinds but keeps traversing their outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Trigger,
    Http,
    Condition,
    Email,
    Ai,
    Delay,
    Erp,
    Other(String),
}

impl NodeType {
    /// The wire tag for this node kind.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Http => "http",
            NodeType::Condition => "condition",
            NodeType::Email => "email",
            NodeType::Ai => "ai",
            NodeType::Delay => "delay",
            NodeType::Erp => "erp",
            NodeType::Other(tag) => tag,
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        match tag {
            "trigger" => NodeType::Trigger,
            "http" => NodeType::Http,
            "condition" => NodeType::Condition,
            "email" => NodeType::Email,
            "ai" => NodeType::Ai,
            "delay" => NodeType::Delay,
            "erp" => NodeType::Erp,
            other => NodeType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(NodeType::from(tag.as_str()))
    }
}

/// A node in a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique node id within this workflow
    pub id: String,

    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Node-specific settings; string values may contain resolvable
    /// `{{ context.outputs.<nodeId>.<key> }}` placeholders
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEdge {
    /// Source node id
    pub source: String,

    /// Target node id. May reference a node missing from the workflow;
    /// the interpreter skips such edges instead of failing.
    pub target: String,

    /// Optional edge label. Only meaningful on edges leaving a `condition`
    /// node, where the expected values are the literal strings "TRUE" and
    /// "FALSE".
    #[serde(default)]
    pub label: Option<String>,
}

/// A complete workflow definition for one run.
///
/// Node and edge vectors preserve authoring order; that order decides
/// condition edge-match ties and generic fan-out order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique workflow id
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Nodes in authoring order
    pub nodes: Vec<WorkflowNode>,

    /// Edges in authoring order
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    /// Get a node by id.
    pub fn get_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// First node of type `trigger`, the entry point of a run.
    pub fn trigger_node(&self) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.node_type == NodeType::Trigger)
    }
}
