//! Read-only graph index over a workflow's nodes and edges.

use std::collections::HashMap;

use super::types::{Workflow, WorkflowEdge, WorkflowNode};

/// Per-run index of a workflow graph.
///
/// Nodes are indexed by id and edges by source node id, giving the
/// interpreter O(1) node lookup and O(out-degree) edge iteration. Edge order
/// within a source is authoring order. The index borrows the workflow and is
/// never mutated after construction; the underlying workflow may be shared
/// freely across concurrent runs.
pub struct WorkflowGraph<'a> {
    nodes: HashMap<&'a str, &'a WorkflowNode>,
    outgoing: HashMap<&'a str, Vec<&'a WorkflowEdge>>,
    trigger: Option<&'a WorkflowNode>,
}

impl<'a> WorkflowGraph<'a> {
    /// Build the index for one run.
    pub fn new(workflow: &'a Workflow) -> Self {
        let mut nodes: HashMap<&str, &WorkflowNode> = HashMap::with_capacity(workflow.nodes.len());
        for node in &workflow.nodes {
            // Node ids are unique per workflow; keep the first on duplicates.
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut outgoing: HashMap<&str, Vec<&WorkflowEdge>> = HashMap::new();
        for edge in &workflow.edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }

        Self {
            nodes,
            outgoing,
            trigger: workflow.trigger_node(),
        }
    }

    /// Look up a node by id.
    pub fn node_by_id(&self, id: &str) -> Option<&'a WorkflowNode> {
        self.nodes.get(id).copied()
    }

    /// Edges leaving the given node, in authoring order.
    pub fn outgoing_edges(&self, node_id: &str) -> &[&'a WorkflowEdge] {
        self.outgoing
            .get(node_id)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// The workflow's entry point, if it has one.
    pub fn trigger_node(&self) -> Option<&'a WorkflowNode> {
        self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::NodeType;
    use serde_json::json;

    fn node(id: &str, node_type: NodeType) -> WorkflowNode {
        WorkflowNode {
            id: id.to_string(),
            node_type,
            settings: json!({}),
        }
    }

    fn edge(source: &str, target: &str) -> WorkflowEdge {
        WorkflowEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: None,
        }
    }

    fn sample_workflow() -> Workflow {
        Workflow {
            id: "wf-1".to_string(),
            name: "sample".to_string(),
            nodes: vec![
                node("t1", NodeType::Trigger),
                node("a", NodeType::Email),
                node("b", NodeType::Delay),
            ],
            edges: vec![edge("t1", "a"), edge("t1", "b"), edge("a", "b")],
        }
    }

    #[test]
    fn test_node_lookup() {
        let workflow = sample_workflow();
        let graph = WorkflowGraph::new(&workflow);

        assert_eq!(graph.node_by_id("a").unwrap().id, "a");
        assert!(graph.node_by_id("missing").is_none());
    }

    #[test]
    fn test_outgoing_edges_preserve_authoring_order() {
        let workflow = sample_workflow();
        let graph = WorkflowGraph::new(&workflow);

        let targets: Vec<&str> = graph
            .outgoing_edges("t1")
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(targets, vec!["a", "b"]);
    }

    #[test]
    fn test_no_outgoing_edges() {
        let workflow = sample_workflow();
        let graph = WorkflowGraph::new(&workflow);

        assert!(graph.outgoing_edges("b").is_empty());
        assert!(graph.outgoing_edges("missing").is_empty());
    }

    #[test]
    fn test_trigger_node() {
        let workflow = sample_workflow();
        let graph = WorkflowGraph::new(&workflow);
        assert_eq!(graph.trigger_node().unwrap().id, "t1");

        let no_trigger = Workflow {
            id: "wf-2".to_string(),
            name: String::new(),
            nodes: vec![node("a", NodeType::Email)],
            edges: vec![],
        };
        let graph = WorkflowGraph::new(&no_trigger);
        assert!(graph.trigger_node().is_none());
    }
}
