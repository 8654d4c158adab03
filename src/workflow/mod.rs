//! Workflow model: node/edge types and the per-run graph index.

mod graph;
mod types;

pub use graph::WorkflowGraph;
pub use types::{NodeType, Workflow, WorkflowEdge, WorkflowNode};
