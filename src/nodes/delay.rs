//! Delay node - immediate completion marker.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// Delay node. Records the configured delay without actually waiting;
/// real scheduling of delayed continuations belongs to the dispatch layer.
pub struct DelayNode;

impl DelayNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DelayNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for DelayNode {
    fn node_type(&self) -> NodeType {
        NodeType::Delay
    }

    fn description(&self) -> &str {
        "Delay marker (no in-run wait)"
    }

    async fn execute(&self, settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        let duration = settings.get("duration").cloned().unwrap_or(Value::Null);

        Ok(HandlerOutput::logged(
            json!({"completed": true}),
            LogDraft::info("Delay completed", json!({"duration": duration})),
        ))
    }
}
