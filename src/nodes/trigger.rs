//! Trigger node - workflow entry point marker.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// Trigger node. The interpreter starts traversal here; processing itself
/// is a no-op marker that always succeeds.
pub struct TriggerNode;

impl TriggerNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TriggerNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for TriggerNode {
    fn node_type(&self) -> NodeType {
        NodeType::Trigger
    }

    fn description(&self) -> &str {
        "Entry point of a workflow graph"
    }

    async fn execute(&self, _settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        Ok(HandlerOutput::logged(
            json!({"result": "ok"}),
            LogDraft::info("Node processed", json!({})),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LogSeverity;

    #[tokio::test]
    async fn test_trigger_always_succeeds() {
        let node = TriggerNode::new();
        let ctx = HandlerContext::new("e1", "t1");

        let output = node.execute(&json!({}), &ctx).await.unwrap();
        assert_eq!(output.data, json!({"result": "ok"}));
        assert_eq!(output.logs.len(), 1);
        assert_eq!(output.logs[0].severity, LogSeverity::Info);
        assert_eq!(output.logs[0].message, "Node processed");
    }
}
