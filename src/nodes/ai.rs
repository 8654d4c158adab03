//! AI node - stub placeholder result.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// AI node. Produces a fixed placeholder result; model invocation is not
/// wired into the interpreter.
pub struct AiNode;

impl AiNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AiNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for AiNode {
    fn node_type(&self) -> NodeType {
        NodeType::Ai
    }

    fn description(&self) -> &str {
        "AI processing placeholder"
    }

    async fn execute(&self, _settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        Ok(HandlerOutput::logged(
            json!({"output": "ok", "confidence": 0.9}),
            LogDraft::info("AI processed", json!({})),
        ))
    }
}
