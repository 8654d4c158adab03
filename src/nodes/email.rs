//! Email node - marks delivery intent.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// Email node. The interpreter performs no delivery; it records that an
/// email was queued for the resolved recipient and moves on.
pub struct EmailNode;

impl EmailNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmailNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for EmailNode {
    fn node_type(&self) -> NodeType {
        NodeType::Email
    }

    fn description(&self) -> &str {
        "Queue an email for delivery"
    }

    async fn execute(&self, settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        let to = settings
            .get("to")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(HandlerOutput::logged(
            json!({"status": "queued"}),
            LogDraft::info("Email queued", json!({"to": to})),
        ))
    }
}
