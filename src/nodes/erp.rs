//! ERP node - stub integration marker.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// ERP integration node. Currently a stub with the same behavior as the
/// trigger marker; the actual integration lives outside the interpreter.
pub struct ErpNode;

impl ErpNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErpNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for ErpNode {
    fn node_type(&self) -> NodeType {
        NodeType::Erp
    }

    fn description(&self) -> &str {
        "ERP integration placeholder"
    }

    async fn execute(&self, _settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        Ok(HandlerOutput::logged(
            json!({"result": "ok"}),
            LogDraft::info("Node processed", json!({})),
        ))
    }
}
