//! Node handler trait and context types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::storage::LogSeverity;
use crate::workflow::NodeType;

/// A log entry produced by a handler, before it is stamped with an id and
/// timestamp by the interpreter.
#[derive(Debug, Clone)]
pub struct LogDraft {
    pub severity: LogSeverity,
    pub message: String,
    pub data: Value,
}

impl LogDraft {
    pub fn new(severity: LogSeverity, message: impl Into<String>, data: Value) -> Self {
        Self {
            severity,
            message: message.into(),
            data,
        }
    }

    pub fn info(message: impl Into<String>, data: Value) -> Self {
        Self::new(LogSeverity::Info, message, data)
    }

    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self::new(LogSeverity::Success, message, data)
    }
}

/// Result of a successful handler dispatch.
#[derive(Debug, Clone)]
pub struct HandlerOutput {
    /// Value written into the run-scoped output map under the node's id.
    pub data: Value,
    /// Log entries describing the node's processing.
    pub logs: Vec<LogDraft>,
}

impl HandlerOutput {
    /// Create an output with a single log entry.
    pub fn logged(data: Value, log: LogDraft) -> Self {
        Self {
            data,
            logs: vec![log],
        }
    }
}

/// Context passed to a handler during dispatch.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Execution id of the current run
    pub execution_id: String,

    /// Id of the node being dispatched
    pub node_id: String,

    /// Run-scoped outputs of previously executed nodes, keyed by node id
    pub outputs: HashMap<String, Value>,
}

impl HandlerContext {
    pub fn new(execution_id: &str, node_id: &str) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            node_id: node_id.to_string(),
            outputs: HashMap::new(),
        }
    }

    pub fn with_outputs(mut self, outputs: HashMap<String, Value>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Get a previous node's output.
    pub fn get_output(&self, node_id: &str) -> Option<&Value> {
        self.outputs.get(node_id)
    }
}

/// Trait that all node handlers implement.
///
/// A handler's own failures surface as `Err`; the interpreter logs them with
/// `error` severity and continues traversal, so no handler failure can
/// propagate beyond the dispatch boundary.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// The node kind this handler serves.
    fn node_type(&self) -> NodeType;

    /// Execute the handler with resolved settings and run context.
    async fn execute(&self, settings: &Value, ctx: &HandlerContext) -> Result<HandlerOutput>;

    /// Log message the interpreter records when `execute` fails.
    fn failure_message(&self) -> &str {
        "Node failed"
    }

    /// Human-readable description of this node kind.
    fn description(&self) -> &str {
        "A workflow node"
    }
}
