//! Persistence boundary.
//!
//! The interpreter talks to storage only through the three traits below;
//! [`sqlite::SqliteStorage`] implements all of them. Log appends are
//! best-effort from the interpreter's perspective: it never aborts a run on
//! a sink error.

mod models;
mod sqlite;

pub use models::{Execution, ExecutionStatus, LogEntry, LogSeverity, StoredWorkflow};
pub use sqlite::SqliteStorage;

use async_trait::async_trait;

use crate::error::Result;
use crate::workflow::Workflow;

/// Store for execution records (status/timestamp lifecycle).
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Load an execution record, or `None` if it does not exist.
    async fn load_execution(&self, id: &str) -> Result<Option<Execution>>;

    /// Persist the current state of an execution record.
    async fn save_execution(&self, execution: &Execution) -> Result<()>;
}

/// Store for workflow definitions (nodes and edges together).
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Load a workflow definition, or `None` if it does not exist.
    async fn load_workflow(&self, id: &str) -> Result<Option<Workflow>>;
}

/// Append-only sink for structured execution logs.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append one log entry.
    async fn append(&self, entry: &LogEntry) -> Result<()>;
}
