//! Storage models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored workflow record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWorkflow {
    pub id: String,
    pub name: String,
    pub definition: String, // JSON, deserializes to `workflow::Workflow`
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// One run of a workflow.
///
/// Mutated only by the interpreter's lifecycle transitions. Per-node outputs
/// are run-scoped and never persisted here; only log entries survive the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Execution {
    /// Create a pending execution for a workflow.
    pub fn pending(id: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            workflow_id: workflow_id.into(),
            status: ExecutionStatus::Pending,
            started_at: None,
            ended_at: None,
        }
    }
}

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for LogSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Append-only structured log entry, one or more per visited node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub execution_id: String,
    pub node_id: String,
    pub severity: LogSeverity,
    pub message: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// Create a new entry with a fresh id and timestamp.
    pub fn new(
        execution_id: &str,
        node_id: &str,
        severity: LogSeverity,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            execution_id: execution_id.to_string(),
            node_id: node_id.to_string(),
            severity,
            message: message.into(),
            data,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ExecutionStatus::Pending,
            ExecutionStatus::Running,
            ExecutionStatus::Completed,
            ExecutionStatus::Failed,
        ] {
            let parsed = ExecutionStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(ExecutionStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn test_severity_roundtrip() {
        for severity in [LogSeverity::Success, LogSeverity::Error, LogSeverity::Info] {
            let parsed = LogSeverity::from_str(&severity.to_string()).unwrap();
            assert_eq!(parsed, severity);
        }
    }

    #[test]
    fn test_pending_execution() {
        let execution = Execution::pending("e1", "wf-1");
        assert_eq!(execution.status, ExecutionStatus::Pending);
        assert!(execution.started_at.is_none());
        assert!(execution.ended_at.is_none());
    }
}
