//! SQLite storage implementation.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::models::{Execution, ExecutionStatus, LogEntry, LogSeverity, StoredWorkflow};
use super::{ExecutionStore, LogSink, WorkflowStore};
use crate::error::{Error, Result};
use crate::workflow::Workflow;

/// Parse an RFC 3339 datetime string into a `chrono::DateTime<Utc>`.
///
/// Returns a `rusqlite::Error` on parse failure instead of panicking,
/// so it is safe to use inside `query_row` / `query_map` closures.
fn parse_datetime_utc(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_column<T: FromStr>(s: &str) -> rusqlite::Result<T>
where
    T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    s.parse().map_err(|e: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
    })
}

/// SQLite-based storage for workflows, executions, and execution logs.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema_sync(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema_sync(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema_sync(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            -- Enable WAL mode for better concurrent reads during writes
            PRAGMA journal_mode = WAL;
            -- Wait up to 5 seconds when database is locked instead of failing immediately
            PRAGMA busy_timeout = 5000;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS workflows (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                definition TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS executions (
                id TEXT PRIMARY KEY,
                workflow_id TEXT NOT NULL,
                status TEXT NOT NULL,
                started_at TEXT,
                ended_at TEXT
            );

            CREATE TABLE IF NOT EXISTS execution_logs (
                id TEXT PRIMARY KEY,
                execution_id TEXT NOT NULL,
                node_id TEXT NOT NULL,
                severity TEXT NOT NULL,
                message TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (execution_id) REFERENCES executions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_executions_workflow ON executions(workflow_id);
            CREATE INDEX IF NOT EXISTS idx_execution_logs_execution
                ON execution_logs(execution_id, created_at);
            "#,
        )?;
        Ok(())
    }

    /// Store a workflow definition, replacing any previous version.
    pub async fn save_workflow(&self, workflow: &Workflow) -> Result<()> {
        let definition = serde_json::to_string(workflow)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO workflows (id, name, definition, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 definition = excluded.definition,
                 updated_at = excluded.updated_at",
            params![workflow.id, workflow.name, definition, now],
        )?;
        Ok(())
    }

    /// Fetch the raw stored workflow row.
    pub async fn get_stored_workflow(&self, id: &str) -> Result<Option<StoredWorkflow>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, name, definition, created_at, updated_at
                 FROM workflows WHERE id = ?1",
                params![id],
                |row| {
                    Ok(StoredWorkflow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        definition: row.get(2)?,
                        created_at: parse_datetime_utc(&row.get::<_, String>(3)?)?,
                        updated_at: parse_datetime_utc(&row.get::<_, String>(4)?)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// List all log entries for an execution, oldest first.
    pub async fn list_logs(&self, execution_id: &str) -> Result<Vec<LogEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, execution_id, node_id, severity, message, data, created_at
             FROM execution_logs WHERE execution_id = ?1
             ORDER BY created_at, rowid",
        )?;

        let entries = stmt
            .query_map(params![execution_id], |row| {
                let severity: LogSeverity = parse_column(&row.get::<_, String>(3)?)?;
                let data: serde_json::Value =
                    serde_json::from_str(&row.get::<_, String>(5)?).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            5,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(LogEntry {
                    id: row.get(0)?,
                    execution_id: row.get(1)?,
                    node_id: row.get(2)?,
                    severity,
                    message: row.get(4)?,
                    data,
                    created_at: parse_datetime_utc(&row.get::<_, String>(6)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

#[async_trait]
impl ExecutionStore for SqliteStorage {
    async fn load_execution(&self, id: &str) -> Result<Option<Execution>> {
        let conn = self.conn.lock().await;
        let execution = conn
            .query_row(
                "SELECT id, workflow_id, status, started_at, ended_at
                 FROM executions WHERE id = ?1",
                params![id],
                |row| {
                    let status: ExecutionStatus = parse_column(&row.get::<_, String>(2)?)?;
                    let started_at = row
                        .get::<_, Option<String>>(3)?
                        .map(|s| parse_datetime_utc(&s))
                        .transpose()?;
                    let ended_at = row
                        .get::<_, Option<String>>(4)?
                        .map(|s| parse_datetime_utc(&s))
                        .transpose()?;
                    Ok(Execution {
                        id: row.get(0)?,
                        workflow_id: row.get(1)?,
                        status,
                        started_at,
                        ended_at,
                    })
                },
            )
            .optional()?;
        Ok(execution)
    }

    async fn save_execution(&self, execution: &Execution) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO executions (id, workflow_id, status, started_at, ended_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                execution.id,
                execution.workflow_id,
                execution.status.to_string(),
                execution.started_at.map(|t| t.to_rfc3339()),
                execution.ended_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl WorkflowStore for SqliteStorage {
    async fn load_workflow(&self, id: &str) -> Result<Option<Workflow>> {
        let stored = self.get_stored_workflow(id).await?;
        match stored {
            Some(stored) => {
                let workflow = serde_json::from_str(&stored.definition)
                    .map_err(|e| Error::Storage(format!("Corrupt workflow definition: {}", e)))?;
                Ok(Some(workflow))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LogSink for SqliteStorage {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        let data = serde_json::to_string(&entry.data)?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO execution_logs (id, execution_id, node_id, severity, message, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.execution_id,
                entry.node_id,
                entry.severity.to_string(),
                entry.message,
                data,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
