//! Execution interpreter.
//!
//! Drives one run of a workflow: loads the execution record and workflow,
//! walks the graph depth-first from the trigger node, dispatches handlers,
//! and owns the execution's status lifecycle
//! (`pending -> running -> completed | failed`).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::expression;
use crate::nodes::{HandlerContext, HandlerRegistry};
use crate::storage::{
    Execution, ExecutionStatus, ExecutionStore, LogEntry, LogSeverity, LogSink, SqliteStorage,
    WorkflowStore,
};
use crate::workflow::{NodeType, WorkflowGraph, WorkflowNode};

/// Mutable state scoped to a single run.
///
/// Owned exclusively by the interpreter for the run's lifetime and discarded
/// at run end; nothing here is shared or reused across executions.
#[derive(Default)]
struct RunState {
    /// Node ids already dispatched; a second arrival is a silent no-op.
    visited: HashSet<String>,
    /// Per-node outputs, readable by later nodes via expression placeholders.
    outputs: HashMap<String, Value>,
}

/// Workflow execution interpreter.
pub struct Interpreter {
    registry: HandlerRegistry,
    executions: Arc<dyn ExecutionStore>,
    workflows: Arc<dyn WorkflowStore>,
    logs: Arc<dyn LogSink>,
}

impl Interpreter {
    /// Create an interpreter backed by SQLite storage.
    pub fn new(registry: HandlerRegistry, storage: SqliteStorage) -> Self {
        Self::with_stores(
            registry,
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(storage),
        )
    }

    /// Create an interpreter with explicit store implementations.
    pub fn with_stores(
        registry: HandlerRegistry,
        executions: Arc<dyn ExecutionStore>,
        workflows: Arc<dyn WorkflowStore>,
        logs: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            registry,
            executions,
            workflows,
            logs,
        }
    }

    /// Run one execution to completion.
    ///
    /// A missing execution record is a silent no-op: there is nothing to
    /// execute and nothing to update. A missing workflow or a workflow
    /// without a trigger node marks the execution `failed` without visiting
    /// any node. Otherwise the run always ends `completed`, however many
    /// individual nodes failed along the way.
    #[instrument(name = "execution.run", skip(self), fields(execution_id = %execution_id))]
    pub async fn run(&self, execution_id: &str) -> Result<()> {
        let Some(mut execution) = self.executions.load_execution(execution_id).await? else {
            debug!("Execution {} not found, nothing to run", execution_id);
            return Ok(());
        };

        execution.status = ExecutionStatus::Running;
        execution.started_at = Some(Utc::now());
        self.executions.save_execution(&execution).await?;

        let workflow = self.workflows.load_workflow(&execution.workflow_id).await?;
        let Some(workflow) = workflow else {
            warn!(
                "Workflow {} not found for execution {}",
                execution.workflow_id, execution_id
            );
            return self.finish(execution, ExecutionStatus::Failed).await;
        };

        let graph = WorkflowGraph::new(&workflow);
        let Some(trigger) = graph.trigger_node() else {
            warn!(
                "Workflow {} has no trigger node, failing execution {}",
                workflow.id, execution_id
            );
            return self.finish(execution, ExecutionStatus::Failed).await;
        };

        info!(
            "Starting execution {} of workflow '{}'",
            execution_id, workflow.name
        );

        let mut run = RunState::default();
        self.visit(&graph, &mut run, &execution.id, &trigger.id)
            .await;

        info!(
            "Execution {} completed ({} nodes visited)",
            execution_id,
            run.visited.len()
        );
        self.finish(execution, ExecutionStatus::Completed).await
    }

    async fn finish(&self, mut execution: Execution, status: ExecutionStatus) -> Result<()> {
        execution.status = status;
        execution.ended_at = Some(Utc::now());
        self.executions.save_execution(&execution).await
    }

    /// Visit one node and recurse into its outgoing edges.
    ///
    /// Every node type except `condition` fans out unconditionally to all
    /// outgoing edges in authoring order, regardless of the node's own
    /// outcome. A `condition` node follows only the first edge whose label
    /// matches its boolean result ("TRUE"/"FALSE"); no match ends the branch.
    fn visit<'a>(
        &'a self,
        graph: &'a WorkflowGraph<'a>,
        run: &'a mut RunState,
        execution_id: &'a str,
        node_id: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            // At-most-once: converging paths collapse into one execution.
            if !run.visited.insert(node_id.to_string()) {
                return;
            }

            let Some(node) = graph.node_by_id(node_id) else {
                // Dangling edge target; end this branch silently.
                return;
            };

            self.dispatch(node, run, execution_id).await;

            let outgoing = graph.outgoing_edges(node_id);
            if node.node_type == NodeType::Condition {
                let result = run
                    .outputs
                    .get(node_id)
                    .and_then(|output| output.get("result"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let wanted = if result { "TRUE" } else { "FALSE" };

                if let Some(edge) = outgoing
                    .iter()
                    .find(|edge| edge.label.as_deref() == Some(wanted))
                {
                    self.visit(graph, run, execution_id, &edge.target).await;
                }
            } else {
                for edge in outgoing {
                    self.visit(graph, run, execution_id, &edge.target).await;
                }
            }
        })
    }

    /// Dispatch a node to its handler and record output and logs.
    ///
    /// An unregistered node type is skipped entirely (no output, no log);
    /// a handler failure is logged with `error` severity and leaves the
    /// node's output unset. Neither stops traversal.
    async fn dispatch(&self, node: &WorkflowNode, run: &mut RunState, execution_id: &str) {
        let Some(handler) = self.registry.get(node.node_type.as_str()) else {
            debug!(
                "No handler for node '{}' of type '{}', skipping dispatch",
                node.id, node.node_type
            );
            return;
        };

        let settings = expression::resolve_settings(&node.settings, &run.outputs);
        let ctx = HandlerContext::new(execution_id, &node.id).with_outputs(run.outputs.clone());

        match handler.execute(&settings, &ctx).await {
            Ok(output) => {
                run.outputs.insert(node.id.clone(), output.data);
                for log in output.logs {
                    self.append_log(LogEntry::new(
                        execution_id,
                        &node.id,
                        log.severity,
                        log.message,
                        log.data,
                    ))
                    .await;
                }
            }
            Err(e) => {
                warn!("Node '{}' failed: {}", node.id, e);
                self.append_log(LogEntry::new(
                    execution_id,
                    &node.id,
                    LogSeverity::Error,
                    handler.failure_message(),
                    json!({"error": e.to_string()}),
                ))
                .await;
            }
        }
    }

    /// Append a log entry, best-effort. A sink failure must not abort the
    /// run; it is traced and dropped.
    async fn append_log(&self, entry: LogEntry) {
        if let Err(e) = self.logs.append(&entry).await {
            warn!(
                "Failed to append log entry for node '{}': {}",
                entry.node_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Workflow, WorkflowEdge, WorkflowNode};

    fn node(id: &str, node_type: &str, settings: Value) -> WorkflowNode {
        WorkflowNode {
            id: id.to_string(),
            node_type: NodeType::from(node_type),
            settings,
        }
    }

    fn edge(source: &str, target: &str) -> WorkflowEdge {
        WorkflowEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: None,
        }
    }

    fn labeled_edge(source: &str, target: &str, label: &str) -> WorkflowEdge {
        WorkflowEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: Some(label.to_string()),
        }
    }

    async fn setup(workflow: Option<&Workflow>, execution_id: &str) -> (Interpreter, SqliteStorage) {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let workflow_id = workflow.map(|w| w.id.clone()).unwrap_or("missing".into());
        if let Some(workflow) = workflow {
            storage.save_workflow(workflow).await.unwrap();
        }
        storage
            .save_execution(&Execution::pending(execution_id, workflow_id))
            .await
            .unwrap();

        (
            Interpreter::new(HandlerRegistry::new(), storage.clone()),
            storage,
        )
    }

    #[tokio::test]
    async fn test_missing_execution_is_silent_noop() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let interpreter = Interpreter::new(HandlerRegistry::new(), storage.clone());

        interpreter.run("ghost").await.unwrap();
        assert!(storage.load_execution("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_workflow_fails_execution() {
        let (interpreter, storage) = setup(None, "e1").await;

        interpreter.run("e1").await.unwrap();

        let execution = storage.load_execution("e1").await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert!(execution.ended_at.is_some());
        assert!(storage.list_logs("e1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_trigger_fails_with_zero_logs() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "no-trigger".to_string(),
            nodes: vec![node("a", "email", json!({}))],
            edges: vec![],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let execution = storage.load_execution("e1").await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Failed);
        assert!(storage.list_logs("e1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_linear_chain_completes() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "chain".to_string(),
            nodes: vec![
                node("t1", "trigger", json!({})),
                node("m1", "email", json!({"to": "a@b.c"})),
                node("d1", "delay", json!({"duration": 5})),
            ],
            edges: vec![edge("t1", "m1"), edge("m1", "d1")],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let execution = storage.load_execution("e1").await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        assert!(execution.started_at.is_some());
        assert!(execution.ended_at.is_some());

        let logs = storage.list_logs("e1").await.unwrap();
        let nodes: Vec<&str> = logs.iter().map(|l| l.node_id.as_str()).collect();
        assert_eq!(nodes, vec!["t1", "m1", "d1"]);
    }

    #[tokio::test]
    async fn test_diamond_converges_to_single_execution() {
        // t1 -> a, t1 -> b, a -> join, b -> join
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "diamond".to_string(),
            nodes: vec![
                node("t1", "trigger", json!({})),
                node("a", "email", json!({})),
                node("b", "email", json!({})),
                node("join", "delay", json!({})),
            ],
            edges: vec![
                edge("t1", "a"),
                edge("t1", "b"),
                edge("a", "join"),
                edge("b", "join"),
            ],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let logs = storage.list_logs("e1").await.unwrap();
        let join_count = logs.iter().filter(|l| l.node_id == "join").count();
        assert_eq!(join_count, 1);
    }

    #[tokio::test]
    async fn test_condition_follows_only_matching_label() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "branch".to_string(),
            nodes: vec![
                node("t1", "trigger", json!({})),
                node(
                    "c1",
                    "condition",
                    json!({"leftSide": "10", "operator": "gt", "rightSide": "2"}),
                ),
                node("yes", "email", json!({})),
                node("no", "email", json!({})),
                node("stray", "email", json!({})),
            ],
            edges: vec![
                edge("t1", "c1"),
                labeled_edge("c1", "yes", "TRUE"),
                labeled_edge("c1", "no", "FALSE"),
                edge("c1", "stray"),
            ],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let logs = storage.list_logs("e1").await.unwrap();
        assert!(logs.iter().any(|l| l.node_id == "yes"));
        assert!(!logs.iter().any(|l| l.node_id == "no"));
        assert!(!logs.iter().any(|l| l.node_id == "stray"));
    }

    #[tokio::test]
    async fn test_condition_no_matching_edge_ends_branch() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "dead-end".to_string(),
            nodes: vec![
                node("t1", "trigger", json!({})),
                node(
                    "c1",
                    "condition",
                    json!({"leftSide": "1", "operator": "eq", "rightSide": "2"}),
                ),
                node("yes", "email", json!({})),
            ],
            edges: vec![edge("t1", "c1"), labeled_edge("c1", "yes", "TRUE")],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let execution = storage.load_execution("e1").await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        let logs = storage.list_logs("e1").await.unwrap();
        assert!(!logs.iter().any(|l| l.node_id == "yes"));
    }

    #[tokio::test]
    async fn test_dangling_edge_target_is_skipped() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "dangling".to_string(),
            nodes: vec![node("t1", "trigger", json!({})), node("m1", "email", json!({}))],
            edges: vec![edge("t1", "ghost"), edge("t1", "m1")],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let execution = storage.load_execution("e1").await.unwrap().unwrap();
        assert_eq!(execution.status, ExecutionStatus::Completed);
        let logs = storage.list_logs("e1").await.unwrap();
        assert!(logs.iter().any(|l| l.node_id == "m1"));
    }

    #[tokio::test]
    async fn test_unknown_node_type_skipped_but_fans_out() {
        let workflow = Workflow {
            id: "wf-1".to_string(),
            name: "unknown".to_string(),
            nodes: vec![
                node("t1", "trigger", json!({})),
                node("x1", "webhook", json!({})),
                node("m1", "email", json!({})),
            ],
            edges: vec![edge("t1", "x1"), edge("x1", "m1")],
        };
        let (interpreter, storage) = setup(Some(&workflow), "e1").await;

        interpreter.run("e1").await.unwrap();

        let logs = storage.list_logs("e1").await.unwrap();
        // No output, no log for the unknown node, but its children still run.
        assert!(!logs.iter().any(|l| l.node_id == "x1"));
        assert!(logs.iter().any(|l| l.node_id == "m1"));
    }
}
