//! Asynchronous dispatch seam.
//!
//! Upstream callers (webhook handlers, schedulers) enqueue execution ids;
//! a background task drains the queue and runs each execution to completion
//! on the interpreter. Executions from different enqueuers share no state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::Interpreter;
use crate::error::{Error, Result};

const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Queue-backed dispatcher that feeds execution ids to an interpreter.
pub struct Dispatcher {
    tx: mpsc::Sender<String>,
    worker: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawn the dispatch worker.
    pub fn spawn(interpreter: Arc<Interpreter>) -> Self {
        Self::spawn_with_capacity(interpreter, DEFAULT_QUEUE_CAPACITY)
    }

    /// Spawn with an explicit queue capacity.
    pub fn spawn_with_capacity(interpreter: Arc<Interpreter>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(execution_id) = rx.recv().await {
                if let Err(e) = interpreter.run(&execution_id).await {
                    // A run error here is a storage fault, not a node
                    // failure; node failures are absorbed by the run itself.
                    error!("Execution {} aborted: {}", execution_id, e);
                }
            }
            info!("Dispatch queue closed, worker exiting");
        });

        Self { tx, worker }
    }

    /// Enqueue an execution for asynchronous processing.
    pub async fn enqueue(&self, execution_id: &str) -> Result<()> {
        self.tx
            .send(execution_id.to_string())
            .await
            .map_err(|_| Error::Execution("Dispatch queue is closed".to_string()))
    }

    /// Close the queue and wait for in-flight executions to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}
