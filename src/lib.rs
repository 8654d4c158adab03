//! flowrun - workflow execution engine.
//!
//! flowrun interprets user-authored automation graphs (nodes + edges) at run
//! time. Given an execution id it loads the execution record and its
//! workflow, walks the graph depth-first from the trigger node, dispatches
//! each node to a typed handler, and records per-node structured logs plus a
//! terminal execution status.
//!
//! ## Key behaviors
//!
//! - **At-most-once visitation**: a node reachable via converging paths runs
//!   exactly once per execution.
//! - **Conditional branching**: `condition` nodes follow only the outgoing
//!   edge labeled `"TRUE"` or `"FALSE"` matching their evaluated result.
//! - **Partial-failure tolerance**: a failing node is logged with `error`
//!   severity and traversal continues; node failures never fail the run.
//! - **Expression interpolation**: node settings may reference prior node
//!   outputs via `{{ context.outputs.<nodeId>.<key> }}` placeholders.
//!
//! ## Example
//!
//! ```no_run
//! use flowrun::{HandlerRegistry, Interpreter, SqliteStorage};
//!
//! # async fn demo() -> flowrun::Result<()> {
//! let storage = SqliteStorage::open_in_memory()?;
//! let interpreter = Interpreter::new(HandlerRegistry::new(), storage);
//! interpreter.run("execution-id").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod expression;
pub mod nodes;
pub mod storage;
pub mod telemetry;
pub mod workflow;

pub use engine::{Dispatcher, Interpreter};
pub use error::{Error, Result};
pub use nodes::HandlerRegistry;
pub use storage::SqliteStorage;
