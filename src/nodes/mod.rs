//! Node handlers.
//!
//! One handler per node type. Each handler receives its settings with
//! top-level string fields already passed through the expression resolver
//! and returns an output value plus the log entries describing what it did.

mod ai;
mod condition;
mod delay;
mod email;
mod erp;
mod http;
mod registry;
mod trigger;
mod types;

pub use ai::AiNode;
pub use condition::ConditionNode;
pub use delay::DelayNode;
pub use email::EmailNode;
pub use erp::ErpNode;
pub use http::{HttpMethod, HttpNode, HttpResponse, HttpTransport, ReqwestTransport};
pub use registry::HandlerRegistry;
pub use trigger::TriggerNode;
pub use types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
