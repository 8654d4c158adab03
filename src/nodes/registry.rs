//! Handler registry - maps node type tags to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::NodeHandler;
use super::{AiNode, ConditionNode, DelayNode, EmailNode, ErpNode, HttpNode, TriggerNode};

/// Registry of available node handlers.
///
/// Lookup by type tag makes the no-handler case an explicit branch: the
/// interpreter treats an unregistered tag as "do not dispatch" rather than
/// an error.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
    /// Create a registry with the built-in handlers.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(TriggerNode::new()));
        registry.register(Arc::new(ErpNode::new()));
        registry.register(Arc::new(HttpNode::new()));
        registry.register(Arc::new(ConditionNode::new()));
        registry.register(Arc::new(EmailNode::new()));
        registry.register(Arc::new(AiNode::new()));
        registry.register(Arc::new(DelayNode::new()));

        registry
    }

    /// Create an empty registry (for testing).
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any previous handler for the same tag.
    pub fn register(&mut self, handler: Arc<dyn NodeHandler>) {
        self.handlers
            .insert(handler.node_type().as_str().to_string(), handler);
    }

    /// Get the handler for a type tag.
    pub fn get(&self, node_type: &str) -> Option<Arc<dyn NodeHandler>> {
        self.handlers.get(node_type).cloned()
    }

    /// Check if a type tag has a registered handler.
    pub fn has(&self, node_type: &str) -> bool {
        self.handlers.contains_key(node_type)
    }

    /// List all registered type tags.
    pub fn list(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
