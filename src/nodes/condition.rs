//! Condition node - boolean evaluation for branching.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::error::Result;
use crate::workflow::NodeType;

/// Condition node.
///
/// Evaluates `leftSide <operator> rightSide` and writes `{"result": bool}`;
/// the interpreter uses that boolean to pick the outgoing edge labeled
/// "TRUE" or "FALSE". Evaluation cannot fail: malformed operands and
/// unrecognized operators evaluate to `false`.
pub struct ConditionNode;

impl ConditionNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConditionNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for ConditionNode {
    fn node_type(&self) -> NodeType {
        NodeType::Condition
    }

    fn description(&self) -> &str {
        "Evaluate a comparison and branch on the result"
    }

    async fn execute(&self, settings: &Value, _ctx: &HandlerContext) -> Result<HandlerOutput> {
        let left = settings.get("leftSide").cloned().unwrap_or(Value::Null);
        let right = settings.get("rightSide").cloned().unwrap_or(Value::Null);
        let operator = settings
            .get("operator")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let result = evaluate(&left, operator, &right);

        Ok(HandlerOutput::logged(
            json!({"result": result}),
            LogDraft::info("Condition evaluated", json!({"result": result})),
        ))
    }
}

/// Evaluate a comparison between two resolved sides.
///
/// Sides that parse fully as numbers compare numerically; `eq`/`neq` fall
/// back to string comparison, ordering operators are false on mixed or
/// non-numeric operands, and `contains` is substring matching on strings
/// only.
fn evaluate(left: &Value, operator: &str, right: &Value) -> bool {
    let numeric = as_number(left).zip(as_number(right));

    match operator {
        "eq" => match numeric {
            Some((l, r)) => l == r,
            None => stringify(left) == stringify(right),
        },
        "neq" => match numeric {
            Some((l, r)) => l != r,
            None => stringify(left) != stringify(right),
        },
        "gt" => numeric.map(|(l, r)| l > r).unwrap_or(false),
        "gte" => numeric.map(|(l, r)| l >= r).unwrap_or(false),
        "lt" => numeric.map(|(l, r)| l < r).unwrap_or(false),
        "lte" => numeric.map(|(l, r)| l <= r).unwrap_or(false),
        "contains" => match (left, right) {
            (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        },
        _ => false,
    }
}

/// A side counts as numeric if it is a JSON number or a string that parses
/// fully as one.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
