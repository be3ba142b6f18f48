//! Rule Context: the facts a rule is allowed to look at
//!
//! Built by the mutation handler before evaluation. Payload and context are
//! loosely typed; rules read them through the accessors below, which never
//! panic on missing or wrongly typed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Channel a mutation originated from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationSource {
    /// Direct user action in the UI
    #[default]
    Manual,
    /// Caller-provided proposal awaiting acceptance
    Proposal,
    /// Change generated by an AI agent
    Agent,
    /// Change triggered by a scheduler
    Scheduler,
}

impl fmt::Display for MutationSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MutationSource::Manual => write!(f, "MANUAL"),
            MutationSource::Proposal => write!(f, "PROPOSAL"),
            MutationSource::Agent => write!(f, "AGENT"),
            MutationSource::Scheduler => write!(f, "SCHEDULER"),
        }
    }
}

/// Context for rule evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleContext {
    /// Channel the mutation originated from
    pub source: MutationSource,

    /// Workspace the action targets
    pub workspace_id: String,

    /// Acting user or system agent
    pub actor_id: String,

    /// Business action tag (e.g. `CREATE_NODE`); open-ended
    pub action_type: String,

    /// Proposed mutation data (e.g. `title`)
    #[serde(default)]
    pub payload: HashMap<String, Value>,

    /// Facts pre-loaded by the caller (e.g. `targetColumnWipLimit`)
    #[serde(default)]
    pub context: HashMap<String, Value>,
}

impl RuleContext {
    /// Create a context for an action type
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    /// Set the origination channel
    pub fn source(mut self, source: MutationSource) -> Self {
        self.source = source;
        self
    }

    /// Set the workspace id
    pub fn workspace(mut self, id: impl Into<String>) -> Self {
        self.workspace_id = id.into();
        self
    }

    /// Set the actor id
    pub fn actor(mut self, id: impl Into<String>) -> Self {
        self.actor_id = id.into();
        self
    }

    /// Add a payload field
    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Add a pre-loaded fact
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Raw payload value. `Some(Value::Null)` means the key was sent explicitly.
    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Payload value as a string, if it is one
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Fact as an integer, if it is one
    pub fn context_i64(&self, key: &str) -> Option<i64> {
        self.context.get(key).and_then(as_integer)
    }

    /// Fact as a boolean, if it is one
    pub fn context_bool(&self, key: &str) -> Option<bool> {
        self.context.get(key).and_then(Value::as_bool)
    }

    /// Fact as a string, if it is one
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }
}

/// Integers, plus floats with no fractional part (JSON clients send `5.0`).
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}
