//! Rule configuration
//!
//! Tunables for the built-in rule set, loadable from YAML or JSON.

use flowboard_core::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TITLE_MAX_LENGTH: usize = 200;
pub const DEFAULT_AUDIT_MAX_ENTRIES: usize = 10_000;

/// Configuration for the built-in rules and the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    /// Maximum title length in characters, after trimming
    pub title_max_length: usize,

    /// Built-in rule names that should not be registered
    pub disabled_rules: Vec<String>,

    /// Capacity of the in-memory audit log
    pub audit_max_entries: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            title_max_length: DEFAULT_TITLE_MAX_LENGTH,
            disabled_rules: Vec::new(),
            audit_max_entries: DEFAULT_AUDIT_MAX_ENTRIES,
        }
    }
}

impl RuleConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, EngineError> {
        serde_yaml::from_str(yaml).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn is_enabled(&self, rule_name: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule_name)
    }

    pub fn disable(mut self, rule_name: impl Into<String>) -> Self {
        self.disabled_rules.push(rule_name.into());
        self
    }
}
