//! Violation and result types for rule evaluation
//!
//! A rule returns a [`RuleResult`]; the engine folds those into an
//! [`EngineResult`]. Policy failures are always carried as data here.

use crate::codes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single policy failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    /// Stable machine-readable code (see [`crate::codes`])
    pub code: String,
    /// Message safe to show to an end user
    pub message: String,
    /// Diagnostic values, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RuleViolation {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Violation synthesized by the engine when a rule fails to run.
    pub fn engine_error(rule_name: &str) -> Self {
        Self::new(
            codes::RULE_ENGINE_ERROR,
            format!("Rule \"{}\" failed to evaluate", rule_name),
        )
        .with_details(serde_json::json!({ "ruleName": rule_name }))
    }

    pub fn is_engine_fault(&self) -> bool {
        self.code == codes::RULE_ENGINE_ERROR
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub passed: bool,
    pub violations: Vec<RuleViolation>,
}

impl RuleResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    pub fn fail(violation: RuleViolation) -> Self {
        Self {
            passed: false,
            violations: vec![violation],
        }
    }

    /// `passed` is derived from the list so the two cannot disagree.
    pub fn from_violations(violations: Vec<RuleViolation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }
}

impl Default for RuleResult {
    fn default() -> Self {
        Self::pass()
    }
}

/// Aggregated outcome returned to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResult {
    /// True iff no applicable rule produced a violation
    pub passed: bool,
    /// Violations in rule registration order
    pub violations: Vec<RuleViolation>,
    /// Names of the rules that were applicable and ran
    pub evaluated_rules: Vec<String>,
}

impl EngineResult {
    pub fn codes(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.code.as_str()).collect()
    }

    pub fn has_violation(&self, code: &str) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    pub fn violation(&self, code: &str) -> Option<&RuleViolation> {
        self.violations.iter().find(|v| v.code == code)
    }

    /// Violations caused by broken rules rather than by the mutation itself
    pub fn engine_faults(&self) -> impl Iterator<Item = &RuleViolation> {
        self.violations.iter().filter(|v| v.is_engine_fault())
    }

    pub fn summary(&self) -> String {
        if self.passed {
            format!("PASSED ({} rules evaluated)", self.evaluated_rules.len())
        } else {
            format!(
                "REJECTED: {} ({} rules evaluated)",
                self.codes().join(", "),
                self.evaluated_rules.len()
            )
        }
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
