//! Rule Engine: registry and single evaluation entry point for every mutation path
//!
//! Rules run sequentially in registration order so the violation list and
//! the `evaluated_rules` trace are deterministic. A rule that errors, panics,
//! or returns a result whose `passed` flag disagrees with its violations is
//! reported as a `RULE_ENGINE_ERROR` violation and the remaining rules still
//! run.

use crate::config::RuleConfig;
use crate::rules::default_rules;
use flowboard_core::{
    BusinessRule, EngineError, EngineResult, RuleContext, RuleResult, RuleViolation,
};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Append-only registry of business rules.
///
/// Register everything at startup, then share the engine (e.g. in an `Arc`);
/// `evaluate` only needs `&self`.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn BusinessRule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine pre-loaded with the built-in rule set.
    pub fn with_default_rules(config: &RuleConfig) -> Self {
        let mut engine = Self::new();
        for rule in default_rules(config) {
            engine.register(rule);
        }
        engine
    }

    /// Append a rule. Duplicate names are accepted and evaluated separately.
    pub fn register(&mut self, rule: Arc<dyn BusinessRule>) {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            tracing::warn!(rule = rule.name(), "registering duplicate rule name");
        }
        tracing::info!(
            rule = rule.name(),
            applies_to = ?rule.applies_to(),
            "registered business rule"
        );
        self.rules.push(rule);
    }

    /// Evaluate every applicable rule against `ctx`.
    ///
    /// Never fails: rule faults become violations. An empty action type
    /// matches only wildcard rules.
    pub async fn evaluate(&self, ctx: &RuleContext) -> EngineResult {
        let start = Instant::now();
        let mut violations = Vec::new();
        let mut evaluated_rules = Vec::new();

        for rule in self.rules.iter().filter(|r| r.is_applicable(&ctx.action_type)) {
            evaluated_rules.push(rule.name().to_string());

            match run_isolated(rule.as_ref(), ctx).await {
                Ok(result) => violations.extend(result.violations),
                Err(reason) => {
                    tracing::error!(
                        rule = rule.name(),
                        action_type = %ctx.action_type,
                        workspace_id = %ctx.workspace_id,
                        error = %reason,
                        "business rule failed to evaluate"
                    );
                    violations.push(RuleViolation::engine_error(rule.name()));
                }
            }
        }

        let passed = violations.is_empty();
        tracing::debug!(
            action_type = %ctx.action_type,
            source = %ctx.source,
            passed,
            rules = evaluated_rules.len(),
            violations = violations.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "evaluated business rules"
        );

        EngineResult {
            passed,
            violations,
            evaluated_rules,
        }
    }

    /// Like [`evaluate`](Self::evaluate), but rejects a context without an
    /// action type or workspace id instead of evaluating it.
    pub async fn evaluate_strict(&self, ctx: &RuleContext) -> Result<EngineResult, EngineError> {
        if ctx.action_type.trim().is_empty() {
            return Err(EngineError::InvalidContext("actionType is required".into()));
        }
        if ctx.workspace_id.trim().is_empty() {
            return Err(EngineError::InvalidContext("workspaceId is required".into()));
        }
        Ok(self.evaluate(ctx).await)
    }

    /// Names of all registered rules, in registration order.
    pub fn list_rules(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.list_rules())
            .finish()
    }
}

/// Run one rule, turning `Err`, panics and self-contradicting results into a
/// reason string.
async fn run_isolated(rule: &dyn BusinessRule, ctx: &RuleContext) -> Result<RuleResult, String> {
    match AssertUnwindSafe(rule.evaluate(ctx)).catch_unwind().await {
        Ok(Ok(result)) if result.passed != result.violations.is_empty() => Err(format!(
            "inconsistent result: passed={} with {} violation(s)",
            result.passed,
            result.violations.len()
        )),
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => Err(err.to_string()),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
