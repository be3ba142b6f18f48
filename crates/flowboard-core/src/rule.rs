//! BusinessRule Trait: the one contract every policy implements
use crate::context::RuleContext;
use crate::error::RuleError;
use crate::verdict::RuleResult;
use async_trait::async_trait;

/// A registered policy.
///
/// `evaluate` is a pure decision: it reads the context and returns a verdict.
/// A failed check is `Ok` with `passed: false`; `Err` is reserved for defects
/// inside the rule itself, which the engine isolates.
#[async_trait]
pub trait BusinessRule: Send + Sync {
    /// Unique, stable identifier (e.g. "wip-limit")
    fn name(&self) -> &str;

    /// Action types this rule cares about. Empty means every action type.
    fn applies_to(&self) -> &[&str];

    fn is_applicable(&self, action_type: &str) -> bool {
        let targets = self.applies_to();
        targets.is_empty() || targets.iter().any(|t| *t == action_type)
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError>;
}
