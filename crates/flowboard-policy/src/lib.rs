//! Flowboard Policy: Business Rules for Workspace Mutations
//!
//! Every mutation path (manual UI actions, agent proposals, schedulers) asks
//! the same [`RuleEngine`] whether a change is allowed, so WIP limits, title
//! validation, team isolation, completion gating and blast-radius limits are
//! enforced identically everywhere.
//!
//! # Architecture
//!
//! ```text
//! Mutation handler ─→ RuleContext ─→ RuleEngine::evaluate ─→ EngineResult
//!   (pre-fetches facts)                  │                    passed / violations
//!                                        ↓
//!                     applicable rules, in registration order
//!                     (faulty rule → RULE_ENGINE_ERROR, others still run)
//! ```
//!
//! # Example
//!
//! ```
//! use flowboard_policy::{RuleConfig, RuleContext, RuleEngine, MutationSource, codes};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = RuleEngine::with_default_rules(&RuleConfig::default());
//!
//! let ctx = RuleContext::new("MOVE_NODE")
//!     .source(MutationSource::Agent)
//!     .workspace("ws-1")
//!     .actor("agent-7")
//!     .with_context("targetColumnWipLimit", 5)
//!     .with_context("targetColumnNodeCount", 5);
//!
//! let result = engine.evaluate(&ctx).await;
//! assert!(!result.passed);
//! assert!(result.has_violation(codes::WIP_LIMIT_REACHED));
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod rules;

pub use audit::{AuditEntry, AuditLog, AuditStats};
pub use config::RuleConfig;
pub use engine::RuleEngine;
pub use rules::{
    default_rules, CompletionGatingRule, CrossTeamRule, ScopeExpansionRule, TitleRule,
    WipLimitRule,
};

// Re-exported so callers only need this crate
pub use flowboard_core::{
    actions, codes, BusinessRule, EngineError, EngineResult, MutationSource, RuleContext,
    RuleError, RuleResult, RuleViolation,
};

/// Evaluate `ctx` against the built-in rules with default configuration.
///
/// Convenience for one-off checks; long-lived services should build one
/// [`RuleEngine`] at startup and share it.
pub async fn check_mutation(ctx: &RuleContext) -> EngineResult {
    RuleEngine::with_default_rules(&RuleConfig::default())
        .evaluate(ctx)
        .await
}
