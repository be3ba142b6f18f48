//! Blast-radius limit for a single proposal
//!
//! Applies to every action type. Mostly relevant for agent and scheduler
//! proposals, which can touch many entities at once.

use async_trait::async_trait;
use flowboard_core::{codes, BusinessRule, RuleContext, RuleError, RuleResult, RuleViolation};
use serde_json::json;

pub const NAME: &str = "scope-expansion";

/// Caps the number of entities one proposal may touch.
///
/// Reads `maxEntitiesImpactedPerProposal` and `entitiesImpacted`; fires only
/// when a positive maximum is configured and exceeded.
#[derive(Debug, Clone, Default)]
pub struct ScopeExpansionRule;

#[async_trait]
impl BusinessRule for ScopeExpansionRule {
    fn name(&self) -> &str {
        NAME
    }

    fn applies_to(&self) -> &[&str] {
        &[]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        let max = ctx
            .context_i64("maxEntitiesImpactedPerProposal")
            .filter(|m| *m > 0);
        let impacted = ctx.context_i64("entitiesImpacted");

        match (max, impacted) {
            (Some(max), Some(impacted)) if impacted > max => Ok(RuleResult::fail(
                RuleViolation::new(
                    codes::SCOPE_EXPANSION_EXCEEDED,
                    format!(
                        "This change would affect {} items, more than the allowed {}",
                        impacted, max
                    ),
                )
                .with_details(json!({
                    "maxEntitiesImpactedPerProposal": max,
                    "entitiesImpacted": impacted,
                })),
            )),
            _ => Ok(RuleResult::pass()),
        }
    }
}
