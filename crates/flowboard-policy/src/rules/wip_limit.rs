//! Column WIP limit

use async_trait::async_trait;
use flowboard_core::{
    actions, codes, BusinessRule, RuleContext, RuleError, RuleResult, RuleViolation,
};
use serde_json::json;

pub const NAME: &str = "wip-limit";

/// Rejects adding a node to a column that is already at its WIP limit.
///
/// Reads `targetColumnWipLimit` and `targetColumnNodeCount`. A limit of zero
/// or less means the column is unlimited; a missing value means the rule
/// does not apply.
#[derive(Debug, Clone, Default)]
pub struct WipLimitRule;

#[async_trait]
impl BusinessRule for WipLimitRule {
    fn name(&self) -> &str {
        NAME
    }

    fn applies_to(&self) -> &[&str] {
        &[actions::CREATE_NODE, actions::MOVE_NODE]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        let limit = ctx.context_i64("targetColumnWipLimit").filter(|l| *l > 0);
        let count = ctx.context_i64("targetColumnNodeCount");

        let (Some(wip_limit), Some(current_count)) = (limit, count) else {
            return Ok(RuleResult::pass());
        };

        if current_count < wip_limit {
            return Ok(RuleResult::pass());
        }

        Ok(RuleResult::fail(
            RuleViolation::new(
                codes::WIP_LIMIT_REACHED,
                format!("The target column has reached its WIP limit of {}", wip_limit),
            )
            .with_details(json!({
                "wipLimit": wip_limit,
                "currentCount": current_count,
            })),
        ))
    }
}
