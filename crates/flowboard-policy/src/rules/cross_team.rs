//! Cross-team isolation for moves

use async_trait::async_trait;
use flowboard_core::{
    actions, codes, BusinessRule, RuleContext, RuleError, RuleResult, RuleViolation,
};
use serde_json::{json, Value};

pub const NAME: &str = "cross-team-isolation";

/// Forbids moving a node onto a board owned by another team.
///
/// Reads `sourceTeamId` and `targetTeamId`. Ids are compared as raw JSON
/// values, so string and numeric ids both count; the rule does not apply
/// when either id is missing or `null`.
#[derive(Debug, Clone, Default)]
pub struct CrossTeamRule;

fn team_id<'a>(ctx: &'a RuleContext, key: &str) -> Option<&'a Value> {
    ctx.context.get(key).filter(|v| !v.is_null())
}

#[async_trait]
impl BusinessRule for CrossTeamRule {
    fn name(&self) -> &str {
        NAME
    }

    fn applies_to(&self) -> &[&str] {
        &[actions::MOVE_NODE]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        let (Some(source), Some(target)) = (
            team_id(ctx, "sourceTeamId"),
            team_id(ctx, "targetTeamId"),
        ) else {
            return Ok(RuleResult::pass());
        };

        if source == target {
            return Ok(RuleResult::pass());
        }

        Ok(RuleResult::fail(
            RuleViolation::new(
                codes::CROSS_TEAM_MOVE_FORBIDDEN,
                "Items cannot be moved between boards owned by different teams",
            )
            .with_details(json!({
                "sourceTeamId": source,
                "targetTeamId": target,
            })),
        ))
    }
}
