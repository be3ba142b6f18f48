//! Completion gating: a node with open children cannot be marked done

use async_trait::async_trait;
use flowboard_core::{
    actions, codes, BusinessRule, RuleContext, RuleError, RuleResult, RuleViolation,
};
use serde_json::json;

pub const NAME: &str = "completion-gating";

/// Keeps a node out of a "done" state while it has incomplete children.
///
/// Reads `targetColumnIsDone` and `incompleteChildrenCount`. Applies to moves
/// into a done column and to updates that mark the node done.
#[derive(Debug, Clone, Default)]
pub struct CompletionGatingRule;

#[async_trait]
impl BusinessRule for CompletionGatingRule {
    fn name(&self) -> &str {
        NAME
    }

    fn applies_to(&self) -> &[&str] {
        &[actions::MOVE_NODE, actions::UPDATE_NODE]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        if ctx.context_bool("targetColumnIsDone") != Some(true) {
            return Ok(RuleResult::pass());
        }

        let incomplete = ctx.context_i64("incompleteChildrenCount").unwrap_or(0);
        if incomplete <= 0 {
            return Ok(RuleResult::pass());
        }

        Ok(RuleResult::fail(
            RuleViolation::new(
                codes::NODE_HAS_ACTIVE_CHILDREN,
                format!(
                    "This item cannot be completed while it has {} incomplete child item(s)",
                    incomplete
                ),
            )
            .with_details(json!({ "incompleteChildrenCount": incomplete })),
        ))
    }
}
