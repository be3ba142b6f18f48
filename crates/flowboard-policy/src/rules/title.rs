//! Title validation for created and renamed nodes

use crate::config::DEFAULT_TITLE_MAX_LENGTH;
use async_trait::async_trait;
use flowboard_core::{
    actions, codes, BusinessRule, RuleContext, RuleError, RuleResult, RuleViolation,
};
use serde_json::json;

pub const NAME: &str = "title-validation";

const TITLE_FIELD: &str = "title";

/// Requires a non-blank title no longer than `max_length` characters.
///
/// Runs on every create. On update it runs only when the payload carries a
/// `title` key, since most updates leave the title alone.
#[derive(Debug, Clone)]
pub struct TitleRule {
    max_length: usize,
}

impl TitleRule {
    /// Create with a custom maximum length
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Configured maximum length in characters
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for TitleRule {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_MAX_LENGTH)
    }
}

#[async_trait]
impl BusinessRule for TitleRule {
    fn name(&self) -> &str {
        NAME
    }

    fn applies_to(&self) -> &[&str] {
        &[actions::CREATE_NODE, actions::UPDATE_NODE]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        let is_create = ctx.action_type == actions::CREATE_NODE;
        if !is_create && ctx.payload_value(TITLE_FIELD).is_none() {
            return Ok(RuleResult::pass());
        }

        let title = ctx.payload_str(TITLE_FIELD).map(str::trim).unwrap_or("");
        if title.is_empty() {
            return Ok(RuleResult::fail(RuleViolation::new(
                codes::TITLE_REQUIRED,
                "Title is required",
            )));
        }

        let length = title.chars().count();
        if length > self.max_length {
            return Ok(RuleResult::fail(
                RuleViolation::new(
                    codes::TITLE_TOO_LONG,
                    format!("Title must be at most {} characters", self.max_length),
                )
                .with_details(json!({
                    "maxLength": self.max_length,
                    "actualLength": length,
                })),
            ));
        }

        Ok(RuleResult::pass())
    }
}
