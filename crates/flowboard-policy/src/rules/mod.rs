//! Built-in business rules
//!
//! Each rule encodes one invariant and reads only the context keys it needs.

use crate::config::RuleConfig;
use flowboard_core::BusinessRule;
use std::sync::Arc;

pub mod completion;
pub mod cross_team;
pub mod scope_expansion;
pub mod title;
pub mod wip_limit;

pub use completion::CompletionGatingRule;
pub use cross_team::CrossTeamRule;
pub use scope_expansion::ScopeExpansionRule;
pub use title::TitleRule;
pub use wip_limit::WipLimitRule;

/// The built-in rule set in registration order, minus disabled rules.
pub fn default_rules(config: &RuleConfig) -> Vec<Arc<dyn BusinessRule>> {
    let all: Vec<Arc<dyn BusinessRule>> = vec![
        Arc::new(TitleRule::new(config.title_max_length)),
        Arc::new(WipLimitRule),
        Arc::new(CompletionGatingRule),
        Arc::new(CrossTeamRule),
        Arc::new(ScopeExpansionRule),
    ];

    all.into_iter()
        .filter(|rule| config.is_enabled(rule.name()))
        .collect()
}
