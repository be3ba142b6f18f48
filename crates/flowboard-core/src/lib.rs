//! Flowboard Core: Rule Contract, Context, and Violation Model
//!
//! Shared vocabulary between mutation handlers and the rule engine. Handlers
//! build a [`RuleContext`], rules implement [`BusinessRule`], and outcomes
//! travel back as [`RuleResult`] / [`EngineResult`].

pub mod context;
pub mod error;
pub mod rule;
pub mod verdict;

pub use context::{MutationSource, RuleContext};
pub use error::{EngineError, RuleError};
pub use rule::BusinessRule;
pub use verdict::{EngineResult, RuleResult, RuleViolation};

/// Well-known action types. The set is open; any string is a valid action type.
pub mod actions {
    pub const CREATE_NODE: &str = "CREATE_NODE";
    pub const MOVE_NODE: &str = "MOVE_NODE";
    pub const UPDATE_NODE: &str = "UPDATE_NODE";
    pub const DELETE_NODE: &str = "DELETE_NODE";
}

/// Violation codes. Clients branch on these; never rename one.
pub mod codes {
    pub const TITLE_REQUIRED: &str = "TITLE_REQUIRED";
    pub const TITLE_TOO_LONG: &str = "TITLE_TOO_LONG";
    pub const WIP_LIMIT_REACHED: &str = "WIP_LIMIT_REACHED";
    pub const NODE_HAS_ACTIVE_CHILDREN: &str = "NODE_HAS_ACTIVE_CHILDREN";
    pub const CROSS_TEAM_MOVE_FORBIDDEN: &str = "CROSS_TEAM_MOVE_FORBIDDEN";
    pub const SCOPE_EXPANSION_EXCEEDED: &str = "SCOPE_EXPANSION_EXCEEDED";
    pub const RULE_ENGINE_ERROR: &str = "RULE_ENGINE_ERROR";
}
