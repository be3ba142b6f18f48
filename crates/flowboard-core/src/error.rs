//! Unified Error Model
use thiserror::Error;

/// Raised by a rule that could not reach a verdict.
///
/// Never used for ordinary policy failures; the engine turns it into a
/// `RULE_ENGINE_ERROR` violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("RULE/{rule}: {message}")]
    Execution { rule: String, message: String },
}

impl RuleError {
    pub fn execution(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced to callers of the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("CONTEXT/{0}")]
    InvalidContext(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}
