//! Audit trail of rule evaluations
//!
//! The engine itself keeps no state; callers that want a record of decisions
//! feed each context/result pair into an [`AuditLog`].

use chrono::{DateTime, Utc};
use flowboard_core::{EngineResult, MutationSource, RuleContext};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::{RuleConfig, DEFAULT_AUDIT_MAX_ENTRIES};

/// One recorded evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique entry ID (uuid v4)
    pub id: String,

    /// When the evaluation was recorded
    pub timestamp: DateTime<Utc>,

    /// Channel the mutation came from
    pub source: MutationSource,

    /// Workspace the mutation targeted
    pub workspace_id: String,

    /// Who triggered the mutation
    pub actor_id: String,

    /// Action being evaluated (e.g. `MOVE_NODE`)
    pub action_type: String,

    /// Whether the engine allowed the mutation
    pub passed: bool,

    /// Violation codes, in the order the engine reported them
    #[serde(default)]
    pub violation_codes: Vec<String>,

    /// Rules that were applicable and ran
    #[serde(default)]
    pub evaluated_rules: Vec<String>,

    /// Set when at least one violation came from a broken rule
    #[serde(default)]
    pub engine_fault: bool,
}

impl AuditEntry {
    /// Create a new audit entry from an evaluation
    pub fn from_evaluation(ctx: &RuleContext, result: &EngineResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            source: ctx.source,
            workspace_id: ctx.workspace_id.clone(),
            actor_id: ctx.actor_id.clone(),
            action_type: ctx.action_type.clone(),
            passed: result.passed,
            violation_codes: result
                .violations
                .iter()
                .map(|v| v.code.clone())
                .collect(),
            evaluated_rules: result.evaluated_rules.clone(),
            engine_fault: result.engine_faults().next().is_some(),
        }
    }
}

/// Bounded in-memory audit log; the oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
}

impl AuditLog {
    /// Create a new audit log with the default capacity
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_AUDIT_MAX_ENTRIES)
    }

    /// Create with the capacity from `auditMaxEntries`
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::with_max_entries(config.audit_max_entries)
    }

    /// Create with a custom capacity (at least one entry)
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max.max(1),
        }
    }

    /// Record an evaluation and return the new entry's id.
    pub fn record(&mut self, ctx: &RuleContext, result: &EngineResult) -> String {
        let entry = AuditEntry::from_evaluation(ctx, result);
        let id = entry.id.clone();
        self.log(entry);
        id
    }

    /// Append an entry, dropping the oldest ones past capacity
    pub fn log(&mut self, entry: AuditEntry) {
        if !entry.passed {
            tracing::info!(
                audit_id = %entry.id,
                workspace_id = %entry.workspace_id,
                action_type = %entry.action_type,
                source = %entry.source,
                violations = ?entry.violation_codes,
                "mutation rejected by business rules"
            );
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by ID
    pub fn get(&self, id: &str) -> Option<&AuditEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries for one workspace
    pub fn for_workspace<'a>(
        &'a self,
        workspace_id: &'a str,
    ) -> impl Iterator<Item = &'a AuditEntry> {
        self.entries.iter().filter(move |e| e.workspace_id == workspace_id)
    }

    /// Entries where the mutation was rejected
    pub fn blocked(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(|e| !e.passed)
    }

    /// Compute statistics over the current entries
    pub fn stats(&self) -> AuditStats {
        let total = self.entries.len();
        let blocked = self.blocked().count();
        let engine_faults = self.entries.iter().filter(|e| e.engine_fault).count();

        AuditStats {
            total,
            passed: total - blocked,
            blocked,
            engine_faults,
            block_rate: if total == 0 {
                0.0
            } else {
                blocked as f64 / total as f64
            },
        }
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export entries as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates over the current audit log contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    /// Total evaluations recorded
    pub total: usize,
    /// Evaluations that allowed the mutation
    pub passed: usize,
    /// Evaluations that rejected the mutation
    pub blocked: usize,
    /// Evaluations with at least one `RULE_ENGINE_ERROR`
    pub engine_faults: usize,
    /// Fraction of evaluations that were blocked (0.0 when empty)
    pub block_rate: f64,
}
