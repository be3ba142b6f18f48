//! Integration tests for the rule engine with the built-in rule set.
//!
//! These exercise the engine the way a mutation handler does: build a
//! context, evaluate it against a shared engine, inspect the result.

use async_trait::async_trait;
use flowboard_policy::{
    actions, codes, BusinessRule, EngineResult, MutationSource, RuleConfig, RuleContext,
    RuleEngine, RuleError, RuleResult, RuleViolation,
};
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn engine() -> RuleEngine {
    init_tracing();
    RuleEngine::with_default_rules(&RuleConfig::default())
}

fn ctx(action: &str) -> RuleContext {
    RuleContext::new(action)
        .source(MutationSource::Manual)
        .workspace("ws-1")
        .actor("user-1")
}

fn codes_of(result: &EngineResult) -> Vec<&str> {
    result.codes()
}

struct Broken;

#[async_trait]
impl BusinessRule for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn applies_to(&self) -> &[&str] {
        &[actions::CREATE_NODE]
    }

    async fn evaluate(&self, ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        // assumes a fact the handler never loads
        if !ctx.context.contains_key("neverThere") {
            return Err(RuleError::execution("broken", "missing fact dereferenced"));
        }
        Ok(RuleResult::pass())
    }
}

struct Tagged(&'static str, &'static [&'static str]);

#[async_trait]
impl BusinessRule for Tagged {
    fn name(&self) -> &str {
        self.0
    }

    fn applies_to(&self) -> &[&str] {
        self.1
    }

    async fn evaluate(&self, _ctx: &RuleContext) -> Result<RuleResult, RuleError> {
        Ok(RuleResult::fail(RuleViolation::new(
            format!("{}_FIRED", self.0.to_uppercase()),
            "fired",
        )))
    }
}

// =============================================================================
// Engine properties
// =============================================================================

#[tokio::test]
async fn test_fault_isolation() {
    let mut engine = engine();
    engine.register(Arc::new(Broken));

    let result = engine.evaluate(&ctx(actions::CREATE_NODE)).await;

    assert!(!result.passed);
    let faults: Vec<_> = result.engine_faults().collect();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].details, Some(json!({ "ruleName": "broken" })));

    // other applicable rules ran and kept their own verdicts
    assert_eq!(
        result.evaluated_rules,
        vec!["title-validation", "wip-limit", "scope-expansion", "broken"]
    );
    assert_eq!(codes_of(&result), vec![codes::TITLE_REQUIRED, codes::RULE_ENGINE_ERROR]);
}

#[tokio::test]
async fn test_wildcard_rule_runs_for_every_action() {
    let engine = engine();
    for action in [actions::CREATE_NODE, actions::MOVE_NODE, "FOO_BAR_UNKNOWN"] {
        let result = engine.evaluate(&ctx(action)).await;
        assert!(
            result.evaluated_rules.iter().any(|r| r == "scope-expansion"),
            "scope-expansion missing for {}",
            action
        );
    }
}

#[tokio::test]
async fn test_move_only_rule_skipped_on_create() {
    let engine = engine();
    let result = engine
        .evaluate(&ctx(actions::CREATE_NODE).with_payload("title", "ok"))
        .await;
    assert!(!result.evaluated_rules.iter().any(|r| r == "cross-team-isolation"));
    assert!(!result.evaluated_rules.iter().any(|r| r == "completion-gating"));
}

#[tokio::test]
async fn test_violation_order_follows_registration() {
    init_tracing();
    let mut engine = RuleEngine::new();
    engine.register(Arc::new(Tagged("first", &[])));
    engine.register(Arc::new(Tagged("skipped", &[actions::MOVE_NODE])));
    engine.register(Arc::new(Tagged("second", &[actions::DELETE_NODE])));

    let result = engine.evaluate(&ctx(actions::DELETE_NODE)).await;
    assert_eq!(codes_of(&result), vec!["FIRST_FIRED", "SECOND_FIRED"]);
    assert_eq!(result.evaluated_rules, vec!["first", "second"]);
}

#[tokio::test]
async fn test_evaluation_is_idempotent() {
    let engine = engine();
    let make = || {
        ctx(actions::MOVE_NODE)
            .with_context("targetColumnWipLimit", 2)
            .with_context("targetColumnNodeCount", 3)
            .with_context("sourceTeamId", "t1")
            .with_context("targetTeamId", "t9")
    };

    let first = engine.evaluate(&make()).await;
    let second = engine.evaluate(&make()).await;
    assert_eq!(first, second);
    assert!(!first.passed);
}

#[tokio::test]
async fn test_shared_engine_across_tasks() {
    let engine = Arc::new(engine());
    let mut handles = Vec::new();

    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let ctx = ctx(actions::CREATE_NODE).with_payload("title", format!("Task {}", i));
            engine.evaluate(&ctx).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().passed);
    }
}

#[tokio::test]
async fn test_result_serializes_for_api_layer() {
    let engine = engine();
    let result = engine.evaluate(&ctx(actions::CREATE_NODE)).await;

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["passed"], json!(false));
    assert_eq!(value["violations"][0]["code"], json!("TITLE_REQUIRED"));
    assert!(value["evaluatedRules"].is_array());
}

// =============================================================================
// Built-in rule scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_title_required() {
    let result = engine().evaluate(&RuleContext::new(actions::CREATE_NODE)).await;
    assert!(!result.passed);
    assert!(result.has_violation(codes::TITLE_REQUIRED));
}

#[tokio::test]
async fn test_scenario_title_too_long() {
    let ctx = ctx(actions::UPDATE_NODE).with_payload("title", "x".repeat(201));
    let result = engine().evaluate(&ctx).await;

    let violation = result.violation(codes::TITLE_TOO_LONG).unwrap();
    assert_eq!(
        violation.details,
        Some(json!({ "maxLength": 200, "actualLength": 201 }))
    );
    assert!(!result.has_violation(codes::TITLE_REQUIRED));
}

#[tokio::test]
async fn test_scenario_wip_limit() {
    let engine = engine();
    let base = ctx(actions::CREATE_NODE)
        .with_payload("title", "New card")
        .with_context("targetColumnWipLimit", 5);

    let result = engine
        .evaluate(&base.clone().with_context("targetColumnNodeCount", 5))
        .await;
    assert_eq!(
        result.violation(codes::WIP_LIMIT_REACHED).unwrap().details,
        Some(json!({ "wipLimit": 5, "currentCount": 5 }))
    );

    let result = engine
        .evaluate(&base.with_context("targetColumnNodeCount", 4))
        .await;
    assert!(result.passed);
}

#[tokio::test]
async fn test_scenario_cross_team() {
    let engine = engine();

    let result = engine
        .evaluate(
            &ctx(actions::MOVE_NODE)
                .with_context("sourceTeamId", "t1")
                .with_context("targetTeamId", "t2"),
        )
        .await;
    assert!(result.has_violation(codes::CROSS_TEAM_MOVE_FORBIDDEN));

    let result = engine
        .evaluate(
            &ctx(actions::MOVE_NODE)
                .with_context("sourceTeamId", "t1")
                .with_context("targetTeamId", "t1"),
        )
        .await;
    assert!(result.passed);
}

#[tokio::test]
async fn test_scenario_scope_expansion_on_delete() {
    let result = engine()
        .evaluate(
            &ctx(actions::DELETE_NODE)
                .source(MutationSource::Agent)
                .with_context("maxEntitiesImpactedPerProposal", 3)
                .with_context("entitiesImpacted", 10),
        )
        .await;

    assert_eq!(codes_of(&result), vec![codes::SCOPE_EXPANSION_EXCEEDED]);
    assert_eq!(result.evaluated_rules, vec!["scope-expansion"]);
}

#[tokio::test]
async fn test_scenario_done_gating() {
    let engine = engine();

    let result = engine
        .evaluate(
            &ctx(actions::MOVE_NODE)
                .with_context("targetColumnIsDone", true)
                .with_context("incompleteChildrenCount", 2),
        )
        .await;
    assert_eq!(
        result.violation(codes::NODE_HAS_ACTIVE_CHILDREN).unwrap().details,
        Some(json!({ "incompleteChildrenCount": 2 }))
    );

    let result = engine
        .evaluate(
            &ctx(actions::MOVE_NODE)
                .with_context("targetColumnIsDone", true)
                .with_context("incompleteChildrenCount", 0),
        )
        .await;
    assert!(result.passed);
}

#[tokio::test]
async fn test_scenario_done_gating_on_update() {
    // marking done through an update, title untouched
    let result = engine()
        .evaluate(
            &ctx(actions::UPDATE_NODE)
                .with_payload("description", "wrap up")
                .with_context("targetColumnIsDone", true)
                .with_context("incompleteChildrenCount", 2),
        )
        .await;

    assert!(!result.passed);
    assert_eq!(codes_of(&result), vec![codes::NODE_HAS_ACTIVE_CHILDREN]);
    assert!(result.evaluated_rules.iter().any(|r| r == "completion-gating"));
    assert!(!result.evaluated_rules.iter().any(|r| r == "wip-limit"));
}

#[tokio::test]
async fn test_scenario_scope_max_without_impacted_count() {
    let result = engine()
        .evaluate(
            &ctx(actions::DELETE_NODE)
                .source(MutationSource::Scheduler)
                .with_context("maxEntitiesImpactedPerProposal", 3),
        )
        .await;

    assert!(result.passed);
    assert!(result.violations.is_empty());
    assert_eq!(result.evaluated_rules, vec!["scope-expansion"]);
}

#[tokio::test]
async fn test_missing_facts_pass() {
    // under-fetched context: every fact-driven rule silently does not apply
    let result = engine().evaluate(&ctx(actions::MOVE_NODE)).await;
    assert!(result.passed);
    assert_eq!(
        result.evaluated_rules,
        vec!["wip-limit", "completion-gating", "cross-team-isolation", "scope-expansion"]
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn test_config_from_yaml_drives_engine() {
    init_tracing();
    let config = RuleConfig::from_yaml(
        r#"
titleMaxLength: 10
disabledRules: [cross-team-isolation]
"#,
    )
    .unwrap();
    let engine = RuleEngine::with_default_rules(&config);

    assert!(!engine.list_rules().iter().any(|r| r == "cross-team-isolation"));

    let result = engine
        .evaluate(&ctx(actions::CREATE_NODE).with_payload("title", "Eleven chars"))
        .await;
    assert_eq!(
        result.violation(codes::TITLE_TOO_LONG).unwrap().details,
        Some(json!({ "maxLength": 10, "actualLength": 12 }))
    );

    let result = engine
        .evaluate(
            &ctx(actions::MOVE_NODE)
                .with_context("sourceTeamId", "t1")
                .with_context("targetTeamId", "t2"),
        )
        .await;
    assert!(result.passed);
}
