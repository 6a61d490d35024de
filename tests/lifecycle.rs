//! Integration tests for lifecycle transitions and their guards.

mod helpers;

use helpers::*;
use pipeline_model::{
    DiagnosticCode, LifecycleAction, LifecycleState, NodeKind, PipelineError, ValidatorConfig,
};
use serde_json::json;

#[test]
fn deploy_without_sink_is_rejected() {
    init_tracing();
    let mut p = draft();
    add(&mut p, NodeKind::DataSource, Some(source_config()));
    let revision = p.revision();

    match p.deploy().unwrap_err() {
        PipelineError::ValidationFailed(report) => {
            assert!(!report.is_valid());
            assert!(report.has(DiagnosticCode::MissingSink));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(p.state(), LifecycleState::Draft);
    assert_eq!(p.revision(), revision);
}

#[test]
fn full_lifecycle_round() {
    let (mut p, [_, t, _]) = linear();

    let report = p.deploy().unwrap();
    assert!(report.is_valid());
    assert_eq!(p.state(), LifecycleState::Active);

    p.pause().unwrap();
    assert_eq!(p.state(), LifecycleState::Paused);

    p.resume().unwrap();
    assert_eq!(p.state(), LifecycleState::Active);

    p.fail().unwrap();
    assert_eq!(p.state(), LifecycleState::Failed);
    assert!(matches!(
        p.update_node_config(&t, transform_config()),
        Err(PipelineError::NotEditable(LifecycleState::Failed))
    ));

    p.edit().unwrap();
    assert_eq!(p.state(), LifecycleState::Draft);
    p.update_node_config(&t, transform_config()).unwrap();

    p.deploy().unwrap();
    assert_eq!(p.state(), LifecycleState::Active);
}

#[test]
fn each_transition_bumps_revision() {
    let (mut p, _) = linear();
    let start = p.revision();
    p.deploy().unwrap();
    p.pause().unwrap();
    p.edit().unwrap();
    assert_eq!(p.revision(), start + 3);
}

#[test]
fn undefined_transitions_leave_state_alone() {
    let (mut p, _) = linear();

    let err = p.pause().unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidTransition {
            state: LifecycleState::Draft,
            action: LifecycleAction::Pause
        }
    ));
    assert_eq!(err.to_string(), "cannot pause a pipeline that is draft");

    assert!(p.resume().is_err());
    assert!(p.edit().is_err());
    assert!(p.fail().is_err());
    assert_eq!(p.state(), LifecycleState::Draft);

    p.deploy().unwrap();
    assert!(matches!(
        p.deploy(),
        Err(PipelineError::InvalidTransition {
            state: LifecycleState::Active,
            action: LifecycleAction::Deploy
        })
    ));
    assert!(matches!(
        p.edit(),
        Err(PipelineError::InvalidTransition { .. })
    ));
    assert_eq!(p.state(), LifecycleState::Active);
}

#[test]
fn resume_revalidates_after_paused_edits() {
    let (mut p, [_, _, sink]) = linear();
    p.deploy().unwrap();
    p.pause().unwrap();

    p.remove_node(&sink).unwrap();
    let revision = p.revision();
    assert!(matches!(
        p.resume(),
        Err(PipelineError::ValidationFailed(_))
    ));
    assert_eq!(p.state(), LifecycleState::Paused);
    assert_eq!(p.revision(), revision);

    let sink = add(&mut p, NodeKind::DataSink, Some(sink_config()));
    let t = p.nodes()[1].id().clone();
    connect(&mut p, &t, &sink);
    p.resume().unwrap();
    assert_eq!(p.state(), LifecycleState::Active);
}

#[test]
fn failed_pipeline_can_resume_when_still_valid() {
    let (mut p, _) = linear();
    p.deploy().unwrap();
    p.fail().unwrap();
    p.resume().unwrap();
    assert_eq!(p.state(), LifecycleState::Active);
}

#[test]
fn deploy_returns_warnings_with_clean_report() {
    let (mut p, [src, ..]) = linear();
    let mut cfg = source_config();
    cfg.insert("retries".into(), json!(3));
    p.update_node_config(&src, cfg).unwrap();

    let report = p.deploy().unwrap();
    assert!(report.is_valid());
    assert_eq!(report.warnings().count(), 1);
}

#[test]
fn strict_deploy_blocks_on_unknown_fields() {
    let (mut p, [src, ..]) = linear();
    let mut cfg = source_config();
    cfg.insert("retries".into(), json!(3));
    p.update_node_config(&src, cfg).unwrap();

    let strict = ValidatorConfig {
        strict_unknown_fields: true,
        ..ValidatorConfig::default()
    };
    assert!(matches!(
        p.deploy_with(&strict),
        Err(PipelineError::ValidationFailed(_))
    ));
    assert_eq!(p.state(), LifecycleState::Draft);
}
