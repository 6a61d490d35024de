//! Integration tests for loading and serializing pipelines.

mod helpers;

use helpers::*;
use pipeline_model::pipeline::{SerializedEdge, SerializedNode};
use pipeline_model::{
    DiagnosticCode, EdgeId, LifecycleState, NodeConfig, NodeId, NodeKind, PipelineDefinition,
    PipelineError, Position, Schedule, SerializedPipeline,
};

#[test]
fn fixture_round_trips() {
    let json = include_str!("fixtures/orders_pipeline.json");
    let serialized = SerializedPipeline::from_json(json).unwrap();
    let pipeline = PipelineDefinition::load(serialized.clone()).unwrap();

    assert_eq!(pipeline.serialize(), serialized);
    assert_eq!(pipeline.revision(), 7);
    assert_eq!(pipeline.schedule(), &Schedule::cron("0 2 * * *"));
    assert_eq!(pipeline.nodes()[2].kind(), NodeKind::QualityCheck);
    assert_eq!(pipeline.nodes()[3].position(), Position::new(700.0, 120.0));
    assert!(pipeline.validate().is_valid());
}

#[test]
fn built_pipeline_round_trips_through_json() {
    let (mut p, [src, ..]) = linear();
    p.move_node(&src, Position::new(12.5, -4.0)).unwrap();

    let json = p.serialize().to_json().unwrap();
    let restored = SerializedPipeline::from_json(&json).unwrap();
    let restored = PipelineDefinition::load(restored).unwrap();
    assert_eq!(restored.serialize(), p.serialize());
    assert_eq!(restored.validate(), p.validate());
}

#[test]
fn loaded_pipeline_keeps_allocating_fresh_ids() {
    let json = include_str!("fixtures/orders_pipeline.json");
    let serialized = SerializedPipeline::from_json(json).unwrap();
    let mut p = PipelineDefinition::load(serialized).unwrap();

    let id = add(&mut p, NodeKind::Transformation, None);
    assert!(p.nodes()[..4].iter().all(|n| n.id() != &id));
    let src = p.nodes()[0].id().clone();
    let edge = p.add_edge(&src, &id).unwrap().id().clone();
    assert!(p.edges()[..3].iter().all(|e| e.id() != &edge));
}

#[test]
fn state_survives_serialization() {
    let (mut p, _) = linear();
    p.deploy().unwrap();
    p.pause().unwrap();

    let restored = PipelineDefinition::load(p.serialize()).unwrap();
    assert_eq!(restored.state(), LifecycleState::Paused);
    assert_eq!(restored.revision(), p.revision());
    assert_eq!(restored.id(), p.id());
}

#[test]
fn legacy_draft_loads_and_reports_config_problems() {
    let json = include_str!("fixtures/legacy_draft.json");
    let serialized = SerializedPipeline::from_json(json).unwrap();
    let p = PipelineDefinition::load(serialized).unwrap();
    assert_eq!(p.description(), "");
    assert_eq!(p.schedule(), &Schedule::Manual);
    assert_eq!(p.revision(), 0);

    let report = p.validate();
    let codes: Vec<_> = report.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            DiagnosticCode::MissingSink,
            // src
            DiagnosticCode::DeadEnd,
            DiagnosticCode::InvalidEnumValue,
            // qc
            DiagnosticCode::PortConstraint,
            DiagnosticCode::DeadEnd,
            DiagnosticCode::OutOfRange,
        ]
    );
}

fn node(id: &str, kind: &str) -> SerializedNode {
    SerializedNode {
        id: NodeId::new(id),
        kind: kind.into(),
        config: NodeConfig::new(),
        position: Position::default(),
    }
}

fn edge(id: &str, source: &str, target: &str) -> SerializedEdge {
    SerializedEdge {
        id: EdgeId::new(id),
        source_node_id: NodeId::new(source),
        target_node_id: NodeId::new(target),
    }
}

#[test]
fn load_rejects_unknown_kind() {
    let mut s = draft().serialize();
    s.nodes.push(node("a", "webhookTrigger"));
    let err = PipelineDefinition::load(s).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::UnknownNodeType(ref kind) if kind == "webhookTrigger"
    ));
    assert_eq!(err.category(), pipeline_model::Category::Registry);
}

#[test]
fn load_rejects_parallel_edges_and_duplicate_edge_ids() {
    let mut s = draft().serialize();
    s.nodes = vec![node("a", "dataSource"), node("b", "dataSink")];
    s.edges = vec![edge("e1", "a", "b"), edge("e2", "a", "b")];
    assert!(matches!(
        PipelineDefinition::load(s.clone()),
        Err(PipelineError::DuplicateEdge { .. })
    ));

    s.nodes.push(node("c", "dataSink"));
    s.edges = vec![edge("e1", "a", "b"), edge("e1", "a", "c")];
    assert!(matches!(
        PipelineDefinition::load(s),
        Err(PipelineError::DuplicateId(id)) if id == "e1"
    ));
}

#[test]
fn load_does_not_enforce_port_limits() {
    let mut s = draft().serialize();
    s.nodes = vec![node("a", "dataSink"), node("b", "dataSource")];
    s.edges = vec![edge("e1", "a", "b")];
    let p = PipelineDefinition::load(s).unwrap();

    let report = p.validate();
    assert!(
        report
            .for_node(&NodeId::new("a"))
            .any(|d| d.code == DiagnosticCode::PortConstraint)
    );
    assert!(
        report
            .for_node(&NodeId::new("b"))
            .any(|d| d.code == DiagnosticCode::PortConstraint)
    );
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = SerializedPipeline::from_json(r#"{ "id": 3 }"#).unwrap_err();
    assert_eq!(err.code(), "serialization");
}

#[test]
fn active_pipeline_must_satisfy_its_state() {
    let mut s = draft().serialize();
    s.lifecycle_state = LifecycleState::Active;
    s.nodes = vec![node("a", "transformation"), node("b", "transformation")];
    s.edges = vec![edge("e1", "a", "b"), edge("e2", "b", "a")];

    match PipelineDefinition::load(s).unwrap_err() {
        PipelineError::ValidationFailed(report) => {
            assert!(report.has(DiagnosticCode::MissingSource));
            assert!(report.has(DiagnosticCode::MissingSink));
            assert!(report.has(DiagnosticCode::Cycle));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn failed_pipeline_without_sink_is_rejected() {
    let (mut p, [.., sink]) = linear();
    p.remove_node(&sink).unwrap();
    let mut s = p.serialize();
    s.lifecycle_state = LifecycleState::Failed;

    assert!(matches!(
        PipelineDefinition::load(s),
        Err(PipelineError::ValidationFailed(report)) if report.has(DiagnosticCode::MissingSink)
    ));
}

#[test]
fn paused_pipeline_loads_mid_edit() {
    let (mut p, [.., sink]) = linear();
    p.deploy().unwrap();
    p.pause().unwrap();
    p.remove_node(&sink).unwrap();

    let restored = PipelineDefinition::load(p.serialize()).unwrap();
    assert_eq!(restored.state(), LifecycleState::Paused);
    assert!(!restored.validate().is_valid());
}
