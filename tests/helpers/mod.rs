#![allow(dead_code)]

use pipeline_model::{NodeConfig, NodeId, NodeKind, PipelineDefinition, Schedule};
use serde_json::{Value, json};

// =============================================================================
// Logging
// =============================================================================

/// Route `tracing` output through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Config builders
// =============================================================================

pub fn config(value: Value) -> NodeConfig {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn source_config() -> NodeConfig {
    config(json!({
        "sourceType": "database",
        "connectionString": "x",
        "query": "SELECT 1"
    }))
}

pub fn sink_config() -> NodeConfig {
    config(json!({
        "sinkType": "database",
        "tableName": "t",
        "writeMode": "append"
    }))
}

pub fn transform_config() -> NodeConfig {
    config(json!({
        "transformationType": "filter",
        "transformationLogic": "amount > 0"
    }))
}

// =============================================================================
// Pipeline builders
// =============================================================================

pub fn draft() -> PipelineDefinition {
    PipelineDefinition::create("orders", "nightly orders load", Schedule::daily())
}

pub fn add(
    pipeline: &mut PipelineDefinition,
    kind: NodeKind,
    config: Option<NodeConfig>,
) -> NodeId {
    pipeline.add_node(kind, config).unwrap().id().clone()
}

pub fn connect(pipeline: &mut PipelineDefinition, source: &NodeId, target: &NodeId) {
    pipeline.add_edge(source, target).unwrap();
}

/// Configured source → transformation → sink. Validates clean.
pub fn linear() -> (PipelineDefinition, [NodeId; 3]) {
    let mut p = draft();
    let src = add(&mut p, NodeKind::DataSource, Some(source_config()));
    let t = add(&mut p, NodeKind::Transformation, Some(transform_config()));
    let sink = add(&mut p, NodeKind::DataSink, Some(sink_config()));
    connect(&mut p, &src, &t);
    connect(&mut p, &t, &sink);
    (p, [src, t, sink])
}
