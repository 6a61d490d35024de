//! Validation phase: structural + semantic rules over a pipeline.
//!
//! Validation is a pure read of the definition. Diagnostics come out
//! pipeline-level first, then node-scoped in node insertion order, then
//! edge-scoped in edge insertion order; within one scope they keep rule
//! order. Repeated calls on an unchanged pipeline return equal reports.

pub mod node_rules;
pub mod pipeline_rules;
pub mod report;
pub mod structural;

pub use report::{Diagnostic, DiagnosticCode, Severity, ValidationReport};

use std::collections::HashMap;

use crate::config::ValidatorConfig;
use crate::graph::PipelineGraph;
use crate::pipeline::PipelineDefinition;

const TRACING_TARGET: &str = "pipeline_model::validate";

/// Validate with default settings.
pub fn validate(pipeline: &PipelineDefinition) -> ValidationReport {
    validate_with(pipeline, &ValidatorConfig::default())
}

pub fn validate_with(pipeline: &PipelineDefinition, config: &ValidatorConfig) -> ValidationReport {
    let graph = PipelineGraph::build(pipeline);

    let mut diagnostics = structural::validate_structural(pipeline, &graph);
    for node in pipeline.nodes() {
        diagnostics.extend(node_rules::validate_node_config(node, config));
    }
    diagnostics.extend(pipeline_rules::validate_properties(pipeline, config));

    sort_by_scope(pipeline, &mut diagnostics);
    let report = ValidationReport::from_diagnostics(diagnostics);

    tracing::trace!(
        target: TRACING_TARGET,
        pipeline_id = %pipeline.id(),
        revision = pipeline.revision(),
        is_valid = report.is_valid(),
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "Pipeline validated"
    );

    report
}

/// Stable sort, so rule order survives inside each scope.
fn sort_by_scope(pipeline: &PipelineDefinition, diagnostics: &mut [Diagnostic]) {
    let node_rank: HashMap<_, _> = pipeline
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id(), i))
        .collect();
    let edge_rank: HashMap<_, _> = pipeline
        .edges()
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id(), i))
        .collect();

    diagnostics.sort_by_key(|d| match (&d.node_id, &d.edge_id) {
        (Some(node_id), _) => (1, node_rank.get(node_id).copied().unwrap_or(usize::MAX)),
        (None, Some(edge_id)) => (2, edge_rank.get(edge_id).copied().unwrap_or(usize::MAX)),
        (None, None) => (0, 0),
    });
}
