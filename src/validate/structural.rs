//! Graph-level structural rules: acyclicity, source/sink presence, port
//! constraints and reachability.

use petgraph::graph::NodeIndex;

use super::report::{Diagnostic, DiagnosticCode};
use crate::graph::PipelineGraph;
use crate::pipeline::{NodeId, PipelineDefinition};
use crate::registry::{NodeType, PortDirection};

/// Run all structural rules. Returns every finding.
pub fn validate_structural(
    pipeline: &PipelineDefinition,
    graph: &PipelineGraph,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    no_cycles(pipeline, graph, &mut diagnostics);
    has_source_and_sink(pipeline, &mut diagnostics);
    port_constraints(pipeline, graph, &mut diagnostics);
    reachability(pipeline, graph, &mut diagnostics);

    diagnostics
}

fn no_cycles(
    pipeline: &PipelineDefinition,
    graph: &PipelineGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let components = graph.cycle_components();
    if components.is_empty() {
        return;
    }
    let component = |node_id: &NodeId| graph.index(node_id).and_then(|idx| components.get(&idx));

    for node in pipeline.nodes() {
        if component(node.id()).is_some() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::Cycle,
                    format!("Node '{}' is part of a cycle", node.id()),
                )
                .on_node(node.id()),
            );
        }
    }

    for edge in pipeline.edges() {
        let source = component(edge.source());
        if source.is_some() && source == component(edge.target()) {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::CycleEdge,
                    format!(
                        "Edge '{}' from '{}' to '{}' closes a cycle",
                        edge.id(),
                        edge.source(),
                        edge.target()
                    ),
                )
                .on_edge(edge.id()),
            );
        }
    }
}

fn has_source_and_sink(pipeline: &PipelineDefinition, diagnostics: &mut Vec<Diagnostic>) {
    if !pipeline.nodes().iter().any(|n| n.node_type().is_source()) {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::MissingSource,
            "Pipeline must have at least one data source",
        ));
    }
    if !pipeline.nodes().iter().any(|n| n.node_type().is_sink()) {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::MissingSink,
            "Pipeline must have at least one data sink",
        ));
    }
}

fn port_constraints(
    pipeline: &PipelineDefinition,
    graph: &PipelineGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in pipeline.nodes() {
        let node_type = node.node_type();
        let ports = node_type.port_constraints;
        let degrees = [
            (PortDirection::Incoming, graph.incoming_count(node.id())),
            (PortDirection::Outgoing, graph.outgoing_count(node.id())),
        ];

        for (direction, count) in degrees {
            let min = ports.min(direction) as usize;
            if count < min {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::PortConstraint,
                        format!(
                            "{} node '{}' needs at least {} {} edge(s), found {}",
                            node_type.display_name,
                            node.id(),
                            min,
                            direction,
                            count
                        ),
                    )
                    .on_node(node.id()),
                );
            }

            let max = ports.max(direction).map(|m| m as usize);
            if let Some(max) = max.filter(|&max| count > max) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::PortConstraint,
                        format!(
                            "{} node '{}' allows at most {} {} edge(s), found {}",
                            node_type.display_name,
                            node.id(),
                            max,
                            direction,
                            count
                        ),
                    )
                    .on_node(node.id()),
                );
            }
        }
    }
}

/// Unreachable and dead-end nodes are warnings. Without any source every
/// other node is unreachable; without any sink every other node is a dead end.
fn reachability(
    pipeline: &PipelineDefinition,
    graph: &PipelineGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let indices_where = |pred: fn(&NodeType) -> bool| -> Vec<NodeIndex> {
        pipeline
            .nodes()
            .iter()
            .filter(|n| pred(n.node_type()))
            .filter_map(|n| graph.index(n.id()))
            .collect()
    };
    let sources = indices_where(NodeType::is_source);
    let sinks = indices_where(NodeType::is_sink);

    let fed = graph.reachable_from(sources);
    let drained = graph.reaching(sinks);

    for node in pipeline.nodes() {
        let Some(idx) = graph.index(node.id()) else {
            continue;
        };
        let node_type = node.node_type();

        if !fed.contains(&idx) && !node_type.is_source() {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::Unreachable,
                    format!("Node '{}' is not reachable from any data source", node.id()),
                )
                .on_node(node.id()),
            );
        }

        if !drained.contains(&idx) && !node_type.is_sink() {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::DeadEnd,
                    format!("Node '{}' does not lead to any data sink", node.id()),
                )
                .on_node(node.id()),
            );
        }
    }
}
