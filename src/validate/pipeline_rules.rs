//! Pipeline-level property rules: name, description and schedule.

use super::report::{Diagnostic, DiagnosticCode};
use crate::config::ValidatorConfig;
use crate::pipeline::PipelineDefinition;

pub fn validate_properties(
    pipeline: &PipelineDefinition,
    config: &ValidatorConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let name = pipeline.name();
    if name.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::InvalidName,
            "Pipeline name is required",
        ));
    } else if name.chars().count() > config.max_name_length {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::InvalidName,
            format!(
                "Pipeline name must be at most {} characters",
                config.max_name_length
            ),
        ));
    }

    if pipeline.description().chars().count() > config.max_description_length {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::InvalidDescription,
            format!(
                "Description must be at most {} characters",
                config.max_description_length
            ),
        ));
    }

    if let Some(problem) = pipeline.schedule().problem() {
        diagnostics.push(Diagnostic::error(DiagnosticCode::InvalidSchedule, problem));
    }

    diagnostics
}
