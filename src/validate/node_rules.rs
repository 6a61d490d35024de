//! Per-node configuration completeness, via the configuration binder.

use super::report::{Diagnostic, DiagnosticCode, Severity};
use crate::binder::{self, ConfigError, ConfigErrorKind};
use crate::config::ValidatorConfig;
use crate::pipeline::Node;

/// Re-bind a node's stored config. Returns all findings in schema order.
pub fn validate_node_config(node: &Node, config: &ValidatorConfig) -> Vec<Diagnostic> {
    binder::check(node.node_type(), node.config())
        .into_iter()
        .map(|finding| to_diagnostic(node, finding, config))
        .collect()
}

fn to_diagnostic(node: &Node, finding: ConfigError, config: &ValidatorConfig) -> Diagnostic {
    let code = match finding.kind {
        ConfigErrorKind::MissingField => DiagnosticCode::MissingField,
        ConfigErrorKind::TypeMismatch { .. } => DiagnosticCode::TypeMismatch,
        ConfigErrorKind::InvalidEnumValue { .. } => DiagnosticCode::InvalidEnumValue,
        ConfigErrorKind::OutOfRange { .. } => DiagnosticCode::OutOfRange,
        ConfigErrorKind::UnknownField => DiagnosticCode::UnknownField,
    };
    let severity = match finding.severity() {
        Severity::Warning if config.strict_unknown_fields => Severity::Error,
        severity => severity,
    };

    Diagnostic::new(severity, code, finding.to_string())
        .on_node(node.id())
        .on_field(finding.field)
}
