//! Node type registry: the process-wide catalog of stage kinds.
//!
//! The catalog is a constant table; there is no way to register or modify
//! entries at runtime.

pub mod types;

pub use types::*;

use crate::error::PipelineError;

static DATA_SOURCE: NodeType = NodeType {
    kind: NodeKind::DataSource,
    display_name: "Data Source",
    config_schema: &[
        FieldSpec::one_of(
            "sourceType",
            "Source Type",
            &["database", "file", "api", "stream"],
        )
        .required(),
        FieldSpec::new(
            "connectionString",
            "Connection String",
            FieldType::SecretString,
        ),
        FieldSpec::new("query", "Query", FieldType::TextBlock),
    ],
    port_constraints: PortConstraints::new(0, Some(0), 1, None),
};

static TRANSFORMATION: NodeType = NodeType {
    kind: NodeKind::Transformation,
    display_name: "Transformation",
    config_schema: &[
        FieldSpec::one_of(
            "transformationType",
            "Transformation Type",
            &["filter", "map", "aggregate", "join"],
        )
        .required(),
        FieldSpec::new(
            "transformationLogic",
            "Transformation Logic",
            FieldType::TextBlock,
        ),
    ],
    port_constraints: PortConstraints::new(1, None, 1, None),
};

static VALIDATION: NodeType = NodeType {
    kind: NodeKind::Validation,
    display_name: "Schema Validation",
    config_schema: &[
        FieldSpec::new("schemaFile", "Schema File", FieldType::String),
        FieldSpec::new("validationRules", "Validation Rules", FieldType::TextBlock),
    ],
    port_constraints: PortConstraints::new(1, Some(1), 1, None),
};

static QUALITY_CHECK: NodeType = NodeType {
    kind: NodeKind::QualityCheck,
    display_name: "Quality Check",
    config_schema: &[
        FieldSpec::many_of(
            "qualityMetrics",
            "Quality Metrics",
            &["completeness", "accuracy", "consistency", "timeliness"],
        )
        .required(),
        FieldSpec::integer("threshold", "Quality Threshold", 0, 100),
    ],
    port_constraints: PortConstraints::new(1, Some(1), 1, None),
};

static DATA_SINK: NodeType = NodeType {
    kind: NodeKind::DataSink,
    display_name: "Data Sink",
    config_schema: &[
        FieldSpec::one_of(
            "sinkType",
            "Sink Type",
            &["database", "file", "dataWarehouse", "dataLake"],
        )
        .required(),
        FieldSpec::new("tableName", "Table Name", FieldType::String),
        FieldSpec::one_of("writeMode", "Write Mode", &["append", "overwrite", "merge"]),
    ],
    port_constraints: PortConstraints::new(1, None, 0, Some(0)),
};

/// Palette order.
static CATALOG: [&NodeType; 5] = [
    &DATA_SOURCE,
    &TRANSFORMATION,
    &VALIDATION,
    &QUALITY_CHECK,
    &DATA_SINK,
];

pub fn catalog() -> &'static [&'static NodeType] {
    &CATALOG
}

pub fn get(kind: NodeKind) -> &'static NodeType {
    match kind {
        NodeKind::DataSource => &DATA_SOURCE,
        NodeKind::Transformation => &TRANSFORMATION,
        NodeKind::Validation => &VALIDATION,
        NodeKind::QualityCheck => &QUALITY_CHECK,
        NodeKind::DataSink => &DATA_SINK,
    }
}

/// Look a node type up by its wire name (`"dataSource"`, ...).
pub fn lookup(name: &str) -> Result<&'static NodeType, PipelineError> {
    name.parse::<NodeKind>().map(get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_registered_once() {
        for kind in NodeKind::ALL {
            assert_eq!(get(kind).kind, kind);
            assert_eq!(catalog().iter().filter(|t| t.kind == kind).count(), 1);
        }
    }

    #[test]
    fn lookup_by_wire_name() {
        let qc = lookup("qualityCheck").unwrap();
        assert_eq!(qc.display_name, "Quality Check");
        assert!(matches!(
            lookup("webhook"),
            Err(PipelineError::UnknownNodeType(name)) if name == "webhook"
        ));
    }

    #[test]
    fn sources_and_sinks_are_one_sided() {
        let source = get(NodeKind::DataSource).port_constraints;
        assert_eq!(source.max(PortDirection::Incoming), Some(0));
        assert!(!source.admits(PortDirection::Incoming, 0));
        assert!(source.admits(PortDirection::Outgoing, 10));

        let sink = get(NodeKind::DataSink).port_constraints;
        assert!(!sink.admits(PortDirection::Outgoing, 0));
    }

    #[test]
    fn schema_fields_keep_declaration_order() {
        let sink = get(NodeKind::DataSink);
        let names: Vec<_> = sink.config_schema.iter().map(|f| f.name).collect();
        assert_eq!(names, ["sinkType", "tableName", "writeMode"]);
        assert!(sink.field("sinkType").unwrap().required);
        assert!(!sink.field("writeMode").unwrap().required);
    }
}
