//! Node type catalog entries: kinds, configuration schema fields and port
//! constraints.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

// =============================================================================
// NODE KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    DataSource,
    Transformation,
    Validation,
    QualityCheck,
    DataSink,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::DataSource,
        NodeKind::Transformation,
        NodeKind::Validation,
        NodeKind::QualityCheck,
        NodeKind::DataSink,
    ];

    /// Wire name used in serialized pipelines.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::DataSource => "dataSource",
            NodeKind::Transformation => "transformation",
            NodeKind::Validation => "validation",
            NodeKind::QualityCheck => "qualityCheck",
            NodeKind::DataSink => "dataSink",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownNodeType(s.to_string()))
    }
}

// =============================================================================
// CONFIG SCHEMA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    SecretString,
    Enum,
    MultiEnum,
    Integer,
    TextBlock,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::SecretString => "secretString",
            FieldType::Enum => "enum",
            FieldType::MultiEnum => "multiEnum",
            FieldType::Integer => "integer",
            FieldType::TextBlock => "textBlock",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a node type's configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Allowed values for `Enum` and `MultiEnum` fields.
    #[serde(skip_serializing_if = "no_values")]
    pub values: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, field_type: FieldType) -> Self {
        FieldSpec {
            name,
            label,
            field_type,
            required: false,
            values: &[],
            min: None,
            max: None,
        }
    }

    pub const fn one_of(
        name: &'static str,
        label: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        FieldSpec {
            values,
            ..FieldSpec::new(name, label, FieldType::Enum)
        }
    }

    pub const fn many_of(
        name: &'static str,
        label: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        FieldSpec {
            values,
            ..FieldSpec::new(name, label, FieldType::MultiEnum)
        }
    }

    pub const fn integer(name: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        FieldSpec {
            min: Some(min),
            max: Some(max),
            ..FieldSpec::new(name, label, FieldType::Integer)
        }
    }

    pub const fn required(self) -> Self {
        FieldSpec {
            required: true,
            ..self
        }
    }
}

// =============================================================================
// PORTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortDirection {
    Incoming,
    Outgoing,
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortDirection::Incoming => write!(f, "incoming"),
            PortDirection::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// Degree bounds for a node. `None` as a maximum means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConstraints {
    pub min_incoming: u32,
    pub max_incoming: Option<u32>,
    pub min_outgoing: u32,
    pub max_outgoing: Option<u32>,
}

impl PortConstraints {
    pub const fn new(
        min_incoming: u32,
        max_incoming: Option<u32>,
        min_outgoing: u32,
        max_outgoing: Option<u32>,
    ) -> Self {
        PortConstraints {
            min_incoming,
            max_incoming,
            min_outgoing,
            max_outgoing,
        }
    }

    pub fn min(&self, direction: PortDirection) -> u32 {
        match direction {
            PortDirection::Incoming => self.min_incoming,
            PortDirection::Outgoing => self.min_outgoing,
        }
    }

    pub fn max(&self, direction: PortDirection) -> Option<u32> {
        match direction {
            PortDirection::Incoming => self.max_incoming,
            PortDirection::Outgoing => self.max_outgoing,
        }
    }

    /// Whether one more edge in `direction` fits on top of `current`.
    pub fn admits(&self, direction: PortDirection, current: usize) -> bool {
        self.max(direction).is_none_or(|max| current < max as usize)
    }
}

// =============================================================================
// NODE TYPE
// =============================================================================

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    pub kind: NodeKind,
    pub display_name: &'static str,
    pub config_schema: &'static [FieldSpec],
    pub port_constraints: PortConstraints,
}

impl NodeType {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.config_schema.iter().find(|f| f.name == name)
    }

    pub fn is_source(&self) -> bool {
        self.kind == NodeKind::DataSource
    }

    pub fn is_sink(&self) -> bool {
        self.kind == NodeKind::DataSink
    }
}
