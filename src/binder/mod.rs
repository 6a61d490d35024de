//! Configuration binder: checks a node configuration payload against the
//! declarative schema of its node type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::registry::{FieldSpec, FieldType, NodeType};
use crate::validate::Severity;

/// Field name to value. Owned exclusively by its node.
pub type NodeConfig = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("field '{field}': {kind}")]
pub struct ConfigError {
    pub field: String,
    pub kind: ConfigErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConfigErrorKind {
    #[error("required field is missing")]
    MissingField,

    #[error("expected a value of type {expected}")]
    TypeMismatch { expected: FieldType },

    #[error("'{value}' is not an allowed value")]
    InvalidEnumValue { value: String },

    #[error("{value} is outside the allowed range")]
    OutOfRange {
        value: i64,
        min: Option<i64>,
        max: Option<i64>,
    },

    #[error("field is not part of the schema")]
    UnknownField,
}

impl ConfigErrorKind {
    /// Unknown fields are warnings; everything else blocks.
    pub fn severity(&self) -> Severity {
        match self {
            ConfigErrorKind::UnknownField => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl ConfigError {
    fn new(field: &str, kind: ConfigErrorKind) -> Self {
        ConfigError {
            field: field.to_string(),
            kind,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Bind `config` to `node_type`.
///
/// On success returns the warning-level findings (unknown fields). On
/// failure returns only the error-level findings.
pub fn bind(
    node_type: &NodeType,
    config: &NodeConfig,
) -> Result<Vec<ConfigError>, Vec<ConfigError>> {
    let (warnings, errors): (Vec<_>, Vec<_>) = check(node_type, config)
        .into_iter()
        .partition(|e| e.severity() == Severity::Warning);

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(errors)
    }
}

/// Every finding for `config`, in schema order followed by unknown fields.
pub fn check(node_type: &NodeType, config: &NodeConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for field in node_type.config_schema {
        check_field(field, config.get(field.name), &mut errors);
    }

    for key in config.keys() {
        if node_type.field(key).is_none() {
            errors.push(ConfigError::new(key, ConfigErrorKind::UnknownField));
        }
    }

    errors
}

fn check_field(field: &FieldSpec, value: Option<&Value>, errors: &mut Vec<ConfigError>) {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ => {
            if field.required {
                errors.push(ConfigError::new(field.name, ConfigErrorKind::MissingField));
            }
            return;
        }
    };

    let mismatch = || {
        ConfigError::new(
            field.name,
            ConfigErrorKind::TypeMismatch {
                expected: field.field_type,
            },
        )
    };

    match field.field_type {
        FieldType::String | FieldType::SecretString | FieldType::TextBlock => {
            if !value.is_string() {
                errors.push(mismatch());
            }
        }
        FieldType::Enum => match value.as_str() {
            Some(s) => check_enum_value(field, s, errors),
            None => errors.push(mismatch()),
        },
        FieldType::MultiEnum => {
            let Some(items) = value.as_array() else {
                errors.push(mismatch());
                return;
            };
            if items.iter().any(|item| !item.is_string()) {
                errors.push(mismatch());
                return;
            }
            for s in items.iter().filter_map(Value::as_str) {
                check_enum_value(field, s, errors);
            }
        }
        FieldType::Integer => match as_integer(value) {
            Some(n) => {
                let exact = i64::try_from(n).ok();
                let below = field.min.is_some_and(|min| n < i128::from(min));
                let above = field.max.is_some_and(|max| n > i128::from(max));
                if exact.is_none() || below || above {
                    // Reported value saturates at the i64 bounds.
                    let value = exact.unwrap_or(if n < 0 { i64::MIN } else { i64::MAX });
                    errors.push(ConfigError::new(
                        field.name,
                        ConfigErrorKind::OutOfRange {
                            value,
                            min: field.min,
                            max: field.max,
                        },
                    ));
                }
            }
            None => errors.push(mismatch()),
        },
    }
}

fn check_enum_value(field: &FieldSpec, value: &str, errors: &mut Vec<ConfigError>) {
    if !field.values.contains(&value) {
        errors.push(ConfigError::new(
            field.name,
            ConfigErrorKind::InvalidEnumValue {
                value: value.to_string(),
            },
        ));
    }
}

/// `null`, whitespace-only strings and empty arrays count as absent.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Form inputs deliver numbers as strings, so numeric strings are accepted.
/// Integers too wide for `i128` saturate rather than fail to parse.
fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i128)),
        Value::String(s) => parse_integer(s.trim()),
        _ => None,
    }
}

fn parse_integer(s: &str) -> Option<i128> {
    if let Ok(n) = s.parse::<i128>() {
        return Some(n);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i128::MIN } else { i128::MAX })
}
