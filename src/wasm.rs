//! WASM entry points for browser use.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::binder::{self, ConfigError, NodeConfig};
use crate::error::PipelineError;
use crate::pipeline::{PipelineDefinition, SerializedPipeline};
use crate::registry::{self, NodeType};
use crate::validate::ValidationReport;

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

/// The node type catalog, for the palette and the per-node config forms.
#[wasm_bindgen]
pub fn node_catalog() -> JsValue {
    to_js(&node_catalog_inner())
}

fn node_catalog_inner() -> &'static [&'static NodeType] {
    registry::catalog()
}

/// Validate a serialized pipeline.
/// Returns a ValidationReport, or a JSON array of error objects when the
/// pipeline cannot be loaded.
#[wasm_bindgen]
pub fn validate_pipeline(json: &str) -> JsValue {
    to_js(&validate_pipeline_inner(json))
}

fn validate_pipeline_inner(json: &str) -> ValidateResult {
    match load(json) {
        Ok(pipeline) => ValidateResult::Report(pipeline.validate()),
        Err(e) => ValidateResult::Errors(vec![ErrorDto::from(e)]),
    }
}

/// Check one node config JSON against the schema of `kind`.
/// Returns every finding, warnings included.
#[wasm_bindgen]
pub fn bind_node_config(kind: &str, config_json: &str) -> JsValue {
    to_js(&bind_node_config_inner(kind, config_json))
}

fn bind_node_config_inner(kind: &str, config_json: &str) -> BindResult {
    let node_type = match registry::lookup(kind) {
        Ok(t) => t,
        Err(e) => return BindResult::Errors(vec![ErrorDto::from(e)]),
    };
    let config = match serde_json::from_str::<NodeConfig>(config_json) {
        Ok(c) => c,
        Err(e) => {
            let error = PipelineError::from(e);
            return BindResult::Errors(vec![ErrorDto::from(error)]);
        }
    };
    BindResult::Findings(binder::check(node_type, &config))
}

/// Load → deploy. Returns `deployed` with the updated pipeline, `rejected`
/// with the blocking report, or `errors`.
#[wasm_bindgen]
pub fn deploy_pipeline(json: &str) -> JsValue {
    to_js(&deploy_pipeline_inner(json))
}

fn deploy_pipeline_inner(json: &str) -> DeployResult {
    let mut pipeline = match load(json) {
        Ok(p) => p,
        Err(e) => {
            return DeployResult::Errors {
                errors: vec![ErrorDto::from(e)],
            };
        }
    };

    match pipeline.deploy() {
        Ok(report) => DeployResult::Deployed {
            pipeline: Box::new(pipeline.serialize()),
            report,
        },
        Err(PipelineError::ValidationFailed(report)) => DeployResult::Rejected { report },
        Err(e) => DeployResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

fn load(json: &str) -> crate::Result<PipelineDefinition> {
    PipelineDefinition::load(SerializedPipeline::from_json(json)?)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    category: String,
    message: String,
    node_id: Option<String>,
}

impl From<PipelineError> for ErrorDto {
    fn from(e: PipelineError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            category: e.category().to_string(),
            message: e.to_string(),
            node_id: e.node_id().map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ValidateResult {
    Report(ValidationReport),
    Errors(Vec<ErrorDto>),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BindResult {
    Findings(Vec<ConfigError>),
    Errors(Vec<ErrorDto>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum DeployResult {
    Deployed {
        pipeline: Box<SerializedPipeline>,
        report: ValidationReport,
    },
    Rejected { report: ValidationReport },
    Errors { errors: Vec<ErrorDto> },
}
