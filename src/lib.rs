pub mod binder;
pub mod config;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod pipeline;
pub mod registry;
pub mod validate;
pub mod wasm;

pub use config::ValidatorConfig;
pub use error::{Category, PipelineError, Result};
pub use lifecycle::{LifecycleAction, LifecycleState};
pub use pipeline::{
    Edge, EdgeId, Node, NodeConfig, NodeId, PipelineDefinition, Position, Schedule,
    SerializedPipeline,
};
pub use registry::{NodeKind, NodeType};
pub use validate::{
    Diagnostic, DiagnosticCode, Severity, ValidationReport, validate, validate_with,
};
