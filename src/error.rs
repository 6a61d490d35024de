//! Unified error type used across the graph model, binder and lifecycle.

use thiserror::Error;

use crate::binder::ConfigError;
use crate::lifecycle::{LifecycleAction, LifecycleState};
use crate::pipeline::{EdgeId, NodeId};
use crate::registry::PortDirection;
use crate::validate::ValidationReport;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Structural,
    Configuration,
    Lifecycle,
    Registry,
    Concurrency,
    Serialization,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Structural => write!(f, "structural"),
            Category::Configuration => write!(f, "configuration"),
            Category::Lifecycle => write!(f, "lifecycle"),
            Category::Registry => write!(f, "registry"),
            Category::Concurrency => write!(f, "concurrency"),
            Category::Serialization => write!(f, "serialization"),
        }
    }
}

/// Every failure a caller can observe. None of them leave the pipeline
/// partially modified.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("node '{0}' not found")]
    NodeNotFound(NodeId),

    #[error("edge '{0}' not found")]
    EdgeNotFound(EdgeId),

    #[error("node '{0}' cannot be connected to itself")]
    SelfLoop(NodeId),

    #[error("an edge from '{from}' to '{to}' already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("node '{node_id}' accepts at most {limit} {direction} edge(s)")]
    PortLimitExceeded {
        node_id: NodeId,
        direction: PortDirection,
        limit: u32,
    },

    #[error("id '{0}' is used more than once")]
    DuplicateId(String),

    #[error("invalid node configuration ({} problem(s))", .0.len())]
    InvalidConfig(Vec<ConfigError>),

    #[error("cannot {action} a pipeline that is {state}")]
    InvalidTransition {
        state: LifecycleState,
        action: LifecycleAction,
    },

    #[error("pipeline validation failed with {} error(s)", .0.errors().count())]
    ValidationFailed(ValidationReport),

    #[error("pipeline cannot be edited while {0}")]
    NotEditable(LifecycleState),

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("stale revision: expected {expected}, pipeline is at {actual}")]
    StaleRevision { expected: u64, actual: u64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn category(&self) -> Category {
        match self {
            PipelineError::NodeNotFound(_)
            | PipelineError::EdgeNotFound(_)
            | PipelineError::SelfLoop(_)
            | PipelineError::DuplicateEdge { .. }
            | PipelineError::PortLimitExceeded { .. }
            | PipelineError::DuplicateId(_) => Category::Structural,
            PipelineError::InvalidConfig(_) => Category::Configuration,
            PipelineError::InvalidTransition { .. }
            | PipelineError::ValidationFailed(_)
            | PipelineError::NotEditable(_) => Category::Lifecycle,
            PipelineError::UnknownNodeType(_) => Category::Registry,
            PipelineError::StaleRevision { .. } => Category::Concurrency,
            PipelineError::Serialization(_) => Category::Serialization,
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::NodeNotFound(_) => "nodeNotFound",
            PipelineError::EdgeNotFound(_) => "edgeNotFound",
            PipelineError::SelfLoop(_) => "selfLoop",
            PipelineError::DuplicateEdge { .. } => "duplicateEdge",
            PipelineError::PortLimitExceeded { .. } => "portLimitExceeded",
            PipelineError::DuplicateId(_) => "duplicateId",
            PipelineError::InvalidConfig(_) => "invalidConfig",
            PipelineError::InvalidTransition { .. } => "invalidTransition",
            PipelineError::ValidationFailed(_) => "validationFailed",
            PipelineError::NotEditable(_) => "notEditable",
            PipelineError::UnknownNodeType(_) => "unknownNodeType",
            PipelineError::StaleRevision { .. } => "staleRevision",
            PipelineError::Serialization(_) => "serialization",
        }
    }

    /// The node the error is about, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            PipelineError::NodeNotFound(id) | PipelineError::SelfLoop(id) => Some(id),
            PipelineError::DuplicateEdge { from, .. } => Some(from),
            PipelineError::PortLimitExceeded { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}
