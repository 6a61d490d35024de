//! Nodes, edges and their identifiers.

use serde::{Deserialize, Serialize};

use crate::binder::NodeConfig;
use crate::registry::{NodeKind, NodeType};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }
    };
}

string_id!(
    /// Stable identifier of a node within its pipeline.
    NodeId
);
string_id!(
    /// Stable identifier of an edge within its pipeline.
    EdgeId
);

/// Canvas coordinates. Only the UI interprets these.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) node_type: &'static NodeType,
    pub(crate) position: Position,
    pub(crate) config: NodeConfig,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn node_type(&self) -> &'static NodeType {
        self.node_type
    }

    pub fn kind(&self) -> NodeKind {
        self.node_type.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
}

impl Edge {
    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }
}
