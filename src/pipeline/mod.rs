//! Graph model: the pipeline definition and its mutation operations.
//!
//! Nodes and edges live in insertion-ordered arenas keyed by string ids.
//! Every successful mutation bumps the revision by one; a failed one leaves
//! the definition untouched.

pub mod node;
pub mod schedule;
pub mod serialized;

pub use node::{Edge, EdgeId, Node, NodeId, Position};
pub use schedule::Schedule;
pub use serialized::{SerializedEdge, SerializedNode, SerializedPipeline};

pub use crate::binder::NodeConfig;

use crate::binder::{self, ConfigError};
use crate::error::{PipelineError, Result};
use crate::graph::PipelineGraph;
use crate::lifecycle::{self, LifecycleState};
use crate::registry::{self, NodeKind, PortDirection};
use crate::validate;

const TRACING_TARGET: &str = "pipeline_model::pipeline";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDefinition {
    id: String,
    name: String,
    description: String,
    schedule: Schedule,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    state: LifecycleState,
    revision: u64,
    next_node_seq: u64,
    next_edge_seq: u64,
}

impl PipelineDefinition {
    /// Creates an empty draft pipeline with a fresh id.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        schedule: Schedule,
    ) -> Self {
        let pipeline = PipelineDefinition {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            schedule,
            nodes: Vec::new(),
            edges: Vec::new(),
            state: LifecycleState::Draft,
            revision: 0,
            next_node_seq: 0,
            next_edge_seq: 0,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %pipeline.id,
            name = %pipeline.name,
            "Pipeline created"
        );

        pipeline
    }

    /// Rebuilds a pipeline from its serialized form.
    ///
    /// Structural consistency is enforced (known kinds, unique ids, existing
    /// endpoints, no self-loops or parallel edges). Configs and port limits
    /// are left to the validator so incomplete drafts still load. A pipeline
    /// in a non-editable state must validate cleanly.
    pub fn load(serialized: SerializedPipeline) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(serialized.nodes.len());
        for n in serialized.nodes {
            let node_type = registry::lookup(&n.kind)?;
            if nodes.iter().any(|existing| existing.id == n.id) {
                return Err(PipelineError::DuplicateId(n.id.to_string()));
            }
            nodes.push(Node {
                id: n.id,
                node_type,
                position: n.position,
                config: n.config,
            });
        }

        let mut edges: Vec<Edge> = Vec::with_capacity(serialized.edges.len());
        for e in serialized.edges {
            if edges.iter().any(|existing| existing.id == e.id) {
                return Err(PipelineError::DuplicateId(e.id.to_string()));
            }
            for endpoint in [&e.source_node_id, &e.target_node_id] {
                if !nodes.iter().any(|n| &n.id == endpoint) {
                    return Err(PipelineError::NodeNotFound(endpoint.clone()));
                }
            }
            if e.source_node_id == e.target_node_id {
                return Err(PipelineError::SelfLoop(e.source_node_id));
            }
            if edges
                .iter()
                .any(|x| x.source == e.source_node_id && x.target == e.target_node_id)
            {
                return Err(PipelineError::DuplicateEdge {
                    from: e.source_node_id,
                    to: e.target_node_id,
                });
            }
            edges.push(Edge {
                id: e.id,
                source: e.source_node_id,
                target: e.target_node_id,
            });
        }

        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %serialized.id,
            nodes = nodes.len(),
            edges = edges.len(),
            revision = serialized.revision,
            "Pipeline loaded"
        );

        let pipeline = PipelineDefinition {
            id: serialized.id,
            name: serialized.name,
            description: serialized.description,
            schedule: serialized.schedule,
            next_node_seq: nodes.len() as u64,
            next_edge_seq: edges.len() as u64,
            nodes,
            edges,
            state: serialized.lifecycle_state,
            revision: serialized.revision,
        };

        if !lifecycle::is_editable(pipeline.state) {
            let report = pipeline.validate();
            if !report.is_valid() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    pipeline_id = %pipeline.id,
                    state = %pipeline.state,
                    errors = report.errors().count(),
                    "Loaded pipeline violates its lifecycle state"
                );
                return Err(PipelineError::ValidationFailed(report));
            }
        }

        Ok(pipeline)
    }

    pub fn serialize(&self) -> SerializedPipeline {
        SerializedPipeline {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            lifecycle_state: self.state,
            revision: self.revision,
            nodes: self
                .nodes
                .iter()
                .map(|n| SerializedNode {
                    id: n.id.clone(),
                    kind: n.kind().as_str().to_string(),
                    config: n.config.clone(),
                    position: n.position,
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| SerializedEdge {
                    id: e.id.clone(),
                    source_node_id: e.source.clone(),
                    target_node_id: e.target.clone(),
                })
                .collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Validates the current graph. Pure read; see [`validate::validate`].
    pub fn validate(&self) -> validate::ValidationReport {
        validate::validate(self)
    }

    /// Node ids in an order where every edge points forward.
    ///
    /// Fails with `ValidationFailed` carrying the cycle diagnostics when the
    /// graph is not acyclic.
    pub fn execution_order(&self) -> Result<Vec<NodeId>> {
        let graph = PipelineGraph::build(self);
        match graph.topological_order() {
            Ok(order) => Ok(order.into_iter().cloned().collect()),
            Err(_) => Err(PipelineError::ValidationFailed(self.validate())),
        }
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    /// Rejects the caller's next mutation if it was prepared against an
    /// older revision.
    pub fn expect_revision(&mut self, expected: u64) -> Result<&mut Self> {
        if expected != self.revision {
            return Err(PipelineError::StaleRevision {
                expected,
                actual: self.revision,
            });
        }
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a node of `kind`. A supplied config must bind; an omitted one
    /// starts empty and is left for the validator to flag.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        initial_config: Option<NodeConfig>,
    ) -> Result<&Node> {
        self.ensure_editable()?;
        let node_type = registry::get(kind);
        let config = match initial_config {
            Some(config) => {
                binder::bind(node_type, &config)
                    .map_err(PipelineError::InvalidConfig)?;
                config
            }
            None => NodeConfig::new(),
        };

        let id = self.fresh_node_id();
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            node_id = %id,
            kind = %kind,
            "Node added"
        );

        self.nodes.push(Node {
            id,
            node_type,
            position: Position::default(),
            config,
        });
        self.bump();
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Removes a node together with every edge that touches it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        self.ensure_editable()?;
        let index = self.node_index(id)?;

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        self.nodes.remove(index);

        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            node_id = %id,
            removed_edges = before - self.edges.len(),
            "Node removed"
        );
        self.bump();
        Ok(())
    }

    /// Connects `source` to `target`.
    ///
    /// Cycles are not rejected here; the validator reports them.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> Result<&Edge> {
        self.ensure_editable()?;
        let source_type = self.nodes[self.node_index(source)?].node_type;
        let target_type = self.nodes[self.node_index(target)?].node_type;

        if source == target {
            return Err(PipelineError::SelfLoop(source.clone()));
        }
        if self.outgoing(source).any(|e| &e.target == target) {
            return Err(PipelineError::DuplicateEdge {
                from: source.clone(),
                to: target.clone(),
            });
        }

        let outgoing = self.outgoing(source).count();
        let incoming = self.incoming(target).count();
        let ports = [
            (source, source_type, PortDirection::Outgoing, outgoing),
            (target, target_type, PortDirection::Incoming, incoming),
        ];
        for (node_id, node_type, direction, current) in ports {
            let constraints = &node_type.port_constraints;
            if !constraints.admits(direction, current) {
                return Err(PipelineError::PortLimitExceeded {
                    node_id: node_id.clone(),
                    direction,
                    limit: constraints.max(direction).unwrap_or_default(),
                });
            }
        }

        let id = self.fresh_edge_id();
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            edge_id = %id,
            source = %source,
            target = %target,
            "Edge added"
        );

        self.edges.push(Edge {
            id,
            source: source.clone(),
            target: target.clone(),
        });
        self.bump();
        Ok(&self.edges[self.edges.len() - 1])
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<()> {
        self.ensure_editable()?;
        let index = self
            .edges
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| PipelineError::EdgeNotFound(id.clone()))?;
        self.edges.remove(index);

        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            edge_id = %id,
            "Edge removed"
        );
        self.bump();
        Ok(())
    }

    /// Replaces a node's config wholesale. Returns the binder's warnings.
    pub fn update_node_config(
        &mut self,
        id: &NodeId,
        config: NodeConfig,
    ) -> Result<Vec<ConfigError>> {
        self.ensure_editable()?;
        let index = self.node_index(id)?;
        let node_type = self.nodes[index].node_type;
        let warnings = binder::bind(node_type, &config)
            .map_err(PipelineError::InvalidConfig)?;

        self.nodes[index].config = config;
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            node_id = %id,
            warnings = warnings.len(),
            "Node config updated"
        );
        self.bump();
        Ok(warnings)
    }

    /// Moves a node on the canvas. Allowed in every lifecycle state since
    /// positions are never validated.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<()> {
        let index = self.node_index(id)?;
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            node_id = %id,
            x = position.x,
            y = position.y,
            "Node moved"
        );
        self.nodes[index].position = position;
        self.bump();
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.name = name.into();
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            name = %self.name,
            "Pipeline renamed"
        );
        self.bump();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.description = description.into();
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            len = self.description.len(),
            "Description changed"
        );
        self.bump();
        Ok(())
    }

    pub fn set_schedule(&mut self, schedule: Schedule) -> Result<()> {
        self.ensure_editable()?;
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id,
            schedule = ?schedule,
            "Schedule changed"
        );
        self.schedule = schedule;
        self.bump();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn ensure_editable(&self) -> Result<()> {
        if lifecycle::is_editable(self.state) {
            Ok(())
        } else {
            Err(PipelineError::NotEditable(self.state))
        }
    }

    fn node_index(&self, id: &NodeId) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| PipelineError::NodeNotFound(id.clone()))
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            self.next_node_seq += 1;
            let id = NodeId::new(format!("node-{}", self.next_node_seq));
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_edge_id(&mut self) -> EdgeId {
        loop {
            self.next_edge_seq += 1;
            let id = EdgeId::new(format!("edge-{}", self.next_edge_seq));
            if self.edge(&id).is_none() {
                return id;
            }
        }
    }
}
