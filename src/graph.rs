//! petgraph-based directed graph view over a pipeline definition.
//!
//! The view borrows ids from the definition and is rebuilt for every
//! validation pass; it is never mutated.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};

use crate::pipeline::{EdgeId, NodeId, PipelineDefinition};

pub struct PipelineGraph<'a> {
    pub graph: DiGraph<&'a NodeId, &'a EdgeId>,
    pub node_indices: HashMap<&'a NodeId, NodeIndex>,
}

impl<'a> PipelineGraph<'a> {
    pub fn build(pipeline: &'a PipelineDefinition) -> Self {
        let mut graph = DiGraph::with_capacity(pipeline.nodes().len(), pipeline.edges().len());
        let mut node_indices = HashMap::new();

        for node in pipeline.nodes() {
            let idx = graph.add_node(node.id());
            node_indices.insert(node.id(), idx);
        }

        // Endpoints always exist: the definition never holds a dangling edge.
        for edge in pipeline.edges() {
            if let (Some(&s), Some(&t)) = (
                node_indices.get(edge.source()),
                node_indices.get(edge.target()),
            ) {
                graph.add_edge(s, t, edge.id());
            }
        }

        PipelineGraph {
            graph,
            node_indices,
        }
    }

    pub fn index(&self, node_id: &NodeId) -> Option<NodeIndex> {
        self.node_indices.get(node_id).copied()
    }

    pub fn incoming_count(&self, node_id: &NodeId) -> usize {
        self.degree(node_id, Direction::Incoming)
    }

    pub fn outgoing_count(&self, node_id: &NodeId) -> usize {
        self.degree(node_id, Direction::Outgoing)
    }

    fn degree(&self, node_id: &NodeId, direction: Direction) -> usize {
        self.index(node_id)
            .map(|idx| self.graph.edges_directed(idx, direction).count())
            .unwrap_or(0)
    }

    /// Maps every node that sits on a directed cycle to the number of its
    /// strongly connected component. Nodes off any cycle are absent.
    pub fn cycle_components(&self) -> HashMap<NodeIndex, usize> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .enumerate()
            .flat_map(|(n, component)| component.into_iter().map(move |idx| (idx, n)))
            .collect()
    }

    /// Every node reachable from any of `starts`, starts included.
    pub fn reachable_from(
        &self,
        starts: impl IntoIterator<Item = NodeIndex>,
    ) -> HashSet<NodeIndex> {
        let mut reached = HashSet::new();
        for start in starts {
            if reached.contains(&start) {
                continue;
            }
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(nx) = bfs.next(&self.graph) {
                reached.insert(nx);
            }
        }
        reached
    }

    /// Every node from which any of `targets` can be reached, targets included.
    pub fn reaching(&self, targets: impl IntoIterator<Item = NodeIndex>) -> HashSet<NodeIndex> {
        let reversed = Reversed(&self.graph);
        let mut reached = HashSet::new();
        for target in targets {
            if reached.contains(&target) {
                continue;
            }
            let mut bfs = Bfs::new(reversed, target);
            while let Some(nx) = bfs.next(reversed) {
                reached.insert(nx);
            }
        }
        reached
    }

    /// Node ids in topological order, or the id of a node on a cycle.
    pub fn topological_order(&self) -> Result<Vec<&'a NodeId>, &'a NodeId> {
        toposort(&self.graph, None)
            .map(|indices| indices.into_iter().map(|idx| self.graph[idx]).collect())
            .map_err(|cycle| self.graph[cycle.node_id()])
    }
}
