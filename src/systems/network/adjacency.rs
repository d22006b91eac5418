use std::collections::{BTreeSet, HashMap};

use bevy::prelude::*;

use super::pattern::{classify, texture_name, DirectionSet};
use crate::components::{Category, GridPosition, NetworkKind, NodeMetadata};
use crate::error::{PlannerError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyNode {
    neighbors: BTreeSet<GridPosition>,
    pub metadata: NodeMetadata,
}

impl AdjacencyNode {
    pub fn neighbors(&self) -> impl Iterator<Item = &GridPosition> {
        self.neighbors.iter()
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Undirected cell graph for one network kind. Edges are stored on both
/// endpoints: `b` is a neighbor of `a` exactly when `a` is a neighbor of `b`.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    kind: NetworkKind,
    nodes: HashMap<GridPosition, AdjacencyNode>,
}

impl AdjacencyGraph {
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            nodes: HashMap::new(),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// Creates an unconnected node if none exists yet.
    pub fn add_node(&mut self, pos: GridPosition) {
        self.nodes.entry(pos).or_default();
    }

    pub fn add_connection(&mut self, a: GridPosition, b: GridPosition) -> Result<()> {
        if a == b {
            return Err(PlannerError::InvalidConnection {
                from: a,
                to: b,
                reason: "a cell cannot connect to itself",
            });
        }

        self.nodes.entry(a).or_default().neighbors.insert(b);
        self.nodes.entry(b).or_default().neighbors.insert(a);
        Ok(())
    }

    /// Deletes the node and every edge that touches it, then refreshes the
    /// pattern metadata of its former neighbors. Returns whether the node
    /// existed.
    pub fn remove_node(&mut self, pos: GridPosition) -> bool {
        if self.nodes.remove(&pos).is_none() {
            return false;
        }
        let mut orphaned = Vec::new();
        for (other, node) in self.nodes.iter_mut() {
            if node.neighbors.remove(&pos) {
                orphaned.push(*other);
            }
        }
        for other in orphaned {
            self.refresh_pattern(other);
        }
        true
    }

    /// Returns `false` when there was no edge to remove. Both endpoints get
    /// their pattern metadata refreshed.
    pub fn remove_connection(&mut self, a: GridPosition, b: GridPosition) -> bool {
        let mut removed = false;
        if let Some(node) = self.nodes.get_mut(&a) {
            removed |= node.neighbors.remove(&b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            removed |= node.neighbors.remove(&a);
        }
        if removed {
            self.refresh_pattern(a);
            self.refresh_pattern(b);
        }
        removed
    }

    /// Re-derives `pattern` and the texture suffix from the current
    /// neighbors. Only fields already present are rewritten.
    fn refresh_pattern(&mut self, pos: GridPosition) {
        let pattern = self.pattern(pos);
        let Some(node) = self.nodes.get_mut(&pos) else {
            return;
        };
        let metadata = &mut node.metadata;
        if metadata.pattern.is_some() {
            metadata.pattern = Some(pattern.to_pattern_code(true));
        }
        let texture = metadata
            .texture
            .as_deref()
            .and_then(|texture| texture.rsplit_once('_'))
            .map(|(base, _)| texture_name(base, pattern));
        if texture.is_some() {
            metadata.texture = texture;
        }
    }

    /// No-op when the node does not exist.
    pub fn update_metadata(&mut self, pos: GridPosition, patch: NodeMetadata) {
        if let Some(node) = self.nodes.get_mut(&pos) {
            node.metadata.merge(patch);
        }
    }

    pub fn metadata(&self, pos: GridPosition) -> NodeMetadata {
        self.nodes
            .get(&pos)
            .map(|node| node.metadata.clone())
            .unwrap_or_default()
    }

    pub fn connections(&self, pos: GridPosition) -> Vec<GridPosition> {
        self.nodes
            .get(&pos)
            .map(|node| node.neighbors.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn node(&self, pos: GridPosition) -> Option<&AdjacencyNode> {
        self.nodes.get(&pos)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&GridPosition, &AdjacencyNode)> {
        self.nodes.iter()
    }

    /// Each undirected edge once, lower endpoint first.
    pub fn edges(&self) -> impl Iterator<Item = (GridPosition, GridPosition)> + '_ {
        self.nodes.iter().flat_map(|(pos, node)| {
            node.neighbors
                .iter()
                .filter(move |neighbor| *pos < **neighbor)
                .map(move |neighbor| (*pos, *neighbor))
        })
    }

    pub fn has_node(&self, pos: GridPosition) -> bool {
        self.nodes.contains_key(&pos)
    }

    pub fn has_connection(&self, from: GridPosition, to: GridPosition) -> bool {
        self.nodes
            .get(&from)
            .is_some_and(|node| node.neighbors.contains(&to))
    }

    pub fn pattern(&self, pos: GridPosition) -> DirectionSet {
        self.nodes
            .get(&pos)
            .map(|node| classify(pos, node.neighbors.iter()))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// The four isolated conduit graphs.
#[derive(Resource, Debug, Clone)]
pub struct Networks {
    graphs: [AdjacencyGraph; 4],
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            graphs: NetworkKind::ALL.map(AdjacencyGraph::new),
        }
    }
}

impl Networks {
    pub fn get(&self, kind: NetworkKind) -> &AdjacencyGraph {
        &self.graphs[kind.index()]
    }

    pub fn get_mut(&mut self, kind: NetworkKind) -> &mut AdjacencyGraph {
        &mut self.graphs[kind.index()]
    }

    pub fn for_category(&self, category: Option<Category>) -> &AdjacencyGraph {
        self.get(NetworkKind::for_category(category))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjacencyGraph> {
        self.graphs.iter()
    }

    pub fn clear(&mut self) {
        for graph in &mut self.graphs {
            graph.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: GridPosition = GridPosition::new(0, 0);
    const B: GridPosition = GridPosition::new(1, 0);
    const C: GridPosition = GridPosition::new(1, 1);

    #[test]
    fn connections_are_symmetric() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Wires);
        graph.add_connection(A, B).unwrap();
        assert!(graph.has_connection(A, B));
        assert!(graph.has_connection(B, A));

        assert!(graph.remove_connection(A, B));
        assert!(!graph.has_connection(A, B));
        assert!(!graph.has_connection(B, A));
        assert!(graph.has_node(A) && graph.has_node(B));
    }

    #[test]
    fn duplicate_connections_are_ignored() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Pipes);
        graph.add_connection(A, B).unwrap();
        graph.add_connection(A, B).unwrap();
        graph.add_connection(B, A).unwrap();
        assert_eq!(graph.connections(A), vec![B]);
        assert_eq!(graph.connections(B), vec![A]);
        assert_eq!(graph.edges().count(), 1);
    }

    #[test]
    fn self_loops_are_rejected_without_mutation() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Pipes);
        let err = graph.add_connection(A, A).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidConnection { .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn removing_missing_edge_reports_false() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Pipes);
        assert!(!graph.remove_connection(A, B));
        graph.add_node(A);
        graph.add_node(B);
        assert!(!graph.remove_connection(A, B));
    }

    #[test]
    fn remove_node_strips_all_references() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Conveyors);
        graph.add_connection(A, B).unwrap();
        graph.add_connection(B, C).unwrap();
        assert!(graph.remove_node(B));
        assert!(!graph.has_node(B));
        assert!(graph.connections(A).is_empty());
        assert!(graph.connections(C).is_empty());
        assert_eq!(graph.len(), 2);
        assert!(!graph.remove_node(B));
    }

    fn tag(graph: &mut AdjacencyGraph, pos: GridPosition) {
        let pattern = graph.pattern(pos);
        graph.update_metadata(
            pos,
            NodeMetadata {
                display_name: Some("Gas Pipe".into()),
                texture: Some(texture_name("gas_pipe", pattern)),
                pattern: Some(pattern.to_pattern_code(true)),
            },
        );
    }

    #[test]
    fn removals_refresh_surviving_patterns() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Pipes);
        graph.add_connection(A, B).unwrap();
        graph.add_connection(B, C).unwrap();
        for pos in [A, B, C] {
            tag(&mut graph, pos);
        }
        assert_eq!(graph.metadata(B).texture.as_deref(), Some("gas_pipe_LD"));

        assert!(graph.remove_connection(B, C));
        let corner = graph.metadata(B);
        assert_eq!(corner.pattern.as_deref(), Some("L"));
        assert_eq!(corner.texture.as_deref(), Some("gas_pipe_L"));
        assert_eq!(graph.metadata(C).texture.as_deref(), Some("gas_pipe_None"));
        assert_eq!(graph.metadata(C).display_name.as_deref(), Some("Gas Pipe"));

        assert!(graph.remove_node(A));
        assert_eq!(graph.metadata(B).pattern.as_deref(), Some("None"));
        assert_eq!(graph.metadata(B).texture.as_deref(), Some("gas_pipe_None"));
    }

    #[test]
    fn removals_leave_untagged_nodes_bare() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Wires);
        graph.add_connection(A, B).unwrap();
        graph.remove_node(A);
        assert_eq!(graph.metadata(B), NodeMetadata::default());
    }

    #[test]
    fn isolated_nodes_are_valid() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Other);
        graph.add_node(C);
        graph.add_node(C);
        assert_eq!(graph.len(), 1);
        assert!(graph.connections(C).is_empty());
        assert!(graph.pattern(C).is_empty());
    }

    #[test]
    fn missing_nodes_answer_empty() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Other);
        graph.update_metadata(
            A,
            NodeMetadata {
                display_name: Some("ghost".into()),
                ..Default::default()
            },
        );
        assert!(!graph.has_node(A));
        assert_eq!(graph.metadata(A), NodeMetadata::default());
        assert!(graph.connections(A).is_empty());
        assert!(!graph.has_connection(A, B));
    }

    #[test]
    fn networks_stay_isolated() {
        let mut networks = Networks::default();
        networks.get_mut(NetworkKind::Pipes).add_connection(A, B).unwrap();
        assert!(networks.get(NetworkKind::Pipes).has_connection(A, B));
        for kind in [NetworkKind::Wires, NetworkKind::Conveyors, NetworkKind::Other] {
            assert!(networks.get(kind).is_empty());
            assert_eq!(networks.get(kind).kind(), kind);
        }
        assert!(networks.for_category(Some(Category::Ventilation)).has_node(A));

        networks.clear();
        assert!(networks.iter().all(AdjacencyGraph::is_empty));
    }

    #[test]
    fn clear_and_size() {
        let mut graph = AdjacencyGraph::new(NetworkKind::Wires);
        graph.add_connection(A, B).unwrap();
        graph.add_connection(B, C).unwrap();
        assert_eq!(graph.len(), 3);
        graph.clear();
        assert!(graph.is_empty());
    }
}
