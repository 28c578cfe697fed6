#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted adjacency structure derived from a carved maze.
//!
//! Every open wall becomes a directed edge whose cost is the weight of the
//! cell it enters. Adjacency lists are kept sorted by neighbour id so that
//! iterating a node's edges visits neighbours in ascending order, exactly as
//! a scan over a dense matrix row would.

use log::debug;
use maze_runner_core::{MazeError, NodeId};
use maze_runner_world::{query, World};

/// Directed edge toward `to` costing `cost` to traverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Node entered by the edge.
    pub to: NodeId,
    /// Positive traversal cost.
    pub cost: u32,
}

/// Snapshot of the maze passages as a weighted directed graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightedGraph {
    adjacency: Vec<Vec<Edge>>,
}

impl WeightedGraph {
    /// Creates a graph with `node_count` nodes and no edges.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Builds the graph from the world's currently open walls.
    ///
    /// Later changes to the world are not reflected in the returned graph.
    pub fn from_world(world: &World) -> Result<Self, MazeError> {
        let mut graph = Self::new(query::cell_count(world));
        for cell in query::cells(world) {
            for (_, neighbour) in query::open_neighbours(world, cell.position()) {
                let target = query::cell_at(world, neighbour).ok_or(MazeError::InvariantViolation(
                    "open wall leads outside the grid",
                ))?;
                graph.add_edge(cell.id(), target.id(), target.weight())?;
            }
        }
        debug!(
            "built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Builds a graph from a dense square matrix where zero means no edge.
    pub fn from_matrix(rows: &[Vec<u32>]) -> Result<Self, MazeError> {
        let mut graph = Self::new(rows.len());
        for (from, row) in rows.iter().enumerate() {
            if row.len() != rows.len() {
                return Err(MazeError::InvalidConfig("adjacency matrix must be square"));
            }
            for (to, &cost) in row.iter().enumerate() {
                if cost > 0 {
                    graph.add_edge(NodeId::new(from), NodeId::new(to), cost)?;
                }
            }
        }
        Ok(graph)
    }

    /// Sets the cost of the edge `from -> to`, replacing any previous cost.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: u32) -> Result<(), MazeError> {
        if cost == 0 {
            return Err(MazeError::InvalidWeight { weight: cost });
        }
        self.ensure_node(to)?;
        let edges = self.edges_mut(from)?;
        match edges.binary_search_by_key(&to, |edge| edge.to) {
            Ok(position) => edges[position].cost = cost,
            Err(position) => edges.insert(position, Edge { to, cost }),
        }
        Ok(())
    }

    /// Cost of the edge `from -> to`, if it exists.
    #[must_use]
    pub fn cost(&self, from: NodeId, to: NodeId) -> Option<u32> {
        let edges = self.adjacency.get(from.get())?;
        edges
            .binary_search_by_key(&to, |edge| edge.to)
            .ok()
            .map(|position| edges[position].cost)
    }

    /// Outgoing edges of `node` in ascending neighbour order.
    #[must_use]
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(node.get())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Fails with [`MazeError::UnknownNode`] when `node` is outside the graph.
    pub fn ensure_node(&self, node: NodeId) -> Result<(), MazeError> {
        if node.get() < self.node_count() {
            Ok(())
        } else {
            Err(MazeError::UnknownNode {
                node,
                node_count: self.node_count(),
            })
        }
    }

    fn edges_mut(&mut self, node: NodeId) -> Result<&mut Vec<Edge>, MazeError> {
        let node_count = self.adjacency.len();
        self.adjacency
            .get_mut(node.get())
            .ok_or(MazeError::UnknownNode { node, node_count })
    }
}
