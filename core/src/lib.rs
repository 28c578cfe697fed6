#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner workspace.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems and the adapters. Systems read the world through its query
//! module and request mutations by submitting [`Command`] values to the
//! world's `apply` entry point, which validates them and broadcasts [`Event`]
//! values describing what changed. Path computation speaks in [`NodeId`]
//! values and reports its outcome as a [`Route`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Traversal weight assigned to every cell before trap placement.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Cardinal directions used to address the four walls of a cell.
///
/// Rows grow toward the south and columns grow toward the east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in wall-flag order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction that addresses the same wall from the neighbouring cell.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Column and row offset of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::South => 0b0010,
            Direction::East => 0b0100,
            Direction::West => 0b1000,
        }
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Coordinate one step away in `direction`, if it stays inside a
    /// `columns` x `rows` grid.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        if x < 0 || y < 0 || x >= i64::from(columns) || y >= i64::from(rows) {
            return None;
        }
        Some(CellCoord::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.x.abs_diff(other.x);
        let row_diff = self.y.abs_diff(other.y);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.x > self.x {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if other.y > self.y {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Integer identifier of a cell inside the graph and solver node space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node identifier from its numeric value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Compact set of the walls still standing around a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls(u8);

impl Walls {
    /// All four walls standing.
    pub const ALL: Walls = Walls(0b1111);

    /// No walls standing.
    pub const NONE: Walls = Walls(0);

    /// Reports whether the wall in `direction` is standing.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Reports whether all four walls are standing.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Number of walls still standing.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Removes the wall in `direction`.
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Iterates over the standing walls in [`Direction::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::ALL
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Removes the wall between `cell` and its neighbour in `direction`.
    KnockDownWall {
        /// Cell whose wall is removed.
        cell: CellCoord,
        /// Side of `cell` that opens up.
        direction: Direction,
    },
    /// Turns a cell into a trap with the provided traversal weight.
    PlaceTrap {
        /// Cell receiving the trap.
        cell: CellCoord,
        /// Cost of entering the cell.
        weight: u32,
    },
    /// Moves the objective marker to a new cell.
    AssignObjective {
        /// Cell that becomes the objective.
        cell: CellCoord,
    },
    /// Moves the current-position marker to a new cell.
    UpdateCurrentPosition {
        /// Cell that becomes the current position.
        cell: CellCoord,
    },
    /// Extends the grid east and south with fully walled cells.
    Grow {
        /// New number of columns, at least the current one.
        columns: u32,
        /// New number of rows, at least the current one.
        rows: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the wall shared by two cells was removed.
    WallRemoved {
        /// Cell named by the command.
        cell: CellCoord,
        /// Neighbour on the other side of the removed wall.
        neighbour: CellCoord,
        /// Side of `cell` that opened up.
        direction: Direction,
    },
    /// Confirms that a trap was placed.
    TrapPlaced {
        /// Cell holding the trap.
        cell: CellCoord,
        /// Weight assigned to the cell.
        weight: u32,
    },
    /// Confirms that the objective marker moved.
    ObjectiveAssigned {
        /// Previous objective cell.
        from: CellCoord,
        /// New objective cell.
        to: CellCoord,
    },
    /// Confirms that the current-position marker moved.
    CurrentPositionUpdated {
        /// Cell the marker left.
        from: CellCoord,
        /// Cell the marker now occupies.
        to: CellCoord,
    },
    /// Confirms that the grid was resized and every node id recomputed.
    WorldGrown {
        /// Column count before the command.
        from_columns: u32,
        /// Row count before the command.
        from_rows: u32,
        /// Column count now in effect.
        columns: u32,
        /// Row count now in effect.
        rows: u32,
    },
}

/// One edge of a computed route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Node the step leaves.
    pub from: NodeId,
    /// Node the step enters.
    pub to: NodeId,
    /// Cumulative route cost after entering `to`.
    pub cost: u64,
}

/// Minimum-cost route expressed as consecutive steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortestPath {
    steps: Vec<PathStep>,
}

impl ShortestPath {
    /// Wraps an ordered step sequence.
    #[must_use]
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Ordered steps from source to destination.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Total cost of the route, zero when source and destination coincide.
    #[must_use]
    pub fn total_cost(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.cost)
    }

    /// Every node visited by the route, source first.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            nodes.push(first.from);
        }
        nodes.extend(self.steps.iter().map(|step| step.to));
        nodes
    }

    /// Number of steps in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Reports whether the route has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Outcome of a shortest-path query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// The destination was reached.
    Found(ShortestPath),
    /// The destination is not reachable from the source.
    Unreachable {
        /// Final distance of every node; `None` stands for infinity.
        distances: Vec<Option<u64>>,
    },
}

impl Route {
    /// Returns the path when one was found.
    #[must_use]
    pub fn path(&self) -> Option<&ShortestPath> {
        match self {
            Route::Found(path) => Some(path),
            Route::Unreachable { .. } => None,
        }
    }

    /// Reports whether the destination was reached.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Route::Found(_))
    }
}

/// Errors raised across the Maze Runner workspace.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// A traversal weight of zero would read as a missing edge.
    #[error("invalid weight {weight}: traversal weights must be positive")]
    InvalidWeight {
        /// Rejected weight.
        weight: u32,
    },
    /// The maze reached a state that carving can never produce.
    #[error("maze invariant violated: {0}")]
    InvariantViolation(&'static str),
    /// A coordinate fell outside the grid.
    #[error("cell ({}, {}) is outside the {columns}x{rows} grid", .cell.x(), .cell.y())]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Grid width.
        columns: u32,
        /// Grid height.
        rows: u32,
    },
    /// The wall lies on the outer boundary and has no neighbour behind it.
    #[error("cell ({}, {}) has no neighbour to the {direction:?}", .cell.x(), .cell.y())]
    BoundaryWall {
        /// Cell named by the request.
        cell: CellCoord,
        /// Side of the cell facing the boundary.
        direction: Direction,
    },
    /// A node id fell outside the graph.
    #[error("node {} is outside a graph of {node_count} nodes", .node.get())]
    UnknownNode {
        /// Offending node.
        node: NodeId,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// The grid must contain at least one cell.
    #[error("grid dimensions {columns}x{rows} contain no cells")]
    InvalidDimensions {
        /// Requested width.
        columns: u32,
        /// Requested height.
        rows: u32,
    },
    /// Configuration values contradict each other.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// More traps were requested than free cells exist.
    #[error("cannot place {requested} traps, only {available} free cells")]
    TrapCapacity {
        /// Requested trap count.
        requested: usize,
        /// Cells eligible for a trap.
        available: usize,
    },
    /// A replay step does not follow an edge of the graph.
    #[error("no passage from ({}, {}) to ({}, {})", .from.x(), .from.y(), .to.x(), .to.y())]
    IllegalStep {
        /// Cell the step leaves.
        from: CellCoord,
        /// Cell the step targets.
        to: CellCoord,
    },
}
