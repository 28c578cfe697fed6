//! Single grid unit with wall state, traversal weight and role flags.

use maze_runner_core::{CellCoord, Direction, MazeError, NodeId, Walls, DEFAULT_WEIGHT};

/// One cell of the maze grid.
///
/// Cells start with all four walls standing and the default weight. Walls
/// only ever come down through [`Cell::knock_down_wall`], which updates both
/// sides of the shared wall at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: CellCoord,
    walls: Walls,
    weight: u32,
    occupied: bool,
    current_position: bool,
    objective: bool,
    id: NodeId,
}

impl Cell {
    /// Creates a walled-in cell at `position` for a grid whose extent along
    /// the row axis is `stride`.
    #[must_use]
    pub fn new(position: CellCoord, stride: u32) -> Self {
        Self {
            position,
            walls: Walls::ALL,
            weight: DEFAULT_WEIGHT,
            occupied: false,
            current_position: false,
            objective: false,
            id: derive_id(position, stride),
        }
    }

    /// Recomputes the identifier after the grid's row extent changed.
    pub(crate) fn rebase_id(&mut self, stride: u32) {
        self.id = derive_id(self.position, stride);
    }

    /// Identifier of the cell in the graph node space.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Coordinates of the cell.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Walls still standing around the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Reports whether the wall in `direction` is standing.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls.contains(direction)
    }

    /// Reports whether the cell is still untouched by carving.
    #[must_use]
    pub const fn has_all_walls(&self) -> bool {
        self.walls.is_full()
    }

    /// Cost of entering the cell.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Replaces the traversal weight.
    ///
    /// Zero is rejected because the graph reads a zero cost as a missing edge.
    pub fn update_weight(&mut self, weight: u32) -> Result<(), MazeError> {
        if weight == 0 {
            return Err(MazeError::InvalidWeight { weight });
        }
        self.weight = weight;
        Ok(())
    }

    /// Reports whether a marker or trap claims the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Reports whether the cell holds the current position.
    #[must_use]
    pub const fn is_current_position(&self) -> bool {
        self.current_position
    }

    /// Reports whether the cell is the objective.
    #[must_use]
    pub const fn is_objective(&self) -> bool {
        self.objective
    }

    /// Removes the wall between `self` and `other`.
    ///
    /// `other` must be the grid neighbour in `direction`; the world checks
    /// adjacency before calling this.
    pub fn knock_down_wall(&mut self, other: &mut Cell, direction: Direction) {
        self.walls.remove(direction);
        other.walls.remove(direction.opposite());
    }

    pub(crate) fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }

    pub(crate) fn set_current_position(&mut self, current: bool) {
        self.current_position = current;
    }

    pub(crate) fn set_objective(&mut self, objective: bool) {
        self.objective = objective;
    }
}

fn derive_id(position: CellCoord, stride: u32) -> NodeId {
    let x = usize::try_from(position.x()).unwrap_or(usize::MAX);
    let y = usize::try_from(position.y()).unwrap_or(usize::MAX);
    let stride = usize::try_from(stride).unwrap_or(usize::MAX);
    NodeId::new(x.saturating_mul(stride).saturating_add(y))
}
