#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for Maze Runner.
//!
//! The [`World`] owns every [`Cell`] of an `columns` x `rows` grid together
//! with the current-position and objective markers. Systems mutate it only
//! through [`apply`] and observe it only through the [`query`] module.

mod cell;

use std::fmt;

use log::{debug, trace};
use maze_runner_core::{CellCoord, Command, Direction, Event, MazeError};

pub use cell::Cell;

const DEFAULT_COLUMNS: u32 = 15;
const DEFAULT_ROWS: u32 = 15;

/// Dimensions and marker placement used to construct a [`World`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of cell columns (`nx`).
    pub columns: u32,
    /// Number of cell rows (`ny`).
    pub rows: u32,
    /// Cell where carving starts.
    pub entry: CellCoord,
    /// Initial current position; defaults to the north-west corner.
    pub current: Option<CellCoord>,
    /// Objective cell; defaults to the south-east corner.
    pub objective: Option<CellCoord>,
}

impl WorldConfig {
    /// Creates a configuration for a `columns` x `rows` grid with default
    /// entry and markers.
    #[must_use]
    pub const fn with_dimensions(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            entry: CellCoord::new(0, 0),
            current: None,
            objective: None,
        }
    }

    fn current_or_default(&self) -> CellCoord {
        self.current.unwrap_or(CellCoord::new(0, 0))
    }

    fn objective_or_default(&self) -> CellCoord {
        self.objective.unwrap_or(CellCoord::new(
            self.columns.saturating_sub(1),
            self.rows.saturating_sub(1),
        ))
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::with_dimensions(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

/// Represents one maze instance: its cells, entry and markers.
#[derive(Clone, Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    entry: CellCoord,
    cells: Vec<Cell>,
    positions: Vec<CellCoord>,
    current: CellCoord,
    objective: CellCoord,
}

impl World {
    /// Builds a fully walled grid and marks the current position and the
    /// objective.
    pub fn new(config: &WorldConfig) -> Result<Self, MazeError> {
        let (columns, rows) = (config.columns, config.rows);
        if columns == 0 || rows == 0 {
            return Err(MazeError::InvalidDimensions { columns, rows });
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| MazeError::InvalidDimensions { columns, rows })?;
        let mut cells = Vec::with_capacity(capacity);
        for x in 0..columns {
            for y in 0..rows {
                cells.push(Cell::new(CellCoord::new(x, y), rows));
            }
        }
        let positions: Vec<CellCoord> = cells.iter().map(Cell::position).collect();

        let current = config.current_or_default();
        let objective = config.objective_or_default();
        let mut world = Self {
            columns,
            rows,
            entry: config.entry,
            cells,
            positions,
            current,
            objective,
        };

        let _ = world.index_of(config.entry)?;
        let current_index = world.index_of(current)?;
        let objective_index = world.index_of(objective)?;
        if current_index == objective_index && capacity > 1 {
            return Err(MazeError::InvalidConfig(
                "current position and objective must be distinct cells",
            ));
        }

        let current_cell = &mut world.cells[current_index];
        current_cell.set_current_position(true);
        current_cell.set_occupied(true);
        let objective_cell = &mut world.cells[objective_index];
        objective_cell.set_objective(true);
        objective_cell.set_occupied(true);

        debug!(
            "created {columns}x{rows} maze, entry ({}, {}), current ({}, {}), objective ({}, {})",
            config.entry.x(),
            config.entry.y(),
            current.x(),
            current.y(),
            objective.x(),
            objective.y()
        );
        Ok(world)
    }

    fn index_of(&self, cell: CellCoord) -> Result<usize, MazeError> {
        index(self.columns, self.rows, cell).ok_or(MazeError::OutOfBounds {
            cell,
            columns: self.columns,
            rows: self.rows,
        })
    }

    fn pair_mut(&mut self, first: usize, second: usize) -> (&mut Cell, &mut Cell) {
        if first < second {
            let (head, tail) = self.cells.split_at_mut(second);
            (&mut head[first], &mut tail[0])
        } else {
            let (head, tail) = self.cells.split_at_mut(first);
            (&mut tail[0], &mut head[second])
        }
    }

    fn knock_down_wall(
        &mut self,
        cell: CellCoord,
        direction: Direction,
    ) -> Result<Option<CellCoord>, MazeError> {
        let from = self.index_of(cell)?;
        let neighbour = cell
            .step(direction, self.columns, self.rows)
            .ok_or(MazeError::BoundaryWall { cell, direction })?;
        let to = self.index_of(neighbour)?;

        if !self.cells[from].has_wall(direction) {
            return Ok(None);
        }

        let (origin, target) = self.pair_mut(from, to);
        origin.knock_down_wall(target, direction);
        trace!(
            "opened {direction:?} wall between ({}, {}) and ({}, {})",
            cell.x(),
            cell.y(),
            neighbour.x(),
            neighbour.y()
        );
        Ok(Some(neighbour))
    }

    fn place_trap(&mut self, cell: CellCoord, weight: u32) -> Result<(), MazeError> {
        let index = self.index_of(cell)?;
        let target = &mut self.cells[index];
        target.update_weight(weight)?;
        target.set_occupied(true);
        Ok(())
    }

    fn assign_objective(&mut self, cell: CellCoord) -> Result<CellCoord, MazeError> {
        let next = self.index_of(cell)?;
        let previous = self.index_of(self.objective)?;
        if next != previous && self.cells[next].is_current_position() {
            return Err(MazeError::InvalidConfig(
                "objective cannot be moved onto the current position",
            ));
        }

        let old = &mut self.cells[previous];
        old.set_objective(false);
        if !old.is_current_position() {
            old.set_occupied(false);
        }
        let new = &mut self.cells[next];
        new.set_objective(true);
        new.set_occupied(true);

        let from = self.objective;
        self.objective = cell;
        Ok(from)
    }

    fn grow(&mut self, columns: u32, rows: u32) -> Result<(u32, u32), MazeError> {
        if columns < self.columns || rows < self.rows {
            return Err(MazeError::InvalidConfig("the grid can only grow"));
        }
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| MazeError::InvalidDimensions { columns, rows })?;

        let mut cells = Vec::with_capacity(capacity);
        for x in 0..columns {
            for y in 0..rows {
                let position = CellCoord::new(x, y);
                let existing = index(self.columns, self.rows, position)
                    .and_then(|offset| self.cells.get(offset));
                let cell = match existing {
                    Some(cell) => {
                        let mut cell = cell.clone();
                        cell.rebase_id(rows);
                        cell
                    }
                    None => Cell::new(position, rows),
                };
                cells.push(cell);
            }
        }

        let previous = (self.columns, self.rows);
        self.positions = cells.iter().map(Cell::position).collect();
        self.cells = cells;
        self.columns = columns;
        self.rows = rows;
        debug!(
            "grew maze from {}x{} to {columns}x{rows}",
            previous.0, previous.1
        );
        Ok(previous)
    }

    fn update_current_position(&mut self, cell: CellCoord) -> Result<CellCoord, MazeError> {
        let next = self.index_of(cell)?;
        let previous = self.index_of(self.current)?;

        let old = &mut self.cells[previous];
        old.set_current_position(false);
        if !old.is_objective() {
            old.set_occupied(false);
        }
        let new = &mut self.cells[next];
        new.set_current_position(true);
        new.set_occupied(true);

        let from = self.current;
        self.current = cell;
        Ok(from)
    }
}

/// Applies the provided command to the world and reports what changed.
///
/// Rejected commands leave the world untouched and emit no event.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), MazeError> {
    match command {
        Command::KnockDownWall { cell, direction } => {
            if let Some(neighbour) = world.knock_down_wall(cell, direction)? {
                out_events.push(Event::WallRemoved {
                    cell,
                    neighbour,
                    direction,
                });
            }
        }
        Command::PlaceTrap { cell, weight } => {
            world.place_trap(cell, weight)?;
            out_events.push(Event::TrapPlaced { cell, weight });
        }
        Command::AssignObjective { cell } => {
            let from = world.assign_objective(cell)?;
            out_events.push(Event::ObjectiveAssigned { from, to: cell });
        }
        Command::UpdateCurrentPosition { cell } => {
            let from = world.update_current_position(cell)?;
            out_events.push(Event::CurrentPositionUpdated { from, to: cell });
        }
        Command::Grow { columns, rows } => {
            let (from_columns, from_rows) = world.grow(columns, rows)?;
            out_events.push(Event::WorldGrown {
                from_columns,
                from_rows,
                columns,
                rows,
            });
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_runner_core::{CellCoord, Direction, NodeId};

    use super::{index, Cell, World};

    /// Order in which carving enumerates candidate neighbours.
    pub const CARVING_ORDER: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::South,
        Direction::North,
    ];

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Total number of cells, which is also the graph node count.
    #[must_use]
    pub fn cell_count(world: &World) -> usize {
        world.cells.len()
    }

    /// Cell where carving starts.
    #[must_use]
    pub fn entry(world: &World) -> CellCoord {
        world.entry
    }

    /// Cell at the provided coordinates, if it lies inside the grid.
    #[must_use]
    pub fn cell_at(world: &World, cell: CellCoord) -> Option<&Cell> {
        index(world.columns, world.rows, cell).and_then(|offset| world.cells.get(offset))
    }

    /// All cells ordered by node id.
    #[must_use]
    pub fn cells(world: &World) -> &[Cell] {
        &world.cells
    }

    /// Cell currently holding the current-position marker.
    #[must_use]
    pub fn current_position(world: &World) -> CellCoord {
        world.current
    }

    /// Cell currently marked as the objective.
    #[must_use]
    pub fn objective_position(world: &World) -> CellCoord {
        world.objective
    }

    /// Coordinates of the cell with the provided node id.
    #[must_use]
    pub fn position_by_id(world: &World, id: NodeId) -> Option<CellCoord> {
        world.positions.get(id.get()).copied()
    }

    /// Node id of the cell at the provided coordinates.
    #[must_use]
    pub fn id_of(world: &World, cell: CellCoord) -> Option<NodeId> {
        cell_at(world, cell).map(Cell::id)
    }

    /// In-bounds neighbours that still have all four walls, in
    /// [`CARVING_ORDER`].
    #[must_use]
    pub fn valid_neighbours(world: &World, cell: CellCoord) -> Vec<(Direction, CellCoord)> {
        CARVING_ORDER
            .into_iter()
            .filter_map(|direction| {
                let neighbour = cell.step(direction, world.columns, world.rows)?;
                cell_at(world, neighbour)
                    .filter(|candidate| candidate.has_all_walls())
                    .map(|_| (direction, neighbour))
            })
            .collect()
    }

    /// Neighbours reachable through an open wall, in [`Direction::ALL`] order.
    #[must_use]
    pub fn open_neighbours(world: &World, cell: CellCoord) -> Vec<(Direction, CellCoord)> {
        let Some(origin) = cell_at(world, cell) else {
            return Vec::new();
        };
        Direction::ALL
            .into_iter()
            .filter(|direction| !origin.has_wall(*direction))
            .filter_map(|direction| {
                cell.step(direction, world.columns, world.rows)
                    .map(|neighbour| (direction, neighbour))
            })
            .collect()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).unwrap_or(0);
        writeln!(f, "{}", "-".repeat(width * 2 + 1))?;
        for y in 0..self.rows {
            let mut passages = String::from("|");
            let mut floor = String::from("|");
            for x in 0..self.columns {
                let Some(cell) = query::cell_at(self, CellCoord::new(x, y)) else {
                    continue;
                };
                passages.push(marker(cell));
                passages.push(if cell.has_wall(Direction::East) {
                    '|'
                } else {
                    ' '
                });
                floor.push_str(if cell.has_wall(Direction::South) {
                    "-+"
                } else {
                    " +"
                });
            }
            writeln!(f, "{passages}")?;
            writeln!(f, "{floor}")?;
        }
        Ok(())
    }
}

fn marker(cell: &Cell) -> char {
    if cell.is_current_position() {
        '*'
    } else if cell.is_objective() {
        'o'
    } else if cell.weight() > maze_runner_core::DEFAULT_WEIGHT {
        '#'
    } else {
        ' '
    }
}

fn index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.x() >= columns || cell.y() >= rows {
        return None;
    }
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let stride = usize::try_from(rows).ok()?;
    x.checked_mul(stride)?.checked_add(y)
}
