#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze carving.
//!
//! The carver walks the grid from the world's entry cell, knocking down the
//! wall toward a random untouched neighbour and backtracking along an
//! explicit stack whenever it runs into a dead end. Once every cell has been
//! visited the passages form a spanning tree; an optional second pass then
//! knocks down extra interior walls so that routes can loop.

use log::{debug, trace};
use maze_runner_core::{CellCoord, Command, Direction, Event, MazeError};
use maze_runner_world::{self as world, query, Cell, World};
use rand::Rng;

/// Order in which the loop pass looks for a standing wall to remove.
const LOOP_WALL_ORDER: [Direction; 4] = Direction::ALL;

/// How many extra walls the loop pass attempts to remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopDensity {
    /// Keep the spanning tree: exactly one route between any two cells.
    None,
    /// One attempt per three cells of grid area.
    ThirdOfArea,
    /// A fixed number of attempts.
    Count(usize),
}

impl LoopDensity {
    fn attempts(self, cell_count: usize) -> usize {
        match self {
            LoopDensity::None => 0,
            LoopDensity::ThirdOfArea => cell_count / 3,
            LoopDensity::Count(count) => count,
        }
    }
}

/// Tuning knobs for maze carving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarvingConfig {
    /// Controls the loop-adding pass that runs after the spanning tree.
    pub loops: LoopDensity,
}

impl Default for CarvingConfig {
    fn default() -> Self {
        Self {
            loops: LoopDensity::ThirdOfArea,
        }
    }
}

/// Summary of a completed carving run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveReport {
    /// Cells visited by the depth-first traversal.
    pub visited: usize,
    /// Walls removed while building the spanning tree.
    pub walls_removed: usize,
    /// Additional walls removed by the loop pass.
    pub loops_added: usize,
}

/// Pure system that carves passages into a fully walled world.
#[derive(Clone, Debug, Default)]
pub struct Carver {
    config: CarvingConfig,
}

impl Carver {
    /// Creates a carver with the provided configuration.
    #[must_use]
    pub const fn new(config: CarvingConfig) -> Self {
        Self { config }
    }

    /// Carves the spanning tree and then runs the configured loop pass.
    ///
    /// The world is expected to be freshly constructed. Every wall removal is
    /// submitted through [`world::apply`] and the resulting events are
    /// appended to `out_events`.
    pub fn carve<R>(
        &self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<CarveReport, MazeError>
    where
        R: Rng + ?Sized,
    {
        let mut report = carve_spanning_tree(world, rng, out_events)?;
        report.loops_added = add_loops(world, self.config.loops, rng, out_events)?;
        debug!(
            "carved {} cells with {} tree walls and {} loop walls",
            report.visited, report.walls_removed, report.loops_added
        );
        Ok(report)
    }
}

/// Runs the randomized depth-first traversal until every cell is visited.
///
/// Fails with [`MazeError::InvariantViolation`] when any wall is already down.
pub fn carve_spanning_tree<R>(
    world: &mut World,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> Result<CarveReport, MazeError>
where
    R: Rng + ?Sized,
{
    let total = query::cell_count(world);
    if total > 1 && !query::cells(world).iter().all(Cell::has_all_walls) {
        return Err(MazeError::InvariantViolation(
            "carving requires a fully walled maze",
        ));
    }

    let mut stack: Vec<CellCoord> = Vec::new();
    let mut current = query::entry(world);
    let mut visited = 1usize;
    let mut walls_removed = 0usize;

    while visited < total {
        let neighbours = query::valid_neighbours(world, current);

        if neighbours.is_empty() {
            current = stack.pop().ok_or(MazeError::InvariantViolation(
                "backtrack stack emptied before every cell was visited",
            ))?;
            continue;
        }

        let (direction, next) = neighbours[rng.gen_range(0..neighbours.len())];
        world::apply(
            world,
            Command::KnockDownWall {
                cell: current,
                direction,
            },
            out_events,
        )?;
        trace!(
            "carve ({}, {}) -> ({}, {})",
            current.x(),
            current.y(),
            next.x(),
            next.y()
        );
        stack.push(current);
        current = next;
        visited += 1;
        walls_removed += 1;
    }

    Ok(CarveReport {
        visited,
        walls_removed,
        loops_added: 0,
    })
}

/// Knocks down one standing wall of randomly chosen interior cells.
///
/// Interior cells exclude the outer ring, so every wall considered has a
/// neighbour behind it. Returns the number of walls actually removed.
pub fn add_loops<R>(
    world: &mut World,
    density: LoopDensity,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> Result<usize, MazeError>
where
    R: Rng + ?Sized,
{
    let (columns, rows) = query::dimensions(world);
    if columns < 3 || rows < 3 {
        return Ok(0);
    }

    let attempts = density.attempts(query::cell_count(world));
    let mut removed = 0usize;
    for _ in 0..attempts {
        let cell = CellCoord::new(rng.gen_range(1..columns - 1), rng.gen_range(1..rows - 1));
        let Some(direction) = query::cell_at(world, cell)
            .and_then(|candidate| LOOP_WALL_ORDER.into_iter().find(|d| candidate.has_wall(*d)))
        else {
            continue;
        };

        world::apply(world, Command::KnockDownWall { cell, direction }, out_events)?;
        removed += 1;
    }
    Ok(removed)
}
