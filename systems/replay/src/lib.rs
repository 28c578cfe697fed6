#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Walks the current-position marker along a computed route, one cell per step.

use log::{debug, trace, warn};
use maze_runner_core::{CellCoord, Command, Event, MazeError, ShortestPath};
use maze_runner_system_graph::WeightedGraph;
use maze_runner_world::{self as world, query, World};

/// Replays a [`ShortestPath`] against a world by moving its current position.
#[derive(Clone, Debug)]
pub struct Replayer {
    cells: Vec<CellCoord>,
    cursor: usize,
}

impl Replayer {
    /// Prepares a replay of `path`, which must start at the world's current position.
    pub fn new(world: &World, path: &ShortestPath) -> Result<Self, MazeError> {
        let cells = path
            .nodes()
            .into_iter()
            .map(|node| {
                query::position_by_id(world, node).ok_or(MazeError::UnknownNode {
                    node,
                    node_count: query::cell_count(world),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells
            .first()
            .is_some_and(|start| *start != query::current_position(world))
        {
            return Err(MazeError::InvalidConfig(
                "route does not start at the current position",
            ));
        }

        Ok(Self { cells, cursor: 0 })
    }

    /// Cells the replay will still enter.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cells.len().saturating_sub(self.cursor + 1)
    }

    /// Reports whether every step has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the current position one cell along the route.
    ///
    /// Returns the cell entered, or `None` once the route is exhausted. A move
    /// that no longer follows an edge of `graph` fails with
    /// [`MazeError::IllegalStep`] and leaves the world untouched.
    pub fn step(
        &mut self,
        world: &mut World,
        graph: &WeightedGraph,
        out_events: &mut Vec<Event>,
    ) -> Result<Option<CellCoord>, MazeError> {
        let Some(&next) = self.cells.get(self.cursor + 1) else {
            return Ok(None);
        };
        let current = query::current_position(world);

        let passable = match (query::id_of(world, current), query::id_of(world, next)) {
            (Some(from), Some(to)) => graph.cost(from, to).is_some(),
            _ => false,
        };
        if !passable {
            warn!(
                "rejected replay step ({}, {}) -> ({}, {})",
                current.x(),
                current.y(),
                next.x(),
                next.y()
            );
            return Err(MazeError::IllegalStep {
                from: current,
                to: next,
            });
        }

        world::apply(
            world,
            Command::UpdateCurrentPosition { cell: next },
            out_events,
        )?;
        self.cursor += 1;
        trace!(
            "replay entered ({}, {}), {} left",
            next.x(),
            next.y(),
            self.remaining()
        );
        Ok(Some(next))
    }

    /// Applies every remaining step and returns how many were taken.
    pub fn run_to_end(
        &mut self,
        world: &mut World,
        graph: &WeightedGraph,
        out_events: &mut Vec<Event>,
    ) -> Result<usize, MazeError> {
        let mut taken = 0;
        while self.step(world, graph, out_events)?.is_some() {
            taken += 1;
        }
        debug!("replay finished after {taken} steps");
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_runner_core::{Direction, PathStep};
    use maze_runner_world::WorldConfig;

    fn corridor() -> (World, WeightedGraph) {
        let mut world = World::new(&WorldConfig::with_dimensions(3, 1)).expect("world");
        let mut events = Vec::new();
        for x in 0..2 {
            world::apply(
                &mut world,
                Command::KnockDownWall {
                    cell: CellCoord::new(x, 0),
                    direction: Direction::East,
                },
                &mut events,
            )
            .expect("wall");
        }
        let graph = WeightedGraph::from_world(&world).expect("graph");
        (world, graph)
    }

    fn route(world: &World, cells: &[(u32, u32)]) -> ShortestPath {
        let ids: Vec<_> = cells
            .iter()
            .map(|&(x, y)| query::id_of(world, CellCoord::new(x, y)).expect("id"))
            .collect();
        let steps = ids
            .windows(2)
            .zip(1u64..)
            .map(|(pair, cost)| PathStep {
                from: pair[0],
                to: pair[1],
                cost,
            })
            .collect();
        ShortestPath::new(steps)
    }

    #[test]
    fn steps_walk_the_corridor() {
        let (mut world, graph) = corridor();
        let path = route(&world, &[(0, 0), (1, 0), (2, 0)]);
        let mut replayer = Replayer::new(&world, &path).expect("replayer");
        let mut events = Vec::new();

        assert_eq!(replayer.remaining(), 2);
        assert_eq!(
            replayer.step(&mut world, &graph, &mut events),
            Ok(Some(CellCoord::new(1, 0)))
        );
        assert_eq!(replayer.remaining(), 1);
        assert_eq!(
            replayer.step(&mut world, &graph, &mut events),
            Ok(Some(CellCoord::new(2, 0)))
        );
        assert!(replayer.is_finished());
        assert_eq!(replayer.step(&mut world, &graph, &mut events), Ok(None));
        assert_eq!(query::current_position(&world), CellCoord::new(2, 0));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn walled_step_is_rejected() {
        let mut world = World::new(&WorldConfig::with_dimensions(3, 1)).expect("world");
        let graph = WeightedGraph::from_world(&world).expect("graph");
        let path = route(&world, &[(0, 0), (1, 0)]);
        let mut replayer = Replayer::new(&world, &path).expect("replayer");
        let mut events = Vec::new();

        assert_eq!(
            replayer.step(&mut world, &graph, &mut events),
            Err(MazeError::IllegalStep {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 0),
            })
        );
        assert_eq!(query::current_position(&world), CellCoord::new(0, 0));
        assert!(events.is_empty());
        assert_eq!(replayer.remaining(), 1);
    }

    #[test]
    fn route_must_start_at_current_position() {
        let (world, _) = corridor();
        let path = route(&world, &[(1, 0), (2, 0)]);
        assert!(matches!(
            Replayer::new(&world, &path),
            Err(MazeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_route_is_already_finished() {
        let (mut world, graph) = corridor();
        let mut replayer = Replayer::new(&world, &ShortestPath::default()).expect("replayer");
        let mut events = Vec::new();

        assert!(replayer.is_finished());
        assert_eq!(replayer.run_to_end(&mut world, &graph, &mut events), Ok(0));
        assert!(events.is_empty());
    }
}
