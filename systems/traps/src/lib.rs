#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Trap placement for carved mazes.

use log::debug;
use maze_runner_core::{CellCoord, Command, Event, MazeError};
use maze_runner_world::{self as world, query, World};
use rand::{seq::SliceRandom, Rng};

/// Tuning knobs for trap placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapConfig {
    /// Number of traps; `None` places one per cell of the longer grid side,
    /// capped at the number of free cells.
    pub count: Option<usize>,
    /// Smallest weight a trap may receive.
    pub min_weight: u32,
    /// Largest weight a trap may receive.
    pub max_weight: u32,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            count: None,
            min_weight: 2,
            max_weight: 10,
        }
    }
}

impl TrapConfig {
    /// Number of traps requested for a `columns` x `rows` grid.
    #[must_use]
    pub fn count_for(&self, columns: u32, rows: u32) -> usize {
        self.count
            .unwrap_or_else(|| usize::try_from(columns.max(rows)).unwrap_or(usize::MAX))
    }

    fn validate(&self) -> Result<(), MazeError> {
        if self.min_weight < 2 {
            return Err(MazeError::InvalidConfig(
                "trap weights must exceed the default weight",
            ));
        }
        if self.min_weight > self.max_weight {
            return Err(MazeError::InvalidConfig(
                "minimum trap weight exceeds the maximum",
            ));
        }
        Ok(())
    }
}

/// Pure system that turns random free cells into traps.
#[derive(Clone, Debug, Default)]
pub struct TrapPlacer {
    config: TrapConfig,
}

impl TrapPlacer {
    /// Creates a placer with the provided configuration.
    #[must_use]
    pub const fn new(config: TrapConfig) -> Self {
        Self { config }
    }

    /// Places the configured number of traps on unoccupied cells.
    ///
    /// The objective and the current position are always occupied, so they
    /// never receive a trap. Returns the trapped cells in placement order.
    /// An explicit count larger than the free cells fails with
    /// [`MazeError::TrapCapacity`].
    pub fn place<R>(
        &self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec<CellCoord>, MazeError>
    where
        R: Rng + ?Sized,
    {
        self.config.validate()?;

        let current = query::current_position(world);
        let objective = query::objective_position(world);
        let mut free: Vec<CellCoord> = query::cells(world)
            .iter()
            .filter(|cell| !cell.is_occupied())
            .map(|cell| cell.position())
            .filter(|cell| *cell != current && *cell != objective)
            .collect();

        let requested = match self.config.count {
            Some(requested) if requested > free.len() => {
                return Err(MazeError::TrapCapacity {
                    requested,
                    available: free.len(),
                });
            }
            Some(requested) => requested,
            None => {
                let (columns, rows) = query::dimensions(world);
                self.config.count_for(columns, rows).min(free.len())
            }
        };

        let (chosen, _) = free.partial_shuffle(rng, requested);
        let mut placed = Vec::with_capacity(requested);
        for &cell in chosen.iter() {
            let weight = rng.gen_range(self.config.min_weight..=self.config.max_weight);
            world::apply(world, Command::PlaceTrap { cell, weight }, out_events)?;
            placed.push(cell);
        }

        debug!("placed {} traps", placed.len());
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_count_follows_longer_side() {
        let config = TrapConfig::default();
        assert_eq!(config.count_for(15, 15), 15);
        assert_eq!(config.count_for(4, 9), 9);
        let fixed = TrapConfig {
            count: Some(3),
            ..TrapConfig::default()
        };
        assert_eq!(fixed.count_for(40, 40), 3);
    }

    #[test]
    fn invalid_weight_ranges_are_rejected() {
        let too_light = TrapConfig {
            min_weight: 1,
            ..TrapConfig::default()
        };
        assert!(matches!(
            too_light.validate(),
            Err(MazeError::InvalidConfig(_))
        ));

        let inverted = TrapConfig {
            min_weight: 8,
            max_weight: 3,
            ..TrapConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(MazeError::InvalidConfig(_))
        ));
        assert_eq!(TrapConfig::default().validate(), Ok(()));
    }
}
