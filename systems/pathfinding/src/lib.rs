#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-source shortest paths over a [`WeightedGraph`].
//!
//! The solver selects the closest unsettled node with a linear scan (lowest
//! id wins ties), relaxes its outgoing edges, and records every successful
//! relaxation in an append-only log. The route is rebuilt from that log by
//! walking backwards from the last entry that reached the destination.

use log::{debug, trace};
use maze_runner_core::{MazeError, NodeId, PathStep, Route, ShortestPath};
use maze_runner_system_graph::WeightedGraph;

/// When the solver stops searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Stop once the destination is settled; the route is a true minimum.
    #[default]
    Settled,
    /// Stop as soon as any relaxation reaches the destination. Cheaper, but
    /// a later relaxation could still have lowered the cost.
    FirstArrival,
}

/// Dijkstra shortest-path solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra {
    policy: ExitPolicy,
}

impl Dijkstra {
    /// Creates a solver with the provided exit policy.
    #[must_use]
    pub const fn new(policy: ExitPolicy) -> Self {
        Self { policy }
    }

    /// Exit policy used by the solver.
    #[must_use]
    pub const fn policy(&self) -> ExitPolicy {
        self.policy
    }

    /// Computes a route from `source` to `destination`.
    ///
    /// Returns [`Route::Unreachable`] with the final distance table when no
    /// relaxation ever reaches the destination.
    pub fn solve(
        &self,
        graph: &WeightedGraph,
        source: NodeId,
        destination: NodeId,
    ) -> Result<Route, MazeError> {
        graph.ensure_node(source)?;
        graph.ensure_node(destination)?;

        if source == destination {
            return Ok(Route::Found(ShortestPath::default()));
        }

        let node_count = graph.node_count();
        let mut distances: Vec<Option<u64>> = vec![None; node_count];
        let mut settled = vec![false; node_count];
        let mut relaxations: Vec<PathStep> = Vec::new();
        distances[source.get()] = Some(0);

        for _ in 0..node_count {
            let Some((node, base)) = closest_unsettled(&distances, &settled) else {
                break;
            };
            settled[node] = true;

            if self.policy == ExitPolicy::Settled && node == destination.get() {
                return self.found(&relaxations, source, destination);
            }

            for edge in graph.neighbours(NodeId::new(node)) {
                let next = edge.to.get();
                if settled[next] {
                    continue;
                }

                let candidate = base.saturating_add(u64::from(edge.cost));
                if distances[next].is_some_and(|current| current <= candidate) {
                    continue;
                }

                distances[next] = Some(candidate);
                relaxations.push(PathStep {
                    from: NodeId::new(node),
                    to: edge.to,
                    cost: candidate,
                });
                trace!("relaxed {node} -> {next} at cost {candidate}");

                if self.policy == ExitPolicy::FirstArrival && edge.to == destination {
                    return self.found(&relaxations, source, destination);
                }
            }
        }

        debug_assert!(distances[destination.get()].is_none());

        debug!(
            "node {} unreachable from node {}",
            destination.get(),
            source.get()
        );
        Ok(Route::Unreachable { distances })
    }

    fn found(
        &self,
        relaxations: &[PathStep],
        source: NodeId,
        destination: NodeId,
    ) -> Result<Route, MazeError> {
        let path = reconstruct(relaxations, source, destination)?;
        debug!(
            "{:?} route {} -> {}: {} steps, cost {}",
            self.policy,
            source.get(),
            destination.get(),
            path.len(),
            path.total_cost()
        );
        Ok(Route::Found(path))
    }
}

fn closest_unsettled(distances: &[Option<u64>], settled: &[bool]) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    for (node, distance) in distances.iter().enumerate() {
        let Some(distance) = *distance else {
            continue;
        };
        if settled[node] {
            continue;
        }
        if best.map_or(true, |(_, lowest)| distance < lowest) {
            best = Some((node, distance));
        }
    }
    best
}

/// Rebuilds the route that ends with the last relaxation into `destination`.
///
/// Walking the log backwards, an entry belongs to the route when it entered
/// the node the previously kept entry left from.
fn reconstruct(
    relaxations: &[PathStep],
    source: NodeId,
    destination: NodeId,
) -> Result<ShortestPath, MazeError> {
    let last = relaxations
        .iter()
        .rposition(|step| step.to == destination)
        .ok_or(MazeError::InvariantViolation(
            "destination has a distance but no relaxation",
        ))?;

    let mut chain = vec![relaxations[last]];
    let mut head = relaxations[last].from;
    for step in relaxations[..last].iter().rev() {
        if head == source {
            break;
        }
        if step.to == head {
            chain.push(*step);
            head = step.from;
        }
    }

    if head != source {
        return Err(MazeError::InvariantViolation(
            "relaxation log does not lead back to the source",
        ));
    }

    chain.reverse();
    Ok(ShortestPath::new(chain))
}
