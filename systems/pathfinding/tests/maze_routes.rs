use maze_runner_core::{CellCoord, Command, NodeId, Route};
use maze_runner_system_carving::{Carver, CarvingConfig, LoopDensity};
use maze_runner_system_graph::WeightedGraph;
use maze_runner_system_pathfinding::{Dijkstra, ExitPolicy};
use maze_runner_world::{self as world, query, World, WorldConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn carved(columns: u32, rows: u32, loops: LoopDensity, seed: u64) -> World {
    let mut world = World::new(&WorldConfig::with_dimensions(columns, rows)).expect("valid world");
    let mut events = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = Carver::new(CarvingConfig { loops })
        .carve(&mut world, &mut rng, &mut events)
        .expect("carve");
    assert_eq!(report.visited, (columns * rows) as usize);
    world
}

fn id(world: &World, x: u32, y: u32) -> NodeId {
    query::id_of(world, CellCoord::new(x, y)).expect("in bounds")
}

fn bellman_ford(graph: &WeightedGraph, source: NodeId) -> Vec<Option<u64>> {
    let mut distances = vec![None; graph.node_count()];
    distances[source.get()] = Some(0u64);
    for _ in 0..graph.node_count() {
        let mut changed = false;
        for node in 0..graph.node_count() {
            let Some(base) = distances[node] else {
                continue;
            };
            for edge in graph.neighbours(NodeId::new(node)) {
                let candidate = base + u64::from(edge.cost);
                if distances[edge.to.get()].map_or(true, |current| candidate < current) {
                    distances[edge.to.get()] = Some(candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    distances
}

#[test]
fn trap_on_the_only_link_is_paid_exactly_once() {
    let mut world = carved(4, 4, LoopDensity::None, 2024);
    let source = id(&world, 0, 0);
    let destination = id(&world, 3, 3);

    let graph = WeightedGraph::from_world(&world).expect("graph");
    let baseline = Dijkstra::default()
        .solve(&graph, source, destination)
        .expect("valid nodes");
    let baseline = baseline.path().expect("carved maze is connected").clone();
    assert!(baseline.len() >= 6);
    assert_eq!(baseline.total_cost(), baseline.len() as u64);

    let trap = baseline.steps()[baseline.len() / 2].to;
    let trap_cell = query::position_by_id(&world, trap).expect("known node");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTrap {
            cell: trap_cell,
            weight: 9,
        },
        &mut events,
    )
    .expect("trap");

    let graph = WeightedGraph::from_world(&world).expect("graph");
    let route = Dijkstra::default()
        .solve(&graph, source, destination)
        .expect("valid nodes");
    let path = route.path().expect("still connected");

    assert_eq!(path.nodes(), baseline.nodes());
    assert_eq!(path.steps().iter().filter(|step| step.to == trap).count(), 1);
    assert_eq!(path.total_cost(), baseline.total_cost() - 1 + 9);
}

#[test]
fn settled_routes_match_a_reference_solver() {
    for seed in 0..8 {
        let mut world = carved(8, 8, LoopDensity::ThirdOfArea, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed + 100);
        let mut events = Vec::new();
        for _ in 0..10 {
            let cell = CellCoord::new(rng.gen_range(1..7), rng.gen_range(1..7));
            let weight = rng.gen_range(2..=10);
            world::apply(&mut world, Command::PlaceTrap { cell, weight }, &mut events)
                .expect("trap");
        }

        let graph = WeightedGraph::from_world(&world).expect("graph");
        let source = id(&world, 0, 0);
        let destination = id(&world, 7, 7);
        let reference = bellman_ford(&graph, source);

        let settled = Dijkstra::new(ExitPolicy::Settled)
            .solve(&graph, source, destination)
            .expect("valid nodes");
        let eager = Dijkstra::new(ExitPolicy::FirstArrival)
            .solve(&graph, source, destination)
            .expect("valid nodes");

        let settled_cost = settled.path().expect("connected").total_cost();
        let eager_cost = eager.path().expect("connected").total_cost();
        assert_eq!(Some(settled_cost), reference[destination.get()]);
        assert!(eager_cost >= settled_cost);
    }
}

#[test]
fn every_route_step_follows_an_edge() {
    let world = carved(10, 7, LoopDensity::ThirdOfArea, 31);
    let graph = WeightedGraph::from_world(&world).expect("graph");

    let route = Dijkstra::default()
        .solve(&graph, id(&world, 9, 0), id(&world, 0, 6))
        .expect("valid nodes");
    let path = route.path().expect("connected");

    let mut running = 0u64;
    for step in path.steps() {
        let cost = graph.cost(step.from, step.to).expect("edge exists");
        running += u64::from(cost);
        assert_eq!(step.cost, running);
    }
    assert_eq!(path.nodes().first(), Some(&id(&world, 9, 0)));
    assert_eq!(path.nodes().last(), Some(&id(&world, 0, 6)));
}

#[test]
fn uncarved_maze_reports_unreachable() {
    let world = World::new(&WorldConfig::with_dimensions(3, 3)).expect("valid world");
    let graph = WeightedGraph::from_world(&world).expect("graph");

    let route = Dijkstra::default()
        .solve(&graph, id(&world, 0, 0), id(&world, 2, 2))
        .expect("valid nodes");

    let Route::Unreachable { distances } = route else {
        panic!("walled maze must be unreachable");
    };
    assert_eq!(distances.len(), 9);
    assert_eq!(distances[0], Some(0));
    assert!(distances[1..].iter().all(Option::is_none));
}
