#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, solves and replays a maze.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use maze_runner_core::{CellCoord, NodeId, Route, ShortestPath};
use maze_runner_system_carving::{Carver, CarvingConfig, LoopDensity};
use maze_runner_system_graph::WeightedGraph;
use maze_runner_system_pathfinding::{Dijkstra, ExitPolicy};
use maze_runner_system_replay::Replayer;
use maze_runner_system_traps::{TrapConfig, TrapPlacer};
use maze_runner_world::{query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generates a weighted maze and prints the cheapest route through it.
#[derive(Parser, Debug)]
#[command(name = "maze-runner", version, about, long_about = None)]
struct Args {
    /// Number of cell columns.
    #[arg(long, default_value_t = 15)]
    columns: u32,

    /// Number of cell rows.
    #[arg(long, default_value_t = 15)]
    rows: u32,

    /// Seed for carving and trap placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of traps; defaults to the larger grid dimension.
    #[arg(long)]
    traps: Option<usize>,

    /// Keep the maze a perfect spanning tree.
    #[arg(long)]
    no_loops: bool,

    /// Stop the search at the first relaxation that reaches the objective.
    #[arg(long)]
    first_arrival: bool,

    /// Print the maze after every replayed step.
    #[arg(long)]
    replay: bool,

    /// Log debug output unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut events = Vec::new();

    let mut world = World::new(&WorldConfig::with_dimensions(args.columns, args.rows))
        .context("failed to create the maze")?;

    let loops = if args.no_loops {
        LoopDensity::None
    } else {
        LoopDensity::ThirdOfArea
    };
    let report = Carver::new(CarvingConfig { loops })
        .carve(&mut world, &mut rng, &mut events)
        .context("failed to carve the maze")?;
    info!(
        "carved {} cells, {} loop walls",
        report.visited, report.loops_added
    );

    let traps = TrapPlacer::new(TrapConfig {
        count: args.traps,
        ..TrapConfig::default()
    })
    .place(&mut world, &mut rng, &mut events)
    .context("failed to place traps")?;
    info!("placed {} traps", traps.len());

    let graph = WeightedGraph::from_world(&world).context("failed to build the graph")?;
    let policy = if args.first_arrival {
        ExitPolicy::FirstArrival
    } else {
        ExitPolicy::Settled
    };
    let source = node_of(&world, query::current_position(&world))?;
    let destination = node_of(&world, query::objective_position(&world))?;
    let route = Dijkstra::new(policy)
        .solve(&graph, source, destination)
        .context("failed to solve the maze")?;

    println!("seed {seed}");
    println!("{world}");

    let path = match route {
        Route::Found(path) => path,
        Route::Unreachable { .. } => {
            println!("objective unreachable");
            return Ok(());
        }
    };
    print_route(&world, &path)?;

    if args.replay {
        let mut replayer = Replayer::new(&world, &path).context("failed to start the replay")?;
        events.clear();
        while replayer
            .step(&mut world, &graph, &mut events)
            .context("replay left the route")?
            .is_some()
        {
            println!("{world}");
        }
    }

    Ok(())
}

fn node_of(world: &World, cell: CellCoord) -> Result<NodeId> {
    query::id_of(world, cell)
        .with_context(|| format!("cell ({}, {}) is outside the maze", cell.x(), cell.y()))
}

fn print_route(world: &World, path: &ShortestPath) -> Result<()> {
    println!("route: {} steps, cost {}", path.len(), path.total_cost());
    for step in path.steps() {
        let from = cell_of(world, step.from)?;
        let to = cell_of(world, step.to)?;
        let direction = from
            .direction_to(to)
            .with_context(|| format!("route jumps from node {} to {}", step.from.get(), step.to.get()))?;
        println!(
            "  {direction:?} to ({}, {}), cost {}",
            to.x(),
            to.y(),
            step.cost
        );
    }
    Ok(())
}

fn cell_of(world: &World, node: NodeId) -> Result<CellCoord> {
    query::position_by_id(world, node).with_context(|| format!("node {} has no cell", node.get()))
}
