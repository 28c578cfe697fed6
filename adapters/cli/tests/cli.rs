use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-runner"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch maze-runner")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "maze-runner failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

#[test]
fn seeded_run_prints_maze_and_route() {
    let text = stdout(&run(&["--columns", "6", "--rows", "4", "--seed", "7"]));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "seed 7");
    assert_eq!(lines[1], "-------------");
    assert!(lines[2].starts_with("|*"));

    let summary = lines
        .iter()
        .position(|line| line.starts_with("route: "))
        .expect("route summary");
    let steps: Vec<&str> = lines[summary + 1..].to_vec();
    assert!(!steps.is_empty());
    assert!(steps.last().expect("step").contains("to (5, 3)"));

    let total: u64 = steps
        .last()
        .and_then(|line| line.rsplit("cost ").next())
        .and_then(|cost| cost.trim().parse().ok())
        .expect("numeric cost");
    assert!(lines[summary].ends_with(&format!("cost {total}")));
    assert!(lines[summary].contains(&format!("{} steps", steps.len())));
}

#[test]
fn same_seed_gives_same_output() {
    let args = ["--columns", "9", "--rows", "7", "--seed", "123", "--first-arrival"];
    assert_eq!(stdout(&run(&args)), stdout(&run(&args)));
}

#[test]
fn corridor_with_default_traps_is_solved() {
    let text = stdout(&run(&["--columns", "3", "--rows", "1", "--seed", "1"]));
    assert!(text.contains("route: 2 steps"));
}

#[test]
fn replay_ends_on_the_objective() {
    let text = stdout(&run(&[
        "--columns", "5", "--rows", "5", "--seed", "3", "--no-loops", "--replay",
    ]));

    let mazes: Vec<&str> = text
        .split("\n\n")
        .filter(|block| block.contains("-+") || block.contains(" +"))
        .collect();
    assert!(mazes.len() > 1);
    let last = mazes.last().expect("replayed maze");
    assert!(!last.contains('o'));
    assert_eq!(last.matches('*').count(), 1);
}
