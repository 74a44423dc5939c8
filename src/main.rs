use clap::Parser;

use grid_pathfinder::algorithms::common::SearchOutcome;
use grid_pathfinder::config::Config;
use grid_pathfinder::simulation::Simulation;

fn main() {
    env_logger::init();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting A* search...");
        println!("Grid size: {}x{}", config.rows, config.rows);
        println!("Barriers: {}", config.num_barriers);
        if let Some(seed) = config.seed {
            println!("Seed: {}", seed);
        }
        if config.no_visualization {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
            println!("Press Ctrl+C to stop the search");
        }
        println!();
    }

    let mut simulation = match Simulation::new(config.clone()) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Failed to set up search: {}", e);
            std::process::exit(1);
        }
    };

    let report = match simulation.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== FINAL RESULTS ===");
    println!("Start: {} | End: {} | Barriers: {}", report.start, report.end, report.barriers);
    match &report.outcome {
        SearchOutcome::Success { path } => {
            println!("Path found with {} steps", path.len());
            if !config.quiet {
                let cells: Vec<String> = path.iter().map(|p| p.to_string()).collect();
                println!("Route: {} -> {}", report.start, cells.join(" -> "));
            }
        }
        SearchOutcome::Failure => {
            println!("No path exists between start and end with the current barriers");
            println!("Try reducing --num-barriers or using a different --seed");
        }
    }
    println!("{}", report.statistics);

    match report.reference_length {
        Some(len) => println!("Breadth-first reference length: {}", len),
        None => println!("Breadth-first reference: unreachable"),
    }
    if !report.is_optimal() {
        eprintln!("A* and breadth-first search disagree");
        std::process::exit(1);
    }
}
