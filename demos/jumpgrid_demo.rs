//! Plan a path across a random 3D obstacle field.
//!
//! Run: cargo run --bin jumpgrid-demo -- --size 48,48,12 --density 0.25 --astar

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use jumpgrid_core::Point3;
use jumpgrid_demos::{SceneConfig, describe, init_logging, parse_density, parse_point, random_field};
use jumpgrid_paths::{GridSearch, Octile};

#[derive(Parser, Debug)]
#[command(about, version)]
struct CliOptions {
    /// Grid extent as x,y,z
    #[clap(long, default_value = "32,32,8", value_parser = parse_point)]
    size: Point3,

    /// Probability of each cell being an obstacle
    #[clap(short, long, default_value = "0.2", value_parser = parse_density)]
    density: f64,

    /// Seed for the obstacle field
    #[clap(short, long, default_value = "1")]
    seed: u64,

    /// World size of one cell
    #[clap(short, long, default_value = "1.0")]
    resolution: f64,

    /// Start cell as x,y,z (defaults to the lower corner)
    #[clap(long, value_parser = parse_point)]
    start: Option<Point3>,

    /// Goal cell as x,y,z (defaults to the upper corner)
    #[clap(long, value_parser = parse_point)]
    goal: Option<Point3>,

    /// Also run plain A* and compare
    #[clap(long)]
    astar: bool,

    /// Log search progress to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let opts = CliOptions::parse();
    init_logging(opts.verbose);

    let cfg = SceneConfig {
        size: opts.size,
        density: opts.density,
        seed: opts.seed,
        resolution: opts.resolution,
    };
    let mut grid = match random_field(&cfg) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let start = opts.start.unwrap_or(Point3::ZERO);
    let goal = opts.goal.unwrap_or(grid.size() - Point3::new(1, 1, 1));
    grid.set_occupied(start, false);
    grid.set_occupied(goal, false);
    println!(
        "grid {} with {} of {} cells occupied",
        grid.size(),
        grid.occupied_count(),
        grid.len()
    );

    let mut search = GridSearch::new();
    let t = Instant::now();
    let jps = match search.jps_path(&grid, start, goal, &Octile) {
        Ok(res) => res,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    print!("{}", describe("jps", &jps, grid.map()));
    println!("  {} cells traversed in {:?}", jps.interpolate().len(), t.elapsed());

    if opts.astar {
        let t = Instant::now();
        match search.astar_path(&grid, start, goal, &Octile) {
            Ok(res) => {
                println!(
                    "astar: {} cells, cost {:.3}, {} expanded in {:?}",
                    res.points.len(),
                    res.cost,
                    res.expanded,
                    t.elapsed()
                );
                if (res.cost - jps.cost).abs() > 1e-6 {
                    eprintln!("Error: costs differ: jps {} astar {}", jps.cost, res.cost);
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                eprintln!("Error: astar: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
