use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::info;

use octofarm::explorer::run_explorer;
use octofarm::seeds::FarmSeeds;
use octofarm::simulation::{FarmParams, NewGameRequest, World};

#[derive(Parser, Debug)]
#[command(name = "octofarm")]
#[command(about = "Grow an octopus by hunting fish on a grid")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in the terminal
    Run {
        /// Random seed (uses random seed if not specified)
        #[arg(short, long)]
        seed: Option<u64>,

        /// World parameters as JSON (defaults to the reference farm)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Milliseconds between ticks
        #[arg(long, default_value = "200")]
        tick_ms: u64,
    },

    /// Run the world headless for a number of iterations
    Simulate {
        /// Number of iterations to run
        #[arg(short, long, default_value = "10000")]
        num_iterations: u64,

        /// Random seed (uses random seed if not specified)
        #[arg(short, long)]
        seed: Option<u64>,

        /// World parameters as JSON (defaults to the reference farm)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// New-game request JSON; its seed is used when --seed is absent
        #[arg(long)]
        request: Option<PathBuf>,

        /// Write the final world state as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Run { seed, config, tick_ms } => {
            let params = load_params(config)?;
            let seeds = seeds_for(seed);
            let world = World::new(&params, &mut seeds.spawn_rng())?;
            run_explorer(world, seeds.movement_rng(), Duration::from_millis(tick_ms))?;
        }
        Command::Simulate { num_iterations, seed, config, request, snapshot } => {
            let params = load_params(config)?;
            let seed = match (seed, request) {
                (Some(seed), _) => Some(seed),
                (None, Some(path)) => {
                    let request = NewGameRequest::from_json(&fs::read_to_string(&path)?)?;
                    info!(owner = %request.owner, game_type = ?request.game_type(), "loaded game request");
                    request.seed
                }
                (None, None) => None,
            };
            let seeds = seeds_for(seed);
            simulate(&params, &seeds, num_iterations, snapshot)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_params(config: Option<PathBuf>) -> Result<FarmParams, Box<dyn Error>> {
    match config {
        Some(path) => {
            info!(path = %path.display(), "loading farm parameters");
            Ok(FarmParams::from_json_file(&path)?)
        }
        None => Ok(FarmParams::default()),
    }
}

fn seeds_for(seed: Option<u64>) -> FarmSeeds {
    let seeds = FarmSeeds::from_master(seed.unwrap_or_else(rand::random));
    info!(seed = seeds.master, "seeded farm");
    seeds
}

fn simulate(
    params: &FarmParams,
    seeds: &FarmSeeds,
    num_iterations: u64,
    snapshot: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    info!(iterations = num_iterations, "simulating");
    let mut world = World::new(params, &mut seeds.spawn_rng())?;
    let mut rng = seeds.movement_rng();

    let started = Instant::now();
    let mut changed_cells = 0usize;
    let mut grabs = 0usize;
    let mut releases = 0usize;
    for _ in 0..num_iterations {
        changed_cells += world.update(&mut rng).len();
        let report = world.last_report();
        grabs += report.grabbed;
        releases += report.released;
    }

    let depleted = world.all_prey().filter(|p| p.is_depleted()).count();
    info!(
        moves = world.moves(),
        changed_cells,
        grabs,
        releases,
        held = world.predator().held_count(),
        depleted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );

    if let Some(path) = snapshot {
        fs::write(&path, serde_json::to_string_pretty(&world.snapshot())?)?;
        info!(path = %path.display(), "wrote world snapshot");
    }
    Ok(())
}
