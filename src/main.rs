
use toroidal_life::{
    config::{Command, Config, USAGE},
    draw::{self, Controls, Mode},
    grid::Grid,
    proc::Engine,
};

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = match Config::parse(std::env::args().skip(1))? {
        Command::Run(c) => c,
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    info!(?config, "configuration");

    let mut grid = Grid::new(config.size)?;
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    grid.seed(config.cells, &mut rng);
    info!(live = grid.live_count(), requested = config.cells, "grid seeded");

    let mut engine = Engine::new(grid, config.max_generations);
    let mode = Mode::detect(config.plain);
    let summary = draw::run(&mut engine, mode, Arc::new(Controls::new(config.delay)))?;

    // the alternate screen is gone, leave the last generation on the console
    if mode == Mode::Interactive {
        print!("{}", draw::render_frame(engine.grid()));
    }
    println!("{summary}");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
