//! Ising model command-line interface
//!
//! Creates or loads a starting lattice, runs the Metropolis chain and renders
//! the result as a before/after PNG or, with `--animate`, a GIF.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ising_sim::{run_simulation, SpinGrid};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::path::Path;
use tracing::info;

mod config;
mod io;

use config::{Args, Settings, DEFAULT_COLS, DEFAULT_ROWS};
use io::{caption, load_grid, setup_output, step_progress, write_animation, write_comparison};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.log_file.as_deref())?;

    let settings = Settings::load(args.config_file.as_deref())?
        .merge(&args)
        .with_defaults();
    info!("Settings: {:?}", settings);

    let mut sim_config = settings.sim_config()?;
    // Resolve the seed here so the starting lattice is reproducible as well.
    let seed = *sim_config.seed.get_or_insert_with(rand::random);

    let grid = initial_grid(&settings, seed)?
        .with_boundary(settings.boundary()?)
        .wrap_err("Invalid lattice for the chosen boundary")?;

    let pb = step_progress();
    let result = run_simulation(grid, &sim_config, &|done, total| {
        pb.set_length(total);
        pb.set_position(done);
    })
    .wrap_err("Simulation failed")?;
    pb.finish();

    let out_dir = Path::new(settings.output_dir.as_deref().unwrap_or("ising-output"));
    let scale = settings.scale.unwrap_or(3);
    let path = if result.recorded() {
        write_animation(&result, out_dir, scale)?
    } else {
        write_comparison(&result, out_dir, scale)?
    };

    info!(
        backend = result.backend,
        seed = result.seed,
        "Wrote {}: {}",
        path.display(),
        caption(&result)
    );
    Ok(())
}

fn initial_grid(settings: &Settings, seed: u64) -> Result<SpinGrid> {
    if let Some(file) = settings.file.as_deref() {
        info!("Loading starting grid from: {}", file);
        return load_grid(Path::new(file), settings.rows, settings.cols);
    }

    let rows = settings.rows.unwrap_or(DEFAULT_ROWS);
    let cols = settings.cols.unwrap_or(DEFAULT_COLS);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed.wrapping_add(1));
    SpinGrid::random(rows, cols, &mut rng).wrap_err("Invalid lattice dimensions")
}
