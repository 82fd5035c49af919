pub mod result;
pub mod snapshot;

pub use result::SimulationResult;
pub use snapshot::{Snapshot, SnapshotRecorder};

use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;

use crate::backend;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::mcmc::Metropolis;
use crate::spins::SpinGrid;

/// Steps between progress callbacks.
pub const PROGRESS_CHUNK: u64 = 100_000;

/// Run the full Monte Carlo loop on `grid`.
///
/// The configuration is validated before anything runs. The backend is picked
/// by [`backend::select`], and the step count falls back to that backend's
/// default when unset. The run is split into segments that end at every
/// multiple of [`PROGRESS_CHUNK`] and, when recording, at every snapshot
/// index; `on_progress` receives the completed and total step counts after
/// each segment. Splitting does not alter the sequential chain's trajectory.
pub fn run_simulation(
    grid: SpinGrid,
    config: &SimConfig,
    on_progress: &dyn Fn(u64, u64),
) -> Result<SimulationResult, SimError> {
    config.check()?;
    let rule = Metropolis::new(config.temperature)?;
    let mut backend = backend::select(config);
    let steps = config.resolved_steps(backend.default_steps());
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        boundary = ?grid.boundary(),
        steps,
        temperature = config.temperature,
        seed,
        backend = backend.name(),
        "starting simulation"
    );

    let initial = grid.clone();
    let mut grid = grid;
    let mut recorder = config.record.then(|| SnapshotRecorder::new(steps));
    if let Some(rec) = recorder.as_mut() {
        rec.capture(0, &grid);
    }

    let start = Instant::now();
    let mut done = 0u64;
    while done < steps {
        let mut end = ((done / PROGRESS_CHUNK + 1) * PROGRESS_CHUNK).min(steps);
        if let Some(next) = recorder.as_ref().and_then(SnapshotRecorder::next_checkpoint) {
            end = end.min(next);
        }

        backend.run(&mut grid, &rule, end - done, &mut rng)?;
        done = end;

        if let Some(rec) = recorder.as_mut() {
            rec.capture(done, &grid);
        }
        on_progress(done, steps);
    }

    let snapshots = recorder.map_or_else(Vec::new, SnapshotRecorder::finish);
    info!(
        steps,
        snapshots = snapshots.len(),
        elapsed = ?start.elapsed(),
        "simulation finished"
    );

    Ok(SimulationResult {
        initial,
        grid,
        snapshots,
        steps,
        temperature: config.temperature,
        seed,
        backend: backend.name(),
    })
}
