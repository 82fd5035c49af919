//! Execution backends for the step loop.
//!
//! The sequential backend is the reference chain and is always available.
//! The batch and GPU backends evaluate many attempts per launch against a
//! stale view of the lattice, so they reproduce the sequential chain only in
//! long-run distribution, never step for step.

mod batch;
#[cfg(feature = "gpu")]
mod gpu;
mod sequential;

pub use batch::Batch;
#[cfg(feature = "gpu")]
pub use gpu::Gpu;
pub use sequential::Sequential;

use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, info, warn};

use crate::config::{BackendKind, SimConfig, DEFAULT_STEPS};
use crate::error::SimError;
use crate::mcmc::Metropolis;
use crate::spins::SpinGrid;

pub trait Backend {
    fn name(&self) -> &'static str;

    /// Step count used when the config leaves it unset.
    fn default_steps(&self) -> u64 {
        DEFAULT_STEPS
    }

    /// Perform `steps` update attempts on `grid` in place.
    fn run(
        &mut self,
        grid: &mut SpinGrid,
        rule: &Metropolis,
        steps: u64,
        rng: &mut Xoshiro256StarStar,
    ) -> Result<(), SimError>;
}

/// Pick the backend for a run.
///
/// `force_cpu` rules out the GPU only. A GPU that cannot be brought up is never
/// fatal: the run falls back to the sequential chain.
pub fn select(config: &SimConfig) -> Box<dyn Backend> {
    let wants_gpu = match config.backend {
        BackendKind::Sequential => return Box::new(Sequential::default()),
        BackendKind::Batch => return Box::new(Batch::new(config.batch_size)),
        BackendKind::Auto | BackendKind::Gpu => !config.force_cpu,
    };

    if !wants_gpu {
        if config.backend == BackendKind::Gpu {
            info!("GPU backend requested but force_cpu is set, using the sequential chain");
        }
        return Box::new(Sequential::default());
    }

    match probe_gpu() {
        Ok(gpu) => gpu,
        Err(e) => {
            if config.backend == BackendKind::Gpu {
                warn!("{e}; falling back to the sequential chain");
            } else {
                debug!("{e}; using the sequential chain");
            }
            Box::new(Sequential::default())
        }
    }
}

#[cfg(feature = "gpu")]
fn probe_gpu() -> Result<Box<dyn Backend>, SimError> {
    Ok(Box::new(Gpu::new()?))
}

#[cfg(not(feature = "gpu"))]
fn probe_gpu() -> Result<Box<dyn Backend>, SimError> {
    Err(SimError::CapabilityUnavailable(
        "built without the `gpu` feature".to_string(),
    ))
}
