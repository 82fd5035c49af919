use validator::{Validate, ValidationError};

use crate::error::SimError;

/// Step count used when none is configured and the run stays on the CPU.
pub const DEFAULT_STEPS: u64 = 1_000_000;
/// Step count used when none is configured and the GPU backend is active.
pub const DEFAULT_GPU_STEPS: u64 = 50_000_000;
pub const DEFAULT_TEMPERATURE: f64 = 2.0;
/// Attempts evaluated per launch of the batch backend.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// How sites at the lattice edge see their missing neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Storage carries a ring of zero sentinels; every site sums four cells.
    #[default]
    Padded,
    /// Unpadded storage; corners and edges sum only the neighbors that exist.
    Open,
    /// Neighbors wrap around both axes.
    Periodic,
}

impl TryFrom<&str> for Boundary {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "padded" => Ok(Self::Padded),
            "open" => Ok(Self::Open),
            "periodic" => Ok(Self::Periodic),
            _ => Err(format!(
                "unknown boundary '{s}', expected 'padded', 'open' or 'periodic'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// GPU when available, sequential otherwise.
    #[default]
    Auto,
    Sequential,
    Batch,
    Gpu,
}

impl TryFrom<&str> for BackendKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "auto" => Ok(Self::Auto),
            "sequential" | "cpu" => Ok(Self::Sequential),
            "batch" => Ok(Self::Batch),
            "gpu" => Ok(Self::Gpu),
            _ => Err(format!(
                "unknown backend '{s}', expected 'auto', 'sequential', 'batch' or 'gpu'"
            )),
        }
    }
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.steps.is_some_and(|s| s < 0) {
        return Err(ValidationError::new("steps must be >= 0"));
    }
    if !cfg.temperature.is_finite() || cfg.temperature <= 0.0 {
        return Err(ValidationError::new("temperature must be a finite value > 0"));
    }
    if cfg.batch_size < 1 {
        return Err(ValidationError::new("batch_size must be >= 1"));
    }
    Ok(())
}

/// Parameters of one simulation run.
///
/// The lattice itself is not part of the config: it is created or loaded by
/// the caller and handed to [`crate::run_simulation`] together with this.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Single-site update attempts. `None` picks the active backend's default.
    pub steps: Option<i64>,
    pub temperature: f64,
    pub backend: BackendKind,
    /// Never use the GPU backend, even when it is available.
    pub force_cpu: bool,
    /// Record snapshots for an animation.
    pub record: bool,
    /// Seed for the run's random stream. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub batch_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps: None,
            temperature: DEFAULT_TEMPERATURE,
            backend: BackendKind::Auto,
            force_cpu: false,
            record: false,
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SimConfig {
    pub fn check(&self) -> Result<(), SimError> {
        self.validate()
            .map_err(|e| SimError::InvalidInput(format!("{e}")))
    }

    /// Configured step count, or `default` when unset.
    ///
    /// Must only be called on a config that passed [`SimConfig::check`].
    pub fn resolved_steps(&self, default: u64) -> u64 {
        self.steps.map_or(default, |s| s.max(0) as u64)
    }
}
