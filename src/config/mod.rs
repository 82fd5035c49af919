//! Run settings: YAML file, command-line overrides and defaults
//!
//! A flag on the command line beats the same key in the settings file, which
//! beats the built-in default.

mod args;

pub use args::Args;

use color_eyre::eyre::{eyre, Result, WrapErr};
use ising_sim::config::{DEFAULT_BATCH_SIZE, DEFAULT_TEMPERATURE};
use ising_sim::{BackendKind, Boundary, SimConfig};
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_ROWS: usize = 200;
pub const DEFAULT_COLS: usize = 200;

/// Settings as read from the YAML file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub file: Option<String>,
    /// Left unset by `with_defaults`: a grid file may imply the shape.
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    /// Left unset by `with_defaults`: the default depends on the backend.
    pub steps: Option<i64>,
    pub temperature: Option<f64>,
    pub animate: Option<bool>,
    pub force_cpu: Option<bool>,
    pub boundary: Option<String>,
    pub backend: Option<String>,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
    pub output_dir: Option<String>,
    pub scale: Option<u32>,
}

impl Settings {
    /// Read the settings file, or start empty when there is none.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Unable to read settings file: {path}"))?;
        serde_yml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse settings file: {path}"))
    }

    /// Overlay the flags given on the command line.
    pub fn merge(mut self, args: &Args) -> Self {
        self.file = args.file.clone().or(self.file);
        self.rows = args.rows.or(self.rows);
        self.cols = args.cols.or(self.cols);
        self.steps = args.steps.or(self.steps);
        self.temperature = args.temperature.or(self.temperature);
        if args.animate {
            self.animate = Some(true);
        }
        if args.force_cpu {
            self.force_cpu = Some(true);
        }
        self.boundary = args.boundary.clone().or(self.boundary);
        self.backend = args.backend.clone().or(self.backend);
        self.seed = args.seed.or(self.seed);
        self.batch_size = args.batch_size.or(self.batch_size);
        self.output_dir = args.output_dir.clone().or(self.output_dir);
        self.scale = args.scale.or(self.scale);
        self
    }

    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        self.temperature.get_or_insert(DEFAULT_TEMPERATURE);
        self.animate.get_or_insert(false);
        self.force_cpu.get_or_insert(false);
        self.boundary.get_or_insert_with(|| "padded".to_string());
        self.backend.get_or_insert_with(|| "auto".to_string());
        self.batch_size.get_or_insert(DEFAULT_BATCH_SIZE);
        self.output_dir.get_or_insert_with(|| "ising-output".to_string());
        self.scale.get_or_insert(3);
        self
    }

    pub fn boundary(&self) -> Result<Boundary> {
        Boundary::try_from(self.boundary.as_deref().unwrap_or("padded")).map_err(|e| eyre!(e))
    }

    /// Translate into the library's run parameters.
    pub fn sim_config(&self) -> Result<SimConfig> {
        let defaults = SimConfig::default();
        let backend = match self.backend.as_deref() {
            Some(name) => BackendKind::try_from(name).map_err(|e| eyre!(e))?,
            None => defaults.backend,
        };
        Ok(SimConfig {
            steps: self.steps,
            temperature: self.temperature.unwrap_or(defaults.temperature),
            backend,
            force_cpu: self.force_cpu.unwrap_or(false),
            record: self.animate.unwrap_or(false),
            seed: self.seed,
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
        })
    }
}
