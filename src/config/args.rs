//! Command-line arguments

use clap::Parser;

/// Simulate a 2D Ising model with the Metropolis Monte Carlo method
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Optional YAML settings file; flags given here take precedence over it
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// File with the starting grid, in a '1 1 -1 ... -1 1' format. Without
    /// --rows and --cols the grid must be square; with one of them the other
    /// is derived from the number of values
    #[arg(short, long)]
    pub file: Option<String>,

    /// Number of rows of the lattice (default: 200)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Number of columns of the lattice (default: 200)
    #[arg(long)]
    pub cols: Option<usize>,

    /// Number of single-spin update attempts (default: 1000000, 50000000 on the GPU)
    #[arg(long, allow_negative_numbers = true)]
    pub steps: Option<i64>,

    /// Temperature (default: 2)
    #[arg(long = "temp", allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Record snapshots and write an animated GIF instead of a before/after image
    #[arg(long)]
    pub animate: bool,

    /// Never use the GPU backend
    #[arg(long)]
    pub force_cpu: bool,

    /// Boundary policy: padded, open or periodic
    #[arg(long)]
    pub boundary: Option<String>,

    /// Execution backend: auto, sequential, batch or gpu
    #[arg(long)]
    pub backend: Option<String>,

    /// Seed of the run; a random one is drawn and logged when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Attempts per launch of the batch backend
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Directory for the rendered images
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Pixels per lattice site in the rendered images
    #[arg(long)]
    pub scale: Option<u32>,

    /// Write the log to this file instead of stdout
    #[arg(long)]
    pub log_file: Option<String>,
}
