//! Single-spin-flip Metropolis Monte Carlo for the 2D ferromagnetic Ising model.

pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;

pub use config::{BackendKind, Boundary, SimConfig};
pub use error::SimError;
pub use geometry::Lattice;
pub use mcmc::Metropolis;
pub use simulation::{run_simulation, SimulationResult, Snapshot};
pub use spins::SpinGrid;
