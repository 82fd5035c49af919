use super::snapshot::Snapshot;
use crate::spins::SpinGrid;

/// Outcome of one [`crate::run_simulation`] call.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The lattice as handed in, before any update.
    pub initial: SpinGrid,
    /// The lattice after all `steps` attempts.
    pub grid: SpinGrid,
    /// Recorded lattice states, empty unless recording was requested.
    pub snapshots: Vec<Snapshot>,
    pub steps: u64,
    pub temperature: f64,
    /// Seed of the run's random stream; replays the run when configured again.
    pub seed: u64,
    /// Name of the backend that executed the run.
    pub backend: &'static str,
}

impl SimulationResult {
    pub fn recorded(&self) -> bool {
        !self.snapshots.is_empty()
    }
}
