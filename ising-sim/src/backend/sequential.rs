use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use super::Backend;
use crate::error::SimError;
use crate::mcmc::{run_chain, Metropolis};
use crate::spins::SpinGrid;

/// The reference single-chain backend.
#[derive(Debug, Default)]
pub struct Sequential {
    accepted: u64,
    attempted: u64,
}

impl Sequential {
    /// Accepted flips over attempts, across every `run` call so far.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempted as f64
    }
}

impl Backend for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn run(
        &mut self,
        grid: &mut SpinGrid,
        rule: &Metropolis,
        steps: u64,
        rng: &mut Xoshiro256StarStar,
    ) -> Result<(), SimError> {
        let accepted = run_chain(grid, rule, steps, rng);
        self.accepted += accepted;
        self.attempted += steps;
        debug!(
            steps,
            accepted,
            ratio = self.acceptance_ratio(),
            "sequential segment done"
        );
        Ok(())
    }
}
