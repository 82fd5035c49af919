use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use tracing::debug;

use super::Backend;
use crate::error::SimError;
use crate::mcmc::Metropolis;
use crate::spins::{local_field, SpinGrid};

/// Independent random streams per launch.
const N_LANES: usize = 64;

/// Data-parallel update kernel on the CPU.
///
/// Each launch evaluates up to `launch_size` attempts split over [`N_LANES`]
/// lanes. Every lane owns a xoshiro stream and reads the lattice as it stood
/// when the launch began; accepted flips are committed once all lanes finish.
/// A commit writes the negated frozen value, so a site drawn by several lanes
/// in one launch flips at most once. This mirrors what the GPU kernel does
/// with concurrent invocations and shares its stale-neighbor approximation.
#[derive(Debug)]
pub struct Batch {
    launch_size: usize,
    /// Storage as it stood when the current launch began.
    frozen: Vec<i8>,
}

impl Batch {
    pub fn new(launch_size: usize) -> Self {
        Self {
            launch_size: launch_size.max(1),
            frozen: Vec::new(),
        }
    }

    fn launch(
        &mut self,
        grid: &mut SpinGrid,
        rule: &Metropolis,
        attempts: usize,
        lanes: &mut [Xoshiro256StarStar],
    ) {
        let cells = grid.cells();
        if self.frozen.len() != cells.len() {
            self.frozen.resize(cells.len(), 0);
        }
        self.frozen.copy_from_slice(cells);

        let frozen = self.frozen.as_slice();
        let lattice = grid.lattice();
        let per_lane = attempts.div_ceil(lanes.len());
        let (rows, cols) = (lattice.rows, lattice.cols);

        let flips: Vec<usize> = lanes
            .par_iter_mut()
            .enumerate()
            .flat_map_iter(|(lane, rng)| {
                let count = per_lane.min(attempts.saturating_sub(lane * per_lane));
                let mut accepted = Vec::new();
                for _ in 0..count {
                    let row = rng.gen_range(0..rows);
                    let col = rng.gen_range(0..cols);
                    let idx = lattice.index(row, col);
                    let energy =
                        -(frozen[idx] as i32) * local_field(lattice, frozen, row, col);
                    if rule.should_flip(energy, rng) {
                        accepted.push(idx);
                    }
                }
                accepted
            })
            .collect();

        let cells = grid.cells_mut();
        for idx in flips {
            cells[idx] = -frozen[idx];
        }
    }
}

impl Backend for Batch {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn run(
        &mut self,
        grid: &mut SpinGrid,
        rule: &Metropolis,
        steps: u64,
        rng: &mut Xoshiro256StarStar,
    ) -> Result<(), SimError> {
        let mut lanes: Vec<Xoshiro256StarStar> = (0..N_LANES)
            .map(|_| Xoshiro256StarStar::seed_from_u64(rng.gen()))
            .collect();

        let mut remaining = steps;
        let mut launches = 0u64;
        while remaining > 0 {
            let attempts = remaining.min(self.launch_size as u64) as usize;
            self.launch(grid, rule, attempts, &mut lanes);
            remaining -= attempts as u64;
            launches += 1;
        }

        debug!(steps, launches, "batch segment done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sequential;

    fn magnetization(grid: &SpinGrid) -> f64 {
        let sum: i64 = grid.values().iter().map(|&s| s as i64).sum();
        sum as f64 / (grid.rows() * grid.cols()) as f64
    }

    #[test]
    fn test_zero_steps_is_noop() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let start = SpinGrid::random(8, 8, &mut rng).unwrap().padded();
        let mut grid = start.clone();
        let rule = Metropolis::new(2.0).unwrap();
        Batch::new(128).run(&mut grid, &rule, 0, &mut rng).unwrap();
        assert_eq!(grid, start);
    }

    #[test]
    fn test_launch_reads_stale_state() {
        // Two anti-aligned sites both have E = +1. Sequentially they would
        // keep flipping each other back; in one launch both see the frozen
        // state, so each flips exactly once.
        let mut grid = SpinGrid::from_values(&[1, -1], 1, 2).unwrap();
        let rule = Metropolis::new(2.0).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        Batch::new(1000).run(&mut grid, &rule, 1000, &mut rng).unwrap();
        assert_eq!(grid.values(), vec![-1, 1]);
    }

    #[test]
    fn test_reproducible_for_seed() {
        let start = SpinGrid::random(16, 16, &mut Xoshiro256StarStar::seed_from_u64(1))
            .unwrap()
            .padded();
        let rule = Metropolis::new(2.3).unwrap();

        let mut a = start.clone();
        let mut b = start.clone();
        Batch::new(300)
            .run(&mut a, &rule, 10_000, &mut Xoshiro256StarStar::seed_from_u64(5))
            .unwrap();
        Batch::new(300)
            .run(&mut b, &rule, 10_000, &mut Xoshiro256StarStar::seed_from_u64(5))
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, start);
    }

    #[test]
    fn test_reused_across_lattice_sizes() {
        let rule = Metropolis::new(2.0).unwrap();
        let small = SpinGrid::random(4, 4, &mut Xoshiro256StarStar::seed_from_u64(2))
            .unwrap()
            .padded();
        let large = SpinGrid::random(12, 10, &mut Xoshiro256StarStar::seed_from_u64(3))
            .unwrap()
            .padded();

        let mut reused = Batch::new(64);
        let mut a = small.clone();
        reused
            .run(&mut a, &rule, 2_000, &mut Xoshiro256StarStar::seed_from_u64(1))
            .unwrap();
        let mut b = large.clone();
        reused
            .run(&mut b, &rule, 2_000, &mut Xoshiro256StarStar::seed_from_u64(1))
            .unwrap();
        let mut c = small.clone();
        reused
            .run(&mut c, &rule, 2_000, &mut Xoshiro256StarStar::seed_from_u64(1))
            .unwrap();

        let mut fresh = large.clone();
        Batch::new(64)
            .run(&mut fresh, &rule, 2_000, &mut Xoshiro256StarStar::seed_from_u64(1))
            .unwrap();
        assert_eq!(b, fresh);
        assert_eq!(a, c);
    }

    #[test]
    fn test_border_stays_zero() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);
        let mut grid = SpinGrid::random(10, 12, &mut rng).unwrap().padded();
        let rule = Metropolis::new(2.5).unwrap();
        Batch::new(512)
            .run(&mut grid, &rule, 100_000, &mut rng)
            .unwrap();

        let lattice = grid.lattice().clone();
        for (idx, &s) in grid.cells().iter().enumerate() {
            if lattice.is_border(idx) {
                assert_eq!(s, 0);
            } else {
                assert!(s == 1 || s == -1);
            }
        }
    }

    #[test]
    fn test_matches_sequential_phases() {
        let all_up = SpinGrid::from_values(&[1; 32 * 32], 32, 32)
            .unwrap()
            .padded();

        for (temperature, ordered) in [(1.0, true), (10.0, false)] {
            let rule = Metropolis::new(temperature).unwrap();
            let mut backends: Vec<Box<dyn Backend>> =
                vec![Box::new(Sequential::default()), Box::new(Batch::new(256))];

            for backend in backends.iter_mut() {
                let mut grid = all_up.clone();
                let mut rng = Xoshiro256StarStar::seed_from_u64(31);
                backend.run(&mut grid, &rule, 500_000, &mut rng).unwrap();
                let m = magnetization(&grid);
                if ordered {
                    assert!(m > 0.9, "{} at T={temperature}: m = {m}", backend.name());
                } else {
                    assert!(m.abs() < 0.2, "{} at T={temperature}: m = {m}", backend.name());
                }
            }
        }
    }
}
