use rand::Rng;

use crate::mcmc::Metropolis;
use crate::spins::{site_energy, SpinGrid};

/// Run `steps` single-site Metropolis attempts on uniformly random sites.
///
/// Each attempt draws a row, then a column, then (only if the site's energy is
/// negative) the acceptance variate. Sites may repeat; this is one Markov
/// chain, not a sweep. Returns the number of accepted flips.
#[cfg_attr(feature = "profile", inline(never))]
pub fn run_chain<R: Rng + ?Sized>(
    grid: &mut SpinGrid,
    rule: &Metropolis,
    steps: u64,
    rng: &mut R,
) -> u64 {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut accepted = 0u64;

    for _ in 0..steps {
        let row = rng.gen_range(0..rows);
        let col = rng.gen_range(0..cols);
        let energy = site_energy(grid, row, col);
        if rule.should_flip(energy, rng) {
            grid.flip(row, col);
            accepted += 1;
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Boundary;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn total_energy(grid: &SpinGrid) -> i64 {
        let mut e = 0i64;
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                e += site_energy(grid, row, col) as i64;
            }
        }
        e
    }

    #[test]
    fn test_zero_steps_is_noop() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let start = SpinGrid::random(4, 4, &mut rng).unwrap().padded();
        let mut grid = start.clone();
        let rule = Metropolis::new(2.0).unwrap();
        assert_eq!(run_chain(&mut grid, &rule, 0, &mut rng), 0);
        assert_eq!(grid, start);
    }

    #[test]
    fn test_single_step_replays_by_hand() {
        let mut init_rng = Xoshiro256StarStar::seed_from_u64(77);
        let start = SpinGrid::random(6, 5, &mut init_rng).unwrap().padded();
        let rule = Metropolis::new(2.0).unwrap();

        for seed in 0..50 {
            let mut grid = start.clone();
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut replay = rng.clone();
            run_chain(&mut grid, &rule, 1, &mut rng);

            let row = replay.gen_range(0..6);
            let col = replay.gen_range(0..5);
            let s = start.spin(row, col) as i32;
            let mut h = 0;
            if row > 0 {
                h += start.spin(row - 1, col) as i32;
            }
            if row < 5 {
                h += start.spin(row + 1, col) as i32;
            }
            if col > 0 {
                h += start.spin(row, col - 1) as i32;
            }
            if col < 4 {
                h += start.spin(row, col + 1) as i32;
            }
            let energy = -s * h;
            let flips = if energy > 0 {
                true
            } else if energy < 0 {
                replay.gen::<f64>() < (2.0 * energy as f64 / 2.0).exp()
            } else {
                false
            };

            let mut expected = start.clone();
            if flips {
                expected.flip(row, col);
            }
            assert_eq!(grid, expected, "seed {seed}");
            assert_eq!(rng, replay, "seed {seed}");
        }
    }

    #[test]
    fn test_border_stays_zero() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);
        let mut grid = SpinGrid::random(10, 12, &mut rng).unwrap().padded();
        let rule = Metropolis::new(2.5).unwrap();
        run_chain(&mut grid, &rule, 200_000, &mut rng);

        let lattice = grid.lattice().clone();
        for (idx, &s) in grid.cells().iter().enumerate() {
            if lattice.is_border(idx) {
                assert_eq!(s, 0, "border cell {idx} changed");
            } else {
                assert!(s == 1 || s == -1);
            }
        }
    }

    #[test]
    fn test_energy_never_rises_when_frozen() {
        // At T -> 0 the exponential underflows, so only E > 0 flips happen and
        // the total energy is non-increasing.
        let mut rng = Xoshiro256StarStar::seed_from_u64(21);
        for boundary in [Boundary::Padded, Boundary::Open, Boundary::Periodic] {
            let mut grid = SpinGrid::random(12, 12, &mut rng)
                .unwrap()
                .with_boundary(boundary)
                .unwrap();
            let rule = Metropolis::new(1e-3).unwrap();
            let mut last = total_energy(&grid);
            for _ in 0..200 {
                run_chain(&mut grid, &rule, 50, &mut rng);
                let e = total_energy(&grid);
                assert!(e <= last, "{boundary:?}: energy rose from {last} to {e}");
                last = e;
            }
        }
    }

    #[test]
    fn test_ordered_phase_stays_ordered() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let mut grid = SpinGrid::from_values(&[1; 32 * 32], 32, 32)
            .unwrap()
            .padded();
        let rule = Metropolis::new(1.0).unwrap();
        run_chain(&mut grid, &rule, 500_000, &mut rng);

        let m: i64 = grid.values().iter().map(|&s| s as i64).sum();
        assert!(m as f64 / 1024.0 > 0.9, "magnetization {m}");
    }
}
