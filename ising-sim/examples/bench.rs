use std::time::Instant;

use ising_sim::backend::{Backend, Batch, Sequential};
use ising_sim::config::DEFAULT_BATCH_SIZE;
use ising_sim::{Metropolis, SpinGrid};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

const L: usize = 256;
const STEPS: u64 = 20_000_000;
const TEMPERATURE: f64 = 2.269;

fn main() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let start = SpinGrid::random(L, L, &mut rng)
        .expect("valid lattice")
        .padded();
    let rule = Metropolis::new(TEMPERATURE).expect("valid temperature");

    println!(
        "Lattice: {}x{}  |  Steps: {}  |  T = {}  |  Threads: {}",
        L,
        L,
        STEPS,
        TEMPERATURE,
        rayon::current_num_threads()
    );
    println!("{}", "-".repeat(70));

    let mut backends: Vec<Box<dyn Backend>> = vec![
        Box::new(Sequential::default()),
        Box::new(Batch::new(DEFAULT_BATCH_SIZE)),
    ];

    for backend in backends.iter_mut() {
        let mut grid = start.clone();
        let mut run_rng = Xoshiro256StarStar::seed_from_u64(7);

        let t0 = Instant::now();
        backend
            .run(&mut grid, &rule, STEPS, &mut run_rng)
            .expect("cpu backends do not fail");
        let elapsed = t0.elapsed().as_secs_f64();

        let per_sweep = elapsed / (STEPS as f64 / (L * L) as f64) * 1000.0;
        println!(
            "{:<12} {:.3} s  |  {:.3} ms/sweep  |  {:.1} M attempts/s",
            backend.name(),
            elapsed,
            per_sweep,
            STEPS as f64 / elapsed / 1e6
        );
    }
}
