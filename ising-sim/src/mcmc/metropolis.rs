use rand::Rng;

use crate::error::SimError;

/// Metropolis acceptance rule at a fixed temperature.
///
/// Flipping a ±1 spin with local energy `E` changes the total energy by
/// `-2E`. A site with `E > 0` therefore always flips, a site with `E < 0`
/// flips with probability `exp(2E / T)`, and a site with `E == 0` never flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis {
    temperature: f64,
    /// `exp(2E / T)` for `E = -1, -2, -3, -4`, indexed by `-E - 1`.
    acceptance: [f64; 4],
}

impl Metropolis {
    pub fn new(temperature: f64) -> Result<Self, SimError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(SimError::InvalidInput(format!(
                "temperature must be a finite value > 0, got {temperature}"
            )));
        }
        let mut acceptance = [0.0; 4];
        for (k, p) in acceptance.iter_mut().enumerate() {
            let energy = -(k as f64 + 1.0);
            *p = (2.0 * energy / temperature).exp();
        }
        Ok(Self {
            temperature,
            acceptance,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Acceptance probabilities for `E = -1..=-4`, in that order.
    pub fn acceptance_table(&self) -> [f64; 4] {
        self.acceptance
    }

    /// Probability that a site with local energy `energy` is flipped.
    pub fn acceptance_probability(&self, energy: i32) -> f64 {
        match energy {
            e if e > 0 => 1.0,
            0 => 0.0,
            -4..=-1 => self.acceptance[(-energy - 1) as usize],
            e => (2.0 * e as f64 / self.temperature).exp(),
        }
    }

    /// Decide whether to flip a site with local energy `energy`.
    ///
    /// A uniform draw in `[0, 1)` is consumed only when `energy < 0`.
    #[inline]
    pub fn should_flip<R: Rng + ?Sized>(&self, energy: i32, rng: &mut R) -> bool {
        if energy > 0 {
            true
        } else if energy < 0 {
            rng.gen::<f64>() < self.acceptance_probability(energy)
        } else {
            false
        }
    }
}
