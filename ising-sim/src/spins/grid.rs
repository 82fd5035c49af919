use rand::Rng;

use crate::config::Boundary;
use crate::error::SimError;
use crate::geometry::Lattice;

/// Spin state of one lattice.
///
/// Real sites always hold +1 or -1. Border cells of a padded grid hold 0 and
/// are never written: every mutating method addresses logical sites only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinGrid {
    lattice: Lattice,
    /// Backing storage, length `lattice.n_cells`.
    spins: Vec<i8>,
}

impl SpinGrid {
    /// Fill an unpadded `rows x cols` grid with independent, uniform ±1 spins.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Self, SimError> {
        let lattice = Lattice::new(rows, cols, Boundary::Open)?;
        let spins = (0..lattice.n_cells)
            .map(|_| if rng.gen::<f32>() < 0.5 { -1 } else { 1 })
            .collect();
        Ok(Self { lattice, spins })
    }

    /// Build an unpadded grid from row-major values, each of which must be ±1.
    pub fn from_values(values: &[i32], rows: usize, cols: usize) -> Result<Self, SimError> {
        let lattice = Lattice::new(rows, cols, Boundary::Open)?;
        if values.len() != lattice.n_spins {
            return Err(SimError::InvalidInput(format!(
                "{} values cannot fill a {rows}x{cols} lattice",
                values.len()
            )));
        }

        let spins = values
            .iter()
            .enumerate()
            .map(|(i, &v)| match v {
                1 => Ok(1),
                -1 => Ok(-1),
                _ => Err(SimError::InvalidInput(format!(
                    "value {v} at position {i} is not a spin (expected 1 or -1)"
                ))),
            })
            .collect::<Result<Vec<i8>, _>>()?;

        Ok(Self { lattice, spins })
    }

    /// Copy the same spins into the storage layout of another boundary policy.
    pub fn with_boundary(&self, boundary: Boundary) -> Result<Self, SimError> {
        if boundary == self.lattice.boundary {
            return Ok(self.clone());
        }
        let lattice = Lattice::new(self.rows(), self.cols(), boundary)?;
        let mut spins = vec![0i8; lattice.n_cells];
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                spins[lattice.index(row, col)] = self.spin(row, col);
            }
        }
        Ok(Self { lattice, spins })
    }

    /// Zero-padded copy: a `(rows + 2) x (cols + 2)` storage with the spins in
    /// the interior.
    pub fn padded(&self) -> Self {
        let lattice = Lattice {
            stride: self.cols() + 2,
            n_cells: (self.rows() + 2) * (self.cols() + 2),
            boundary: Boundary::Padded,
            ..self.lattice.clone()
        };
        let mut spins = vec![0i8; lattice.n_cells];
        for row in 0..self.rows() {
            let dst = lattice.index(row, 0);
            let src = self.lattice.index(row, 0);
            spins[dst..dst + self.cols()].copy_from_slice(&self.spins[src..src + self.cols()]);
        }
        Self { lattice, spins }
    }

    /// Negate the spin at logical site `(row, col)`.
    #[inline]
    pub fn flip(&mut self, row: usize, col: usize) {
        debug_assert!(row < self.rows() && col < self.cols());
        let idx = self.lattice.index(row, col);
        self.spins[idx] = -self.spins[idx];
    }

    #[inline]
    pub fn spin(&self, row: usize, col: usize) -> i8 {
        self.spins[self.lattice.index(row, col)]
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn rows(&self) -> usize {
        self.lattice.rows
    }

    pub fn cols(&self) -> usize {
        self.lattice.cols
    }

    pub fn boundary(&self) -> Boundary {
        self.lattice.boundary
    }

    /// Raw storage, border cells included.
    pub fn cells(&self) -> &[i8] {
        &self.spins
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [i8] {
        &mut self.spins
    }

    /// Logical spins in row-major order, border excluded.
    pub fn values(&self) -> Vec<i8> {
        let mut out = Vec::with_capacity(self.lattice.n_spins);
        for row in 0..self.rows() {
            let start = self.lattice.index(row, 0);
            out.extend_from_slice(&self.spins[start..start + self.cols()]);
        }
        out
    }

    /// Overwrite all logical spins from row-major values of length `rows * cols`.
    pub(crate) fn set_values(&mut self, values: &[i8]) {
        debug_assert_eq!(values.len(), self.lattice.n_spins);
        let cols = self.cols();
        for (row, chunk) in values.chunks_exact(cols).enumerate() {
            let start = self.lattice.index(row, 0);
            self.spins[start..start + cols].copy_from_slice(chunk);
        }
    }
}
