use crate::config::Boundary;
use crate::error::SimError;

/// Rectangular 2D lattice geometry.
///
/// Logical sites are addressed as `(row, col)` with `row < rows` and
/// `col < cols`. Backing storage is row-major (C) order. Under
/// [`Boundary::Padded`] the storage is `(rows + 2) x (cols + 2)` and logical
/// site `(row, col)` lives at storage coordinate `(row + 1, col + 1)`; the outer
/// ring holds zero sentinels. The other policies store exactly `rows x cols`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    pub rows: usize,
    pub cols: usize,
    pub boundary: Boundary,
    /// Row stride of the backing storage.
    pub stride: usize,
    /// Length of the backing storage, border included.
    pub n_cells: usize,
    /// Number of real sites (`rows * cols`).
    pub n_spins: usize,
}

impl Lattice {
    pub fn new(rows: usize, cols: usize, boundary: Boundary) -> Result<Self, SimError> {
        if rows == 0 || cols == 0 {
            return Err(SimError::InvalidInput(format!(
                "lattice needs at least one row and one column, got {rows}x{cols}"
            )));
        }
        if boundary == Boundary::Periodic && (rows < 3 || cols < 3) {
            return Err(SimError::InvalidInput(format!(
                "periodic lattice needs at least 3x3 sites, got {rows}x{cols}"
            )));
        }

        let pad = (boundary == Boundary::Padded) as usize;
        let too_large =
            || SimError::InvalidInput(format!("lattice {rows}x{cols} is too large"));
        let stride = cols.checked_add(2 * pad).ok_or_else(too_large)?;
        let n_cells = rows
            .checked_add(2 * pad)
            .and_then(|r| r.checked_mul(stride))
            .ok_or_else(too_large)?;
        let n_spins = rows.checked_mul(cols).ok_or_else(too_large)?;

        Ok(Self {
            rows,
            cols,
            boundary,
            stride,
            n_cells,
            n_spins,
        })
    }

    #[inline]
    fn pad(&self) -> usize {
        (self.boundary == Boundary::Padded) as usize
    }

    /// Storage index of logical site `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        let p = self.pad();
        (row + p) * self.stride + col + p
    }

    /// Logical coordinates of storage index `idx`, or `None` for a border cell.
    pub fn coords(&self, idx: usize) -> Option<(usize, usize)> {
        if idx >= self.n_cells {
            return None;
        }
        let p = self.pad();
        let row = (idx / self.stride).checked_sub(p)?;
        let col = (idx % self.stride).checked_sub(p)?;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    pub fn is_border(&self, idx: usize) -> bool {
        self.coords(idx).is_none()
    }

    /// Storage index of the neighbor of `(row, col)` in dimension `dim`
    /// (0 = along rows, 1 = along columns).
    /// `forward = true` means the +1 direction, `forward = false` means -1.
    ///
    /// Padded lattices always return a cell, which may be a zero sentinel.
    /// Open lattices return `None` past the edge. Periodic lattices wrap via
    /// `rem_euclid`.
    #[inline]
    pub fn neighbor(&self, row: usize, col: usize, dim: usize, forward: bool) -> Option<usize> {
        let step = if forward { 1isize } else { -1isize };
        let (r, c) = if dim == 0 {
            (row as isize + step, col as isize)
        } else {
            (row as isize, col as isize + step)
        };

        match self.boundary {
            // A single step from a real site never leaves the padded storage.
            Boundary::Padded => Some((r + 1) as usize * self.stride + (c + 1) as usize),
            Boundary::Open => (r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols)
                .then(|| r as usize * self.stride + c as usize),
            Boundary::Periodic => {
                let r = r.rem_euclid(self.rows as isize) as usize;
                let c = c.rem_euclid(self.cols as isize) as usize;
                Some(r * self.stride + c)
            }
        }
    }
}
