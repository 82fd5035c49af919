use crate::config::Boundary;
use crate::geometry::Lattice;
use crate::spins::SpinGrid;

/// Position of a site relative to the edges of an open lattice.
///
/// Corners have two neighbors, edges three and interior sites four. Lattices
/// that are a single row or column wide fall into [`SiteClass::Strip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteClass {
    Interior,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Strip {
        top: bool,
        bottom: bool,
        left: bool,
        right: bool,
    },
}

impl SiteClass {
    pub fn of(lattice: &Lattice, row: usize, col: usize) -> Self {
        let top = row == 0;
        let bottom = row + 1 == lattice.rows;
        let left = col == 0;
        let right = col + 1 == lattice.cols;

        match (top, bottom, left, right) {
            (false, false, false, false) => Self::Interior,
            (true, false, true, false) => Self::TopLeft,
            (true, false, false, true) => Self::TopRight,
            (false, true, true, false) => Self::BottomLeft,
            (false, true, false, true) => Self::BottomRight,
            (true, false, false, false) => Self::Top,
            (false, true, false, false) => Self::Bottom,
            (false, false, true, false) => Self::Left,
            (false, false, false, true) => Self::Right,
            (top, bottom, left, right) => Self::Strip {
                top,
                bottom,
                left,
                right,
            },
        }
    }
}

/// Sum of the neighboring spins of logical site `(row, col)`.
///
/// `cells` is the storage of a grid laid out by `lattice`. Taking the slice
/// rather than a [`SpinGrid`] lets the batch kernel evaluate against a frozen
/// copy of the lattice.
#[inline]
pub fn local_field(lattice: &Lattice, cells: &[i8], row: usize, col: usize) -> i32 {
    match lattice.boundary {
        Boundary::Padded => {
            let i = lattice.index(row, col);
            let w = lattice.stride;
            cells[i - w] as i32 + cells[i + w] as i32 + cells[i - 1] as i32 + cells[i + 1] as i32
        }
        Boundary::Open => open_field(lattice, cells, row, col),
        Boundary::Periodic => {
            let mut h = 0i32;
            for dim in 0..2 {
                for forward in [true, false] {
                    if let Some(j) = lattice.neighbor(row, col, dim, forward) {
                        h += cells[j] as i32;
                    }
                }
            }
            h
        }
    }
}

fn open_field(lattice: &Lattice, cells: &[i8], row: usize, col: usize) -> i32 {
    let w = lattice.stride;
    let i = lattice.index(row, col);
    let s = |j: usize| cells[j] as i32;

    match SiteClass::of(lattice, row, col) {
        SiteClass::Interior => s(i - w) + s(i + w) + s(i - 1) + s(i + 1),
        SiteClass::TopLeft => s(i + w) + s(i + 1),
        SiteClass::TopRight => s(i + w) + s(i - 1),
        SiteClass::BottomLeft => s(i - w) + s(i + 1),
        SiteClass::BottomRight => s(i - w) + s(i - 1),
        SiteClass::Top => s(i + w) + s(i - 1) + s(i + 1),
        SiteClass::Bottom => s(i - w) + s(i - 1) + s(i + 1),
        SiteClass::Left => s(i - w) + s(i + w) + s(i + 1),
        SiteClass::Right => s(i - w) + s(i + w) + s(i - 1),
        SiteClass::Strip {
            top,
            bottom,
            left,
            right,
        } => {
            let mut h = 0;
            if !top {
                h += s(i - w);
            }
            if !bottom {
                h += s(i + w);
            }
            if !left {
                h += s(i - 1);
            }
            if !right {
                h += s(i + 1);
            }
            h
        }
    }
}

/// Interaction energy `E = -s * sum(neighbors)` of logical site `(row, col)`.
///
/// With ±1 spins and at most four neighbors the result lies in `-4..=4`.
#[inline]
pub fn site_energy(grid: &SpinGrid, row: usize, col: usize) -> i32 {
    let lattice = grid.lattice();
    let cells = grid.cells();
    -(cells[lattice.index(row, col)] as i32) * local_field(lattice, cells, row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    // 3x4 open lattice:
    //
    //    1  1 -1  1
    //   -1  1  1 -1
    //    1 -1  1  1
    fn grid_3x4() -> SpinGrid {
        SpinGrid::from_values(&[1, 1, -1, 1, -1, 1, 1, -1, 1, -1, 1, 1], 3, 4).unwrap()
    }

    #[test]
    fn test_site_classes() {
        let lat = Lattice::new(3, 4, Boundary::Open).unwrap();
        assert_eq!(SiteClass::of(&lat, 0, 0), SiteClass::TopLeft);
        assert_eq!(SiteClass::of(&lat, 0, 3), SiteClass::TopRight);
        assert_eq!(SiteClass::of(&lat, 2, 0), SiteClass::BottomLeft);
        assert_eq!(SiteClass::of(&lat, 2, 3), SiteClass::BottomRight);
        assert_eq!(SiteClass::of(&lat, 0, 1), SiteClass::Top);
        assert_eq!(SiteClass::of(&lat, 2, 2), SiteClass::Bottom);
        assert_eq!(SiteClass::of(&lat, 1, 0), SiteClass::Left);
        assert_eq!(SiteClass::of(&lat, 1, 3), SiteClass::Right);
        assert_eq!(SiteClass::of(&lat, 1, 1), SiteClass::Interior);

        let strip = Lattice::new(1, 3, Boundary::Open).unwrap();
        assert_eq!(
            SiteClass::of(&strip, 0, 1),
            SiteClass::Strip {
                top: true,
                bottom: true,
                left: false,
                right: false
            }
        );
    }

    #[test]
    fn test_open_energies_by_hand() {
        let grid = grid_3x4();
        // Corner (0,0): s=1, neighbors (1,0)=-1, (0,1)=1 -> E = -(1)(0) = 0
        assert_eq!(site_energy(&grid, 0, 0), 0);
        // Edge (0,2): s=-1, neighbors (1,2)=1, (0,1)=1, (0,3)=1 -> E = 3
        assert_eq!(site_energy(&grid, 0, 2), 3);
        // Interior (1,1): s=1, neighbors 1, -1, -1, 1 -> E = 0
        assert_eq!(site_energy(&grid, 1, 1), 0);
        // Interior (1,2): s=1, neighbors -1, 1, 1, -1 -> E = 0
        assert_eq!(site_energy(&grid, 1, 2), 0);
        // Corner (2,3): s=1, neighbors (1,3)=-1, (2,2)=1 -> E = 0
        assert_eq!(site_energy(&grid, 2, 3), 0);
        // Edge (1,3): s=-1, neighbors (0,3)=1, (2,3)=1, (1,2)=1 -> E = 3
        assert_eq!(site_energy(&grid, 1, 3), 3);
        // Edge (2,1): s=-1, neighbors (1,1)=1, (2,0)=1, (2,2)=1 -> E = 3
        assert_eq!(site_energy(&grid, 2, 1), 3);
    }

    #[test]
    fn test_padded_matches_open_everywhere() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        for (rows, cols) in [(1, 1), (1, 5), (4, 1), (2, 2), (7, 9), (16, 16)] {
            let open = SpinGrid::random(rows, cols, &mut rng).unwrap();
            let padded = open.padded();
            for row in 0..rows {
                for col in 0..cols {
                    assert_eq!(
                        site_energy(&open, row, col),
                        site_energy(&padded, row, col),
                        "mismatch at ({row},{col}) on {rows}x{cols}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_periodic_matches_open_in_interior() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let open = SpinGrid::random(6, 7, &mut rng).unwrap();
        let periodic = open.with_boundary(Boundary::Periodic).unwrap();
        for row in 1..5 {
            for col in 1..6 {
                assert_eq!(site_energy(&open, row, col), site_energy(&periodic, row, col));
            }
        }
    }

    #[test]
    fn test_periodic_corner_wraps() {
        // All up except the far corner, which is the wrapped neighbor of (0,0).
        let mut values = vec![1; 9];
        values[2] = -1; // (0,2), left neighbor of (0,0) through the wrap
        let grid = SpinGrid::from_values(&values, 3, 3)
            .unwrap()
            .with_boundary(Boundary::Periodic)
            .unwrap();
        // (0,0): neighbors (1,0)=1, (2,0)=1, (0,1)=1, (0,2)=-1 -> E = -2
        assert_eq!(site_energy(&grid, 0, 0), -2);
        assert_eq!(site_energy(&grid, 1, 1), -4);
    }

    #[test]
    fn test_energy_bounds() {
        let all_up = SpinGrid::from_values(&[1; 25], 5, 5).unwrap().padded();
        assert_eq!(site_energy(&all_up, 2, 2), -4);
        assert_eq!(site_energy(&all_up, 0, 0), -2);
        assert_eq!(site_energy(&all_up, 0, 2), -3);

        let mut lone = all_up.clone();
        lone.flip(2, 2);
        assert_eq!(site_energy(&lone, 2, 2), 4);
    }
}
