//! Starting-grid files: whitespace-separated spins, one flat sequence

use color_eyre::eyre::{Result, WrapErr};
use ising_sim::{SimError, SpinGrid};
use std::fs;
use std::path::Path;

/// Smallest grid a file may describe.
const MIN_VALUES: usize = 4;

pub fn parse_values(text: &str) -> Result<Vec<i32>, SimError> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token.parse::<i32>().map_err(|_| {
                SimError::InvalidInput(format!("value '{token}' at position {i} is not an integer"))
            })
        })
        .collect()
}

/// Resolve the grid shape for `len` values.
///
/// Both dimensions given must multiply to `len`, a single one must divide it,
/// and with neither the grid has to be square.
pub fn infer_dimensions(
    len: usize,
    rows: Option<usize>,
    cols: Option<usize>,
) -> Result<(usize, usize), SimError> {
    if len < MIN_VALUES {
        return Err(SimError::InvalidInput(
            "the matrix is too small".to_string(),
        ));
    }
    let wrong = || {
        SimError::InvalidInput(format!(
            "wrong dimensions, can't construct a matrix from {len} values"
        ))
    };

    match (rows, cols) {
        (Some(r), Some(c)) => (r.checked_mul(c) == Some(len)).then_some((r, c)).ok_or_else(wrong),
        (Some(r), None) => (r > 0 && len % r == 0).then(|| (r, len / r)).ok_or_else(wrong),
        (None, Some(c)) => (c > 0 && len % c == 0).then(|| (len / c, c)).ok_or_else(wrong),
        (None, None) => {
            let side = (len as f64).sqrt().round() as usize;
            if side * side == len {
                Ok((side, side))
            } else {
                Err(SimError::InvalidInput(format!(
                    "unable to construct a square matrix from {len} values, specify the size"
                )))
            }
        }
    }
}

/// Read a starting grid from `path`; the returned grid has the open layout.
pub fn load_grid(path: &Path, rows: Option<usize>, cols: Option<usize>) -> Result<SpinGrid> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read grid file: {}", path.display()))?;
    let values = parse_values(&text)?;
    let (rows, cols) = infer_dimensions(values.len(), rows, cols)?;
    let grid = SpinGrid::from_values(&values, rows, cols)
        .wrap_err_with(|| format!("Invalid grid in {}", path.display()))?;
    Ok(grid)
}
