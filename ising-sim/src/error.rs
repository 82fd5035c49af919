use thiserror::Error;

/// Errors raised by lattice construction, configuration and backend setup.
///
/// Everything except a GPU device failure is detected before the step loop
/// starts; the CPU loops cannot fail on a valid lattice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Bad dimensions, spin values outside {-1, +1}, non-positive temperature,
    /// negative step count or any other rejected parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A requested execution backend cannot run on this build or machine.
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),
}
