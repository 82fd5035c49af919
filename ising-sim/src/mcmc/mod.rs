pub mod chain;
pub mod metropolis;

pub use chain::run_chain;
pub use metropolis::Metropolis;
