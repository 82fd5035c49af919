pub mod energy;
pub mod grid;

pub use energy::{local_field, site_energy, SiteClass};
pub use grid::SpinGrid;
