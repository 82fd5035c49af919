pub mod loader;
pub mod output;
pub mod render;

pub use loader::load_grid;
pub use output::{setup_output, step_progress};
pub use render::{caption, write_animation, write_comparison};
