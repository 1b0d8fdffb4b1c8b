pub mod reducer;
pub mod render;

pub use reducer::*;
pub use render::{export_snippet, render_snippet};
