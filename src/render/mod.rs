pub mod renderer;

pub use renderer::{OVERLAY_ROWS, Renderer, View};
