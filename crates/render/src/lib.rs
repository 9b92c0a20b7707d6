//! Renderer-agnostic interface over the scene graph.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate either.
//! - Only nodes shown through every ancestor are drawn.
//! - Draw order is back to front along the camera's view direction.

mod draw;
mod renderer;

pub use draw::{DrawItem, DrawShape, draw_list};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "folio-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
