//! Developer tooling for debug mode: typed settings panels, a scene
//! inspector, and frame statistics for the performance overlay.
//!
//! # Invariants
//! - Inspectors only read; settings change only through [`Inspectable::apply`].
//! - Applied float values are clamped to the field's declared range.

pub mod frame_timer;
pub mod inspector;
pub mod settings;

pub use frame_timer::FrameTimer;
pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use settings::{Field, FieldValue, InspectError, Inspectable};

pub fn crate_info() -> &'static str {
    "folio-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
