//! Scene graph and everything that looks at it: cameras and raycasting.
//!
//! # Invariants
//! - Node 0 is the scene root; node and material ids stay valid for the
//!   scene's lifetime.
//! - The raycast registry tests registered targets only, never the whole graph.
//! - Hover state of a raycast entry changes only inside `dispatch`.

pub mod camera;
pub mod graph;
pub mod material;
pub mod orbit;
pub mod ray;
pub mod raycast;

pub use camera::{Camera, CameraRig, CameraSettings, Projection};
pub use graph::{Node, NodeKind, Scene};
pub use material::{Material, MaterialId, ThemeUniforms};
pub use orbit::OrbitControls;
pub use ray::{Intersection, Ray};
pub use raycast::{RaycastEntry, RaycastEvent, RaycastEventKind, RaycastHandle, RaycastRegistry};

/// Errors from binding names against a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no node named {name:?} under {root:?}")]
    MissingNode { root: String, name: String },
}

pub fn crate_info() -> &'static str {
    "folio-scene v0.1.0"
}
