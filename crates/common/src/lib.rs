//! Shared types for the folio scene runtime.
//!
//! # Invariants
//! - Types here carry no behavior that depends on a host (window, GPU, network).
//! - Event channels never block the emitter.

pub mod events;
pub mod types;

pub use events::{EventChannel, Subscription};
pub use types::{Aabb, Color, NodeId, Transform, Viewport};

pub fn crate_info() -> &'static str {
    "folio-common v0.1.0"
}
