//! wgpu render backend for the folio scene.
//!
//! Every item of [`folio_render::draw_list`] becomes one instance: meshes
//! are drawn as their bounding box, sprites as a flat quad, both tinted
//! with the material's displayed color and opacity.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Instances are uploaded in draw-list order, farthest first.
//! - The surface is owned by the host; the renderer only records into the view it is handed.

mod batch;
mod gpu;
mod shaders;

pub use batch::{InstanceData, MAX_INSTANCES, build_instances};
pub use gpu::WgpuRenderer;

pub fn crate_info() -> &'static str {
    "folio-render-wgpu v0.1.0"
}
