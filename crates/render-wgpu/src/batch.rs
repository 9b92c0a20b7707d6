use bytemuck::{Pod, Zeroable};
use folio_common::Color;
use folio_render::{DrawItem, DrawShape};
use glam::{Mat4, Vec3};

/// Upper bound on instances uploaded per frame.
pub const MAX_INSTANCES: usize = 4096;

/// Flat quads keep a sliver of depth so both faces rasterize.
const MIN_THICKNESS: f32 = 1e-3;

/// Per-instance vertex data: a column-major model matrix and a linear RGBA tint.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn from_item(item: &DrawItem) -> Self {
        let size = item.bounds.size().max(Vec3::splat(MIN_THICKNESS));
        let local = match item.shape {
            DrawShape::Mesh => Mat4::from_scale_rotation_translation(
                size,
                glam::Quat::IDENTITY,
                item.bounds.center(),
            ),
            DrawShape::Sprite => Mat4::from_scale(Vec3::new(size.x, size.y, MIN_THICKNESS)),
        };
        Self {
            model: (item.world * local).to_cols_array_2d(),
            color: rgba(item.color, item.opacity),
        }
    }
}

pub fn rgba(color: Color, opacity: f32) -> [f32; 4] {
    [color.r, color.g, color.b, opacity.clamp(0.0, 1.0)]
}

/// Convert a draw list into instance data, keeping its order and capping the count.
pub fn build_instances(items: &[DrawItem]) -> Vec<InstanceData> {
    if items.len() > MAX_INSTANCES {
        tracing::warn!(items = items.len(), cap = MAX_INSTANCES, "draw list truncated");
    }
    items.iter().take(MAX_INSTANCES).map(InstanceData::from_item).collect()
}
