use folio_common::{Aabb, Color, NodeId};
use folio_scene::{Camera, NodeKind, Scene};
use glam::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawShape {
    /// Axis-aligned box in node space.
    Mesh,
    /// Camera-facing unit quad.
    Sprite,
}

/// One drawable node resolved to world space and its displayed color.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub name: String,
    pub shape: DrawShape,
    pub world: Mat4,
    pub bounds: Aabb,
    pub color: Color,
    pub opacity: f32,
    pub texture: Option<String>,
    /// Distance along the view direction, larger is farther.
    pub depth: f32,
}

/// Every shown mesh and sprite, farthest first.
pub fn draw_list(scene: &Scene, camera: &Camera) -> Vec<DrawItem> {
    let forward = (camera.target - camera.position).normalize_or_zero();
    let mut items: Vec<DrawItem> = scene
        .descendants(scene.root())
        .into_iter()
        .filter(|id| scene.is_shown(*id))
        .filter_map(|id| {
            let node = scene.node(id)?;
            let (shape, bounds, material) = match &node.kind {
                NodeKind::Mesh { bounds, material } => (DrawShape::Mesh, (*bounds)?, *material),
                NodeKind::Sprite { material } => (DrawShape::Sprite, Aabb::from_size(glam::Vec3::new(1.0, 1.0, 0.0)), *material),
                NodeKind::Group | NodeKind::Bone => return None,
            };
            let material = scene.material(material)?;
            if material.opacity <= 0.0 {
                return None;
            }
            let world = scene.world_matrix(id);
            let depth = (world.w_axis.truncate() - camera.position).dot(forward);
            Some(DrawItem {
                node: id,
                name: node.name.clone(),
                shape,
                world,
                bounds,
                color: material.display_color(),
                opacity: material.opacity.min(1.0),
                texture: material.texture.clone(),
                depth,
            })
        })
        .collect();
    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    items
}
