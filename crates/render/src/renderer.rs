use std::fmt::Write;

use folio_common::Viewport;
use folio_scene::{Camera, Projection, Scene};

use crate::draw::{DrawShape, draw_list};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and the active camera, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen by `camera`.
    fn render(&self, scene: &Scene, camera: &Camera, viewport: Viewport) -> Self::Output;
}

/// Produces a human-readable listing of what would be drawn. Used by the
/// headless host and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &Camera, viewport: Viewport) -> String {
        let items = draw_list(scene, camera);
        tracing::trace!(drawn = items.len(), "debug text frame");
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, drawn={}, viewport={}x{}) ===",
            scene.len(),
            items.len(),
            viewport.width,
            viewport.height
        );
        let p = camera.position;
        let projection = match camera.projection {
            Projection::Orthographic { half_height, .. } => format!("ortho h={:.2}", half_height * 2.0),
            Projection::Perspective { fov_y_degrees, .. } => format!("persp fov={fov_y_degrees:.0}"),
        };
        let _ = writeln!(out, "Camera: pos=({:.2}, {:.2}, {:.2}) {projection}", p.x, p.y, p.z);

        for item in &items {
            let pos = item.world.w_axis;
            let kind = match item.shape {
                DrawShape::Mesh => "mesh",
                DrawShape::Sprite => "sprite",
            };
            let [r, g, b] = item.color.to_array();
            let _ = writeln!(
                out,
                "  {kind} {:<20} pos=({:.2}, {:.2}, {:.2}) rgb=({r:.2}, {g:.2}, {b:.2}) a={:.2}",
                item.name, pos.x, pos.y, pos.z, item.opacity
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::{Aabb, Transform};
    use folio_scene::{CameraRig, CameraSettings, Material, NodeKind};
    use glam::Vec3;

    fn rig() -> CameraRig {
        CameraRig::new(CameraSettings::default(), Viewport::default(), false)
    }

    #[test]
    fn empty_scene_lists_only_the_header() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, rig().active(), Viewport::default());
        assert!(output.contains("nodes=1, drawn=0"));
        assert!(output.contains("ortho"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn shown_meshes_are_listed_with_color() {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new("plane").with_color(folio_common::Color::BLACK));
        scene.add_node(
            scene.root(),
            "Foreground_Plane",
            Transform::from_position(Vec3::new(1.0, 2.0, 0.0)),
            NodeKind::Mesh {
                bounds: Some(Aabb::from_size(Vec3::ONE)),
                material,
            },
        );
        let output = DebugTextRenderer::new().render(&scene, rig().active(), Viewport::default());
        assert!(output.contains("drawn=1"));
        assert!(output.contains("mesh Foreground_Plane"));
        assert!(output.contains("pos=(1.00, 2.00, 0.00) rgb=(0.00, 0.00, 0.00)"));
    }

    #[test]
    fn scrolled_camera_is_reported() {
        let mut rig = rig();
        rig.on_scroll(1080.0);
        let output = DebugTextRenderer::new().render(&Scene::new(), rig.active(), Viewport::default());
        assert!(output.contains("pos=(0.00, -1.00, 3.00)"));
    }
}
