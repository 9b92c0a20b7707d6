use folio_common::{NodeId, Viewport};
use folio_scene::Scene;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where a page-anchored entity sits, in viewport percentages.
///
/// The visible page is `aspect` world units wide and one unit tall. Page `n`
/// starts `n` units below page 0, matching one viewport height of scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageAnchor {
    pub page: i32,
    /// Percent of the viewport width from the left edge.
    pub left: f32,
    /// Percent of the viewport height from the top of the page.
    pub top: f32,
    pub z: f32,
}

impl PageAnchor {
    pub const fn new(page: i32, left: f32, top: f32, z: f32) -> Self {
        Self { page, left, top, z }
    }

    /// World position for a viewport of the given aspect ratio.
    pub fn position(&self, aspect: f32) -> Vec3 {
        let left_border = -aspect / 2.0;
        let top_border = 0.5;
        Vec3::new(
            left_border + self.left / 100.0 * aspect,
            top_border - self.page as f32 - self.top / 100.0,
            self.z,
        )
    }
}

/// A scene entity laid out in page coordinates.
///
/// Implementors bind their nodes and materials when constructed, then place
/// themselves; the world calls [`PageEntity::resize`] on every viewport change.
pub trait PageEntity {
    fn anchor(&self) -> PageAnchor;

    /// Node whose position follows the anchor.
    fn positionable(&self) -> NodeId;

    fn position_component(&self, scene: &mut Scene, aspect: f32) {
        let position = self.anchor().position(aspect);
        if let Some(node) = scene.node_mut(self.positionable()) {
            node.transform.position = position;
        }
    }

    fn resize(&mut self, scene: &mut Scene, viewport: Viewport) {
        self.position_component(scene, viewport.aspect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::Transform;
    use folio_scene::NodeKind;

    struct Marker {
        anchor: PageAnchor,
        node: NodeId,
    }

    impl PageEntity for Marker {
        fn anchor(&self) -> PageAnchor {
            self.anchor
        }

        fn positionable(&self) -> NodeId {
            self.node
        }
    }

    #[test]
    fn margins_are_viewport_percentages() {
        let anchor = PageAnchor::new(0, 75.0, 100.5, -0.5);
        let p = anchor.position(2.0);
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - (0.5 - 1.005)).abs() < 1e-6);
        assert_eq!(p.z, -0.5);
    }

    #[test]
    fn later_pages_sit_lower() {
        let anchor = PageAnchor::new(2, 50.0, 50.0, -1.0);
        assert_eq!(anchor.position(1.0), Vec3::new(0.0, -2.0, -1.0));
    }

    #[test]
    fn positioning_twice_gives_the_same_result() {
        let mut scene = Scene::new();
        let node = scene.add_node(scene.root(), "marker", Transform::default(), NodeKind::Group);
        let marker = Marker {
            anchor: PageAnchor::new(1, 7.5, 25.0, 0.1),
            node,
        };

        marker.position_component(&mut scene, 16.0 / 9.0);
        let first = scene.node(node).unwrap().transform.position;
        marker.position_component(&mut scene, 16.0 / 9.0);
        assert_eq!(scene.node(node).unwrap().transform.position, first);
    }

    #[test]
    fn resize_follows_new_aspect() {
        let mut scene = Scene::new();
        let node = scene.add_node(scene.root(), "marker", Transform::default(), NodeKind::Group);
        let mut marker = Marker {
            anchor: PageAnchor::new(0, 0.0, 0.0, 0.0),
            node,
        };
        marker.resize(&mut scene, Viewport::new(800.0, 400.0, 1.0));
        assert_eq!(scene.node(node).unwrap().transform.position.x, -1.0);
        marker.resize(&mut scene, Viewport::new(400.0, 400.0, 1.0));
        assert_eq!(scene.node(node).unwrap().transform.position.x, -0.5);
    }
}
