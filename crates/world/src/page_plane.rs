use folio_common::{Aabb, NodeId, Subscription, Transform, Viewport};
use folio_scene::{Material, MaterialId, NodeKind, Scene};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::context::BuildContext;
use crate::page::{PageAnchor, PageEntity};
use crate::theme::{ColorPair, Palette, ThemeReveal};

/// Which palette pair a plane is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneTone {
    Primary,
    Secondary,
}

impl PlaneTone {
    pub fn colors(self, palette: &Palette) -> ColorPair {
        match self {
            PlaneTone::Primary => palette.primary,
            PlaneTone::Secondary => palette.secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlaneSettings {
    pub anchor: PageAnchor,
    pub size: Vec2,
    pub tone: PlaneTone,
    pub full_coverage: f32,
    pub reveal_duration: f32,
}

impl PagePlaneSettings {
    pub fn new(anchor: PageAnchor, tone: PlaneTone) -> Self {
        Self {
            anchor,
            size: Vec2::ONE,
            tone,
            full_coverage: 100.0,
            reveal_duration: 1.0,
        }
    }
}

/// Full-page background that sweeps to the committed theme.
pub struct PagePlane {
    settings: PagePlaneSettings,
    node: NodeId,
    material: MaterialId,
    reveal: ThemeReveal,
    commits: Subscription<bool>,
}

impl PagePlane {
    pub const NODE_NAME: &'static str = "Foreground_Plane";

    pub fn new(ctx: &mut BuildContext<'_>, settings: PagePlaneSettings) -> Self {
        let pair = settings.tone.colors(&ctx.palette);
        let material = ctx.scene.add_material(
            Material::new(Self::NODE_NAME)
                .with_theme(pair.uniforms(ctx.theme.is_dark(), settings.full_coverage)),
        );
        let node = ctx.scene.add_node(
            ctx.scene.root(),
            Self::NODE_NAME,
            Transform::default(),
            NodeKind::Mesh {
                bounds: Some(Aabb::from_size(settings.size.extend(0.0))),
                material,
            },
        );

        let mut plane = Self {
            reveal: ThemeReveal::new(vec![material], settings.full_coverage, settings.reveal_duration),
            commits: ctx.theme.on_change_committed(),
            settings,
            node,
            material,
        };
        plane.resize(ctx.scene, ctx.viewport);
        plane
    }

    pub fn settings(&self) -> &PagePlaneSettings {
        &self.settings
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn tick(&mut self, scene: &mut Scene, dt: f32) {
        if let Some(dark) = self.commits.latest() {
            self.reveal.commit(scene, dark);
        }
        self.reveal.update(scene, dt);
    }
}

impl PageEntity for PagePlane {
    fn anchor(&self) -> PageAnchor {
        self.settings.anchor
    }

    fn positionable(&self) -> NodeId {
        self.node
    }

    fn resize(&mut self, scene: &mut Scene, viewport: Viewport) {
        if let Some(node) = scene.node_mut(self.node) {
            node.transform.scale.x = viewport.aspect();
        }
        self.position_component(scene, viewport.aspect());
    }
}

/// The background planes behind pages 0 to 2.
pub fn site_planes() -> Vec<PagePlaneSettings> {
    vec![
        PagePlaneSettings::new(PageAnchor::new(0, 50.0, 50.0, -1.0), PlaneTone::Primary),
        PagePlaneSettings::new(PageAnchor::new(1, 50.0, 50.0, 0.07), PlaneTone::Secondary),
        PagePlaneSettings::new(PageAnchor::new(2, 50.0, 50.0, -1.0), PlaneTone::Primary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Harness;
    use folio_common::Color;

    #[test]
    fn plane_spans_the_page_width() {
        let mut h = Harness::new();
        let mut plane = PagePlane::new(&mut h.build(), site_planes()[1].clone());
        let node = h.scene.node(plane.node()).unwrap();
        assert_eq!(node.transform.scale.x, 2.0);
        assert_eq!(node.transform.position.y, 0.5 - 1.0 - 0.5);

        plane.resize(&mut h.scene, Viewport::new(900.0, 600.0, 1.0));
        assert_eq!(h.scene.node(plane.node()).unwrap().transform.scale.x, 1.5);
        assert_eq!(h.scene.node(plane.node()).unwrap().transform.position.x, 0.0);
    }

    #[test]
    fn starts_in_the_current_theme() {
        let mut h = Harness::new();
        h.theme.set_theme(true);
        let plane = PagePlane::new(&mut h.build(), site_planes()[0].clone());
        let material = h.scene.material(plane.material()).unwrap();
        assert_eq!(material.display_color(), Palette::default().primary.dark);
    }

    #[test]
    fn commit_sweeps_to_the_new_color() {
        let mut h = Harness::new();
        let mut plane = PagePlane::new(&mut h.build(), site_planes()[1].clone());
        h.theme.swap_theme();
        plane.tick(&mut h.scene, 0.1);
        let coverage = h.scene.material(plane.material()).unwrap().theme.unwrap().coverage;
        assert!(coverage > 0.0 && coverage < 100.0);

        plane.tick(&mut h.scene, 1.0);
        let material = h.scene.material(plane.material()).unwrap();
        assert_eq!(material.display_color(), Color::from_hex(0x1c1c1c));
    }
}
