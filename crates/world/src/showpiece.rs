//! The study desk model on the last page.

use std::sync::Arc;

use folio_animation::Ease;
use folio_common::{NodeId, Subscription};
use folio_scene::{MaterialId, Scene};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::context::BuildContext;
use crate::page::{PageAnchor, PageEntity};
use crate::theme::ThemeReveal;
use crate::{ConfigError, find_material};

const POSITIONABLE: &str = "Scene";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMonoSettings {
    pub anchor: PageAnchor,
    pub model: String,
    pub body_material: String,
    pub outline_material: String,
    pub scale: f32,
    /// Resting XYZ Euler rotation.
    pub default_rotation: Vec3,
    /// Amplitude of the sway around the resting Y rotation.
    pub sway: f32,
    pub reveal_duration: f32,
}

impl Default for StudyMonoSettings {
    fn default() -> Self {
        Self {
            anchor: PageAnchor::new(2, 75.0, 75.0, -0.5),
            model: "study-mono".into(),
            body_material: "Mono_White".into(),
            outline_material: "Outline_Black".into(),
            scale: 0.17,
            default_rotation: Vec3::new(0.5, -0.75, 0.0),
            sway: 0.05,
            reveal_duration: 1.0,
        }
    }
}

pub struct StudyMono {
    settings: StudyMonoSettings,
    positionable: NodeId,
    materials: [MaterialId; 2],
    reveal: ThemeReveal,
    commits: Subscription<bool>,
}

impl StudyMono {
    pub fn new(ctx: &mut BuildContext<'_>, settings: StudyMonoSettings) -> Result<Self, ConfigError> {
        let model = Arc::clone(ctx.assets.model(&settings.model)?);
        let scene = &mut *ctx.scene;
        let root = scene.instantiate(&model, scene.root());
        let positionable = scene.require(root, POSITIONABLE)?;
        let body = find_material(scene, root, &settings.body_material)?;
        let outline = find_material(scene, root, &settings.outline_material)?;

        let dark = ctx.theme.is_dark();
        for (id, pair) in [(body, ctx.palette.primary), (outline, ctx.palette.outline)] {
            if let Some(material) = scene.material_mut(id) {
                material.theme = Some(pair.uniforms(dark, 100.0));
            }
        }
        if let Some(node) = scene.node_mut(root) {
            node.transform.scale = Vec3::splat(settings.scale);
        }

        let mut showpiece = Self {
            reveal: ThemeReveal::new(vec![body, outline], 100.0, settings.reveal_duration)
                .with_ease(Ease::PowerOut(2)),
            commits: ctx.theme.on_change_committed(),
            materials: [body, outline],
            positionable,
            settings,
        };
        showpiece.set_rotation_y(ctx.scene, showpiece.settings.default_rotation.y);
        showpiece.position_component(ctx.scene, ctx.viewport.aspect());
        Ok(showpiece)
    }

    pub fn settings(&self) -> &StudyMonoSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut StudyMonoSettings {
        &mut self.settings
    }

    pub fn materials(&self) -> [MaterialId; 2] {
        self.materials
    }

    /// Sway with page time and follow theme commits.
    pub fn tick(&mut self, scene: &mut Scene, elapsed: f32, dt: f32) {
        let y = self.settings.default_rotation.y + elapsed.sin() * self.settings.sway;
        self.set_rotation_y(scene, y);

        if let Some(dark) = self.commits.latest() {
            self.reveal.commit(scene, dark);
        }
        self.reveal.update(scene, dt);
    }

    fn set_rotation_y(&self, scene: &mut Scene, y: f32) {
        let r = self.settings.default_rotation;
        if let Some(node) = scene.node_mut(self.positionable) {
            node.transform.rotation = Quat::from_euler(EulerRot::XYZ, r.x, y, r.z);
        }
    }
}

impl PageEntity for StudyMono {
    fn anchor(&self) -> PageAnchor {
        self.settings.anchor
    }

    fn positionable(&self) -> NodeId {
        self.positionable
    }
}
