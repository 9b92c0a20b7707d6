use std::f32::consts::TAU;

use folio_animation::{Animatable, Ease, Repeat, Timeline, TimelineEvent, Tween};
use folio_common::{NodeId, Viewport};
use folio_scene::{
    Material, MaterialId, NodeKind, RaycastEntry, RaycastEvent, RaycastEventKind, RaycastHandle, Scene,
    SceneError,
};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::context::BuildContext;
use crate::label::LabelSink;
use crate::page::{PageAnchor, PageEntity};

/// Tuning shared by every logo in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSettings {
    pub texture: String,
    /// Distance the logo face sits in front of its background card.
    pub z_offset: f32,
    pub base_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Viewport width at which the scale equals `base_scale`.
    pub reference_width: f32,
    pub hover_lift: f32,
    pub transition_duration: f32,
    pub spin_duration: f32,
    pub idle_rotation_y: f32,
    pub idle_rotation_z: f32,
    pub idle_duration: f32,
    pub exit_time_scale: f32,
    pub background_opacity: (f32, f32),
    pub text_opacity: (f32, f32),
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            texture: "logosTexture".into(),
            z_offset: 0.5,
            base_scale: 0.085,
            min_scale: 0.03,
            max_scale: 0.09,
            reference_width: 1920.0,
            hover_lift: 0.2,
            transition_duration: 0.5,
            spin_duration: 1.5,
            idle_rotation_y: 0.35,
            idle_rotation_z: 0.05,
            idle_duration: 2.0,
            exit_time_scale: 1.25,
            background_opacity: (0.1, 0.85),
            text_opacity: (0.0, 1.0),
        }
    }
}

/// Uniform logo scale for a viewport `width` pixels wide, clamped to the
/// settings' range.
pub fn logo_scale(width: f32, settings: &LogoSettings) -> f32 {
    let scale = width / settings.reference_width * settings.base_scale;
    scale.clamp(settings.min_scale, settings.max_scale)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogoChannel {
    Lift,
    RotationY,
    RotationZ,
    Coverage,
    BackgroundOpacity,
    TextOpacity,
}

/// Logo face pose kept as Euler angles so spins past a half turn survive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LogoPose {
    lift: f32,
    rotation_y: f32,
    rotation_z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoRig {
    pub positionable: NodeId,
    pub face: NodeId,
    pub text: NodeId,
    pub background_material: MaterialId,
    pub face_material: MaterialId,
    pub text_material: MaterialId,
}

struct LogoTarget<'a> {
    pose: &'a mut LogoPose,
    scene: &'a mut Scene,
    rig: &'a LogoRig,
}

impl LogoTarget<'_> {
    fn material(&self, channel: LogoChannel) -> Option<MaterialId> {
        match channel {
            LogoChannel::Coverage => Some(self.rig.face_material),
            LogoChannel::BackgroundOpacity => Some(self.rig.background_material),
            LogoChannel::TextOpacity => Some(self.rig.text_material),
            _ => None,
        }
    }
}

impl Animatable<LogoChannel> for LogoTarget<'_> {
    fn get(&self, channel: LogoChannel) -> f32 {
        match channel {
            LogoChannel::Lift => self.pose.lift,
            LogoChannel::RotationY => self.pose.rotation_y,
            LogoChannel::RotationZ => self.pose.rotation_z,
            LogoChannel::Coverage => self
                .scene
                .material(self.rig.face_material)
                .map_or(0.0, |m| m.texture_coverage),
            LogoChannel::BackgroundOpacity | LogoChannel::TextOpacity => self
                .material(channel)
                .and_then(|id| self.scene.material(id))
                .map_or(0.0, |m| m.opacity),
        }
    }

    fn set(&mut self, channel: LogoChannel, value: f32) {
        match channel {
            LogoChannel::Lift => self.pose.lift = value,
            LogoChannel::RotationY => self.pose.rotation_y = value,
            LogoChannel::RotationZ => self.pose.rotation_z = value,
            LogoChannel::Coverage => {
                if let Some(m) = self.scene.material_mut(self.rig.face_material) {
                    m.texture_coverage = value;
                }
            }
            LogoChannel::BackgroundOpacity | LogoChannel::TextOpacity => {
                if let Some(m) = self.material(channel).and_then(|id| self.scene.material_mut(id)) {
                    m.opacity = value;
                }
            }
        }
    }
}

/// One showcase logo: idles with a gentle sway, lifts and spins while
/// hovered, and fills in its texture alongside.
pub struct Logo {
    name: String,
    anchor: PageAnchor,
    settings: LogoSettings,
    rig: LogoRig,
    hover: RaycastHandle,
    pose: LogoPose,
    idle: Timeline<LogoChannel>,
    movement: Timeline<LogoChannel>,
    texture: Timeline<LogoChannel>,
}

impl Logo {
    /// Clone `template` into the scene as a new logo at `anchor`.
    pub fn new(
        ctx: &mut BuildContext<'_>,
        template: NodeId,
        anchor: PageAnchor,
        settings: LogoSettings,
    ) -> Result<Self, ConfigError> {
        ctx.assets.texture(&settings.texture)?;
        let scene = &mut *ctx.scene;
        let name = scene.node(template).map(|n| n.name.clone()).unwrap_or_default();
        let positionable = scene
            .clone_subtree(template, scene.root())
            .ok_or_else(|| SceneError::MissingNode {
                root: "logos".into(),
                name: name.clone(),
            })?;
        let face = scene.require(positionable, &format!("{name}_Logo"))?;
        let text = scene.require(positionable, &format!("{name}_Text"))?;
        let background_material = scene
            .node(positionable)
            .and_then(|n| n.kind.material())
            .ok_or_else(|| ConfigError::MissingMaterial {
                root: name.clone(),
                name: name.clone(),
            })?;

        if let Some(m) = scene.material_mut(background_material) {
            m.texture = Some(settings.texture.clone());
            m.opacity = settings.background_opacity.0;
        }
        let text_material = scene.add_material(
            Material::new(format!("{name}_Text"))
                .with_texture(settings.texture.clone())
                .with_opacity(settings.text_opacity.0),
        );
        let mut face_material = Material::new(format!("{name}_Logo")).with_texture(settings.texture.clone());
        face_material.texture_coverage = 0.0;
        let face_material = scene.add_material(face_material);
        assign_material(scene, text, text_material);
        assign_material(scene, face, face_material);

        let hover = ctx
            .raycast
            .add(RaycastEntry::new(positionable).on_initial_hover().on_cursor_exit());

        let mut logo = Self {
            idle: idle_timeline(&settings),
            movement: movement_timeline(&settings),
            texture: texture_timeline(&settings),
            name,
            anchor,
            settings,
            rig: LogoRig {
                positionable,
                face,
                text,
                background_material,
                face_material,
                text_material,
            },
            hover,
            pose: LogoPose::default(),
        };
        logo.write_pose(ctx.scene);
        logo.resize(ctx.scene, ctx.viewport);
        tracing::debug!(logo = %logo.name, ?anchor, "logo placed");
        Ok(logo)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rig(&self) -> &LogoRig {
        &self.rig
    }

    pub fn hover_handle(&self) -> RaycastHandle {
        self.hover
    }

    pub fn is_idle(&self) -> bool {
        !self.idle.is_paused()
    }

    /// Hover lift and spin progress, 0 at rest.
    pub fn transition_progress(&self) -> f32 {
        self.movement.progress()
    }

    pub fn texture_progress(&self) -> f32 {
        self.texture.progress()
    }

    pub fn tick(&mut self, scene: &mut Scene, dt: f32) {
        let mut target = LogoTarget {
            pose: &mut self.pose,
            scene: &mut *scene,
            rig: &self.rig,
        };
        self.idle.update(dt, &mut target);
        let movement = self.movement.update(dt, &mut target);
        self.texture.update(dt, &mut target);

        if movement == Some(TimelineEvent::ReverseCompleted) && self.movement.progress() == 0.0 {
            tracing::trace!(logo = %self.name, "idle sway restarted");
            self.idle.restart();
        }
        self.write_pose(scene);
    }

    pub fn handle_raycast(&mut self, event: &RaycastEvent, labels: &mut dyn LabelSink) {
        match event.kind {
            RaycastEventKind::InitialHover => {
                labels.show(&self.name);
                self.texture.play();
                self.idle.pause();
                self.movement.set_time_scale(1.0);
                self.movement.play();
            }
            RaycastEventKind::CursorExit => {
                labels.hide();
                self.texture.reverse();
                self.movement.set_time_scale(self.settings.exit_time_scale);
                self.movement.reverse();
            }
            RaycastEventKind::Hover | RaycastEventKind::Click => {}
        }
    }

    fn write_pose(&self, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(self.rig.face) {
            node.transform.position = Vec3::new(0.0, self.pose.lift, self.settings.z_offset);
            node.transform.rotation =
                Quat::from_euler(EulerRot::XYZ, 0.0, self.pose.rotation_y, self.pose.rotation_z);
        }
    }
}

impl PageEntity for Logo {
    fn anchor(&self) -> PageAnchor {
        self.anchor
    }

    fn positionable(&self) -> NodeId {
        self.rig.positionable
    }

    fn resize(&mut self, scene: &mut Scene, viewport: Viewport) {
        let scale = logo_scale(viewport.width, &self.settings);
        if let Some(node) = scene.node_mut(self.rig.positionable) {
            node.transform.scale = Vec3::splat(scale);
        }
        self.position_component(scene, viewport.aspect());
    }
}

fn assign_material(scene: &mut Scene, node: NodeId, id: MaterialId) {
    if let Some(NodeKind::Mesh { material, .. } | NodeKind::Sprite { material }) =
        scene.node_mut(node).map(|n| &mut n.kind)
    {
        *material = id;
    }
}

fn idle_timeline(s: &LogoSettings) -> Timeline<LogoChannel> {
    let settle = s.idle_duration / 2.0;
    let sway = |channel: LogoChannel, to: f32| {
        Tween::to(channel, to, s.idle_duration)
            .ease(Ease::PowerInOut(1))
            .yoyo(true)
            .repeat(Repeat::Forever)
    };
    Timeline::new()
        .add_at(Tween::to(LogoChannel::RotationY, -s.idle_rotation_y, settle), 0.0)
        .add_at(Tween::to(LogoChannel::RotationZ, -s.idle_rotation_z, settle), 0.0)
        .add_at(sway(LogoChannel::RotationY, s.idle_rotation_y), settle)
        .add_at(sway(LogoChannel::RotationZ, s.idle_rotation_z), settle)
}

fn movement_timeline(s: &LogoSettings) -> Timeline<LogoChannel> {
    Timeline::paused()
        .add_at(
            Tween::to(LogoChannel::Lift, s.hover_lift, s.transition_duration).ease(Ease::PowerOut(2)),
            0.0,
        )
        .add_at(Tween::to(LogoChannel::RotationY, TAU, s.spin_duration), 0.0)
}

fn texture_timeline(s: &LogoSettings) -> Timeline<LogoChannel> {
    let d = s.transition_duration;
    Timeline::paused()
        .add_at(Tween::to(LogoChannel::Coverage, 100.0, d).from_value(0.0), 0.0)
        .add_at(
            Tween::to(LogoChannel::BackgroundOpacity, s.background_opacity.1, d)
                .from_value(s.background_opacity.0)
                .ease(Ease::PowerOut(2)),
            0.0,
        )
        .add_at(
            Tween::to(LogoChannel::TextOpacity, s.text_opacity.1, d)
                .from_value(s.text_opacity.0)
                .ease(Ease::PowerOut(2)),
            0.0,
        )
}
