//! The animated character on the first page.
//!
//! Two blend groups of keyframe actions (body and facial), a head that
//! tracks the cursor over an invisible hover plane, and a theme transition
//! that waits for the body to be free, plays a finger snap, and commits the
//! theme partway through it.

use std::sync::Arc;
use std::time::Duration;

use folio_animation::{
    ActionGroups, ActionId, Animatable, AnimationMixer, BlendGroup, Ease, LoopMode, Timeline,
    TimelineEvent, Tween,
};
use folio_common::{Aabb, Color, NodeId, Subscription, Transform};
use folio_kernel::{SectionChange, ThemeController, ThemeRequest};
use folio_scene::{
    Material, MaterialId, NodeKind, RaycastEntry, RaycastEvent, RaycastEventKind, RaycastHandle, Scene,
};
use glam::{Quat, Vec2, Vec3};

use crate::context::{BuildContext, FrameContext};
use crate::page::{PageAnchor, PageEntity};
use crate::theme::ThemeReveal;
use crate::{ConfigError, find_material};

pub const HEAD_BONE: &str = "DEF-spine006";
pub const FINGER_BONE: &str = "DEF-f_index03R";
const POSITIONABLE: &str = "Scene";
const BODY_MATERIAL: &str = "Texture";
const OUTLINE_MATERIAL: &str = "Outline_Black";

pub const CLIMB: &str = "Climb";
pub const CLIMB_SECONDARY: &str = "Climb_SK";
pub const WAVE: &str = "Wave";
pub const WAVE_SECONDARY: &str = "Wave_SK";
pub const FINGERSNAP: &str = "Fingersnap";
pub const BLINK: &str = "Blink_SK";

/// The sprite flashed at the fingertip when the theme commits.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSettings {
    pub scale: f32,
    pub duration: f32,
    /// Offset from the fingertip to where the sprite appears.
    pub offset: Vec2,
    /// How far the sprite drifts while fading.
    pub drift: Vec2,
    /// Starting opacity. Values above 1 hold the sprite opaque for most of the fade.
    pub opacity: f32,
    /// Sprite color when committing to the light theme.
    pub light_color: Color,
    pub dark_color: Color,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            scale: 0.08,
            duration: 0.25,
            offset: Vec2::new(-0.25, 0.025),
            drift: Vec2::new(-0.01, 0.01),
            opacity: 25.0,
            light_color: Color::from_hex(0x121212),
            dark_color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSettings {
    pub anchor: PageAnchor,
    pub model: String,
    pub texture: String,
    pub snap_texture: String,
    pub scale: f32,
    /// Multiplier from frame delta to animation time.
    pub animation_speed: f32,
    pub head_rotation_speed: f32,
    /// Extra head speed while returning to rest before a theme transition.
    pub head_reset_multiplier: f32,
    /// Largest head quaternion `w` deviation that still counts as at rest.
    pub head_rest_tolerance: f32,
    /// Finger-snap progress at which the theme commits.
    pub snap_trigger_progress: f32,
    pub blink_delay: Duration,
    pub hover_plane_size: Vec2,
    pub hover_plane_offset: Vec3,
    /// Coverage at which the theme reveal has covered the whole model.
    pub full_coverage: f32,
    pub reveal_duration: f32,
    pub snap: SnapSettings,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            anchor: PageAnchor::new(0, 75.0, 100.5, -0.5),
            model: "character".into(),
            texture: "characterTexture".into(),
            snap_texture: "snapVFX".into(),
            scale: 1.3,
            animation_speed: 1.1,
            head_rotation_speed: 2.0,
            head_reset_multiplier: 6.0,
            head_rest_tolerance: 0.005,
            snap_trigger_progress: 0.5,
            blink_delay: Duration::from_millis(5000),
            hover_plane_size: Vec2::new(0.75, 0.65),
            hover_plane_offset: Vec3::new(-0.05, 0.35, 0.5),
            full_coverage: 55.0,
            reveal_duration: 1.0,
            snap: SnapSettings::default(),
        }
    }
}

/// Nodes and materials of an instantiated character, resolved once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterRig {
    pub positionable: NodeId,
    pub head: NodeId,
    pub finger: NodeId,
    pub hover_plane: NodeId,
    pub snap_sprite: NodeId,
    pub body_material: MaterialId,
    pub outline_material: MaterialId,
    pub snap_material: MaterialId,
}

#[derive(Debug, Clone, Copy)]
struct CharacterActions {
    climb: ActionId,
    climb_secondary: ActionId,
    wave: ActionId,
    wave_secondary: ActionId,
    fingersnap: ActionId,
    blink: ActionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapChannel {
    X,
    Y,
    Opacity,
}

struct SnapTarget<'a> {
    scene: &'a mut Scene,
    sprite: NodeId,
    material: MaterialId,
}

impl Animatable<SnapChannel> for SnapTarget<'_> {
    fn get(&self, channel: SnapChannel) -> f32 {
        match channel {
            SnapChannel::X => self.scene.node(self.sprite).map_or(0.0, |n| n.transform.position.x),
            SnapChannel::Y => self.scene.node(self.sprite).map_or(0.0, |n| n.transform.position.y),
            SnapChannel::Opacity => self.scene.material(self.material).map_or(0.0, |m| m.opacity),
        }
    }

    fn set(&mut self, channel: SnapChannel, value: f32) {
        match channel {
            SnapChannel::X => {
                if let Some(node) = self.scene.node_mut(self.sprite) {
                    node.transform.position.x = value;
                }
            }
            SnapChannel::Y => {
                if let Some(node) = self.scene.node_mut(self.sprite) {
                    node.transform.position.y = value;
                }
            }
            SnapChannel::Opacity => {
                if let Some(material) = self.scene.material_mut(self.material) {
                    material.opacity = value;
                }
            }
        }
    }
}

pub struct Character {
    settings: CharacterSettings,
    rig: CharacterRig,
    mixer: AnimationMixer,
    groups: ActionGroups,
    actions: CharacterActions,
    hover: RaycastHandle,
    default_head_rotation: Quat,
    look_rotation: Option<Quat>,
    current_section: i32,
    applied_dark: bool,
    transition_queued: bool,
    transition_in_progress: bool,
    reveal: ThemeReveal,
    snap: Option<Timeline<SnapChannel>>,
    theme_requests: Subscription<ThemeRequest>,
    theme_commits: Subscription<bool>,
    sections: Subscription<SectionChange>,
    blink_timer: Subscription<u32>,
}

impl Character {
    pub fn new(ctx: &mut BuildContext<'_>, settings: CharacterSettings) -> Result<Self, ConfigError> {
        let model = Arc::clone(ctx.assets.model(&settings.model)?);
        ctx.assets.texture(&settings.texture)?;
        ctx.assets.texture(&settings.snap_texture)?;

        let scene = &mut *ctx.scene;
        let root = scene.instantiate(&model, scene.root());
        let positionable = scene.require(root, POSITIONABLE)?;
        let head = scene.require(root, HEAD_BONE)?;
        let finger = scene.require(root, FINGER_BONE)?;
        let body_material = find_material(scene, root, BODY_MATERIAL)?;
        let outline_material = find_material(scene, root, OUTLINE_MATERIAL)?;

        let dark = ctx.theme.is_dark();
        if let Some(material) = scene.material_mut(body_material) {
            material.texture = Some(settings.texture.clone());
            material.theme = Some(ctx.palette.primary.uniforms(dark, settings.full_coverage));
        }
        if let Some(material) = scene.material_mut(outline_material) {
            material.theme = Some(ctx.palette.outline.uniforms(dark, settings.full_coverage));
        }
        if let Some(node) = scene.node_mut(positionable) {
            node.transform.scale = Vec3::splat(settings.scale);
        }

        let plane_material = scene.add_material(Material::new("Character_Hover_Plane"));
        let hover_plane = scene.add_node(
            positionable,
            "Character_Hover_Plane",
            Transform::from_position(settings.hover_plane_offset),
            NodeKind::Mesh {
                bounds: Some(Aabb::from_size(settings.hover_plane_size.extend(0.0))),
                material: plane_material,
            },
        );

        let snap_material = scene.add_material(
            Material::new("Snap_VFX")
                .with_texture(settings.snap_texture.clone())
                .with_opacity(0.0),
        );
        let snap_sprite = scene.add_node(
            scene.root(),
            "Snap_VFX",
            Transform {
                scale: Vec3::splat(settings.snap.scale),
                ..Transform::default()
            },
            NodeKind::Sprite {
                material: snap_material,
            },
        );
        for node in [hover_plane, snap_sprite] {
            if let Some(node) = scene.node_mut(node) {
                node.visible = false;
            }
        }

        let mut mixer = AnimationMixer::new(root);
        for clip in &model.animations {
            let id = mixer.clip_action(Arc::clone(clip), &*scene);
            if let Some(action) = mixer.action_mut(id) {
                action.loop_mode = LoopMode::Once;
                action.clamp_when_finished = true;
            }
        }
        let action = |name: &str| {
            mixer.action_id(name).ok_or_else(|| ConfigError::MissingClip {
                model: model.name.clone(),
                clip: name.to_string(),
            })
        };
        let actions = CharacterActions {
            climb: action(CLIMB)?,
            climb_secondary: action(CLIMB_SECONDARY)?,
            wave: action(WAVE)?,
            wave_secondary: action(WAVE_SECONDARY)?,
            fingersnap: action(FINGERSNAP)?,
            blink: action(BLINK)?,
        };

        let hover = ctx
            .raycast
            .add(RaycastEntry::new(hover_plane).on_hover().on_cursor_exit());

        let current_section = ctx.scroll.section();
        if current_section == settings.anchor.page {
            ctx.theme.override_behaviour(true);
        }

        let default_head_rotation = scene
            .node(head)
            .map_or(Quat::IDENTITY, |n| n.transform.rotation);
        let rig = CharacterRig {
            positionable,
            head,
            finger,
            hover_plane,
            snap_sprite,
            body_material,
            outline_material,
            snap_material,
        };

        let mut character = Self {
            reveal: ThemeReveal::new(
                vec![body_material, outline_material],
                settings.full_coverage,
                settings.reveal_duration,
            ),
            theme_requests: ctx.theme.on_change_requested(),
            theme_commits: ctx.theme.on_change_committed(),
            sections: ctx.scroll.on_section_change(),
            blink_timer: ctx.clock.register_timed_event(settings.blink_delay, None),
            settings,
            rig,
            mixer,
            groups: ActionGroups::new(),
            actions,
            hover,
            default_head_rotation,
            look_rotation: None,
            current_section,
            applied_dark: dark,
            transition_queued: false,
            transition_in_progress: false,
            snap: None,
        };
        character.position_component(ctx.scene, ctx.viewport.aspect());
        character.play_intro();
        tracing::info!(clips = model.animations.len(), "character ready");
        Ok(character)
    }

    fn play_intro(&mut self) {
        let a = self.actions;
        self.groups.play(&mut self.mixer, a.climb);
        self.groups.play(&mut self.mixer, a.climb_secondary);
        self.groups.queue(&self.mixer, a.wave);
        self.groups.queue(&self.mixer, a.wave_secondary);
    }

    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }

    /// Tuning that takes effect from the next frame.
    pub fn settings_mut(&mut self) -> &mut CharacterSettings {
        &mut self.settings
    }

    pub fn rig(&self) -> &CharacterRig {
        &self.rig
    }

    pub fn hover_handle(&self) -> RaycastHandle {
        self.hover
    }

    pub fn is_transition_queued(&self) -> bool {
        self.transition_queued
    }

    pub fn is_transition_in_progress(&self) -> bool {
        self.transition_in_progress
    }

    pub fn is_playing(&self, group: BlendGroup) -> bool {
        self.groups.is_playing(group)
    }

    /// Name of the action most recently started in `group`.
    pub fn current_action(&self, group: BlendGroup) -> Option<&str> {
        let id = self.groups.current(group)?;
        self.mixer.action(id).map(|a| a.name())
    }

    /// Normalized progress of the finger snap while it runs.
    pub fn snap_progress(&self) -> Option<f32> {
        self.mixer
            .action(self.actions.fingersnap)
            .filter(|a| a.is_running())
            .map(|a| a.progress())
    }

    /// Hold the theme override exactly while `section` is this page.
    pub fn sync_theme_override(&mut self, section: i32, theme: &mut ThemeController) {
        self.current_section = section;
        theme.override_behaviour(section == self.settings.anchor.page);
    }

    pub fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.handle_notifications(ctx);

        let dt = ctx.time.delta * self.settings.animation_speed;
        let finished = self.mixer.update(dt, &mut *ctx.scene);
        self.groups.on_finished(&mut self.mixer, &finished);
        self.update_head(ctx.scene, dt);
        self.handle_theme_transition(ctx);

        self.reveal.update(ctx.scene, ctx.time.delta);
        self.update_snap(ctx.scene, ctx.time.delta);
    }

    fn handle_notifications(&mut self, ctx: &mut FrameContext<'_>) {
        let page = self.settings.anchor.page;
        for change in self.sections.drain() {
            self.current_section = change.current;
            ctx.theme.override_behaviour(change.current == page);
        }

        for _ in self.theme_requests.drain().into_iter().filter(|r| r.deferred) {
            if self.current_section == page {
                tracing::debug!("theme transition queued");
                self.transition_queued = true;
            } else {
                tracing::debug!("theme request deferred off page, committing");
                ctx.theme.swap_theme();
            }
        }

        for dark in self.theme_commits.drain() {
            if dark != self.applied_dark {
                self.apply_theme(ctx.scene, dark);
            }
        }

        if !self.blink_timer.drain().is_empty() && !self.groups.is_playing(BlendGroup::Secondary) {
            self.groups.play(&mut self.mixer, self.actions.blink);
        }
    }

    fn update_head(&mut self, scene: &mut Scene, dt: f32) {
        let speed = dt * self.settings.head_rotation_speed;
        let (target, rate) = if self.transition_queued {
            (
                self.default_head_rotation,
                speed * self.settings.head_reset_multiplier,
            )
        } else {
            (self.look_rotation.unwrap_or(self.default_head_rotation), speed)
        };
        if let Some(head) = scene.node_mut(self.rig.head) {
            head.transform.rotation = head.transform.rotation.slerp(target, rate.clamp(0.0, 1.0));
        }
    }

    fn handle_theme_transition(&mut self, ctx: &mut FrameContext<'_>) {
        if self.transition_queued && !self.groups.is_playing(BlendGroup::Primary) {
            self.start_theme_transition(ctx.scene);
        } else if self.transition_in_progress
            && self
                .snap_progress()
                .is_some_and(|p| p > self.settings.snap_trigger_progress)
        {
            ctx.theme.swap_theme();
            let dark = ctx.theme.is_dark();
            self.transition_queued = false;
            self.transition_in_progress = false;
            self.apply_theme(ctx.scene, dark);
            self.play_snap(ctx.scene, dark);
        }
    }

    fn start_theme_transition(&mut self, scene: &Scene) {
        if self.snap_progress().is_some() {
            return;
        }
        self.transition_in_progress = true;

        let head_w = scene
            .node(self.rig.head)
            .map_or(self.default_head_rotation.w, |n| n.transform.rotation.w);
        if (head_w - self.default_head_rotation.w).abs() > self.settings.head_rest_tolerance {
            tracing::trace!("head not at rest, finger snap deferred");
            return;
        }
        self.groups.play(&mut self.mixer, self.actions.fingersnap);
    }

    fn apply_theme(&mut self, scene: &mut Scene, dark: bool) {
        self.applied_dark = dark;
        self.reveal.commit(scene, dark);
    }

    /// Show the snap sprite at the fingertip and fade it out while drifting.
    fn play_snap(&mut self, scene: &mut Scene, dark: bool) {
        let snap = &self.settings.snap;
        let start = scene.world_position(self.rig.finger) + snap.offset.extend(0.0);
        if let Some(node) = scene.node_mut(self.rig.snap_sprite) {
            node.transform.position = start;
            node.visible = true;
        }
        if let Some(material) = scene.material_mut(self.rig.snap_material) {
            material.color = if dark { snap.dark_color } else { snap.light_color };
            material.opacity = snap.opacity;
        }

        let tween = |channel: SnapChannel, from: f32, to: f32| {
            Tween::to(channel, to, snap.duration)
                .from_value(from)
                .ease(Ease::PowerOut(4))
        };
        self.snap = Some(
            Timeline::new()
                .add_at(tween(SnapChannel::X, start.x, start.x + snap.drift.x), 0.0)
                .add_at(tween(SnapChannel::Y, start.y, start.y + snap.drift.y), 0.0)
                .add_at(tween(SnapChannel::Opacity, snap.opacity, 0.0), 0.0),
        );
        tracing::debug!(dark, "snap effect played");
    }

    fn update_snap(&mut self, scene: &mut Scene, dt: f32) {
        let Some(timeline) = self.snap.as_mut() else {
            return;
        };
        let mut target = SnapTarget {
            scene: &mut *scene,
            sprite: self.rig.snap_sprite,
            material: self.rig.snap_material,
        };
        if timeline.update(dt, &mut target) == Some(TimelineEvent::Completed) {
            if let Some(node) = scene.node_mut(self.rig.snap_sprite) {
                node.visible = false;
            }
            self.snap = None;
        }
    }

    /// Route a raycast event for the hover plane.
    pub fn handle_raycast(&mut self, scene: &Scene, event: &RaycastEvent) {
        match event.kind {
            RaycastEventKind::Hover => {
                if self.transition_in_progress {
                    return;
                }
                if let Some(hit) = event.hit {
                    self.look_rotation = scene.look_at_rotation(self.rig.head, hit.point);
                }
            }
            RaycastEventKind::CursorExit => self.look_rotation = None,
            RaycastEventKind::InitialHover | RaycastEventKind::Click => {}
        }
    }
}

impl PageEntity for Character {
    fn anchor(&self) -> PageAnchor {
        self.settings.anchor
    }

    fn positionable(&self) -> NodeId {
        self.rig.positionable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{CHARACTER_CLIPS, Harness, character_model};
    use folio_assets::LoadedAsset;
    use folio_scene::Intersection;

    fn character(h: &mut Harness) -> Character {
        Character::new(&mut h.build(), CharacterSettings::default()).unwrap()
    }

    fn hover(character: &mut Character, scene: &Scene, point: Vec3) {
        let event = RaycastEvent {
            handle: character.hover_handle(),
            kind: RaycastEventKind::Hover,
            hit: Some(Intersection {
                node: character.rig().hover_plane,
                distance: 1.0,
                point,
            }),
        };
        character.handle_raycast(scene, &event);
    }

    #[test]
    fn intro_climbs_then_waves() {
        let mut h = Harness::new();
        let mut c = character(&mut h);
        assert_eq!(c.current_action(BlendGroup::Primary), Some(CLIMB));
        assert_eq!(c.current_action(BlendGroup::Secondary), Some(CLIMB_SECONDARY));

        // One clip second at 1.1x animation speed.
        for _ in 0..19 {
            c.tick(&mut h.frame(0.05));
        }
        assert_eq!(c.current_action(BlendGroup::Primary), Some(WAVE));
        assert_eq!(c.current_action(BlendGroup::Secondary), Some(WAVE_SECONDARY));
    }

    #[test]
    fn theme_request_waits_for_body_and_commits_mid_snap() {
        let mut h = Harness::new();
        let commits = h.theme.on_change_committed();
        let mut c = character(&mut h);
        assert!(h.theme.is_overridden(), "character holds the theme on its own page");

        h.theme.request_change();
        c.tick(&mut h.frame(0.05));
        assert!(c.is_transition_queued());
        assert_eq!(c.current_action(BlendGroup::Primary), Some(CLIMB));
        assert!(c.snap_progress().is_none());
        assert!(commits.drain().is_empty());

        let mut committed_at = None;
        for frame in 0..200 {
            c.tick(&mut h.frame(0.05));
            let seen = commits.drain();
            if seen.is_empty() {
                if let Some(progress) = c.snap_progress() {
                    assert!(progress <= 0.5, "frame {frame}: no commit past the threshold");
                }
                continue;
            }
            assert_eq!(seen, vec![true]);
            let progress = c.snap_progress().expect("snap still running at commit");
            assert!(progress > 0.5 && progress < 1.0);
            committed_at = Some(frame);
            break;
        }

        // Climb and the queued wave both play out first.
        assert!(committed_at.is_some_and(|f| f > 30));
        assert!(h.theme.is_dark());
        assert!(!c.is_transition_queued());
        assert!(!c.is_transition_in_progress());
        assert!(h.scene.node(c.rig().snap_sprite).unwrap().visible);

        for _ in 0..10 {
            c.tick(&mut h.frame(0.05));
        }
        assert!(commits.drain().is_empty(), "one commit per request");
        assert!(!h.scene.node(c.rig().snap_sprite).unwrap().visible);
        let body = h.scene.material(c.rig().body_material).unwrap().theme.unwrap();
        assert!(body.to_dark_theme);
    }

    #[test]
    fn request_off_page_commits_immediately_and_is_not_latched() {
        let mut h = Harness::new();
        h.scroll.set_scroll(800.0);
        let mut c = character(&mut h);
        assert!(!h.theme.is_overridden());

        h.theme.request_change();
        assert!(h.theme.is_dark());
        c.tick(&mut h.frame(0.05));
        assert!(!c.is_transition_queued());
        let outline = h.scene.material(c.rig().outline_material).unwrap().theme.unwrap();
        assert!(outline.to_dark_theme);
        assert!(outline.coverage < outline.full_coverage);
    }

    #[test]
    fn section_change_moves_theme_override() {
        let mut h = Harness::new();
        let mut c = character(&mut h);
        h.scroll.set_scroll(800.0);
        c.tick(&mut h.frame(0.05));
        assert!(!h.theme.is_overridden());
        h.scroll.set_scroll(0.0);
        c.tick(&mut h.frame(0.05));
        assert!(h.theme.is_overridden());
    }

    #[test]
    fn deferred_request_commits_once_after_leaving_the_page() {
        let mut h = Harness::new();
        let commits = h.theme.on_change_committed();
        let mut c = character(&mut h);

        h.scroll.set_scroll(800.0);
        h.theme.request_change();
        assert!(commits.drain().is_empty(), "override still held when requested");

        c.tick(&mut h.frame(0.05));
        assert_eq!(commits.drain(), vec![true]);
        assert!(!c.is_transition_queued());
        assert!(!h.theme.is_overridden());
        let body = h.scene.material(c.rig().body_material).unwrap().theme.unwrap();
        assert!(body.to_dark_theme);

        for _ in 0..20 {
            c.tick(&mut h.frame(0.05));
        }
        assert!(commits.drain().is_empty());
    }

    #[test]
    fn synced_override_follows_the_section_immediately() {
        let mut h = Harness::new();
        h.scroll.set_scroll(800.0);
        let mut c = character(&mut h);
        assert!(!h.theme.is_overridden());

        h.scroll.set_scroll(0.0);
        c.sync_theme_override(h.scroll.section(), &mut h.theme);
        assert!(h.theme.is_overridden());
        h.theme.request_change();
        assert!(!h.theme.is_dark(), "request on the page waits for the snap");
        c.tick(&mut h.frame(0.05));
        assert!(c.is_transition_queued());
    }

    #[test]
    fn blink_only_fires_when_face_is_idle() {
        let mut h = Harness::new();
        let mut c = character(&mut h);
        for _ in 0..104 {
            c.tick(&mut h.frame(0.05));
        }
        assert_eq!(c.current_action(BlendGroup::Secondary), Some(BLINK));
    }

    #[test]
    fn hover_turns_head_and_exit_returns_it() {
        let mut h = Harness::new();
        let mut c = character(&mut h);
        let head = c.rig().head;
        let rest = h.scene.node(head).unwrap().transform.rotation;

        let side = h.scene.world_position(head) + Vec3::new(1.0, 0.0, 0.2);
        hover(&mut c, &h.scene, side);
        for _ in 0..20 {
            c.tick(&mut h.frame(0.05));
        }
        let turned = h.scene.node(head).unwrap().transform.rotation;
        assert!(turned.angle_between(rest) > 0.3);

        c.handle_raycast(
            &h.scene,
            &RaycastEvent {
                handle: c.hover_handle(),
                kind: RaycastEventKind::CursorExit,
                hit: None,
            },
        );
        for _ in 0..60 {
            c.tick(&mut h.frame(0.05));
        }
        let back = h.scene.node(head).unwrap().transform.rotation;
        assert!(back.angle_between(rest) < 0.01);
    }

    #[test]
    fn snap_waits_for_head_to_rest() {
        let mut h = Harness::new();
        let mut c = character(&mut h);
        let head = c.rig().head;
        if let Some(node) = h.scene.node_mut(head) {
            node.transform.rotation = Quat::from_rotation_y(1.0);
        }
        // Let the intro finish with the head still turned.
        c.transition_queued = true;
        c.groups = ActionGroups::new();
        c.tick(&mut h.frame(0.0));
        assert!(c.is_transition_in_progress());
        assert!(c.snap_progress().is_none());

        hover(&mut c, &h.scene, Vec3::new(5.0, 0.0, 0.0));
        assert!(c.look_rotation.is_none(), "hover ignored during a transition");

        for _ in 0..40 {
            c.tick(&mut h.frame(0.05));
        }
        assert!(c.snap_progress().is_some() || !c.is_transition_in_progress());
    }

    #[test]
    fn missing_clip_is_a_configuration_error() {
        let mut h = Harness::new();
        h.assets.insert(
            "character",
            LoadedAsset::Model(character_model(&CHARACTER_CLIPS[..5])),
        );
        let err = Character::new(&mut h.build(), CharacterSettings::default()).err().unwrap();
        assert!(matches!(err, ConfigError::MissingClip { clip, .. } if clip == BLINK));
    }

    #[test]
    fn missing_texture_is_a_configuration_error() {
        let mut h = Harness::new();
        let settings = CharacterSettings {
            snap_texture: "nope".into(),
            ..CharacterSettings::default()
        };
        assert!(matches!(
            Character::new(&mut h.build(), settings),
            Err(ConfigError::Asset(_))
        ));
    }

    #[test]
    fn placed_on_its_page_anchor() {
        let mut h = Harness::new();
        let c = character(&mut h);
        let position = h.scene.node(c.rig().positionable).unwrap().transform.position;
        assert_eq!(position, PageAnchor::new(0, 75.0, 100.5, -0.5).position(2.0));
    }
}
