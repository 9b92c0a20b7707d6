use folio_common::{NodeId, Viewport};
use glam::Vec2;

use crate::camera::Camera;
use crate::graph::Scene;
use crate::ray::{Intersection, Ray};

/// Handle returned by [`RaycastRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RaycastHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaycastEventKind {
    InitialHover,
    Hover,
    CursorExit,
    Click,
}

/// One callback invocation, delivered to the entry's owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastEvent {
    pub handle: RaycastHandle,
    pub kind: RaycastEventKind,
    /// Nearest hit under the entry's target; `None` for exits.
    pub hit: Option<Intersection>,
}

/// An interactive target and the callbacks its owner listens for.
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastEntry {
    pub target: NodeId,
    on_hover: bool,
    on_initial_hover: bool,
    on_cursor_exit: bool,
    on_click: bool,
    intersected: bool,
}

impl RaycastEntry {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            on_hover: false,
            on_initial_hover: false,
            on_cursor_exit: false,
            on_click: false,
            intersected: false,
        }
    }

    pub fn on_hover(mut self) -> Self {
        self.on_hover = true;
        self
    }

    pub fn on_initial_hover(mut self) -> Self {
        self.on_initial_hover = true;
        self
    }

    pub fn on_cursor_exit(mut self) -> Self {
        self.on_cursor_exit = true;
        self
    }

    pub fn on_click(mut self) -> Self {
        self.on_click = true;
        self
    }

    pub fn is_intersected(&self) -> bool {
        self.intersected
    }

    fn listens(&self, kind: RaycastEventKind) -> bool {
        match kind {
            RaycastEventKind::InitialHover => self.on_initial_hover,
            RaycastEventKind::Hover => self.on_hover,
            RaycastEventKind::CursorExit => self.on_cursor_exit,
            RaycastEventKind::Click => self.on_click,
        }
    }
}

/// Cursor hit-testing against registered targets only.
///
/// Each entry is tested on its own: overlapping targets can be hovered at
/// the same time. Targets are hit-tested against each node's bounds in the
/// node's own frame, so a spinning target keeps its true footprint.
#[derive(Debug, Clone, Default)]
pub struct RaycastRegistry {
    entries: Vec<RaycastEntry>,
    cursor: Option<Vec2>,
}

impl RaycastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: RaycastEntry) -> RaycastHandle {
        let handle = RaycastHandle(self.entries.len());
        tracing::debug!(?handle, target = ?entry.target, "raycast target registered");
        self.entries.push(entry);
        handle
    }

    pub fn entry(&self, handle: RaycastHandle) -> Option<&RaycastEntry> {
        self.entries.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest cursor position in viewport pixels, origin top-left.
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some(Vec2::new(x, y));
    }

    pub fn cursor_ndc(&self, viewport: Viewport) -> Option<Vec2> {
        let cursor = self.cursor?;
        if viewport.is_degenerate() {
            return None;
        }
        Some(Vec2::new(
            cursor.x / viewport.width * 2.0 - 1.0,
            -(cursor.y / viewport.height * 2.0 - 1.0),
        ))
    }

    /// Cast the cursor ray and update every entry's hover state, returning
    /// the callbacks to run in entry order.
    pub fn dispatch(&mut self, scene: &Scene, camera: &Camera, viewport: Viewport) -> Vec<RaycastEvent> {
        let _span = tracing::trace_span!("raycast_dispatch").entered();
        let ray = self
            .cursor_ndc(viewport)
            .and_then(|ndc| camera.ray_from_ndc(ndc));

        let mut events = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let handle = RaycastHandle(index);
            let hit = ray.as_ref().and_then(|r| nearest_hit(scene, entry.target, r));
            let mut push = |kind: RaycastEventKind, hit: Option<Intersection>| {
                if entry.listens(kind) {
                    events.push(RaycastEvent { handle, kind, hit });
                }
            };
            match (hit, entry.intersected) {
                (Some(hit), false) => {
                    push(RaycastEventKind::InitialHover, Some(hit));
                    push(RaycastEventKind::Hover, Some(hit));
                    entry.intersected = true;
                }
                (Some(hit), true) => push(RaycastEventKind::Hover, Some(hit)),
                (None, true) => {
                    push(RaycastEventKind::CursorExit, None);
                    entry.intersected = false;
                }
                (None, false) => {}
            }
        }
        events
    }

    /// Click callbacks for every entry currently under the cursor.
    pub fn click(&self) -> Vec<RaycastEvent> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.intersected && e.on_click)
            .map(|(i, _)| RaycastEvent {
                handle: RaycastHandle(i),
                kind: RaycastEventKind::Click,
                hit: None,
            })
            .collect()
    }
}

/// Nearest hit on any mesh or sprite at or below `target`.
fn nearest_hit(scene: &Scene, target: NodeId, ray: &Ray) -> Option<Intersection> {
    if scene.node(target).is_none() {
        tracing::trace!(?target, "raycast target missing, skipped");
        return None;
    }
    scene
        .descendants(target)
        .into_iter()
        .filter_map(|node| {
            let bounds = scene.local_bounds(node)?;
            let distance = ray.intersect_oriented(&bounds, &scene.world_matrix(node))?;
            Some(Intersection {
                node,
                distance,
                point: ray.at(distance),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraRig, CameraSettings};
    use crate::graph::NodeKind;
    use crate::material::Material;
    use folio_common::{Aabb, Transform};
    use glam::Vec3;

    struct Fixture {
        scene: Scene,
        rig: CameraRig,
        a: NodeId,
        b: NodeId,
    }

    fn fixture() -> Fixture {
        let viewport = Viewport::new(1000.0, 1000.0, 1.0);
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new("plane"));
        let quad = |x: f32| Transform::from_position(Vec3::new(x, 0.0, 0.0));
        let kind = NodeKind::Mesh {
            bounds: Some(Aabb::from_size(Vec3::new(0.2, 0.2, 0.0))),
            material,
        };
        let a = scene.add_node(scene.root(), "a", quad(0.0), kind.clone());
        let b = scene.add_node(scene.root(), "b", quad(0.3), kind);
        Fixture {
            scene,
            rig: CameraRig::new(CameraSettings::default(), viewport, false),
            a,
            b,
        }
    }

    fn kinds(events: &[RaycastEvent]) -> Vec<(usize, RaycastEventKind)> {
        events.iter().map(|e| (e.handle.0, e.kind)).collect()
    }

    fn full(target: NodeId) -> RaycastEntry {
        RaycastEntry::new(target)
            .on_hover()
            .on_initial_hover()
            .on_cursor_exit()
            .on_click()
    }

    #[test]
    fn dispatch_follows_membership_changes() {
        use RaycastEventKind::*;
        let mut f = fixture();
        let viewport = f.rig.viewport();
        let mut registry = RaycastRegistry::new();
        let a = registry.add(full(f.a));
        let b = registry.add(full(f.b));

        // Frame 1: cursor over A only.
        registry.set_cursor(500.0, 500.0);
        let events = registry.dispatch(&f.scene, f.rig.active(), viewport);
        assert_eq!(kinds(&events), vec![(a.0, InitialHover), (a.0, Hover)]);

        // Frame 2: B grows under the cursor too.
        if let Some(node) = f.scene.node_mut(f.b) {
            node.transform.scale = Vec3::splat(4.0);
        }
        let events = registry.dispatch(&f.scene, f.rig.active(), viewport);
        assert_eq!(
            kinds(&events),
            vec![(a.0, Hover), (b.0, InitialHover), (b.0, Hover)]
        );

        // Frame 3: cursor off both.
        registry.set_cursor(0.0, 0.0);
        let events = registry.dispatch(&f.scene, f.rig.active(), viewport);
        assert_eq!(kinds(&events), vec![(a.0, CursorExit), (b.0, CursorExit)]);

        let events = registry.dispatch(&f.scene, f.rig.active(), viewport);
        assert!(events.is_empty());
    }

    #[test]
    fn only_registered_callbacks_fire() {
        let f = fixture();
        let mut registry = RaycastRegistry::new();
        registry.add(RaycastEntry::new(f.a).on_hover());
        registry.set_cursor(500.0, 500.0);
        let events = registry.dispatch(&f.scene, f.rig.active(), f.rig.viewport());
        assert_eq!(kinds(&events), vec![(0, RaycastEventKind::Hover)]);
        assert!(registry.entry(RaycastHandle(0)).unwrap().is_intersected());
    }

    #[test]
    fn hover_carries_world_hit_point() {
        let f = fixture();
        let mut registry = RaycastRegistry::new();
        registry.add(RaycastEntry::new(f.a).on_hover());
        registry.set_cursor(520.0, 480.0);
        let events = registry.dispatch(&f.scene, f.rig.active(), f.rig.viewport());
        let point = events[0].hit.unwrap().point;
        assert!((point - Vec3::new(0.02, 0.02, 0.0)).length() < 1e-4);
    }

    #[test]
    fn ndc_flips_y() {
        let mut registry = RaycastRegistry::new();
        registry.set_cursor(0.0, 0.0);
        let ndc = registry.cursor_ndc(Viewport::new(200.0, 100.0, 1.0)).unwrap();
        assert_eq!(ndc, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn click_reaches_intersected_entries_only() {
        let f = fixture();
        let mut registry = RaycastRegistry::new();
        registry.add(full(f.a));
        registry.add(full(f.b));
        registry.set_cursor(500.0, 500.0);
        registry.dispatch(&f.scene, f.rig.active(), f.rig.viewport());
        assert_eq!(kinds(&registry.click()), vec![(0, RaycastEventKind::Click)]);
    }

    #[test]
    fn rotated_target_keeps_its_footprint() {
        let f = fixture();
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new("bar"));
        let bar = scene.add_node(
            scene.root(),
            "bar",
            Transform {
                rotation: glam::Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
                ..Transform::default()
            },
            NodeKind::Mesh {
                bounds: Some(Aabb::from_size(Vec3::new(0.4, 0.04, 0.0))),
                material,
            },
        );
        let mut registry = RaycastRegistry::new();
        registry.add(RaycastEntry::new(bar).on_hover());

        // Inside the world-aligned box around the bar, off the bar itself.
        registry.set_cursor(600.0, 600.0);
        assert!(registry.dispatch(&scene, f.rig.active(), f.rig.viewport()).is_empty());

        registry.set_cursor(600.0, 400.0);
        let events = registry.dispatch(&scene, f.rig.active(), f.rig.viewport());
        assert_eq!(kinds(&events), vec![(0, RaycastEventKind::Hover)]);
    }

    #[test]
    fn missing_target_is_skipped() {
        let f = fixture();
        let mut registry = RaycastRegistry::new();
        registry.add(full(NodeId(999)));
        registry.set_cursor(500.0, 500.0);
        assert!(registry.dispatch(&f.scene, f.rig.active(), f.rig.viewport()).is_empty());
    }
}
