use folio_common::Viewport;
use glam::{Mat4, Vec2, Vec3};

use crate::orbit::OrbitControls;
use crate::ray::Ray;

/// Tuning for the page camera and the debug camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Visible world height of the orthographic camera; one page.
    pub frustum: f32,
    pub near: f32,
    pub far: f32,
    /// Camera distance from the page plane along +Z.
    pub distance: f32,
    pub debug_fov_degrees: f32,
    pub debug_near: f32,
    pub debug_far: f32,
    pub debug_position: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            frustum: 1.0,
            near: 2.5,
            far: 4.0,
            distance: 3.0,
            debug_fov_degrees: 35.0,
            debug_near: 0.1,
            debug_far: 20.0,
            debug_position: Vec3::new(0.0, 0.0, 3.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Orthographic {
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub projection: Projection,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Orthographic {
                half_width,
                half_height,
                near,
                far,
            } => Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far),
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray through normalized device coordinates (`[-1, 1]`, +Y up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = far - near;
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return None;
        }
        Some(Ray::new(near, direction))
    }
}

#[derive(Debug, Clone)]
struct DebugCamera {
    camera: Camera,
    controls: OrbitControls,
}

/// Page camera plus an optional debug camera.
///
/// The orthographic camera always tracks resize and scroll, even while the
/// debug camera is the active one.
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: CameraSettings,
    viewport: Viewport,
    scroll_top: f32,
    ortho: Camera,
    debug: Option<DebugCamera>,
    debug_active: bool,
}

impl CameraRig {
    pub fn new(settings: CameraSettings, viewport: Viewport, debug: bool) -> Self {
        let position = Vec3::new(0.0, 0.0, settings.distance);
        let ortho = Camera {
            position,
            target: position - Vec3::Z,
            projection: ortho_projection(&settings, viewport.aspect()),
        };
        let debug = debug.then(|| DebugCamera {
            camera: Camera {
                position: settings.debug_position,
                target: Vec3::ZERO,
                projection: Projection::Perspective {
                    fov_y_degrees: settings.debug_fov_degrees,
                    aspect: viewport.aspect(),
                    near: settings.debug_near,
                    far: settings.debug_far,
                },
            },
            controls: OrbitControls::looking_from(settings.debug_position, Vec3::ZERO),
        });
        let has_debug = debug.is_some();
        tracing::debug!(has_debug, "camera rig created");
        Self {
            settings,
            viewport,
            scroll_top: 0.0,
            ortho,
            debug,
            debug_active: false,
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_settings(&mut self, settings: CameraSettings) {
        self.settings = settings;
        self.resize(self.viewport);
        self.on_scroll(self.scroll_top);
    }

    /// Rebuild both projections for a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let aspect = viewport.aspect();
        self.ortho.projection = ortho_projection(&self.settings, aspect);
        if let Some(debug) = self.debug.as_mut() {
            if let Projection::Perspective { aspect: a, .. } = &mut debug.camera.projection {
                *a = aspect;
            }
        }
    }

    /// Pan the page camera: one viewport height of scroll moves one page down.
    pub fn on_scroll(&mut self, scroll_top: f32) {
        self.scroll_top = scroll_top;
        let y = self.camera_y();
        self.ortho.position = Vec3::new(0.0, y, self.settings.distance);
        self.ortho.target = self.ortho.position - Vec3::Z;
    }

    pub fn camera_y(&self) -> f32 {
        if self.viewport.height <= 0.0 {
            return 0.0;
        }
        -self.scroll_top / self.viewport.height
    }

    /// Advance the debug orbit, if any.
    pub fn update(&mut self, dt: f32) {
        if let Some(debug) = self.debug.as_mut() {
            debug.camera.position = debug.controls.update(dt);
            debug.camera.target = debug.controls.center;
        }
    }

    /// Toggle between the page camera and the debug camera. Without a debug
    /// camera this does nothing. Returns whether the debug camera is active.
    pub fn switch_camera(&mut self) -> bool {
        if self.debug.is_some() {
            self.debug_active = !self.debug_active;
            tracing::info!(debug = self.debug_active, "camera switched");
        }
        self.debug_active
    }

    pub fn is_debug_active(&self) -> bool {
        self.debug_active
    }

    pub fn has_debug(&self) -> bool {
        self.debug.is_some()
    }

    /// The camera used for rendering and raycasting.
    pub fn active(&self) -> &Camera {
        match (&self.debug, self.debug_active) {
            (Some(debug), true) => &debug.camera,
            _ => &self.ortho,
        }
    }

    pub fn orthographic(&self) -> &Camera {
        &self.ortho
    }

    pub fn orbit_controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.debug.as_mut().map(|d| &mut d.controls)
    }
}

fn ortho_projection(settings: &CameraSettings, aspect: f32) -> Projection {
    Projection::Orthographic {
        half_width: settings.frustum * aspect / 2.0,
        half_height: settings.frustum / 2.0,
        near: settings.near,
        far: settings.far,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig(debug: bool) -> CameraRig {
        CameraRig::new(CameraSettings::default(), Viewport::new(1600.0, 800.0, 1.0), debug)
    }

    #[test]
    fn ortho_frustum_follows_aspect() {
        let mut rig = rig(false);
        let Projection::Orthographic { half_width, half_height, .. } = rig.active().projection else {
            panic!("expected orthographic");
        };
        assert_eq!((half_width, half_height), (1.0, 0.5));

        rig.resize(Viewport::new(800.0, 800.0, 1.0));
        let Projection::Orthographic { half_width, .. } = rig.active().projection else {
            panic!("expected orthographic");
        };
        assert_eq!(half_width, 0.5);
    }

    #[test]
    fn one_page_of_scroll_moves_one_unit_down() {
        let mut rig = rig(false);
        rig.on_scroll(800.0);
        assert_eq!(rig.active().position, Vec3::new(0.0, -1.0, 3.0));
        rig.on_scroll(400.0);
        assert_eq!(rig.camera_y(), -0.5);
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let rig = rig(false);
        let ray = rig.active().ray_from_ndc(Vec2::ZERO).unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert!((ray.origin.z - 0.5).abs() < 1e-4, "ray starts on the near plane");
    }

    #[test]
    fn corner_ray_reaches_frustum_edge() {
        let rig = rig(false);
        let ray = rig.active().ray_from_ndc(Vec2::new(1.0, 1.0)).unwrap();
        assert!((ray.origin.x - 1.0).abs() < 1e-4);
        assert!((ray.origin.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn switch_without_debug_keeps_page_camera() {
        let mut rig = rig(false);
        assert!(!rig.switch_camera());
        assert!(matches!(rig.active().projection, Projection::Orthographic { .. }));
    }

    #[test]
    fn debug_camera_does_not_couple_to_page_camera() {
        let mut rig = rig(true);
        assert!(rig.switch_camera());
        assert!(matches!(rig.active().projection, Projection::Perspective { .. }));
        rig.on_scroll(800.0);
        assert_eq!(rig.orthographic().position.y, -1.0);
        assert_eq!(rig.active().position, Vec3::new(0.0, 0.0, 3.0));
        rig.switch_camera();
        assert_eq!(rig.active().position.y, -1.0);
    }
}
