use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

/// Damped orbit around a center point for the debug camera.
///
/// Input accumulates into a pending delta; each [`OrbitControls::update`]
/// applies a frame-rate independent share of it.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +Z.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,

    rotate_delta: Vec2,
}

const POLE_EPSILON: f32 = 1e-4;

impl OrbitControls {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 0.5,
            max_distance: 50.0,
            center,
            radius,
            theta: 0.0,
            phi: FRAC_PI_2,
            rotate_delta: Vec2::ZERO,
        }
    }

    /// Orbit that starts at `position` looking at `center`.
    pub fn looking_from(position: Vec3, center: Vec3) -> Self {
        let offset = position - center;
        let radius = offset.length().max(POLE_EPSILON);
        let mut controls = Self::new(center, radius);
        controls.theta = offset.x.atan2(offset.z);
        controls.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        controls
    }

    /// Queue a drag of `pixels` on a viewport `screen_height` pixels tall.
    pub fn rotate(&mut self, pixels: Vec2, screen_height: f32) {
        let per_pixel = 2.0 * PI / screen_height.max(1.0);
        self.rotate_delta -= pixels * per_pixel * self.rotate_speed;
    }

    /// Wheel zoom; positive steps move closer.
    pub fn zoom(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        let scale = (1.0 - self.zoom_speed).powf(steps.abs());
        if steps > 0.0 {
            self.radius *= scale;
        } else {
            self.radius /= scale;
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
    }

    /// Apply pending rotation and return the camera position.
    pub fn update(&mut self, dt: f32) -> Vec3 {
        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt * 60.0);
            let applied = self.rotate_delta * (1.0 - retention);
            self.theta += applied.x;
            self.phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.center
            + Vec3::new(
                self.radius * sin_phi * sin_theta,
                self.radius * cos_phi,
                self.radius * sin_phi * cos_theta,
            )
    }
}
