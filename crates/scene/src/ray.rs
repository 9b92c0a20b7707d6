use folio_common::{Aabb, NodeId};
use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to the first point inside `aabb`, if any.
    /// A ray starting inside the box hits at distance 0.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    /// World distance to `local` placed by `world`, tested in the box's own
    /// frame so rotation does not inflate it. Degenerate transforms never hit.
    pub fn intersect_oriented(&self, local: &Aabb, world: &Mat4) -> Option<f32> {
        if world.determinant().abs() < 1e-12 {
            return None;
        }
        let inverse = world.inverse();
        let origin = inverse.transform_point3(self.origin);
        let direction = inverse.transform_vector3(self.direction);
        let scale = direction.length();
        if scale < 1e-12 {
            return None;
        }
        let t = Ray::new(origin, direction).intersect_aabb(local)?;
        Some(t / scale)
    }
}

/// A ray hit on one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}
