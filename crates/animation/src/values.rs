use glam::{Quat, Vec3};

/// Morph target influences for one keyframe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MorphWeights(pub Vec<f32>);

/// Values a keyframe track can interpolate.
pub trait Interpolatable: Clone {
    fn interpolate_linear(a: &Self, b: &Self, t: f32) -> Self;

    /// Cubic Hermite spline between `v0` and `v1` with glTF-style tangents.
    fn interpolate_cubic(v0: &Self, out0: &Self, in1: &Self, v1: &Self, t: f32, dt: f32) -> Self;
}

/// Hermite basis weights for `t`.
fn hermite(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    (
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    )
}

impl Interpolatable for f32 {
    fn interpolate_linear(a: &Self, b: &Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn interpolate_cubic(v0: &Self, out0: &Self, in1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite(t);
        h00 * v0 + h10 * dt * out0 + h01 * v1 + h11 * dt * in1
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(a: &Self, b: &Self, t: f32) -> Self {
        a.lerp(*b, t)
    }

    fn interpolate_cubic(v0: &Self, out0: &Self, in1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite(t);
        *v0 * h00 + *out0 * (h10 * dt) + *v1 * h01 + *in1 * (h11 * dt)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(a: &Self, b: &Self, t: f32) -> Self {
        a.slerp(*b, t)
    }

    fn interpolate_cubic(v0: &Self, out0: &Self, in1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite(t);
        let v = glam::Vec4::from(*v0) * h00
            + glam::Vec4::from(*out0) * (h10 * dt)
            + glam::Vec4::from(*v1) * h01
            + glam::Vec4::from(*in1) * (h11 * dt);
        Quat::from_vec4(v).normalize()
    }
}

impl Interpolatable for MorphWeights {
    fn interpolate_linear(a: &Self, b: &Self, t: f32) -> Self {
        MorphWeights(
            a.0.iter()
                .zip(&b.0)
                .map(|(x, y)| f32::interpolate_linear(x, y, t))
                .collect(),
        )
    }

    fn interpolate_cubic(v0: &Self, out0: &Self, in1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let n = v0.0.len().min(out0.0.len()).min(in1.0.len()).min(v1.0.len());
        MorphWeights(
            (0..n)
                .map(|i| f32::interpolate_cubic(&v0.0[i], &out0.0[i], &in1.0[i], &v1.0[i], t, dt))
                .collect(),
        )
    }
}
