/// Easing curves in the `powerN` family: power `n` eases with exponent `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
}

impl Default for Ease {
    /// `power1.out`.
    fn default() -> Self {
        Ease::PowerOut(1)
    }
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(n as i32 + 1),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(n as i32 + 1),
            Ease::PowerInOut(n) => {
                let p = n as i32 + 1;
                if t < 0.5 {
                    (2.0 * t).powi(p) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(p) / 2.0
                }
            }
        }
    }
}
