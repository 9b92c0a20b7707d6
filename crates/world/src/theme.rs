use folio_animation::{Animatable, Ease, Timeline, TimelineEvent, Tween};
use folio_common::Color;
use folio_scene::{MaterialId, Scene, ThemeUniforms};

/// Light and dark variant of one palette role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub light: Color,
    pub dark: Color,
}

impl ColorPair {
    pub fn hex(light: u32, dark: u32) -> Self {
        Self {
            light: Color::from_hex(light),
            dark: Color::from_hex(dark),
        }
    }

    pub fn uniforms(&self, dark_theme: bool, full_coverage: f32) -> ThemeUniforms {
        ThemeUniforms::new(self.light, self.dark, dark_theme, full_coverage)
    }
}

/// Colors shared by every theme-reactive material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: ColorPair,
    pub secondary: ColorPair,
    pub outline: ColorPair,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: ColorPair::hex(0xffffff, 0x292929),
            secondary: ColorPair::hex(0xf1f2f4, 0x1c1c1c),
            outline: ColorPair::hex(0x000000, 0xffffff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Coverage;

struct CoverageTarget<'a> {
    scene: &'a mut Scene,
    materials: &'a [MaterialId],
}

impl Animatable<Coverage> for CoverageTarget<'_> {
    fn get(&self, _: Coverage) -> f32 {
        self.materials
            .first()
            .and_then(|id| self.scene.material(*id)?.theme)
            .map_or(0.0, |t| t.coverage)
    }

    fn set(&mut self, _: Coverage, value: f32) {
        for id in self.materials {
            if let Some(theme) = self.scene.material_mut(*id).and_then(|m| m.theme.as_mut()) {
                theme.coverage = value;
            }
        }
    }
}

/// Coverage ramp that reveals a newly committed theme across a set of
/// materials.
#[derive(Debug, Clone)]
pub struct ThemeReveal {
    materials: Vec<MaterialId>,
    full_coverage: f32,
    duration: f32,
    ease: Ease,
    timeline: Option<Timeline<Coverage>>,
}

impl ThemeReveal {
    pub fn new(materials: Vec<MaterialId>, full_coverage: f32, duration: f32) -> Self {
        Self {
            materials,
            full_coverage,
            duration,
            ease: Ease::PowerOut(4),
            timeline: None,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }

    pub fn is_running(&self) -> bool {
        self.timeline.is_some()
    }

    /// Retarget every material to `dark` and restart the ramp from zero.
    pub fn commit(&mut self, scene: &mut Scene, dark: bool) {
        for id in &self.materials {
            if let Some(theme) = scene.material_mut(*id).and_then(|m| m.theme.as_mut()) {
                theme.begin_transition(dark);
            }
        }
        self.timeline = Some(
            Timeline::new().add(
                Tween::to(Coverage, self.full_coverage, self.duration)
                    .from_value(0.0)
                    .ease(self.ease),
            ),
        );
    }

    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };
        let mut target = CoverageTarget {
            scene,
            materials: &self.materials,
        };
        if timeline.update(dt, &mut target) == Some(TimelineEvent::Completed) {
            self.timeline = None;
        }
    }
}
