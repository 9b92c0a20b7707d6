use folio_common::Color;

/// Index of a material inside a [`crate::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Two-color theme blend driven by a coverage ramp.
///
/// `to_dark_theme` is the theme being revealed; `coverage` runs from 0 to
/// `full_coverage` as the reveal progresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeUniforms {
    pub to_dark_theme: bool,
    pub coverage: f32,
    pub full_coverage: f32,
    pub light: Color,
    pub dark: Color,
}

impl ThemeUniforms {
    pub fn new(light: Color, dark: Color, dark_theme: bool, full_coverage: f32) -> Self {
        Self {
            to_dark_theme: dark_theme,
            coverage: full_coverage,
            full_coverage,
            light,
            dark,
        }
    }

    /// Color currently on screen.
    pub fn color(&self) -> Color {
        let (from, to) = if self.to_dark_theme {
            (self.light, self.dark)
        } else {
            (self.dark, self.light)
        };
        let t = if self.full_coverage > 0.0 {
            (self.coverage / self.full_coverage).clamp(0.0, 1.0)
        } else {
            1.0
        };
        from.lerp(to, t)
    }

    /// Retarget to `dark` with the reveal reset to zero.
    pub fn begin_transition(&mut self, dark: bool) {
        self.to_dark_theme = dark;
        self.coverage = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub opacity: f32,
    /// Name of a loaded texture sampled by this material.
    pub texture: Option<String>,
    /// Texture reveal in percent; 100 shows the texture fully.
    pub texture_coverage: f32,
    pub theme: Option<ThemeUniforms>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            opacity: 1.0,
            texture: None,
            texture_coverage: 100.0,
            theme: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn with_theme(mut self, theme: ThemeUniforms) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Base color after theme blending.
    pub fn display_color(&self) -> Color {
        self.theme.map_or(self.color, |t| t.color())
    }
}
