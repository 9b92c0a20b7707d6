//! Typed settings panels.
//!
//! Each tunable settings struct lists its fields with ranges and accepts
//! edits by key. Hosts draw the fields however they like and hand edits
//! back through [`Inspectable::apply`].

use std::f32::consts::PI;

use folio_common::Color;
use folio_scene::CameraSettings;
use folio_world::{CharacterSettings, StudyMonoSettings};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InspectError {
    #[error("{panel} has no field `{key}`")]
    UnknownField { panel: &'static str, key: String },
    #[error("field `{key}` expects a {expected} value")]
    WrongType { key: String, expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float { value: f32, min: f32, max: f32 },
    Color(Color),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Float { .. } => "float",
            FieldValue::Color(_) => "color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: FieldValue,
}

fn float(key: &'static str, value: f32, min: f32, max: f32) -> Field {
    Field {
        key,
        value: FieldValue::Float { value, min, max },
    }
}

fn color(key: &'static str, value: Color) -> Field {
    Field {
        key,
        value: FieldValue::Color(value),
    }
}

/// A settings struct that can be listed and edited field by field.
pub trait Inspectable {
    fn title(&self) -> &'static str;

    fn fields(&self) -> Vec<Field>;

    /// Store one field. Only the raw value of `value` is used; the range
    /// comes from [`Inspectable::fields`].
    fn apply(&mut self, key: &str, value: FieldValue) -> Result<(), InspectError> {
        let field = self
            .fields()
            .into_iter()
            .find(|f| f.key == key)
            .ok_or_else(|| InspectError::UnknownField {
                panel: self.title(),
                key: key.to_string(),
            })?;
        let resolved = match (field.value, value) {
            (FieldValue::Float { min, max, .. }, FieldValue::Float { value, .. }) => FieldValue::Float {
                value: value.clamp(min, max),
                min,
                max,
            },
            (FieldValue::Color(_), FieldValue::Color(c)) => FieldValue::Color(c),
            (expected, _) => {
                return Err(InspectError::WrongType {
                    key: key.to_string(),
                    expected: expected.kind(),
                });
            }
        };
        tracing::debug!(panel = self.title(), key, ?resolved, "setting changed");
        self.store(field.key, resolved);
        Ok(())
    }

    /// Write an already validated value. `key` is always one of `fields()`.
    fn store(&mut self, key: &'static str, value: FieldValue);
}

fn as_float(value: FieldValue) -> f32 {
    match value {
        FieldValue::Float { value, .. } => value,
        FieldValue::Color(_) => 0.0,
    }
}

fn as_color(value: FieldValue) -> Color {
    match value {
        FieldValue::Color(c) => c,
        FieldValue::Float { .. } => Color::WHITE,
    }
}

impl Inspectable for CameraSettings {
    fn title(&self) -> &'static str {
        "Camera"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            float("frustum", self.frustum, 0.25, 4.0),
            float("distance", self.distance, self.near, self.far),
            float("debug_fov_degrees", self.debug_fov_degrees, 10.0, 90.0),
        ]
    }

    fn store(&mut self, key: &'static str, value: FieldValue) {
        let v = as_float(value);
        match key {
            "frustum" => self.frustum = v,
            "distance" => self.distance = v,
            "debug_fov_degrees" => self.debug_fov_degrees = v,
            _ => {}
        }
    }
}

impl Inspectable for CharacterSettings {
    fn title(&self) -> &'static str {
        "Character"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            float("animation_speed", self.animation_speed, 0.0, 3.0),
            float("head_rotation_speed", self.head_rotation_speed, 0.0, 10.0),
            float("head_reset_multiplier", self.head_reset_multiplier, 1.0, 20.0),
            float("snap_trigger_progress", self.snap_trigger_progress, 0.0, 1.0),
            float("snap.scale", self.snap.scale, 0.01, 0.5),
            float("snap.duration", self.snap.duration, 0.05, 2.0),
            color("snap.light_color", self.snap.light_color),
            color("snap.dark_color", self.snap.dark_color),
        ]
    }

    fn store(&mut self, key: &'static str, value: FieldValue) {
        match key {
            "animation_speed" => self.animation_speed = as_float(value),
            "head_rotation_speed" => self.head_rotation_speed = as_float(value),
            "head_reset_multiplier" => self.head_reset_multiplier = as_float(value),
            "snap_trigger_progress" => self.snap_trigger_progress = as_float(value),
            "snap.scale" => self.snap.scale = as_float(value),
            "snap.duration" => self.snap.duration = as_float(value),
            "snap.light_color" => self.snap.light_color = as_color(value),
            "snap.dark_color" => self.snap.dark_color = as_color(value),
            _ => {}
        }
    }
}

impl Inspectable for StudyMonoSettings {
    fn title(&self) -> &'static str {
        "Study"
    }

    fn fields(&self) -> Vec<Field> {
        let r = self.default_rotation;
        vec![
            float("sway", self.sway, 0.0, 0.5),
            float("rotation.x", r.x, -PI, PI),
            float("rotation.y", r.y, -PI, PI),
            float("rotation.z", r.z, -PI, PI),
        ]
    }

    fn store(&mut self, key: &'static str, value: FieldValue) {
        let v = as_float(value);
        match key {
            "sway" => self.sway = v,
            "rotation.x" => self.default_rotation.x = v,
            "rotation.y" => self.default_rotation.y = v,
            "rotation.z" => self.default_rotation.z = v,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(value: f32) -> FieldValue {
        FieldValue::Float {
            value,
            min: 0.0,
            max: 0.0,
        }
    }

    #[test]
    fn fields_show_current_values() {
        let settings = CharacterSettings::default();
        let speed = settings.fields().into_iter().find(|f| f.key == "animation_speed").unwrap();
        assert_eq!(
            speed.value,
            FieldValue::Float {
                value: 1.1,
                min: 0.0,
                max: 3.0
            }
        );
    }

    #[test]
    fn apply_clamps_to_the_declared_range() {
        let mut settings = CharacterSettings::default();
        settings.apply("snap_trigger_progress", set(4.0)).unwrap();
        assert_eq!(settings.snap_trigger_progress, 1.0);
        settings.apply("head_rotation_speed", set(3.5)).unwrap();
        assert_eq!(settings.head_rotation_speed, 3.5);
    }

    #[test]
    fn camera_distance_stays_between_the_clip_planes() {
        let mut camera = CameraSettings::default();
        camera.apply("distance", set(10.0)).unwrap();
        assert_eq!(camera.distance, camera.far);
    }

    #[test]
    fn colors_are_applied_whole() {
        let mut settings = CharacterSettings::default();
        let red = Color::rgb(1.0, 0.0, 0.0);
        settings.apply("snap.dark_color", FieldValue::Color(red)).unwrap();
        assert_eq!(settings.snap.dark_color, red);
    }

    #[test]
    fn unknown_key_and_wrong_type_are_rejected() {
        let mut study = StudyMonoSettings::default();
        assert_eq!(
            study.apply("bounce", set(1.0)),
            Err(InspectError::UnknownField {
                panel: "Study",
                key: "bounce".into()
            })
        );
        assert!(matches!(
            study.apply("sway", FieldValue::Color(Color::BLACK)),
            Err(InspectError::WrongType { expected: "float", .. })
        ));
        assert_eq!(study.sway, 0.05);
    }

    #[test]
    fn panels_work_through_trait_objects() {
        let mut camera = CameraSettings::default();
        let mut study = StudyMonoSettings::default();
        let panels: [&mut dyn Inspectable; 2] = [&mut camera, &mut study];
        let titles: Vec<_> = panels.iter().map(|p| p.title()).collect();
        assert_eq!(titles, ["Camera", "Study"]);
    }
}
