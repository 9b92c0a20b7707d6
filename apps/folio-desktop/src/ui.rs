use egui::Context as EguiContext;
use folio_common::Color;
use folio_tools::{FieldValue, Inspectable, SceneInspector};
use folio_world::LoadStatus;

use crate::Page;

/// Draw one settings panel and apply whatever the user changed.
fn settings_panel(ui: &mut egui::Ui, target: &mut dyn Inspectable) -> bool {
    let mut edits = Vec::new();
    egui::CollapsingHeader::new(target.title()).show(ui, |ui| {
        for field in target.fields() {
            match field.value {
                FieldValue::Float { mut value, min, max } => {
                    if ui.add(egui::Slider::new(&mut value, min..=max).text(field.key)).changed() {
                        edits.push((field.key, FieldValue::Float { value, min, max }));
                    }
                }
                FieldValue::Color(color) => {
                    let mut rgb = color.to_array();
                    ui.horizontal(|ui| {
                        if ui.color_edit_button_rgb(&mut rgb).changed() {
                            edits.push((field.key, FieldValue::Color(Color::rgb(rgb[0], rgb[1], rgb[2]))));
                        }
                        ui.label(field.key);
                    });
                }
            }
        }
    });

    let mut changed = false;
    for (key, value) in edits {
        match target.apply(key, value) {
            Ok(()) => changed = true,
            Err(e) => tracing::warn!(error = %e, "setting rejected"),
        }
    }
    changed
}

impl Page {
    pub(crate) fn draw_ui(&mut self, ctx: &EguiContext) {
        self.draw_label(ctx);
        self.draw_status(ctx);
        if self.debug && self.show_inspector {
            self.draw_inspector(ctx);
        }
    }

    /// Logo name under the cursor.
    fn draw_label(&self, ctx: &EguiContext) {
        let Some(text) = self.experience.label() else {
            return;
        };
        let [x, y] = self.cursor;
        egui::Area::new(egui::Id::new("logo_label"))
            .fixed_pos(egui::pos2(x + 16.0, y + 16.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(text).strong());
            });
    }

    fn draw_status(&self, ctx: &EguiContext) {
        let text = match self.experience.status() {
            LoadStatus::Loading { loaded, total } => format!("Loading {loaded}/{total}"),
            LoadStatus::Failed(reason) => format!("Scene unavailable: {reason}"),
            LoadStatus::Idle | LoadStatus::Ready if self.debug => self.timer.overlay(),
            LoadStatus::Idle | LoadStatus::Ready => return,
        };
        egui::Area::new(egui::Id::new("status"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.monospace(text);
            });
    }

    fn draw_inspector(&mut self, ctx: &EguiContext) {
        egui::SidePanel::left("inspector").default_width(300.0).show(ctx, |ui| {
            ui.heading("folio");
            ui.separator();
            ui.label(SceneInspector::summary(&self.experience).to_string());
            ui.label(self.timer.overlay());
            ui.horizontal(|ui| {
                if ui.button("Toggle theme (T)").clicked() {
                    self.toggle_theme();
                }
                if ui.button("Switch camera (C)").clicked() {
                    self.switch_camera();
                }
            });
            ui.separator();

            let mut camera = *self.experience.camera_rig().settings();
            if settings_panel(ui, &mut camera) {
                self.experience.camera_rig_mut().set_settings(camera);
            }
            if let Some(world) = self.experience.world_mut() {
                settings_panel(ui, world.character_mut().settings_mut());
                settings_panel(ui, world.showpiece_mut().settings_mut());
            }

            ui.separator();
            ui.small("F1: inspector | T: theme | C: camera | RMB drag: orbit");
        });
    }
}
