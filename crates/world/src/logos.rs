use std::sync::Arc;

use folio_common::Viewport;
use folio_scene::{NodeKind, RaycastEvent, Scene};
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::context::BuildContext;
use crate::label::LabelSink;
use crate::logo::{Logo, LogoSettings};
use crate::page::{PageAnchor, PageEntity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogosSettings {
    pub model: String,
    /// Anchor of the first logo; the rest of the grid is offset from it.
    pub anchor: PageAnchor,
    pub per_row: usize,
    /// Column spacing in percent of the viewport width.
    pub horizontal_margin: f32,
    /// Row spacing in percent of the viewport height.
    pub vertical_margin: f32,
    pub logo: LogoSettings,
}

impl Default for LogosSettings {
    fn default() -> Self {
        Self {
            model: "logos".into(),
            anchor: PageAnchor::new(1, 7.5, 25.0, 0.1),
            per_row: 10,
            horizontal_margin: 9.0,
            vertical_margin: 10.0,
            logo: LogoSettings::default(),
        }
    }
}

impl LogosSettings {
    /// Anchor of the `index`-th logo, filling rows left to right.
    pub fn anchor_for(&self, index: usize) -> PageAnchor {
        let per_row = self.per_row.max(1);
        let (row, column) = (index / per_row, index % per_row);
        PageAnchor {
            left: self.anchor.left + self.horizontal_margin * column as f32,
            top: self.anchor.top + self.vertical_margin * row as f32,
            ..self.anchor
        }
    }
}

/// Grid of logos cloned from the meshes of one model.
///
/// Every mesh with children in the model is a logo template: its children
/// are the logo face and the name text. Templates stay hidden.
pub struct LogosCollection {
    settings: LogosSettings,
    logos: Vec<Logo>,
}

impl LogosCollection {
    pub fn new(ctx: &mut BuildContext<'_>, settings: LogosSettings) -> Result<Self, ConfigError> {
        let model = Arc::clone(ctx.assets.model(&settings.model)?);
        let root = ctx.scene.instantiate(&model, ctx.scene.root());
        if let Some(node) = ctx.scene.node_mut(root) {
            node.visible = false;
        }

        let templates: Vec<_> = ctx
            .scene
            .descendants(root)
            .into_iter()
            .filter(|id| {
                ctx.scene
                    .node(*id)
                    .is_some_and(|n| matches!(n.kind, NodeKind::Mesh { .. }) && !n.children().is_empty())
            })
            .collect();
        if templates.is_empty() {
            tracing::warn!(model = %model.name, "logos model has no logo templates");
        }

        let logos = templates
            .into_iter()
            .enumerate()
            .map(|(i, template)| Logo::new(ctx, template, settings.anchor_for(i), settings.logo.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = logos.len(), "logos laid out");
        Ok(Self { settings, logos })
    }

    pub fn settings(&self) -> &LogosSettings {
        &self.settings
    }

    pub fn logos(&self) -> &[Logo] {
        &self.logos
    }

    pub fn tick(&mut self, scene: &mut Scene, dt: f32) {
        for logo in &mut self.logos {
            logo.tick(scene, dt);
        }
    }

    /// Hand `event` to the logo that registered its handle. Returns whether
    /// one did.
    pub fn handle_raycast(&mut self, event: &RaycastEvent, labels: &mut dyn LabelSink) -> bool {
        match self.logos.iter_mut().find(|l| l.hover_handle() == event.handle) {
            Some(logo) => {
                logo.handle_raycast(event, labels);
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, scene: &mut Scene, viewport: Viewport) {
        for logo in &mut self.logos {
            logo.resize(scene, viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Harness, logos_model};
    use folio_assets::LoadedAsset;
    use folio_scene::{RaycastEventKind, RaycastHandle};

    #[test]
    fn grid_wraps_rows_and_advances_the_row_offset() {
        let settings = LogosSettings {
            per_row: 2,
            ..LogosSettings::default()
        };
        let anchors: Vec<_> = (0..5).map(|i| settings.anchor_for(i)).collect();
        assert_eq!((anchors[0].left, anchors[0].top), (7.5, 25.0));
        assert_eq!((anchors[1].left, anchors[1].top), (16.5, 25.0));
        assert_eq!((anchors[2].left, anchors[2].top), (7.5, 35.0));
        assert_eq!((anchors[4].left, anchors[4].top), (7.5, 45.0));
        assert!(anchors.iter().all(|a| a.page == 1 && a.z == 0.1));
    }

    #[test]
    fn one_logo_per_template_in_model_order() {
        let mut h = Harness::new();
        h.assets.insert(
            "logos",
            LoadedAsset::Model(logos_model(&["Rust", "Go", "Python", "C", "Zig"])),
        );
        let logos = LogosCollection::new(&mut h.build(), LogosSettings::default()).unwrap();
        let names: Vec<_> = logos.logos().iter().map(|l| l.name()).collect();
        assert_eq!(names, ["Rust", "Go", "Python", "C", "Zig"]);
        assert_eq!(h.raycast.len(), 5);
        let last = logos.logos()[4].anchor();
        assert_eq!((last.left, last.top), (7.5 + 36.0, 25.0));
    }

    #[test]
    fn templates_are_hidden_and_clones_shown() {
        let mut h = Harness::new();
        let logos = LogosCollection::new(&mut h.build(), LogosSettings::default()).unwrap();
        let template = h.scene.find_by_name(h.scene.root(), "Rust").unwrap();
        assert!(!h.scene.is_shown(template));
        assert!(h.scene.is_shown(logos.logos()[0].rig().positionable));
    }

    #[test]
    fn events_reach_only_their_logo() {
        let mut h = Harness::new();
        let mut logos = LogosCollection::new(&mut h.build(), LogosSettings::default()).unwrap();
        let go = logos.logos()[1].hover_handle();
        let event = RaycastEvent {
            handle: go,
            kind: RaycastEventKind::InitialHover,
            hit: None,
        };
        assert!(logos.handle_raycast(&event, &mut h.labels));
        assert_eq!(h.labels.text(), Some("Go"));
        assert!(logos.logos()[0].is_idle());
        assert!(!logos.logos()[1].is_idle());

        let stray = RaycastEvent {
            handle: RaycastHandle(99),
            ..event
        };
        assert!(!logos.handle_raycast(&stray, &mut h.labels));
    }

    #[test]
    fn missing_text_mesh_is_a_configuration_error() {
        let mut model = logos_model(&["Rust"]);
        model.nodes.truncate(3);
        model.nodes[1].children.truncate(1);
        let mut h = Harness::new();
        h.assets.insert("logos", LoadedAsset::Model(model));
        assert!(matches!(
            LogosCollection::new(&mut h.build(), LogosSettings::default()),
            Err(ConfigError::Scene(_))
        ));
    }
}
