use folio_common::Viewport;
use folio_kernel::ThemeController;
use folio_scene::{RaycastEvent, Scene};

use crate::ConfigError;
use crate::character::{Character, CharacterSettings};
use crate::context::{BuildContext, FrameContext};
use crate::label::LabelSink;
use crate::logos::{LogosCollection, LogosSettings};
use crate::page::PageEntity;
use crate::page_plane::{PagePlane, PagePlaneSettings, site_planes};
use crate::showpiece::{StudyMono, StudyMonoSettings};

/// What the world builds, page by page.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    pub character: CharacterSettings,
    pub planes: Vec<PagePlaneSettings>,
    pub logos: LogosSettings,
    pub showpiece: StudyMonoSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            character: CharacterSettings::default(),
            planes: site_planes(),
            logos: LogosSettings::default(),
            showpiece: StudyMonoSettings::default(),
        }
    }
}

/// Every page entity, built once the assets are in.
pub struct World {
    character: Character,
    planes: Vec<PagePlane>,
    logos: LogosCollection,
    showpiece: StudyMono,
}

impl World {
    pub fn build(ctx: &mut BuildContext<'_>, settings: &WorldSettings) -> Result<Self, ConfigError> {
        let _span = tracing::info_span!("world_build").entered();
        let character = Character::new(ctx, settings.character.clone())?;
        let planes: Vec<_> = settings
            .planes
            .iter()
            .map(|plane| PagePlane::new(ctx, plane.clone()))
            .collect();
        let logos = LogosCollection::new(ctx, settings.logos.clone())?;
        let showpiece = StudyMono::new(ctx, settings.showpiece.clone())?;
        tracing::info!(nodes = ctx.scene.len(), "world built");
        Ok(Self {
            character,
            planes,
            logos,
            showpiece,
        })
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn planes(&self) -> &[PagePlane] {
        &self.planes
    }

    pub fn logos(&self) -> &LogosCollection {
        &self.logos
    }

    pub fn showpiece(&self) -> &StudyMono {
        &self.showpiece
    }

    pub fn showpiece_mut(&mut self) -> &mut StudyMono {
        &mut self.showpiece
    }

    pub fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        let dt = ctx.time.delta;
        self.character.tick(ctx);
        for plane in &mut self.planes {
            plane.tick(ctx.scene, dt);
        }
        self.logos.tick(ctx.scene, dt);
        self.showpiece.tick(ctx.scene, ctx.time.elapsed, dt);
    }

    /// Called as soon as the scroll section may have changed, so theme
    /// requests issued in the same frame see the right override holder.
    pub fn sync_theme_override(&mut self, section: i32, theme: &mut ThemeController) {
        self.character.sync_theme_override(section, theme);
    }

    pub fn resize(&mut self, scene: &mut Scene, viewport: Viewport) {
        self.character.resize(scene, viewport);
        for plane in &mut self.planes {
            plane.resize(scene, viewport);
        }
        self.logos.resize(scene, viewport);
        self.showpiece.resize(scene, viewport);
    }

    /// Route raycast callbacks to the entities that registered them.
    pub fn handle_raycast(&mut self, events: &[RaycastEvent], scene: &Scene, labels: &mut dyn LabelSink) {
        for event in events {
            if event.handle == self.character.hover_handle() {
                self.character.handle_raycast(scene, event);
            } else if !self.logos.handle_raycast(event, labels) {
                tracing::trace!(handle = ?event.handle, "raycast event without an owner");
            }
        }
    }
}
