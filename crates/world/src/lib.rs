//! The portfolio world: page-anchored entities bound against loaded assets,
//! and the experience that drives them from host events and frame ticks.
//!
//! # Invariants
//! - The world is built at most once, after every asset loaded successfully.
//! - Entities tick in a fixed order: character, page planes, logos, showpiece.
//! - A theme commit is applied once per entity; the character's own commit is
//!   not applied twice.
//! - Raycast events reach only the entity whose handle produced them.

pub mod character;
pub mod context;
pub mod experience;
pub mod label;
pub mod logo;
pub mod logos;
pub mod page;
pub mod page_plane;
pub mod showpiece;
pub mod theme;
pub mod world;

#[cfg(test)]
pub(crate) mod fixtures;

use folio_assets::AssetError;
use folio_common::NodeId;
use folio_scene::{MaterialId, Scene, SceneError};

pub use character::{Character, CharacterRig, CharacterSettings, SnapSettings};
pub use context::{BuildContext, FrameContext};
pub use experience::{Experience, ExperienceSettings, LoadStatus};
pub use label::{LabelSink, OverlayLabel};
pub use logo::{Logo, LogoSettings, logo_scale};
pub use logos::{LogosCollection, LogosSettings};
pub use page::{PageAnchor, PageEntity};
pub use page_plane::{PagePlane, PagePlaneSettings, PlaneTone};
pub use showpiece::{StudyMono, StudyMonoSettings};
pub use theme::{ColorPair, Palette, ThemeReveal};
pub use world::{World, WorldSettings};

/// Loaded assets that do not have the shape an entity expects.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("model {model:?} has no clip named {clip:?}")]
    MissingClip { model: String, clip: String },
    #[error("no material named {name:?} under {root:?}")]
    MissingMaterial { root: String, name: String },
}

/// First material named `name` used at or below `root`.
pub(crate) fn find_material(scene: &Scene, root: NodeId, name: &str) -> Result<MaterialId, ConfigError> {
    scene
        .materials_under(root)
        .into_iter()
        .find(|id| scene.material(*id).is_some_and(|m| m.name == name))
        .ok_or_else(|| ConfigError::MissingMaterial {
            root: scene.node(root).map(|n| n.name.clone()).unwrap_or_default(),
            name: name.to_string(),
        })
}

pub fn crate_info() -> &'static str {
    "folio-world v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::study_model;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("world"));
    }

    #[test]
    fn materials_are_found_by_name_below_a_root() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&study_model(), scene.root());
        assert!(find_material(&scene, root, "Outline_Black").is_ok());
        let err = find_material(&scene, root, "Glass").unwrap_err();
        assert!(matches!(err, ConfigError::MissingMaterial { name, .. } if name == "Glass"));
    }
}
