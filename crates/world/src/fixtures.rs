//! Hand-built stand-ins for the site's models and a harness that owns the
//! page services entities bind against.

use std::sync::Arc;
use std::time::Duration;

use folio_animation::{AnimationClip, Interpolation, KeyframeTrack, Track, TrackData};
use folio_assets::{
    ContentHash, LoadedAsset, LoadedAssetTable, MeshTemplate, ModelData, NodeKind, NodeTemplate,
    TextureData, TextureFilter,
};
use folio_common::{Aabb, Transform, Viewport};
use folio_kernel::{Clock, ScrollTracker, ThemeController};
use folio_scene::{RaycastRegistry, Scene};
use glam::Vec3;

use crate::context::{BuildContext, FrameContext};
use crate::label::OverlayLabel;
use crate::theme::Palette;

pub(crate) const CLIP_SECONDS: f32 = 1.0;

fn group(name: &str, children: Vec<usize>) -> NodeTemplate {
    NodeTemplate {
        name: name.into(),
        transform: Transform::default(),
        children,
        kind: NodeKind::Group,
    }
}

fn bone(name: &str, position: Vec3, children: Vec<usize>) -> NodeTemplate {
    NodeTemplate {
        name: name.into(),
        transform: Transform::from_position(position),
        children,
        kind: NodeKind::Bone,
    }
}

fn mesh(name: &str, material: &str, size: Vec3, children: Vec<usize>) -> NodeTemplate {
    NodeTemplate {
        name: name.into(),
        transform: Transform::default(),
        children,
        kind: NodeKind::Mesh(MeshTemplate {
            bounds: Some(Aabb::from_size(size)),
            material: Some(material.into()),
            morph_weights: Vec::new(),
            skinned: false,
        }),
    }
}

/// Clip that holds `node` still for `duration` seconds.
pub(crate) fn hold_clip(name: &str, node: &str, duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        name,
        vec![Track {
            node_name: node.into(),
            data: TrackData::Translation(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::ZERO],
                Interpolation::Linear,
            )),
        }],
    ))
}

pub(crate) fn character_model(clips: &[&str]) -> ModelData {
    ModelData {
        name: "character".into(),
        nodes: vec![
            group("Scene", vec![1, 2, 3]),
            mesh("Body", "Texture", Vec3::new(0.5, 1.0, 0.3), vec![]),
            mesh("Outline", "Outline_Black", Vec3::new(0.5, 1.0, 0.3), vec![]),
            group("Armature", vec![4]),
            bone("DEF-spine006", Vec3::new(0.0, 0.4, 0.0), vec![5]),
            bone("DEF-f_index03R", Vec3::new(0.2, 0.1, 0.1), vec![]),
        ],
        root: 0,
        animations: clips
            .iter()
            .map(|name| {
                let duration = if *name == "Blink_SK" { 0.2 } else { CLIP_SECONDS };
                hold_clip(name, "Armature", duration)
            })
            .collect(),
        digest: ContentHash(1),
    }
}

pub(crate) const CHARACTER_CLIPS: [&str; 6] = [
    "Climb",
    "Climb_SK",
    "Wave",
    "Wave_SK",
    "Fingersnap",
    "Blink_SK",
];

pub(crate) fn logos_model(names: &[&str]) -> ModelData {
    let mut nodes = vec![group("Scene", Vec::new())];
    for name in names {
        let index = nodes.len();
        nodes[0].children.push(index);
        nodes.push(mesh(name, "Logos", Vec3::new(1.0, 1.0, 0.1), vec![index + 1, index + 2]));
        nodes.push(mesh(&format!("{name}_Logo"), "Logos", Vec3::new(0.6, 0.6, 0.1), vec![]));
        nodes.push(mesh(&format!("{name}_Text"), "Logos", Vec3::new(0.8, 0.2, 0.0), vec![]));
    }
    ModelData {
        name: "logos".into(),
        nodes,
        root: 0,
        animations: Vec::new(),
        digest: ContentHash(2),
    }
}

pub(crate) fn study_model() -> ModelData {
    ModelData {
        name: "study-mono".into(),
        nodes: vec![
            group("Scene", vec![1, 2]),
            mesh("Mono", "Mono_White", Vec3::ONE, vec![]),
            mesh("Mono_Outline", "Outline_Black", Vec3::ONE, vec![]),
        ],
        root: 0,
        animations: Vec::new(),
        digest: ContentHash(3),
    }
}

pub(crate) fn texture(name: &str) -> TextureData {
    TextureData {
        name: name.into(),
        width: 1,
        height: 1,
        pixels: vec![255; 4],
        flip_y: false,
        filter: TextureFilter::Nearest,
        digest: ContentHash(0),
    }
}

/// Every asset the default world binds.
pub(crate) fn site_assets() -> LoadedAssetTable {
    let mut assets = LoadedAssetTable::new();
    assets.insert("character", LoadedAsset::Model(character_model(&CHARACTER_CLIPS)));
    assets.insert("logos", LoadedAsset::Model(logos_model(&["Rust", "Go", "Python"])));
    assets.insert("study-mono", LoadedAsset::Model(study_model()));
    for name in ["characterTexture", "snapVFX", "logosTexture"] {
        assets.insert(name, LoadedAsset::Texture(texture(name)));
    }
    assets
}

/// Page services plus a scene, advanced by explicit frame steps.
pub(crate) struct Harness {
    pub assets: LoadedAssetTable,
    pub scene: Scene,
    pub raycast: RaycastRegistry,
    pub theme: ThemeController,
    pub scroll: ScrollTracker,
    pub clock: Clock,
    pub labels: OverlayLabel,
    pub viewport: Viewport,
    now: Duration,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_assets(site_assets())
    }

    pub fn with_assets(assets: LoadedAssetTable) -> Self {
        let viewport = Viewport::new(1600.0, 800.0, 1.0);
        let mut clock = Clock::new();
        clock.tick(Duration::ZERO);
        Self {
            assets,
            scene: Scene::new(),
            raycast: RaycastRegistry::new(),
            theme: ThemeController::new(false),
            scroll: ScrollTracker::new(viewport.height),
            clock,
            labels: OverlayLabel::new(),
            viewport,
            now: Duration::ZERO,
        }
    }

    pub fn build(&mut self) -> BuildContext<'_> {
        BuildContext {
            assets: &self.assets,
            scene: &mut self.scene,
            raycast: &mut self.raycast,
            theme: &mut self.theme,
            scroll: &mut self.scroll,
            clock: &mut self.clock,
            viewport: self.viewport,
            palette: Palette::default(),
        }
    }

    /// Advance the clock by `dt` seconds and hand out the frame.
    pub fn frame(&mut self, dt: f32) -> FrameContext<'_> {
        self.now += Duration::from_secs_f32(dt);
        let time = self.clock.tick(self.now);
        FrameContext {
            time,
            scene: &mut self.scene,
            theme: &mut self.theme,
            labels: &mut self.labels,
        }
    }
}
