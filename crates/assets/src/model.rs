//! glTF / GLB import into a flat node template.

use std::collections::BTreeSet;
use std::sync::Arc;

use folio_animation::{
    AnimationClip, Interpolation, KeyframeTrack, MorphWeights, Track, TrackData,
};
use folio_common::{Aabb, Transform};
use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::buffer::Source as BufferSource;

use crate::fetch::{AssetFetcher, sibling_path};
use crate::{ContentHash, LoadError, content_hash};

/// Renderable part of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTemplate {
    /// Union of the primitive bounds in node space.
    pub bounds: Option<Aabb>,
    /// Material name of the first primitive that has one.
    pub material: Option<String>,
    /// Default morph target weights.
    pub morph_weights: Vec<f32>,
    pub skinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Bone,
    Mesh(MeshTemplate),
}

/// One node of an imported hierarchy. `children` index into [`ModelData::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub name: String,
    pub transform: Transform,
    pub children: Vec<usize>,
    pub kind: NodeKind,
}

/// Decoded model: a node hierarchy plus its animation clips.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub name: String,
    pub nodes: Vec<NodeTemplate>,
    /// Index of the scene root node, named after the glTF scene.
    pub root: usize,
    pub animations: Vec<Arc<AnimationClip>>,
    pub digest: ContentHash,
}

impl ModelData {
    pub fn node(&self, name: &str) -> Option<&NodeTemplate> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn animation(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.animations.iter().find(|c| c.name == name)
    }
}

/// Decode glTF JSON or GLB bytes. External buffers are fetched relative to
/// `path` through `fetcher`.
pub fn decode_model(
    name: &str,
    path: &str,
    bytes: &[u8],
    fetcher: &dyn AssetFetcher,
) -> Result<ModelData, LoadError> {
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let has_data_uri = gltf.buffers().any(|b| {
        matches!(b.source(), BufferSource::Uri(uri) if uri.starts_with("data:"))
    });
    let buffers = if has_data_uri {
        let (_, buffers, _) = gltf::import_slice(bytes)?;
        buffers.into_iter().map(|b| b.0).collect()
    } else {
        load_buffers(&gltf, path, fetcher)?
    };

    let nodes = build_nodes(&gltf);
    let animations = load_animations(&gltf, &buffers);
    tracing::debug!(
        model = name,
        nodes = nodes.len(),
        animations = animations.len(),
        "model decoded"
    );

    Ok(ModelData {
        name: name.to_string(),
        nodes,
        root: 0,
        animations,
        digest: content_hash(bytes),
    })
}

fn load_buffers(
    gltf: &gltf::Gltf,
    path: &str,
    fetcher: &dyn AssetFetcher,
) -> Result<Vec<Vec<u8>>, LoadError> {
    let mut data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            BufferSource::Bin => {
                let blob = gltf.blob.as_deref().ok_or(LoadError::MissingBinaryChunk)?;
                data.push(blob.to_vec());
            }
            BufferSource::Uri(uri) => data.push(fetcher.fetch(&sibling_path(path, uri))?),
        }
    }
    Ok(data)
}

/// Node 0 is a synthetic scene root; glTF node `i` lands at index `i + 1`.
fn build_nodes(gltf: &gltf::Gltf) -> Vec<NodeTemplate> {
    let joints: BTreeSet<usize> = gltf
        .skins()
        .flat_map(|skin| skin.joints().map(|j| j.index()).collect::<Vec<_>>())
        .collect();

    let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
    let root = NodeTemplate {
        name: scene
            .as_ref()
            .and_then(|s| s.name())
            .unwrap_or("Scene")
            .to_string(),
        transform: Transform::default(),
        children: scene
            .as_ref()
            .map(|s| s.nodes().map(|n| n.index() + 1).collect())
            .unwrap_or_default(),
        kind: NodeKind::Group,
    };

    let mut nodes = vec![root];
    for node in gltf.nodes() {
        let (position, rotation, scale) = node.transform().decomposed();
        let kind = if joints.contains(&node.index()) {
            NodeKind::Bone
        } else if let Some(mesh) = node.mesh() {
            NodeKind::Mesh(mesh_template(&mesh, node.skin().is_some()))
        } else {
            NodeKind::Group
        };
        nodes.push(NodeTemplate {
            name: node
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Node_{}", node.index())),
            transform: Transform {
                position: Vec3::from_array(position),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from_array(scale),
            },
            children: node.children().map(|c| c.index() + 1).collect(),
            kind,
        });
    }
    nodes
}

fn mesh_template(mesh: &gltf::Mesh, skinned: bool) -> MeshTemplate {
    let bounds = mesh
        .primitives()
        .map(|p| {
            let b = p.bounding_box();
            Aabb::new(Vec3::from_array(b.min), Vec3::from_array(b.max))
        })
        .reduce(|a, b| a.union(&b));
    let material = mesh
        .primitives()
        .find_map(|p| p.material().name().map(str::to_string));
    MeshTemplate {
        bounds,
        material,
        morph_weights: mesh.weights().map(<[f32]>::to_vec).unwrap_or_default(),
        skinned,
    }
}

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<Arc<AnimationClip>> {
    let mut clips = Vec::new();
    for (index, anim) in gltf.animations().enumerate() {
        let mut tracks = Vec::new();
        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let target = channel.target().node();
            let node_name = target
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Node_{}", target.index()));

            let Some(inputs) = reader.read_inputs() else {
                tracing::warn!(node = %node_name, "animation channel without keyframe times");
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };

            let data = match reader.read_outputs() {
                Some(ReadOutputs::Translations(iter)) => TrackData::Translation(KeyframeTrack::new(
                    times,
                    iter.map(Vec3::from_array).collect(),
                    interpolation,
                )),
                Some(ReadOutputs::Rotations(iter)) => TrackData::Rotation(KeyframeTrack::new(
                    times,
                    iter.into_f32().map(Quat::from_array).collect(),
                    interpolation,
                )),
                Some(ReadOutputs::Scales(iter)) => TrackData::Scale(KeyframeTrack::new(
                    times,
                    iter.map(Vec3::from_array).collect(),
                    interpolation,
                )),
                Some(ReadOutputs::MorphTargetWeights(iter)) => {
                    let flat: Vec<f32> = iter.into_f32().collect();
                    let per_key = match interpolation {
                        Interpolation::CubicSpline => times.len() * 3,
                        _ => times.len(),
                    };
                    let stride = if per_key == 0 { 0 } else { flat.len() / per_key };
                    let values = if stride == 0 {
                        Vec::new()
                    } else {
                        flat.chunks(stride)
                            .map(|c| MorphWeights(c.to_vec()))
                            .collect()
                    };
                    TrackData::MorphWeights(KeyframeTrack::new(times, values, interpolation))
                }
                None => {
                    tracing::warn!(node = %node_name, "animation channel without output values");
                    continue;
                }
            };
            tracks.push(Track { node_name, data });
        }

        let name = anim
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Animation_{index}"));
        clips.push(Arc::new(AnimationClip::new(name, tracks)));
    }
    clips
}
