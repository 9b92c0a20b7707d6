use std::collections::BTreeMap;

use folio_animation::{AnimationTarget, TrackValue};
use folio_assets::{ModelData, NodeKind as TemplateKind};
use folio_common::{Aabb, NodeId, Transform};
use glam::{Mat4, Quat, Vec3};

use crate::SceneError;
use crate::material::{Material, MaterialId};

/// Geometry attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Bone,
    /// Mesh with node-space bounds.
    Mesh {
        bounds: Option<Aabb>,
        material: MaterialId,
    },
    /// Camera-facing unit quad.
    Sprite { material: MaterialId },
}

impl NodeKind {
    pub fn material(&self) -> Option<MaterialId> {
        match self {
            NodeKind::Mesh { material, .. } | NodeKind::Sprite { material } => Some(*material),
            NodeKind::Group | NodeKind::Bone => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    pub morph_weights: Vec<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena scene graph. Node 0 is the root and is never removed.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let root = Node {
            name: "Root".into(),
            transform: Transform::default(),
            kind: NodeKind::Group,
            visible: true,
            morph_weights: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            materials: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            transform,
            kind,
            visible: true,
            morph_weights: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        self.attach(id, parent);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    /// Move `child` under `parent`, detaching it from its previous parent.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if child == parent || self.node(parent).is_none() {
            return;
        }
        if let Some(old) = self.node(child).and_then(|n| n.parent) {
            if let Some(old) = self.node_mut(old) {
                old.children.retain(|c| *c != child);
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(child);
        }
    }

    /// `root` and every node below it, depth first.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First node named `name` at or below `root`.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| n.name == name))
    }

    pub fn require(&self, root: NodeId, name: &str) -> Result<NodeId, SceneError> {
        self.find_by_name(root, name).ok_or_else(|| SceneError::MissingNode {
            root: self
                .node(root)
                .map(|n| n.name.clone())
                .unwrap_or_default(),
            name: name.to_string(),
        })
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Mesh bounds in node space; sprites count as a unit quad.
    pub fn local_bounds(&self, id: NodeId) -> Option<Aabb> {
        match &self.node(id)?.kind {
            NodeKind::Mesh { bounds, .. } => *bounds,
            NodeKind::Sprite { .. } => Some(Aabb::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 0.0))),
            NodeKind::Group | NodeKind::Bone => None,
        }
    }

    /// Axis-aligned box around the node's bounds in world space.
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        Some(self.local_bounds(id)?.transformed(&self.world_matrix(id)))
    }

    /// Visible itself and through every ancestor.
    pub fn is_shown(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Distinct materials used at or below `root`.
    pub fn materials_under(&self, root: NodeId) -> Vec<MaterialId> {
        let mut out: Vec<MaterialId> = self
            .descendants(root)
            .into_iter()
            .filter_map(|id| self.node(id)?.kind.material())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Copy a model's hierarchy under `parent`. Meshes sharing a material
    /// name share one scene material. Returns the copied scene root.
    pub fn instantiate(&mut self, model: &ModelData, parent: NodeId) -> NodeId {
        let mut materials: BTreeMap<String, MaterialId> = BTreeMap::new();
        let mut ids = vec![None; model.nodes.len()];
        let mut stack = vec![(model.root, parent)];

        while let Some((index, parent)) = stack.pop() {
            let Some(template) = model.nodes.get(index) else {
                continue;
            };
            let mut morph_weights = Vec::new();
            let kind = match &template.kind {
                TemplateKind::Group => NodeKind::Group,
                TemplateKind::Bone => NodeKind::Bone,
                TemplateKind::Mesh(mesh) => {
                    let name = mesh.material.clone().unwrap_or_else(|| "default".into());
                    let material = *materials
                        .entry(name.clone())
                        .or_insert_with(|| self.add_material(Material::new(name)));
                    morph_weights = mesh.morph_weights.clone();
                    NodeKind::Mesh {
                        bounds: mesh.bounds,
                        material,
                    }
                }
            };
            let id = self.add_node(parent, template.name.clone(), template.transform, kind);
            if let Some(node) = self.node_mut(id) {
                node.morph_weights = morph_weights;
            }
            ids[index] = Some(id);
            for child in template.children.iter().rev() {
                stack.push((*child, id));
            }
        }

        tracing::debug!(model = %model.name, nodes = model.nodes.len(), "model instantiated");
        ids.get(model.root).copied().flatten().unwrap_or(parent)
    }

    /// Deep-copy the subtree at `source` under `parent`, giving the copy its
    /// own materials.
    pub fn clone_subtree(&mut self, source: NodeId, parent: NodeId) -> Option<NodeId> {
        let mut remapped: BTreeMap<MaterialId, MaterialId> = BTreeMap::new();
        let mut stack = vec![(source, parent)];
        let mut first = None;

        while let Some((from, to_parent)) = stack.pop() {
            let Some(node) = self.node(from).cloned() else {
                continue;
            };
            let kind = match node.kind {
                NodeKind::Mesh { bounds, material } => NodeKind::Mesh {
                    bounds,
                    material: self.copy_material(material, &mut remapped),
                },
                NodeKind::Sprite { material } => NodeKind::Sprite {
                    material: self.copy_material(material, &mut remapped),
                },
                other => other,
            };
            let id = self.add_node(to_parent, node.name, node.transform, kind);
            if let Some(copy) = self.node_mut(id) {
                copy.visible = node.visible;
                copy.morph_weights = node.morph_weights;
            }
            first.get_or_insert(id);
            for child in node.children.iter().rev() {
                stack.push((*child, id));
            }
        }
        first
    }

    fn copy_material(
        &mut self,
        material: MaterialId,
        remapped: &mut BTreeMap<MaterialId, MaterialId>,
    ) -> MaterialId {
        if let Some(id) = remapped.get(&material) {
            return *id;
        }
        let copy = self
            .material(material)
            .cloned()
            .unwrap_or_else(|| Material::new("default"));
        let id = self.add_material(copy);
        remapped.insert(material, id);
        id
    }

    /// Rotation that turns `node`'s local +Z toward world point `target`,
    /// expressed in the node's parent space.
    pub fn look_at_rotation(&self, node: NodeId, target: Vec3) -> Option<Quat> {
        let node_ref = self.node(node)?;
        let parent_matrix = node_ref
            .parent
            .map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
        let local_target = parent_matrix.inverse().transform_point3(target);
        let direction = (local_target - node_ref.transform.position).try_normalize()?;
        Some(Quat::from_rotation_arc(Vec3::Z, direction))
    }
}

impl AnimationTarget for Scene {
    fn resolve(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.find_by_name(root, name)
    }

    fn apply(&mut self, node: NodeId, value: &TrackValue, weight: f32) {
        let Some(node) = self.node_mut(node) else {
            return;
        };
        let t = &mut node.transform;
        match value {
            TrackValue::Translation(v) => t.position = t.position.lerp(*v, weight),
            TrackValue::Rotation(q) => t.rotation = t.rotation.slerp(*q, weight),
            TrackValue::Scale(v) => t.scale = t.scale.lerp(*v, weight),
            TrackValue::MorphWeights(w) => {
                node.morph_weights.resize(w.len(), 0.0);
                for (current, target) in node.morph_weights.iter_mut().zip(w) {
                    *current += (target - *current) * weight;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_assets::{ContentHash, MeshTemplate, NodeTemplate};

    fn model() -> ModelData {
        let mesh = |material: &str| {
            TemplateKind::Mesh(MeshTemplate {
                bounds: Some(Aabb::from_size(Vec3::ONE)),
                material: Some(material.into()),
                morph_weights: Vec::new(),
                skinned: false,
            })
        };
        let node = |name: &str, children: Vec<usize>, kind| NodeTemplate {
            name: name.into(),
            transform: Transform::from_position(Vec3::X),
            children,
            kind,
        };
        ModelData {
            name: "logos".into(),
            nodes: vec![
                NodeTemplate {
                    transform: Transform::default(),
                    ..node("Scene", vec![1, 2], TemplateKind::Group)
                },
                node("Rust_Logo", vec![], mesh("Texture")),
                node("Rust_Text", vec![], mesh("Texture")),
            ],
            root: 0,
            animations: Vec::new(),
            digest: ContentHash(0),
        }
    }

    #[test]
    fn instantiate_copies_hierarchy_and_shares_materials() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&model(), scene.root());
        assert_eq!(scene.node(root).map(|n| n.name.as_str()), Some("Scene"));
        let logo = scene.require(root, "Rust_Logo").unwrap();
        let text = scene.require(root, "Rust_Text").unwrap();
        assert_eq!(
            scene.node(logo).unwrap().kind.material(),
            scene.node(text).unwrap().kind.material()
        );
        assert_eq!(scene.materials_under(root).len(), 1);
    }

    #[test]
    fn missing_node_is_an_error() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&model(), scene.root());
        let err = scene.require(root, "Go_Logo").unwrap_err();
        assert!(err.to_string().contains("Go_Logo"));
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let a = scene.add_node(scene.root(), "a", Transform::from_position(Vec3::Y), NodeKind::Group);
        let b = scene.add_node(a, "b", Transform::from_position(Vec3::X), NodeKind::Group);
        assert_eq!(scene.world_position(b), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn clone_subtree_gets_independent_materials() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&model(), scene.root());
        let logo = scene.require(root, "Rust_Logo").unwrap();
        let copy = scene.clone_subtree(logo, scene.root()).unwrap();

        let original = scene.node(logo).unwrap().kind.material().unwrap();
        let cloned = scene.node(copy).unwrap().kind.material().unwrap();
        assert_ne!(original, cloned);
        scene.material_mut(cloned).unwrap().opacity = 0.1;
        assert_eq!(scene.material(original).unwrap().opacity, 1.0);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut scene = Scene::new();
        let a = scene.add_node(scene.root(), "a", Transform::default(), NodeKind::Group);
        let b = scene.add_node(a, "b", Transform::default(), NodeKind::Group);
        scene.node_mut(a).unwrap().visible = false;
        assert!(!scene.is_shown(b));
    }

    #[test]
    fn animation_target_blends_by_weight() {
        let mut scene = Scene::new();
        let bone = scene.add_node(scene.root(), "DEF-spine006", Transform::default(), NodeKind::Bone);
        assert_eq!(scene.resolve(scene.root(), "DEF-spine006"), Some(bone));
        scene.apply(bone, &TrackValue::Translation(Vec3::new(2.0, 0.0, 0.0)), 0.5);
        assert_eq!(scene.node(bone).unwrap().transform.position, Vec3::X);
    }

    #[test]
    fn look_at_rotation_points_z_at_target() {
        let mut scene = Scene::new();
        let head = scene.add_node(scene.root(), "head", Transform::default(), NodeKind::Bone);
        let q = scene.look_at_rotation(head, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((q * Vec3::Z - Vec3::X).length() < 1e-5);
    }
}
