use std::fmt;

use folio_common::NodeId;
use folio_render::Renderer;
use folio_scene::{NodeKind, Scene};
use folio_world::{Experience, LoadStatus};

/// Read-only queries for the debug panels.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary<R: Renderer>(experience: &Experience<R>) -> SceneSummary {
        SceneSummary {
            status: experience.status().clone(),
            nodes: experience.scene().len(),
            raycast_entries: experience.raycast().len(),
            section: experience.scroll().section(),
            dark: experience.theme().is_dark(),
            overridden: experience.theme().is_overridden(),
            camera_y: experience.camera_rig().camera_y(),
            debug_camera: experience.camera_rig().is_debug_active(),
        }
    }

    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        let node = scene.node(id)?;
        let kind = match &node.kind {
            NodeKind::Group => "group",
            NodeKind::Bone => "bone",
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::Sprite { .. } => "sprite",
        };
        Some(NodeInfo {
            id,
            name: node.name.clone(),
            kind,
            local_position: node.transform.position.to_array(),
            world_position: scene.world_position(id).to_array(),
            scale: node.transform.scale.to_array(),
            shown: scene.is_shown(id),
            children: node.children().len(),
        })
    }

    /// Nodes whose name contains `pattern`, in arena order.
    pub fn find(scene: &Scene, pattern: &str) -> Vec<NodeId> {
        scene
            .nodes()
            .filter(|(_, node)| node.name.contains(pattern))
            .map(|(id, _)| id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub status: LoadStatus,
    pub nodes: usize,
    pub raycast_entries: usize,
    pub section: i32,
    pub dark: bool,
    pub overridden: bool,
    pub camera_y: f32,
    pub debug_camera: bool,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.status {
            LoadStatus::Idle => "idle".to_string(),
            LoadStatus::Loading { loaded, total } => format!("loading {loaded}/{total}"),
            LoadStatus::Ready => "ready".to_string(),
            LoadStatus::Failed(reason) => format!("failed ({reason})"),
        };
        write!(
            f,
            "Scene: {status} nodes={} raycast={} section={} theme={}{} camera_y={:.2}{}",
            self.nodes,
            self.raycast_entries,
            self.section,
            if self.dark { "dark" } else { "light" },
            if self.overridden { " (held)" } else { "" },
            self.camera_y,
            if self.debug_camera { " [debug camera]" } else { "" },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    pub local_position: [f32; 3],
    pub world_position: [f32; 3],
    pub scale: [f32; 3],
    pub shown: bool,
    pub children: usize,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.world_position;
        write!(
            f,
            "{} #{} '{}' world=({x:.2}, {y:.2}, {z:.2}) children={}{}",
            self.kind,
            self.id.0,
            self.name,
            self.children,
            if self.shown { "" } else { " hidden" },
        )
    }
}
