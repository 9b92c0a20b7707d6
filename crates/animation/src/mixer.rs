use std::collections::BTreeMap;
use std::sync::Arc;

use folio_common::NodeId;

use crate::action::AnimationAction;
use crate::clip::{AnimationClip, TrackValue};

/// Handle to an action owned by an [`AnimationMixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

/// Receiver of sampled track values, typically a scene graph.
pub trait AnimationTarget {
    /// Find the node a track named `name` drives, searching under `root`.
    fn resolve(&self, root: NodeId, name: &str) -> Option<NodeId>;

    /// Blend `value` into `node` with the given weight in `[0, 1]`.
    fn apply(&mut self, node: NodeId, value: &TrackValue, weight: f32);
}

#[derive(Debug)]
struct BoundAction {
    action: AnimationAction,
    /// Target node per clip track; `None` for tracks that found no node.
    bindings: Vec<Option<NodeId>>,
}

/// Plays actions against the nodes under one root.
#[derive(Debug)]
pub struct AnimationMixer {
    root: NodeId,
    actions: Vec<BoundAction>,
    by_name: BTreeMap<String, ActionId>,
}

impl AnimationMixer {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            actions: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create (or return the existing) action for `clip`, binding its tracks
    /// to nodes once.
    pub fn clip_action(
        &mut self,
        clip: Arc<AnimationClip>,
        target: &impl AnimationTarget,
    ) -> ActionId {
        if let Some(id) = self.by_name.get(&clip.name) {
            return *id;
        }

        let bindings = clip
            .tracks
            .iter()
            .map(|track| {
                let node = target.resolve(self.root, &track.node_name);
                if node.is_none() {
                    tracing::trace!(clip = %clip.name, node = %track.node_name, "track left unbound");
                }
                node
            })
            .collect();

        let id = ActionId(self.actions.len());
        tracing::debug!(clip = %clip.name, ?id, "action created");
        self.by_name.insert(clip.name.clone(), id);
        self.actions.push(BoundAction {
            action: AnimationAction::new(clip),
            bindings,
        });
        id
    }

    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.by_name.get(name).copied()
    }

    pub fn action(&self, id: ActionId) -> Option<&AnimationAction> {
        self.actions.get(id.0).map(|b| &b.action)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut AnimationAction> {
        self.actions.get_mut(id.0).map(|b| &mut b.action)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &AnimationAction)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, b)| (ActionId(i), &b.action))
    }

    /// Advance every scheduled action by `dt` seconds and write the sampled
    /// pose into `target`. Returns the actions that finished on this step.
    ///
    /// Actions are applied in creation order; a later action overrides an
    /// earlier one on shared nodes in proportion to its weight.
    pub fn update(&mut self, dt: f32, target: &mut impl AnimationTarget) -> Vec<ActionId> {
        let mut finished = Vec::new();
        for (index, bound) in self.actions.iter_mut().enumerate() {
            if bound.action.advance(dt) {
                tracing::debug!(action = bound.action.name(), "action finished");
                finished.push(ActionId(index));
            }

            let weight = bound.action.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            for track in 0..bound.action.track_count() {
                let Some(Some(node)) = bound.bindings.get(track).copied() else {
                    continue;
                };
                if let Some(value) = bound.action.sample(track) {
                    target.apply(node, &value, weight.min(1.0));
                }
            }
        }
        finished
    }
}
