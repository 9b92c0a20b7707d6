use crate::mixer::{ActionId, AnimationMixer};

/// Clip-name suffix marking an action as part of the secondary group.
pub const SECONDARY_SUFFIX: &str = "_SK";

/// Partition of actions of which at most one plays at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendGroup {
    /// Full-body actions.
    Primary,
    /// Masked overlay actions (facial, blink), named with [`SECONDARY_SUFFIX`].
    Secondary,
}

impl BlendGroup {
    pub fn of(name: &str) -> Self {
        if name.ends_with(SECONDARY_SUFFIX) {
            BlendGroup::Secondary
        } else {
            BlendGroup::Primary
        }
    }

    fn slot(self) -> usize {
        match self {
            BlendGroup::Primary => 0,
            BlendGroup::Secondary => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupState {
    current: Option<ActionId>,
    playing: bool,
    queued: Option<ActionId>,
}

/// Per-group playing/queued bookkeeping layered over an [`AnimationMixer`].
///
/// # Invariants
/// - A group reports at most one playing action.
/// - Playing into a busy group changes nothing, including its queue.
/// - A queued action starts on the same update its group's action finishes.
#[derive(Debug, Clone, Default)]
pub struct ActionGroups {
    groups: [GroupState; 2],
}

impl ActionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `id` in its group unless that group is busy. The group's previous
    /// action is faded out instantly. Returns whether the action started.
    pub fn play(&mut self, mixer: &mut AnimationMixer, id: ActionId) -> bool {
        let Some(group) = mixer.action(id).map(|a| BlendGroup::of(a.name())) else {
            tracing::warn!(?id, "play requested for unknown action");
            return false;
        };
        let state = &mut self.groups[group.slot()];
        if state.playing {
            tracing::trace!(?id, ?group, "group busy, play ignored");
            return false;
        }

        if let Some(previous) = state.current.filter(|p| *p != id) {
            if let Some(action) = mixer.action_mut(previous) {
                action.fade_out(0.0);
            }
        }
        if let Some(action) = mixer.action_mut(id) {
            action.reset().play();
        }
        state.current = Some(id);
        state.playing = true;
        tracing::debug!(?id, ?group, "action playing");
        true
    }

    /// Hold `id` until its group's current action finishes.
    pub fn queue(&mut self, mixer: &AnimationMixer, id: ActionId) {
        if let Some(action) = mixer.action(id) {
            self.groups[BlendGroup::of(action.name()).slot()].queued = Some(id);
        }
    }

    pub fn queued(&self, group: BlendGroup) -> Option<ActionId> {
        self.groups[group.slot()].queued
    }

    pub fn is_playing(&self, group: BlendGroup) -> bool {
        self.groups[group.slot()].playing
    }

    /// Most recently started action of the group, whether or not it still plays.
    pub fn current(&self, group: BlendGroup) -> Option<ActionId> {
        self.groups[group.slot()].current
    }

    /// Clear the playing flag for each finished action's group and start any
    /// queued actions. Returns the actions started.
    pub fn on_finished(&mut self, mixer: &mut AnimationMixer, finished: &[ActionId]) -> Vec<ActionId> {
        for id in finished {
            let Some(action) = mixer.action(*id) else {
                continue;
            };
            let state = &mut self.groups[BlendGroup::of(action.name()).slot()];
            if state.current == Some(*id) {
                state.playing = false;
            }
        }
        self.start_queued(mixer)
    }

    /// Start every queued action whose group is idle, emptying its slot.
    pub fn start_queued(&mut self, mixer: &mut AnimationMixer) -> Vec<ActionId> {
        let mut started = Vec::new();
        for slot in 0..self.groups.len() {
            let state = self.groups[slot];
            let Some(queued) = state.queued else {
                continue;
            };
            if state.playing {
                continue;
            }
            self.groups[slot].queued = None;
            if self.play(mixer, queued) {
                started.push(queued);
            }
        }
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::LoopMode;
    use crate::mixer::tests::{RecordingTarget, move_clip};
    use folio_common::NodeId;

    fn mixer_with(
        clips: &[(&str, f32)],
    ) -> (AnimationMixer, RecordingTarget, Vec<ActionId>) {
        let target = RecordingTarget::with_nodes(&["Bone"]);
        let mut mixer = AnimationMixer::new(NodeId(0));
        let ids = clips
            .iter()
            .map(|(name, duration)| {
                let id = mixer.clip_action(move_clip(name, "Bone", *duration), &target);
                if let Some(action) = mixer.action_mut(id) {
                    action.loop_mode = LoopMode::Once;
                    action.clamp_when_finished = true;
                }
                id
            })
            .collect();
        (mixer, target, ids)
    }

    #[test]
    fn suffix_selects_group() {
        assert_eq!(BlendGroup::of("Wave_SK"), BlendGroup::Secondary);
        assert_eq!(BlendGroup::of("Wave"), BlendGroup::Primary);
    }

    #[test]
    fn busy_group_ignores_play_and_keeps_queue() {
        let (mut mixer, _, ids) = mixer_with(&[("Climb", 1.0), ("Wave", 1.0), ("Fingersnap", 1.0)]);
        let mut groups = ActionGroups::new();
        assert!(groups.play(&mut mixer, ids[0]));
        groups.queue(&mixer, ids[1]);

        assert!(!groups.play(&mut mixer, ids[2]));
        assert_eq!(groups.current(BlendGroup::Primary), Some(ids[0]));
        assert_eq!(groups.queued(BlendGroup::Primary), Some(ids[1]));
        assert!(!mixer.action(ids[2]).is_some_and(|a| a.is_scheduled()));
    }

    #[test]
    fn groups_play_independently() {
        let (mut mixer, _, ids) = mixer_with(&[("Climb", 1.0), ("Climb_SK", 1.0)]);
        let mut groups = ActionGroups::new();
        assert!(groups.play(&mut mixer, ids[0]));
        assert!(groups.play(&mut mixer, ids[1]));
        assert!(groups.is_playing(BlendGroup::Primary));
        assert!(groups.is_playing(BlendGroup::Secondary));
    }

    #[test]
    fn queued_action_starts_on_the_finishing_update() {
        let (mut mixer, mut target, ids) = mixer_with(&[("Climb", 0.5), ("Wave", 1.0)]);
        let mut groups = ActionGroups::new();
        groups.play(&mut mixer, ids[0]);
        groups.queue(&mixer, ids[1]);

        let finished = mixer.update(0.6, &mut target);
        assert_eq!(finished, vec![ids[0]]);
        let started = groups.on_finished(&mut mixer, &finished);

        assert_eq!(started, vec![ids[1]]);
        assert_eq!(groups.current(BlendGroup::Primary), Some(ids[1]));
        assert!(groups.is_playing(BlendGroup::Primary));
        assert_eq!(groups.queued(BlendGroup::Primary), None);
        assert!(!mixer.action(ids[0]).is_some_and(|a| a.is_enabled()));
        assert!(mixer.action(ids[1]).is_some_and(|a| a.is_running()));
    }

    #[test]
    fn finish_without_queue_leaves_group_idle() {
        let (mut mixer, mut target, ids) = mixer_with(&[("Blink_SK", 0.2)]);
        let mut groups = ActionGroups::new();
        groups.play(&mut mixer, ids[0]);
        let finished = mixer.update(0.3, &mut target);
        assert!(groups.on_finished(&mut mixer, &finished).is_empty());
        assert!(!groups.is_playing(BlendGroup::Secondary));
        assert!(groups.play(&mut mixer, ids[0]), "idle group replays");
    }

    #[test]
    fn at_most_one_playing_per_group() {
        let (mut mixer, mut target, ids) = mixer_with(&[("Climb", 0.2), ("Wave", 0.2), ("Fingersnap", 0.2)]);
        let mut groups = ActionGroups::new();
        for &id in &ids {
            groups.play(&mut mixer, id);
            let finished = mixer.update(0.3, &mut target);
            groups.on_finished(&mut mixer, &finished);
            let running = mixer.actions().filter(|(_, a)| a.is_running()).count();
            assert!(running <= 1);
        }
    }
}
