use std::sync::Arc;

use crate::clip::{AnimationClip, KeyframeCursor, TrackValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
    PingPong,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn factor(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}

/// Playback state of one clip inside a mixer.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// Hold the final pose after a `Once` action finishes instead of disabling it.
    pub clamp_when_finished: bool,

    paused: bool,
    enabled: bool,
    scheduled: bool,
    forward: bool,
    fade: Option<Fade>,
    cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            scheduled: false,
            forward: true,
            fade: None,
            cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Schedule the action in its mixer.
    pub fn play(&mut self) -> &mut Self {
        self.scheduled = true;
        self
    }

    /// Unschedule and rewind.
    pub fn stop(&mut self) -> &mut Self {
        self.scheduled = false;
        self.reset()
    }

    /// Rewind to the start, re-enable, and cancel any fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        self.forward = true;
        self.fade = None;
        self.cursors.fill(KeyframeCursor::default());
        self
    }

    /// Ramp the effective weight to zero over `duration` seconds. A zero
    /// duration disables the action immediately.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        if duration <= 0.0 {
            self.enabled = false;
            self.fade = None;
        } else {
            self.fade = Some(Fade {
                from: self.fade.map_or(1.0, |f| f.factor()),
                to: 0.0,
                duration,
                elapsed: 0.0,
            });
        }
        self
    }

    /// Ramp the effective weight up from zero over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.enabled = true;
        self.fade = (duration > 0.0).then_some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
        self
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Scheduled, enabled, unpaused and moving.
    pub fn is_running(&self) -> bool {
        self.scheduled && self.enabled && !self.paused && self.time_scale != 0.0
    }

    /// Fraction of the clip played, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.clip.duration <= 0.0 {
            return 1.0;
        }
        (self.time / self.clip.duration).clamp(0.0, 1.0)
    }

    pub fn effective_weight(&self) -> f32 {
        if !self.scheduled || !self.enabled {
            return 0.0;
        }
        self.weight * self.fade.map_or(1.0, |f| f.factor())
    }

    /// Advance by `dt` seconds. Returns true when a `Once` action reaches
    /// its end on this step.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        if !self.scheduled || !self.enabled {
            return false;
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration {
                let ended_silent = fade.to <= 0.0;
                self.fade = None;
                if ended_silent {
                    self.enabled = false;
                    return false;
                }
            }
        }

        if self.paused {
            return false;
        }

        let duration = self.clip.duration;
        let step = dt * self.time_scale;
        match self.loop_mode {
            LoopMode::Once => {
                self.time += step;
                if self.time >= duration || duration <= 0.0 {
                    self.time = duration.max(0.0);
                    self.finish();
                    return true;
                }
                if self.time < 0.0 {
                    self.time = 0.0;
                    self.finish();
                    return true;
                }
            }
            LoopMode::Repeat => {
                if duration > 0.0 {
                    self.time = (self.time + step).rem_euclid(duration);
                }
            }
            LoopMode::PingPong => {
                if duration > 0.0 {
                    let mut t = self.time + if self.forward { step } else { -step };
                    while t > duration || t < 0.0 {
                        if t > duration {
                            t = 2.0 * duration - t;
                        } else {
                            t = -t;
                        }
                        self.forward = !self.forward;
                    }
                    self.time = t;
                }
            }
        }
        false
    }

    fn finish(&mut self) {
        if self.clamp_when_finished {
            self.paused = true;
        } else {
            self.enabled = false;
        }
    }

    pub(crate) fn sample(&mut self, track_index: usize) -> Option<TrackValue> {
        let cursor = self.cursors.get_mut(track_index)?;
        self.clip.sample(track_index, self.time, cursor)
    }

    pub(crate) fn track_count(&self) -> usize {
        self.clip.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{Interpolation, KeyframeTrack, Track, TrackData};

    fn clip(name: &str, duration: f32) -> Arc<AnimationClip> {
        Arc::new(AnimationClip::new(
            name,
            vec![Track {
                node_name: "Bone".into(),
                data: TrackData::Translation(KeyframeTrack::new(
                    vec![0.0, duration],
                    vec![glam::Vec3::ZERO, glam::Vec3::X],
                    Interpolation::Linear,
                )),
            }],
        ))
    }

    #[test]
    fn once_clamped_holds_last_frame() {
        let mut action = AnimationAction::new(clip("Wave", 1.0));
        action.loop_mode = LoopMode::Once;
        action.clamp_when_finished = true;
        action.play();
        assert!(!action.advance(0.6));
        assert!(action.is_running());
        assert!(action.advance(0.6));
        assert_eq!(action.time, 1.0);
        assert!(!action.is_running());
        assert!(action.effective_weight() > 0.0);
        assert!(!action.advance(0.6), "finish is reported once");
    }

    #[test]
    fn once_unclamped_disables() {
        let mut action = AnimationAction::new(clip("Blink_SK", 0.5));
        action.loop_mode = LoopMode::Once;
        action.play();
        assert!(action.advance(1.0));
        assert!(!action.is_enabled());
        assert_eq!(action.effective_weight(), 0.0);
    }

    #[test]
    fn repeat_wraps() {
        let mut action = AnimationAction::new(clip("Idle", 1.0));
        action.play();
        action.advance(1.25);
        assert!((action.time - 0.25).abs() < 1e-5);
    }

    #[test]
    fn ping_pong_reflects() {
        let mut action = AnimationAction::new(clip("Sway", 1.0));
        action.loop_mode = LoopMode::PingPong;
        action.play();
        action.advance(1.25);
        assert!((action.time - 0.75).abs() < 1e-5);
        action.advance(0.5);
        assert!((action.time - 0.25).abs() < 1e-5);
    }

    #[test]
    fn instant_fade_out_then_reset_replays() {
        let mut action = AnimationAction::new(clip("Climb", 1.0));
        action.play();
        action.fade_out(0.0);
        assert_eq!(action.effective_weight(), 0.0);
        action.reset().play();
        assert_eq!(action.effective_weight(), 1.0);
        assert!(action.is_running());
    }

    #[test]
    fn timed_fade_out_disables_at_end() {
        let mut action = AnimationAction::new(clip("Climb", 10.0));
        action.play();
        action.fade_out(0.5);
        action.advance(0.25);
        assert!((action.effective_weight() - 0.5).abs() < 1e-5);
        action.advance(0.5);
        assert!(!action.is_enabled());
    }

    #[test]
    fn unscheduled_action_does_not_advance() {
        let mut action = AnimationAction::new(clip("Wave", 1.0));
        action.advance(0.5);
        assert_eq!(action.time, 0.0);
        assert!(!action.is_running());
    }
}
