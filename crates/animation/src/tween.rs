use crate::easing::Ease;

/// A set of scalar channels a tween can drive.
pub trait Animatable<K: Copy> {
    fn get(&self, channel: K) -> f32;
    fn set(&mut self, channel: K, value: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Forever,
}

/// One channel moving to a target value.
///
/// Unless [`Tween::from_value`] is given, the start value is captured from
/// the target the first time the tween is entered.
#[derive(Debug, Clone)]
pub struct Tween<K> {
    channel: K,
    from: Option<f32>,
    to: f32,
    duration: f32,
    ease: Ease,
    repeat: Repeat,
    yoyo: bool,
    start: f32,
    captured: Option<f32>,
}

impl<K: Copy> Tween<K> {
    pub fn to(channel: K, to: f32, duration: f32) -> Self {
        Self {
            channel,
            from: None,
            to,
            duration: duration.max(0.0),
            ease: Ease::default(),
            repeat: Repeat::Count(0),
            yoyo: false,
            start: 0.0,
            captured: None,
        }
    }

    pub fn from_value(mut self, from: f32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Duration including repeats; infinite for [`Repeat::Forever`].
    pub fn total_duration(&self) -> f32 {
        match self.repeat {
            Repeat::Forever => f32::INFINITY,
            Repeat::Count(n) => self.duration * (n as f32 + 1.0),
        }
    }

    fn end(&self) -> f32 {
        self.start + self.total_duration()
    }

    fn start_value(&mut self, target: &impl Animatable<K>) -> f32 {
        if let Some(from) = self.from {
            return from;
        }
        *self.captured.get_or_insert_with(|| target.get(self.channel))
    }

    /// Write the value at timeline time `time`.
    fn render(&mut self, time: f32, target: &mut impl Animatable<K>) {
        let from = self.start_value(target);
        let local = (time - self.start).max(0.0);

        let (cycle, phase) = if self.duration <= 0.0 {
            (0, 1.0)
        } else if local >= self.total_duration() {
            let cycles = match self.repeat {
                Repeat::Count(n) => n,
                Repeat::Forever => 0,
            };
            (cycles, 1.0)
        } else {
            let cycle = (local / self.duration).floor();
            (cycle as u32, (local - cycle * self.duration) / self.duration)
        };

        let forward = !(self.yoyo && cycle % 2 == 1);
        let eased = self.ease.apply(if forward { phase } else { 1.0 - phase });
        target.set(self.channel, from + (self.to - from) * eased);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// Playhead reached the end moving forward.
    Completed,
    /// Playhead reached zero moving in reverse.
    ReverseCompleted,
}

/// Sequence of tweens with a playhead that can pause, reverse and restart.
#[derive(Debug, Clone)]
pub struct Timeline<K> {
    tweens: Vec<Tween<K>>,
    time: f32,
    time_scale: f32,
    paused: bool,
    reversed: bool,
    rendered: Option<f32>,
}

impl<K: Copy> Default for Timeline<K> {
    fn default() -> Self {
        Self {
            tweens: Vec::new(),
            time: 0.0,
            time_scale: 1.0,
            paused: false,
            reversed: false,
            rendered: None,
        }
    }
}

impl<K: Copy> Timeline<K> {
    /// A timeline that starts playing on the next update.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    /// Append `tween` after everything already in the timeline.
    pub fn add(mut self, tween: Tween<K>) -> Self {
        let at = self.finite_end();
        self.add_at(tween, at)
    }

    /// Place `tween` at timeline position `at` seconds.
    pub fn add_at(mut self, mut tween: Tween<K>, at: f32) -> Self {
        tween.start = at.max(0.0);
        self.tweens.push(tween);
        self
    }

    fn finite_end(&self) -> f32 {
        self.tweens
            .iter()
            .map(|t| t.end())
            .filter(|e| e.is_finite())
            .fold(0.0, f32::max)
    }

    pub fn duration(&self) -> f32 {
        self.tweens.iter().map(|t| t.end()).fold(0.0, f32::max)
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Playhead position over duration; always 0 for a looping timeline.
    pub fn progress(&self) -> f32 {
        let duration = self.duration();
        if !duration.is_finite() {
            return 0.0;
        }
        if duration <= 0.0 {
            return if self.rendered.is_some() { 1.0 } else { 0.0 };
        }
        (self.time / duration).clamp(0.0, 1.0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Whether an update would move the playhead.
    pub fn is_active(&self) -> bool {
        if self.paused || self.time_scale == 0.0 {
            return false;
        }
        if self.reversed {
            self.time > 0.0
        } else {
            self.time < self.duration()
        }
    }

    /// Resume playing forward from the current position.
    pub fn play(&mut self) {
        self.paused = false;
        self.reversed = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume playing backward from the current position.
    pub fn reverse(&mut self) {
        self.paused = false;
        self.reversed = true;
    }

    /// Jump to the start and play forward.
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.rendered = None;
        self.play();
    }

    /// Advance the playhead by `dt` seconds scaled by the time scale, write
    /// every affected channel, and report a boundary reached on this step.
    pub fn update(&mut self, dt: f32, target: &mut impl Animatable<K>) -> Option<TimelineEvent> {
        if self.paused {
            return None;
        }
        let duration = self.duration();
        let step = dt * self.time_scale;

        let (next, event) = if self.reversed {
            let next = (self.time - step).max(0.0);
            let event = (self.time > 0.0 && next <= 0.0).then_some(TimelineEvent::ReverseCompleted);
            (next, event)
        } else {
            let next = (self.time + step).min(duration);
            let event = (duration.is_finite() && next >= duration && self.rendered != Some(duration))
                .then_some(TimelineEvent::Completed);
            (next, event)
        };

        if self.rendered != Some(next) {
            self.time = next;
            self.render(target);
        }
        event
    }

    fn render(&mut self, target: &mut impl Animatable<K>) {
        let time = self.time;
        if self.reversed {
            for tween in self.tweens.iter_mut().rev() {
                // Unentered tweens with no captured start have nothing to restore.
                if time < tween.start && tween.captured.is_none() && tween.from.is_none() {
                    continue;
                }
                tween.render(time, target);
            }
        } else {
            for tween in &mut self.tweens {
                if time < tween.start {
                    continue;
                }
                tween.render(time, target);
            }
        }
        self.rendered = Some(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ch {
        A,
        B,
    }

    #[derive(Default)]
    struct Pair {
        a: f32,
        b: f32,
    }

    impl Animatable<Ch> for Pair {
        fn get(&self, channel: Ch) -> f32 {
            match channel {
                Ch::A => self.a,
                Ch::B => self.b,
            }
        }

        fn set(&mut self, channel: Ch, value: f32) {
            match channel {
                Ch::A => self.a = value,
                Ch::B => self.b = value,
            }
        }
    }

    #[test]
    fn sequential_tweens_run_in_order() {
        let mut pair = Pair::default();
        let mut tl = Timeline::new()
            .add(Tween::to(Ch::A, 1.0, 1.0).ease(Ease::Linear))
            .add(Tween::to(Ch::B, 2.0, 1.0).ease(Ease::Linear));
        assert_eq!(tl.duration(), 2.0);

        tl.update(0.5, &mut pair);
        assert_eq!((pair.a, pair.b), (0.5, 0.0));
        tl.update(1.0, &mut pair);
        assert_eq!((pair.a, pair.b), (1.0, 1.0));
        assert_eq!(tl.update(1.0, &mut pair), Some(TimelineEvent::Completed));
        assert_eq!(tl.update(1.0, &mut pair), None, "completion is reported once");
    }

    #[test]
    fn start_value_is_captured_on_entry() {
        let mut pair = Pair { a: 4.0, b: 0.0 };
        let mut tl = Timeline::new().add(Tween::to(Ch::A, 0.0, 1.0).ease(Ease::Linear));
        tl.update(0.25, &mut pair);
        assert_eq!(pair.a, 3.0);
    }

    #[test]
    fn explicit_from_wins_over_current_value() {
        let mut pair = Pair { a: 9.0, b: 0.0 };
        let mut tl = Timeline::new()
            .add(Tween::to(Ch::A, 1.0, 1.0).from_value(0.0).ease(Ease::Linear));
        tl.update(0.5, &mut pair);
        assert_eq!(pair.a, 0.5);
    }

    #[test]
    fn paused_timeline_stays_put_until_played() {
        let mut pair = Pair::default();
        let mut tl = Timeline::paused().add(Tween::to(Ch::A, 1.0, 1.0));
        tl.update(0.5, &mut pair);
        assert_eq!(pair.a, 0.0);
        tl.play();
        tl.update(0.5, &mut pair);
        assert!(pair.a > 0.0);
    }

    #[test]
    fn reverse_restores_start_and_reports_once() {
        let mut pair = Pair::default();
        let mut tl = Timeline::paused()
            .add(Tween::to(Ch::A, 1.0, 0.5).ease(Ease::Linear))
            .add(Tween::to(Ch::B, 1.0, 0.5).ease(Ease::Linear));
        tl.play();
        tl.update(0.75, &mut pair);
        assert_eq!((pair.a, pair.b), (1.0, 0.5));

        tl.reverse();
        assert_eq!(tl.update(0.5, &mut pair), None);
        assert_eq!((pair.a, pair.b), (0.5, 0.0));
        assert_eq!(tl.update(0.5, &mut pair), Some(TimelineEvent::ReverseCompleted));
        assert_eq!(pair.a, 0.0);
        assert_eq!(tl.progress(), 0.0);
        assert_eq!(tl.update(0.5, &mut pair), None);
    }

    #[test]
    fn time_scale_speeds_up_reverse() {
        let mut pair = Pair::default();
        let mut tl = Timeline::new().add(Tween::to(Ch::A, 1.0, 1.0).ease(Ease::Linear));
        tl.update(1.0, &mut pair);
        tl.set_time_scale(2.0);
        tl.reverse();
        tl.update(0.25, &mut pair);
        assert_eq!(pair.a, 0.5);
    }

    #[test]
    fn yoyo_forever_swings_between_ends() {
        let mut pair = Pair::default();
        let mut tl = Timeline::new()
            .add(Tween::to(Ch::A, -1.0, 1.0).ease(Ease::Linear))
            .add(
                Tween::to(Ch::A, 1.0, 2.0)
                    .ease(Ease::Linear)
                    .repeat(Repeat::Forever)
                    .yoyo(true),
            );
        tl.update(1.0, &mut pair);
        assert_eq!(pair.a, -1.0);
        tl.update(2.0, &mut pair);
        assert_eq!(pair.a, 1.0);
        tl.update(1.0, &mut pair);
        assert_eq!(pair.a, 0.0);
        assert_eq!(tl.progress(), 0.0);
        assert!(tl.is_active());
    }

    #[test]
    fn restart_replays_from_zero() {
        let mut pair = Pair::default();
        let mut tl = Timeline::new().add(Tween::to(Ch::A, 1.0, 1.0).from_value(0.0).ease(Ease::Linear));
        tl.update(2.0, &mut pair);
        tl.restart();
        tl.update(0.5, &mut pair);
        assert_eq!(pair.a, 0.5);
    }
}
