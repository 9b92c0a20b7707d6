use folio_common::{EventChannel, Subscription};
use std::time::Duration;

/// Delta substituted for the first frame after a visibility change.
pub const NOMINAL_FRAME: Duration = Duration::from_millis(16);

/// Timing snapshot handed to every per-frame consumer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds of accumulated frame time since the clock started.
    pub elapsed: f32,
    pub frame: u64,
}

#[derive(Debug)]
struct TimedEvent {
    interval: Duration,
    due: Duration,
    remaining: Option<u32>,
    fired: u32,
    channel: EventChannel<u32>,
}

/// Frame clock driven by the host's refresh callback.
///
/// The host passes monotonically increasing timestamps (time since the host
/// started) to [`Clock::tick`]. Elapsed time is the sum of the deltas handed
/// out, so a normalized frame never lets animations jump forward.
#[derive(Debug)]
pub struct Clock {
    last_host_time: Option<Duration>,
    elapsed: Duration,
    delta: Duration,
    frame: u64,
    visible: bool,
    normalize_next: bool,
    timers: Vec<TimedEvent>,
    ticked: EventChannel<FrameTime>,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            last_host_time: None,
            elapsed: Duration::ZERO,
            delta: NOMINAL_FRAME,
            frame: 0,
            visible: true,
            normalize_next: false,
            timers: Vec::new(),
            ticked: EventChannel::new(),
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to host time `now` and broadcast the new frame time.
    ///
    /// The first tick, and the first tick after a visibility change, use
    /// [`NOMINAL_FRAME`] instead of the measured wall time.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        let measured = match self.last_host_time {
            Some(last) => now.saturating_sub(last),
            None => NOMINAL_FRAME,
        };
        self.last_host_time = Some(now);

        self.delta = if self.normalize_next {
            self.normalize_next = false;
            tracing::debug!(?measured, "normalizing frame delta after visibility change");
            NOMINAL_FRAME
        } else {
            measured
        };
        self.elapsed += self.delta;
        self.frame += 1;

        self.fire_timers();

        let time = self.frame_time();
        tracing::trace!(frame = time.frame, delta = time.delta, "clock tick");
        self.ticked.emit(time);
        time
    }

    pub fn frame_time(&self) -> FrameTime {
        FrameTime {
            delta: self.delta.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            frame: self.frame,
        }
    }

    pub fn delta(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a document visibility change. Any actual change marks the next
    /// tick for delta normalization.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.normalize_next = true;
        }
        self.visible = visible;
    }

    pub fn on_tick(&mut self) -> Subscription<FrameTime> {
        self.ticked.subscribe()
    }

    /// Fire every `delay` of clock time, `repetitions` times (forever when `None`).
    ///
    /// Each delivery carries the 1-based firing count. A timer fires at most
    /// once per tick.
    pub fn register_timed_event(
        &mut self,
        delay: Duration,
        repetitions: Option<u32>,
    ) -> Subscription<u32> {
        if repetitions == Some(0) {
            return Subscription::closed();
        }
        let mut channel = EventChannel::new();
        let sub = channel.subscribe();
        self.timers.push(TimedEvent {
            interval: delay,
            due: self.elapsed + delay,
            remaining: repetitions,
            fired: 0,
            channel,
        });
        sub
    }

    fn fire_timers(&mut self) {
        let now = self.elapsed;
        for timer in &mut self.timers {
            if now < timer.due {
                continue;
            }
            timer.fired += 1;
            timer.channel.emit(timer.fired);
            timer.due = now + timer.interval;
            if let Some(remaining) = timer.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
        self.timers
            .retain(|t| t.remaining != Some(0) && t.channel.subscriber_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn delta_tracks_host_time() {
        let mut clock = Clock::new();
        clock.tick(ms(1000));
        let t = clock.tick(ms(1020));
        assert!((t.delta - 0.020).abs() < 1e-6);
        assert_eq!(t.frame, 2);
    }

    #[test]
    fn visibility_change_normalizes_next_delta_once() {
        let mut clock = Clock::new();
        clock.tick(ms(0));
        clock.set_visible(false);
        clock.set_visible(true);
        let t = clock.tick(ms(60_000));
        assert!((t.delta - 0.016).abs() < 1e-6);
        let t = clock.tick(ms(60_010));
        assert!((t.delta - 0.010).abs() < 1e-6);
    }

    #[test]
    fn same_visibility_does_not_normalize() {
        let mut clock = Clock::new();
        clock.tick(ms(0));
        clock.set_visible(true);
        let t = clock.tick(ms(500));
        assert!((t.delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn elapsed_accumulates_deltas() {
        let mut clock = Clock::new();
        clock.tick(ms(0));
        clock.tick(ms(100));
        clock.tick(ms(300));
        assert!((clock.elapsed() - 0.316).abs() < 1e-5);
    }

    #[test]
    fn timed_event_fires_per_interval() {
        let mut clock = Clock::new();
        clock.tick(ms(0));
        let sub = clock.register_timed_event(ms(100), None);
        clock.tick(ms(50));
        assert!(sub.drain().is_empty());
        clock.tick(ms(120));
        assert_eq!(sub.drain(), vec![1]);
        clock.tick(ms(230));
        assert_eq!(sub.drain(), vec![2]);
    }

    #[test]
    fn timed_event_honors_repetitions() {
        let mut clock = Clock::new();
        clock.tick(ms(0));
        let sub = clock.register_timed_event(ms(10), Some(2));
        for i in 1..=10 {
            clock.tick(ms(i * 20));
        }
        assert_eq!(sub.drain(), vec![1, 2]);
    }

    #[test]
    fn zero_repetitions_never_fires() {
        let mut clock = Clock::new();
        let sub = clock.register_timed_event(ms(1), Some(0));
        clock.tick(ms(0));
        clock.tick(ms(100));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn tick_is_broadcast() {
        let mut clock = Clock::new();
        let sub = clock.on_tick();
        clock.tick(ms(0));
        clock.tick(ms(16));
        assert_eq!(sub.drain().len(), 2);
    }
}
