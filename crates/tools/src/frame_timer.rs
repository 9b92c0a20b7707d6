use std::time::Duration;

/// Rolling window of frame durations for the performance overlay.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.history
        } else {
            &self.history[..self.index]
        }
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    /// Slowest frame in the window.
    pub fn worst(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    /// Frames per second over the window; zero before the first frame.
    pub fn fps(&self) -> f32 {
        let average = self.average().as_secs_f32();
        if average > 0.0 { 1.0 / average } else { 0.0 }
    }

    /// One-line overlay text, e.g. `60 fps  16.7 ms  (worst 18.0 ms)`.
    pub fn overlay(&self) -> String {
        format!(
            "{:.0} fps  {:.1} ms  (worst {:.1} ms)",
            self.fps(),
            self.average().as_secs_f32() * 1000.0,
            self.worst().as_secs_f32() * 1000.0
        )
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn average_and_worst_over_partial_window() {
        let mut timer = FrameTimer::new(4);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.worst(), Duration::from_millis(30));
        assert!((timer.fps() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn old_frames_fall_out_of_the_window() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(100));
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(10));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.worst(), Duration::from_millis(10));
    }

    #[test]
    fn overlay_text() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(20));
        assert_eq!(timer.overlay(), "50 fps  20.0 ms  (worst 20.0 ms)");
    }
}
