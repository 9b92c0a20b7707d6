use folio_common::{EventChannel, Subscription, Viewport};

/// Upper bound applied to the host's device pixel ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Tracks the viewport and announces every resize.
#[derive(Debug)]
pub struct SizeTracker {
    viewport: Viewport,
    resized: EventChannel<Viewport>,
}

impl SizeTracker {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            viewport: clamped(width, height, device_pixel_ratio),
            resized: EventChannel::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn width(&self) -> f32 {
        self.viewport.width
    }

    pub fn height(&self) -> f32 {
        self.viewport.height
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.viewport.pixel_ratio
    }

    /// Record a new viewport size and broadcast it.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = clamped(width, height, device_pixel_ratio);
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            pixel_ratio = self.viewport.pixel_ratio,
            "viewport resized"
        );
        self.resized.emit(self.viewport);
    }

    pub fn on_resize(&mut self) -> Subscription<Viewport> {
        self.resized.subscribe()
    }
}

fn clamped(width: f32, height: f32, device_pixel_ratio: f32) -> Viewport {
    Viewport::new(
        width.max(0.0),
        height.max(0.0),
        device_pixel_ratio.clamp(f32::EPSILON, MAX_PIXEL_RATIO),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let sizes = SizeTracker::new(1280.0, 720.0, 3.0);
        assert_eq!(sizes.pixel_ratio(), MAX_PIXEL_RATIO);
        let sizes = SizeTracker::new(1280.0, 720.0, 1.5);
        assert_eq!(sizes.pixel_ratio(), 1.5);
    }

    #[test]
    fn resize_broadcasts_new_viewport() {
        let mut sizes = SizeTracker::new(1280.0, 720.0, 1.0);
        let sub = sizes.on_resize();
        sizes.resize(800.0, 400.0, 1.0);
        let seen = sub.drain();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].aspect(), 2.0);
        assert_eq!(sizes.aspect(), 2.0);
    }
}
