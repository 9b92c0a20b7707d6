use crate::PageEvent;

/// Converts mouse-wheel motion into page scroll offsets.
///
/// The page is `sections` viewport heights tall, so the offset is clamped to
/// `[0, (sections - 1) * viewport_height]`.
#[derive(Debug, Clone)]
pub struct WheelScroller {
    scroll_top: f32,
    viewport_height: f32,
    sections: u32,
    /// Logical pixels scrolled per wheel line.
    pub line_height: f32,
}

impl WheelScroller {
    pub fn new(viewport_height: f32, sections: u32) -> Self {
        Self {
            scroll_top: 0.0,
            viewport_height,
            sections: sections.max(1),
            line_height: 60.0,
        }
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn max_scroll(&self) -> f32 {
        (self.sections - 1) as f32 * self.viewport_height
    }

    /// Apply wheel lines (positive scrolls toward the top of the page).
    pub fn scroll_lines(&mut self, lines: f32) -> Option<PageEvent> {
        self.scroll_pixels(lines * self.line_height)
    }

    /// Apply a pixel delta (positive scrolls toward the top of the page).
    /// Returns `None` when the clamped offset did not move.
    pub fn scroll_pixels(&mut self, delta: f32) -> Option<PageEvent> {
        self.scroll_to(self.scroll_top - delta)
    }

    pub fn scroll_to(&mut self, scroll_top: f32) -> Option<PageEvent> {
        let clamped = scroll_top.clamp(0.0, self.max_scroll());
        if (clamped - self.scroll_top).abs() < f32::EPSILON {
            return None;
        }
        self.scroll_top = clamped;
        tracing::trace!(scroll_top = clamped, "wheel scroll");
        Some(PageEvent::Scrolled {
            scroll_top: clamped,
        })
    }

    /// Keep the same fractional position when the viewport height changes.
    pub fn set_viewport_height(&mut self, viewport_height: f32) -> Option<PageEvent> {
        let fraction = if self.viewport_height > 0.0 {
            self.scroll_top / self.viewport_height
        } else {
            0.0
        };
        self.viewport_height = viewport_height;
        self.scroll_to(fraction * viewport_height)
    }
}
