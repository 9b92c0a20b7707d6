use folio_common::{EventChannel, Subscription};

/// Old and new section index carried by a section-change broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    pub previous: i32,
    pub current: i32,
}

/// Tracks the page scroll offset and the section it falls in.
///
/// A section is one full viewport height of scroll. The current section is
/// `round(scroll_top / viewport_height)`.
#[derive(Debug)]
pub struct ScrollTracker {
    scroll_top: f32,
    viewport_height: f32,
    section: i32,
    scrolled: EventChannel<f32>,
    section_changed: EventChannel<SectionChange>,
}

impl ScrollTracker {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            scroll_top: 0.0,
            viewport_height,
            section: 0,
            scrolled: EventChannel::new(),
            section_changed: EventChannel::new(),
        }
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn section(&self) -> i32 {
        self.section
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Record a scroll offset. Always broadcasts the offset; broadcasts a
    /// section change only when the derived section differs.
    pub fn set_scroll(&mut self, scroll_top: f32) {
        self.scroll_top = scroll_top;
        self.scrolled.emit(scroll_top);
        self.update_section();
    }

    /// Track a new viewport height so section boundaries follow the layout.
    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        self.update_section();
    }

    pub fn on_scroll(&mut self) -> Subscription<f32> {
        self.scrolled.subscribe()
    }

    pub fn on_section_change(&mut self) -> Subscription<SectionChange> {
        self.section_changed.subscribe()
    }

    fn update_section(&mut self) {
        let current = section_for(self.scroll_top, self.viewport_height);
        if current == self.section {
            return;
        }
        let change = SectionChange {
            previous: self.section,
            current,
        };
        self.section = current;
        tracing::debug!(previous = change.previous, current, "section changed");
        self.section_changed.emit(change);
    }
}

/// Section index for a scroll offset.
pub fn section_for(scroll_top: f32, viewport_height: f32) -> i32 {
    if viewport_height <= 0.0 {
        return 0;
    }
    (scroll_top / viewport_height).round() as i32
}
