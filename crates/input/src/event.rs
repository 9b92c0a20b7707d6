/// An input the scene runtime consumes from its host.
///
/// Desktop and headless hosts both produce these; the runtime never reads
/// raw window-system events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Viewport changed size (logical pixels) or pixel density.
    Resized {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },
    /// Page scrolled to the given offset from the top, in logical pixels.
    Scrolled { scroll_top: f32 },
    /// Cursor moved, in logical pixels from the top-left corner.
    PointerMoved { x: f32, y: f32 },
    /// Primary button clicked at the current cursor position.
    PointerClicked,
    /// Page became visible or hidden.
    VisibilityChanged { visible: bool },
    /// Host color-scheme preference changed.
    ColorSchemeChanged { prefers_dark: bool },
    /// The theme toggle in the page chrome was pressed.
    ThemeToggled,
}

impl PageEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Resized { .. } => "resized",
            PageEvent::Scrolled { .. } => "scrolled",
            PageEvent::PointerMoved { .. } => "pointer_moved",
            PageEvent::PointerClicked => "pointer_clicked",
            PageEvent::VisibilityChanged { .. } => "visibility_changed",
            PageEvent::ColorSchemeChanged { .. } => "color_scheme_changed",
            PageEvent::ThemeToggled => "theme_toggled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kinds_are_distinct() {
        let events = [
            PageEvent::Resized {
                width: 1.0,
                height: 1.0,
                pixel_ratio: 1.0,
            },
            PageEvent::Scrolled { scroll_top: 0.0 },
            PageEvent::PointerMoved { x: 0.0, y: 0.0 },
            PageEvent::PointerClicked,
            PageEvent::VisibilityChanged { visible: true },
            PageEvent::ColorSchemeChanged { prefers_dark: true },
            PageEvent::ThemeToggled,
        ];
        let mut kinds: Vec<_> = events.iter().map(PageEvent::kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), events.len());
    }
}
