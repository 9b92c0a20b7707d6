/// Text overlay drawn above the scene by the host page.
pub trait LabelSink {
    fn show(&mut self, text: &str);
    fn hide(&mut self);
}

/// Label sink that keeps the current text for the host to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayLabel {
    text: Option<String>,
}

impl OverlayLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl LabelSink for OverlayLabel {
    fn show(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    fn hide(&mut self) {
        self.text = None;
    }
}
