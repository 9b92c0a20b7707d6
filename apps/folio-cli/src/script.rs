//! Scripted page input for headless runs.
//!
//! A script is a list of steps, each firing one page event on a given frame:
//!
//! ```yaml
//! - { frame: 30, action: pointer, x: 1300, y: 400 }
//! - { frame: 90, action: toggle_theme }
//! - { frame: 200, action: scroll, to: 1080 }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use folio_input::PageEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Scroll { to: f32 },
    Pointer { x: f32, y: f32 },
    Click,
    ToggleTheme,
    ColorScheme { dark: bool },
    Hide,
    Show,
    Resize { width: f32, height: f32 },
}

impl Action {
    pub fn to_event(self) -> PageEvent {
        match self {
            Action::Scroll { to } => PageEvent::Scrolled { scroll_top: to },
            Action::Pointer { x, y } => PageEvent::PointerMoved { x, y },
            Action::Click => PageEvent::PointerClicked,
            Action::ToggleTheme => PageEvent::ThemeToggled,
            Action::ColorScheme { dark } => PageEvent::ColorSchemeChanged { prefers_dark: dark },
            Action::Hide => PageEvent::VisibilityChanged { visible: false },
            Action::Show => PageEvent::VisibilityChanged { visible: true },
            Action::Resize { width, height } => PageEvent::Resized {
                width,
                height,
                pixel_ratio: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub frame: u32,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new(mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.frame);
        Self { steps }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
        let steps = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        Ok(Self::new(steps))
    }

    /// A visit to every page: greet the character, switch the theme, hover
    /// the logos, and end on the study. Pointer coordinates assume a
    /// 1920x1080 viewport.
    pub fn tour(viewport_height: f32) -> Self {
        let page = |n: f32| n * viewport_height;
        Self::new(vec![
            step(30, Action::Pointer { x: 1400.0, y: 380.0 }),
            step(150, Action::ToggleTheme),
            step(240, Action::Scroll { to: page(0.5) }),
            step(260, Action::Scroll { to: page(1.0) }),
            step(280, Action::Pointer { x: 1050.0, y: 520.0 }),
            step(300, Action::Click),
            step(320, Action::Pointer { x: 200.0, y: 900.0 }),
            step(340, Action::ToggleTheme),
            step(360, Action::Scroll { to: page(2.0) }),
        ])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn last_frame(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.frame)
    }

    /// Events scheduled on `frame`, in script order.
    pub fn events_at(&self, frame: u32) -> impl Iterator<Item = PageEvent> + '_ {
        self.steps
            .iter()
            .filter(move |s| s.frame == frame)
            .map(|s| s.action.to_event())
    }
}

fn step(frame: u32, action: Action) -> Step {
    Step { frame, action }
}
