use folio_common::{EventChannel, Subscription};

/// Announcement of a theme request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeRequest {
    /// The override was held, so nothing has been committed yet.
    pub deferred: bool,
}

/// Process-wide dark/light flag with a two-phase toggle.
///
/// A *request* is a soft "please swap when convenient" signal. A *commit*
/// flips the flag and is broadcast to every theme-reactive component. While
/// an override holder (an on-screen animation that wants to time the flip)
/// has claimed the controller, requests are only announced; otherwise the
/// controller commits them immediately.
///
/// A deferred request is owed exactly one commit: whoever drains it either
/// times the swap or, if it no longer holds the override, swaps at once.
#[derive(Debug)]
pub struct ThemeController {
    dark: bool,
    overridden: bool,
    requested: EventChannel<ThemeRequest>,
    committed: EventChannel<bool>,
}

impl ThemeController {
    pub fn new(dark: bool) -> Self {
        Self {
            dark,
            overridden: false,
            requested: EventChannel::new(),
            committed: EventChannel::new(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Set the flag without broadcasting (initial configuration only).
    pub fn set_theme(&mut self, dark: bool) {
        self.dark = dark;
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Claim or release commit timing for theme requests.
    pub fn override_behaviour(&mut self, overridden: bool) {
        if self.overridden != overridden {
            tracing::debug!(overridden, "theme override changed");
        }
        self.overridden = overridden;
    }

    /// Ask for a theme swap.
    pub fn request_change(&mut self) {
        tracing::debug!(overridden = self.overridden, "theme change requested");
        self.requested.emit(ThemeRequest {
            deferred: self.overridden,
        });
        if !self.overridden {
            self.swap_theme();
        }
    }

    /// Flip the flag and broadcast the new value.
    pub fn swap_theme(&mut self) {
        self.dark = !self.dark;
        tracing::info!(dark = self.dark, "theme committed");
        self.committed.emit(self.dark);
    }

    /// React to the host's color-scheme preference. Only a preference that
    /// differs from the current flag produces a request.
    pub fn on_color_scheme_changed(&mut self, prefers_dark: bool) {
        if prefers_dark != self.dark {
            self.request_change();
        }
    }

    pub fn on_change_requested(&mut self) -> Subscription<ThemeRequest> {
        self.requested.subscribe()
    }

    pub fn on_change_committed(&mut self) -> Subscription<bool> {
        self.committed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_override_commits_immediately() {
        let mut theme = ThemeController::new(false);
        let requests = theme.on_change_requested();
        let commits = theme.on_change_committed();
        theme.request_change();
        assert_eq!(requests.drain(), vec![ThemeRequest { deferred: false }]);
        assert_eq!(commits.drain(), vec![true]);
        assert!(theme.is_dark());
    }

    #[test]
    fn request_with_override_is_only_announced() {
        let mut theme = ThemeController::new(false);
        let requests = theme.on_change_requested();
        let commits = theme.on_change_committed();
        theme.override_behaviour(true);
        theme.request_change();
        assert_eq!(requests.drain(), vec![ThemeRequest { deferred: true }]);
        assert!(commits.drain().is_empty());
        assert!(!theme.is_dark());

        theme.swap_theme();
        assert_eq!(commits.drain(), vec![true]);
    }

    #[test]
    fn matching_color_scheme_is_ignored() {
        let mut theme = ThemeController::new(true);
        let requests = theme.on_change_requested();
        theme.on_color_scheme_changed(true);
        assert!(requests.drain().is_empty());
        theme.on_color_scheme_changed(false);
        assert_eq!(requests.drain().len(), 1);
        assert!(!theme.is_dark());
    }
}
