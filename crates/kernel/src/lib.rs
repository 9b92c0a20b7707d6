//! Page services: the framework-independent state every scene component reads.
//!
//! Each service is constructed once by the composition root and handed out
//! by reference. Consumers observe changes through [`folio_common::EventChannel`]
//! subscriptions; only the owning service mutates its state.
//!
//! # Invariants
//! - Every mutation is followed by a broadcast on the matching channel.
//! - No service reads another service; coupling happens in the composition root.

pub mod clock;
pub mod scroll;
pub mod sizes;
pub mod theme;

pub use clock::{Clock, FrameTime, NOMINAL_FRAME};
pub use scroll::{ScrollTracker, SectionChange};
pub use sizes::{MAX_PIXEL_RATIO, SizeTracker};
pub use theme::{ThemeController, ThemeRequest};

pub fn crate_info() -> &'static str {
    "folio-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
