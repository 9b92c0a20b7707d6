//! Page input: host window events mapped onto the events a web page would see.
//!
//! # Invariants
//! - Each host event maps to at most one [`PageEvent`].
//! - Scroll offsets produced by [`WheelScroller`] stay within the page extent.

pub mod event;
pub mod wheel;

pub use event::PageEvent;
pub use wheel::WheelScroller;

pub fn crate_info() -> &'static str {
    "folio-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
