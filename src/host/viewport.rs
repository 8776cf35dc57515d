//! Viewport dimensions reported by the host.
//!
//! Plain cells, not signals: the toast position default is evaluated
//! once at render time from the current width and must NOT re-resolve
//! on resize.

use std::cell::Cell;

/// Width assumed until the host reports a real size.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

/// Height assumed until the host reports a real size.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 768;

thread_local! {
    static VIEWPORT: Cell<(u32, u32)> =
        const { Cell::new((DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)) };
}

/// Record the host viewport size.
pub fn set_viewport_size(width: u32, height: u32) {
    VIEWPORT.with(|v| v.set((width, height)));
}

/// Current viewport width.
pub fn viewport_width() -> u32 {
    VIEWPORT.with(|v| v.get().0)
}

/// Current viewport height.
pub fn viewport_height() -> u32 {
    VIEWPORT.with(|v| v.get().1)
}

/// Restore the default size. Test helper.
pub fn reset_viewport_state() {
    VIEWPORT.with(|v| v.set((DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_defaults_wide() {
        reset_viewport_state();
        assert_eq!(viewport_width(), 1024);
        assert_eq!(viewport_height(), 768);
    }

    #[test]
    fn test_set_viewport_size() {
        reset_viewport_state();
        set_viewport_size(300, 600);
        assert_eq!(viewport_width(), 300);
        assert_eq!(viewport_height(), 600);
    }
}
