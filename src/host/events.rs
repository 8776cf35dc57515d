//! Click dispatch over the host tree.
//!
//! Events start at the clicked node and bubble upward through its
//! ancestors. A handler returning true consumes the event, stopping
//! propagation; the header component relies on this so its actions do
//! not also toggle the popover they live inside.

use super::arena;
use super::arena::NodeId;

/// Dispatch a click starting at `target`, bubbling to the root.
///
/// Returns true if any handler consumed the event.
pub fn click(target: NodeId) -> bool {
    let mut current = Some(target);
    while let Some(index) = current {
        // Clone the handler out so dispatch never holds an arena borrow.
        if let Some(handler) = arena::click_handler_of(index) {
            if handler() {
                return true;
            }
        }
        current = arena::parent_of(index);
    }
    false
}
