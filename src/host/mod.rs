//! Host tree abstraction - elements, viewport, events, portals.
//!
//! The framework-facing layer the rest of the crate renders through:
//!
//! - **arena** - Externally-owned element tree (nodes, ids, flags, props)
//! - **viewport** - Host-reported dimensions (non-reactive by design)
//! - **events** - Click dispatch with bubbling and consume semantics
//! - **control_flow** - `show()` conditional rendering

pub mod arena;
pub mod control_flow;
pub mod events;
pub mod viewport;

pub use arena::{NodeFlags, NodeId};
pub use control_flow::show;
pub use events::click;
pub use viewport::{set_viewport_size, viewport_height, viewport_width};

/// Cleanup function returned by render operations.
///
/// Call it to unmount what the operation created and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing. Used where a surface degrades to
/// "render nothing" (absent anchor, missing client).
pub fn noop_cleanup() -> Cleanup {
    Box::new(|| {})
}

/// Combine cleanups into one, run in order.
pub fn combine(cleanups: Vec<Cleanup>) -> Cleanup {
    Box::new(move || {
        for cleanup in cleanups {
            cleanup();
        }
    })
}

/// Attach a renderable subtree to an arbitrary container node.
///
/// This is the portal operation: the render closure runs with
/// `container` as the active parent context, so elements it creates
/// land under the external container instead of the current subtree.
/// Returns the render closure's cleanup; if the container does not
/// exist, renders nothing.
pub fn portal(container: NodeId, render: impl FnOnce() -> Cleanup) -> Cleanup {
    if !arena::exists(container) {
        return noop_cleanup();
    }
    arena::push_parent_context(container);
    let cleanup = render();
    arena::pop_parent_context();
    cleanup
}
