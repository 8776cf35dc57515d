//! Conditional rendering driven by a reactive condition.
//!
//! `show()` bridges a boolean getter to subtree lifecycle: when the
//! condition flips true the render closure runs (under the parent
//! context captured at creation), when it flips false the produced
//! cleanup runs. The surfaces use this for their visibility flags and
//! for per-surface toast suppression.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose};

use super::arena;
use super::Cleanup;

/// Render a subtree while `condition` holds.
///
/// The condition getter establishes a reactive dependency; the subtree
/// is created and destroyed as it changes. Returns a cleanup that
/// destroys the current subtree and stops tracking.
pub fn show<F>(condition: impl Fn() -> bool + 'static, render: F) -> Cleanup
where
    F: Fn() -> Cleanup + 'static,
{
    // Capture the container at creation time so re-renders land in the
    // same place regardless of what context is active when the
    // condition later flips.
    let parent = arena::current_parent();

    let active: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
    let was_true: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let scope = effect_scope(false);

    let active_for_update = active.clone();
    let active_for_dispose = active.clone();

    let update = move |now: bool| {
        if was_true.get() == Some(now) {
            return;
        }
        was_true.set(Some(now));

        if let Some(prev) = active_for_update.borrow_mut().take() {
            prev();
        }
        if !now {
            return;
        }

        if let Some(parent) = parent {
            arena::push_parent_context(parent);
        }
        let cleanup = render();
        if parent.is_some() {
            arena::pop_parent_context();
        }
        *active_for_update.borrow_mut() = Some(cleanup);
    };

    scope.run(move || {
        // The effect reads the condition to establish the dependency;
        // it is registered with the scope and dies with it.
        let _effect = effect(move || {
            update(condition());
        });

        on_scope_dispose(move || {
            if let Some(cleanup) = active_for_dispose.borrow_mut().take() {
                cleanup();
            }
        });
    });

    Box::new(move || scope.stop())
}
