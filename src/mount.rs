//! Root mount controller - tree lifecycle under the root anchor.
//!
//! `init` resolves the root scope (shadow root if configured, else the
//! main document), finds or creates the `suprsend-root` anchor there,
//! synchronously tears down any tree already occupying it, and mounts
//! the provider tree with both surfaces. `clear` reverses the process.
//!
//! Both operations are idempotent under arbitrary repetition and
//! interleaving with surface lifecycle calls: at any point in time, at
//! most one tree is attached per anchor.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::signal;
use tracing::{debug, info};

use crate::bridge;
use crate::config::{SuprSendOptions, ToastOptions};
use crate::host::arena::{self, NodeId};
use crate::host::{Cleanup, combine, portal};
use crate::provider::provider_tree;
use crate::surfaces::{mount_feed, mount_inbox};
use crate::types::ROOT_ANCHOR_ID;

/// Teardown target for `clear`: names the alternate root the tree was
/// mounted under, when one was used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearTarget {
    pub shadow_root: Option<NodeId>,
}

thread_local! {
    /// Cleanup for the currently-mounted tree, keyed by root anchor.
    static ACTIVE_TREES: RefCell<HashMap<NodeId, Cleanup>> = RefCell::new(HashMap::new());
}

pub(crate) fn init(options: SuprSendOptions) {
    let scope_root = options.shadow_root.unwrap_or_else(arena::body);
    if !arena::exists(scope_root) {
        debug!("configured root container no longer exists; init ignored");
        return;
    }

    // Find or create the root anchor inside the scope.
    let anchor = match arena::get_element_by_id(scope_root, ROOT_ANCHOR_ID) {
        Some(existing) => existing,
        None => {
            let created = arena::create_element("div");
            arena::set_id(created, ROOT_ANCHOR_ID);
            arena::append_child(scope_root, created);
            created
        }
    };

    // Exactly one active tree per anchor: tear down any previous tree
    // synchronously before the new one mounts.
    if let Some(previous) = ACTIVE_TREES.with(|trees| trees.borrow_mut().remove(&anchor)) {
        previous();
    }

    info!("mounting notification surfaces under `{ROOT_ANCHOR_ID}`");

    let toast = signal(options.toast.clone().unwrap_or_default());
    {
        let toast = toast.clone();
        bridge::set_update_toast_config(move |patch: &ToastOptions| {
            toast.set(toast.get().merged(patch));
        });
    }

    let root_config = signal(options);
    let tree = portal(anchor, move || {
        provider_tree(root_config, scope_root, toast, |ctx| {
            combine(vec![mount_inbox(ctx), mount_feed(ctx)])
        })
    });

    ACTIVE_TREES.with(|trees| {
        trees.borrow_mut().insert(
            anchor,
            Box::new(move || {
                tree();
                bridge::clear_toast_slot();
            }),
        );
    });
}

pub(crate) fn clear(target: Option<ClearTarget>) {
    let scope_root = target
        .and_then(|t| t.shadow_root)
        .unwrap_or_else(arena::body);
    let Some(anchor) = arena::get_element_by_id(scope_root, ROOT_ANCHOR_ID) else {
        debug!("no root anchor to clear");
        return;
    };

    if let Some(cleanup) = ACTIVE_TREES.with(|trees| trees.borrow_mut().remove(&anchor)) {
        info!("unmounting notification surfaces");
        cleanup();
    }

    // Mirror the public teardown cascade; harmless no-ops when the
    // surface cleanups already withdrew their slots.
    bridge::clear_inbox();
    bridge::clear_feed();
    bridge::set_client(None);
}

/// Drop tree bookkeeping without running cleanups. Test helper.
pub fn reset_mount_state() {
    ACTIVE_TREES.with(|trees| trees.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
