//! Global bridge - the page-wide registry of entry points and slots.
//!
//! One registry exists per page lifetime. The entry points (`init`,
//! `clear`, `clear_inbox`, `clear_feed`, `boot`) are stable; the
//! mutable slots behind them are populated by whichever component owns
//! the corresponding state once it mounts, and withdrawn on teardown.
//!
//! Calling a slot that nothing has populated is a silent no-op - host
//! pages call these from arbitrary script in arbitrary order, and an
//! update arriving before its surface exists must never be an error.
//! Slot writes are last-write-wins.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::client::ClientHandle;
use crate::config::{
    FeedOptions, InboxOptions, SuprSendConfigPatch, SuprSendOptions, ToastOptions,
};
use crate::error::EmbedError;
use crate::mount::{self, ClearTarget};

// =============================================================================
// Registry
// =============================================================================

#[derive(Default)]
struct Registry {
    /// The one shared client instance, populated by the provider tree.
    client: Option<ClientHandle>,
    refresh_user_token: Option<Rc<dyn Fn(&str)>>,
    update_suprsend_config: Option<Rc<dyn Fn(&SuprSendConfigPatch)>>,
    update_inbox_config: Option<Rc<dyn Fn(&InboxOptions)>>,
    update_feed_config: Option<Rc<dyn Fn(&FeedOptions)>>,
    update_toast_config: Option<Rc<dyn Fn(&ToastOptions)>>,
    clear_inbox_internally: Option<Rc<dyn Fn()>>,
    clear_feed_internally: Option<Rc<dyn Fn()>>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

// =============================================================================
// Entry points
// =============================================================================

/// Script-load entry: parse the page-level config payload and mount
/// unless `initOnLoad` opts out.
pub fn boot(payload: &str) -> Result<(), EmbedError> {
    let options = SuprSendOptions::from_json(payload)?;
    if options.init_on_load() {
        init(options);
    } else {
        debug!("initOnLoad is false; waiting for an explicit init call");
    }
    Ok(())
}

/// Mount (or remount) the full render tree.
pub fn init(options: SuprSendOptions) {
    mount::init(options);
}

/// Tear down the full render tree and drop the shared client.
pub fn clear(target: Option<ClearTarget>) {
    mount::clear(target);
}

/// Hide the inbox surface via its internally-registered teardown.
pub fn clear_inbox() {
    let slot = with_registry(|r| r.clear_inbox_internally.clone());
    match slot {
        Some(f) => f(),
        None => debug!("clearInbox called before the inbox surface mounted; ignoring"),
    }
}

/// Hide the feed surface via its internally-registered teardown.
pub fn clear_feed() {
    let slot = with_registry(|r| r.clear_feed_internally.clone());
    match slot {
        Some(f) => f(),
        None => debug!("clearFeed called before the feed surface mounted; ignoring"),
    }
}

// =============================================================================
// Update slots
// =============================================================================

/// Push a fresh auth token into the live configuration.
pub fn refresh_user_token(token: &str) {
    let slot = with_registry(|r| r.refresh_user_token.clone());
    match slot {
        Some(f) => f(token),
        None => debug!("refreshUserToken called before the provider mounted; ignoring"),
    }
}

/// Merge top-level identity/locale fields into the live configuration.
pub fn update_suprsend_config(patch: &SuprSendConfigPatch) {
    let slot = with_registry(|r| r.update_suprsend_config.clone());
    match slot {
        Some(f) => f(patch),
        None => debug!("updateSuprSendConfig called before the provider mounted; ignoring"),
    }
}

/// Shallow-merge into the inbox surface's local configuration.
pub fn update_inbox_config(patch: &InboxOptions) {
    let slot = with_registry(|r| r.update_inbox_config.clone());
    match slot {
        Some(f) => f(patch),
        None => debug!("updateInboxConfig called before the inbox surface mounted; ignoring"),
    }
}

/// Shallow-merge into the feed surface's local configuration.
pub fn update_feed_config(patch: &FeedOptions) {
    let slot = with_registry(|r| r.update_feed_config.clone());
    match slot {
        Some(f) => f(patch),
        None => debug!("updateFeedConfig called before the feed surface mounted; ignoring"),
    }
}

/// Shallow-merge into the toast configuration.
pub fn update_toast_config(patch: &ToastOptions) {
    let slot = with_registry(|r| r.update_toast_config.clone());
    match slot {
        Some(f) => f(patch),
        None => debug!("updateToastConfig called before the tree mounted; ignoring"),
    }
}

// =============================================================================
// Client handle
// =============================================================================

/// The shared client instance, if a tree has mounted one.
pub fn client() -> Option<ClientHandle> {
    with_registry(|r| r.client.clone())
}

pub(crate) fn set_client(client: Option<ClientHandle>) {
    with_registry(|r| r.client = client);
}

// =============================================================================
// Slot wiring (crate-internal)
// =============================================================================

pub(crate) fn set_refresh_user_token(f: impl Fn(&str) + 'static) {
    with_registry(|r| r.refresh_user_token = Some(Rc::new(f)));
}

pub(crate) fn set_update_suprsend_config(f: impl Fn(&SuprSendConfigPatch) + 'static) {
    with_registry(|r| r.update_suprsend_config = Some(Rc::new(f)));
}

pub(crate) fn set_update_inbox_config(f: impl Fn(&InboxOptions) + 'static) {
    with_registry(|r| r.update_inbox_config = Some(Rc::new(f)));
}

pub(crate) fn set_update_feed_config(f: impl Fn(&FeedOptions) + 'static) {
    with_registry(|r| r.update_feed_config = Some(Rc::new(f)));
}

pub(crate) fn set_update_toast_config(f: impl Fn(&ToastOptions) + 'static) {
    with_registry(|r| r.update_toast_config = Some(Rc::new(f)));
}

pub(crate) fn set_clear_inbox_internally(f: impl Fn() + 'static) {
    with_registry(|r| r.clear_inbox_internally = Some(Rc::new(f)));
}

pub(crate) fn set_clear_feed_internally(f: impl Fn() + 'static) {
    with_registry(|r| r.clear_feed_internally = Some(Rc::new(f)));
}

pub(crate) fn clear_provider_slots() {
    with_registry(|r| {
        r.refresh_user_token = None;
        r.update_suprsend_config = None;
    });
}

pub(crate) fn clear_inbox_slots() {
    with_registry(|r| {
        r.update_inbox_config = None;
        r.clear_inbox_internally = None;
    });
}

pub(crate) fn clear_feed_slots() {
    with_registry(|r| {
        r.update_feed_config = None;
        r.clear_feed_internally = None;
    });
}

pub(crate) fn clear_toast_slot() {
    with_registry(|r| r.update_toast_config = None);
}

/// Reset the whole registry. Test helper.
pub fn reset_bridge_state() {
    with_registry(|r| *r = Registry::default());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_unregistered_slots_are_silent_noops() {
        reset_bridge_state();
        // None of these may panic before anything has mounted.
        refresh_user_token("token");
        update_suprsend_config(&SuprSendConfigPatch::default());
        update_inbox_config(&InboxOptions::default());
        update_feed_config(&FeedOptions::default());
        update_toast_config(&ToastOptions::default());
        clear_inbox();
        clear_feed();
    }

    #[test]
    fn test_registered_slot_receives_calls() {
        reset_bridge_state();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_slot = seen.clone();
        set_update_inbox_config(move |patch: &InboxOptions| {
            seen_slot.borrow_mut().push(patch.page_size);
        });

        update_inbox_config(&InboxOptions {
            page_size: Some(20),
            ..Default::default()
        });
        assert_eq!(*seen.borrow(), vec![Some(20)]);
        reset_bridge_state();
    }

    #[test]
    fn test_slot_writes_are_last_write_wins() {
        reset_bridge_state();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_first = seen.clone();
        set_clear_inbox_internally(move || seen_first.borrow_mut().push("first"));
        let seen_second = seen.clone();
        set_clear_inbox_internally(move || seen_second.borrow_mut().push("second"));

        clear_inbox();
        assert_eq!(*seen.borrow(), vec!["second"]);
        reset_bridge_state();
    }

    #[test]
    fn test_withdrawn_slot_is_a_noop_again() {
        reset_bridge_state();
        set_clear_feed_internally(|| panic!("slot should have been withdrawn"));
        clear_feed_slots();
        clear_feed();
        reset_bridge_state();
    }
}
