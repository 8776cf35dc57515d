//! Inbox surface - bell popover portaled into `suprsend-inbox`.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use spark_signals::{Signal, effect, signal};
use tracing::debug;

use crate::bridge;
use crate::client::ClientHandle;
use crate::config::{InboxOptions, ToastOptions};
use crate::header::{HeaderProps, header_right};
use crate::host::arena;
use crate::host::{Cleanup, noop_cleanup, portal, show};
use crate::provider::ProviderContext;
use crate::toast::toast_renderer;
use crate::types::INBOX_ANCHOR_ID;

/// Mount the inbox surface.
///
/// Publishes its update/teardown callbacks into the bridge, then
/// renders while visible. The visibility flag starts true and a
/// teardown call flips it false for good - only a full remount brings
/// the surface back.
pub(crate) fn mount_inbox(ctx: &ProviderContext) -> Cleanup {
    // Anchor lookup happens once; an anchor added later is not
    // retroactively discovered.
    let Some(anchor) = arena::get_element_by_id(ctx.scope_root, INBOX_ANCHOR_ID) else {
        debug!("`{INBOX_ANCHOR_ID}` anchor not found; inbox surface disabled");
        return noop_cleanup();
    };

    let visible = signal(true);
    let config: Signal<InboxOptions> = signal(ctx.options.inbox.clone().unwrap_or_default());

    {
        let config = config.clone();
        bridge::set_update_inbox_config(move |patch: &InboxOptions| {
            config.set(config.get().merged(patch));
        });
    }
    {
        let visible = visible.clone();
        bridge::set_clear_inbox_internally(move || {
            visible.set(false);
        });
    }

    let client = ctx.client.clone();
    let toast_config = ctx.toast.clone();
    let visible_read = visible.clone();
    let config_render = config.clone();
    let body = portal(anchor, move || {
        show(
            move || visible_read.get(),
            move || render_inbox(&client, &config_render, &toast_config),
        )
    });

    Box::new(move || {
        body();
        bridge::clear_inbox_slots();
    })
}

/// Forwarded popover props: the local configuration minus the fields
/// the surface consumes itself (toast suppression, header icon).
fn forwarded_props(config: &InboxOptions) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.remove("hideToast");
        map.remove("headerIconUrl");
    }
    value
}

fn render_inbox(
    client: &ClientHandle,
    config: &Signal<InboxOptions>,
    toast_config: &Signal<ToastOptions>,
) -> Cleanup {
    let popover = arena::create_element("inbox-popover");

    // Forwarded props follow the local configuration.
    let stop_props = {
        let config = config.clone();
        effect(move || {
            arena::set_props(popover, forwarded_props(&config.get()));
        })
    };

    // The custom header re-renders when its inputs change.
    let header_slot: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
    let stop_header = {
        let config = config.clone();
        let client = client.clone();
        let header_slot = header_slot.clone();
        effect(move || {
            let cfg = config.get();
            if let Some(prev) = header_slot.borrow_mut().take() {
                prev();
            }
            let mark_client = client.clone();
            let cleanup = portal(popover, || {
                header_right(HeaderProps {
                    mark_all_read: Rc::new(move || mark_client.mark_all_read()),
                    header_icon_url: cfg.header_icon_url.clone(),
                    header_icon_click_handler: cfg.header_icon_click_handler.clone(),
                    theme: cfg.theme.as_ref().and_then(|t| t.header.clone()),
                })
            });
            *header_slot.borrow_mut() = Some(cleanup);
        })
    };

    // Embedded toast renderer unless the surface suppresses it.
    let toast_cleanup = {
        let config = config.clone();
        let client = client.clone();
        let toast_config = toast_config.clone();
        portal(popover, move || {
            show(
                move || !config.get().hide_toast(),
                move || toast_renderer(Some(&client), toast_config.clone()),
            )
        })
    };

    let header_slot_cleanup = header_slot;
    Box::new(move || {
        toast_cleanup();
        stop_header();
        stop_props();
        if let Some(prev) = header_slot_cleanup.borrow_mut().take() {
            prev();
        }
        arena::remove_subtree(popover);
    })
}

// =============================================================================
// Tests
// =============================================================================
