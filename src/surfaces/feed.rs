//! Feed surface - full-page notification feed portaled into
//! `suprsend-feed`.
//!
//! Unlike the inbox, the feed establishes its own data scope around the
//! rendered list: host, page size, store selection and tenant are
//! consumed by the scope boundary, not forwarded to the list. With
//! `hideFeed` set the boundary (and its subscriptions) stays mounted
//! while the visual list is suppressed - "data flowing, UI hidden" as
//! opposed to a teardown.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use spark_signals::{Signal, effect, signal};
use tracing::debug;

use crate::bridge;
use crate::client::ClientHandle;
use crate::config::{FeedOptions, ToastOptions};
use crate::header::{HeaderProps, header_right};
use crate::host::arena;
use crate::host::{Cleanup, noop_cleanup, portal, show};
use crate::provider::ProviderContext;
use crate::toast::toast_renderer;
use crate::types::FEED_ANCHOR_ID;

/// Mount the feed surface.
pub(crate) fn mount_feed(ctx: &ProviderContext) -> Cleanup {
    // Anchor lookup happens once; an anchor added later is not
    // retroactively discovered.
    let Some(anchor) = arena::get_element_by_id(ctx.scope_root, FEED_ANCHOR_ID) else {
        debug!("`{FEED_ANCHOR_ID}` anchor not found; feed surface disabled");
        return noop_cleanup();
    };

    let visible = signal(true);
    let config: Signal<FeedOptions> = signal(ctx.options.feed.clone().unwrap_or_default());

    {
        let config = config.clone();
        bridge::set_update_feed_config(move |patch: &FeedOptions| {
            config.set(config.get().merged(patch));
        });
    }
    {
        let visible = visible.clone();
        bridge::set_clear_feed_internally(move || {
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
            move || render_feed(&client, &config_render, &toast_config),
        )
    });

    Box::new(move || {
        body();
        bridge::clear_feed_slots();
    })
}

/// Data-scope props consumed by the boundary.
fn scope_props(config: &FeedOptions) -> Value {
    json!({
        "host": config.host,
        "pageSize": config.page_size,
        "stores": config.stores,
        "tenantId": config.tenant_id,
    })
}

/// Forwarded list props: local configuration minus the data-scope
/// fields and the bridge-consumed ones.
fn forwarded_props(config: &FeedOptions) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.remove("host");
        map.remove("pageSize");
        map.remove("stores");
        map.remove("tenantId");
        map.remove("hideToast");
        map.remove("hideFeed");
        map.remove("headerIconUrl");
    }
    value
}

fn render_feed(
    client: &ClientHandle,
    config: &Signal<FeedOptions>,
    toast_config: &Signal<ToastOptions>,
) -> Cleanup {
    let boundary = arena::create_element("feed-provider");

    // Data-scope props follow the local configuration.
    let stop_scope = {
        let config = config.clone();
        effect(move || {
            arena::set_props(boundary, scope_props(&config.get()));
        })
    };

    // The visual list is suppressed by hideFeed while the boundary
    // stays mounted.
    let list_cleanup = {
        let config_cond = config.clone();
        let config_list = config.clone();
        let client = client.clone();
        portal(boundary, move || {
            show(
                move || !config_cond.get().hide_feed(),
                move || render_feed_list(&client, &config_list),
            )
        })
    };

    let toast_cleanup = {
        let config = config.clone();
        let client = client.clone();
        let toast_config = toast_config.clone();
        portal(boundary, move || {
            show(
                move || !config.get().hide_toast(),
                move || toast_renderer(Some(&client), toast_config.clone()),
            )
        })
    };

    Box::new(move || {
        toast_cleanup();
        list_cleanup();
        stop_scope();
        arena::remove_subtree(boundary);
    })
}

fn render_feed_list(client: &ClientHandle, config: &Signal<FeedOptions>) -> Cleanup {
    let list = arena::create_element("notification-feed");

    let stop_props = {
        let config = config.clone();
        effect(move || {
            arena::set_props(list, forwarded_props(&config.get()));
        })
    };

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
            let cleanup = portal(list, || {
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

    let header_slot_cleanup = header_slot;
    Box::new(move || {
        stop_header();
        stop_props();
        if let Some(prev) = header_slot_cleanup.borrow_mut().take() {
            prev();
        }
        arena::remove_subtree(list);
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use spark_signals::signal;

    use super::*;
    use crate::client::Client;
    use crate::config::{FeedStore, SuprSendOptions};
    use crate::host::arena::{
        append_child, body, children_of, create_element, reset_host_state, set_id, tag_of,
    };
    use crate::i18n;

    fn reset_all() {
        reset_host_state();
        bridge::reset_bridge_state();
        i18n::reset_i18n_state();
    }

    fn anchored_ctx(feed: Option<FeedOptions>) -> (usize, ProviderContext) {
        let root = body();
        let anchor = create_element("div");
        set_id(anchor, FEED_ANCHOR_ID);
        append_child(root, anchor);

        let options = SuprSendOptions {
            feed,
            ..Default::default()
        };
        let ctx = ProviderContext {
            scope_root: root,
            client: Client::from_options(&options),
            options,
            toast: signal(ToastOptions::default()),
        };
        (anchor, ctx)
    }

    fn find_descendant(parent: usize, tag: &str) -> Option<usize> {
        for child in children_of(parent) {
            if tag_of(child).as_deref() == Some(tag) {
                return Some(child);
            }
            if let Some(found) = find_descendant(child, tag) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn test_clear_feed_before_mount_is_noop() {
        reset_all();
        bridge::clear_feed();
    }

    #[test]
    fn test_data_scope_fields_go_to_boundary_not_list() {
        reset_all();
        let (anchor, ctx) = anchored_ctx(Some(FeedOptions {
            host: Some("https://hub.example.com".into()),
            page_size: Some(25),
            tenant_id: Some("acme".into()),
            stores: Some(vec![FeedStore {
                store_id: "transactional".into(),
                label: Some("Transactional".into()),
                query: None,
            }]),
            ..Default::default()
        }));
        let cleanup = mount_feed(&ctx);

        let boundary = find_descendant(anchor, "feed-provider").unwrap();
        let scope = arena::props_of(boundary).unwrap();
        assert_eq!(scope["pageSize"], 25);
        assert_eq!(scope["tenantId"], "acme");
        assert_eq!(scope["stores"][0]["storeId"], "transactional");

        let list = find_descendant(anchor, "notification-feed").unwrap();
        let props = arena::props_of(list).unwrap();
        assert!(props.get("pageSize").is_none());
        assert!(props.get("tenantId").is_none());
        assert!(props.get("stores").is_none());
        assert!(props.get("host").is_none());
        cleanup();
    }

    #[test]
    fn test_hide_feed_keeps_boundary_without_list() {
        reset_all();
        let (anchor, ctx) = anchored_ctx(Some(FeedOptions {
            hide_feed: Some(true),
            ..Default::default()
        }));
        let cleanup = mount_feed(&ctx);

        assert!(find_descendant(anchor, "feed-provider").is_some());
        assert!(find_descendant(anchor, "notification-feed").is_none());
        // The embedded toast renderer is independent of hideFeed.
        assert!(find_descendant(anchor, "toaster").is_some());
        cleanup();
    }

    #[test]
    fn test_clear_feed_after_mount_hides_surface() {
        reset_all();
        let (anchor, ctx) = anchored_ctx(None);
        let cleanup = mount_feed(&ctx);
        assert!(!children_of(anchor).is_empty());

        bridge::clear_feed();
        assert!(children_of(anchor).is_empty());
        cleanup();
    }

    #[test]
    fn test_update_feed_config_merges_shallowly() {
        reset_all();
        let (anchor, ctx) = anchored_ctx(Some(FeedOptions {
            page_size: Some(10),
            tenant_id: Some("acme".into()),
            ..Default::default()
        }));
        let cleanup = mount_feed(&ctx);
        let boundary = find_descendant(anchor, "feed-provider").unwrap();

        bridge::update_feed_config(&FeedOptions {
            page_size: Some(50),
            ..Default::default()
        });

        let scope = arena::props_of(boundary).unwrap();
        assert_eq!(scope["pageSize"], 50);
        assert_eq!(scope["tenantId"], "acme");
        cleanup();
    }

    #[test]
    fn test_hiding_feed_at_runtime_preserves_boundary() {
        reset_all();
        let (anchor, ctx) = anchored_ctx(None);
        let cleanup = mount_feed(&ctx);
        assert!(find_descendant(anchor, "notification-feed").is_some());

        bridge::update_feed_config(&FeedOptions {
            hide_feed: Some(true),
            ..Default::default()
        });
        assert!(find_descendant(anchor, "notification-feed").is_none());
        assert!(find_descendant(anchor, "feed-provider").is_some());
        cleanup();
    }

    #[test]
    fn test_absent_anchor_disables_surface() {
        reset_all();
        let root = body();
        let options = SuprSendOptions::default();
        let ctx = ProviderContext {
            scope_root: root,
            client: Client::from_options(&options),
            options,
            toast: signal(ToastOptions::default()),
        };
        let cleanup = mount_feed(&ctx);
        assert!(children_of(root).is_empty());
        cleanup();

        // Slots were never registered: updates stay silent no-ops.
        bridge::update_feed_config(&FeedOptions::default());
        bridge::clear_feed();
    }
}
