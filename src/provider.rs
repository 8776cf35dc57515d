//! Provider tree - client/auth context, i18n context, style isolation.
//!
//! Wraps the surfaces with everything they consume: the shared client
//! (created on first mount, reconfigured in place on every later one),
//! the translation provider, and a style isolation boundary when the
//! tree is hosted inside a shadow root.
//!
//! Identity and locale follow the live configuration reactively; a
//! `refreshUserToken` or `updateSuprSendConfig` call re-renders
//! downstream consumers without a root remount.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Signal, effect};

use crate::bridge;
use crate::client::{Client, ClientHandle};
use crate::config::{SuprSendConfigPatch, SuprSendOptions, ToastOptions};
use crate::host::arena::{self, NodeFlags, NodeId};
use crate::host::{Cleanup, portal};
use crate::i18n::{self, I18n};

/// Everything the provider exposes to descendant surfaces.
pub(crate) struct ProviderContext {
    /// Root scope the surfaces resolve their anchors against.
    pub scope_root: NodeId,
    /// The shared client instance.
    pub client: ClientHandle,
    /// Configuration snapshot taken at mount; surfaces seed their
    /// locally-managed state from it.
    pub options: SuprSendOptions,
    /// Toast configuration shared by both surfaces' embedded renderers.
    pub toast: Signal<ToastOptions>,
}

/// Mount the provider tree under the current parent context.
pub(crate) fn provider_tree(
    root_config: Signal<SuprSendOptions>,
    scope_root: NodeId,
    toast: Signal<ToastOptions>,
    children: impl FnOnce(&ProviderContext) -> Cleanup,
) -> Cleanup {
    let options = root_config.get();

    // Single logical client per page lifetime: reuse the existing
    // instance and mutate it in place so every holder keeps observing
    // the same identity.
    let client = match bridge::client() {
        Some(existing) => {
            existing.reconfigure(&options);
            existing
        }
        None => {
            let fresh = Client::from_options(&options);
            bridge::set_client(Some(fresh.clone()));
            fresh
        }
    };

    // Wrapper under the root anchor; doubles as the style isolation
    // boundary when hosted inside a shadow root so injected styles
    // stay scoped to it.
    let wrapper = arena::create_element("suprsend-provider");
    if arena::flags_of(scope_root).contains(NodeFlags::SHADOW_ROOT) {
        arena::add_flags(wrapper, NodeFlags::STYLE_BOUNDARY);
    }

    // Keep client identity and the i18n provider in sync with the live
    // configuration. The i18n bundles are rebuilt only when
    // locale-relevant fields actually change.
    type LocaleState = (Option<String>, HashMap<String, String>);
    let last_locale: Rc<RefCell<Option<LocaleState>>> = Rc::new(RefCell::new(None));
    let client_for_sync = client.clone();
    let config_for_sync = root_config.clone();
    let stop_sync = effect(move || {
        let opts = config_for_sync.get();
        client_for_sync.reconfigure(&opts);

        let state = (opts.locale.clone(), opts.translations.clone());
        let changed = last_locale.borrow().as_ref() != Some(&state);
        if changed {
            i18n::set_current(Some(Rc::new(I18n::new(
                opts.locale.as_deref(),
                &opts.translations,
            ))));
            *last_locale.borrow_mut() = Some(state);
        }
    });

    // Provider-owned bridge slots.
    {
        let config = root_config.clone();
        bridge::set_refresh_user_token(move |token: &str| {
            let patch = SuprSendConfigPatch {
                user_token: Some(token.to_string()),
                ..Default::default()
            };
            config.set(config.get().merged_top_level(&patch));
        });
    }
    {
        let config = root_config.clone();
        bridge::set_update_suprsend_config(move |patch: &SuprSendConfigPatch| {
            config.set(config.get().merged_top_level(patch));
        });
    }

    let ctx = ProviderContext {
        scope_root,
        client,
        options,
        toast,
    };
    let children_cleanup = portal(wrapper, || children(&ctx));

    Box::new(move || {
        children_cleanup();
        stop_sync();
        bridge::clear_provider_slots();
        i18n::set_current(None);
        arena::remove_subtree(wrapper);
        // The client stays in the bridge: remounts reuse it, and only
        // a full clear() drops it.
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use spark_signals::signal;

    use super::*;
    use crate::host::arena::{
        append_child, body, children_of, create_element, create_shadow_root, reset_host_state,
        set_id,
    };
    use crate::host::noop_cleanup;
    use crate::types::ROOT_ANCHOR_ID;

    fn anchor_under(root: NodeId) -> NodeId {
        let anchor = create_element("div");
        set_id(anchor, ROOT_ANCHOR_ID);
        append_child(root, anchor);
        anchor
    }

    fn mount_empty(root: NodeId, options: SuprSendOptions) -> Cleanup {
        let anchor = anchor_under(root);
        portal(anchor, || {
            provider_tree(
                signal(options),
                root,
                signal(ToastOptions::default()),
                |_ctx| noop_cleanup(),
            )
        })
    }

    fn reset_all() {
        reset_host_state();
        bridge::reset_bridge_state();
        i18n::reset_i18n_state();
    }

    #[test]
    fn test_client_is_reused_across_remounts() {
        reset_all();
        let root = body();

        let cleanup = mount_empty(
            root,
            SuprSendOptions {
                public_api_key: Some("pk_one".into()),
                ..Default::default()
            },
        );
        let first = bridge::client().unwrap();
        cleanup();

        // Client survives provider teardown for the next mount.
        assert!(bridge::client().is_some());

        let cleanup = mount_empty(
            root,
            SuprSendOptions {
                public_api_key: Some("pk_two".into()),
                ..Default::default()
            },
        );
        let second = bridge::client().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.public_api_key().as_deref(), Some("pk_two"));
        cleanup();
    }

    #[test]
    fn test_refresh_user_token_updates_client_without_remount() {
        reset_all();
        let root = body();
        let cleanup = mount_empty(root, SuprSendOptions::default());
        let client = bridge::client().unwrap();
        assert!(client.user_token().is_none());

        bridge::refresh_user_token("tok_fresh");
        assert_eq!(client.user_token().as_deref(), Some("tok_fresh"));
        cleanup();
    }

    #[test]
    fn test_update_suprsend_config_switches_locale_live() {
        reset_all();
        let root = body();
        let mut translations = HashMap::new();
        translations.insert(
            "fr".to_string(),
            "mark-all-read = Tout marquer comme lu\n".to_string(),
        );
        let cleanup = mount_empty(
            root,
            SuprSendOptions {
                translations: translations.clone(),
                ..Default::default()
            },
        );
        assert_eq!(i18n::tr("mark-all-read"), "Mark all as read");

        bridge::update_suprsend_config(&SuprSendConfigPatch {
            locale: Some("fr".into()),
            ..Default::default()
        });
        assert_eq!(i18n::tr("mark-all-read"), "Tout marquer comme lu");
        cleanup();
    }

    #[test]
    fn test_style_boundary_only_under_shadow_root() {
        reset_all();
        let root = body();
        let anchor = anchor_under(root);
        let cleanup = portal(anchor, || {
            provider_tree(
                signal(SuprSendOptions::default()),
                root,
                signal(ToastOptions::default()),
                |_ctx| noop_cleanup(),
            )
        });
        let wrapper = children_of(anchor)[0];
        assert!(!arena::flags_of(wrapper).contains(NodeFlags::STYLE_BOUNDARY));
        cleanup();

        bridge::reset_bridge_state();
        let shadow = create_shadow_root();
        let anchor = anchor_under(shadow);
        let cleanup = portal(anchor, || {
            provider_tree(
                signal(SuprSendOptions {
                    shadow_root: Some(shadow),
                    ..Default::default()
                }),
                shadow,
                signal(ToastOptions::default()),
                |_ctx| noop_cleanup(),
            )
        });
        let wrapper = children_of(anchor)[0];
        assert!(arena::flags_of(wrapper).contains(NodeFlags::STYLE_BOUNDARY));
        cleanup();
    }

    #[test]
    fn test_cleanup_withdraws_slots_and_i18n() {
        reset_all();
        let root = body();
        let cleanup = mount_empty(root, SuprSendOptions::default());
        assert_eq!(i18n::tr("mark-all-read"), "Mark all as read");
        cleanup();

        // Provider gone: translation falls back to key echo, update
        // slots are silent no-ops again.
        assert_eq!(i18n::tr("mark-all-read"), "mark-all-read");
        bridge::refresh_user_token("ignored");
        assert!(bridge::client().unwrap().user_token().is_none());
    }
}
