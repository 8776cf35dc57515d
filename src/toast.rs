//! Toast renderer - transient cards for incoming notifications.
//!
//! Subscribes to the client's `new_notification` event and enqueues one
//! card per event onto the toaster stack, in emission order. The
//! subscription is strictly paired with this renderer's lifetime:
//! teardown disposes exactly its own handler and never touches other
//! listeners on the emitter.
//!
//! Position defaults by viewport width, resolved once at render time -
//! a later resize does not move an already-mounted stack.

use serde_json::{Value, json};
use spark_signals::Signal;
use tracing::{debug, warn};

use crate::client::ClientHandle;
use crate::config::ToastOptions;
use crate::host::arena::{
    create_element, pop_parent_context, push_parent_context, remove_subtree, set_props,
};
use crate::host::{Cleanup, noop_cleanup, viewport};
use crate::types::{
    DEFAULT_TOAST_DURATION_MS, NEW_NOTIFICATION, NotificationData, StyleMap, ToastPosition,
};

/// Fixed container styling every card starts from; caller overrides
/// win field-by-field.
fn default_container_style() -> StyleMap {
    StyleMap::new()
        .with("min-width", "300px")
        .with("max-width", "450px")
        .with("border-radius", "8px")
        .with("padding", "8px 10px")
        .with(
            "box-shadow",
            "0 3px 10px rgba(0, 0, 0, 0.1), 0 3px 3px rgba(0, 0, 0, 0.05)",
        )
}

/// Mount the toast renderer under the current parent context.
///
/// Without a client there is nothing to subscribe to: renders nothing.
pub(crate) fn toast_renderer(
    client: Option<&ClientHandle>,
    config: Signal<ToastOptions>,
) -> Cleanup {
    let Some(client) = client else {
        debug!("no client available; toast renderer disabled");
        return noop_cleanup();
    };

    let initial = config.get();
    let position = initial
        .position
        .unwrap_or_else(|| ToastPosition::default_for_width(viewport::viewport_width()));
    let duration = initial.duration.unwrap_or(DEFAULT_TOAST_DURATION_MS);

    let toaster = create_element("toaster");
    set_props(
        toaster,
        json!({
            "position": position,
            "duration": duration,
            "gutter": 8,
        }),
    );

    let config_for_events = config.clone();
    let subscription = client
        .emitter()
        .subscribe(NEW_NOTIFICATION, move |payload: &Value| {
            let notification: NotificationData = match serde_json::from_value(payload.clone()) {
                Ok(notification) => notification,
                Err(err) => {
                    warn!("dropping malformed notification payload: {err}");
                    return;
                }
            };

            let cfg = config_for_events.get();
            let theme = cfg.theme.clone().unwrap_or_default();
            let container = theme
                .container
                .unwrap_or_default()
                .merged_over(&default_container_style());

            push_parent_context(toaster);
            let card = create_element("toast-card");
            set_props(
                card,
                json!({
                    "notification": notification,
                    "hideAvatar": cfg.hide_avatar(),
                    "theme": {
                        "container": container,
                        "headerText": theme.header_text,
                        "bodyText": theme.body_text,
                    },
                }),
            );
            pop_parent_context();
        });

    Box::new(move || {
        subscription.dispose();
        remove_subtree(toaster);
    })
}

// =============================================================================
// Tests
// =============================================================================
