//! Configuration model.
//!
//! Configuration is a value type: updates never mutate in place, they
//! produce a new value by shallow merge (supplied fields win, nested
//! objects are replaced whole, untouched fields survive). The same
//! structs double as partials for the bridge's `update*` calls, since
//! every field is optional.
//!
//! The host page typically supplies the root value as a JSON payload;
//! fields that cannot travel as JSON (callbacks, the alternate root
//! handle) are set programmatically and skipped by serde.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EmbedError;
use crate::host::NodeId;
use crate::types::{CallbackProp, RefreshTokenProp, StyleMap, ToastPosition};

// =============================================================================
// Root configuration
// =============================================================================

/// Root configuration consumed by `init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuprSendOptions {
    /// Workspace public API key.
    pub public_api_key: Option<String>,
    /// Identifier of the subscriber the surfaces render for.
    pub distinct_id: Option<String>,
    /// Signed auth token for the subscriber.
    pub user_token: Option<String>,
    /// API host override.
    pub host: Option<String>,
    /// Web-push messaging key.
    pub vapid_key: Option<String>,
    /// Service-worker filename for push registration.
    pub sw_file_name: Option<String>,
    /// Locale tag selecting the active translation bundle.
    pub locale: Option<String>,
    /// Locale tag → Fluent (FTL) source for that locale.
    pub translations: HashMap<String, String>,
    /// Hook the client calls to obtain a fresh token when the current
    /// one expires.
    #[serde(skip)]
    pub refresh_user_token: Option<RefreshTokenProp>,
    /// Alternate root to mount under instead of the main document.
    #[serde(skip)]
    pub shadow_root: Option<NodeId>,
    /// Whether `boot` should mount immediately. Defaults to true.
    pub init_on_load: Option<bool>,
    pub inbox: Option<InboxOptions>,
    pub feed: Option<FeedOptions>,
    pub toast: Option<ToastOptions>,
}

impl SuprSendOptions {
    /// Parse the host page's JSON configuration payload.
    pub fn from_json(payload: &str) -> Result<Self, EmbedError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn init_on_load(&self) -> bool {
        self.init_on_load.unwrap_or(true)
    }

    /// Merge a top-level patch, producing a new value.
    ///
    /// Only identity and locale fields are touched; surface
    /// sub-configurations are locally managed by their mounted
    /// surfaces and deliberately left alone.
    pub fn merged_top_level(&self, patch: &SuprSendConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(locale) = &patch.locale {
            next.locale = Some(locale.clone());
        }
        if let Some(translations) = &patch.translations {
            next.translations = translations.clone();
        }
        if let Some(token) = &patch.user_token {
            next.user_token = Some(token.clone());
        }
        next
    }
}

/// Partial accepted by `update_suprsend_config` / `refresh_user_token`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuprSendConfigPatch {
    pub locale: Option<String>,
    pub translations: Option<HashMap<String, String>>,
    pub user_token: Option<String>,
}

// =============================================================================
// Surface configuration
// =============================================================================

/// A named feed store selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStore {
    pub store_id: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Backend query filter, passed through opaquely.
    #[serde(default)]
    pub query: Option<Value>,
}

/// Style overrides for the custom header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderTheme {
    pub mark_all_read_text: Option<StyleMap>,
    pub header_icon: Option<StyleMap>,
}

/// Theme overrides for a surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceTheme {
    pub header: Option<HeaderTheme>,
    pub container: Option<StyleMap>,
}

/// Inbox popover configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboxOptions {
    pub page_size: Option<u32>,
    pub stores: Option<Vec<FeedStore>>,
    pub tenant_id: Option<String>,
    /// Popover placement relative to the bell, passed through.
    pub popper_position: Option<String>,
    /// Suppress the embedded toast renderer for this surface.
    pub hide_toast: Option<bool>,
    /// Optional icon rendered in the header next to mark-all-read.
    pub header_icon_url: Option<String>,
    #[serde(skip)]
    pub header_icon_click_handler: Option<CallbackProp>,
    pub theme: Option<SurfaceTheme>,
}

impl InboxOptions {
    pub fn hide_toast(&self) -> bool {
        self.hide_toast.unwrap_or(false)
    }

    /// Shallow merge: fields present in `patch` win, nested objects are
    /// replaced whole, everything else survives.
    pub fn merged(&self, patch: &InboxOptions) -> InboxOptions {
        InboxOptions {
            page_size: patch.page_size.or(self.page_size),
            stores: patch.stores.clone().or_else(|| self.stores.clone()),
            tenant_id: patch.tenant_id.clone().or_else(|| self.tenant_id.clone()),
            popper_position: patch
                .popper_position
                .clone()
                .or_else(|| self.popper_position.clone()),
            hide_toast: patch.hide_toast.or(self.hide_toast),
            header_icon_url: patch
                .header_icon_url
                .clone()
                .or_else(|| self.header_icon_url.clone()),
            header_icon_click_handler: patch
                .header_icon_click_handler
                .clone()
                .or_else(|| self.header_icon_click_handler.clone()),
            theme: patch.theme.clone().or_else(|| self.theme.clone()),
        }
    }
}

/// Notification feed configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedOptions {
    /// Feed API host override, consumed by the feed's data scope.
    pub host: Option<String>,
    pub page_size: Option<u32>,
    pub stores: Option<Vec<FeedStore>>,
    pub tenant_id: Option<String>,
    /// Suppress the embedded toast renderer for this surface.
    pub hide_toast: Option<bool>,
    /// Hide the visual feed list while keeping the data scope (and its
    /// subscriptions) mounted.
    pub hide_feed: Option<bool>,
    pub header_icon_url: Option<String>,
    #[serde(skip)]
    pub header_icon_click_handler: Option<CallbackProp>,
    pub theme: Option<SurfaceTheme>,
}

impl FeedOptions {
    pub fn hide_toast(&self) -> bool {
        self.hide_toast.unwrap_or(false)
    }

    pub fn hide_feed(&self) -> bool {
        self.hide_feed.unwrap_or(false)
    }

    pub fn merged(&self, patch: &FeedOptions) -> FeedOptions {
        FeedOptions {
            host: patch.host.clone().or_else(|| self.host.clone()),
            page_size: patch.page_size.or(self.page_size),
            stores: patch.stores.clone().or_else(|| self.stores.clone()),
            tenant_id: patch.tenant_id.clone().or_else(|| self.tenant_id.clone()),
            hide_toast: patch.hide_toast.or(self.hide_toast),
            hide_feed: patch.hide_feed.or(self.hide_feed),
            header_icon_url: patch
                .header_icon_url
                .clone()
                .or_else(|| self.header_icon_url.clone()),
            header_icon_click_handler: patch
                .header_icon_click_handler
                .clone()
                .or_else(|| self.header_icon_click_handler.clone()),
            theme: patch.theme.clone().or_else(|| self.theme.clone()),
        }
    }
}

/// Toast theme overrides. Only the container merges over the renderer's
/// built-in defaults; text styles are forwarded as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastTheme {
    pub container: Option<StyleMap>,
    pub header_text: Option<StyleMap>,
    pub body_text: Option<StyleMap>,
}

/// Toast renderer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastOptions {
    /// Display duration in milliseconds. Defaults to 3000.
    pub duration: Option<u64>,
    /// Stack position. Defaults by viewport width at render time.
    pub position: Option<ToastPosition>,
    pub hide_avatar: Option<bool>,
    pub theme: Option<ToastTheme>,
}

impl ToastOptions {
    pub fn hide_avatar(&self) -> bool {
        self.hide_avatar.unwrap_or(false)
    }

    pub fn merged(&self, patch: &ToastOptions) -> ToastOptions {
        ToastOptions {
            duration: patch.duration.or(self.duration),
            position: patch.position.or(self.position),
            hide_avatar: patch.hide_avatar.or(self.hide_avatar),
            theme: patch.theme.clone().or_else(|| self.theme.clone()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
