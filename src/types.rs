//! Core types shared across the embedding layer.
//!
//! Small value types only: toast positioning, style override maps,
//! notification payloads, and the callback wrappers that keep
//! configuration values `Clone + PartialEq` (required for signals).

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Well-known names and defaults
// =============================================================================

/// Anchor id the root render tree mounts under (created if absent).
pub const ROOT_ANCHOR_ID: &str = "suprsend-root";

/// Anchor id for the inbox popover surface (host-provided, optional).
pub const INBOX_ANCHOR_ID: &str = "suprsend-inbox";

/// Anchor id for the notification feed surface (host-provided, optional).
pub const FEED_ANCHOR_ID: &str = "suprsend-feed";

/// Event name the toast renderer subscribes to on the client emitter.
pub const NEW_NOTIFICATION: &str = "new_notification";

/// Event name emitted when the header's mark-all-read action fires.
pub const MARK_ALL_READ: &str = "mark_all_read";

/// Toast display duration when the configuration leaves it unset.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// Viewport widths at or below this get the bottom-center toast default.
pub const NARROW_VIEWPORT_MAX: u32 = 425;

// =============================================================================
// ToastPosition
// =============================================================================

/// Screen position for the toast stack.
///
/// Wire names match the stacking renderer's convention (`"bottom-right"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl ToastPosition {
    /// Default position for a given viewport width: corner placement on
    /// wide viewports, bottom-center on narrow ones.
    pub fn default_for_width(width: u32) -> Self {
        if width > NARROW_VIEWPORT_MAX {
            Self::BottomRight
        } else {
            Self::BottomCenter
        }
    }

    /// Wire name, e.g. `"bottom-right"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

// =============================================================================
// StyleMap - per-field style overrides
// =============================================================================

/// An ordered property → value style map.
///
/// Used for theme overrides throughout the configuration. Merging is
/// always field-by-field: caller values win per property, never by
/// whole-object replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(property.into(), value.into());
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merge `self` over `base`: every property present in `self`
    /// overrides the base value, all other base properties survive.
    pub fn merged_over(&self, base: &StyleMap) -> StyleMap {
        let mut out = base.0.clone();
        for (k, v) in &self.0 {
            out.insert(k.clone(), v.clone());
        }
        StyleMap(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// =============================================================================
// NotificationData
// =============================================================================

/// Payload of a single incoming notification event.
///
/// The embedding layer never interprets these fields beyond forwarding
/// them to the card renderer; the shape mirrors what the client emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    /// Backend-assigned notification id.
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NotificationData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: None,
            avatar_url: None,
            created_at: Some(Utc::now()),
        }
    }
}

// =============================================================================
// Callback wrappers
// =============================================================================

/// A cloneable unit callback carried inside configuration values.
///
/// Configuration is held in signals, which need `PartialEq` for change
/// detection; closures compare by pointer identity.
#[derive(Clone)]
pub struct CallbackProp(Rc<dyn Fn()>);

impl CallbackProp {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl PartialEq for CallbackProp {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CallbackProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackProp")
    }
}

/// Host-supplied hook the client calls to obtain a fresh auth token.
#[derive(Clone)]
pub struct RefreshTokenProp(Rc<dyn Fn() -> Option<String>>);

impl RefreshTokenProp {
    pub fn new(f: impl Fn() -> Option<String> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) -> Option<String> {
        (self.0)()
    }
}

impl PartialEq for RefreshTokenProp {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RefreshTokenProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshTokenProp")
    }
}

// =============================================================================
// Tests
// =============================================================================
