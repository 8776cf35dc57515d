//! # suprsend-embed
//!
//! Drop-in embedding layer for the SuprSend notification surfaces:
//! inbox popover, notification feed, and toast stack.
//!
//! The host application owns the element tree and provides anchors
//! (`suprsend-root`, `suprsend-inbox`, `suprsend-feed`); this crate
//! mounts the surfaces into them and bridges imperative page-level
//! calls into the reactive render tree.
//!
//! ## Architecture
//!
//! ```text
//! host script → bridge (global registry) → signals → render effects → host tree
//! ```
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! fine-grained reactivity: a bridge call writes a signal, and the
//! owning component's render effect consumes it on the same turn. No
//! remounting for configuration updates - only `init` tears down and
//! rebuilds, and it guarantees exactly one active tree per anchor.
//!
//! Everything degrades to "do nothing" under expected
//! misconfiguration: missing anchors disable only their surface,
//! update calls before mount are silent no-ops, and `init`/`clear` are
//! idempotent in any interleaving.
//!
//! ## Modules
//!
//! - [`bridge`] - Global entry points and mutable callback slots
//! - [`mount`] - Root mount controller (anchor lifecycle)
//! - [`config`] - Configuration values with shallow-merge semantics
//! - [`client`] - Shared client instance and event emitter
//! - [`i18n`] - Locale/translation provider (Fluent)
//! - [`host`] - Element tree, viewport, events, portals
//!
//! ## Example
//!
//! ```ignore
//! use suprsend_embed::host::arena;
//! use suprsend_embed::{SuprSendOptions, init, clear};
//!
//! // Host page provides an inbox anchor.
//! let body = arena::body();
//! let anchor = arena::create_element("div");
//! arena::set_id(anchor, "suprsend-inbox");
//! arena::append_child(body, anchor);
//!
//! init(SuprSendOptions {
//!     public_api_key: Some("pk_live".into()),
//!     distinct_id: Some("user-42".into()),
//!     ..Default::default()
//! });
//!
//! // ... later, from anywhere on the page:
//! suprsend_embed::update_inbox_config(&Default::default());
//! clear(None);
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod i18n;
pub mod mount;
pub mod types;

mod header;
mod provider;
mod surfaces;
mod toast;

// Re-export commonly used items
pub use types::*;

pub use bridge::{
    boot, clear, clear_feed, clear_inbox, init, refresh_user_token, update_feed_config,
    update_inbox_config, update_suprsend_config, update_toast_config,
};

pub use client::{Client, ClientHandle, Emitter, Subscription};

pub use config::{
    FeedOptions, FeedStore, HeaderTheme, InboxOptions, SuprSendConfigPatch, SuprSendOptions,
    SurfaceTheme, ToastOptions, ToastTheme,
};

pub use error::EmbedError;

pub use host::{Cleanup, NodeId, set_viewport_size};

pub use mount::ClearTarget;
