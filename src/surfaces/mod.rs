//! Surface components - the independently mountable UI regions.
//!
//! Each surface resolves its anchor once at mount time, keeps its own
//! locally-managed configuration and visibility, and portals its
//! rendered component into the anchor. Absence of an anchor silently
//! disables only that surface.

mod feed;
mod inbox;

pub(crate) use feed::mount_feed;
pub(crate) use inbox::mount_inbox;
