//! Host element tree - node arena, ids, parent context.
//!
//! The embedding layer never owns a real document; the host application
//! does. This arena models that externally-owned tree through explicit
//! container handles:
//! - Nodes are indices into a slab with a free pool for O(1) reuse
//! - String ids resolve scope-locally (a shadow root never leaks ids
//!   into the main document, and vice versa)
//! - A parent context stack lets render closures append children
//!   without threading container handles through every call
//!
//! # Example
//!
//! ```ignore
//! use suprsend_embed::host::arena;
//!
//! let body = arena::body();
//! let anchor = arena::create_element("div");
//! arena::set_id(anchor, "suprsend-inbox");
//! arena::append_child(body, anchor);
//!
//! assert_eq!(arena::get_element_by_id(body, "suprsend-inbox"), Some(anchor));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

// =============================================================================
// Node
// =============================================================================

/// Handle to a node in the host tree.
pub type NodeId = usize;

bitflags::bitflags! {
    /// Structural node flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// Top-level container (main document body or a shadow root).
        const ROOT = 1 << 0;
        /// Isolated subtree whose ids and styles never mix with the
        /// main document.
        const SHADOW_ROOT = 1 << 1;
        /// Scopes injected styles to the subtree below it.
        const STYLE_BOUNDARY = 1 << 2;
    }
}

/// Click handler attached to a node. Return true to consume the event
/// and stop it bubbling to ancestors.
pub type ClickHandler = Rc<dyn Fn() -> bool>;

struct Node {
    tag: String,
    id: Option<String>,
    flags: NodeFlags,
    props: Option<Value>,
    click: Option<ClickHandler>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            flags: NodeFlags::NONE,
            props: None,
            click: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// Arena State
// =============================================================================

thread_local! {
    /// Node slab. `None` marks a freed slot awaiting reuse.
    static NODES: RefCell<Vec<Option<Node>>> = RefCell::new(Vec::new());

    /// Pool of freed slots.
    static FREE_NODES: RefCell<Vec<NodeId>> = RefCell::new(Vec::new());

    /// Lazily-created main document root.
    static BODY: RefCell<Option<NodeId>> = const { RefCell::new(None) };

    /// Stack of container nodes for nested render closures.
    static PARENT_STACK: RefCell<Vec<NodeId>> = RefCell::new(Vec::new());
}

fn alloc(node: Node) -> NodeId {
    let reused = FREE_NODES.with(|free| free.borrow_mut().pop());
    NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        match reused {
            Some(index) => {
                nodes[index] = Some(node);
                index
            }
            None => {
                nodes.push(Some(node));
                nodes.len() - 1
            }
        }
    })
}

fn with_node<R>(index: NodeId, f: impl FnOnce(&Node) -> R) -> Option<R> {
    NODES.with(|nodes| nodes.borrow().get(index).and_then(|n| n.as_ref()).map(f))
}

fn with_node_mut<R>(index: NodeId, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
    NODES.with(|nodes| {
        nodes
            .borrow_mut()
            .get_mut(index)
            .and_then(|n| n.as_mut())
            .map(f)
    })
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Current container for newly created elements, if any.
pub fn current_parent() -> Option<NodeId> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a container onto the parent context stack.
pub fn push_parent_context(index: NodeId) {
    PARENT_STACK.with(|stack| stack.borrow_mut().push(index));
}

/// Pop the current container off the parent context stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

// =============================================================================
// Roots
// =============================================================================

/// The main document root, created on first access.
pub fn body() -> NodeId {
    BODY.with(|body| {
        let mut body = body.borrow_mut();
        match *body {
            Some(index) if exists(index) => index,
            _ => {
                let mut node = Node::new("body");
                node.flags = NodeFlags::ROOT;
                let index = alloc(node);
                *body = Some(index);
                index
            }
        }
    })
}

/// Create a detached, isolated root (shadow boundary).
///
/// Ids set inside it are invisible to `get_element_by_id` on the main
/// document root, and the mount controller scopes injected styles to it.
pub fn create_shadow_root() -> NodeId {
    let mut node = Node::new("shadow-root");
    node.flags = NodeFlags::ROOT | NodeFlags::SHADOW_ROOT;
    alloc(node)
}

// =============================================================================
// Element Creation and Structure
// =============================================================================

/// Create an element.
///
/// If a parent context is active (inside a render closure or portal),
/// the element is appended to it; otherwise it starts detached.
pub fn create_element(tag: &str) -> NodeId {
    let index = alloc(Node::new(tag));
    if let Some(parent) = current_parent() {
        append_child(parent, index);
    }
    index
}

/// Set the element's string id (used by anchor lookup).
pub fn set_id(index: NodeId, id: &str) {
    with_node_mut(index, |node| node.id = Some(id.to_string()));
}

/// Append `child` under `parent`, detaching it from any previous parent.
pub fn append_child(parent: NodeId, child: NodeId) {
    if !exists(parent) || !exists(child) || parent == child {
        return;
    }
    detach(child);
    with_node_mut(parent, |node| node.children.push(child));
    with_node_mut(child, |node| node.parent = Some(parent));
}

fn detach(child: NodeId) {
    let old_parent = with_node(child, |node| node.parent).flatten();
    if let Some(parent) = old_parent {
        with_node_mut(parent, |node| node.children.retain(|&c| c != child));
        with_node_mut(child, |node| node.parent = None);
    }
}

/// Resolve an id within the subtree under `scope` (depth-first).
///
/// Lookup is scope-local: resolving against a shadow root only searches
/// that root, resolving against the body never enters shadow roots.
pub fn get_element_by_id(scope: NodeId, id: &str) -> Option<NodeId> {
    if !exists(scope) {
        return None;
    }
    if with_node(scope, |node| node.id.as_deref() == Some(id)).unwrap_or(false) {
        return Some(scope);
    }
    let children = children_of(scope);
    for child in children {
        if let Some(found) = get_element_by_id(child, id) {
            return Some(found);
        }
    }
    None
}

/// Remove a node and its entire subtree, returning the slots to the pool.
pub fn remove_subtree(index: NodeId) {
    if !exists(index) {
        return;
    }
    detach(index);
    free_recursive(index);
}

fn free_recursive(index: NodeId) {
    // Collect first: children mutate under us otherwise.
    let children = children_of(index);
    for child in children {
        free_recursive(child);
    }
    NODES.with(|nodes| {
        if let Some(slot) = nodes.borrow_mut().get_mut(index) {
            *slot = None;
        }
    });
    FREE_NODES.with(|free| free.borrow_mut().push(index));
}

// =============================================================================
// Accessors
// =============================================================================

/// Whether the handle still refers to a live node.
pub fn exists(index: NodeId) -> bool {
    NODES.with(|nodes| {
        nodes
            .borrow()
            .get(index)
            .map(|n| n.is_some())
            .unwrap_or(false)
    })
}

pub fn tag_of(index: NodeId) -> Option<String> {
    with_node(index, |node| node.tag.clone())
}

pub fn id_of(index: NodeId) -> Option<String> {
    with_node(index, |node| node.id.clone()).flatten()
}

pub fn parent_of(index: NodeId) -> Option<NodeId> {
    with_node(index, |node| node.parent).flatten()
}

pub fn children_of(index: NodeId) -> Vec<NodeId> {
    with_node(index, |node| node.children.clone()).unwrap_or_default()
}

pub fn flags_of(index: NodeId) -> NodeFlags {
    with_node(index, |node| node.flags).unwrap_or(NodeFlags::NONE)
}

pub fn add_flags(index: NodeId, flags: NodeFlags) {
    with_node_mut(index, |node| node.flags |= flags);
}

/// Attach the forwarded-props record for an opaque component node.
pub fn set_props(index: NodeId, props: Value) {
    with_node_mut(index, |node| node.props = Some(props));
}

pub fn props_of(index: NodeId) -> Option<Value> {
    with_node(index, |node| node.props.clone()).flatten()
}

pub fn set_click_handler(index: NodeId, handler: ClickHandler) {
    with_node_mut(index, |node| node.click = Some(handler));
}

pub(crate) fn click_handler_of(index: NodeId) -> Option<ClickHandler> {
    with_node(index, |node| node.click.clone()).flatten()
}

/// Find the topmost ancestor (the containing root) of a node.
pub fn root_of(index: NodeId) -> Option<NodeId> {
    if !exists(index) {
        return None;
    }
    let mut current = index;
    while let Some(parent) = parent_of(current) {
        current = parent;
    }
    Some(current)
}

/// Count of live nodes (test observability).
pub fn node_count() -> usize {
    NODES.with(|nodes| nodes.borrow().iter().filter(|n| n.is_some()).count())
}

/// Reset all arena state. Test helper.
pub fn reset_host_state() {
    NODES.with(|nodes| nodes.borrow_mut().clear());
    FREE_NODES.with(|free| free.borrow_mut().clear());
    BODY.with(|body| *body.borrow_mut() = None);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_created_once() {
        reset_host_state();
        let a = body();
        let b = body();
        assert_eq!(a, b);
        assert!(flags_of(a).contains(NodeFlags::ROOT));
    }

    #[test]
    fn test_id_lookup_is_scope_local() {
        reset_host_state();
        let main = body();
        let shadow = create_shadow_root();

        let in_main = create_element("div");
        set_id(in_main, "suprsend-inbox");
        append_child(main, in_main);

        let in_shadow = create_element("div");
        set_id(in_shadow, "suprsend-inbox");
        append_child(shadow, in_shadow);

        assert_eq!(get_element_by_id(main, "suprsend-inbox"), Some(in_main));
        assert_eq!(get_element_by_id(shadow, "suprsend-inbox"), Some(in_shadow));
        assert_eq!(get_element_by_id(main, "suprsend-feed"), None);
    }

    #[test]
    fn test_parent_context_appends_automatically() {
        reset_host_state();
        let container = create_element("div");
        push_parent_context(container);
        let child = create_element("span");
        pop_parent_context();

        assert_eq!(parent_of(child), Some(container));
        assert_eq!(children_of(container), vec![child]);
    }

    #[test]
    fn test_remove_subtree_frees_descendants() {
        reset_host_state();
        let root = body();
        let parent = create_element("div");
        append_child(root, parent);
        push_parent_context(parent);
        let child = create_element("span");
        let grandchild = create_element("em");
        append_child(child, grandchild);
        pop_parent_context();

        remove_subtree(parent);
        assert!(!exists(parent));
        assert!(!exists(child));
        assert!(!exists(grandchild));
        assert!(children_of(root).is_empty());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        reset_host_state();
        let a = create_element("div");
        remove_subtree(a);
        let b = create_element("span");
        assert_eq!(a, b);
        assert_eq!(tag_of(b).as_deref(), Some("span"));
    }

    #[test]
    fn test_append_reparents() {
        reset_host_state();
        let first = create_element("div");
        let second = create_element("div");
        let child = create_element("span");

        append_child(first, child);
        append_child(second, child);

        assert!(children_of(first).is_empty());
        assert_eq!(children_of(second), vec![child]);
        assert_eq!(parent_of(child), Some(second));
    }
}
