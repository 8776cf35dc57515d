//! Shared client instance and its event emitter.
//!
//! The client represents the live session with the notification
//! backend. The network layer itself lives outside this crate; what the
//! embedding layer needs is the identity surface (key, subscriber,
//! token) and the event emitter the toast renderer subscribes to.
//!
//! Identity invariant: exactly one logical client exists per page
//! lifetime. Remounts reconfigure the existing instance in place
//! through [`Client::reconfigure`] instead of replacing it, so every
//! holder of the handle keeps observing the same instance.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::config::SuprSendOptions;
use crate::types::{MARK_ALL_READ, RefreshTokenProp};

// =============================================================================
// Emitter
// =============================================================================

/// Handler registered for a named event.
pub type EventHandler = Rc<dyn Fn(&Value)>;

struct EmitterInner {
    handlers: HashMap<String, Vec<(usize, EventHandler)>>,
    next_id: usize,
}

/// Named-event emitter with handle-based unsubscription.
///
/// `subscribe` returns a [`Subscription`] whose `dispose()` removes
/// exactly that handler and runs at most once; dropping the handle
/// disposes it as well. Disposing one subscription never disturbs
/// other listeners on the same event.
#[derive(Clone)]
pub struct Emitter {
    inner: Rc<RefCell<EmitterInner>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                handlers: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a handler for `event`.
    pub fn subscribe(&self, event: &str, handler: impl Fn(&Value) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .handlers
                .entry(event.to_string())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };
        Subscription {
            inner: Rc::downgrade(&self.inner),
            event: event.to_string(),
            id,
            disposed: Cell::new(false),
        }
    }

    /// Emit `event` to its handlers in subscription order.
    pub fn emit(&self, event: &str, payload: &Value) {
        // Clone the handler list out so a handler can subscribe or
        // dispose without hitting a RefCell re-borrow.
        let handlers: Vec<EventHandler> = {
            let inner = self.inner.borrow();
            inner
                .handlers
                .get(event)
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };
        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of live handlers for `event` (test observability).
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one registered event handler.
pub struct Subscription {
    inner: Weak<RefCell<EmitterInner>>,
    event: String,
    id: usize,
    disposed: Cell<bool>,
}

impl Subscription {
    /// Remove the handler. Runs at most once; later calls are no-ops.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        if let Some(list) = inner.handlers.get_mut(&self.event) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                inner.handlers.remove(&self.event);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// Client
// =============================================================================

/// Shared handle to the single client instance.
pub type ClientHandle = Rc<Client>;

/// The live session with the notification backend.
pub struct Client {
    public_api_key: RefCell<Option<String>>,
    distinct_id: RefCell<Option<String>>,
    user_token: RefCell<Option<String>>,
    host: RefCell<Option<String>>,
    refresh_user_token: RefCell<Option<RefreshTokenProp>>,
    emitter: Emitter,
}

impl Client {
    /// Create the client from the root configuration.
    pub fn from_options(options: &SuprSendOptions) -> ClientHandle {
        let client = Rc::new(Self {
            public_api_key: RefCell::new(None),
            distinct_id: RefCell::new(None),
            user_token: RefCell::new(None),
            host: RefCell::new(None),
            refresh_user_token: RefCell::new(None),
            emitter: Emitter::new(),
        });
        client.reconfigure(options);
        client
    }

    /// Update identity fields in place. The handle and the emitter stay
    /// stable across any number of reconfigurations.
    pub fn reconfigure(&self, options: &SuprSendOptions) {
        *self.public_api_key.borrow_mut() = options.public_api_key.clone();
        *self.distinct_id.borrow_mut() = options.distinct_id.clone();
        *self.user_token.borrow_mut() = options.user_token.clone();
        *self.host.borrow_mut() = options.host.clone();
        *self.refresh_user_token.borrow_mut() = options.refresh_user_token.clone();
    }

    /// Swap only the auth token.
    pub fn set_user_token(&self, token: &str) {
        *self.user_token.borrow_mut() = Some(token.to_string());
    }

    /// Invoke the host's refresh hook, storing and returning the fresh
    /// token if one is produced.
    pub fn request_fresh_token(&self) -> Option<String> {
        let hook = self.refresh_user_token.borrow().clone();
        let token = hook.and_then(|h| h.call());
        if let Some(token) = &token {
            self.set_user_token(token);
        }
        token
    }

    /// Ask the backend to mark every notification read. The transport
    /// listens on the emitter; the embedding layer only signals intent.
    pub fn mark_all_read(&self) {
        self.emitter.emit(MARK_ALL_READ, &Value::Null);
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn public_api_key(&self) -> Option<String> {
        self.public_api_key.borrow().clone()
    }

    pub fn distinct_id(&self) -> Option<String> {
        self.distinct_id.borrow().clone()
    }

    pub fn user_token(&self) -> Option<String> {
        self.user_token.borrow().clone()
    }

    pub fn host(&self) -> Option<String> {
        self.host.borrow().clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
