//! The [`Event`] object: what handlers receive, mutate the tree through,
//! and record their post-event actions on.
//!
//! One event is created per incoming request. When a widget observes a
//! meaningful state transition while handling it (a tab selection change,
//! an expander toggle), it *forks* an internal event: the fork has its own
//! type and source but shares the post-event record (dirty set, focus
//! target, reload request and session) with its parent, so actions
//! recorded on either end up in the same response.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use gwu_core::{EventType, Id, Key, ModKeys, MouseBtn};

use crate::comp::{descendant_of_id, CompRef};
use crate::session::Session;

/// A handler capable of handling events.
///
/// If the handler modifies components in a way that changes their view, it
/// must mark them dirty on the event so the client re-renders them. If the
/// tree structure itself changed, the container whose structure changed is
/// the one to mark dirty.
pub trait EventHandler: Send + Sync {
    /// Handles the event.
    fn handle_event(&self, ev: &mut Event);
}

impl<F> EventHandler for F
where
    F: Fn(&mut Event) + Send + Sync,
{
    fn handle_event(&self, ev: &mut Event) {
        self(ev)
    }
}

/// Access to the server's session registry, as seen from an event.
///
/// Implemented by the server; a seam trait so the widget layer does not
/// depend on the HTTP layer.
pub trait SessionRegistry: Send + Sync {
    /// Creates, registers and returns a new private session.
    fn create_session(&self) -> Session;

    /// Removes a private session from the registry. No-op for the public
    /// session.
    fn remove_session(&self, sess: &Session);

    /// The shared public session.
    fn public_session(&self) -> Session;
}

/// Post-event actions, shared between an event and its forks.
struct PostEvtActions {
    /// Requested window reload; `Some("")` reloads the current window.
    reload: Option<String>,
    /// Dirty components keyed by id. Invariant: no member is a descendant
    /// of another member.
    dirty: BTreeMap<Id, CompRef>,
    /// Component to focus after the event.
    focused: Option<CompRef>,
    /// The current session; handlers may swap it via `new_session`.
    session: Session,
}

/// Event data shared between an event and its forks.
struct SharedEvtData {
    wx: i32,
    wy: i32,
    mbtn: MouseBtn,
    mod_keys: ModKeys,
    key_code: Key,
    comp_value: Option<String>,
    registry: Option<Arc<dyn SessionRegistry>>,
    post: Mutex<PostEvtActions>,
}

/// An event originating from a component (or forked from another event).
#[derive(Clone)]
pub struct Event {
    etype: EventType,
    src: CompRef,
    parent: Option<Box<Event>>,
    x: i32,
    y: i32,
    shared: Arc<SharedEvtData>,
}

impl Event {
    /// Creates a new event. Mouse and key payload default to "unknown";
    /// the server fills them in from the request with the `with_*` builder
    /// methods before dispatching.
    #[must_use]
    pub fn new(etype: EventType, src: CompRef, session: Session) -> Event {
        Event {
            etype,
            src,
            parent: None,
            x: -1,
            y: -1,
            shared: Arc::new(SharedEvtData {
                wx: -1,
                wy: -1,
                mbtn: MouseBtn::Unknown,
                mod_keys: ModKeys::empty(),
                key_code: Key::UNKNOWN,
                comp_value: None,
                registry: None,
                post: Mutex::new(PostEvtActions {
                    reload: None,
                    dirty: BTreeMap::new(),
                    focused: None,
                    session,
                }),
            }),
        }
    }

    /// Builder used by the server while decoding a request. Only valid on a
    /// freshly created, un-forked event.
    #[must_use]
    pub fn with_mouse(mut self, x: i32, y: i32, wx: i32, wy: i32, mbtn: MouseBtn) -> Event {
        self.x = x;
        self.y = y;
        let shared = Arc::get_mut(&mut self.shared).expect("un-forked event");
        shared.wx = wx;
        shared.wy = wy;
        shared.mbtn = mbtn;
        self
    }

    /// Sets the modifier-key and key-code payload (server only).
    #[must_use]
    pub fn with_keys(mut self, mod_keys: ModKeys, key_code: Key) -> Event {
        let shared = Arc::get_mut(&mut self.shared).expect("un-forked event");
        shared.mod_keys = mod_keys;
        shared.key_code = key_code;
        self
    }

    /// Sets the raw component value field of the request (server only).
    #[must_use]
    pub fn with_comp_value(mut self, value: Option<String>) -> Event {
        let shared = Arc::get_mut(&mut self.shared).expect("un-forked event");
        shared.comp_value = value;
        self
    }

    /// Attaches the session registry (server only).
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn SessionRegistry>) -> Event {
        let shared = Arc::get_mut(&mut self.shared).expect("un-forked event");
        shared.registry = Some(registry);
        self
    }

    /// The type of the event.
    #[must_use]
    pub fn etype(&self) -> EventType {
        self.etype
    }

    /// The source of the event: the component it originates from.
    #[must_use]
    pub fn src(&self) -> &CompRef {
        &self.src
    }

    /// The parent event, if this event was forked while handling another.
    /// Identifies the original source and event type.
    #[must_use]
    pub fn parent(&self) -> Option<&Event> {
        self.parent.as_deref()
    }

    /// Mouse coordinates relative to the source component;
    /// `(-1, -1)` if not available.
    #[must_use]
    pub fn mouse(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Mouse coordinates inside the window; `(-1, -1)` if not available.
    #[must_use]
    pub fn mouse_win(&self) -> (i32, i32) {
        (self.shared.wx, self.shared.wy)
    }

    /// The mouse button of the event.
    #[must_use]
    pub fn mouse_btn(&self) -> MouseBtn {
        self.shared.mbtn
    }

    /// The states of all modifier keys.
    #[must_use]
    pub fn mod_keys(&self) -> ModKeys {
        self.shared.mod_keys
    }

    /// Tells if the given modifier key was held.
    #[must_use]
    pub fn mod_key(&self, key: ModKeys) -> bool {
        self.shared.mod_keys.contains(key)
    }

    /// The key code of the event.
    #[must_use]
    pub fn key_code(&self) -> Key {
        self.shared.key_code
    }

    /// The raw component value (`cval`) sent with the request, if present.
    #[must_use]
    pub fn comp_value(&self) -> Option<&str> {
        self.shared.comp_value.as_deref()
    }

    /// Requests the named window to be reloaded after the event.
    /// Pass an empty name to reload the current window.
    pub fn reload_win(&self, name: &str) {
        self.shared.post.lock().reload = Some(name.to_string());
    }

    /// Marks a component dirty, to be re-rendered after the event without a
    /// page reload. Marking a component covers all of its descendants, so
    /// the dirty set stays minimal: adding a component already covered by
    /// an ancestor is a no-op, and adding an ancestor of present members
    /// evicts those members.
    ///
    /// Minimizing during dispatch is sound even though handlers may move
    /// components afterwards: if a clean child is moved out of a dirty
    /// parent, the container it lands in must itself be marked dirty, which
    /// re-renders the child anyway.
    pub fn mark_dirty(&self, comp: &CompRef) {
        let mut post = self.shared.post.lock();

        if post.covers(comp) {
            return;
        }

        let cid = comp.read().core().id();
        post.dirty.retain(|_, c| !descendant_of_id(c, cid));
        post.dirty.insert(cid, comp.clone());
    }

    /// Sets the component to be focused after the event.
    pub fn set_focused_comp(&self, comp: &CompRef) {
        self.shared.post.lock().focused = Some(comp.clone());
    }

    /// The current session. Use [`Session::private`] to tell a private
    /// session from the shared public one.
    #[must_use]
    pub fn session(&self) -> Session {
        self.shared.post.lock().session.clone()
    }

    /// Creates a new private session, removing the current private session
    /// first if there is one. Without an attached registry (outside a
    /// server) this is a no-op returning the current session.
    pub fn new_session(&self) -> Session {
        let Some(registry) = self.shared.registry.clone() else {
            return self.session();
        };

        self.remove_session();
        let sess = registry.create_session();
        self.shared.post.lock().session = sess.clone();
        sess
    }

    /// Removes (invalidates) the current session. Only private sessions can
    /// be removed; with the public session this is a no-op. Afterwards
    /// [`Event::session`] returns the public session.
    pub fn remove_session(&self) {
        let Some(registry) = self.shared.registry.clone() else {
            return;
        };

        let mut post = self.shared.post.lock();
        if post.session.private() {
            registry.remove_session(&post.session);
            post.session = registry.public_session();
        }
    }

    /// Forks a new internal event from this one. The fork shares the
    /// post-event record (session, dirty set, focus, reload) with this
    /// event but has its own type and source, and unknown component-relative
    /// mouse coordinates.
    #[must_use]
    pub fn fork(&self, etype: EventType, src: CompRef) -> Event {
        Event {
            etype,
            src,
            parent: Some(Box::new(self.clone())),
            x: -1,
            y: -1,
            shared: self.shared.clone(),
        }
    }

    /// The requested window reload, if any (response encoding).
    #[must_use]
    pub fn reload_requested(&self) -> Option<String> {
        self.shared.post.lock().reload.clone()
    }

    /// Ids of the dirty components, ascending (response encoding).
    #[must_use]
    pub fn dirty_ids(&self) -> Vec<Id> {
        self.shared.post.lock().dirty.keys().copied().collect()
    }

    /// The pending focus target, if any (response encoding).
    #[must_use]
    pub fn focused_comp(&self) -> Option<CompRef> {
        self.shared.post.lock().focused.clone()
    }
}

impl PostEvtActions {
    /// Tells if the component is already covered by the dirty set, either
    /// as a member or as a descendant of a member.
    fn covers(&self, c: &CompRef) -> bool {
        if self.dirty.contains_key(&c.read().core().id()) {
            return true;
        }

        let mut cur = c.read().core().parent();
        while let Some(p) = cur {
            if self.dirty.contains_key(&p.read().core().id()) {
                return true;
            }
            cur = p.read().core().parent();
        }
        false
    }
}

/// Dispatches the event to all handlers the component registered for the
/// event's type, in registration order.
///
/// The handler list is snapshotted first, so no component lock is held
/// while handlers run and a handler may freely lock its own component.
pub fn dispatch_event(comp: &CompRef, ev: &mut Event) {
    let handlers = comp.read().core().handlers_for(ev.etype());
    for handler in handlers {
        handler.handle_event(ev);
    }
}
