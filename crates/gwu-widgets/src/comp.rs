//! The component substrate: the [`Comp`] trait every widget implements,
//! the [`CompCore`] state they embed, and the shared/weak handle types the
//! tree is built from.
//!
//! Ownership follows one rule: a container owns strong references to its
//! children, a child holds only a weak back-pointer to its parent. All
//! cells are `parking_lot` locks; they never contend meaningfully because
//! every tree mutation happens under the owning session's write lock and
//! every render under its read lock (see `gwu-server`). The locks exist so
//! the tree is `Send + Sync` and so concurrent *readers* (parallel partial
//! renders) stay safe.
//!
//! Lock discipline: traversals lock parent before child (render, lookup) or
//! walk strictly upward (ancestor tests); never hold a component guard
//! across a call that may re-enter the same component, such as
//! [`dispatch_event`](crate::event::dispatch_event) or
//! [`Event::mark_dirty`](crate::event::Event::mark_dirty).

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use gwu_core::{escape_html, next_id, unescape_html, EventType, Id, Writer};
use gwu_style::Style;

use crate::event::{Event, EventHandler};

/// Shared, type-erased handle to a component.
pub type CompRef = Arc<RwLock<dyn Comp>>;

/// Weak, type-erased handle to a component; used for parent back-pointers.
pub type WeakCompRef = Weak<RwLock<dyn Comp>>;

/// The base trait of all UI components.
///
/// A component is an addressable server-side node: it has a process-unique
/// id, explicit HTML attributes, a style builder, an event-handler table,
/// and renders itself as HTML. Concrete widgets embed a [`CompCore`] and
/// expose it through [`core`](Comp::core) / [`core_mut`](Comp::core_mut).
pub trait Comp: Send + Sync + 'static {
    /// The embedded substrate state.
    fn core(&self) -> &CompCore;

    /// The embedded substrate state, mutably.
    fn core_mut(&mut self) -> &mut CompCore;

    /// Renders the component as HTML.
    fn render(&self, w: &mut Writer<'_>) -> io::Result<()>;

    /// Preprocesses an incoming event before it is dispatched.
    ///
    /// The default does nothing. Value-bearing widgets override this to
    /// decode their new value from [`Event::comp_value`] before handlers
    /// run.
    fn preprocess(&mut self, ev: &Event) {
        let _ = ev;
    }

    /// The container capability, if this component can hold children.
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    /// The mutable container capability.
    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        None
    }

    /// Upcast for typed access behind a [`CompRef`].
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access behind a [`CompRef`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The unique id of the component.
    fn id(&self) -> Id {
        self.core().id()
    }

    /// Tells if this component and the other one are the same (by id).
    fn equals(&self, other: &dyn Comp) -> bool {
        self.core().id() == other.core().id()
    }
}

/// A component capable of holding child components.
pub trait Container: Comp {
    /// Removes a child component. Returns whether the component was a child
    /// and was removed. After a successful removal the child has no parent
    /// and the container holds no reference (nor cell formatter) for it.
    fn remove(&mut self, c: &CompRef) -> bool;

    /// Finds a component by id: checks this container first, then its
    /// children, recursing into child containers. Returns the first hit.
    fn by_id(&self, id: Id) -> Option<CompRef>;

    /// Removes all child components.
    fn clear(&mut self);
}

/// Typed shared handle to a concrete component.
///
/// Constructed by widget constructors; coerces to the erased [`CompRef`]
/// with [`Ref::as_comp`]. Both handles point at the same allocation, so a
/// component reached through the tree and through its typed handle is the
/// same object.
pub struct Ref<T: Comp> {
    inner: Arc<RwLock<T>>,
}

impl<T: Comp> Ref<T> {
    /// Wraps a freshly constructed component and wires up its weak self
    /// reference (needed for parent links and self lookup).
    pub fn new(comp: T) -> Ref<T> {
        let inner = Arc::new(RwLock::new(comp));
        let erased: CompRef = inner.clone();
        let weak: WeakCompRef = Arc::downgrade(&erased);
        inner.write().core_mut().set_self_ref(weak);
        Ref { inner }
    }

    /// Locks the component for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Locks the component for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    /// The component id, without keeping a lock.
    #[must_use]
    pub fn id(&self) -> Id {
        self.inner.read().core().id()
    }

    /// The type-erased handle to the same component.
    #[must_use]
    pub fn as_comp(&self) -> CompRef {
        self.inner.clone()
    }
}

impl<T: Comp> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Ref {
            inner: self.inner.clone(),
        }
    }
}

/// The substrate state embedded in every component.
pub struct CompCore {
    id: Id,
    self_ref: Option<WeakCompRef>,
    parent: Option<WeakCompRef>,
    attrs: BTreeMap<String, String>,
    style: Style,
    handlers: BTreeMap<EventType, Vec<Arc<dyn EventHandler>>>,
    sync_on: BTreeSet<EventType>,
    value_provider_js: String,
}

/// Handler that does nothing; registered for sync-on event types so the
/// client delivers the event (and with it the component value) at all.
struct EmptyHandler;

impl EventHandler for EmptyHandler {
    fn handle_event(&self, _ev: &mut Event) {}
}

impl CompCore {
    /// Creates a new substrate with a freshly allocated id.
    ///
    /// `value_provider_js` is the client-side expression producing the
    /// component's value for sync-on events; pass an empty string when the
    /// component has no value.
    #[must_use]
    pub fn new(value_provider_js: &str) -> CompCore {
        let id = next_id();
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), id.to_string());
        CompCore {
            id,
            self_ref: None,
            parent: None,
            attrs,
            style: Style::new(),
            handlers: BTreeMap::new(),
            sync_on: BTreeSet::new(),
            value_provider_js: value_provider_js.to_string(),
        }
    }

    /// The component id. Immutable after construction.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    pub(crate) fn set_self_ref(&mut self, weak: WeakCompRef) {
        self.self_ref = Some(weak);
    }

    /// The erased handle to the component this core belongs to.
    /// `None` only for a component never wrapped in a [`Ref`].
    #[must_use]
    pub fn self_comp(&self) -> Option<CompRef> {
        self.self_ref.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn self_weak(&self) -> Option<WeakCompRef> {
        self.self_ref.clone()
    }

    /// The parent container, if the component is in a tree.
    #[must_use]
    pub fn parent(&self) -> Option<CompRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn parent_weak(&self) -> Option<WeakCompRef> {
        self.parent.clone()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<WeakCompRef>) {
        self.parent = parent;
    }

    /// The explicitly set value of an HTML attribute (empty if unset).
    #[must_use]
    pub fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map_or("", String::as_str)
    }

    /// Sets an HTML attribute. An empty value deletes the attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.attrs.remove(name);
        } else {
            self.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// The value of an HTML attribute as an integer, `-1` if unset or not
    /// an integer.
    #[must_use]
    pub fn iattr(&self, name: &str) -> i32 {
        self.attr(name).parse().unwrap_or(-1)
    }

    /// Sets an HTML attribute from an integer.
    pub fn set_iattr(&mut self, name: &str, value: i32) {
        self.set_attr(name, &value.to_string());
    }

    /// The tool tip of the component (stored HTML-escaped in `title`).
    #[must_use]
    pub fn tooltip(&self) -> String {
        unescape_html(self.attr("title"))
    }

    /// Sets the tool tip of the component.
    pub fn set_tooltip(&mut self, tooltip: &str) {
        let escaped = escape_html(tooltip);
        self.set_attr("title", &escaped);
    }

    /// The style builder.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The style builder, mutably.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Adds an event handler for the given event types.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>, etypes: &[EventType]) {
        for &etype in etypes {
            self.handlers.entry(etype).or_default().push(handler.clone());
        }
    }

    /// Adds an event handler function for the given event types.
    pub fn add_handler_func<F>(&mut self, f: F, etypes: &[EventType])
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        self.add_handler(Arc::new(f), etypes);
    }

    /// Number of handlers registered for an event type.
    #[must_use]
    pub fn handler_count(&self, etype: EventType) -> usize {
        self.handlers.get(&etype).map_or(0, Vec::len)
    }

    /// A snapshot of the handlers of an event type, in registration order.
    ///
    /// Dispatch works from this snapshot so no component lock is held while
    /// handlers run.
    #[must_use]
    pub fn handlers_for(&self, etype: EventType) -> Vec<Arc<dyn EventHandler>> {
        self.handlers.get(&etype).cloned().unwrap_or_default()
    }

    /// Event types registered as such, in ascending code order.
    #[must_use]
    pub fn registered_etypes(&self) -> Vec<EventType> {
        self.handlers.keys().copied().collect()
    }

    /// The event types on which the component value is synced to the server.
    #[must_use]
    pub fn sync_on_etypes(&self) -> Vec<EventType> {
        self.sync_on.iter().copied().collect()
    }

    /// Adds event types on which the component value is synced to the
    /// server. Newly added types also get an empty handler registered, so
    /// the client actually delivers the event.
    pub fn add_sync_on_etypes(&mut self, etypes: &[EventType]) {
        for &etype in etypes {
            if self.sync_on.insert(etype) {
                self.add_handler(Arc::new(EmptyHandler), &[etype]);
            }
        }
    }

    /// Renders the explicitly set attributes and the style.
    pub fn render_attrs_and_style(&self, w: &mut Writer<'_>) -> io::Result<()> {
        for (name, value) in &self.attrs {
            w.write_attr(name, value)?;
        }
        self.style.render(w)
    }

    /// Renders the registered general event handlers as HTML attributes:
    /// ` onclick="se(event,0,4327,this.checked)"` and the like. The value
    /// argument is appended only when the event type is a sync-on type of a
    /// value-bearing component.
    pub fn render_ehandlers(&self, w: &mut Writer<'_>) -> io::Result<()> {
        for &etype in self.handlers.keys() {
            let Some(attr) = etype.attr_name() else {
                continue;
            };
            w.writes(" ")?;
            w.writes(attr)?;
            w.writes("=\"se(event,")?;
            w.writev(etype.code())?;
            w.writes(",")?;
            w.writev(self.id)?;
            if !self.value_provider_js.is_empty() && self.sync_on.contains(&etype) {
                w.writes(",")?;
                w.writes(&self.value_provider_js)?;
            }
            w.writes(")\"")?;
        }
        Ok(())
    }
}

/// Convenience methods available through the erased handle.
impl dyn Comp {
    /// Adds an event handler function for the given event types.
    pub fn add_handler_func<F>(&mut self, f: F, etypes: &[EventType])
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        self.core_mut().add_handler_func(f, etypes);
    }
}

/// Finds a component by id starting at (and including) `root`.
#[must_use]
pub fn comp_by_id(root: &CompRef, id: Id) -> Option<CompRef> {
    let g = root.read();
    if g.core().id() == id {
        drop(g);
        return Some(root.clone());
    }
    if let Some(cont) = g.as_container() {
        return cont.by_id(id);
    }
    None
}

/// Tells if `c` is a descendant of the component with id `ancestor_id`,
/// following parent links.
#[must_use]
pub fn descendant_of_id(c: &CompRef, ancestor_id: Id) -> bool {
    let mut cur = c.read().core().parent();
    while let Some(p) = cur {
        if p.read().core().id() == ancestor_id {
            return true;
        }
        cur = p.read().core().parent();
    }
    false
}

/// Tells if `c` is a descendant of `ancestor`.
#[must_use]
pub fn descendant_of(c: &CompRef, ancestor: &CompRef) -> bool {
    let aid = ancestor.read().core().id();
    descendant_of_id(c, aid)
}

/// Where a component's current parent lives, relative to a container about
/// to adopt it. Containers must not re-lock themselves, so the
/// same-container case is classified without upgrading the weak reference.
pub(crate) enum CurrentParent {
    /// The component has no parent.
    None,
    /// The adopting container itself is the parent.
    Adopter,
    /// Some other (locked-from-outside) container is the parent.
    Other(CompRef),
}

/// Classifies the current parent of `c` from the point of view of the
/// container owning `adopter_core`.
pub(crate) fn current_parent(adopter_core: &CompCore, c: &CompRef) -> CurrentParent {
    let Some(parent_weak) = c.read().core().parent_weak() else {
        return CurrentParent::None;
    };
    if let Some(self_weak) = adopter_core.self_weak() {
        if Weak::ptr_eq(&parent_weak, &self_weak) {
            return CurrentParent::Adopter;
        }
    }
    match parent_weak.upgrade() {
        Some(parent) => CurrentParent::Other(parent),
        None => CurrentParent::None,
    }
}

/// Removes the component from its parent container, if it has one.
/// Returns whether it was a child and was removed.
pub fn make_orphan(c: &CompRef) -> bool {
    let Some(parent) = c.read().core().parent() else {
        return false;
    };
    let mut g = parent.write();
    match g.as_container_mut() {
        Some(cont) => cont.remove(c),
        None => false,
    }
}
