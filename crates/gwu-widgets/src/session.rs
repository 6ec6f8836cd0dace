//! Sessions: identified collections of windows and attributes, scoped to a
//! client (private) or to all unidentified clients (public).
//!
//! There is exactly one public session per server, shared by every client
//! that presents no session cookie. Anonymous state is therefore global,
//! and the public session's write lock serializes all public-window event
//! handling across all anonymous clients.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::{Mutex, RwLock};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::comp::Ref;
use crate::window::Window;

/// Default session timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Number of symbols session ids are drawn from. Must be a power of two so
/// masking a uniformly random byte keeps the distribution uniform.
const ID_SYMBOL_COUNT: usize = 64;

/// URL-safe symbols used for session ids.
const ID_SYMBOLS: &[u8; ID_SYMBOL_COUNT] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

const _: () = assert!(ID_SYMBOL_COUNT.is_power_of_two());

/// Length of private session ids.
const ID_LENGTH: usize = 22;

/// Error adding a window to a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The window name is the empty string.
    #[error("window name cannot be the empty string")]
    EmptyWinName,
    /// A window with the same name is already in the session.
    #[error("a window named {0:?} has already been added")]
    DuplicateWinName(String),
}

struct SessionInner {
    /// Empty string for the public session, a random token otherwise.
    id: String,
    created: SystemTime,
    accessed: Mutex<Instant>,
    /// True until the client has been told the session cookie.
    is_new: AtomicBool,
    timeout: Mutex<Duration>,
    windows: Mutex<HashMap<String, Ref<Window>>>,
    attrs: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
    /// Guards the whole component tree rooted at the session's windows.
    /// Event dispatch holds it for writing, rendering for reading; the
    /// fields above carry their own fine-grained locks so the reaper can
    /// read `accessed` without it.
    rw: RwLock<()>,
}

/// A session handle. Cheap to clone; all clones refer to the same session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Creates the shared public session. Called by the server; there is
    /// one public session per server.
    #[must_use]
    pub fn new_public() -> Session {
        Session::new(String::new(), false)
    }

    /// Creates a new private session with a fresh random id, marked new.
    /// Called by the server's session registry.
    #[must_use]
    pub fn new_private() -> Session {
        Session::new(gen_session_id(), true)
    }

    fn new(id: String, is_new: bool) -> Session {
        Session {
            inner: Arc::new(SessionInner {
                id,
                created: SystemTime::now(),
                accessed: Mutex::new(Instant::now()),
                is_new: AtomicBool::new(is_new),
                timeout: Mutex::new(DEFAULT_TIMEOUT),
                windows: Mutex::new(HashMap::new()),
                attrs: Mutex::new(HashMap::new()),
                rw: RwLock::new(()),
            }),
        }
    }

    /// The id of the session; empty for the public session.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Tells if the client does not yet know about this session (no cookie
    /// has been sent).
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.inner.is_new.load(Ordering::Relaxed)
    }

    /// Tells if this is a private session. There is only one non-private
    /// (public) session, shared between the sessionless clients.
    #[must_use]
    pub fn private(&self) -> bool {
        !self.inner.id.is_empty()
    }

    /// Adds a window to the session. Fails on an empty or duplicate name.
    pub fn add_win(&self, win: Ref<Window>) -> Result<(), SessionError> {
        let name = win.read().name().to_string();
        if name.is_empty() {
            return Err(SessionError::EmptyWinName);
        }

        let mut windows = self.inner.windows.lock();
        if windows.contains_key(&name) {
            return Err(SessionError::DuplicateWinName(name));
        }
        windows.insert(name, win);
        Ok(())
    }

    /// Removes a window from the session. Returns whether the window was in
    /// the session and was removed.
    pub fn remove_win(&self, win: &Ref<Window>) -> bool {
        let mut windows = self.inner.windows.lock();
        let name = win.read().name().to_string();
        let is_stored = windows
            .get(&name)
            .is_some_and(|stored| stored.id() == win.id());
        if is_stored {
            windows.remove(&name);
        }
        is_stored
    }

    /// The windows of the session, sorted by window title.
    #[must_use]
    pub fn sorted_wins(&self) -> Vec<Ref<Window>> {
        let mut wins: Vec<Ref<Window>> = self.inner.windows.lock().values().cloned().collect();
        wins.sort_by_key(|w| w.read().text().to_string());
        wins
    }

    /// Returns the window with the given name, if any.
    #[must_use]
    pub fn win_by_name(&self, name: &str) -> Option<Ref<Window>> {
        self.inner.windows.lock().get(name).cloned()
    }

    /// The value of a session attribute, if set.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.inner.attrs.lock().get(name).cloned()
    }

    /// Sets a session attribute. Pass `None` to delete it.
    pub fn set_attr(&self, name: &str, value: Option<Arc<dyn Any + Send + Sync>>) {
        let mut attrs = self.inner.attrs.lock();
        match value {
            Some(v) => {
                attrs.insert(name.to_string(), v);
            }
            None => {
                attrs.remove(name);
            }
        }
    }

    /// When the session was created.
    #[must_use]
    pub fn created(&self) -> SystemTime {
        self.inner.created
    }

    /// When the session was last accessed.
    #[must_use]
    pub fn accessed(&self) -> Instant {
        *self.inner.accessed.lock()
    }

    /// The session timeout. A private session not accessed for this long is
    /// subject to removal by the server's reaper.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        *self.inner.timeout.lock()
    }

    /// Sets the session timeout.
    pub fn set_timeout(&self, timeout: Duration) {
        *self.inner.timeout.lock() = timeout;
    }

    /// Seconds remaining until the session times out, measured at `now`.
    /// Negative once expired. Does not register an access.
    #[must_use]
    pub fn remaining_secs(&self, now: Instant) -> f64 {
        self.timeout().as_secs_f64() - now.duration_since(self.accessed()).as_secs_f64()
    }

    /// Tells if the session has not been accessed for longer than its
    /// timeout, measured at `now`. The public session never expires.
    #[must_use]
    pub fn timed_out(&self, now: Instant) -> bool {
        self.private() && now.duration_since(self.accessed()) > self.timeout()
    }

    /// Registers an access to the session. Called by the server at the
    /// start of request handling, except for the session-check path, which
    /// must not extend the session.
    pub fn access(&self) {
        *self.inner.accessed.lock() = Instant::now();
    }

    /// Clears the new flag; called once the session cookie has been sent.
    pub fn clear_new(&self) {
        self.inner.is_new.store(false, Ordering::Relaxed);
    }

    /// The read-write lock guarding the component tree rooted at this
    /// session's windows. The server holds it for writing across event
    /// dispatch and for reading across renders.
    #[must_use]
    pub fn rw_lock(&self) -> &RwLock<()> {
        &self.inner.rw
    }

    /// Tells if two handles refer to the same session.
    #[must_use]
    pub fn same_as(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Generates a 22-symbol session id from OS randomness. Each symbol is one
/// uniformly random byte masked down to the 64-symbol alphabet.
fn gen_session_id() -> String {
    let mut bytes = [0u8; ID_LENGTH];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|&b| ID_SYMBOLS[(b & (ID_SYMBOL_COUNT - 1) as u8) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_shape() {
        let id = gen_session_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_SYMBOLS.contains(&b)));

        // Two draws colliding would mean something is badly broken.
        assert_ne!(gen_session_id(), gen_session_id());
    }

    #[test]
    fn public_vs_private() {
        let public = Session::new_public();
        assert!(!public.private());
        assert!(!public.is_new());
        assert_eq!(public.id(), "");

        let private = Session::new_private();
        assert!(private.private());
        assert!(private.is_new());
        assert_eq!(private.id().len(), ID_LENGTH);
        private.clear_new();
        assert!(!private.is_new());
    }

    #[test]
    fn public_never_times_out() {
        let public = Session::new_public();
        let long_after = Instant::now() + Duration::from_secs(365 * 24 * 3600);
        assert!(!public.timed_out(long_after));

        let private = Session::new_private();
        assert!(!private.timed_out(Instant::now()));
        assert!(private.timed_out(long_after));
    }

    #[test]
    fn timeout_is_configurable() {
        let sess = Session::new_private();
        assert_eq!(sess.timeout(), DEFAULT_TIMEOUT);
        sess.set_timeout(Duration::from_secs(60));
        assert!(sess.timed_out(Instant::now() + Duration::from_secs(61)));
        assert!(!sess.timed_out(Instant::now() + Duration::from_secs(30)));
    }

    #[test]
    fn attrs_store_and_delete() {
        let sess = Session::new_public();
        sess.set_attr("user", Some(Arc::new("alice".to_string())));
        let got = sess.attr("user").unwrap();
        assert_eq!(got.downcast_ref::<String>().unwrap(), "alice");

        sess.set_attr("user", None);
        assert!(sess.attr("user").is_none());
    }
}
