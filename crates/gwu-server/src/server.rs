//! The GUI server: session registry, request routing, window rendering
//! and the session reaper.

use std::collections::HashMap;
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde_json::json;
use tracing::{debug, error, info, warn};

use gwu_core::wire;
use gwu_style::font_weight;
use gwu_widgets::{Comp, Label, Link, Ref, RenderEnv, Session, SessionRegistry, Window};

use crate::assets;
use crate::error::ServerError;
use crate::http::{
    expires_in_72h, read_request, write_response, HttpRequest, HttpResponse,
};
use crate::proto::{self, render_to_vec};
use crate::telemetry::TelemetrySink;

/// How often the reaper scans for timed-out sessions.
const SESS_REAP_PERIOD: Duration = Duration::from_secs(10);

/// Max age of the session id cookie, in seconds (72 hours).
const SESS_COOKIE_MAX_AGE: u32 = 72 * 60 * 60;

/// Callbacks for session lifecycle events.
pub trait SessionHandler: Send + Sync {
    /// Called when a new session is created, before the window is served.
    /// This is the place to build and add the session's windows; at this
    /// time the client does not yet know about the session.
    fn created(&self, sess: &Session) {
        let _ = sess;
    }

    /// Called when a session is being removed from the server; afterwards
    /// its id is invalid.
    fn removed(&self, sess: &Session) {
        let _ = sess;
    }
}

/// Handler of the application root (no window name in the URL).
pub type AppRootHandlerFunc = dyn Fn(&HttpRequest, &Session) -> HttpResponse + Send + Sync;

pub(crate) struct ServerInner {
    pub(crate) app_name: String,
    pub(crate) addr: String,
    pub(crate) secure: RwLock<bool>,
    pub(crate) app_path: String,
    pub(crate) public_sess: Session,
    pub(crate) sessions: RwLock<HashMap<String, Session>>,
    /// Session-creator window names with their link texts, in registration
    /// order.
    pub(crate) sess_creator_names: RwLock<Vec<(String, String)>>,
    pub(crate) session_handlers: RwLock<Vec<Arc<dyn SessionHandler>>>,
    pub(crate) theme: RwLock<String>,
    /// Server title, used on the window list page.
    pub(crate) text: RwLock<String>,
    /// Extra headers added to every response.
    pub(crate) headers: RwLock<Vec<(String, String)>>,
    /// Extra head HTML of the window list page.
    pub(crate) root_heads: RwLock<Vec<String>>,
    pub(crate) static_dirs: RwLock<Vec<(String, PathBuf)>>,
    pub(crate) app_root_handler: RwLock<Option<Arc<AppRootHandlerFunc>>>,
    pub(crate) telemetry: Mutex<TelemetrySink>,
}

/// The GUI server: holds the public session and the private session
/// registry, serves windows, dispatches events and re-renders components.
///
/// Cheap to clone; clones share the same server state.
#[derive(Clone)]
pub struct Server {
    inner: Arc<ServerInner>,
}

impl Server {
    /// Creates a new server. The app name becomes the first segment of the
    /// application path; pass an empty string to mount the server at `/`.
    /// An empty `addr` defaults to `localhost:3434`.
    #[must_use]
    pub fn new(app_name: &str, addr: &str) -> Server {
        let addr = if addr.is_empty() {
            "localhost:3434"
        } else {
            addr
        };
        let app_path = if app_name.is_empty() {
            "/".to_string()
        } else {
            format!("/{app_name}/")
        };

        Server {
            inner: Arc::new(ServerInner {
                app_name: app_name.to_string(),
                addr: addr.to_string(),
                secure: RwLock::new(false),
                app_path,
                public_sess: Session::new_public(),
                sessions: RwLock::new(HashMap::new()),
                sess_creator_names: RwLock::new(Vec::new()),
                session_handlers: RwLock::new(Vec::new()),
                theme: RwLock::new(wire::THEME_DEFAULT.to_string()),
                text: RwLock::new(String::new()),
                headers: RwLock::new(Vec::new()),
                root_heads: RwLock::new(Vec::new()),
                static_dirs: RwLock::new(Vec::new()),
                app_root_handler: RwLock::new(None),
                telemetry: Mutex::new(TelemetrySink::disabled()),
            }),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<ServerInner> {
        &self.inner
    }

    /// Tells if the server is marked secure (behind TLS termination):
    /// session cookies carry `Secure` and the app URL scheme is `https`.
    #[must_use]
    pub fn secure(&self) -> bool {
        *self.inner.secure.read()
    }

    /// Marks the server as running behind TLS termination.
    pub fn set_secure(&self, secure: bool) {
        *self.inner.secure.write() = secure;
    }

    /// The application URL.
    #[must_use]
    pub fn app_url(&self) -> String {
        let scheme = if self.secure() { "https" } else { "http" };
        format!("{scheme}://{}{}", self.inner.addr, self.inner.app_path)
    }

    /// The application path (always with a trailing slash).
    #[must_use]
    pub fn app_path(&self) -> &str {
        &self.inner.app_path
    }

    /// The application name; empty when the server is mounted at the root.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }

    /// The server title, shown on the window list page.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.text.read().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.inner.text.write() = text.to_string();
    }

    /// The default CSS theme of the server.
    #[must_use]
    pub fn theme(&self) -> String {
        self.inner.theme.read().clone()
    }

    pub fn set_theme(&self, theme: &str) {
        *self.inner.theme.write() = theme.to_string();
    }

    /// The shared public session.
    #[must_use]
    pub fn public_session(&self) -> Session {
        self.inner.public_sess.clone()
    }

    /// Registers a not-yet-existing window name whose URL auto-creates a
    /// new private session before the window is served. A registered
    /// [`SessionHandler`] builds the window into the new session in its
    /// `created` callback. The link text is shown on the window list (when
    /// non-empty).
    ///
    /// A typical use is pre-registering a login window.
    pub fn add_sess_creator_name(&self, name: &str, text: &str) {
        if name.is_empty() {
            return;
        }
        self.inner
            .sess_creator_names
            .write()
            .push((name.to_string(), text.to_string()));
    }

    /// Adds a session lifecycle handler.
    pub fn add_shandler(&self, handler: Arc<dyn SessionHandler>) {
        self.inner.session_handlers.write().push(handler);
    }

    /// Sets extra HTTP headers added to every response, including static
    /// content. Replaces previously set extra headers.
    pub fn set_headers(&self, headers: &[(&str, &str)]) {
        *self.inner.headers.write() = headers
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
    }

    /// The extra headers added to every response.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        self.inner.headers.read().clone()
    }

    /// Registers a directory whose files are served under the given
    /// app-relative path prefix. The names of the internal paths are
    /// reserved and rejected.
    pub fn add_static_dir(&self, path: &str, dir: &str) -> Result<(), ServerError> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return Err(ServerError::EmptyStaticPath);
        }

        let mut prefix = path.to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }

        if prefix == wire::PATH_STATIC || path == wire::PATH_SESS_CHECK {
            return Err(ServerError::ReservedStaticPath(path.to_string()));
        }

        self.inner
            .static_dirs
            .write()
            .push((prefix, PathBuf::from(dir)));
        Ok(())
    }

    /// Adds an HTML fragment to the `<head>` of the window list page.
    /// Ignored when the app root is taken over with a custom handler.
    pub fn add_root_head_html(&self, html: &str) {
        self.inner.root_heads.write().push(html.to_string());
    }

    /// Removes a previously added window-list head fragment.
    pub fn remove_root_head_html(&self, html: &str) {
        let mut heads = self.inner.root_heads.write();
        if let Some(pos) = heads.iter().position(|h| h == html) {
            heads.remove(pos);
        }
    }

    /// Takes over the application root (the window list page).
    pub fn set_app_root_handler<F>(&self, f: F)
    where
        F: Fn(&HttpRequest, &Session) -> HttpResponse + Send + Sync + 'static,
    {
        *self.inner.app_root_handler.write() = Some(Arc::new(f));
    }

    /// Enables JSONL telemetry, appending to the given file.
    pub fn set_telemetry_path(&self, path: &str) -> Result<(), ServerError> {
        let sink = TelemetrySink::new(Some(Path::new(path)))?;
        *self.inner.telemetry.lock() = sink;
        Ok(())
    }

    /// Looks up a private session by id.
    #[must_use]
    pub fn lookup_session(&self, id: &str) -> Option<Session> {
        self.inner.sessions.read().get(id).cloned()
    }

    /// Removes the session iff it has not been accessed for longer than
    /// its timeout, measured at `now`. Returns whether this call removed
    /// it; a session already gone reports `false`, and the removal
    /// handlers of a session run exactly once.
    pub fn remove_if_timed_out(&self, sess: &Session, now: Instant) -> bool {
        sess.timed_out(now) && self.inner.remove_session(sess)
    }

    /// One reaper pass over the registry. Runs without taking any
    /// per-session tree lock; it only reads the accessed times.
    pub fn reap_pass(&self, now: Instant) {
        let sessions: Vec<Session> = self.inner.sessions.read().values().cloned().collect();
        for sess in sessions {
            if self.remove_if_timed_out(&sess, now) {
                debug!(sess_id = %sess.id(), "session reaped");
            }
        }
    }

    /// Starts the server: binds the address, spawns the session reaper and
    /// serves incoming connections until the process exits.
    pub fn start(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.inner.addr)?;
        info!(url = %self.app_url(), "starting GUI server");
        self.spawn_reaper();
        self.serve(listener)
    }

    /// Serves connections from an already bound listener. Split from
    /// [`start`](Server::start) so callers can bind an ephemeral port.
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    let spawned = thread::Builder::new()
                        .name("gwu-conn".to_string())
                        .spawn(move || handle_connection(&server, stream));
                    if let Err(e) = spawned {
                        error!(error = %e, "failed to spawn connection thread");
                    }
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        Ok(())
    }

    /// Spawns the background session reaper.
    pub fn spawn_reaper(&self) {
        let server = self.clone();
        let spawned = thread::Builder::new()
            .name("gwu-sess-reaper".to_string())
            .spawn(move || loop {
                thread::sleep(SESS_REAP_PERIOD);
                server.reap_pass(Instant::now());
            });
        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn session reaper");
        }
    }

    /// Handles one parsed request and produces the response. Public so
    /// embedders and tests can drive the server without a socket.
    pub fn handle_request(&self, req: &HttpRequest) -> HttpResponse {
        debug!(method = %req.method, path = %req.path, "incoming");

        let mut resp = self.route(req);
        for (name, value) in self.inner.headers.read().iter() {
            resp = resp.with_header(name, value);
        }
        resp
    }

    fn route(&self, req: &HttpRequest) -> HttpResponse {
        let app_path = &self.inner.app_path;

        // "/app" counts as the app root of "/app/".
        let rel = if req.path.len() + 1 == app_path.len() && app_path.starts_with(&req.path) {
            ""
        } else if let Some(rel) = req.path.strip_prefix(app_path.as_str()) {
            rel
        } else {
            return HttpResponse::error(404, "not found");
        };

        // Resolve the session from the cookie; unknown or absent ids fall
        // back to the shared public session.
        let mut sess = req
            .cookie(wire::SESS_ID_COOKIE)
            .and_then(|id| self.lookup_session(&id))
            .unwrap_or_else(|| self.inner.public_sess.clone());

        if let Some(res) = rel.strip_prefix(wire::PATH_STATIC) {
            return serve_bundled_static(res);
        }

        let (first, sub) = match rel.split_once('/') {
            Some((first, sub)) => (first, sub),
            None => (rel, ""),
        };

        if first == wire::PATH_SESS_CHECK {
            // Must not register an access: polling the remaining time would
            // otherwise keep the session alive forever.
            let remaining = {
                let _guard = sess.rw_lock().read();
                sess.remaining_secs(Instant::now())
            };
            return HttpResponse::text(format!("{remaining:.6}").into_bytes());
        }

        if let Some(resp) = self.serve_static_dir(rel) {
            return resp;
        }

        if first.is_empty() {
            let handler = self.inner.app_root_handler.read().clone();
            return match handler {
                Some(handler) => handler(req, &sess),
                None => self.render_win_list(&sess),
            };
        }

        // Window resolution: the session's own windows first; a private
        // session falls back to the public windows (and then the event
        // lock used is the public session's).
        let win_name = first;
        let mut win = sess.win_by_name(win_name);
        if win.is_none() && sess.private() {
            if let Some(public_win) = self.inner.public_sess.win_by_name(win_name) {
                win = Some(public_win);
                sess = self.inner.public_sess.clone();
            }
        }

        // No private session yet: a session-creator name creates one
        // before serving, so its handlers can populate the windows.
        let mut set_cookie = None;
        if win.is_none() && !sess.private() {
            let is_creator = self
                .inner
                .sess_creator_names
                .read()
                .iter()
                .any(|(n, _)| n == win_name);
            if is_creator {
                let new_sess = self.inner.create_session();
                set_cookie = Some(self.sess_cookie(&new_sess));
                new_sess.clear_new();
                win = new_sess.win_by_name(win_name);
                sess = new_sess;
            }
        }

        let Some(win) = win else {
            let body = format!(
                "<html><body>Window for name <b>'{win_name}'</b> not found. \
                 See the <a href=\"{app_path}\">Window list</a>.</body></html>"
            );
            return HttpResponse::new(404)
                .with_header("Content-Type", "text/html; charset=utf-8")
                .with_body(body.into_bytes());
        };

        sess.access();

        let resp = match sub {
            wire::PATH_EVENT => {
                let _guard = sess.rw_lock().write();
                proto::handle_event(self, &sess, &win, req)
            }
            wire::PATH_RENDER_COMP => {
                let _guard = sess.rw_lock().read();
                proto::render_comp(&win, req)
            }
            _ => {
                let _guard = sess.rw_lock().read();
                self.render_window(&win)
            }
        };

        match set_cookie {
            Some(cookie) => resp.with_header("Set-Cookie", &cookie),
            None => resp,
        }
    }

    /// The session id cookie line for a (new) session.
    pub(crate) fn sess_cookie(&self, sess: &Session) -> String {
        // HttpOnly keeps scripts away from the id; Secure restricts it to
        // HTTPS when the server is marked secure.
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly",
            wire::SESS_ID_COOKIE,
            sess.id(),
            self.inner.app_path
        );
        if self.secure() {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; Max-Age={SESS_COOKIE_MAX_AGE}"));
        cookie
    }

    fn render_window(&self, win: &Ref<Window>) -> HttpResponse {
        let theme = self.theme();
        let env = RenderEnv {
            app_path: &self.inner.app_path,
            theme: &theme,
        };
        let body = render_to_vec(|w| win.read().render_win(w, &env));
        HttpResponse::html(body)
    }

    /// The default app-root page: a window list with links to session
    /// creators, public windows and (on a private session) private windows.
    fn render_win_list(&self, sess: &Session) -> HttpResponse {
        debug!("rendering window list");

        let text = self.text();
        let win = Window::new("windowList", &format!("{text} - Window List"));
        {
            let mut g = win.write();
            for head in self.inner.root_heads.read().iter() {
                g.add_head_html(head);
            }

            let title = Label::new(&format!("{text} - Window List"));
            title
                .write()
                .core_mut()
                .style_mut()
                .set_font_weight(font_weight::BOLD)
                .set_font_size("1.3em");
            g.add(title.as_comp());
        }

        let add_links = |win: &Ref<Window>, section: &str, items: &[(String, String)]| {
            if items.is_empty() {
                return;
            }
            let mut g = win.write();
            g.panel_mut().add_vspace(10);
            g.add(Label::new(section).as_comp());
            for (name, text) in items {
                let link = Link::new(text, &format!("{}{}", self.inner.app_path, name));
                link.write()
                    .core_mut()
                    .style_mut()
                    .set_padding_left_px(20);
                g.add(link.as_comp());
            }
        };

        if !sess.private() {
            let creators: Vec<(String, String)> = self
                .inner
                .sess_creator_names
                .read()
                .iter()
                .filter(|(_, text)| !text.is_empty())
                .cloned()
                .collect();
            add_links(&win, "Session creators:", &creators);
        }

        let mut sections: Vec<(&str, Session)> = Vec::new();
        if sess.private() {
            sections.push(("Authenticated windows:", sess.clone()));
        }
        sections.push(("Public windows:", self.inner.public_sess.clone()));

        for (section, session) in sections {
            let items: Vec<(String, String)> = session
                .sorted_wins()
                .iter()
                .map(|w| {
                    let g = w.read();
                    (g.name().to_string(), g.text().to_string())
                })
                .collect();
            add_links(&win, section, &items);
        }

        let theme = self.theme();
        let env = RenderEnv {
            app_path: &self.inner.app_path,
            theme: &theme,
        };
        let body = render_to_vec(|w| win.read().render_win(w, &env));
        HttpResponse::html(body)
    }

    fn serve_static_dir(&self, rel: &str) -> Option<HttpResponse> {
        let dirs = self.inner.static_dirs.read();
        for (prefix, dir) in dirs.iter() {
            let Some(file_rel) = rel.strip_prefix(prefix.as_str()) else {
                continue;
            };

            // No escaping the registered directory.
            if file_rel.split('/').any(|part| part == "..") || file_rel.starts_with('/') {
                return Some(HttpResponse::error(400, "invalid path"));
            }

            let path = dir.join(file_rel);
            return Some(match std::fs::read(&path) {
                Ok(content) => HttpResponse::new(200)
                    .with_header("Content-Type", content_type_for(&path))
                    .with_body(content),
                Err(_) => HttpResponse::error(404, "not found"),
            });
        }
        None
    }
}

impl ServerInner {
    /// Creates, registers and logs a new private session, then notifies
    /// the session handlers in registration order.
    pub(crate) fn create_session(&self) -> Session {
        let sess = Session::new_private();
        self.sessions
            .write()
            .insert(sess.id().to_string(), sess.clone());

        info!(sess_id = %sess.id(), "session created");
        let _ = self
            .telemetry
            .lock()
            .write("session_created", json!({ "sess_id": sess.id() }));

        let handlers = self.session_handlers.read().clone();
        for handler in handlers {
            handler.created(&sess);
        }

        sess
    }

    /// Removes a private session; a no-op for the public session. The
    /// removal handlers run exactly once even under concurrent removal
    /// attempts (the map removal decides the winner). Returns whether this
    /// call was the one that removed the session.
    pub(crate) fn remove_session(&self, sess: &Session) -> bool {
        if !sess.private() {
            return false;
        }

        let removed = self.sessions.write().remove(sess.id());
        if removed.is_none() {
            return false;
        }

        info!(sess_id = %sess.id(), "session removed");
        let _ = self
            .telemetry
            .lock()
            .write("session_removed", json!({ "sess_id": sess.id() }));

        let handlers = self.session_handlers.read().clone();
        for handler in handlers {
            handler.removed(sess);
        }
        true
    }
}

impl SessionRegistry for ServerInner {
    fn create_session(&self) -> Session {
        ServerInner::create_session(self)
    }

    fn remove_session(&self, sess: &Session) {
        ServerInner::remove_session(self, sess);
    }

    fn public_session(&self) -> Session {
        self.public_sess.clone()
    }
}

fn handle_connection(server: &Server, mut stream: TcpStream) {
    match read_request(&mut stream) {
        Ok(req) => {
            let resp = server.handle_request(&req);
            if let Err(e) = write_response(&mut stream, &resp) {
                debug!(error = %e, "failed to write response");
            }
        }
        Err(e) => {
            debug!(error = %e, "failed to read request");
            let resp = HttpResponse::error(400, "bad request");
            let _ = write_response(&mut stream, &resp);
        }
    }
}

fn serve_bundled_static(res: &str) -> HttpResponse {
    if res == wire::res_name_static_js() {
        return HttpResponse::new(200)
            .with_header("Expires", &expires_in_72h())
            .with_header("Content-Type", "application/x-javascript; charset=utf-8")
            .with_body(assets::static_js().as_bytes().to_vec());
    }

    if res.ends_with(".css") {
        if let Some(css) = assets::static_css(res) {
            return HttpResponse::new(200)
                .with_header("Expires", &expires_in_72h())
                .with_header("Content-Type", "text/css; charset=utf-8")
                .with_body(css.as_bytes().to_vec());
        }
    }

    HttpResponse::error(404, "not found")
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/x-javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_paths() {
        let root = Server::new("", "");
        assert_eq!(root.app_path(), "/");
        assert_eq!(root.app_url(), "http://localhost:3434/");

        let named = Server::new("demo", "localhost:8081");
        assert_eq!(named.app_path(), "/demo/");
        assert_eq!(named.app_url(), "http://localhost:8081/demo/");
        named.set_secure(true);
        assert_eq!(named.app_url(), "https://localhost:8081/demo/");
    }

    #[test]
    fn reserved_static_prefixes_rejected() {
        let server = Server::new("", "");
        assert!(matches!(
            server.add_static_dir("_gwu_static", "/tmp"),
            Err(ServerError::ReservedStaticPath(_))
        ));
        assert!(matches!(
            server.add_static_dir("_sess_ch", "/tmp"),
            Err(ServerError::ReservedStaticPath(_))
        ));
        assert!(matches!(
            server.add_static_dir("", "/tmp"),
            Err(ServerError::EmptyStaticPath)
        ));
        assert!(server.add_static_dir("img", "/tmp").is_ok());
    }

    #[test]
    fn extra_headers_on_all_responses() {
        let server = Server::new("", "");
        server.set_headers(&[("X-Server", "gwu")]);
        let resp = server.handle_request(&HttpRequest::get("/_gwu_static/nope"));
        assert_eq!(resp.header("X-Server"), Some("gwu"));
    }
}
