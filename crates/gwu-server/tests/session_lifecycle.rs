//! Session lifecycle: auto-creation on reserved names, cookies, timeout
//! reaping and the public-window fallback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gwu_core::EventType;
use gwu_server::{HttpRequest, Server, SessionHandler};
use gwu_widgets::{Button, Comp, Label, Session, Window};

/// Builds a login window into every created session and counts callbacks.
struct CountingHandler {
    created: AtomicUsize,
    removed: AtomicUsize,
}

impl CountingHandler {
    fn new() -> Arc<CountingHandler> {
        Arc::new(CountingHandler {
            created: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
        })
    }
}

impl SessionHandler for CountingHandler {
    fn created(&self, sess: &Session) {
        self.created.fetch_add(1, Ordering::SeqCst);

        let win = Window::new("login", "Login");
        win.write().add(Label::new("Please log in").as_comp());
        sess.add_win(win).unwrap();
    }

    fn removed(&self, _sess: &Session) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}

fn extract_sess_id(set_cookie: &str) -> String {
    let rest = set_cookie
        .strip_prefix("gwu-sessid=")
        .expect("session cookie");
    rest.split(';').next().unwrap().to_string()
}

#[test]
fn reserved_name_auto_creates_a_private_session() {
    let server = Server::new("app", "localhost:0");
    let handler = CountingHandler::new();
    server.add_shandler(handler.clone());
    server.add_sess_creator_name("login", "Login");

    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    assert_eq!(resp.status, 200);

    // The handler ran exactly once, before the window was rendered.
    assert_eq!(handler.created.load(Ordering::SeqCst), 1);
    assert!(resp.body_text().contains("Please log in"));

    // The response carries the session cookie with the fresh 22-char id,
    // and the session's new flag is cleared.
    let cookie = resp.header("Set-Cookie").expect("cookie");
    let sess_id = extract_sess_id(cookie);
    assert_eq!(sess_id.len(), 22);
    assert!(cookie.contains("; Path=/app/"));
    assert!(cookie.contains("; HttpOnly"));
    assert!(cookie.contains("; Max-Age=259200"));
    assert!(!cookie.contains("; Secure"));

    let sess = server.lookup_session(&sess_id).expect("registered");
    assert!(sess.private());
    assert!(!sess.is_new());

    // Presenting the cookie reaches the same session; no new session is
    // created and no new cookie is sent.
    let resp = server.handle_request(
        &HttpRequest::get("/app/login").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert_eq!(resp.status, 200);
    assert!(resp.header("Set-Cookie").is_none());
    assert_eq!(handler.created.load(Ordering::SeqCst), 1);
}

#[test]
fn secure_mode_marks_the_cookie() {
    let server = Server::new("app", "localhost:0");
    server.set_secure(true);
    server.add_shandler(CountingHandler::new());
    server.add_sess_creator_name("login", "Login");

    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    let cookie = resp.header("Set-Cookie").expect("cookie");
    assert!(cookie.contains("; Secure"));
}

#[test]
fn timed_out_sessions_are_reaped_exactly_once() {
    let server = Server::new("app", "localhost:0");
    let handler = CountingHandler::new();
    server.add_shandler(handler.clone());
    server.add_sess_creator_name("login", "Login");

    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    let sess_id = extract_sess_id(resp.header("Set-Cookie").unwrap());
    let sess = server.lookup_session(&sess_id).unwrap();

    // Not yet expired.
    server.reap_pass(Instant::now());
    assert!(server.lookup_session(&sess_id).is_some());

    // One tick past the timeout.
    let after_timeout = Instant::now() + sess.timeout() + Duration::from_secs(1);
    server.reap_pass(after_timeout);
    assert!(server.lookup_session(&sess_id).is_none());
    assert_eq!(handler.removed.load(Ordering::SeqCst), 1);

    // Further passes (or racing removals) never re-notify.
    server.reap_pass(after_timeout);
    assert!(!server.remove_if_timed_out(&sess, after_timeout));
    assert_eq!(handler.removed.load(Ordering::SeqCst), 1);

    // The next request with the stale cookie falls back to the public
    // session (404 here: the login window only existed privately).
    let resp = server.handle_request(
        &HttpRequest::get("/app/login").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert_eq!(resp.status, 404);
}

#[test]
fn the_public_session_is_never_reaped() {
    let server = Server::new("app", "localhost:0");
    let handler = CountingHandler::new();
    server.add_shandler(handler.clone());

    let far_future = Instant::now() + Duration::from_secs(365 * 24 * 3600);
    assert!(!server.remove_if_timed_out(&server.public_session(), far_future));
    assert_eq!(handler.removed.load(Ordering::SeqCst), 0);
}

#[test]
fn private_sessions_fall_back_to_public_windows() {
    let server = Server::new("app", "localhost:0");
    server.add_shandler(CountingHandler::new());
    server.add_sess_creator_name("login", "Login");

    // A public window with a click handler that records which session's
    // lock context it ran under.
    let win = Window::new("pub", "Public");
    let button = Button::new("b");
    let seen_public: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    {
        let seen_public = seen_public.clone();
        button.write().core_mut().add_handler_func(
            move |ev| {
                if !ev.session().private() {
                    seen_public.fetch_add(1, Ordering::SeqCst);
                }
            },
            &[EventType::Click],
        );
    }
    win.write().add(button.as_comp());
    server.public_session().add_win(win).unwrap();

    // Establish a private session.
    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    let sess_id = extract_sess_id(resp.header("Set-Cookie").unwrap());

    // The public window is served even though the client is on a private
    // session…
    let resp = server.handle_request(
        &HttpRequest::get("/app/pub").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert_eq!(resp.status, 200);

    // …and events on it run against the public session.
    let resp = server.handle_request(
        &HttpRequest::post("/app/pub/e", &format!("et=0&cid={}", button.id()))
            .with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert_eq!(resp.status, 200);
    assert_eq!(seen_public.load(Ordering::SeqCst), 1);
}

#[test]
fn session_check_reports_remaining_without_touching_access() {
    let server = Server::new("app", "localhost:0");
    server.add_shandler(CountingHandler::new());
    server.add_sess_creator_name("login", "Login");

    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    let sess_id = extract_sess_id(resp.header("Set-Cookie").unwrap());
    let sess = server.lookup_session(&sess_id).unwrap();
    let accessed_before = sess.accessed();

    let resp = server.handle_request(
        &HttpRequest::get("/app/_sess_ch").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert_eq!(resp.status, 200);
    let remaining: f64 = resp.body_text().parse().expect("float body");
    assert!(remaining > 0.0);
    assert!(remaining <= sess.timeout().as_secs_f64());

    // The session-check path must not extend the session.
    assert_eq!(sess.accessed(), accessed_before);

    // A window request does register an access.
    server.handle_request(
        &HttpRequest::get("/app/login").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    assert!(sess.accessed() >= accessed_before);
}

#[test]
fn window_list_shows_creators_and_windows() {
    let server = Server::new("app", "localhost:0");
    server.set_text("Demo");
    server.add_shandler(CountingHandler::new());
    server.add_sess_creator_name("login", "Login here");

    let win = Window::new("pub", "A Public Window");
    server.public_session().add_win(win).unwrap();

    // Anonymous: creators plus public windows.
    let resp = server.handle_request(&HttpRequest::get("/app/"));
    assert_eq!(resp.status, 200);
    let body = resp.body_text();
    assert!(body.contains("Demo - Window List"));
    assert!(body.contains("Session creators:"));
    assert!(body.contains("Login here"));
    assert!(body.contains("Public windows:"));
    assert!(body.contains("A Public Window"));
    assert!(body.contains("href=\"/app/pub\""));

    // On a private session: authenticated windows appear, creators do not.
    let resp = server.handle_request(&HttpRequest::get("/app/login"));
    let sess_id = extract_sess_id(resp.header("Set-Cookie").unwrap());
    let resp = server.handle_request(
        &HttpRequest::get("/app/").with_header("Cookie", &format!("gwu-sessid={sess_id}")),
    );
    let body = resp.body_text();
    assert!(body.contains("Authenticated windows:"));
    assert!(!body.contains("Session creators:"));
}

#[test]
fn custom_app_root_handler_takes_over() {
    let server = Server::new("app", "localhost:0");
    server.set_app_root_handler(|_req, sess| {
        let kind = if sess.private() { "private" } else { "public" };
        gwu_server::HttpResponse::html(format!("<html>custom root ({kind})</html>").into_bytes())
    });

    let resp = server.handle_request(&HttpRequest::get("/app/"));
    assert_eq!(resp.body_text(), "<html>custom root (public)</html>");
}

#[test]
fn duplicate_and_empty_window_names_are_rejected() {
    let server = Server::new("app", "localhost:0");
    let public = server.public_session();

    public.add_win(Window::new("w", "First")).unwrap();
    let dup = public.add_win(Window::new("w", "Second"));
    assert!(dup.is_err());

    let empty = public.add_win(Window::new("", "Anon"));
    assert!(empty.is_err());
}
