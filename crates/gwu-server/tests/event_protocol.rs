//! End-to-end event protocol: decoding, dispatch, and the response action
//! encoding, driven through the server's request handler.

use gwu_core::EventType;
use gwu_server::{HttpRequest, Server};
use gwu_widgets::{Button, Comp, Label, Panel, Ref, Window};

/// A server with one public window holding a counter button: clicking
/// appends `!` to its text and marks it dirty.
fn counter_server() -> (Server, Ref<Button>) {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let button = Button::new("count");
    {
        let handle = button.clone();
        button.write().core_mut().add_handler_func(
            move |ev| {
                let mut b = handle.write();
                let text = format!("{}!", b.text());
                b.set_text(&text);
                drop(b);
                ev.mark_dirty(&handle.as_comp());
            },
            &[EventType::Click],
        );
    }
    win.write().add(button.as_comp());

    server.public_session().add_win(win).unwrap();
    (server, button)
}

#[test]
fn click_marks_dirty_and_rerender_shows_the_change() {
    let (server, button) = counter_server();
    let id = button.id();

    let resp = server.handle_request(&HttpRequest::post("/app/w/e", &format!("et=0&cid={id}")));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("Content-Type"), Some("text/plain; charset=utf-8"));
    assert_eq!(resp.body_text(), format!("2,{id}"));

    let resp = server.handle_request(&HttpRequest::post("/app/w/rc", &format!("cid={id}")));
    assert_eq!(resp.status, 200);
    let html = resp.body_text();
    assert!(html.contains("count!"));
    assert!(html.starts_with("<button"));
}

#[test]
fn no_side_effects_encode_as_noop() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");
    let label = Label::new("passive");
    label
        .write()
        .core_mut()
        .add_handler_func(|_| {}, &[EventType::Click]);
    win.write().add(label.as_comp());
    server.public_session().add_win(win).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", label.id()),
    ));
    assert_eq!(resp.body_text(), "0");
}

#[test]
fn reload_dominates_all_other_actions() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let x = Label::new("x");
    let y = Label::new("y");
    let button = Button::new("go");
    {
        let x = x.clone();
        let y = y.clone();
        let b = button.clone();
        button.write().core_mut().add_handler_func(
            move |ev| {
                ev.mark_dirty(&x.as_comp());
                ev.reload_win("main");
                ev.mark_dirty(&y.as_comp());
                ev.set_focused_comp(&b.as_comp());
            },
            &[EventType::Click],
        );
    }
    {
        let mut g = win.write();
        g.add(x.as_comp());
        g.add(y.as_comp());
        g.add(button.as_comp());
    }
    server.public_session().add_win(win).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", button.id()),
    ));
    assert_eq!(resp.body_text(), "1,main");
}

#[test]
fn focus_action_and_window_focus_record() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let target = Label::new("focus me");
    let button = Button::new("go");
    {
        let target = target.clone();
        button.write().core_mut().add_handler_func(
            move |ev| ev.set_focused_comp(&target.as_comp()),
            &[EventType::Click],
        );
    }
    win.write().add(target.as_comp());
    win.write().add(button.as_comp());
    server.public_session().add_win(win.clone()).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", button.id()),
    ));
    assert_eq!(resp.body_text(), format!("3,{}", target.id()));
    assert_eq!(win.read().focused_comp_id(), target.id());
}

#[test]
fn dirty_and_focus_are_semicolon_separated() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let dirty = Label::new("dirty");
    let button = Button::new("go");
    {
        let dirty = dirty.clone();
        let b = button.clone();
        button.write().core_mut().add_handler_func(
            move |ev| {
                ev.mark_dirty(&dirty.as_comp());
                ev.set_focused_comp(&b.as_comp());
            },
            &[EventType::Click],
        );
    }
    win.write().add(dirty.as_comp());
    win.write().add(button.as_comp());
    server.public_session().add_win(win).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", button.id()),
    ));
    assert_eq!(
        resp.body_text(),
        format!("2,{};3,{}", dirty.id(), button.id())
    );
}

#[test]
fn ancestor_absorption_in_the_encoded_response() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let parent = Panel::new();
    let child = Panel::new();
    let grandchild = Label::new("g");
    child.write().add(grandchild.as_comp());
    parent.write().add(child.as_comp());

    let button = Button::new("go");
    {
        let parent = parent.clone();
        let grandchild = grandchild.clone();
        button.write().core_mut().add_handler_func(
            move |ev| {
                ev.mark_dirty(&grandchild.as_comp());
                ev.mark_dirty(&parent.as_comp());
            },
            &[EventType::Click],
        );
    }
    win.write().add(parent.as_comp());
    win.write().add(button.as_comp());
    server.public_session().add_win(win).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", button.id()),
    ));
    assert_eq!(resp.body_text(), format!("2,{}", parent.id()));
}

#[test]
fn protocol_errors_are_400() {
    let (server, button) = counter_server();

    // Unparseable component id.
    let resp = server.handle_request(&HttpRequest::post("/app/w/e", "et=0&cid=xyz"));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body_text(), "Invalid component id!");

    // Missing component id.
    let resp = server.handle_request(&HttpRequest::post("/app/w/e", "et=0"));
    assert_eq!(resp.status, 400);

    // Unknown component id.
    let resp = server.handle_request(&HttpRequest::post("/app/w/e", "et=0&cid=999999999"));
    assert_eq!(resp.status, 400);
    assert!(resp.body_text().starts_with("Component not found:"));

    // Unknown event type code.
    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=99&cid={}", button.id()),
    ));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body_text(), "Invalid event type!");

    // Partial render of an unknown component.
    let resp = server.handle_request(&HttpRequest::post("/app/w/rc", "cid=999999999"));
    assert_eq!(resp.status, 400);
    let resp = server.handle_request(&HttpRequest::post("/app/w/rc", "cid=!"));
    assert_eq!(resp.status, 400);
}

#[test]
fn unknown_window_is_404_with_a_way_back() {
    let (server, _) = counter_server();
    let resp = server.handle_request(&HttpRequest::get("/app/nosuchwin"));
    assert_eq!(resp.status, 404);
    let body = resp.body_text();
    assert!(body.contains("'nosuchwin'"));
    assert!(body.contains("href=\"/app/\""));
}

#[test]
fn a_panicking_handler_answers_noop_and_the_server_lives_on() {
    let (server, button) = counter_server();
    let id = button.id();

    let bomb = Button::new("boom");
    bomb.write()
        .core_mut()
        .add_handler_func(|_| panic!("handler bug"), &[EventType::Click]);
    let win = server.public_session().win_by_name("w").unwrap();
    win.write().add(bomb.as_comp());

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={}", bomb.id()),
    ));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body_text(), "0");

    // The session lock is intact: the next event on the same session works.
    let resp = server.handle_request(&HttpRequest::post("/app/w/e", &format!("et=0&cid={id}")));
    assert_eq!(resp.body_text(), format!("2,{id}"));
}

#[test]
fn focused_comp_id_is_taken_from_the_request() {
    let (server, button) = counter_server();
    let win = server.public_session().win_by_name("w").unwrap();
    let id = button.id();

    server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=0&cid={id}&fcid={id}"),
    ));
    assert_eq!(win.read().focused_comp_id(), id);
}

#[test]
fn full_window_render_is_served_on_the_window_path() {
    let (server, button) = counter_server();
    let resp = server.handle_request(&HttpRequest::get("/app/w"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("Content-Type"), Some("text/html; charset=utf-8"));
    let html = resp.body_text();
    assert!(html.starts_with("<html><head>"));
    assert!(html.contains(&format!(" id=\"{}\"", button.id())));
}

#[test]
fn list_box_value_arrives_through_the_wire() {
    let server = Server::new("app", "localhost:0");
    let win = Window::new("w", "W");

    let list = gwu_widgets::ListBox::new(&["a", "b", "c", "d"]);
    list.write().set_multi(true);
    win.write().add(list.as_comp());
    server.public_session().add_win(win).unwrap();

    let resp = server.handle_request(&HttpRequest::post(
        "/app/w/e",
        &format!("et=11&cid={}&cval=0%2C2%2C3", list.id()),
    ));
    assert_eq!(resp.status, 200);

    assert_eq!(list.read().selected_indices(), vec![0, 2, 3]);
    assert_eq!(list.read().selected_values(), vec!["a", "c", "d"]);
}
