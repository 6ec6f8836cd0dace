//! Socket-level smoke test: a real TCP round trip through the server.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use gwu_core::EventType;
use gwu_server::Server;
use gwu_widgets::{Button, Comp, Ref, Window};

fn start_server() -> (SocketAddr, Ref<Button>) {
    let server = Server::new("app", "localhost:0");

    let win = Window::new("w", "Smoke");
    let button = Button::new("b");
    {
        let handle = button.clone();
        button.write().core_mut().add_handler_func(
            move |ev| ev.mark_dirty(&handle.as_comp()),
            &[EventType::Click],
        );
    }
    win.write().add(button.as_comp());
    server.public_session().add_win(win).unwrap();

    let listener =
        TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let _ = server.serve(listener);
    });

    (addr, button)
}

fn roundtrip(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("timeout");
    stream.write_all(request.as_bytes()).expect("send");

    let mut response = String::new();
    stream.read_to_string(&mut response).expect("receive");
    response
}

#[test]
fn get_window_over_tcp() {
    let (addr, button) = start_server();

    let response = roundtrip(addr, "GET /app/w HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/html; charset=utf-8"));
    assert!(response.contains("Connection: close"));
    assert!(response.contains(&format!(" id=\"{}\"", button.id())));
}

#[test]
fn post_event_over_tcp() {
    let (addr, button) = start_server();

    let body = format!("et=0&cid={}", button.id());
    let request = format!(
        "POST /app/w/e HTTP/1.1\r\nHost: localhost\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );

    let response = roundtrip(addr, &request);
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with(&format!("2,{}", button.id())));
}

#[test]
fn bundled_js_is_served_with_expiry() {
    let (addr, _) = start_server();

    let js_name = gwu_core::wire::res_name_static_js();
    let response = roundtrip(
        addr,
        &format!("GET /app/_gwu_static/{js_name} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
    );
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Expires: "));
    assert!(response.contains("function se(event, etype, compId, compValue)"));
}

#[test]
fn malformed_requests_get_a_400() {
    let (addr, _) = start_server();

    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("timeout");
    stream.write_all(b"NONSENSE\r\n\r\n").expect("send");

    let mut response = String::new();
    stream.read_to_string(&mut response).expect("receive");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}
