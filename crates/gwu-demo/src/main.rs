//! Showcase application: a couple of public windows exercising the widget
//! library, plus a login window that auto-creates a private session.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use gwu_core::EventType;
use gwu_server::{Server, SessionHandler};
use gwu_widgets::{
    Button, Comp, Expander, Label, ListBox, Panel, Ref, Session, StateButton, TabPanel, TextBox,
    Timer, Window,
};

/// Builds the "widgets" window: a counter button, a list box and a few
/// state buttons wired to a status label.
fn build_widgets_win() -> Ref<Window> {
    let win = Window::new("widgets", "Widget Showcase");

    let status = Label::new("Ready.");

    let counter = Button::new("Click me: 0");
    {
        let counter_h = counter.clone();
        counter.write().core_mut().add_handler_func(
            move |ev| {
                let mut b = counter_h.write();
                let next = b
                    .text()
                    .rsplit(' ')
                    .next()
                    .and_then(|n| n.parse::<u32>().ok())
                    .unwrap_or(0)
                    + 1;
                b.set_text(&format!("Click me: {next}"));
                drop(b);
                ev.mark_dirty(&counter_h.as_comp());
            },
            &[EventType::Click],
        );
    }

    let fruits = ListBox::new(&["apple", "banana", "cherry", "date"]);
    fruits.write().set_multi(true);
    fruits.write().set_rows(4);
    {
        let fruits_h = fruits.clone();
        let status_h = status.clone();
        fruits.write().core_mut().add_handler_func(
            move |ev| {
                let picked = fruits_h.read().selected_values().join(", ");
                status_h.write().set_text(&format!("Picked: {picked}"));
                ev.mark_dirty(&status_h.as_comp());
            },
            &[EventType::Change],
        );
    }

    let check = StateButton::new_checkbox("Enable fruit picking");
    check.write().set_state(true);
    {
        let check_h = check.clone();
        let fruits_h = fruits.clone();
        check.write().core_mut().add_handler_func(
            move |ev| {
                let enabled = check_h.read().state();
                fruits_h.write().set_enabled(enabled);
                ev.mark_dirty(&fruits_h.as_comp());
            },
            &[EventType::Click],
        );
    }

    {
        let mut g = win.write();
        g.add(counter.as_comp());
        g.panel_mut().add_vspace(8);
        g.add(check.as_comp());
        g.add(fruits.as_comp());
        g.panel_mut().add_vspace(8);
        g.add(status.as_comp());
    }
    win
}

/// Builds the "tabs" window: a tab panel with an expander and a timer.
fn build_tabs_win() -> Ref<Window> {
    let win = Window::new("tabs", "Containers");

    let tabs = TabPanel::new();
    {
        let first = Panel::new();
        first
            .write()
            .add(Label::new("Content of the first tab.").as_comp());
        tabs.write().add_string("First", first.as_comp());

        let expander = Expander::new();
        expander
            .write()
            .set_header(Label::new("More details").as_comp());
        expander
            .write()
            .set_content(Label::new("Hidden until expanded.").as_comp());
        tabs.write().add_string("Second", expander.as_comp());

        let ticker = Label::new("Waiting for the first tick…");
        let timer = Timer::new(Duration::from_secs(5));
        timer.write().set_repeat(true);
        {
            let ticker_h = ticker.clone();
            timer.write().core_mut().add_handler_func(
                move |ev| {
                    let mut l = ticker_h.write();
                    let ticks = l
                        .text()
                        .rsplit(' ')
                        .next()
                        .and_then(|n| n.parse::<u64>().ok())
                        .unwrap_or(0)
                        + 1;
                    l.set_text(&format!("Ticks: {ticks}"));
                    drop(l);
                    ev.mark_dirty(&ticker_h.as_comp());
                },
                &[EventType::StateChange],
            );
        }
        let third = Panel::new();
        third.write().add(ticker.as_comp());
        third.write().add(timer.as_comp());
        tabs.write().add_string("Timer", third.as_comp());
    }

    win.write().add(tabs.as_comp());
    win
}

/// Builds the private window of a freshly created session.
struct LoginSessionHandler;

impl SessionHandler for LoginSessionHandler {
    fn created(&self, sess: &Session) {
        let win = Window::new("login", "Login");

        let user = TextBox::new("");
        let pass = TextBox::new_password("");
        let hello = Label::new("");
        let login = Button::new("Login");
        {
            let user_h = user.clone();
            let hello_h = hello.clone();
            login.write().core_mut().add_handler_func(
                move |ev| {
                    let name = user_h.read().text().to_string();
                    hello_h.write().set_text(&format!("Hello, {name}!"));
                    ev.mark_dirty(&hello_h.as_comp());
                },
                &[EventType::Click],
            );
        }

        {
            let mut g = win.write();
            g.add(Label::new("User:").as_comp());
            g.add(user.as_comp());
            g.add(Label::new("Password:").as_comp());
            g.add(pass.as_comp());
            g.panel_mut().add_vspace(8);
            g.add(login.as_comp());
            g.add(hello.as_comp());
        }

        if let Err(e) = sess.add_win(win) {
            tracing::error!(error = %e, "failed to add login window");
        }
    }

    fn removed(&self, sess: &Session) {
        info!(sess_id = %sess.id(), "login session ended");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let server = Server::new("demo", "localhost:3434");
    server.set_text("GWU Demo");

    let public = server.public_session();
    if let Err(e) = public.add_win(build_widgets_win()) {
        tracing::error!(error = %e, "failed to add window");
    }
    if let Err(e) = public.add_win(build_tabs_win()) {
        tracing::error!(error = %e, "failed to add window");
    }

    server.add_shandler(Arc::new(LoginSessionHandler));
    server.add_sess_creator_name("login", "Login to the demo");

    if let Err(e) = server.start() {
        tracing::error!(error = %e, "server exited");
    }
}
