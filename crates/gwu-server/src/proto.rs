//! The event wire protocol: decoding incoming events, dispatching them
//! under the session write lock, encoding the response action list, and
//! the partial-render endpoint.

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use gwu_core::{wire, EventType, Id, Key, ModKeys, MouseBtn, Writer};
use gwu_widgets::{dispatch_event, Container, Event, Ref, Session, SessionRegistry, Window};

use crate::http::{HttpRequest, HttpResponse};
use crate::server::Server;

/// Renders through a [`Writer`] into a fresh buffer. Writing into memory
/// cannot fail, so the result is the buffer regardless.
pub(crate) fn render_to_vec(f: impl FnOnce(&mut Writer<'_>) -> io::Result<()>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    let _ = f(&mut w);
    buf
}

/// Handles an incoming event request: decodes the wire fields, finds the
/// source component, preprocesses and dispatches, then encodes the
/// response action list. The caller holds the session write lock.
pub(crate) fn handle_event(
    server: &Server,
    sess: &Session,
    win: &Ref<Window>,
    req: &HttpRequest,
) -> HttpResponse {
    let form = req.form();

    // The client reports which component holds focus; remember it on the
    // window so a full reload restores it.
    if let Some(fcid) = form.get(wire::PARAM_FOCUSED_COMP_ID) {
        if let Ok(fcid) = fcid.parse::<Id>() {
            win.write().set_focused_comp_id(fcid);
        }
    }

    let Some(Ok(id)) = form.get(wire::PARAM_COMP_ID).map(|v| v.parse::<Id>()) else {
        return HttpResponse::error(400, "Invalid component id!");
    };

    let Some(comp) = win.read().by_id(id) else {
        debug!(comp_id = %id, "component not found");
        return HttpResponse::error(400, &format!("Component not found: {id}"));
    };

    let etype_code = req.int_param(&form, wire::PARAM_EVENT_TYPE);
    let Some(etype) = EventType::from_code(etype_code) else {
        return HttpResponse::error(400, "Invalid event type!");
    };
    debug!(comp_id = %id, etype = etype_code, "event");

    // Component-relative mouse coordinates are the marker for the whole
    // mouse payload being present.
    let x = req.int_param(&form, wire::PARAM_MOUSE_X);
    let (x, y, wx, wy, mbtn) = if x >= 0 {
        (
            x,
            req.int_param(&form, wire::PARAM_MOUSE_Y),
            req.int_param(&form, wire::PARAM_MOUSE_WX),
            req.int_param(&form, wire::PARAM_MOUSE_WY),
            MouseBtn::from_code(req.int_param(&form, wire::PARAM_MOUSE_BTN)),
        )
    } else {
        (-1, -1, -1, -1, MouseBtn::Unknown)
    };

    let registry: Arc<dyn SessionRegistry> = server.inner().clone();
    let mut event = Event::new(etype, comp.clone(), sess.clone())
        .with_mouse(x, y, wx, wy, mbtn)
        .with_keys(
            ModKeys::from_code(req.int_param(&form, wire::PARAM_MOD_KEYS)),
            Key(req.int_param(&form, wire::PARAM_KEY_CODE)),
        )
        .with_comp_value(form.get(wire::PARAM_COMP_VALUE).cloned())
        .with_registry(registry);

    // Preprocess (value-bearing widgets decode their new value), then
    // dispatch. Both run user code; a panicking handler must neither kill
    // the server nor poison the session lock, so they are isolated here
    // (and the locks in use do not poison).
    let dispatched = catch_unwind(AssertUnwindSafe(|| {
        comp.write().preprocess(&event);
        dispatch_event(&comp, &mut event);
    }));

    if let Err(panic) = dispatched {
        let msg = panic_message(&panic);
        error!(comp_id = %id, panic = %msg, "event handler panicked");
        let _ = server.inner().telemetry.lock().write(
            "handler_panic",
            json!({ "comp_id": id.to_string(), "panic": msg }),
        );

        let resp = HttpResponse::text(encode_no_action());
        return attach_new_sess_cookie(server, &event, resp);
    }

    let body = encode_response(&event, win);
    let resp = HttpResponse::text(body);
    attach_new_sess_cookie(server, &event, resp)
}

/// Renders a single component addressed by id; the body is its HTML
/// fragment. The caller holds the session read lock.
pub(crate) fn render_comp(win: &Ref<Window>, req: &HttpRequest) -> HttpResponse {
    let form = req.form();

    let Some(Ok(id)) = form.get(wire::PARAM_COMP_ID).map(|v| v.parse::<Id>()) else {
        return HttpResponse::error(400, "Invalid component id!");
    };

    debug!(comp_id = %id, "rendering comp");

    let Some(comp) = win.read().by_id(id) else {
        return HttpResponse::error(400, &format!("Component not found: {id}"));
    };

    // Sent as text: the client reads responseText and splices it in.
    let body = render_to_vec(|w| comp.read().render(w));
    HttpResponse::text(body)
}

/// Encodes the post-event actions as the `;`-separated action list.
///
/// A requested reload dominates: the client is about to throw the page
/// away, so no other action is worth sending. Otherwise dirty components
/// come first, then the focus action; with neither, a single no-op.
fn encode_response(event: &Event, win: &Ref<Window>) -> Vec<u8> {
    render_to_vec(|w| {
        if let Some(name) = event.reload_requested() {
            w.writev(wire::ERA_RELOAD_WIN)?;
            w.writes(",")?;
            w.writes(&name)?;
            return Ok(());
        }

        let mut has_action = false;

        let dirty = event.dirty_ids();
        if !dirty.is_empty() {
            has_action = true;
            w.writev(wire::ERA_DIRTY_COMPS)?;
            for id in dirty {
                w.writes(",")?;
                w.writev(id)?;
            }
        }

        if let Some(focused) = event.focused_comp() {
            if has_action {
                w.writes(";")?;
            }
            has_action = true;
            let focus_id = focused.read().core().id();
            w.writev(wire::ERA_FOCUS_COMP)?;
            w.writes(",")?;
            w.writev(focus_id)?;
            // Keep focus across subsequent full renders too.
            win.write().set_focused_comp_id(focus_id);
        }

        if !has_action {
            w.writev(wire::ERA_NO_ACTION)?;
        }
        Ok(())
    })
}

fn encode_no_action() -> Vec<u8> {
    render_to_vec(|w| w.writev(wire::ERA_NO_ACTION).map(|_| ()))
}

/// Emits the session cookie when a handler created a session during
/// dispatch, and clears the session's new flag.
fn attach_new_sess_cookie(server: &Server, event: &Event, resp: HttpResponse) -> HttpResponse {
    let sess = event.session();
    if !sess.is_new() {
        return resp;
    }
    let cookie = server.sess_cookie(&sess);
    sess.clear_new();
    resp.with_header("Set-Cookie", &cookie)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
