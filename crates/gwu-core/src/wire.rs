//! Stable wire identifiers of the client–server protocol.
//!
//! These names travel in URLs, request bodies and the client runtime, so
//! they are protocol constants: changing any of them breaks deployed
//! clients.

use crate::GWU_VERSION;

/// App-path-relative path for bundled static content.
pub const PATH_STATIC: &str = "_gwu_static/";
/// App-path-relative path for checking the session without touching it.
pub const PATH_SESS_CHECK: &str = "_sess_ch";
/// Window-relative path for sending events.
pub const PATH_EVENT: &str = "e";
/// Window-relative path for rendering a single component.
pub const PATH_RENDER_COMP: &str = "rc";

/// Event type request field.
pub const PARAM_EVENT_TYPE: &str = "et";
/// Source component id request field.
pub const PARAM_COMP_ID: &str = "cid";
/// Component value request field.
pub const PARAM_COMP_VALUE: &str = "cval";
/// Client-observed focused component id request field.
pub const PARAM_FOCUSED_COMP_ID: &str = "fcid";
/// Mouse x coordinate inside the window.
pub const PARAM_MOUSE_WX: &str = "mwx";
/// Mouse y coordinate inside the window.
pub const PARAM_MOUSE_WY: &str = "mwy";
/// Mouse x coordinate relative to the source component.
pub const PARAM_MOUSE_X: &str = "mx";
/// Mouse y coordinate relative to the source component.
pub const PARAM_MOUSE_Y: &str = "my";
/// Mouse button request field.
pub const PARAM_MOUSE_BTN: &str = "mb";
/// Modifier key states request field.
pub const PARAM_MOD_KEYS: &str = "mk";
/// Key code request field.
pub const PARAM_KEY_CODE: &str = "kc";

/// Event response action: nothing to do.
pub const ERA_NO_ACTION: i32 = 0;
/// Event response action: reload a window (tail: window name, may be empty).
pub const ERA_RELOAD_WIN: i32 = 1;
/// Event response action: re-render dirty components (tail: component ids).
pub const ERA_DIRTY_COMPS: i32 = 2;
/// Event response action: focus a component (tail: component id).
pub const ERA_FOCUS_COMP: i32 = 3;

/// Session id cookie name.
pub const SESS_ID_COOKIE: &str = "gwu-sessid";

/// Name of the versioned client runtime script resource.
#[must_use]
pub fn res_name_static_js() -> String {
    format!("gowut-{GWU_VERSION}.js")
}

/// Name of the versioned CSS resource of a theme.
#[must_use]
pub fn res_name_static_css(theme: &str) -> String {
    format!("gowut-{theme}-{GWU_VERSION}.css")
}

/// Built-in CSS theme: the default look.
pub const THEME_DEFAULT: &str = "default";
/// Built-in CSS theme: cell borders everywhere, for layout debugging.
pub const THEME_DEBUG: &str = "debug";
