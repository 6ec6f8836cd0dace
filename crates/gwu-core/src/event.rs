//! Wire-level event vocabulary: event types, mouse buttons, modifier keys
//! and key codes.
//!
//! These are the integer codes the client runtime puts on the wire (the
//! `et`, `mb`, `mk` and `kc` request fields) and the codes rendered into
//! `se(event,…)` handler attributes, so their values are part of the
//! protocol and must not change.

use bitflags::bitflags;

/// Kind of an event.
///
/// General events can originate from any component; window events only from
/// a window; internal events are never sent by the client, only
/// synthesized on the server by forking while another event is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum EventType {
    /// Mouse click.
    Click = 0,
    /// Mouse double click.
    DblClick = 1,
    /// Mouse button pressed.
    MouseDown = 2,
    /// Mouse moved.
    MouseMove = 3,
    /// Mouse entered the component.
    MouseOver = 4,
    /// Mouse left the component.
    MouseOut = 5,
    /// Mouse button released.
    MouseUp = 6,
    /// Key pressed down.
    KeyDown = 7,
    /// Key press (character).
    KeyPress = 8,
    /// Key released.
    KeyUp = 9,
    /// Component lost focus.
    Blur = 10,
    /// Component value changed.
    Change = 11,
    /// Component gained focus.
    Focus = 12,

    /// Window loaded.
    WinLoad = 13,
    /// Window about to unload.
    WinUnload = 14,

    /// Internal state change, dispatched while processing another event.
    StateChange = 15,
}

/// Category of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// General event type, for all components.
    General,
    /// Window event type, for windows only.
    Window,
    /// Internal event type, generated and dispatched on the server.
    Internal,
}

impl EventType {
    /// The integer wire code of the event type.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decodes a wire code. Returns `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<EventType> {
        use EventType::*;
        Some(match code {
            0 => Click,
            1 => DblClick,
            2 => MouseDown,
            3 => MouseMove,
            4 => MouseOver,
            5 => MouseOut,
            6 => MouseUp,
            7 => KeyDown,
            8 => KeyPress,
            9 => KeyUp,
            10 => Blur,
            11 => Change,
            12 => Focus,
            13 => WinLoad,
            14 => WinUnload,
            15 => StateChange,
            _ => return None,
        })
    }

    /// The category of the event type.
    #[must_use]
    pub const fn category(self) -> EventCategory {
        use EventType::*;
        match self {
            Click | DblClick | MouseDown | MouseMove | MouseOver | MouseOut | MouseUp | KeyDown
            | KeyPress | KeyUp | Blur | Change | Focus => EventCategory::General,
            WinLoad | WinUnload => EventCategory::Window,
            StateChange => EventCategory::Internal,
        }
    }

    /// HTML attribute name for a general event type (`onclick` etc.).
    /// `None` for window and internal event types.
    #[must_use]
    pub const fn attr_name(self) -> Option<&'static str> {
        use EventType::*;
        Some(match self {
            Click => "onclick",
            DblClick => "ondblclick",
            MouseDown => "onmousedown",
            MouseMove => "onmousemove",
            MouseOver => "onmouseover",
            MouseOut => "onmouseout",
            MouseUp => "onmouseup",
            KeyDown => "onkeydown",
            KeyPress => "onkeypress",
            KeyUp => "onkeyup",
            Blur => "onblur",
            Change => "onchange",
            Focus => "onfocus",
            _ => return None,
        })
    }

    /// Window function name for a window event type.
    ///
    /// Unload is bound to `onbeforeunload` instead of `onunload`: `onunload`
    /// interferes with in-flight XHRs and is skipped on plain refresh by
    /// some browsers.
    #[must_use]
    pub const fn func_name(self) -> Option<&'static str> {
        match self {
            EventType::WinLoad => Some("onload"),
            EventType::WinUnload => Some("onbeforeunload"),
            _ => None,
        }
    }
}

/// Mouse button reported with a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum MouseBtn {
    /// Button info not available.
    Unknown = -1,
    /// Left button.
    Left = 0,
    /// Middle button.
    Middle = 1,
    /// Right button.
    Right = 2,
}

impl MouseBtn {
    /// Decodes a wire code; anything unrecognized is [`MouseBtn::Unknown`].
    #[must_use]
    pub const fn from_code(code: i32) -> MouseBtn {
        match code {
            0 => MouseBtn::Left,
            1 => MouseBtn::Middle,
            2 => MouseBtn::Right,
            _ => MouseBtn::Unknown,
        }
    }

    /// The integer wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

bitflags! {
    /// States of the modifier keys during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModKeys: u32 {
        /// Alt key.
        const ALT = 1;
        /// Control key.
        const CTRL = 2;
        /// Meta key.
        const META = 4;
        /// Shift key.
        const SHIFT = 8;
    }
}

impl ModKeys {
    /// Decodes the `mk` wire field. A missing field is reported as `-1` by
    /// the request decoder; that (and any negative value) decodes to the
    /// empty mask.
    #[must_use]
    pub fn from_code(code: i32) -> ModKeys {
        if code < 0 {
            ModKeys::empty()
        } else {
            ModKeys::from_bits_truncate(code as u32)
        }
    }
}

/// A keyboard key code, as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub i32);

impl Key {
    /// Key info not available.
    pub const UNKNOWN: Key = Key(-1);

    pub const BACKSPACE: Key = Key(8);
    pub const ENTER: Key = Key(13);
    pub const SHIFT: Key = Key(16);
    pub const CTRL: Key = Key(17);
    pub const ALT: Key = Key(18);
    pub const CAPS_LOCK: Key = Key(20);
    pub const ESCAPE: Key = Key(27);
    pub const SPACE: Key = Key(32);
    pub const PG_UP: Key = Key(33);
    pub const PG_DOWN: Key = Key(34);
    pub const END: Key = Key(35);
    pub const HOME: Key = Key(36);
    pub const LEFT: Key = Key(37);
    pub const UP: Key = Key(38);
    pub const RIGHT: Key = Key(39);
    pub const DOWN: Key = Key(40);
    pub const PRINT_SCRN: Key = Key(44);
    pub const INSERT: Key = Key(45);
    pub const DEL: Key = Key(46);

    pub const KEY_0: Key = Key(48);
    pub const KEY_9: Key = Key(57);
    pub const KEY_A: Key = Key(65);
    pub const KEY_Z: Key = Key(90);
    pub const WIN: Key = Key(91);

    pub const NUMPAD_0: Key = Key(96);
    pub const NUMPAD_9: Key = Key(105);
    pub const NUMPAD_MUL: Key = Key(106);
    pub const NUMPAD_PLUS: Key = Key(107);
    pub const NUMPAD_MINUS: Key = Key(109);
    pub const NUMPAD_DOT: Key = Key(110);
    pub const NUMPAD_DIV: Key = Key(111);

    pub const F1: Key = Key(112);
    pub const F2: Key = Key(113);
    pub const F3: Key = Key(114);
    pub const F4: Key = Key(115);
    pub const F5: Key = Key(116);
    pub const F6: Key = Key(117);
    pub const F7: Key = Key(118);
    pub const F8: Key = Key(119);
    pub const F9: Key = Key(120);
    pub const F10: Key = Key(121);
    pub const F11: Key = Key(122);
    pub const F12: Key = Key(123);

    pub const NUM_LOCK: Key = Key(144);
    pub const SCROLL_LOCK: Key = Key(145);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for code in 0..16 {
            let et = EventType::from_code(code).unwrap();
            assert_eq!(et.code(), code);
        }
        assert_eq!(EventType::from_code(16), None);
        assert_eq!(EventType::from_code(-1), None);
    }

    #[test]
    fn categories() {
        assert_eq!(EventType::Click.category(), EventCategory::General);
        assert_eq!(EventType::Focus.category(), EventCategory::General);
        assert_eq!(EventType::WinLoad.category(), EventCategory::Window);
        assert_eq!(EventType::WinUnload.category(), EventCategory::Window);
        assert_eq!(EventType::StateChange.category(), EventCategory::Internal);
    }

    #[test]
    fn attr_names_only_for_general() {
        assert_eq!(EventType::Click.attr_name(), Some("onclick"));
        assert_eq!(EventType::WinLoad.attr_name(), None);
        assert_eq!(EventType::StateChange.attr_name(), None);
        assert_eq!(EventType::WinUnload.func_name(), Some("onbeforeunload"));
    }

    #[test]
    fn mod_keys_decode() {
        assert_eq!(ModKeys::from_code(-1), ModKeys::empty());
        assert_eq!(ModKeys::from_code(3), ModKeys::ALT | ModKeys::CTRL);
        assert!(ModKeys::from_code(8).contains(ModKeys::SHIFT));
    }

    #[test]
    fn mouse_btn_decode() {
        assert_eq!(MouseBtn::from_code(0), MouseBtn::Left);
        assert_eq!(MouseBtn::from_code(2), MouseBtn::Right);
        assert_eq!(MouseBtn::from_code(-1), MouseBtn::Unknown);
        assert_eq!(MouseBtn::from_code(7), MouseBtn::Unknown);
    }
}
