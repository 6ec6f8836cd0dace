//! TextBox: single-line, multi-line, password and file input boxes.

use std::any::Any;
use std::io;

use gwu_core::{EventType, Writer};

use crate::addons::render_enabled;
use crate::comp::{Comp, CompCore, Ref};
use crate::event::Event;

/// Kind of input a [`TextBox`] renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Text,
    Password,
    File,
}

/// A component for text input.
///
/// By default the value is synchronized with the server on
/// [`EventType::Change`], which fires when the box loses focus or ENTER is
/// pressed. To sync while typing, add [`EventType::KeyUp`] with
/// `core_mut().add_sync_on_etypes(…)`.
///
/// With `rows > 1` (and not a password box) the component renders as a
/// `<textarea>`, otherwise as an `<input>`.
///
/// Default style classes: `gwu-TextBox`, `gwu-PasswBox`.
pub struct TextBox {
    core: CompCore,
    text: String,
    enabled: bool,
    kind: InputKind,
    rows: i32,
    cols: i32,
}

impl TextBox {
    /// Creates a new single-line text box.
    #[must_use]
    pub fn new(text: &str) -> Ref<TextBox> {
        let c = Ref::new(TextBox::bare(text, InputKind::Text));
        c.write().core.style_mut().add_class("gwu-TextBox");
        c
    }

    /// Creates a new password box.
    #[must_use]
    pub fn new_password(text: &str) -> Ref<TextBox> {
        let c = Ref::new(TextBox::bare(text, InputKind::Password));
        c.write().core.style_mut().add_class("gwu-PasswBox");
        c
    }

    /// Creates a new text box accepting a file path.
    #[must_use]
    pub fn new_file(text: &str) -> Ref<TextBox> {
        let c = Ref::new(TextBox::bare(text, InputKind::File));
        c.write().core.style_mut().add_class("gwu-TextBox");
        c
    }

    fn bare(text: &str, kind: InputKind) -> TextBox {
        let mut core = CompCore::new("encodeURIComponent(this.value)");
        core.add_sync_on_etypes(&[EventType::Change]);
        TextBox {
            core,
            text: text.to_string(),
            enabled: true,
            kind,
            rows: 1,
            cols: 20,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Tells if the text box is read-only.
    #[must_use]
    pub fn read_only(&self) -> bool {
        !self.core.attr("readonly").is_empty()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.core
            .set_attr("readonly", if read_only { "readonly" } else { "" });
    }

    /// Number of displayed rows; `rows > 1` renders a text area.
    #[must_use]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn set_rows(&mut self, rows: i32) {
        self.rows = rows;
    }

    /// Number of displayed columns.
    #[must_use]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn set_cols(&mut self, cols: i32) {
        self.cols = cols;
    }

    /// Maximum number of characters allowed, `-1` if unlimited.
    #[must_use]
    pub fn max_length(&self) -> i32 {
        self.core.iattr("maxlength")
    }

    /// Sets the maximum number of characters allowed; pass `-1` to not
    /// limit it.
    pub fn set_max_length(&mut self, max_length: i32) {
        if max_length < 0 {
            self.core.set_attr("maxlength", "");
        } else {
            self.core.set_iattr("maxlength", max_length);
        }
    }

    fn render_input(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<input type=\"")?;
        w.writes(match self.kind {
            InputKind::Password => "password",
            InputKind::File => "file",
            InputKind::Text => "text",
        })?;
        w.writes("\" size=\"")?;
        w.writev(self.cols)?;
        w.writes("\"")?;
        self.core.render_attrs_and_style(w)?;
        render_enabled(self.enabled, w)?;
        self.core.render_ehandlers(w)?;

        w.writes(" value=\"")?;
        w.writees(&self.text)?;
        w.writes("\"/>").map(|_| ())
    }

    fn render_text_area(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<textarea")?;
        self.core.render_attrs_and_style(w)?;
        render_enabled(self.enabled, w)?;
        self.core.render_ehandlers(w)?;

        w.writes(" rows=\"")?;
        w.writev(self.rows)?;
        w.writes("\" cols=\"")?;
        w.writev(self.cols)?;
        // The newline right after the opening tag is swallowed by the
        // browser; without it a text starting with a newline would lose it.
        w.writes("\">\n")?;

        w.writees(&self.text)?;
        w.writes("</textarea>").map(|_| ())
    }
}

impl Comp for TextBox {
    fn core(&self) -> &CompCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CompCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn preprocess(&mut self, ev: &Event) {
        // The empty string is a valid text box value, so what matters is
        // whether the value field is present at all.
        if let Some(value) = ev.comp_value() {
            self.text = value.to_string();
        }
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        if self.rows <= 1 || self.kind == InputKind::Password {
            self.render_input(w)
        } else {
            self.render_text_area(w)
        }
    }
}
