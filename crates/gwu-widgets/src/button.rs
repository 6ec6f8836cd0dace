//! Button: a clickable push button.

use std::any::Any;
use std::io;

use gwu_core::Writer;

use crate::addons::render_enabled;
use crate::comp::{Comp, CompCore, Ref};

/// A clickable button with a text.
///
/// Suggested event type to handle actions: [`EventType::Click`](gwu_core::EventType::Click).
///
/// Default style class: `gwu-Button`.
pub struct Button {
    core: CompCore,
    text: String,
    enabled: bool,
}

impl Button {
    /// Creates a new Button.
    #[must_use]
    pub fn new(text: &str) -> Ref<Button> {
        let c = Ref::new(Button::bare("", text));
        c.write().core.style_mut().add_class("gwu-Button");
        c
    }

    /// A button without the default style class; building block for the
    /// state buttons.
    pub(crate) fn bare(value_provider_js: &str, text: &str) -> Button {
        Button {
            core: CompCore::new(value_provider_js),
            text: text.to_string(),
            enabled: true,
        }
    }

    /// The button text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the button text.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Tells if the button is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the button.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn render_enabled_attr(&self, w: &mut Writer<'_>) -> io::Result<()> {
        render_enabled(self.enabled, w)
    }
}

impl Comp for Button {
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

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<button type=\"button\"")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        render_enabled(self.enabled, w)?;
        w.writes(">")?;

        w.writees(&self.text)?;

        w.writes("</button>").map(|_| ())
    }
}
