//! Label: a component wrapping a plain text.

use std::any::Any;
use std::io;

use gwu_core::Writer;

use crate::comp::{Comp, CompCore, Ref};

/// A component rendering an HTML-escaped text inside a span.
///
/// Default style class: `gwu-Label`.
pub struct Label {
    core: CompCore,
    text: String,
}

impl Label {
    /// Creates a new Label.
    #[must_use]
    pub fn new(text: &str) -> Ref<Label> {
        let c = Ref::new(Label {
            core: CompCore::new(""),
            text: text.to_string(),
        });
        c.write().core.style_mut().add_class("gwu-Label");
        c
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the text.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

impl Comp for Label {
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
        w.writes("<span")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        w.writees(&self.text)?;

        w.writes("</span>").map(|_| ())
    }
}
