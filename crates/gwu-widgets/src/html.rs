//! Html: a component wrapping a raw HTML text.

use std::any::Any;
use std::io;

use gwu_core::Writer;

use crate::comp::{Comp, CompCore, Ref};

/// A component rendering a raw, unescaped HTML text inside a span.
///
/// Default style class: `gwu-Html`.
pub struct Html {
    core: CompCore,
    html: String,
}

impl Html {
    /// Creates a new Html component.
    #[must_use]
    pub fn new(html: &str) -> Ref<Html> {
        let c = Ref::new(Html {
            core: CompCore::new(""),
            html: html.to_string(),
        });
        c.write().core.style_mut().add_class("gwu-Html");
        c
    }

    /// The HTML text.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Sets the HTML text.
    pub fn set_html(&mut self, html: &str) {
        self.html = html.to_string();
    }
}

impl Comp for Html {
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

        w.writes(&self.html)?;

        w.writes("</span>").map(|_| ())
    }
}
