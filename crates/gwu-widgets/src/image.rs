//! Image: an `<img>` with alternate text.

use std::any::Any;
use std::io;

use gwu_core::Writer;

use crate::comp::{Comp, CompCore, Ref};

/// An image component. The text is the alternate text of the image.
///
/// Default style class: `gwu-Image`.
pub struct Image {
    core: CompCore,
    text: String,
    url: String,
}

impl Image {
    /// Creates a new Image with the given alternate text and source URL.
    #[must_use]
    pub fn new(text: &str, url: &str) -> Ref<Image> {
        let c = Ref::new(Image {
            core: CompCore::new(""),
            text: text.to_string(),
            url: url.to_string(),
        });
        c.write().core.style_mut().add_class("gwu-Image");
        c
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }
}

impl Comp for Image {
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
        w.writes("<img")?;
        w.write_attr("src", &self.url)?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(" alt=\"")?;
        w.writees(&self.text)?;
        w.writes("\">").map(|_| ())
    }
}
