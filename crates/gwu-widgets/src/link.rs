//! Link: a clickable `<a>` pointing to a URL, optionally wrapping one
//! child component.

use std::any::Any;
use std::io;

use gwu_core::{Id, Writer};

use crate::comp::{make_orphan, Comp, CompCore, CompRef, Container, Ref};

/// A link with a text and a URL. A link is also a container holding at
/// most one child component, which becomes part of the clickable area.
///
/// Links open in a new window by default (`target="_blank"`).
///
/// Default style class: `gwu-Link`.
pub struct Link {
    core: CompCore,
    text: String,
    url: String,
    comp: Option<CompRef>,
}

impl Link {
    /// Creates a new Link.
    #[must_use]
    pub fn new(text: &str, url: &str) -> Ref<Link> {
        let c = Ref::new(Link {
            core: CompCore::new(""),
            text: text.to_string(),
            url: url.to_string(),
            comp: None,
        });
        {
            let mut g = c.write();
            g.set_target("_blank");
            g.core.style_mut().add_class("gwu-Link");
        }
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

    /// The target of the link.
    #[must_use]
    pub fn target(&self) -> &str {
        self.core.attr("target")
    }

    /// Sets the target of the link. Pass `"_blank"` to open the URL in a
    /// new window; pass an empty string to clear the target.
    pub fn set_target(&mut self, target: &str) {
        self.core.set_attr("target", target);
    }

    /// The child component, if set.
    #[must_use]
    pub fn comp(&self) -> Option<CompRef> {
        self.comp.clone()
    }

    /// Sets the only child component, detaching it from its current parent
    /// and orphaning any previous child.
    pub fn set_comp(&mut self, c: CompRef) {
        if let Some(old) = self.comp.take() {
            old.write().core_mut().set_parent(None);
        }
        make_orphan(&c);
        c.write().core_mut().set_parent(self.core.self_weak());
        self.comp = Some(c);
    }
}

impl Comp for Link {
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

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<a")?;
        w.write_attr("href", &self.url)?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        w.writees(&self.text)?;
        if let Some(c) = &self.comp {
            c.read().render(w)?;
        }

        w.writes("</a>").map(|_| ())
    }
}

impl Container for Link {
    fn remove(&mut self, c: &CompRef) -> bool {
        let cid = c.read().core().id();
        match &self.comp {
            Some(child) if child.read().core().id() == cid => {
                c.write().core_mut().set_parent(None);
                self.comp = None;
                true
            }
            _ => false,
        }
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core.id() == id {
            return self.core.self_comp();
        }

        let child = self.comp.as_ref()?;
        let g = child.read();
        if g.core().id() == id {
            drop(g);
            return Some(child.clone());
        }
        g.as_container().and_then(|cont| cont.by_id(id))
    }

    fn clear(&mut self) {
        if let Some(c) = self.comp.take() {
            c.write().core_mut().set_parent(None);
        }
    }
}
