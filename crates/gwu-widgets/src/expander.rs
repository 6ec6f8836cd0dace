//! Expander: shows and hides a content component when its header is
//! clicked.

use std::any::Any;
use std::io;
use std::sync::Weak;

use gwu_core::{EventType, Id, Writer};
use gwu_style::{HAlign, VAlign};

use crate::addons::CellFmt;
use crate::comp::{
    current_parent, Comp, CompCore, CompRef, Container, CurrentParent, Ref,
};
use crate::event::dispatch_event;

/// A container holding exactly one header and one content component;
/// clicking the header toggles the expanded state, which shows or hides
/// the content.
///
/// Register [`EventType::StateChange`] handlers to be notified of toggles:
/// the event source is the expander, its parent event carries the clicked
/// header and mouse coordinates.
///
/// Default style classes: `gwu-Expander`, `gwu-Expander-Header`,
/// `gwu-Expander-Header-Expanded`, `gwuimg-collapsed`, `gwuimg-expanded`,
/// `gwu-Expander-Content`.
pub struct Expander {
    core: CompCore,
    halign: HAlign,
    valign: VAlign,
    header: Option<CompRef>,
    content: Option<CompRef>,
    expanded: bool,
    header_fmt: CellFmt,
    content_fmt: CellFmt,
}

impl Expander {
    /// Creates a new, collapsed Expander.
    #[must_use]
    pub fn new() -> Ref<Expander> {
        let mut core = CompCore::new("");
        core.set_attr("cellspacing", "0");
        core.set_attr("cellpadding", "0");

        let mut header_fmt = CellFmt::new();
        header_fmt.set_align(HAlign::Left, VAlign::Middle);
        let mut content_fmt = CellFmt::new();
        content_fmt.set_align(HAlign::Left, VAlign::Top);

        let c = Ref::new(Expander {
            core,
            halign: HAlign::Default,
            valign: VAlign::Default,
            header: None,
            content: None,
            // Start from true so the set_expanded(false) below initializes
            // the header style classes.
            expanded: true,
            header_fmt,
            content_fmt,
        });
        {
            let mut g = c.write();
            g.core.style_mut().add_class("gwu-Expander");
            g.set_expanded(false);
        }
        c
    }

    /// The header component, if set.
    #[must_use]
    pub fn header(&self) -> Option<CompRef> {
        self.header.clone()
    }

    /// Sets the header component. Clicking it toggles the expanded state
    /// and marks the expander dirty.
    pub fn set_header(&mut self, header: CompRef) {
        if let Some(old) = self.header.take() {
            old.write().core_mut().set_parent(None);
        }
        self.attach(&header);
        self.header = Some(header.clone());

        // TODO a replaced header keeps its toggle click handler; removal
        // needs handler deregistration support on CompCore.
        let ex_weak = self.core.self_weak();
        header.write().core_mut().add_handler_func(
            move |ev| {
                let Some(ex) = ex_weak.as_ref().and_then(Weak::upgrade) else {
                    return;
                };

                let fire_state_change = {
                    let mut g = ex.write();
                    let Some(this) = g.as_any_mut().downcast_mut::<Expander>() else {
                        return;
                    };
                    let expanded = this.expanded;
                    this.set_expanded(!expanded);
                    this.core.handler_count(EventType::StateChange) > 0
                };

                ev.mark_dirty(&ex);
                if fire_state_change {
                    let mut forked = ev.fork(EventType::StateChange, ex.clone());
                    dispatch_event(&ex, &mut forked);
                }
            },
            &[EventType::Click],
        );
    }

    /// The content component, if set.
    #[must_use]
    pub fn content(&self) -> Option<CompRef> {
        self.content.clone()
    }

    /// Sets the content component, rendered only while expanded.
    pub fn set_content(&mut self, content: CompRef) {
        if let Some(old) = self.content.take() {
            old.write().core_mut().set_parent(None);
        }
        self.attach(&content);
        self.content = Some(content);

        self.content_fmt
            .style_mut()
            .add_class("gwu-Expander-Content")
            .set_full_size();
    }

    /// Tells whether the expander is expanded.
    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Sets the expanded state, flipping the header style classes.
    pub fn set_expanded(&mut self, expanded: bool) {
        if self.expanded == expanded {
            return;
        }

        let style = self.header_fmt.style_mut();
        if self.expanded {
            style.remove_class("gwu-Expander-Header-Expanded");
            style.remove_class("gwuimg-expanded");
            style.add_class("gwu-Expander-Header");
            style.add_class("gwuimg-collapsed");
        } else {
            style.remove_class("gwu-Expander-Header");
            style.remove_class("gwuimg-collapsed");
            style.add_class("gwu-Expander-Header-Expanded");
            style.add_class("gwuimg-expanded");
        }

        self.expanded = expanded;
    }

    /// The cell formatter of the header.
    #[must_use]
    pub fn header_fmt(&self) -> &CellFmt {
        &self.header_fmt
    }

    /// The cell formatter of the header, mutably.
    pub fn header_fmt_mut(&mut self) -> &mut CellFmt {
        &mut self.header_fmt
    }

    /// The cell formatter of the content.
    #[must_use]
    pub fn content_fmt(&self) -> &CellFmt {
        &self.content_fmt
    }

    /// The cell formatter of the content, mutably.
    pub fn content_fmt_mut(&mut self) -> &mut CellFmt {
        &mut self.content_fmt
    }

    /// Detaches the component from its current parent and links it here.
    fn attach(&mut self, c: &CompRef) {
        match current_parent(&self.core, c) {
            CurrentParent::None | CurrentParent::Adopter => {}
            CurrentParent::Other(parent) => {
                let mut g = parent.write();
                if let Some(cont) = g.as_container_mut() {
                    cont.remove(c);
                }
            }
        }
        c.write().core_mut().set_parent(self.core.self_weak());
    }

    fn render_tr(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<tr")?;
        if self.halign != HAlign::Default {
            w.writes(" align=\"")?;
            w.writes(self.halign.as_str())?;
            w.writes("\"")?;
        }
        if self.valign != VAlign::Default {
            w.writes(" style=\"vertical-align:")?;
            w.writes(self.valign.as_str())?;
            w.writes("\"")?;
        }
        w.writes(">").map(|_| ())
    }
}

impl Comp for Expander {
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
        w.writes("<table")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        if let Some(header) = &self.header {
            self.render_tr(w)?;
            self.header_fmt.render("<td", w)?;
            header.read().render(w)?;
        }

        if self.expanded {
            if let Some(content) = &self.content {
                self.render_tr(w)?;
                self.content_fmt.render("<td", w)?;
                content.read().render(w)?;
            }
        }

        w.writes("</table>").map(|_| ())
    }
}

impl Container for Expander {
    fn remove(&mut self, c: &CompRef) -> bool {
        let cid = c.read().core().id();

        if let Some(content) = &self.content {
            if content.read().core().id() == cid {
                c.write().core_mut().set_parent(None);
                self.content = None;
                return true;
            }
        }

        if let Some(header) = &self.header {
            if header.read().core().id() == cid {
                c.write().core_mut().set_parent(None);
                self.header = None;
                return true;
            }
        }

        false
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core.id() == id {
            return self.core.self_comp();
        }

        for slot in [&self.header, &self.content] {
            let Some(c) = slot else {
                continue;
            };
            let g = c.read();
            if g.core().id() == id {
                drop(g);
                return Some(c.clone());
            }
            if let Some(cont) = g.as_container() {
                if let Some(found) = cont.by_id(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn clear(&mut self) {
        if let Some(header) = self.header.take() {
            header.write().core_mut().set_parent(None);
        }
        if let Some(content) = self.content.take() {
            content.write().core_mut().set_parent(None);
        }
    }
}
