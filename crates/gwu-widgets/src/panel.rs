//! Panel: the ordered container with a layout strategy.

use std::any::Any;
use std::collections::HashMap;
use std::io;

use gwu_core::{Id, Writer};
use gwu_style::{HAlign, VAlign};

use crate::addons::CellFmt;
use crate::comp::{current_parent, Comp, CompCore, CompRef, Container, CurrentParent, Ref};
use crate::html::Html;

/// Layout strategy of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Children are rendered in their natural (inline) order.
    Natural,
    /// Children are laid out vertically.
    #[default]
    Vertical,
    /// Children are laid out horizontally.
    Horizontal,
}

/// A container which stores child components in order and lays them out
/// according to a [`Layout`] strategy. Each child has a lazily created
/// cell formatter to override alignment and style of its wrapper cell.
///
/// Default style class: `gwu-Panel`.
pub struct Panel {
    core: CompCore,
    halign: HAlign,
    valign: VAlign,
    layout: Layout,
    comps: Vec<CompRef>,
    cell_fmts: HashMap<Id, CellFmt>,
}

impl Panel {
    /// Creates a new panel with vertical layout and default alignments.
    #[must_use]
    pub fn new() -> Ref<Panel> {
        let panel = Ref::new(Panel::bare());
        panel.write().core_mut().style_mut().add_class("gwu-Panel");
        panel
    }

    /// A panel without the default style class; building block for panel-
    /// like components (windows, tab bars).
    pub(crate) fn bare() -> Panel {
        Panel {
            core: CompCore::new(""),
            halign: HAlign::Default,
            valign: VAlign::Default,
            layout: Layout::Vertical,
            comps: Vec::new(),
            cell_fmts: HashMap::new(),
        }
    }

    /// The layout strategy.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Default horizontal alignment for all children.
    #[must_use]
    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn set_halign(&mut self, halign: HAlign) {
        self.halign = halign;
    }

    /// Default vertical alignment for all children.
    #[must_use]
    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn set_valign(&mut self, valign: VAlign) {
        self.valign = valign;
    }

    /// Sets both default alignments.
    pub fn set_align(&mut self, halign: HAlign, valign: VAlign) {
        self.halign = halign;
        self.valign = valign;
    }

    /// Number of child components.
    #[must_use]
    pub fn comps_count(&self) -> usize {
        self.comps.len()
    }

    /// The child at the given index.
    #[must_use]
    pub fn comp_at(&self, idx: usize) -> Option<CompRef> {
        self.comps.get(idx).cloned()
    }

    /// The index of a child, `None` if it is not a child.
    #[must_use]
    pub fn comp_idx(&self, c: &CompRef) -> Option<usize> {
        let cid = c.read().core().id();
        self.comps.iter().position(|c2| c2.read().core().id() == cid)
    }

    /// The cell formatter of a child, created on first access.
    /// `None` if the component is not a child.
    pub fn cell_fmt(&mut self, c: &CompRef) -> Option<&mut CellFmt> {
        self.comp_idx(c)?;
        let cid = c.read().core().id();
        Some(self.cell_fmts.entry(cid).or_default())
    }

    /// Adds a component as the last child, detaching it from its current
    /// parent first.
    pub fn add(&mut self, c: CompRef) {
        self.adopt(&c);
        c.write().core_mut().set_parent(self.core.self_weak());
        self.comps.push(c);
    }

    /// Inserts a component at the given index. `idx == comps_count()` is
    /// allowed and appends. Returns whether the index was valid.
    pub fn insert(&mut self, c: CompRef, idx: usize) -> bool {
        if idx > self.comps.len() {
            return false;
        }
        self.adopt(&c);
        // The index may have shifted if the component was our own child.
        let idx = idx.min(self.comps.len());
        c.write().core_mut().set_parent(self.core.self_weak());
        self.comps.insert(idx, c);
        true
    }

    /// Adds a vertical spacer of the given height (pixels); returns it.
    pub fn add_vspace(&mut self, height: i32) -> Ref<Html> {
        let spacer = Html::new("&nbsp;");
        spacer.write().core_mut().style_mut().set_height_px(height);
        self.add(spacer.as_comp());
        spacer
    }

    /// Adds a horizontal spacer of the given width (pixels); returns it.
    pub fn add_hspace(&mut self, width: i32) -> Ref<Html> {
        let spacer = Html::new("&nbsp;");
        spacer.write().core_mut().style_mut().set_width_px(width);
        self.add(spacer.as_comp());
        spacer
    }

    /// Detaches a component from its current parent, which may be this very
    /// panel. The same-parent case is handled without re-locking ourselves.
    fn adopt(&mut self, c: &CompRef) {
        match current_parent(&self.core, c) {
            CurrentParent::None => {}
            CurrentParent::Adopter => {
                self.remove_child(c);
            }
            CurrentParent::Other(parent) => {
                let mut g = parent.write();
                if let Some(cont) = g.as_container_mut() {
                    cont.remove(c);
                }
            }
        }
    }

    /// Plain child removal: drops the reference and the cell formatter,
    /// clears the parent link.
    pub(crate) fn remove_child(&mut self, c: &CompRef) -> bool {
        let Some(idx) = self.comp_idx(c) else {
            return false;
        };

        let cid = c.read().core().id();
        self.cell_fmts.remove(&cid);
        let removed = self.comps.remove(idx);
        removed.write().core_mut().set_parent(None);
        true
    }

    pub(crate) fn by_id_children(&self, id: Id) -> Option<CompRef> {
        for child in &self.comps {
            let g = child.read();
            if g.core().id() == id {
                drop(g);
                return Some(child.clone());
            }
            if let Some(cont) = g.as_container() {
                if let Some(found) = cont.by_id(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub(crate) fn clear_children(&mut self) {
        self.cell_fmts.clear();
        for c in self.comps.drain(..) {
            c.write().core_mut().set_parent(None);
        }
    }

    /// Renders the panel body with the current layout strategy. Split out
    /// so window rendering can reuse it.
    pub(crate) fn render_body(&self, w: &mut Writer<'_>) -> io::Result<()> {
        match self.layout {
            Layout::Natural => self.layout_natural(w),
            Layout::Horizontal => self.layout_horizontal(w),
            Layout::Vertical => self.layout_vertical(w),
        }
    }

    fn layout_natural(&self, w: &mut Writer<'_>) -> io::Result<()> {
        // No wrapper table, but a wrapper tag is still needed for the
        // attributes and handlers.
        w.writes("<span")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        for c in &self.comps {
            c.read().render(w)?;
        }

        w.writes("</span>").map(|_| ())
    }

    fn layout_horizontal(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<table")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;
        self.render_tr_tag(w)?;

        for c in &self.comps {
            self.render_td_of(c, w)?;
            c.read().render(w)?;
        }

        w.writes("</table>").map(|_| ())
    }

    fn layout_vertical(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<table")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        for c in &self.comps {
            self.render_tr_tag(w)?;
            self.render_td_of(c, w)?;
            c.read().render(w)?;
        }

        w.writes("</table>").map(|_| ())
    }

    /// Renders a TR tag carrying the panel-level alignments.
    pub(crate) fn render_tr_tag(&self, w: &mut Writer<'_>) -> io::Result<()> {
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

    /// Renders the TD tag of a child, formatted if it has a cell formatter.
    pub(crate) fn render_td_of(&self, c: &CompRef, w: &mut Writer<'_>) -> io::Result<()> {
        let cid = c.read().core().id();
        match self.cell_fmts.get(&cid) {
            Some(cf) => cf.render("<td", w),
            None => w.writes("<td>").map(|_| ()),
        }
    }
}

impl Comp for Panel {
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
        self.render_body(w)
    }
}

impl Container for Panel {
    fn remove(&mut self, c: &CompRef) -> bool {
        self.remove_child(c)
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core.id() == id {
            return self.core.self_comp();
        }
        self.by_id_children(id)
    }

    fn clear(&mut self) {
        self.clear_children();
    }
}
