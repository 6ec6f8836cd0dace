//! TabPanel: multiple child components of which one is visible, selected
//! through a tab bar.

use std::any::Any;
use std::io;
use std::sync::Weak;

use gwu_core::{EventType, Id, Writer};
use gwu_style::{HAlign, VAlign};

use crate::addons::CellFmt;
use crate::comp::{Comp, CompCore, CompRef, Container, Ref};
use crate::event::dispatch_event;
use crate::label::Label;
use crate::panel::{Layout, Panel};

/// The tab bar of a [`TabPanel`]. A panel of the tab components, sharing
/// its child index space with the tab panel's content list.
///
/// Removing a tab through the tab bar also removes the paired content
/// component from the tab panel.
///
/// Default style classes: `gwu-TabBar`, `gwu-TabBar-Top`,
/// `gwu-TabBar-Bottom`, `gwu-TabBar-Left`, `gwu-TabBar-Right`,
/// `gwu-TabBar-NotSelected`, `gwu-TabBar-Selected`.
pub struct TabBar {
    panel: Panel,
}

impl TabBar {
    fn new() -> Ref<TabBar> {
        Ref::new(TabBar {
            panel: Panel::bare(),
        })
    }

    /// Number of tabs.
    #[must_use]
    pub fn comps_count(&self) -> usize {
        self.panel.comps_count()
    }

    /// The tab component at the given index.
    #[must_use]
    pub fn comp_at(&self, idx: usize) -> Option<CompRef> {
        self.panel.comp_at(idx)
    }

    /// The index of a tab component.
    #[must_use]
    pub fn comp_idx(&self, c: &CompRef) -> Option<usize> {
        self.panel.comp_idx(c)
    }

    /// The cell formatter of a tab component.
    pub fn cell_fmt(&mut self, c: &CompRef) -> Option<&mut CellFmt> {
        self.panel.cell_fmt(c)
    }

    /// Sets the layout orientation and default alignment of the bar.
    fn set_orientation(&mut self, layout: Layout, halign: HAlign, valign: VAlign) {
        self.panel.set_layout(layout);
        self.panel.set_align(halign, valign);
    }
}

impl Comp for TabBar {
    fn core(&self) -> &CompCore {
        self.panel.core()
    }

    fn core_mut(&mut self) -> &mut CompCore {
        self.panel.core_mut()
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
        self.panel.render_body(w)
    }
}

impl Container for TabBar {
    fn remove(&mut self, c: &CompRef) -> bool {
        let Some(idx) = self.panel.comp_idx(c) else {
            return false;
        };

        // Removing a tab also removes the paired content component; the
        // parent tab panel does the bookkeeping. We pass ourselves in
        // because the tab panel cannot re-lock the bar the caller holds.
        let parent = self.panel.core().parent();
        let Some(parent) = parent else {
            return self.panel.remove_child(c);
        };

        let mut g = parent.write();
        match g.as_any_mut().downcast_mut::<TabPanel>() {
            Some(tp) => {
                tp.remove_pair(self, idx);
                true
            }
            None => self.panel.remove_child(c),
        }
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core().id() == id {
            return self.core().self_comp();
        }
        self.panel.by_id_children(id)
    }

    fn clear(&mut self) {
        self.panel.clear_children();
    }
}

/// Placement of the tab bar relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabBarPlacement {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl TabBarPlacement {
    const fn style_class(self) -> &'static str {
        match self {
            TabBarPlacement::Top => "gwu-TabBar-Top",
            TabBarPlacement::Bottom => "gwu-TabBar-Bottom",
            TabBarPlacement::Left => "gwu-TabBar-Left",
            TabBarPlacement::Right => "gwu-TabBar-Right",
        }
    }
}

/// A container with multiple children of which only the selected one is
/// visible, plus an internal [`TabBar`] to select it. Tab and content
/// lists share the same index space: removing either end of a pair removes
/// both.
///
/// Register [`EventType::StateChange`] handlers to be notified of
/// selection changes: the event source is the tab panel, and its parent
/// event carries the clicked tab and mouse coordinates.
///
/// Default style classes: `gwu-TabPanel`, `gwu-TabPanel-Content`.
pub struct TabPanel {
    panel: Panel,
    tab_bar: Ref<TabBar>,
    placement: TabBarPlacement,
    tab_bar_fmt: CellFmt,
    selected: i32,
    prev_selected: i32,
}

impl TabPanel {
    /// Creates a new TabPanel with the tab bar on top and nothing selected.
    #[must_use]
    pub fn new() -> Ref<TabPanel> {
        let tab_bar = TabBar::new();
        let c = Ref::new(TabPanel {
            panel: Panel::bare(),
            tab_bar: tab_bar.clone(),
            placement: TabBarPlacement::Top,
            tab_bar_fmt: CellFmt::new(),
            selected: -1,
            prev_selected: -1,
        });
        {
            let mut g = c.write();
            let self_weak = g.panel.core().self_weak();
            tab_bar.write().core_mut().set_parent(self_weak);
            g.tab_bar_fmt.style_mut().add_class("gwu-TabBar");
            g.apply_placement(TabBarPlacement::Top);
            g.tab_bar_fmt.set_align(HAlign::Left, VAlign::Top);
            g.panel.core_mut().style_mut().add_class("gwu-TabPanel");
        }
        c
    }

    /// The tab bar of the panel.
    #[must_use]
    pub fn tab_bar(&self) -> &Ref<TabBar> {
        &self.tab_bar
    }

    /// The tab bar placement.
    #[must_use]
    pub fn placement(&self) -> TabBarPlacement {
        self.placement
    }

    /// Sets the tab bar placement, along with matching layout and
    /// alignment defaults for the bar.
    pub fn set_placement(&mut self, placement: TabBarPlacement) {
        self.tab_bar_fmt
            .style_mut()
            .remove_class(self.placement.style_class());

        self.placement = placement;
        self.apply_placement(placement);
    }

    fn apply_placement(&mut self, placement: TabBarPlacement) {
        let mut bar = self.tab_bar.write();
        match placement {
            TabBarPlacement::Top => {
                bar.set_orientation(Layout::Horizontal, HAlign::Left, VAlign::Bottom);
            }
            TabBarPlacement::Bottom => {
                bar.set_orientation(Layout::Horizontal, HAlign::Left, VAlign::Top);
            }
            TabBarPlacement::Left => {
                bar.set_orientation(Layout::Vertical, HAlign::Right, VAlign::Top);
            }
            TabBarPlacement::Right => {
                bar.set_orientation(Layout::Vertical, HAlign::Left, VAlign::Top);
            }
        }
        drop(bar);
        self.tab_bar_fmt
            .style_mut()
            .add_class(placement.style_class());
    }

    /// The cell formatter of the tab bar.
    #[must_use]
    pub fn tab_bar_fmt(&self) -> &CellFmt {
        &self.tab_bar_fmt
    }

    /// The cell formatter of the tab bar, mutably.
    pub fn tab_bar_fmt_mut(&mut self) -> &mut CellFmt {
        &mut self.tab_bar_fmt
    }

    /// Number of tab/content pairs.
    #[must_use]
    pub fn comps_count(&self) -> usize {
        self.panel.comps_count()
    }

    /// The content component at the given index.
    #[must_use]
    pub fn comp_at(&self, idx: usize) -> Option<CompRef> {
        self.panel.comp_at(idx)
    }

    /// The index of a content component.
    #[must_use]
    pub fn comp_idx(&self, c: &CompRef) -> Option<usize> {
        self.panel.comp_idx(c)
    }

    /// The cell formatter of a content component.
    pub fn cell_fmt(&mut self, c: &CompRef) -> Option<&mut CellFmt> {
        self.panel.cell_fmt(c)
    }

    /// Adds a new tab and its content component. The first added pair gets
    /// selected. Clicking the tab selects it and, when `StateChange`
    /// handlers are registered, dispatches a forked state-change event.
    pub fn add(&mut self, tab: CompRef, content: CompRef) {
        {
            let mut bar = self.tab_bar.write();
            bar.panel.add(tab.clone());
            if let Some(cf) = bar.panel.cell_fmt(&tab) {
                cf.style_mut().add_class("gwu-TabBar-NotSelected");
            }
        }
        self.panel.add(content.clone());
        if let Some(cf) = self.panel.cell_fmt(&content) {
            cf.style_mut().add_class("gwu-TabPanel-Content");
        }

        if self.panel.comps_count() == 1 {
            self.set_selected(0);
        }

        // TODO a removed tab keeps this selection handler; removal needs
        // handler deregistration support on CompCore.
        let tp_weak = self.panel.core().self_weak();
        let content_for_handler = content;
        tab.write().core_mut().add_handler_func(
            move |ev| {
                let Some(tp) = tp_weak.as_ref().and_then(Weak::upgrade) else {
                    return;
                };

                let fire_state_change = {
                    let mut g = tp.write();
                    let Some(this) = g.as_any_mut().downcast_mut::<TabPanel>() else {
                        return;
                    };
                    if let Some(idx) = this.comp_idx(&content_for_handler) {
                        this.set_selected(idx as i32);
                    }
                    this.core().handler_count(EventType::StateChange) > 0
                };

                ev.mark_dirty(&tp);
                if fire_state_change {
                    let mut forked = ev.fork(EventType::StateChange, tp.clone());
                    dispatch_event(&tp, &mut forked);
                }
            },
            &[EventType::Click],
        );
    }

    /// Adds a new tab with a label text and its content component.
    pub fn add_string(&mut self, tab: &str, content: CompRef) {
        let label = Label::new(tab);
        // Block display so the whole tab cell is clickable.
        label
            .write()
            .core_mut()
            .style_mut()
            .set_display(gwu_style::display::BLOCK);
        self.add(label.as_comp(), content);
    }

    /// The selected tab index, `-1` if no tab is selected.
    #[must_use]
    pub fn selected(&self) -> i32 {
        self.selected
    }

    /// The previously selected tab index, `-1` if there was none.
    #[must_use]
    pub fn prev_selected(&self) -> i32 {
        self.prev_selected
    }

    /// Sets the selected tab index and updates tab styling. `idx < 0`
    /// deselects all tabs; an index past the end is a no-op.
    pub fn set_selected(&mut self, idx: i32) {
        let bar = self.tab_bar.clone();
        let mut bar = bar.write();
        self.set_selected_with_bar(&mut bar, idx);
    }

    /// Selection change with the tab bar already locked; every internal
    /// path funnels through here so the bar is never re-locked.
    fn set_selected_with_bar(&mut self, bar: &mut TabBar, idx: i32) {
        if idx >= self.panel.comps_count() as i32 {
            return;
        }

        if self.selected >= 0 {
            if let Some(tab) = bar.panel.comp_at(self.selected as usize) {
                if let Some(cf) = bar.panel.cell_fmt(&tab) {
                    cf.style_mut().remove_class("gwu-TabBar-Selected");
                    cf.style_mut().add_class("gwu-TabBar-NotSelected");
                }
            }
        }

        self.prev_selected = self.selected;
        self.selected = idx;

        if self.selected >= 0 {
            if let Some(tab) = bar.panel.comp_at(self.selected as usize) {
                if let Some(cf) = bar.panel.cell_fmt(&tab) {
                    cf.style_mut().remove_class("gwu-TabBar-NotSelected");
                    cf.style_mut().add_class("gwu-TabBar-Selected");
                }
            }
        }
    }

    /// Removes the tab/content pair at `idx`, with the bar already locked.
    ///
    /// Selection index rules: an index below the selection shifts the
    /// selection down by one; removing the selected index selects the next
    /// tab at the same position, else the last remaining, else none. The
    /// previous-selection field survives that implicit change.
    fn remove_pair(&mut self, bar: &mut TabBar, idx: usize) {
        if let Some(tab) = bar.panel.comp_at(idx) {
            bar.panel.remove_child(&tab);
        }
        if let Some(content) = self.panel.comp_at(idx) {
            self.panel.remove_child(&content);
        }

        let idx = idx as i32;

        if self.prev_selected >= 0 {
            if idx < self.prev_selected {
                self.prev_selected -= 1;
            } else if idx == self.prev_selected {
                self.prev_selected = -1;
            }
        }

        if idx < self.selected {
            self.selected -= 1;
        } else if idx == self.selected {
            // The implicit re-selection below must not clobber the
            // previous-selection field.
            let prev_selected = self.prev_selected;
            let count = self.panel.comps_count() as i32;
            if idx < count {
                self.set_selected_with_bar(bar, idx);
            } else if idx > 0 {
                self.set_selected_with_bar(bar, idx - 1);
            } else {
                self.set_selected_with_bar(bar, -1);
            }
            self.prev_selected = prev_selected;
        }
    }

    /// Renders the selected content component's cell.
    fn render_content(&self, w: &mut Writer<'_>) -> io::Result<()> {
        if self.selected >= 0 {
            if let Some(c) = self.panel.comp_at(self.selected as usize) {
                self.panel.render_td_of(&c, w)?;
                return c.read().render(w);
            }
        }
        w.writes("<td>").map(|_| ())
    }
}

impl Comp for TabPanel {
    fn core(&self) -> &CompCore {
        self.panel.core()
    }

    fn core_mut(&mut self) -> &mut CompCore {
        self.panel.core_mut()
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
        self.core().render_attrs_and_style(w)?;
        self.core().render_ehandlers(w)?;
        w.writes(">")?;

        let bar = self.tab_bar.read();
        match self.placement {
            TabBarPlacement::Top => {
                w.writes("<tr>")?;
                self.tab_bar_fmt.render("<td", w)?;
                bar.render(w)?;
                self.panel.render_tr_tag(w)?;
                self.render_content(w)?;
            }
            TabBarPlacement::Bottom => {
                self.panel.render_tr_tag(w)?;
                self.render_content(w)?;
                w.writes("<tr>")?;
                self.tab_bar_fmt.render("<td", w)?;
                bar.render(w)?;
            }
            TabBarPlacement::Left => {
                self.panel.render_tr_tag(w)?;
                self.tab_bar_fmt.render("<td", w)?;
                bar.render(w)?;
                self.render_content(w)?;
            }
            TabBarPlacement::Right => {
                self.panel.render_tr_tag(w)?;
                self.render_content(w)?;
                self.tab_bar_fmt.render("<td", w)?;
                bar.render(w)?;
            }
        }

        w.writes("</table>").map(|_| ())
    }
}

impl Container for TabPanel {
    fn remove(&mut self, c: &CompRef) -> bool {
        let idx = self
            .panel
            .comp_idx(c)
            .or_else(|| self.tab_bar.read().panel.comp_idx(c));
        let Some(idx) = idx else {
            return false;
        };

        let bar = self.tab_bar.clone();
        let mut bar = bar.write();
        self.remove_pair(&mut bar, idx);
        true
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core().id() == id {
            return self.core().self_comp();
        }
        if let Some(found) = self.panel.by_id_children(id) {
            return Some(found);
        }
        self.tab_bar.read().by_id(id)
    }

    fn clear(&mut self) {
        self.tab_bar.write().panel.clear_children();
        self.panel.clear_children();
        self.set_selected(-1);
    }
}
