//! Tree consistency: parent links, id lookup, removal and orphaning
//! across the container types.

use gwu_widgets::{
    comp_by_id, descendant_of, make_orphan, Button, Comp, Container, Label, Link, Panel, Table,
    Window,
};

#[test]
fn add_sets_parent_and_find_by_id() {
    let panel = Panel::new();
    let button = Button::new("hi");

    panel.write().add(button.as_comp());

    let parent = button.read().core().parent().expect("parent set");
    assert_eq!(parent.read().core().id(), panel.id());

    let found = comp_by_id(&panel.as_comp(), button.id()).expect("found");
    assert_eq!(found.read().core().id(), button.id());
}

#[test]
fn remove_clears_parent_and_lookup() {
    let panel = Panel::new();
    let button = Button::new("hi");
    panel.write().add(button.as_comp());

    assert!(panel.write().remove(&button.as_comp()));

    assert!(button.read().core().parent().is_none());
    assert!(comp_by_id(&panel.as_comp(), button.id()).is_none());

    // A second removal reports failure.
    assert!(!panel.write().remove(&button.as_comp()));
}

#[test]
fn find_searches_self_first_then_recurses() {
    let outer = Panel::new();
    let inner = Panel::new();
    let leaf = Label::new("leaf");

    inner.write().add(leaf.as_comp());
    outer.write().add(inner.as_comp());

    let found_self = comp_by_id(&outer.as_comp(), outer.id()).expect("self");
    assert_eq!(found_self.read().core().id(), outer.id());

    let found_leaf = comp_by_id(&outer.as_comp(), leaf.id()).expect("leaf");
    assert_eq!(found_leaf.read().core().id(), leaf.id());

    let unknown = gwu_core::Id(u64::MAX);
    assert!(comp_by_id(&outer.as_comp(), unknown).is_none());
}

#[test]
fn descendant_chain() {
    let root = Panel::new();
    let mid = Panel::new();
    let leaf = Button::new("x");

    mid.write().add(leaf.as_comp());
    root.write().add(mid.as_comp());

    assert!(descendant_of(&leaf.as_comp(), &mid.as_comp()));
    assert!(descendant_of(&leaf.as_comp(), &root.as_comp()));
    assert!(descendant_of(&mid.as_comp(), &root.as_comp()));
    assert!(!descendant_of(&root.as_comp(), &leaf.as_comp()));
    assert!(!descendant_of(&leaf.as_comp(), &leaf.as_comp()));
}

#[test]
fn adding_elsewhere_moves_the_component() {
    let a = Panel::new();
    let b = Panel::new();
    let c = Button::new("x");

    a.write().add(c.as_comp());
    assert_eq!(a.read().comps_count(), 1);

    b.write().add(c.as_comp());
    assert_eq!(a.read().comps_count(), 0);
    assert_eq!(b.read().comps_count(), 1);

    let parent = c.read().core().parent().expect("parent");
    assert_eq!(parent.read().core().id(), b.id());
}

#[test]
fn re_adding_to_same_panel_moves_to_end() {
    let panel = Panel::new();
    let first = Button::new("1");
    let second = Button::new("2");

    panel.write().add(first.as_comp());
    panel.write().add(second.as_comp());
    panel.write().add(first.as_comp());

    assert_eq!(panel.read().comps_count(), 2);
    let last = panel.read().comp_at(1).expect("last");
    assert_eq!(last.read().core().id(), first.id());
}

#[test]
fn make_orphan_detaches() {
    let panel = Panel::new();
    let button = Button::new("x");
    panel.write().add(button.as_comp());

    assert!(make_orphan(&button.as_comp()));
    assert!(button.read().core().parent().is_none());
    assert_eq!(panel.read().comps_count(), 0);

    // Already an orphan.
    assert!(!make_orphan(&button.as_comp()));
}

#[test]
fn cell_fmt_only_for_children_and_evicted_on_removal() {
    let panel = Panel::new();
    let child = Button::new("x");
    let stranger = Button::new("y");
    panel.write().add(child.as_comp());

    assert!(panel.write().cell_fmt(&child.as_comp()).is_some());
    assert!(panel.write().cell_fmt(&stranger.as_comp()).is_none());

    {
        let mut g = panel.write();
        let cf = g.cell_fmt(&child.as_comp()).unwrap();
        cf.style_mut().add_class("special");
    }

    panel.write().remove(&child.as_comp());
    panel.write().add(child.as_comp());

    // The formatter was dropped with the removal; re-adding starts fresh.
    let mut g = panel.write();
    let cf = g.cell_fmt(&child.as_comp()).unwrap();
    assert!(cf.style().classes().is_empty());
}

#[test]
fn clear_orphans_all_children() {
    let panel = Panel::new();
    let a = Button::new("a");
    let b = Button::new("b");
    panel.write().add(a.as_comp());
    panel.write().add(b.as_comp());

    panel.write().clear();

    assert_eq!(panel.read().comps_count(), 0);
    assert!(a.read().core().parent().is_none());
    assert!(b.read().core().parent().is_none());
}

#[test]
fn insert_positions() {
    let panel = Panel::new();
    let a = Button::new("a");
    let b = Button::new("b");
    let c = Button::new("c");

    panel.write().add(a.as_comp());
    panel.write().add(c.as_comp());
    assert!(panel.write().insert(b.as_comp(), 1));
    assert!(!panel.write().insert(Button::new("x").as_comp(), 5));

    let ids: Vec<_> = (0..3)
        .map(|i| panel.read().comp_at(i).unwrap().read().core().id())
        .collect();
    assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
}

#[test]
fn table_grid_and_spans() {
    let table = Table::new();
    let cell = Label::new("cell");

    table.write().ensure_size(2, 3);
    table.write().add(cell.as_comp(), 1, 2);

    assert_eq!(table.read().comps_count(), 1);
    let at = table.read().comp_at(1, 2).expect("filled");
    assert_eq!(at.read().core().id(), cell.id());
    assert_eq!(table.read().comp_idx(&cell.as_comp()), Some((1, 2)));

    // Lookup reaches into the grid.
    let found = comp_by_id(&table.as_comp(), cell.id()).expect("found");
    assert_eq!(found.read().core().id(), cell.id());

    // Spans below 2 are deleted rather than stored.
    table.write().set_col_span(1, 2, 3);
    assert_eq!(table.read().col_span(1, 2), 3);
    table.write().set_col_span(1, 2, 1);
    assert_eq!(table.read().col_span(1, 2), -1);
    table.write().set_row_span(1, 2, 2);
    assert_eq!(table.read().row_span(1, 2), 2);
    assert_eq!(table.read().row_span(0, 0), -1);

    // Growing on demand.
    table.write().add(Label::new("far").as_comp(), 4, 4);
    assert!(table.read().comp_at(4, 4).is_some());
    assert!(table.read().comp_at(4, 5).is_none());

    assert!(table.write().remove(&cell.as_comp()));
    assert!(cell.read().core().parent().is_none());
    assert!(table.read().comp_at(1, 2).is_none());
}

#[test]
fn link_holds_one_child() {
    let link = Link::new("docs", "https://example.invalid/docs");
    let child = Label::new("child");

    link.write().set_comp(child.as_comp());
    let found = comp_by_id(&link.as_comp(), child.id()).expect("found");
    assert_eq!(found.read().core().id(), child.id());

    let replacement = Label::new("replacement");
    link.write().set_comp(replacement.as_comp());
    assert!(child.read().core().parent().is_none());
    assert!(comp_by_id(&link.as_comp(), child.id()).is_none());

    assert!(link.write().remove(&replacement.as_comp()));
    assert!(link.read().comp().is_none());
}

#[test]
fn window_is_a_container() {
    let win = Window::new("main", "Main");
    let button = Button::new("x");
    win.write().add(button.as_comp());

    let found = win.read().by_id(button.id()).expect("found");
    assert_eq!(found.read().core().id(), button.id());

    let self_found = win.read().by_id(win.id()).expect("self");
    assert_eq!(self_found.read().core().id(), win.id());
}
