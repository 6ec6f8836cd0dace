//! Tab panel selection rules, especially the index bookkeeping on tab
//! removal.

use gwu_widgets::{Comp, CompRef, Container, Label, Ref, TabPanel};

fn content(label: &str) -> CompRef {
    Label::new(label).as_comp()
}

/// A tab panel with four content components; returns the panel and the
/// contents.
fn four_tabs() -> (Ref<TabPanel>, Vec<CompRef>) {
    let tp = TabPanel::new();
    let contents: Vec<CompRef> = (0..4).map(|i| content(&format!("T{i}"))).collect();
    for (i, c) in contents.iter().enumerate() {
        tp.write().add_string(&format!("tab{i}"), c.clone());
    }
    (tp, contents)
}

#[test]
fn first_added_tab_gets_selected() {
    let tp = TabPanel::new();
    assert_eq!(tp.read().selected(), -1);

    tp.write().add_string("a", content("A"));
    assert_eq!(tp.read().selected(), 0);
    assert_eq!(tp.read().prev_selected(), -1);

    tp.write().add_string("b", content("B"));
    assert_eq!(tp.read().selected(), 0);
}

#[test]
fn selecting_tracks_previous() {
    let (tp, _) = four_tabs();
    tp.write().set_selected(2);
    assert_eq!(tp.read().selected(), 2);
    assert_eq!(tp.read().prev_selected(), 0);

    tp.write().set_selected(3);
    assert_eq!(tp.read().prev_selected(), 2);

    // Out-of-range selection is a no-op.
    tp.write().set_selected(9);
    assert_eq!(tp.read().selected(), 3);
}

#[test]
fn removing_below_selection_shifts_it_down() {
    let (tp, contents) = four_tabs();
    tp.write().set_selected(2);

    assert!(tp.write().remove(&contents[0]));

    assert_eq!(tp.read().comps_count(), 3);
    // Still the same content selected, now at index 1.
    assert_eq!(tp.read().selected(), 1);
    let selected = tp.read().comp_at(1).unwrap();
    assert_eq!(
        selected.read().core().id(),
        contents[2].read().core().id()
    );
}

#[test]
fn removing_selected_keeps_position_and_previous_selection() {
    // Four tabs, selected = 2, previously selected = 0.
    let (tp, contents) = four_tabs();
    tp.write().set_selected(2);
    assert_eq!(tp.read().prev_selected(), 0);

    assert!(tp.write().remove(&contents[2]));

    // [T0, T1, T3] remain; the next tab at the same position is selected;
    // the previous selection survives the implicit change.
    assert_eq!(tp.read().comps_count(), 3);
    assert_eq!(tp.read().selected(), 2);
    assert_eq!(tp.read().prev_selected(), 0);
    let selected = tp.read().comp_at(2).unwrap();
    assert_eq!(
        selected.read().core().id(),
        contents[3].read().core().id()
    );
}

#[test]
fn removing_last_selected_selects_new_last() {
    let (tp, contents) = four_tabs();
    tp.write().set_selected(3);

    assert!(tp.write().remove(&contents[3]));

    assert_eq!(tp.read().selected(), 2);
}

#[test]
fn removing_only_tab_deselects() {
    let tp = TabPanel::new();
    let c = content("only");
    tp.write().add_string("only", c.clone());
    assert_eq!(tp.read().selected(), 0);

    assert!(tp.write().remove(&c));

    assert_eq!(tp.read().comps_count(), 0);
    assert_eq!(tp.read().selected(), -1);
}

#[test]
fn removing_a_tab_also_removes_its_content() {
    let (tp, contents) = four_tabs();

    // Remove through the tab bar side: take the tab component at index 1.
    let tab = tp.read().tab_bar().read().comp_at(1).unwrap();
    let removed = tp.write().remove(&tab);
    assert!(removed);

    assert_eq!(tp.read().comps_count(), 3);
    assert_eq!(tp.read().tab_bar().read().comps_count(), 3);
    assert!(contents[1].read().core().parent().is_none());
}

#[test]
fn removal_via_tab_bar_container_is_equivalent() {
    let (tp, contents) = four_tabs();
    let bar = tp.read().tab_bar().clone();
    let tab = bar.read().comp_at(0).unwrap();

    assert!(bar.write().remove(&tab));

    assert_eq!(tp.read().comps_count(), 3);
    assert_eq!(bar.read().comps_count(), 3);
    assert!(contents[0].read().core().parent().is_none());
}

#[test]
fn lookup_reaches_tabs_and_contents() {
    let (tp, contents) = four_tabs();
    let tab = tp.read().tab_bar().read().comp_at(2).unwrap();

    let by_tab = tp.read().by_id(tab.read().core().id());
    assert!(by_tab.is_some());

    let cid = contents[2].read().core().id();
    let by_content = tp.read().by_id(cid);
    assert!(by_content.is_some());
}

#[test]
fn selection_styles_follow_the_selected_tab() {
    let (tp, _) = four_tabs();
    tp.write().set_selected(1);

    let bar = tp.read().tab_bar().clone();
    for idx in 0..4 {
        let tab = bar.read().comp_at(idx).unwrap();
        let mut g = bar.write();
        let classes = g
            .cell_fmt(&tab)
            .expect("tab is a child")
            .style()
            .classes()
            .to_vec();
        drop(g);

        if idx == 1 {
            assert!(classes.iter().any(|c| c == "gwu-TabBar-Selected"));
            assert!(!classes.iter().any(|c| c == "gwu-TabBar-NotSelected"));
        } else {
            assert!(classes.iter().any(|c| c == "gwu-TabBar-NotSelected"));
            assert!(!classes.iter().any(|c| c == "gwu-TabBar-Selected"));
        }
    }
}
