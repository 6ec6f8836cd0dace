//! Dirty-set minimization: no member of the dirty set is ever a
//! descendant of another member.

use gwu_core::EventType;
use gwu_widgets::{descendant_of, Button, Comp, CompRef, Event, Label, Panel, Ref, Session};

fn click_event(src: CompRef) -> Event {
    Event::new(EventType::Click, src, Session::new_public())
}

/// Three-level tree: root -> mid -> leaf, with extra siblings.
struct Tree {
    root: Ref<Panel>,
    mid: Ref<Panel>,
    leaf: Ref<Button>,
    side: Ref<Label>,
}

fn build_tree() -> Tree {
    let root = Panel::new();
    let mid = Panel::new();
    let leaf = Button::new("leaf");
    let side = Label::new("side");

    mid.write().add(leaf.as_comp());
    root.write().add(mid.as_comp());
    root.write().add(side.as_comp());

    Tree {
        root,
        mid,
        leaf,
        side,
    }
}

fn assert_minimal(ev: &Event, members: &[CompRef]) {
    for a in members {
        for b in members {
            if a.read().core().id() == b.read().core().id() {
                continue;
            }
            assert!(
                !descendant_of(a, b),
                "dirty member {} is a descendant of member {}",
                a.read().core().id(),
                b.read().core().id()
            );
        }
    }
    let ids = ev.dirty_ids();
    assert_eq!(ids.len(), members.len());
}

#[test]
fn ancestor_absorbs_descendants() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    ev.mark_dirty(&t.leaf.as_comp());
    ev.mark_dirty(&t.root.as_comp());

    assert_eq!(ev.dirty_ids(), vec![t.root.id()]);
}

#[test]
fn descendant_of_dirty_ancestor_is_noop() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    ev.mark_dirty(&t.root.as_comp());
    ev.mark_dirty(&t.leaf.as_comp());
    ev.mark_dirty(&t.mid.as_comp());

    assert_eq!(ev.dirty_ids(), vec![t.root.id()]);
}

#[test]
fn unrelated_components_accumulate() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    ev.mark_dirty(&t.mid.as_comp());
    ev.mark_dirty(&t.side.as_comp());

    let mut expected = vec![t.mid.id(), t.side.id()];
    expected.sort();
    assert_eq!(ev.dirty_ids(), expected);

    assert_minimal(&ev, &[t.mid.as_comp(), t.side.as_comp()]);
}

#[test]
fn marking_twice_is_idempotent() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    ev.mark_dirty(&t.mid.as_comp());
    ev.mark_dirty(&t.mid.as_comp());

    assert_eq!(ev.dirty_ids(), vec![t.mid.id()]);
}

#[test]
fn every_mark_order_stays_minimal() {
    // All 6 orders of marking {leaf, mid, side} end minimal, with mid
    // absorbing leaf every time.
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let t = build_tree();
        let comps = [t.leaf.as_comp(), t.mid.as_comp(), t.side.as_comp()];
        let ev = click_event(t.leaf.as_comp());

        for &i in &order {
            ev.mark_dirty(&comps[i]);
        }

        let mut expected = vec![t.mid.id(), t.side.id()];
        expected.sort();
        assert_eq!(ev.dirty_ids(), expected, "order {order:?}");
        assert_minimal(&ev, &[t.mid.as_comp(), t.side.as_comp()]);
    }
}

#[test]
fn forked_event_shares_the_dirty_set() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    ev.mark_dirty(&t.side.as_comp());
    let fork = ev.fork(EventType::StateChange, t.mid.as_comp());
    fork.mark_dirty(&t.mid.as_comp());

    let mut expected = vec![t.mid.id(), t.side.id()];
    expected.sort();
    assert_eq!(ev.dirty_ids(), expected);
    assert_eq!(fork.dirty_ids(), ev.dirty_ids());

    // The fork keeps its own source and unknown mouse coordinates, and
    // points back at its parent.
    assert_eq!(fork.mouse(), (-1, -1));
    assert_eq!(fork.etype(), EventType::StateChange);
    let parent = fork.parent().expect("parent event");
    assert_eq!(parent.etype(), EventType::Click);
    assert_eq!(parent.src().read().core().id(), t.leaf.id());
}

#[test]
fn reload_and_focus_are_recorded() {
    let t = build_tree();
    let ev = click_event(t.leaf.as_comp());

    assert!(ev.reload_requested().is_none());
    ev.mark_dirty(&t.side.as_comp());
    ev.reload_win("main");
    assert_eq!(ev.reload_requested().as_deref(), Some("main"));

    ev.set_focused_comp(&t.leaf.as_comp());
    let focused = ev.focused_comp().expect("focus target");
    assert_eq!(focused.read().core().id(), t.leaf.id());
}
