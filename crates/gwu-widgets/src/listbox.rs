//! ListBox: selecting one or multiple values from a predefined list.

use std::any::Any;
use std::io;

use gwu_core::{EventType, Writer};

use crate::addons::render_enabled;
use crate::comp::{Comp, CompCore, Ref};
use crate::event::Event;

/// A component for selecting one or more values from a list.
///
/// Suggested event type to handle changes: [`EventType::Change`].
///
/// The client reports the selection as a comma-separated (and
/// comma-terminated) list of selected option indices.
///
/// Default style class: `gwu-ListBox`.
pub struct ListBox {
    core: CompCore,
    enabled: bool,
    values: Vec<String>,
    selected: Vec<bool>,
    multi: bool,
    rows: i32,
}

impl ListBox {
    /// Creates a new ListBox with the given values, nothing selected.
    #[must_use]
    pub fn new<S: AsRef<str>>(values: &[S]) -> Ref<ListBox> {
        let mut core = CompCore::new("selIdxs(this)");
        core.add_sync_on_etypes(&[EventType::Change]);
        let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        let selected = vec![false; values.len()];
        let c = Ref::new(ListBox {
            core,
            enabled: true,
            values,
            selected,
            multi: false,
            rows: 1,
        });
        c.write().core.style_mut().add_class("gwu-ListBox");
        c
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Tells if multiple selections are allowed.
    #[must_use]
    pub fn multi(&self) -> bool {
        self.multi
    }

    pub fn set_multi(&mut self, multi: bool) {
        self.multi = multi;
    }

    /// Number of displayed rows. `rows = 1` renders a dropdown list
    /// (unless multi-select).
    #[must_use]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn set_rows(&mut self, rows: i32) {
        self.rows = rows;
    }

    /// The values to choose from.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Replaces the values, clearing the selection.
    pub fn set_values<S: AsRef<str>>(&mut self, values: &[S]) {
        self.values = values.iter().map(|v| v.as_ref().to_string()).collect();
        self.selected = vec![false; self.values.len()];
    }

    /// The first selected value, empty string if none.
    #[must_use]
    pub fn selected_value(&self) -> &str {
        self.selected_idx()
            .map_or("", |i| self.values[i].as_str())
    }

    /// All selected values.
    #[must_use]
    pub fn selected_values(&self) -> Vec<&str> {
        self.selected_indices()
            .into_iter()
            .map(|i| self.values[i].as_str())
            .collect()
    }

    /// Tells if the value at the given index is selected.
    #[must_use]
    pub fn selected(&self, idx: usize) -> bool {
        self.selected.get(idx).copied().unwrap_or(false)
    }

    /// The first selected index, if any.
    #[must_use]
    pub fn selected_idx(&self) -> Option<usize> {
        self.selected.iter().position(|&s| s)
    }

    /// The indices of all selected values, ascending.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }

    /// Sets the selection state of the value at the given index.
    pub fn set_selected(&mut self, idx: usize, selected: bool) {
        if let Some(slot) = self.selected.get_mut(idx) {
            *slot = selected;
        }
    }

    /// Selects exactly the given indices.
    pub fn set_selected_indices(&mut self, indices: &[usize]) {
        self.selected.fill(false);
        for &idx in indices {
            if let Some(slot) = self.selected.get_mut(idx) {
                *slot = true;
            }
        }
    }

    /// Deselects all values.
    pub fn clear_selected(&mut self) {
        self.selected.fill(false);
    }
}

impl Comp for ListBox {
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

    fn preprocess(&mut self, ev: &Event) {
        let Some(value) = ev.comp_value() else {
            return;
        };

        self.clear_selected();
        for part in value.split(',') {
            if let Ok(idx) = part.parse::<usize>() {
                if let Some(slot) = self.selected.get_mut(idx) {
                    *slot = true;
                }
            }
        }
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<select")?;
        if self.multi {
            w.writes(" multiple=\"multiple\"")?;
        }
        w.write_attr("size", &self.rows.to_string())?;
        self.core.render_attrs_and_style(w)?;
        render_enabled(self.enabled, w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        for (i, value) in self.values.iter().enumerate() {
            if self.selected[i] {
                w.writes("<option selected=\"selected\">")?;
            } else {
                w.writes("<option>")?;
            }
            w.writees(value)?;
            w.writes("</option>")?;
        }

        w.writes("</select>").map(|_| ())
    }
}
