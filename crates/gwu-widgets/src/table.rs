//! Table: a container laying out children in a dynamically growing 2-D
//! grid.

use std::any::Any;
use std::collections::HashMap;
use std::io;

use gwu_core::{Id, Writer};
use gwu_style::{HAlign, VAlign};

use crate::addons::CellFmt;
use crate::comp::{current_parent, Comp, CompCore, CompRef, Container, CurrentParent, Ref};

/// A container laying out its children in a configurable, flexible table.
///
/// The grid grows on demand; when the size is known up front, calling
/// [`ensure_size`](Table::ensure_size) avoids repeated reallocation.
/// Rows and cells have their own formatters, and cells can span rows and
/// columns (stored as the `rowspan`/`colspan` cell attributes; span values
/// below 2 are deleted rather than stored).
///
/// Default style class: `gwu-Table`.
pub struct Table {
    core: CompCore,
    halign: HAlign,
    valign: VAlign,
    comps: Vec<Vec<Option<CompRef>>>,
    row_fmts: HashMap<usize, CellFmt>,
    cell_fmts: HashMap<(usize, usize), CellFmt>,
}

impl Table {
    /// Creates a new, empty Table.
    #[must_use]
    pub fn new() -> Ref<Table> {
        let mut core = CompCore::new("");
        core.set_attr("cellspacing", "0");
        core.set_attr("cellpadding", "0");
        let c = Ref::new(Table {
            core,
            halign: HAlign::Default,
            valign: VAlign::Default,
            comps: Vec::new(),
            row_fmts: HashMap::new(),
            cell_fmts: HashMap::new(),
        });
        c.write().core.style_mut().add_class("gwu-Table");
        c
    }

    /// The border width of the table (`-1` if unset).
    #[must_use]
    pub fn border(&self) -> i32 {
        self.core.iattr("border")
    }

    pub fn set_border(&mut self, width: i32) {
        self.core.set_iattr("border", width);
    }

    /// The cell spacing of the table.
    #[must_use]
    pub fn cell_spacing(&self) -> i32 {
        self.core.iattr("cellspacing")
    }

    pub fn set_cell_spacing(&mut self, spacing: i32) {
        self.core.set_iattr("cellspacing", spacing);
    }

    /// The cell padding of the table.
    #[must_use]
    pub fn cell_padding(&self) -> i32 {
        self.core.iattr("cellpadding")
    }

    pub fn set_cell_padding(&mut self, padding: i32) {
        self.core.set_iattr("cellpadding", padding);
    }

    /// Default horizontal alignment of children in their cells.
    #[must_use]
    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn set_halign(&mut self, halign: HAlign) {
        self.halign = halign;
    }

    /// Default vertical alignment of children in their cells.
    #[must_use]
    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn set_valign(&mut self, valign: VAlign) {
        self.valign = valign;
    }

    pub fn set_align(&mut self, halign: HAlign, valign: VAlign) {
        self.halign = halign;
        self.valign = valign;
    }

    /// Ensures the table has at least the given rows, and at least the
    /// given columns in each of those rows.
    pub fn ensure_size(&mut self, rows: usize, cols: usize) {
        self.ensure_rows(rows);
        for row in 0..rows {
            self.ensure_cols(row, cols);
        }
    }

    /// Ensures row `row` exists and has at least `cols` columns. Implies
    /// the table has at least `row + 1` rows.
    pub fn ensure_cols(&mut self, row: usize, cols: usize) {
        self.ensure_rows(row + 1);
        let row_comps = &mut self.comps[row];
        if cols > row_comps.len() {
            row_comps.resize(cols, None);
        }
    }

    fn ensure_rows(&mut self, rows: usize) {
        if rows > self.comps.len() {
            self.comps.resize_with(rows, Vec::new);
        }
    }

    /// Number of components in the table.
    #[must_use]
    pub fn comps_count(&self) -> usize {
        self.comps
            .iter()
            .map(|row| row.iter().filter(|c| c.is_some()).count())
            .sum()
    }

    /// The component at the given cell, if the cell exists and is filled.
    #[must_use]
    pub fn comp_at(&self, row: usize, col: usize) -> Option<CompRef> {
        self.comps.get(row)?.get(col)?.clone()
    }

    /// The cell of a component, `None` if it is not in the table.
    #[must_use]
    pub fn comp_idx(&self, c: &CompRef) -> Option<(usize, usize)> {
        let cid = c.read().core().id();
        for (row, row_comps) in self.comps.iter().enumerate() {
            for (col, slot) in row_comps.iter().enumerate() {
                if let Some(c2) = slot {
                    if c2.read().core().id() == cid {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// The row formatter of a row, created on first access.
    /// `None` if the table has no such row.
    pub fn row_fmt(&mut self, row: usize) -> Option<&mut CellFmt> {
        if row >= self.comps.len() {
            return None;
        }
        Some(self.row_fmts.entry(row).or_default())
    }

    /// The cell formatter of a cell, created on first access.
    /// `None` if the table has no such cell.
    pub fn cell_fmt(&mut self, row: usize, col: usize) -> Option<&mut CellFmt> {
        if row >= self.comps.len() || col >= self.comps[row].len() {
            return None;
        }
        Some(self.cell_fmts.entry((row, col)).or_default())
    }

    /// Puts a component into the given cell, growing the table as needed
    /// and orphaning any component already there.
    pub fn add(&mut self, c: CompRef, row: usize, col: usize) {
        match current_parent(&self.core, &c) {
            CurrentParent::None => {}
            CurrentParent::Adopter => {
                if let Some((r, cl)) = self.comp_idx(&c) {
                    c.write().core_mut().set_parent(None);
                    self.comps[r][cl] = None;
                }
            }
            CurrentParent::Other(parent) => {
                let mut g = parent.write();
                if let Some(cont) = g.as_container_mut() {
                    cont.remove(&c);
                }
            }
        }

        if row >= self.comps.len() || col >= self.comps[row].len() {
            self.ensure_cols(row, col + 1);
        }

        if let Some(old) = self.comps[row][col].take() {
            old.write().core_mut().set_parent(None);
        }

        c.write().core_mut().set_parent(self.core.self_weak());
        self.comps[row][col] = Some(c);
    }

    /// The row span of a cell, `-1` if the cell does not exist (or has no
    /// span set).
    #[must_use]
    pub fn row_span(&self, row: usize, col: usize) -> i32 {
        match self.cell_fmts.get(&(row, col)) {
            Some(cf) => cf.iattr("rowspan"),
            None => -1,
        }
    }

    /// Sets the row span of a cell; spans below 2 delete the attribute.
    pub fn set_row_span(&mut self, row: usize, col: usize, row_span: i32) {
        if let Some(cf) = self.cell_fmt(row, col) {
            if row_span < 2 {
                cf.set_attr("rowspan", "");
            } else {
                cf.set_iattr("rowspan", row_span);
            }
        }
    }

    /// The column span of a cell, `-1` if the cell does not exist (or has
    /// no span set).
    #[must_use]
    pub fn col_span(&self, row: usize, col: usize) -> i32 {
        match self.cell_fmts.get(&(row, col)) {
            Some(cf) => cf.iattr("colspan"),
            None => -1,
        }
    }

    /// Sets the column span of a cell; spans below 2 delete the attribute.
    pub fn set_col_span(&mut self, row: usize, col: usize, col_span: i32) {
        if let Some(cf) = self.cell_fmt(row, col) {
            if col_span < 2 {
                cf.set_attr("colspan", "");
            } else {
                cf.set_iattr("colspan", col_span);
            }
        }
    }

    /// Renders the TR tag of a row: the row formatter's, with table-level
    /// alignments as the fallback, or a plain table-aligned TR.
    fn render_row_tr(&self, row: usize, w: &mut Writer<'_>) -> io::Result<()> {
        match self.row_fmts.get(&row) {
            Some(rf) => {
                // Alignments the row formatter leaves default fall back to
                // the table's.
                let ha = if rf.halign() == HAlign::Default {
                    self.halign
                } else {
                    rf.halign()
                };
                let va = if rf.valign() == VAlign::Default {
                    self.valign
                } else {
                    rf.valign()
                };
                rf.render_with_aligns("<tr", ha, va, w)
            }
            None => {
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
    }

    fn render_td(&self, cell: (usize, usize), w: &mut Writer<'_>) -> io::Result<()> {
        match self.cell_fmts.get(&cell) {
            Some(cf) => cf.render("<td", w),
            None => w.writes("<td>").map(|_| ()),
        }
    }
}

impl Comp for Table {
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

        for (row, row_comps) in self.comps.iter().enumerate() {
            self.render_row_tr(row, w)?;
            for (col, slot) in row_comps.iter().enumerate() {
                self.render_td((row, col), w)?;
                if let Some(c) = slot {
                    c.read().render(w)?;
                }
            }
        }

        w.writes("</table>").map(|_| ())
    }
}

impl Container for Table {
    fn remove(&mut self, c: &CompRef) -> bool {
        let Some((row, col)) = self.comp_idx(c) else {
            return false;
        };

        c.write().core_mut().set_parent(None);
        self.comps[row][col] = None;
        true
    }

    fn by_id(&self, id: Id) -> Option<CompRef> {
        if self.core.id() == id {
            return self.core.self_comp();
        }

        for row_comps in &self.comps {
            for slot in row_comps.iter().flatten() {
                let g = slot.read();
                if g.core().id() == id {
                    drop(g);
                    return Some(slot.clone());
                }
                if let Some(cont) = g.as_container() {
                    if let Some(found) = cont.by_id(id) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    fn clear(&mut self) {
        self.row_fmts.clear();
        self.cell_fmts.clear();

        for row_comps in self.comps.drain(..) {
            for c in row_comps.into_iter().flatten() {
                c.write().core_mut().set_parent(None);
            }
        }
    }
}
