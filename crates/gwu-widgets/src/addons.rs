//! Cell formatters and small shared rendering helpers.

use std::collections::BTreeMap;
use std::io;

use gwu_core::Writer;
use gwu_style::{HAlign, Style, VAlign};

/// Formatter of a wrapper cell: alignment, style and raw cell attributes
/// for the `<td>` (or `<tr>`) around one child of a container.
///
/// A container creates the formatter of a child lazily on first access and
/// drops it when the child is removed.
#[derive(Debug, Default)]
pub struct CellFmt {
    halign: HAlign,
    valign: VAlign,
    style: Option<Box<Style>>,
    attrs: BTreeMap<String, String>,
}

impl CellFmt {
    /// Creates a formatter with default (inherited) alignments.
    #[must_use]
    pub fn new() -> CellFmt {
        CellFmt::default()
    }

    /// The horizontal alignment override of the cell.
    #[must_use]
    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn set_halign(&mut self, halign: HAlign) {
        self.halign = halign;
    }

    /// The vertical alignment override of the cell.
    #[must_use]
    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn set_valign(&mut self, valign: VAlign) {
        self.valign = valign;
    }

    /// Sets both alignments.
    pub fn set_align(&mut self, halign: HAlign, valign: VAlign) {
        self.halign = halign;
        self.valign = valign;
    }

    /// The style builder of the wrapper cell.
    #[must_use]
    pub fn style(&self) -> &Style {
        static EMPTY: Style = Style::new();
        self.style.as_deref().unwrap_or(&EMPTY)
    }

    /// The style builder of the wrapper cell, created on first use.
    pub fn style_mut(&mut self) -> &mut Style {
        self.style.get_or_insert_with(Default::default)
    }

    pub(crate) fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map_or("", String::as_str)
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.attrs.remove(name);
        } else {
            self.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub(crate) fn iattr(&self, name: &str) -> i32 {
        self.attr(name).parse().unwrap_or(-1)
    }

    pub(crate) fn set_iattr(&mut self, name: &str, value: i32) {
        self.set_attr(name, &value.to_string());
    }

    /// Renders the formatted opening tag. `tag` must start with a less-than
    /// sign, e.g. `"<td"`.
    pub fn render(&self, tag: &str, w: &mut Writer<'_>) -> io::Result<()> {
        self.render_with_aligns(tag, self.halign, self.valign, w)
    }

    /// Renders the formatted opening tag using the given alignments instead
    /// of this formatter's own.
    pub fn render_with_aligns(
        &self,
        tag: &str,
        halign: HAlign,
        valign: VAlign,
        w: &mut Writer<'_>,
    ) -> io::Result<()> {
        w.writes(tag)?;

        for (name, value) in &self.attrs {
            w.write_attr(name, value)?;
        }

        if halign != HAlign::Default {
            w.writes(" align=\"")?;
            w.writes(halign.as_str())?;
            w.writes("\"")?;
        }

        if let Some(style) = &self.style {
            style.render_classes(w)?;
        }

        let has_style_attrs = self.style.as_ref().is_some_and(|s| !s.is_empty());
        if valign != VAlign::Default || has_style_attrs {
            w.writes(" style=\"")?;
            if valign != VAlign::Default {
                w.writes("vertical-align:")?;
                w.writes(valign.as_str())?;
                w.writes(";")?;
            }
            if let Some(style) = &self.style {
                style.render_attrs(w)?;
            }
            w.writes("\"")?;
        }

        w.writes(">").map(|_| ())
    }
}

/// Renders the `disabled` attribute of a disable-able widget.
pub(crate) fn render_enabled(enabled: bool, w: &mut Writer<'_>) -> io::Result<()> {
    if !enabled {
        w.writes(" disabled=\"disabled\"")?;
    }
    Ok(())
}
