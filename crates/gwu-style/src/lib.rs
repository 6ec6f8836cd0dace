#![forbid(unsafe_code)]

//! Style builder for GWU components.
//!
//! Every component carries a [`Style`]: an ordered list of CSS class names
//! plus a map of explicitly set style attributes. Setters are chainable and
//! an empty value deletes the attribute. Rendering emits a `class="…"`
//! attribute when the class list is non-empty and a `style="…"` attribute
//! when the attribute map is non-empty.

use std::collections::BTreeMap;
use std::io;

use gwu_core::Writer;

/// Style attribute name constants.
pub mod st {
    pub const BACKGROUND: &str = "background";
    pub const BORDER: &str = "border";
    pub const BORDER_LEFT: &str = "border-left";
    pub const BORDER_RIGHT: &str = "border-right";
    pub const BORDER_TOP: &str = "border-top";
    pub const BORDER_BOTTOM: &str = "border-bottom";
    pub const COLOR: &str = "color";
    pub const CURSOR: &str = "cursor";
    pub const DISPLAY: &str = "display";
    pub const FONT_SIZE: &str = "font-size";
    pub const FONT_STYLE: &str = "font-style";
    pub const FONT_WEIGHT: &str = "font-weight";
    pub const HEIGHT: &str = "height";
    pub const MARGIN: &str = "margin";
    pub const MARGIN_LEFT: &str = "margin-left";
    pub const MARGIN_RIGHT: &str = "margin-right";
    pub const MARGIN_TOP: &str = "margin-top";
    pub const MARGIN_BOTTOM: &str = "margin-bottom";
    pub const PADDING: &str = "padding";
    pub const PADDING_LEFT: &str = "padding-left";
    pub const PADDING_RIGHT: &str = "padding-right";
    pub const PADDING_TOP: &str = "padding-top";
    pub const PADDING_BOTTOM: &str = "padding-bottom";
    pub const WHITE_SPACE: &str = "white-space";
    pub const WIDTH: &str = "width";
}

/// The 17 standard color names.
pub mod clr {
    pub const AQUA: &str = "Aqua";
    pub const BLACK: &str = "Black";
    pub const BLUE: &str = "Blue";
    pub const FUCHSIA: &str = "Fuchsia";
    pub const GRAY: &str = "Gray";
    pub const GREY: &str = "Grey";
    pub const GREEN: &str = "Green";
    pub const LIME: &str = "Lime";
    pub const MAROON: &str = "Maroon";
    pub const NAVY: &str = "Navy";
    pub const OLIVE: &str = "Olive";
    pub const PURPLE: &str = "Purple";
    pub const RED: &str = "Red";
    pub const SILVER: &str = "Silver";
    pub const TEAL: &str = "Teal";
    pub const WHITE: &str = "White";
    pub const YELLOW: &str = "Yellow";
}

/// Border style values.
pub mod brd_style {
    pub const SOLID: &str = "solid";
    pub const DASHED: &str = "dashed";
    pub const DOTTED: &str = "dotted";
    pub const DOUBLE: &str = "double";
    pub const GROOVE: &str = "groove";
    pub const RIDGE: &str = "ridge";
    pub const INSET: &str = "inset";
    pub const OUTSET: &str = "outset";
}

/// Font weight values.
pub mod font_weight {
    pub const NORMAL: &str = "normal";
    pub const BOLD: &str = "bold";
    pub const BOLDER: &str = "bolder";
    pub const LIGHTER: &str = "lighter";
}

/// Font style values.
pub mod font_style {
    pub const NORMAL: &str = "normal";
    pub const ITALIC: &str = "italic";
}

/// Mouse cursor values.
pub mod cursor {
    pub const AUTO: &str = "auto";
    pub const CROSSHAIR: &str = "crosshair";
    pub const DEFAULT: &str = "default";
    pub const HELP: &str = "help";
    pub const MOVE: &str = "move";
    pub const POINTER: &str = "pointer";
    pub const PROGRESS: &str = "progress";
    pub const TEXT: &str = "text";
    pub const WAIT: &str = "wait";
    pub const INHERIT: &str = "inherit";
}

/// Display mode values.
pub mod display {
    pub const NONE: &str = "none";
    pub const BLOCK: &str = "block";
    pub const INLINE: &str = "inline";
    pub const INHERIT: &str = "inherit";
}

/// White-space values.
pub mod white_space {
    pub const NORMAL: &str = "normal";
    pub const NOWRAP: &str = "nowrap";
    pub const PRE: &str = "pre";
    pub const PRE_LINE: &str = "pre-line";
    pub const PRE_WRAP: &str = "pre-wrap";
    pub const INHERIT: &str = "inherit";
}

/// Horizontal alignment of content inside a wrapper cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Browser default (or inherited) alignment; never rendered.
    #[default]
    Default,
    Left,
    Center,
    Right,
}

impl HAlign {
    /// The HTML attribute value, empty for [`HAlign::Default`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HAlign::Default => "",
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        }
    }
}

/// Vertical alignment of content inside a wrapper cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Browser default (or inherited) alignment; never rendered.
    #[default]
    Default,
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    /// The CSS `vertical-align` value, empty for [`VAlign::Default`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VAlign::Default => "",
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
    }
}

/// The style builder of a component or wrapper cell.
#[derive(Debug, Clone, Default)]
pub struct Style {
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
}

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub const fn new() -> Style {
        Style {
            classes: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Appends a class name to the class list.
    pub fn add_class(&mut self, class: &str) -> &mut Style {
        self.classes.push(class.to_string());
        self
    }

    /// Replaces all class names with the given one.
    /// Pass an empty string to remove all class names.
    pub fn set_class(&mut self, class: &str) -> &mut Style {
        self.classes.clear();
        if !class.is_empty() {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Removes the first occurrence of a class name; no-op if absent.
    pub fn remove_class(&mut self, class: &str) -> &mut Style {
        if let Some(pos) = self.classes.iter().position(|c| c == class) {
            self.classes.remove(pos);
        }
        self
    }

    /// The current class list.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns the explicitly set value of a style attribute
    /// (empty string if not set).
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.attrs.get(name).map_or("", String::as_str)
    }

    /// Sets a style attribute. An empty value deletes it.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Style {
        if value.is_empty() {
            self.attrs.remove(name);
        } else {
            self.attrs.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Returns the width and height.
    #[must_use]
    pub fn size(&self) -> (&str, &str) {
        (self.get(st::WIDTH), self.get(st::HEIGHT))
    }

    pub fn set_size(&mut self, width: &str, height: &str) -> &mut Style {
        self.set(st::WIDTH, width).set(st::HEIGHT, height)
    }

    pub fn set_size_px(&mut self, width: i32, height: i32) -> &mut Style {
        self.set_size(&format!("{width}px"), &format!("{height}px"))
    }

    /// Sets 100% width and height.
    pub fn set_full_size(&mut self) -> &mut Style {
        self.set_size("100%", "100%")
    }

    pub fn padding(&self) -> &str {
        self.get(st::PADDING)
    }

    pub fn set_padding(&mut self, value: &str) -> &mut Style {
        self.set(st::PADDING, value)
    }

    pub fn set_padding_px(&mut self, top: i32, right: i32, bottom: i32, left: i32) -> &mut Style {
        self.set_padding(&format!("{top}px {right}px {bottom}px {left}px"))
    }

    pub fn set_padding_left_px(&mut self, width: i32) -> &mut Style {
        self.set(st::PADDING_LEFT, &format!("{width}px"))
    }

    pub fn set_padding_right_px(&mut self, width: i32) -> &mut Style {
        self.set(st::PADDING_RIGHT, &format!("{width}px"))
    }

    pub fn set_padding_top_px(&mut self, height: i32) -> &mut Style {
        self.set(st::PADDING_TOP, &format!("{height}px"))
    }

    pub fn set_padding_bottom_px(&mut self, height: i32) -> &mut Style {
        self.set(st::PADDING_BOTTOM, &format!("{height}px"))
    }

    pub fn margin(&self) -> &str {
        self.get(st::MARGIN)
    }

    pub fn set_margin(&mut self, value: &str) -> &mut Style {
        self.set(st::MARGIN, value)
    }

    pub fn set_margin_px(&mut self, top: i32, right: i32, bottom: i32, left: i32) -> &mut Style {
        self.set_margin(&format!("{top}px {right}px {bottom}px {left}px"))
    }

    pub fn background(&self) -> &str {
        self.get(st::BACKGROUND)
    }

    pub fn set_background(&mut self, value: &str) -> &mut Style {
        self.set(st::BACKGROUND, value)
    }

    pub fn border(&self) -> &str {
        self.get(st::BORDER)
    }

    pub fn set_border(&mut self, value: &str) -> &mut Style {
        self.set(st::BORDER, value)
    }

    /// Sets the border from width (px), style and color parts.
    pub fn set_border_parts(&mut self, width: i32, style: &str, color: &str) -> &mut Style {
        self.set_border(&format!("{width}px {style} {color}"))
    }

    pub fn color(&self) -> &str {
        self.get(st::COLOR)
    }

    pub fn set_color(&mut self, value: &str) -> &mut Style {
        self.set(st::COLOR, value)
    }

    pub fn cursor(&self) -> &str {
        self.get(st::CURSOR)
    }

    pub fn set_cursor(&mut self, value: &str) -> &mut Style {
        self.set(st::CURSOR, value)
    }

    pub fn display(&self) -> &str {
        self.get(st::DISPLAY)
    }

    pub fn set_display(&mut self, value: &str) -> &mut Style {
        self.set(st::DISPLAY, value)
    }

    pub fn font_size(&self) -> &str {
        self.get(st::FONT_SIZE)
    }

    pub fn set_font_size(&mut self, value: &str) -> &mut Style {
        self.set(st::FONT_SIZE, value)
    }

    pub fn font_style(&self) -> &str {
        self.get(st::FONT_STYLE)
    }

    pub fn set_font_style(&mut self, value: &str) -> &mut Style {
        self.set(st::FONT_STYLE, value)
    }

    pub fn font_weight(&self) -> &str {
        self.get(st::FONT_WEIGHT)
    }

    pub fn set_font_weight(&mut self, value: &str) -> &mut Style {
        self.set(st::FONT_WEIGHT, value)
    }

    pub fn width(&self) -> &str {
        self.get(st::WIDTH)
    }

    pub fn set_width(&mut self, value: &str) -> &mut Style {
        self.set(st::WIDTH, value)
    }

    pub fn set_width_px(&mut self, width: i32) -> &mut Style {
        self.set_width(&format!("{width}px"))
    }

    pub fn set_full_width(&mut self) -> &mut Style {
        self.set_width("100%")
    }

    pub fn height(&self) -> &str {
        self.get(st::HEIGHT)
    }

    pub fn set_height(&mut self, value: &str) -> &mut Style {
        self.set(st::HEIGHT, value)
    }

    pub fn set_height_px(&mut self, height: i32) -> &mut Style {
        self.set_height(&format!("{height}px"))
    }

    pub fn set_full_height(&mut self) -> &mut Style {
        self.set_height("100%")
    }

    pub fn white_space(&self) -> &str {
        self.get(st::WHITE_SPACE)
    }

    pub fn set_white_space(&mut self, value: &str) -> &mut Style {
        self.set(st::WHITE_SPACE, value)
    }

    /// Renders all style information: class names and style attributes.
    pub fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        self.render_classes(w)?;

        if !self.attrs.is_empty() {
            w.writes(" style=\"")?;
            self.render_attrs(w)?;
            w.writes("\"")?;
        }
        Ok(())
    }

    /// Renders the `class="…"` attribute, if any class is set.
    pub fn render_classes(&self, w: &mut Writer<'_>) -> io::Result<()> {
        if !self.classes.is_empty() {
            w.writes(" class=\"")?;
            for (i, class) in self.classes.iter().enumerate() {
                if i > 0 {
                    w.writes(" ")?;
                }
                w.writes(class)?;
            }
            w.writes("\"")?;
        }
        Ok(())
    }

    /// Renders the bare `name:value;…` attribute list.
    pub fn render_attrs(&self, w: &mut Writer<'_>) -> io::Result<()> {
        for (name, value) in &self.attrs {
            w.writes(name)?;
            w.writes(":")?;
            w.writes(value)?;
            w.writes(";")?;
        }
        Ok(())
    }

    /// Tells if neither classes nor style attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.attrs.is_empty()
    }
}
