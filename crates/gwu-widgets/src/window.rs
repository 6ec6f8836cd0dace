//! Window: the top of the component hierarchy, the equivalent of the
//! browser page.

use std::any::Any;
use std::io;

use gwu_core::{wire, EventCategory, Id, Writer};

use crate::comp::{Comp, CompCore, CompRef, Container, Ref};
use crate::panel::Panel;

/// What window rendering needs to know about the hosting server.
#[derive(Debug, Clone, Copy)]
pub struct RenderEnv<'a> {
    /// The application path, always with a trailing slash.
    pub app_path: &'a str,
    /// The server's default CSS theme.
    pub theme: &'a str,
}

/// A top-level container named by a URL path segment. Rendering a window
/// produces a complete HTML document; multiple windows can exist, but the
/// browser shows one at a time.
///
/// A window is a panel: child components are added to it the same way.
///
/// Default style class: `gwu-Window`.
pub struct Window {
    panel: Panel,
    text: String,
    name: String,
    heads: Vec<String>,
    focused_comp_id: Id,
    theme: String,
}

impl Window {
    /// Creates a new window with the given URL name and title.
    #[must_use]
    pub fn new(name: &str, title: &str) -> Ref<Window> {
        let c = Ref::new(Window {
            panel: Panel::bare(),
            text: title.to_string(),
            name: name.to_string(),
            heads: Vec::new(),
            focused_comp_id: Id::NONE,
            theme: String::new(),
        });
        c.write().panel.core_mut().style_mut().add_class("gwu-Window");
        c
    }

    /// The name of the window; it appears in the URL.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The title of the window (the browser window title).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Adds an HTML fragment to be included in the `<head>` section.
    pub fn add_head_html(&mut self, html: &str) {
        self.heads.push(html.to_string());
    }

    /// Removes a previously added head HTML fragment.
    pub fn remove_head_html(&mut self, html: &str) {
        if let Some(pos) = self.heads.iter().position(|h| h == html) {
            self.heads.remove(pos);
        }
    }

    /// The id of the last reported focused component.
    #[must_use]
    pub fn focused_comp_id(&self) -> Id {
        self.focused_comp_id
    }

    /// Records the id of the focused component, so focus is restored on
    /// the next full render.
    pub fn set_focused_comp_id(&mut self, id: Id) {
        self.focused_comp_id = id;
    }

    /// The CSS theme of the window; empty means the server's theme.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Sets the CSS theme of the window. Pass an empty string to fall back
    /// to the server's theme.
    pub fn set_theme(&mut self, theme: &str) {
        self.theme = theme.to_string();
    }

    /// The panel the window's children live in.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// The panel the window's children live in, mutably. All panel
    /// operations (add, insert, layout, cell formatters, spacers) are
    /// reached through this.
    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Adds a component to the window.
    pub fn add(&mut self, c: CompRef) {
        self.panel.add(c);
    }

    /// Renders the window as a complete HTML document.
    pub fn render_win(&self, w: &mut Writer<'_>, env: &RenderEnv<'_>) -> io::Result<()> {
        w.writes(
            "<html><head><meta http-equiv=\"content-type\" \
             content=\"text/html; charset=UTF-8\"><title>",
        )?;
        w.writees(&self.text)?;
        w.writess(&["</title><link href=\"", env.app_path, wire::PATH_STATIC])?;
        let theme = if self.theme.is_empty() {
            env.theme
        } else {
            &self.theme
        };
        w.writes(&wire::res_name_static_css(theme))?;
        w.writes("\" rel=\"stylesheet\" type=\"text/css\">")?;

        self.render_dyn_js(w, env)?;
        w.writess(&[
            "<script src=\"",
            env.app_path,
            wire::PATH_STATIC,
            &wire::res_name_static_js(),
            "\"></script>",
        ])?;
        for head in &self.heads {
            w.writes(head)?;
        }
        w.writes("</head><body>")?;

        self.render(w)?;

        w.writes("</body></html>").map(|_| ())
    }

    /// Renders the script block defining the client-side path constants.
    fn render_dyn_js(&self, w: &mut Writer<'_>, env: &RenderEnv<'_>) -> io::Result<()> {
        w.writes("<script>")?;
        w.writess(&["var _pathApp='", env.app_path, "';"])?;
        w.writess(&["var _pathSessCheck=_pathApp+'", wire::PATH_SESS_CHECK, "';"])?;
        w.writess(&["var _pathWin='", env.app_path, &self.name, "/';"])?;
        w.writess(&["var _pathEvent=_pathWin+'", wire::PATH_EVENT, "';"])?;
        w.writess(&["var _pathRenderComp=_pathWin+'", wire::PATH_RENDER_COMP, "';"])?;
        w.writess(&["var _focCompId='", &self.focused_comp_id.to_string(), "';"])?;
        w.writes("</script>").map(|_| ())
    }
}

impl Comp for Window {
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
        // Window event handlers are attached outside the HTML tag denoted
        // by the window's id: re-rendering the window body must neither
        // re-bind them nor lose them.
        let mut found = false;
        for etype in self.core().registered_etypes() {
            if etype.category() != EventCategory::Window {
                continue;
            }
            let Some(func) = etype.func_name() else {
                continue;
            };

            if !found {
                found = true;
                w.writes("<script>")?;
            }
            // Example: addonload(function(){se(null,13,4327);});
            w.writess(&["add", func, "(function(){se(null,"])?;
            w.writev(etype.code())?;
            w.writes(",")?;
            w.writev(self.core().id())?;
            w.writes(");});")?;
        }
        if found {
            w.writes("</script>")?;
        }

        self.panel.render_body(w)
    }
}

impl Container for Window {
    fn remove(&mut self, c: &CompRef) -> bool {
        self.panel.remove_child(c)
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
