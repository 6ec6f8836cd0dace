//! SessMonitor: displays the session timeout and connectivity at the
//! client side, without interacting with the session.

use std::any::Any;
use std::io;
use std::time::Duration;

use gwu_core::Writer;

use crate::comp::{Comp, CompCore, Ref};
use crate::timer::Timer;

/// A timer-driven component which periodically polls the session-check
/// path and displays the seconds remaining until session timeout. Polling
/// does not register an access, so watching the countdown does not extend
/// the session.
///
/// Unlike a plain [`Timer`], a session monitor generates no events.
///
/// Default style classes: `gwu-SessMonitor`, `gwu-SessMonitor-Expired`,
/// `gwu-SessMonitor-Error`.
pub struct SessMonitor {
    timer: Timer,
}

impl SessMonitor {
    /// Creates a new SessMonitor: active, repeating with a 1 minute period.
    #[must_use]
    pub fn new() -> Ref<SessMonitor> {
        let timer = Timer::bare_with(CompCore::new(""), Duration::from_secs(60), true);
        let c = Ref::new(SessMonitor { timer });
        {
            let mut g = c.write();
            g.core_mut().style_mut().add_class("gwu-SessMonitor");
            g.set_js_converter("convertSessTimeout");
        }
        c
    }

    /// The underlying timer, for period and activity control.
    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    /// The name of the client-side function converting a float second
    /// value to a displayable string.
    #[must_use]
    pub fn js_converter(&self) -> String {
        self.timer.core().attr("gwuJsFuncName").to_string()
    }

    /// Sets the name of the client-side converter function. The default,
    /// `convertSessTimeout`, renders "Expired!", "<1 min" or "~N min".
    pub fn set_js_converter(&mut self, js_func_name: &str) {
        self.timer.core_mut().set_attr("gwuJsFuncName", js_func_name);
    }
}

impl Comp for SessMonitor {
    fn core(&self) -> &CompCore {
        self.timer.core()
    }

    fn core_mut(&mut self) -> &mut CompCore {
        self.timer.core_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<span")?;
        self.core().render_attrs_and_style(w)?;
        self.core().render_ehandlers(w)?;
        w.writes(">")?;

        // Placeholder the session timeout value is written into.
        w.writes("<span></span>")?;

        w.writes("<script>")?;
        let js = format!("checkSession({})", self.core().id());
        self.timer.render_setup_timer_js(w, &js)?;
        // Check right away too, not only after the first period.
        w.writes(&js)?;
        w.writes(";</script>")?;

        w.writes("</span>").map(|_| ())
    }
}
