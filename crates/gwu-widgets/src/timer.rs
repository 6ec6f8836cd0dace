//! Timer: an invisible component generating timed events from the client.

use std::any::Any;
use std::io;
use std::time::Duration;

use gwu_core::{EventType, Writer};

use crate::comp::{Comp, CompCore, Ref};

/// A component which generates a timed event, or a series of them when on
/// repeat. Timers have no visual part.
///
/// The generated events are of type [`EventType::StateChange`].
///
/// Timers run at the client side: a closed (or navigated-away) window
/// generates no events. Conversely, every timer event registers a session
/// access, so a repeating timer keeps its session alive indefinitely.
pub struct Timer {
    core: CompCore,
    timeout: Duration,
    repeat: bool,
    active: bool,
    reset: i32,
}

impl Timer {
    /// Creates a new Timer with the given timeout. Active, not repeating.
    #[must_use]
    pub fn new(timeout: Duration) -> Ref<Timer> {
        Ref::new(Timer {
            core: CompCore::new(""),
            timeout,
            repeat: false,
            active: true,
            reset: 0,
        })
    }

    pub(crate) fn bare_with(core: CompCore, timeout: Duration, repeat: bool) -> Timer {
        Timer {
            core,
            timeout,
            repeat,
            active: true,
            reset: 0,
        }
    }

    /// The timeout duration of the timer.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the timeout duration. Scheduling has millisecond precision;
    /// durations below 1 ms are rounded up to 1 ms.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout.max(Duration::from_millis(1));
    }

    /// Tells if the timer is on repeat.
    #[must_use]
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Sets whether events are generated periodically after each timeout.
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Tells if the timer is active. Inactive timers generate no events.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Makes the timer restart its countdown on the next re-render. A
    /// re-render alone does not reset the countdown unless the timer
    /// configuration changed.
    pub fn reset(&mut self) {
        self.reset += 1;
    }

    /// Renders the `setupTimer(compId,"js",timeout,repeat,active,reset);`
    /// call with the given code to schedule.
    pub(crate) fn render_setup_timer_js(&self, w: &mut Writer<'_>, js: &str) -> io::Result<()> {
        w.writes("setupTimer(")?;
        w.writev(self.core.id())?;
        w.writes(",\"")?;
        w.writes(js)?;
        w.writes("\",")?;
        w.writev(self.timeout.as_millis() as u64)?;
        w.writes(",")?;
        w.writev(self.repeat)?;
        w.writes(",")?;
        w.writev(self.active)?;
        w.writes(",")?;
        w.writev(self.reset)?;
        w.writes(");").map(|_| ())
    }
}

impl Comp for Timer {
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

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<span")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        w.writes(">")?;

        w.writes("<script>")?;
        let js = format!(
            "se(null,{},{});",
            EventType::StateChange.code(),
            self.core.id()
        );
        self.render_setup_timer_js(w, &js)?;
        w.writes("</script>")?;

        w.writes("</span>").map(|_| ())
    }
}
