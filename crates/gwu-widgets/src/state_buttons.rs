//! State buttons: check boxes, radio buttons and the ON/OFF switch button.

use std::any::Any;
use std::io;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use gwu_core::{EventType, Id, Writer};

use crate::addons::render_enabled;
use crate::button::Button;
use crate::comp::{Comp, CompCore, CompRef, Ref, WeakCompRef};
use crate::event::Event;

/// A group of radio buttons: in each group at most one button is selected,
/// and selecting one deselects the previously selected button.
///
/// Cheap to clone; clones refer to the same group.
#[derive(Clone)]
pub struct RadioGroup {
    inner: Arc<Mutex<RadioGroupState>>,
}

struct RadioGroupState {
    name: String,
    selected: Option<WeakCompRef>,
    prev_selected: Option<WeakCompRef>,
}

impl RadioGroup {
    /// Creates a new radio group. The name becomes the `name` attribute of
    /// the member input tags.
    #[must_use]
    pub fn new(name: &str) -> RadioGroup {
        RadioGroup {
            inner: Arc::new(Mutex::new(RadioGroupState {
                name: name.to_string(),
                selected: None,
                prev_selected: None,
            })),
        }
    }

    /// The name of the group.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    /// The selected radio button of the group, if any.
    #[must_use]
    pub fn selected(&self) -> Option<CompRef> {
        self.inner.lock().selected.as_ref().and_then(Weak::upgrade)
    }

    /// The radio button that was selected before the currently selected
    /// one, if any.
    #[must_use]
    pub fn prev_selected(&self) -> Option<CompRef> {
        self.inner
            .lock()
            .prev_selected
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn selected_weak(&self) -> Option<WeakCompRef> {
        self.inner.lock().selected.clone()
    }

    fn set_selected(&self, selected: Option<WeakCompRef>) {
        let mut g = self.inner.lock();
        g.prev_selected = g.selected.take();
        g.selected = selected;
    }
}

/// A button with a boolean state: a check box, or a radio button when it
/// belongs to a [`RadioGroup`].
///
/// Rendered as an `input` plus a `label` inside a wrapper span; the input
/// tag gets its own separately allocated id.
///
/// Suggested event type to handle changes: [`EventType::Click`], since
/// change events are unreliable for these inputs across browsers.
///
/// Default style classes: `gwu-CheckBox` / `gwu-CheckBox-Disabled`,
/// `gwu-RadioButton` / `gwu-RadioButton-Disabled`.
pub struct StateButton {
    button: Button,
    state: bool,
    input_type: &'static str,
    group: Option<RadioGroup>,
    input_id: Id,
    disabled_class: &'static str,
}

impl StateButton {
    /// Creates a new check box. The initial state is false.
    #[must_use]
    pub fn new_checkbox(text: &str) -> Ref<StateButton> {
        let c = StateButton::bare(text, "checkbox", None, "gwu-CheckBox-Disabled");
        c.write().core_mut().style_mut().add_class("gwu-CheckBox");
        c
    }

    /// Creates a new radio button in the given group. The initial state is
    /// false.
    #[must_use]
    pub fn new_radio(text: &str, group: RadioGroup) -> Ref<StateButton> {
        let c = StateButton::bare(text, "radio", Some(group), "gwu-RadioButton-Disabled");
        c.write().core_mut().style_mut().add_class("gwu-RadioButton");
        c
    }

    fn bare(
        text: &str,
        input_type: &'static str,
        group: Option<RadioGroup>,
        disabled_class: &'static str,
    ) -> Ref<StateButton> {
        let mut button = Button::bare("this.checked", text);
        button.core_mut().add_sync_on_etypes(&[EventType::Click]);
        Ref::new(StateButton {
            button,
            state: false,
            input_type,
            group,
            input_id: gwu_core::next_id(),
            disabled_class,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.button.text()
    }

    pub fn set_text(&mut self, text: &str) {
        self.button.set_text(text);
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.button.enabled()
    }

    /// Enables or disables the button, managing the disabled style class.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.button.core_mut().style_mut().remove_class(self.disabled_class);
        } else {
            self.button.core_mut().style_mut().add_class(self.disabled_class);
        }
        self.button.set_enabled(enabled);
    }

    /// The state of the button.
    #[must_use]
    pub fn state(&self) -> bool {
        self.state
    }

    /// The group of a radio button.
    #[must_use]
    pub fn group(&self) -> Option<&RadioGroup> {
        self.group.as_ref()
    }

    /// Sets the state of the button. For a radio button the group is
    /// managed: selecting deselects the previously selected member.
    pub fn set_state(&mut self, state: bool) {
        if self.state == state {
            return;
        }

        if let Some(group) = self.group.clone() {
            let self_weak = self.button.core().self_weak();
            match group.selected_weak() {
                None => {
                    if state {
                        group.set_selected(self_weak);
                    }
                }
                Some(sel) => {
                    if state {
                        let is_self =
                            self_weak.as_ref().is_some_and(|sw| Weak::ptr_eq(&sel, sw));
                        if !is_self {
                            if let Some(other) = sel.upgrade() {
                                let mut g = other.write();
                                if let Some(sb) = g.as_any_mut().downcast_mut::<StateButton>() {
                                    sb.state = false;
                                }
                            }
                            group.set_selected(self_weak);
                        }
                    } else {
                        // Our state was true, so we are the selected one.
                        group.set_selected(None);
                    }
                }
            }
        }

        self.state = state;
    }
}

impl Comp for StateButton {
    fn core(&self) -> &CompCore {
        self.button.core()
    }

    fn core_mut(&mut self) -> &mut CompCore {
        self.button.core_mut()
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
        if let Ok(state) = value.parse::<bool>() {
            // Through set_state so radio groups stay consistent.
            self.set_state(state);
        }
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        // An input and a label together make the state button; wrap them.
        w.writes("<span")?;
        self.core().render_attrs_and_style(w)?;
        w.writes(">")?;

        w.writes("<input type=\"")?;
        w.writes(self.input_type)?;
        w.writes("\" id=\"")?;
        w.writev(self.input_id)?;
        w.writes("\"")?;
        if let Some(group) = &self.group {
            w.writes(" name=\"")?;
            w.writes(&group.name())?;
            w.writes("\"")?;
        }
        if self.state {
            w.writes(" checked=\"checked\"")?;
        }
        render_enabled(self.button.enabled(), w)?;
        self.core().render_ehandlers(w)?;

        w.writes("><label for=\"")?;
        w.writev(self.input_id)?;
        w.writes("\">")?;
        w.writees(self.text())?;
        w.writes("</label>")?;

        w.writes("</span>").map(|_| ())
    }
}

/// A button switched ON or OFF by clicking its two halves.
///
/// The client decides the new state from the click coordinates (only a
/// click on the inactive half switches) and updates the halves' styles
/// itself, so no re-render is needed on state sync.
///
/// Suggested event type to handle changes: [`EventType::Click`].
///
/// Default style classes: `gwu-SwitchButton`,
/// `gwu-SwitchButton-On-Active`, `gwu-SwitchButton-On-Inactive`,
/// `gwu-SwitchButton-Off-Active`, `gwu-SwitchButton-Off-Inactive`.
pub struct SwitchButton {
    core: CompCore,
    on_button: Button,
    off_button: Button,
    state: bool,
}

impl SwitchButton {
    /// Creates a new SwitchButton with "ON"/"OFF" texts, switched off.
    #[must_use]
    pub fn new() -> Ref<SwitchButton> {
        let on_button = Button::bare("", "ON");
        let off_button = Button::bare("", "OFF");

        // Only a click over the inactive half switches the state; the
        // client resolves which half was hit.
        let value_js = format!(
            "sbtnVal(event,'{}','{}')",
            on_button.core().id(),
            off_button.core().id()
        );

        let mut core = CompCore::new(&value_js);
        core.add_sync_on_etypes(&[EventType::Click]);
        core.set_attr("cellspacing", "0");
        core.set_attr("cellpadding", "0");

        let c = Ref::new(SwitchButton {
            core,
            on_button,
            off_button,
            // Start from true so the set_state(false) below takes effect
            // and initializes the half styles.
            state: true,
        });
        {
            let mut g = c.write();
            g.core.style_mut().add_class("gwu-SwitchButton");
            g.set_state(false);
        }
        c
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.on_button.enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.on_button.set_enabled(enabled);
        self.off_button.set_enabled(enabled);
    }

    /// The state of the switch.
    #[must_use]
    pub fn state(&self) -> bool {
        self.state
    }

    /// Sets the state of the switch, updating the half styles.
    pub fn set_state(&mut self, state: bool) {
        if self.state == state {
            return;
        }

        self.state = state;

        if state {
            self.on_button
                .core_mut()
                .style_mut()
                .set_class("gwu-SwitchButton-On-Active");
            self.off_button
                .core_mut()
                .style_mut()
                .set_class("gwu-SwitchButton-Off-Inactive");
        } else {
            self.on_button
                .core_mut()
                .style_mut()
                .set_class("gwu-SwitchButton-On-Inactive");
            self.off_button
                .core_mut()
                .style_mut()
                .set_class("gwu-SwitchButton-Off-Active");
        }
    }

    /// The text of the ON half.
    #[must_use]
    pub fn on_text(&self) -> &str {
        self.on_button.text()
    }

    /// The text of the OFF half.
    #[must_use]
    pub fn off_text(&self) -> &str {
        self.off_button.text()
    }

    /// Sets the texts of the two halves.
    pub fn set_on_off(&mut self, on: &str, off: &str) {
        self.on_button.set_text(on);
        self.off_button.set_text(off);
    }
}

impl Comp for SwitchButton {
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
        if let Ok(state) = value.parse::<bool>() {
            // The client already restyled the halves, so no dirty mark is
            // needed on a plain state sync.
            self.set_state(state);
        }
    }

    fn render(&self, w: &mut Writer<'_>) -> io::Result<()> {
        w.writes("<table")?;
        self.core.render_attrs_and_style(w)?;
        self.core.render_ehandlers(w)?;
        // The sync handler sits on this wrapper tag, so the wrapper itself
        // must carry the disabled attribute for clicks to be disabled.
        self.on_button.render_enabled_attr(w)?;
        w.writes("><tr>")?;

        w.writes("<td width=\"50%\">")?;
        self.on_button.render(w)?;

        w.writes("<td width=\"50%\">")?;
        self.off_button.render(w)?;

        w.writes("</table>").map(|_| ())
    }
}
