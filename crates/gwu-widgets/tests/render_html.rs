//! Rendered HTML shapes: wrapper tags, escaped text, handler attributes
//! and the full window document.

use std::io;

use gwu_core::{EventType, Writer};
use gwu_widgets::{
    Button, Comp, CompRef, Expander, Label, ListBox, Panel, RenderEnv, StateButton, TextBox,
    Timer, Window,
};

fn rendered(c: &CompRef) -> String {
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    c.read().render(&mut w).unwrap();
    String::from_utf8(buf).unwrap()
}

fn noop(_: &mut gwu_widgets::Event) {}

#[test]
fn button_shape() {
    let button = Button::new("Hi <there>");
    button.write().core_mut().add_handler_func(noop, &[EventType::Click]);

    let html = rendered(&button.as_comp());
    let id = button.id();

    assert!(html.starts_with("<button type=\"button\""));
    assert!(html.contains(&format!(" id=\"{id}\"")));
    assert!(html.contains(" class=\"gwu-Button\""));
    assert!(html.contains(&format!(" onclick=\"se(event,0,{id})\"")));
    assert!(html.contains("Hi &lt;there&gt;"));
    assert!(html.ends_with("</button>"));

    button.write().set_enabled(false);
    assert!(rendered(&button.as_comp()).contains(" disabled=\"disabled\""));
}

#[test]
fn sync_on_handler_attr_carries_the_value_provider() {
    let check = StateButton::new_checkbox("c");
    let html = rendered(&check.as_comp());
    let id = check.id();

    // The click handler ships the client-side value along.
    assert!(html.contains(&format!("onclick=\"se(event,0,{id},this.checked)\"")));
}

#[test]
fn listbox_options() {
    let list = ListBox::new(&["a & b", "c"]);
    list.write().set_selected(0, true);
    list.write().set_multi(true);
    list.write().set_rows(4);

    let html = rendered(&list.as_comp());
    assert!(html.starts_with("<select multiple=\"multiple\" size=\"4\""));
    assert!(html.contains("<option selected=\"selected\">a &amp; b</option>"));
    assert!(html.contains("<option>c</option>"));
    assert!(html.contains(&format!("onchange=\"se(event,11,{},selIdxs(this))\"", list.id())));
}

#[test]
fn textbox_input_vs_textarea() {
    let single = TextBox::new("v");
    let html = rendered(&single.as_comp());
    assert!(html.starts_with("<input type=\"text\" size=\"20\""));
    assert!(html.ends_with(" value=\"v\"/>"));

    let multi = TextBox::new("line");
    multi.write().set_rows(3);
    multi.write().set_cols(40);
    let html = rendered(&multi.as_comp());
    assert!(html.starts_with("<textarea"));
    assert!(html.contains(" rows=\"3\" cols=\"40\""));
    assert!(html.ends_with("</textarea>"));

    let pass = TextBox::new_password("s");
    assert!(rendered(&pass.as_comp()).starts_with("<input type=\"password\""));
}

#[test]
fn panel_layouts() {
    let panel = Panel::new();
    panel.write().add(Label::new("x").as_comp());
    panel.write().add(Label::new("y").as_comp());

    // Vertical: one row per child.
    let html = rendered(&panel.as_comp());
    assert!(html.starts_with("<table"));
    assert_eq!(html.matches("<tr>").count(), 2);

    panel.write().set_layout(gwu_widgets::Layout::Horizontal);
    let html = rendered(&panel.as_comp());
    assert_eq!(html.matches("<tr>").count(), 1);

    panel.write().set_layout(gwu_widgets::Layout::Natural);
    let html = rendered(&panel.as_comp());
    assert!(html.starts_with("<span"));
    assert!(html.ends_with("</span>"));
}

#[test]
fn expander_hides_collapsed_content() {
    let ex = Expander::new();
    ex.write().set_header(Label::new("head").as_comp());
    ex.write().set_content(Label::new("secret").as_comp());

    let html = rendered(&ex.as_comp());
    assert!(html.contains("head"));
    assert!(!html.contains("secret"));

    ex.write().set_expanded(true);
    let html = rendered(&ex.as_comp());
    assert!(html.contains("secret"));
}

#[test]
fn timer_script() {
    let timer = Timer::new(std::time::Duration::from_millis(2500));
    timer.write().set_repeat(true);
    let id = timer.id();

    let html = rendered(&timer.as_comp());
    assert!(html.contains(&format!(
        "setupTimer({id},\"se(null,15,{id});\",2500,true,true,0);"
    )));

    timer.write().reset();
    timer.write().set_active(false);
    let html = rendered(&timer.as_comp());
    assert!(html.contains(",2500,true,false,1);"));
}

#[test]
fn tooltip_is_escaped_in_storage() {
    let label = Label::new("x");
    label.write().core_mut().set_tooltip("a<b> & 'c'");
    assert_eq!(label.read().core().tooltip(), "a<b> & 'c'");
    assert_eq!(
        label.read().core().attr("title"),
        "a&lt;b&gt; &amp; &#39;c&#39;"
    );

    let html = rendered(&label.as_comp());
    assert!(html.contains(" title=\"a&lt;b&gt; &amp; &#39;c&#39;\""));
}

#[test]
fn window_document() -> io::Result<()> {
    let win = Window::new("main", "My <App>");
    win.write().add(Button::new("b").as_comp());
    win.write().add_head_html("<style>.x{}</style>");
    win.write()
        .core_mut()
        .add_handler_func(noop, &[EventType::WinLoad, EventType::WinUnload]);

    let env = RenderEnv {
        app_path: "/app/",
        theme: "default",
    };
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    win.read().render_win(&mut w, &env)?;
    let html = String::from_utf8(buf).unwrap();

    assert!(html.starts_with("<html><head>"));
    assert!(html.contains("<title>My &lt;App&gt;</title>"));
    assert!(html.contains("href=\"/app/_gwu_static/gowut-"));
    assert!(html.contains("-default-"));
    assert!(html.contains("var _pathApp='/app/';"));
    assert!(html.contains("var _pathWin='/app/main/';"));
    assert!(html.contains("var _pathEvent=_pathWin+'e';"));
    assert!(html.contains("var _pathRenderComp=_pathWin+'rc';"));
    assert!(html.contains("<style>.x{}</style>"));
    assert!(html.ends_with("</body></html>"));

    // Window event handlers bind through addonload/addonbeforeunload,
    // outside the window's own element.
    let win_id = win.id();
    assert!(html.contains(&format!("addonload(function(){{se(null,13,{win_id});}});")));
    assert!(html.contains(&format!(
        "addonbeforeunload(function(){{se(null,14,{win_id});}});"
    )));
    let body_tag_pos = html.find("<body>").unwrap();
    let script_pos = html.find("addonload").unwrap();
    let win_tag_pos = html.find(&format!(" id=\"{win_id}\"")).unwrap();
    assert!(body_tag_pos < script_pos && script_pos < win_tag_pos);

    // A window with a theme of its own overrides the server theme.
    win.write().set_theme("debug");
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    win.read().render_win(&mut w, &env)?;
    assert!(String::from_utf8(buf).unwrap().contains("-debug-"));
    Ok(())
}
