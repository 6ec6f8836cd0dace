//! Bundled static content: the client runtime script and the CSS themes.
//!
//! Resource names are versioned (`gowut-<version>.js`,
//! `gowut-<theme>-<version>.css`) and served with a 72-hour `Expires`, so
//! upgraded servers never fight stale browser caches.

use std::collections::HashMap;
use std::sync::OnceLock;

use gwu_core::{wire, ModKeys};

/// The client runtime script (see the client runtime contract: `se`,
/// action parsing, `rerenderComp`, `selIdxs`, `sbtnVal`, `setupTimer`,
/// session monitoring).
pub fn static_js() -> &'static str {
    static JS: OnceLock<String> = OnceLock::new();
    JS.get_or_init(build_static_js)
}

/// The CSS of a theme resource name, if it is one of the bundled themes.
pub fn static_css(res_name: &str) -> Option<&'static str> {
    static CSS: OnceLock<HashMap<String, String>> = OnceLock::new();
    let themes = CSS.get_or_init(|| {
        let default_css = DEFAULT_THEME_CSS.to_string();
        let debug_css = format!("{DEFAULT_THEME_CSS}{DEBUG_THEME_EXTRA_CSS}");
        HashMap::from([
            (wire::res_name_static_css(wire::THEME_DEFAULT), default_css),
            (wire::res_name_static_css(wire::THEME_DEBUG), debug_css),
        ])
    });
    themes.get(res_name).map(String::as_str)
}

fn build_static_js() -> String {
    format!(
        r#"var _pEventType='{et}',_pCompId='{cid}',_pCompValue='{cval}',_pFocCompId='{fcid}',_pMouseWX='{mwx}',_pMouseWY='{mwy}',_pMouseX='{mx}',_pMouseY='{my}',_pMouseBtn='{mb}',_pModKeys='{mk}',_pKeyCode='{kc}';
var _modKeyAlt={alt},_modKeyCtrl={ctrl},_modKeyMeta={meta},_modKeyShift={shift};
var _eraNoAction={era_no},_eraReloadWin={era_reload},_eraDirtyComps={era_dirty},_eraFocusComp={era_focus};

function createXmlHttp() {{
	return new XMLHttpRequest();
}}

// Send event
function se(event, etype, compId, compValue) {{
	var xhr = createXmlHttp();

	xhr.onreadystatechange = function() {{
		if (xhr.readyState == 4 && xhr.status == 200)
			procEresp(xhr);
	}}

	xhr.open("POST", _pathEvent, true); // async call
	xhr.setRequestHeader("Content-type", "application/x-www-form-urlencoded");

	var data = "";

	if (etype != null)
		data += "&" + _pEventType + "=" + etype;
	if (compId != null)
		data += "&" + _pCompId + "=" + compId;
	if (compValue != null)
		data += "&" + _pCompValue + "=" + compValue;
	if (document.activeElement.id != null)
		data += "&" + _pFocCompId + "=" + document.activeElement.id;

	if (event != null) {{
		if (event.clientX != null) {{
			// Mouse data
			var x = event.clientX, y = event.clientY;
			data += "&" + _pMouseWX + "=" + x;
			data += "&" + _pMouseWY + "=" + y;
			var parent = document.getElementById(compId);
			do {{
				x -= parent.offsetLeft;
				y -= parent.offsetTop;
			}} while (parent = parent.offsetParent);
			data += "&" + _pMouseX + "=" + x;
			data += "&" + _pMouseY + "=" + y;
			data += "&" + _pMouseBtn + "=" + (event.button < 4 ? event.button : 1);
		}}

		var modKeys = 0;
		modKeys += event.altKey ? _modKeyAlt : 0;
		modKeys += event.ctrlKey ? _modKeyCtrl : 0;
		modKeys += event.metaKey ? _modKeyMeta : 0;
		modKeys += event.shiftKey ? _modKeyShift : 0;
		data += "&" + _pModKeys + "=" + modKeys;
		data += "&" + _pKeyCode + "=" + (event.which ? event.which : event.keyCode);
	}}

	xhr.send(data);
}}

function procEresp(xhr) {{
	var actions = xhr.responseText.split(";");

	if (actions.length == 0) {{
		window.alert("No response received!");
		return;
	}}
	for (var i = 0; i < actions.length; i++) {{
		var n = actions[i].split(",");

		switch (parseInt(n[0])) {{
		case _eraDirtyComps:
			for (var j = 1; j < n.length; j++)
				rerenderComp(n[j]);
			break;
		case _eraFocusComp:
			if (n.length > 1)
				focusComp(parseInt(n[1]))
			break;
		case _eraNoAction:
			break;
		case _eraReloadWin:
			if (n.length > 1 && n[1].length > 0)
				window.location.href = _pathApp + n[1];
			else
				window.location.reload(true); // force reload
			break;
		default:
			window.alert("Unknown response code:" + n[0]);
			break;
		}}
	}}
}}

function rerenderComp(compId) {{
	var e = document.getElementById(compId);
	if (!e) // Component removed or not visible (e.g. on inactive tab)
		return;

	var xhr = createXmlHttp();

	xhr.onreadystatechange = function() {{
		if (xhr.readyState == 4 && xhr.status == 200) {{
			// Remember the focused comp, it might be replaced here:
			var focusedCompId = document.activeElement.id;
			e.outerHTML = xhr.responseText;
			focusComp(focusedCompId);

			// Scripts in the inserted HTML are not executed by the DOM
			// mutation; run them here. Have to re-get the element by id!
			var replaced = document.getElementById(compId);
			if (!replaced)
				return;
			var scripts = replaced.getElementsByTagName("script");
			for (var i = 0; i < scripts.length; i++) {{
				eval(scripts[i].innerText);
			}}
		}}
	}}

	// Sync call: browser-specific DOM rendering errors arise if async.
	xhr.open("POST", _pathRenderComp, false);
	xhr.setRequestHeader("Content-type", "application/x-www-form-urlencoded");

	xhr.send(_pCompId + "=" + compId);
}}

// Selected indices of an HTML select, comma-terminated
function selIdxs(select) {{
	var selected = "";

	for (var i = 0; i < select.options.length; i++)
		if (select.options[i].selected)
			selected += i + ",";

	return selected;
}}

// Resolve and restyle a switch button; true if the ON half was hit
function sbtnVal(event, onBtnId, offBtnId) {{
	var onBtn = document.getElementById(onBtnId);
	var offBtn = document.getElementById(offBtnId);

	if (onBtn == null)
		return false;

	var value = onBtn == document.elementFromPoint(event.clientX, event.clientY);
	if (value) {{
		onBtn.className = "gwu-SwitchButton-On-Active";
		offBtn.className = "gwu-SwitchButton-Off-Inactive";
	}} else {{
		onBtn.className = "gwu-SwitchButton-On-Inactive";
		offBtn.className = "gwu-SwitchButton-Off-Active";
	}}

	return value;
}}

function focusComp(compId) {{
	if (compId != null) {{
		var e = document.getElementById(compId);
		if (e) // Else component removed or not visible
			e.focus();
	}}
}}

function addonload(func) {{
	var oldonload = window.onload;
	if (typeof window.onload != 'function') {{
		window.onload = func;
	}} else {{
		window.onload = function() {{
			if (oldonload)
				oldonload();
			func();
		}}
	}}
}}

function addonbeforeunload(func) {{
	var oldonbeforeunload = window.onbeforeunload;
	if (typeof window.onbeforeunload != 'function') {{
		window.onbeforeunload = func;
	}} else {{
		window.onbeforeunload = function() {{
			if (oldonbeforeunload)
				oldonbeforeunload();
			func();
		}}
	}}
}}

var timers = new Object();

function setupTimer(compId, js, timeout, repeat, active, reset) {{
	var timer = timers[compId];

	if (timer != null) {{
		var changed = timer.js != js || timer.timeout != timeout || timer.repeat != repeat || timer.reset != reset;
		if (!active || changed) {{
			if (timer.repeat)
				clearInterval(timer.id);
			else
				clearTimeout(timer.id);
			timers[compId] = null;
		}}
		if (!changed)
			return;
	}}
	if (!active)
		return;

	// New timer. Compile the snippet once and schedule the function
	// reference; never hand a string to setInterval.
	timers[compId] = timer = new Object();
	timer.js = js;
	timer.timeout = timeout;
	timer.repeat = repeat;
	timer.reset = reset;

	var callback = new Function(js);
	if (timer.repeat)
		timer.id = setInterval(callback, timeout);
	else
		timer.id = setTimeout(callback, timeout);
}}

function checkSession(compId) {{
	var e = document.getElementById(compId);
	if (!e) // Component removed or not visible
		return;

	var xhr = createXmlHttp();

	xhr.onreadystatechange = function() {{
		if (xhr.readyState == 4 && xhr.status == 200) {{
			var timeoutSec = parseFloat(xhr.responseText);
			if (timeoutSec < 60)
				e.classList.add("gwu-SessMonitor-Expired");
			else
				e.classList.remove("gwu-SessMonitor-Expired");
			var cnvtr = window[e.getAttribute("gwuJsFuncName")];
			e.children[0].innerText = typeof cnvtr === 'function' ? cnvtr(timeoutSec) : convertSessTimeout(timeoutSec);
		}}
	}}

	xhr.open("GET", _pathSessCheck, false); // sync call so connection errors are catchable
	try {{
		xhr.send();
		e.classList.remove("gwu-SessMonitor-Error");
	}} catch (err) {{
		e.classList.add("gwu-SessMonitor-Error");
		e.children[0].innerText = "CONN ERR";
	}}
}}

function convertSessTimeout(sec) {{
	if (sec <= 0)
		return "Expired!";
	else if (sec < 60)
		return "<1 min";
	else
		return "~" + Math.round(sec / 60) + " min";
}}

// INITIALIZATION

addonload(function() {{
	focusComp(_focCompId);
}});
"#,
        et = wire::PARAM_EVENT_TYPE,
        cid = wire::PARAM_COMP_ID,
        cval = wire::PARAM_COMP_VALUE,
        fcid = wire::PARAM_FOCUSED_COMP_ID,
        mwx = wire::PARAM_MOUSE_WX,
        mwy = wire::PARAM_MOUSE_WY,
        mx = wire::PARAM_MOUSE_X,
        my = wire::PARAM_MOUSE_Y,
        mb = wire::PARAM_MOUSE_BTN,
        mk = wire::PARAM_MOD_KEYS,
        kc = wire::PARAM_KEY_CODE,
        alt = ModKeys::ALT.bits(),
        ctrl = ModKeys::CTRL.bits(),
        meta = ModKeys::META.bits(),
        shift = ModKeys::SHIFT.bits(),
        era_no = wire::ERA_NO_ACTION,
        era_reload = wire::ERA_RELOAD_WIN,
        era_dirty = wire::ERA_DIRTY_COMPS,
        era_focus = wire::ERA_FOCUS_COMP,
    )
}

const DEFAULT_THEME_CSS: &str = "
body {font-family:Arial}

.gwu-Window {}

.gwu-Panel {}

.gwu-Table {}

.gwu-Label {}

.gwu-Link {}

.gwu-Image {}

.gwu-Button {}

.gwu-CheckBox {}

.gwu-RadioButton {}

.gwu-ListBox {}

.gwu-TextBox {}

.gwu-PasswBox {}

.gwu-Html {}

.gwu-SwitchButton {}
.gwu-SwitchButton-On-Active {background:#00a000; color:#d0ffd0}
.gwu-SwitchButton-Off-Active {background:#d03030; color:#ffd0d0}
.gwu-SwitchButton-On-Inactive, .gwu-SwitchButton-Off-Inactive {background:#606060; color:#909090}
.gwu-SwitchButton-On-Inactive:enabled, .gwu-SwitchButton-Off-Inactive:enabled {cursor:pointer}
.gwu-SwitchButton-On-Active, .gwu-SwitchButton-Off-Active, .gwu-SwitchButton-On-Inactive, .gwu-SwitchButton-Off-Inactive {margin:0px;border:0px; width:100%}
.gwu-SwitchButton-On-Active:disabled, .gwu-SwitchButton-Off-Active:disabled, .gwu-SwitchButton-On-Inactive:disabled, .gwu-SwitchButton-Off-Inactive:disabled {color:black}

.gwu-SessMonitor {}
.gwu-SessMonitor-Expired {color:red}
.gwu-SessMonitor-Error {color:#c00000}

.gwu-TabBar {}
.gwu-TabBar-Top {border-bottom:5px solid #8080f8}
.gwu-TabBar-Bottom {border-top:5px solid #8080f8}
.gwu-TabBar-Left {border-right:5px solid #8080f8; padding-top:1px}
.gwu-TabBar-Right {border-left:5px solid #8080f8; padding-top:1px}
.gwu-TabBar-NotSelected {padding-left:5px; padding-right:5px; border:1px solid white; background:#c0c0ff; cursor:default; width:100%}
.gwu-TabBar-Selected {padding-left:5px; padding-right:5px; border:1px solid #8080f8; background:#8080f8; cursor:default; width:100%}
.gwu-TabPanel {}
.gwu-TabPanel-Content {border:1px solid #8080f8}

.gwu-Expander {}
.gwu-Expander-Header {cursor:pointer}
.gwu-Expander-Header-Expanded {cursor:pointer}
.gwu-Expander-Content {}
";

const DEBUG_THEME_EXTRA_CSS: &str = "
.gwu-Window td {border:1px solid black}
.gwu-Table td {border:1px solid black}
.gwu-Panel td {border:1px solid black}
.gwu-TabPanel td {border:1px solid black}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_carries_wire_constants() {
        let js = static_js();
        assert!(js.contains("_pEventType='et'"));
        assert!(js.contains("_pCompId='cid'"));
        assert!(js.contains("_eraReloadWin=1"));
        assert!(js.contains("_eraDirtyComps=2"));
        assert!(js.contains("function se(event, etype, compId, compValue)"));
        assert!(js.contains("function setupTimer"));
        // Timers schedule compiled functions, not strings.
        assert!(js.contains("new Function(js)"));
        assert!(!js.contains("setInterval(js"));
    }

    #[test]
    fn themes_resolve_by_resource_name() {
        let default_res = wire::res_name_static_css(wire::THEME_DEFAULT);
        let debug_res = wire::res_name_static_css(wire::THEME_DEBUG);
        assert!(static_css(&default_res).unwrap().contains(".gwu-Window"));
        assert!(static_css(&debug_res).unwrap().contains("td {border:1px solid black}"));
        assert!(static_css("gowut-nope-0.0.0.css").is_none());
    }
}
