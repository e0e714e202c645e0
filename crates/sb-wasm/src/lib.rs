//! WASM bridge for the section builder. Exposes a `BuilderSession` to the
//! host page.
//!
//! Compiled via `wasm-pack build --target web`. Node ids cross the boundary
//! in their `el-N` form; an empty string means "none" (or the bare canvas).
//! Structured results are returned as JSON strings.

use sb_core::catalog::ElementType;
use sb_core::id::NodeId;
use sb_core::model::{CanvasTree, Segment};
use sb_core::property::PropertyName;
use sb_editor::clipboard::{Clipboard, ClipboardError};
use sb_editor::export::{ExportTab, ExportView};
use sb_editor::selection::SelectionChange;
use sb_editor::{BuilderSession, EventOutcome, FocusContext, InputEvent, Modifiers, SessionConfig};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_time::Instant;

/// The main WASM-facing controller.
///
/// Owns one editing session plus the export modal state. All interaction
/// from the page goes through this struct.
#[wasm_bindgen]
pub struct BuilderCanvas {
    session: BuilderSession,
    export: Option<ExportView>,
}

#[wasm_bindgen]
impl BuilderCanvas {
    /// Create a session. `config_json` may be empty or a partial
    /// `SessionConfig` object; unknown or invalid JSON falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        init_logging();
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            SessionConfig::default()
        } else {
            serde_json::from_str(config_json).unwrap_or_else(|e| {
                log::warn!("ignoring session config: {e}");
                SessionConfig::default()
            })
        };
        Self {
            session: BuilderSession::new(config),
            export: None,
        }
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Toolbar insert. Unknown kinds fall back to `text`.
    /// Returns `{"ok":true,"id":"el-N","parent":"...","redirected":bool}`.
    pub fn insert(&mut self, kind: &str, target_id: &str) -> String {
        let element = ElementType::from_key_lenient(kind);
        let placement = self.session.insert(element, parse_id(target_id));
        json!({
            "ok": true,
            "id": placement.id,
            "parent": placement.parent,
            "redirected": placement.redirected,
        })
        .to_string()
    }

    /// Delete the selected node. Returns `true` if something was removed.
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected().is_ok()
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    pub fn drag_start(&mut self, kind: &str) {
        self.session.begin_drag(ElementType::from_key_lenient(kind));
    }

    /// Pointer moved over `target_id`. Returns the id to highlight, or "".
    pub fn drag_over(&mut self, target_id: &str) -> String {
        self.session
            .drag_over(parse_id(target_id))
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Commit the drag. Same JSON shape as [`insert`](Self::insert), or
    /// `{"ok":false,"error":"..."}` when no drag is active.
    pub fn drop_on(&mut self, target_id: &str) -> String {
        match self.session.drop_at(parse_id(target_id)) {
            Ok(placement) => json!({
                "ok": true,
                "id": placement.id,
                "parent": placement.parent,
                "redirected": placement.redirected,
            })
            .to_string(),
            Err(e) => error_json(&e),
        }
    }

    pub fn drag_leave(&mut self) {
        self.session.drag_leave();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select a node by id ("" deselects). Returns `true` on success.
    pub fn select_by_id(&mut self, node_id: &str) -> bool {
        self.session.select(parse_id(node_id)).is_ok()
    }

    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// Set a property by schema name (`paddingTop`, `href`, ...).
    /// Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn set_property(&mut self, node_id: &str, name: &str, value: &str) -> String {
        let Some(id) = parse_id(node_id) else {
            return error_message(&format!("invalid node id `{node_id}`"));
        };
        match self.session.set_property_by_key(id, name, value) {
            Ok(()) => ok_json(),
            Err(e) => error_json(&e),
        }
    }

    /// Panel input on the selection, keyed by field id (`pt`, `bg-color-text`).
    pub fn set_field(&mut self, field_id: &str, value: &str) -> String {
        match self.session.set_field(field_id, value) {
            Ok(()) => ok_json(),
            Err(e) => error_json(&e),
        }
    }

    pub fn set_content(&mut self, node_id: &str, text: &str) -> String {
        let Some(id) = parse_id(node_id) else {
            return error_message(&format!("invalid node id `{node_id}`"));
        };
        match self.session.set_content(id, text) {
            Ok(()) => ok_json(),
            Err(e) => error_json(&e),
        }
    }

    /// Property panel for the selection as JSON, or `null`.
    pub fn get_panel_json(&self) -> String {
        match self.session.panel() {
            Some(panel) => serde_json::to_string(&panel).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Undo the last action.
    pub fn undo(&mut self) -> bool {
        self.session.undo().is_ok()
    }

    /// Redo the last undone action.
    pub fn redo(&mut self) -> bool {
        self.session.redo().is_ok()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        in_text_field: bool,
    ) -> String {
        let event = InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
            focus: if in_text_field {
                FocusContext::TextField
            } else {
                FocusContext::Canvas
            },
        };
        let outcome = self.session.handle_event(&event);
        let (changed, action) = match &outcome {
            Ok(EventOutcome::Undone(_)) => (true, "undo"),
            Ok(EventOutcome::Redone(_)) => (true, "redo"),
            Ok(EventOutcome::Deleted(_)) => (true, "delete"),
            Ok(EventOutcome::Selection(SelectionChange::Changed { .. })) => (false, "deselect"),
            Ok(_) => (false, "none"),
            Err(_) => (false, "rejected"),
        };
        json!({ "changed": changed, "action": action }).to_string()
    }

    /// Route a JSON-encoded `InputEvent` (`{"type":"drop","target":"el-2"}`).
    pub fn handle_event_json(&mut self, event_json: &str) -> String {
        let event: InputEvent = match serde_json::from_str(event_json) {
            Ok(ev) => ev,
            Err(e) => return error_message(&format!("bad event: {e}")),
        };
        match self.session.handle_event(&event) {
            Ok(outcome) => json!({ "ok": true, "outcome": outcome_name(&outcome) }).to_string(),
            Err(e) => error_json(&e),
        }
    }

    // ─── Canvas view ─────────────────────────────────────────────────────

    /// Whether the canvas holds any element (hides the empty-state hint).
    pub fn has_content(&self) -> bool {
        self.session.has_content()
    }

    /// The element tree for rendering, as nested JSON.
    pub fn get_tree_json(&self) -> String {
        let tree = self.session.tree();
        let nodes: Vec<Value> = tree
            .top_level()
            .into_iter()
            .map(|id| collect_node_tree(tree, id))
            .collect();
        Value::Array(nodes).to_string()
    }

    /// Returns `true` if `name` is a known viewport.
    pub fn set_viewport(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(viewport) => {
                self.session.set_viewport(viewport);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn get_viewport(&self) -> String {
        self.session.viewport().to_string()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Generate code and open the export view. Returns
    /// `{"slug","markup","stylesheet","markupPath","stylesheetPath"}`.
    pub fn open_export(&mut self, section_name: &str) -> String {
        let view = self.session.export_view(section_name);
        let out = json!({
            "slug": view.bundle.slug,
            "markup": view.bundle.markup,
            "stylesheet": view.bundle.stylesheet,
            "markupPath": view.bundle.markup_path(),
            "stylesheetPath": view.bundle.stylesheet_path(),
        })
        .to_string();
        self.export = Some(view);
        out
    }

    /// Switch the export tab (`markup`/`liquid` or `stylesheet`/`css`).
    pub fn set_export_tab(&mut self, tab: &str) -> bool {
        let Ok(tab) = serde_json::from_value::<ExportTab>(Value::String(tab.to_string())) else {
            return false;
        };
        match self.export.as_mut() {
            Some(view) => {
                view.tab = tab;
                true
            }
            None => false,
        }
    }

    /// Code the copy button should place on the clipboard.
    pub fn export_code(&self) -> String {
        self.export
            .as_ref()
            .map(|v| v.active_code().to_string())
            .unwrap_or_default()
    }

    /// Report the outcome of the page's clipboard write.
    pub fn report_copy(&mut self, success: bool) {
        if let Some(view) = self.export.as_mut() {
            let mut clipboard = HostClipboard { accepted: success };
            view.copy_active(&mut clipboard, Instant::now());
        }
    }

    /// Current copy button label.
    pub fn copy_label(&self) -> String {
        let now = Instant::now();
        self.export
            .as_ref()
            .map(|v| v.copy_label(now))
            .unwrap_or(sb_editor::clipboard::COPY_LABEL)
            .to_string()
    }

    pub fn close_export(&mut self) {
        self.export = None;
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// The page performs the actual (async) clipboard write and reports back.
struct HostClipboard {
    accepted: bool,
}

impl Clipboard for HostClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        if self.accepted {
            Ok(())
        } else {
            Err(ClipboardError::Unavailable(
                "page reported a failed write".to_string(),
            ))
        }
    }
}

fn parse_id(s: &str) -> Option<NodeId> {
    if s.is_empty() {
        return None;
    }
    NodeId::parse(s).filter(|id| !id.is_canvas())
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(err: &sb_core::EditError) -> String {
    error_message(&err.to_string())
}

fn error_message(msg: &str) -> String {
    json!({ "ok": false, "error": msg }).to_string()
}

fn outcome_name(outcome: &EventOutcome) -> &'static str {
    match outcome {
        EventOutcome::Ignored => "ignored",
        EventOutcome::DragStarted => "dragStarted",
        EventOutcome::Highlight(_) => "highlight",
        EventOutcome::Placed(_) => "placed",
        EventOutcome::DragCancelled => "dragCancelled",
        EventOutcome::Selection(_) => "selection",
        EventOutcome::Deleted(_) => "deleted",
        EventOutcome::Undone(_) => "undone",
        EventOutcome::Redone(_) => "redone",
    }
}

/// Recursively collect nodes into a serializable tree structure.
fn collect_node_tree(tree: &CanvasTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let Some(element) = node.element() else {
        return Value::Null;
    };
    let template = element.template();

    let content: Vec<Value> = node
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => json!({ "text": text }),
            Segment::Element(child) => collect_node_tree(tree, *child),
        })
        .collect();

    let mut obj = json!({
        "id": id,
        "type": element,
        "label": template.label,
        "class": template.class,
        "container": element.can_contain(),
        "style": node.properties.declarations().join("; "),
    });
    if let Some(custom_class) = node.properties.get(PropertyName::CustomClass) {
        obj["customClass"] = Value::String(custom_class.to_string());
    }
    if !content.is_empty() {
        obj["content"] = Value::Array(content);
    }
    obj
}

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = console_log::init_with_level(log::Level::Debug);
        });
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("section builder panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_tree_json() {
        let mut canvas = BuilderCanvas::new("");
        let out: Value = serde_json::from_str(&canvas.insert("row", "")).unwrap();
        assert_eq!(out["id"], "el-1");
        assert_eq!(out["parent"], "canvas");
        canvas.insert("heading", "el-1");

        let tree: Value = serde_json::from_str(&canvas.get_tree_json()).unwrap();
        assert_eq!(tree[0]["type"], "row");
        assert_eq!(tree[0]["content"][0]["type"], "heading");
        assert_eq!(tree[0]["content"][0]["content"][0]["text"], "Heading Text");
    }

    #[test]
    fn errors_come_back_as_json() {
        let mut canvas = BuilderCanvas::new("{}");
        let out: Value = serde_json::from_str(&canvas.drop_on("")).unwrap();
        assert_eq!(out["ok"], false);
        assert_eq!(out["error"], "no drag in progress");

        canvas.insert("text", "");
        let out: Value =
            serde_json::from_str(&canvas.set_property("el-1", "paddingTop", "big")).unwrap();
        assert_eq!(out["ok"], false);
    }

    #[test]
    fn key_delete_respects_text_focus() {
        let mut canvas = BuilderCanvas::new("");
        canvas.insert("text", "");
        assert!(canvas.select_by_id("el-1"));
        let out: Value =
            serde_json::from_str(&canvas.handle_key("Delete", false, false, false, false, true))
                .unwrap();
        assert_eq!(out["changed"], false);
        assert!(canvas.has_content());
    }

    #[test]
    fn escape_reports_deselect_only_when_selected() {
        let mut canvas = BuilderCanvas::new("");
        let escape = |canvas: &mut BuilderCanvas| -> Value {
            serde_json::from_str(&canvas.handle_key("Escape", false, false, false, false, false))
                .unwrap()
        };
        assert_eq!(escape(&mut canvas)["action"], "none");

        canvas.insert("text", "");
        assert!(canvas.select_by_id("el-1"));
        assert_eq!(escape(&mut canvas)["action"], "deselect");
        assert_eq!(canvas.get_selected_id(), "");
        assert_eq!(escape(&mut canvas)["action"], "none");
    }

    #[test]
    fn export_tab_and_copy() {
        let mut canvas = BuilderCanvas::new("");
        let out: Value = serde_json::from_str(&canvas.open_export("Hero Block")).unwrap();
        assert_eq!(out["markupPath"], "sections/hero-block.liquid");
        assert!(canvas.set_export_tab("css"));
        assert!(canvas.export_code().starts_with("/* Hero Block Styles */"));

        canvas.report_copy(false);
        assert_eq!(canvas.copy_label(), "📋 Copy Code");
        canvas.report_copy(true);
        assert_eq!(canvas.copy_label(), "✓ Copied!");
    }
}
