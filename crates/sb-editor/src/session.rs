//! Builder session: one document being edited.
//!
//! The session owns the canvas tree and every controller that mutates it.
//! Each successful mutation is recorded in history before the call returns;
//! selection changes, undo/redo and structural edits seal the newest entry
//! so later property edits start a fresh undo step.
//!
//! Sessions are plain values. Several may coexist; nothing is global.

use crate::commands::{EditCommand, HistoryManager};
use crate::config::SessionConfig;
use crate::drag::{DragDropController, DragState};
use crate::export::ExportView;
use crate::input::InputEvent;
use crate::panel::{PropertyPanel, build_panel, property_for_field};
use crate::selection::{Selection, SelectionChange};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use sb_core::catalog::ElementType;
use sb_core::error::{EditError, EditResult};
use sb_core::export::{AssetStore, AssetStoreError, ExportBundle, publish};
use sb_core::id::NodeId;
use sb_core::model::{CanvasTree, Placement};
use sb_core::property::PropertyName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Viewport ────────────────────────────────────────────────────────────

/// Canvas preview width. Does not affect generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    /// Preview frame width in CSS pixels; `None` is full width.
    pub fn preview_width(self) -> Option<u32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(768),
            Self::Mobile => Some(375),
        }
    }
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown viewport `{other}`")),
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        })
    }
}

// ─── Outcomes ────────────────────────────────────────────────────────────

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No binding, or an event that does nothing in the current state.
    Ignored,
    DragStarted,
    /// The drop-zone highlight after a pointer move.
    Highlight(Option<NodeId>),
    Placed(Placement),
    DragCancelled,
    Selection(SelectionChange),
    Deleted(NodeId),
    Undone(String),
    Redone(String),
}

// ─── Session ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BuilderSession {
    tree: CanvasTree,
    selection: Selection,
    drag: DragDropController,
    history: HistoryManager,
    viewport: Viewport,
    default_section_name: String,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl BuilderSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            tree: CanvasTree::new(),
            selection: Selection::default(),
            drag: DragDropController::default(),
            history: HistoryManager::new(&config.history),
            viewport: Viewport::default(),
            default_section_name: config.default_section_name,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn tree(&self) -> &CanvasTree {
        &self.tree
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the canvas holds any element (drives the empty-state hint).
    pub fn has_content(&self) -> bool {
        !self.tree.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Panel for the current selection; `None` when nothing is selected.
    pub fn panel(&self) -> Option<PropertyPanel> {
        let id = self.selection.selected()?;
        build_panel(&self.tree, id).ok()
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Toolbar insert: append `element` under `target` (or the root).
    pub fn insert(&mut self, element: ElementType, target: Option<NodeId>) -> Placement {
        let placement = self.tree.insert(element, target);
        self.history.record(EditCommand::insert(element, placement));
        placement
    }

    /// Remove `id` and its subtree. Clears the selection if it was inside.
    pub fn remove(&mut self, id: NodeId) -> EditResult<()> {
        let subtree = self.tree.remove(id)?;
        self.history.record(EditCommand::remove(subtree));
        self.selection.retain_existing(&self.tree);
        Ok(())
    }

    /// Remove the selected node. `NoSelection` when nothing is selected.
    pub fn delete_selected(&mut self) -> EditResult<NodeId> {
        let id = self.selection.selected().ok_or(EditError::NoSelection)?;
        self.remove(id)?;
        Ok(id)
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, element: ElementType) {
        self.drag.begin(element);
    }

    pub fn drag_over(&mut self, target: Option<NodeId>) -> Option<NodeId> {
        self.drag.hover(&self.tree, target)
    }

    pub fn drop_at(&mut self, target: Option<NodeId>) -> EditResult<Placement> {
        let (element, placement) = self.drag.drop(&mut self.tree, target)?;
        self.history.record(EditCommand::insert(element, placement));
        Ok(placement)
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: Option<NodeId>) -> EditResult<SelectionChange> {
        let change = self.selection.select(&self.tree, id)?;
        if change != SelectionChange::Unchanged {
            self.history.seal();
        }
        Ok(change)
    }

    // ─── Properties ──────────────────────────────────────────────────────

    pub fn set_property(&mut self, id: NodeId, name: PropertyName, value: &str) -> EditResult<()> {
        let edit = self.tree.set_property(id, name, value)?;
        self.history.record(edit.into());
        Ok(())
    }

    /// [`set_property`](Self::set_property) with a host-supplied name.
    pub fn set_property_by_key(&mut self, id: NodeId, key: &str, value: &str) -> EditResult<()> {
        let name = PropertyName::parse(key)?;
        self.set_property(id, name, value)
    }

    /// Panel input on the selected node, addressed by the host's field id.
    pub fn set_field(&mut self, field_id: &str, value: &str) -> EditResult<()> {
        let id = self.selection.selected().ok_or(EditError::NoSelection)?;
        let name = property_for_field(field_id)
            .ok_or_else(|| EditError::UnknownProperty(field_id.to_string()))?;
        self.set_property(id, name, value)
    }

    pub fn set_content(&mut self, id: NodeId, text: &str) -> EditResult<()> {
        let edit = self.tree.set_content(id, text)?;
        self.history.record(edit.into());
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> EditResult<String> {
        let desc = self.history.undo(&mut self.tree)?;
        self.selection.retain_existing(&self.tree);
        Ok(desc)
    }

    pub fn redo(&mut self) -> EditResult<String> {
        let desc = self.history.redo(&mut self.tree)?;
        self.selection.retain_existing(&self.tree);
        Ok(desc)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    fn section_name<'a>(&'a self, name: &'a str) -> &'a str {
        if name.trim().is_empty() {
            &self.default_section_name
        } else {
            name
        }
    }

    pub fn export(&self, section_name: &str) -> ExportBundle {
        ExportBundle::generate(&self.tree, self.section_name(section_name))
    }

    pub fn export_view(&self, section_name: &str) -> ExportView {
        ExportView::new(self.export(section_name))
    }

    /// Generate and hand both files to `store` under `container_id`.
    pub fn publish<S: AssetStore + ?Sized>(
        &self,
        section_name: &str,
        container_id: &str,
        store: &mut S,
    ) -> Result<ExportBundle, AssetStoreError> {
        let bundle = self.export(section_name);
        publish(&bundle, container_id, store)?;
        Ok(bundle)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one host event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EditResult<EventOutcome> {
        match event {
            InputEvent::DragStart { element } => {
                self.begin_drag(*element);
                Ok(EventOutcome::DragStarted)
            }
            InputEvent::DragOver { target } => {
                if !self.drag.is_active() {
                    return Ok(EventOutcome::Ignored);
                }
                Ok(EventOutcome::Highlight(self.drag_over(*target)))
            }
            InputEvent::Drop { target } => self.drop_at(*target).map(EventOutcome::Placed),
            InputEvent::DragLeave => {
                if !self.drag.is_active() {
                    return Ok(EventOutcome::Ignored);
                }
                self.drag_leave();
                Ok(EventOutcome::DragCancelled)
            }
            InputEvent::Click { target } => {
                let target = target.filter(|id| !id.is_canvas());
                self.select(target).map(EventOutcome::Selection)
            }
            InputEvent::Key {
                key,
                modifiers,
                focus,
            } => match ShortcutMap::resolve(key, *modifiers, *focus) {
                Some(ShortcutAction::Undo) => self.undo().map(EventOutcome::Undone),
                Some(ShortcutAction::Redo) => self.redo().map(EventOutcome::Redone),
                Some(ShortcutAction::Delete) => self.delete_selected().map(EventOutcome::Deleted),
                Some(ShortcutAction::Deselect) => {
                    let change = self.selection.clear();
                    if change != SelectionChange::Unchanged {
                        self.history.seal();
                    }
                    Ok(EventOutcome::Selection(change))
                }
                None => Ok(EventOutcome::Ignored),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FocusContext, Modifiers};

    fn key(k: &str, focus: FocusContext) -> InputEvent {
        InputEvent::Key {
            key: k.to_string(),
            modifiers: Modifiers::NONE,
            focus,
        }
    }

    #[test]
    fn drag_events_place_and_record() {
        let mut session = BuilderSession::default();
        session
            .handle_event(&InputEvent::DragStart {
                element: ElementType::Section,
            })
            .unwrap();
        let outcome = session.handle_event(&InputEvent::Drop { target: None }).unwrap();
        let EventOutcome::Placed(placed) = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert_eq!(placed.parent, NodeId::CANVAS);
        assert!(session.has_content());
        assert!(session.can_undo());
    }

    #[test]
    fn drop_without_drag_is_error() {
        let mut session = BuilderSession::default();
        assert_eq!(
            session.handle_event(&InputEvent::Drop { target: None }),
            Err(EditError::NoActiveDrag)
        );
        assert_eq!(
            session.handle_event(&InputEvent::DragOver { target: None }),
            Ok(EventOutcome::Ignored)
        );
    }

    #[test]
    fn delete_key_guarded_by_focus() {
        let mut session = BuilderSession::default();
        let id = session.insert(ElementType::Text, None).id;
        session.select(Some(id)).unwrap();

        let outcome = session
            .handle_event(&key("Delete", FocusContext::TextField))
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(session.tree().contains(id));

        let outcome = session
            .handle_event(&key("Backspace", FocusContext::Canvas))
            .unwrap();
        assert_eq!(outcome, EventOutcome::Deleted(id));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn delete_without_selection() {
        let mut session = BuilderSession::default();
        assert_eq!(
            session.handle_event(&key("Delete", FocusContext::Canvas)),
            Err(EditError::NoSelection)
        );
    }

    #[test]
    fn escape_and_empty_click_deselect() {
        let mut session = BuilderSession::default();
        let id = session.insert(ElementType::Icon, None).id;
        session.select(Some(id)).unwrap();
        session
            .handle_event(&key("Escape", FocusContext::Canvas))
            .unwrap();
        assert_eq!(session.selected(), None);

        session
            .handle_event(&InputEvent::Click { target: Some(id) })
            .unwrap();
        assert_eq!(session.selected(), Some(id));
        session
            .handle_event(&InputEvent::Click {
                target: Some(NodeId::CANVAS),
            })
            .unwrap();
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn set_field_targets_selection() {
        let mut session = BuilderSession::default();
        assert_eq!(session.set_field("pt", "4"), Err(EditError::NoSelection));

        let id = session.insert(ElementType::Heading, None).id;
        session.select(Some(id)).unwrap();
        session.set_field("bg-color-text", "#000").unwrap();
        let panel = session.panel().unwrap();
        assert_eq!(panel.field("bg-color").unwrap().value, "#000");
        assert_eq!(
            session.set_field("zoom", "2"),
            Err(EditError::UnknownProperty("zoom".into()))
        );
    }

    #[test]
    fn undo_clears_selection_of_vanished_node() {
        let mut session = BuilderSession::default();
        let id = session.insert(ElementType::Text, None).id;
        session.select(Some(id)).unwrap();
        session.undo().unwrap();
        assert_eq!(session.selected(), None);
        session.redo().unwrap();
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn viewport_parses() {
        assert_eq!("tablet".parse::<Viewport>(), Ok(Viewport::Tablet));
        assert!("watch".parse::<Viewport>().is_err());
        let mut session = BuilderSession::default();
        session.set_viewport(Viewport::Mobile);
        assert_eq!(session.viewport().preview_width(), Some(375));
    }

    #[test]
    fn blank_name_uses_configured_default() {
        let session = BuilderSession::new(SessionConfig {
            default_section_name: "landing".into(),
            ..Default::default()
        });
        let bundle = session.export("  ");
        assert_eq!(bundle.slug, "landing");
        assert!(bundle.markup.contains("<div class=\"landing-wrapper\">"));
    }
}
