//! Undo/Redo history.
//!
//! Every successful mutation is recorded as a reversible `EditCommand`
//! holding just enough before/after state to flip it either way. Removing a
//! subtree keeps the detached nodes, so undoing a delete (or redoing an
//! insert) brings back the same ids in the same position.
//!
//! Rapid edits to one field (typing into a text box, dragging a color
//! picker) are merged into a single entry when they land inside the
//! coalescing window. `seal()` closes the newest entry to merging.

use crate::config::HistoryConfig;
use sb_core::catalog::ElementType;
use sb_core::error::{EditError, EditResult};
use sb_core::id::NodeId;
use sb_core::model::{CanvasTree, DetachedSubtree, Edit, Placement, Segments};
use sb_core::property::PropertyName;
use std::time::Duration;
use web_time::Instant;

/// A recorded mutation with everything needed to reverse and replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// A node appended under `parent`. `detached` holds the subtree while
    /// the insert is undone.
    InsertNode {
        id: NodeId,
        element: ElementType,
        parent: NodeId,
        detached: Option<DetachedSubtree>,
    },
    /// A subtree removal. `detached` holds the subtree while it is removed.
    RemoveSubtree {
        id: NodeId,
        detached: Option<DetachedSubtree>,
    },
    SetProperty {
        id: NodeId,
        name: PropertyName,
        before: Option<String>,
        after: Option<String>,
    },
    SetContent {
        id: NodeId,
        before: Segments,
        after: Segments,
    },
}

impl EditCommand {
    pub fn insert(element: ElementType, placement: Placement) -> Self {
        Self::InsertNode {
            id: placement.id,
            element,
            parent: placement.parent,
            detached: None,
        }
    }

    pub fn remove(subtree: DetachedSubtree) -> Self {
        Self::RemoveSubtree {
            id: subtree.root,
            detached: Some(subtree),
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Self::InsertNode { id, .. }
            | Self::RemoveSubtree { id, .. }
            | Self::SetProperty { id, .. }
            | Self::SetContent { id, .. } => *id,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::InsertNode { id, element, .. } => format!("insert {element} {id}"),
            Self::RemoveSubtree { id, .. } => format!("delete {id}"),
            Self::SetProperty { id, name, .. } => format!("set {name} on {id}"),
            Self::SetContent { id, .. } => format!("edit content of {id}"),
        }
    }

    /// Whether `self` (the newest entry) may absorb `next`.
    fn merges_with(&self, next: &EditCommand) -> bool {
        match (self, next) {
            (
                Self::SetProperty { id, name, .. },
                Self::SetProperty {
                    id: next_id,
                    name: next_name,
                    ..
                },
            ) => id == next_id && name == next_name,
            (Self::SetContent { id, .. }, Self::SetContent { id: next_id, .. }) => id == next_id,
            _ => false,
        }
    }

    /// Take `next`'s final state, keeping our own starting state.
    fn absorb(&mut self, next: EditCommand) {
        match (self, next) {
            (Self::SetProperty { after, .. }, Self::SetProperty { after: latest, .. }) => {
                *after = latest;
            }
            (Self::SetContent { after, .. }, Self::SetContent { after: latest, .. }) => {
                *after = latest;
            }
            _ => {}
        }
    }

    fn is_noop(&self) -> bool {
        match self {
            Self::SetProperty { before, after, .. } => before == after,
            Self::SetContent { before, after, .. } => before == after,
            _ => false,
        }
    }

    fn revert(&mut self, tree: &mut CanvasTree) -> EditResult<()> {
        match self {
            Self::InsertNode { id, detached, .. } => {
                *detached = Some(tree.remove(*id)?);
            }
            Self::RemoveSubtree { id, detached } => {
                let subtree = detached.take().ok_or(EditError::NodeNotFound(*id))?;
                tree.restore(subtree)?;
            }
            Self::SetProperty {
                id, name, before, ..
            } => {
                tree.write_property(*id, *name, before.clone())?;
            }
            Self::SetContent { id, before, .. } => {
                tree.replace_segments(*id, before.clone())?;
            }
        }
        Ok(())
    }

    fn replay(&mut self, tree: &mut CanvasTree) -> EditResult<()> {
        match self {
            Self::InsertNode { id, detached, .. } => {
                let subtree = detached.take().ok_or(EditError::NodeNotFound(*id))?;
                tree.restore(subtree)?;
            }
            Self::RemoveSubtree { id, detached } => {
                *detached = Some(tree.remove(*id)?);
            }
            Self::SetProperty { id, name, after, .. } => {
                tree.write_property(*id, *name, after.clone())?;
            }
            Self::SetContent { id, after, .. } => {
                tree.replace_segments(*id, after.clone())?;
            }
        }
        Ok(())
    }
}

impl From<Edit> for EditCommand {
    fn from(edit: Edit) -> Self {
        match edit {
            Edit::Property {
                id,
                name,
                before,
                after,
            } => Self::SetProperty {
                id,
                name,
                before,
                after,
            },
            Edit::Content { id, before, after } => Self::SetContent { id, before, after },
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    command: EditCommand,
    /// When the entry was last extended.
    at: Instant,
}

/// Linear undo/redo over [`EditCommand`]s.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    /// Maximum undo depth, unbounded when `None`.
    max_depth: Option<usize>,
    coalesce_window: Duration,
    /// The newest entry no longer accepts merges.
    sealed: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

impl HistoryManager {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: config.max_depth.map(|depth| depth.max(1)),
            coalesce_window: config.coalesce_window(),
            sealed: true,
        }
    }

    /// Record a command that has already been applied to the tree.
    pub fn record(&mut self, command: EditCommand) {
        self.record_at(command, Instant::now());
    }

    /// [`record`](Self::record) with an explicit timestamp.
    pub fn record_at(&mut self, command: EditCommand, now: Instant) {
        if command.is_noop() {
            return;
        }
        self.redo_stack.clear();

        if self.try_coalesce(&command, now) {
            if let Some(top) = self.undo_stack.last_mut() {
                top.command.absorb(command);
                top.at = now;
                if top.command.is_noop() {
                    self.undo_stack.pop();
                    self.sealed = true;
                }
            }
            return;
        }

        let structural = matches!(
            command,
            EditCommand::InsertNode { .. } | EditCommand::RemoveSubtree { .. }
        );
        log::debug!("history: {}", command.description());
        self.undo_stack.push(Entry { command, at: now });
        if self
            .max_depth
            .is_some_and(|depth| self.undo_stack.len() > depth)
        {
            self.undo_stack.remove(0);
        }
        self.sealed = structural;
    }

    fn try_coalesce(&self, command: &EditCommand, now: Instant) -> bool {
        if self.sealed || self.coalesce_window.is_zero() {
            return false;
        }
        let Some(top) = self.undo_stack.last() else {
            return false;
        };
        top.command.merges_with(command) && now.saturating_duration_since(top.at) <= self.coalesce_window
    }

    /// Close the newest entry so the next edit starts a fresh undo step.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Reverse the newest entry. Returns its description.
    pub fn undo(&mut self, tree: &mut CanvasTree) -> EditResult<String> {
        self.sealed = true;
        let mut entry = self.undo_stack.pop().ok_or(EditError::HistoryBoundary)?;
        if let Err(err) = entry.command.revert(tree) {
            log::warn!("undo of `{}` failed: {err}", entry.command.description());
            self.undo_stack.push(entry);
            return Err(err);
        }
        let desc = entry.command.description();
        log::debug!("undo: {desc}");
        self.redo_stack.push(entry);
        Ok(desc)
    }

    /// Re-apply the most recently undone entry. Returns its description.
    pub fn redo(&mut self, tree: &mut CanvasTree) -> EditResult<String> {
        self.sealed = true;
        let mut entry = self.redo_stack.pop().ok_or(EditError::HistoryBoundary)?;
        if let Err(err) = entry.command.replay(tree) {
            log::warn!("redo of `{}` failed: {err}", entry.command.description());
            self.redo_stack.push(entry);
            return Err(err);
        }
        let desc = entry.command.description();
        log::debug!("redo: {desc}");
        self.undo_stack.push(entry);
        Ok(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Newest undoable entry, if any.
    pub fn last(&self) -> Option<&EditCommand> {
        self.undo_stack.last().map(|e| &e.command)
    }
}
