//! Single-node selection.

use sb_core::error::{EditError, EditResult};
use sb_core::id::NodeId;
use sb_core::model::CanvasTree;

/// Outcome of a `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The selection moved; `previous` lost its highlight.
    Changed { previous: Option<NodeId> },
    /// The requested selection was already active.
    Unchanged,
}

/// At most one active node. Never touches history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<NodeId>,
}

impl Selection {
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Select `id`, or clear with `None`. Unknown ids (and the canvas root)
    /// are rejected and leave the selection as it was.
    pub fn select(&mut self, tree: &CanvasTree, id: Option<NodeId>) -> EditResult<SelectionChange> {
        if let Some(id) = id {
            if tree.element_type(id).is_none() {
                return Err(EditError::NodeNotFound(id));
            }
        }
        if self.selected == id {
            return Ok(SelectionChange::Unchanged);
        }
        let previous = std::mem::replace(&mut self.selected, id);
        log::trace!("selection {previous:?} -> {id:?}");
        Ok(SelectionChange::Changed { previous })
    }

    pub fn clear(&mut self) -> SelectionChange {
        match self.selected.take() {
            Some(previous) => SelectionChange::Changed {
                previous: Some(previous),
            },
            None => SelectionChange::Unchanged,
        }
    }

    /// Drop the selection if its node is gone from `tree`.
    pub fn retain_existing(&mut self, tree: &CanvasTree) {
        if self.selected.is_some_and(|id| !tree.contains(id)) {
            self.selected = None;
        }
    }
}
