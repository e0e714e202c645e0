//! Drag-and-drop placement.
//!
//! A drag carries an element type from the toolbox onto the canvas:
//!
//! ```text
//! Idle ──begin──▶ Dragging ──hover──▶ HoverTarget ──drop──▶ Idle
//!                    │                    │  ▲
//!                    └──────leave─────────┴──┴─hover
//! ```
//!
//! Pointer targets are resolved to their nearest container-capable ancestor,
//! so dropping onto a heading inside a column lands in the column.

use sb_core::catalog::ElementType;
use sb_core::error::{EditError, EditResult};
use sb_core::id::NodeId;
use sb_core::model::{CanvasTree, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        element: ElementType,
    },
    HoverTarget {
        element: ElementType,
        /// The one highlighted container. `None` when over the bare canvas.
        highlighted: Option<NodeId>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    state: DragState,
}

impl DragDropController {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// The drop-zone highlight, if any.
    pub fn highlighted(&self) -> Option<NodeId> {
        match self.state {
            DragState::HoverTarget { highlighted, .. } => highlighted,
            _ => None,
        }
    }

    fn payload(&self) -> Option<ElementType> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { element } | DragState::HoverTarget { element, .. } => {
                Some(element)
            }
        }
    }

    /// Start carrying `element`. Replaces the payload of a drag in flight.
    pub fn begin(&mut self, element: ElementType) {
        self.state = DragState::Dragging { element };
    }

    /// Pointer moved over `target` (`None` or the canvas id for empty
    /// canvas). Replaces the highlight and returns it. Ignored while idle.
    pub fn hover(&mut self, tree: &CanvasTree, target: Option<NodeId>) -> Option<NodeId> {
        let element = self.payload()?;
        let highlighted = target.and_then(|t| tree.resolve_container_ancestor(t));
        log::trace!("hover {target:?} -> {highlighted:?}");
        self.state = DragState::HoverTarget {
            element,
            highlighted,
        };
        highlighted
    }

    /// Commit the carried element under the container resolved from
    /// `target`. `redirected` is set when the pointer was over an element
    /// that is not the node's final parent.
    pub fn drop(&mut self, tree: &mut CanvasTree, target: Option<NodeId>) -> EditResult<(ElementType, Placement)> {
        let element = self.payload().ok_or(EditError::NoActiveDrag)?;
        self.state = DragState::Idle;

        let resolved = target.and_then(|t| tree.resolve_container_ancestor(t));
        let mut placement = tree.insert(element, resolved);
        placement.redirected = target
            .filter(|t| !t.is_canvas() && tree.contains(*t))
            .is_some_and(|t| t != placement.parent);
        if placement.redirected {
            log::debug!("drop on {target:?} redirected to {}", placement.parent);
        }
        Ok((element, placement))
    }

    /// Pointer released outside the canvas or left it. Nothing is committed.
    pub fn leave(&mut self) {
        self.state = DragState::Idle;
    }
}
