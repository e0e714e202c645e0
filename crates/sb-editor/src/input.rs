//! Host input events, already hit-tested to node ids by the host UI.

use sb_core::catalog::ElementType;
use sb_core::id::NodeId;
use serde::Deserialize;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, ⌘ on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Where keyboard focus sits when a key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusContext {
    #[default]
    Canvas,
    /// A text-entry field (property input, section name box). Editing keys
    /// belong to the field.
    TextField,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    DragStart {
        element: ElementType,
    },
    DragOver {
        #[serde(default)]
        target: Option<NodeId>,
    },
    Drop {
        #[serde(default)]
        target: Option<NodeId>,
    },
    DragLeave,
    /// `None` is a click on empty canvas.
    Click {
        #[serde(default)]
        target: Option<NodeId>,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        focus: FocusContext,
    },
}
