//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives in
//! Rust so the WASM host and native tests share it.

use crate::input::{FocusContext, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    /// Delete the selected node and its subtree.
    Delete,
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the combo has no binding, or if it is an editing
    /// key pressed while a text field has focus.
    pub fn resolve(key: &str, modifiers: Modifiers, focus: FocusContext) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            // Backspace in the section-name box must never delete a node.
            "Delete" | "Backspace" if focus == FocusContext::TextField => None,
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
