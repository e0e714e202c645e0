//! Clipboard seam and the copy button's feedback label.

use std::time::Duration;
use thiserror::Error;
use web_time::Instant;

pub const COPY_LABEL: &str = "📋 Copy Code";
pub const COPIED_LABEL: &str = "✓ Copied!";
/// How long the confirmation stays up.
pub const COPIED_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// System clipboard, provided by the host.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copy button label state. Time is supplied by the caller, so the revert is
/// a pure function of "now" rather than a timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    /// Write `text` to `clipboard`. On success the label flips to
    /// [`COPIED_LABEL`]; on failure it stays put and the error is logged.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, text: &str, now: Instant) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(err) => {
                log::warn!("copy failed: {err}");
                false
            }
        }
    }

    pub fn label(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPIED_DURATION => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}

/// In-memory clipboard for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// When set, every write fails.
    pub unavailable: bool,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable("clipboard disabled".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_reverts_after_two_seconds() {
        let mut clipboard = MemoryClipboard::default();
        let mut feedback = CopyFeedback::default();
        let t0 = Instant::now();
        assert_eq!(feedback.label(t0), COPY_LABEL);

        assert!(feedback.copy(&mut clipboard, "<div></div>", t0));
        assert_eq!(clipboard.contents.as_deref(), Some("<div></div>"));
        assert_eq!(feedback.label(t0 + Duration::from_millis(1999)), COPIED_LABEL);
        assert_eq!(feedback.label(t0 + Duration::from_millis(2000)), COPY_LABEL);
    }

    #[test]
    fn failure_leaves_label_unchanged() {
        let mut clipboard = MemoryClipboard {
            unavailable: true,
            ..Default::default()
        };
        let mut feedback = CopyFeedback::default();
        let t0 = Instant::now();
        assert!(!feedback.copy(&mut clipboard, "x", t0));
        assert_eq!(feedback.label(t0), COPY_LABEL);
        assert_eq!(clipboard.contents, None);
    }
}
