//! Export modal model: the generated bundle plus the active code tab.

use crate::clipboard::{Clipboard, CopyFeedback};
use sb_core::export::ExportBundle;
use serde::{Deserialize, Serialize};
use web_time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTab {
    /// The section template (the host calls this tab "liquid").
    #[default]
    #[serde(alias = "liquid")]
    Markup,
    #[serde(alias = "css")]
    Stylesheet,
}

/// What the export modal shows.
#[derive(Debug, Clone)]
pub struct ExportView {
    pub bundle: ExportBundle,
    pub tab: ExportTab,
    pub feedback: CopyFeedback,
}

impl ExportView {
    pub fn new(bundle: ExportBundle) -> Self {
        Self {
            bundle,
            tab: ExportTab::default(),
            feedback: CopyFeedback::default(),
        }
    }

    pub fn code(&self, tab: ExportTab) -> &str {
        match tab {
            ExportTab::Markup => &self.bundle.markup,
            ExportTab::Stylesheet => &self.bundle.stylesheet,
        }
    }

    /// Code in the active tab.
    pub fn active_code(&self) -> &str {
        self.code(self.tab)
    }

    /// Copy the active tab's code.
    pub fn copy_active<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, now: Instant) -> bool {
        let code = match self.tab {
            ExportTab::Markup => &self.bundle.markup,
            ExportTab::Stylesheet => &self.bundle.stylesheet,
        };
        self.feedback.copy(clipboard, code, now)
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.feedback.label(now)
    }
}
