pub mod clipboard;
pub mod commands;
pub mod config;
pub mod drag;
pub mod export;
pub mod input;
pub mod panel;
pub mod selection;
pub mod session;
pub mod shortcuts;

pub use commands::{EditCommand, HistoryManager};
pub use config::{HistoryConfig, SessionConfig};
pub use input::{FocusContext, InputEvent, Modifiers};
pub use session::{BuilderSession, EventOutcome, Viewport};
