pub mod catalog;
pub mod emitter;
pub mod error;
pub mod export;
pub mod id;
pub mod model;
pub mod property;

pub use catalog::{ElementTemplate, ElementType};
pub use emitter::{GeneratedCode, emit_section};
pub use error::{EditError, EditResult};
pub use export::{
    AssetStore, AssetStoreError, DEFAULT_SECTION_NAME, ExportBundle, MemoryAssetStore, publish,
    sanitize_slug,
};
pub use id::NodeId;
pub use model::*;
pub use property::{Properties, PropertyName, PropertySchema, ValueDomain};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
