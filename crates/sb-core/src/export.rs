//! Export artifacts and the asset-store seam.
//!
//! A bundle pairs the generated code with a filename-safe slug. Persisting it
//! is delegated to an [`AssetStore`]; the core knows nothing about the
//! transport behind it.

use crate::emitter::{GeneratedCode, emit_section};
use crate::model::CanvasTree;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Used when the section name is blank or sanitizes to nothing.
pub const DEFAULT_SECTION_NAME: &str = "custom-section";

/// Lowercase, collapse every run of non-alphanumerics into one hyphen, trim
/// hyphens from both ends. Empty results fall back to
/// [`DEFAULT_SECTION_NAME`].
pub fn sanitize_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        DEFAULT_SECTION_NAME.to_string()
    } else {
        slug
    }
}

// ─── Bundle ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportBundle {
    pub slug: String,
    pub markup: String,
    pub stylesheet: String,
}

impl ExportBundle {
    /// Generate code for `tree` and tag it with the slug of `section_name`.
    pub fn generate(tree: &CanvasTree, section_name: &str) -> Self {
        let GeneratedCode { markup, stylesheet } = emit_section(tree, section_name);
        Self {
            slug: sanitize_slug(section_name),
            markup,
            stylesheet,
        }
    }

    pub fn markup_path(&self) -> String {
        format!("sections/{}.liquid", self.slug)
    }

    pub fn stylesheet_path(&self) -> String {
        format!("assets/{}.css", self.slug)
    }
}

// ─── Asset store ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetStoreError {
    #[error("asset store rejected `{path}`: {reason}")]
    Rejected { path: String, reason: String },

    #[error("asset store unavailable: {0}")]
    Unavailable(String),
}

/// External persistence for generated files, keyed by container (theme) id
/// and path.
pub trait AssetStore {
    fn save(&mut self, container_id: &str, path: &str, content: &str) -> Result<(), AssetStoreError>;
}

/// Save the markup file, then the stylesheet. Stops at the first failure.
pub fn publish<S: AssetStore + ?Sized>(
    bundle: &ExportBundle,
    container_id: &str,
    store: &mut S,
) -> Result<(), AssetStoreError> {
    let markup_path = bundle.markup_path();
    store.save(container_id, &markup_path, &bundle.markup)?;
    log::debug!("saved {markup_path} to {container_id}");
    let stylesheet_path = bundle.stylesheet_path();
    store.save(container_id, &stylesheet_path, &bundle.stylesheet)?;
    log::debug!("saved {stylesheet_path} to {container_id}");
    Ok(())
}

/// In-memory store for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    pub files: BTreeMap<(String, String), String>,
    /// Paths that fail on save.
    pub reject: Vec<String>,
}

impl MemoryAssetStore {
    pub fn get(&self, container_id: &str, path: &str) -> Option<&str> {
        self.files
            .get(&(container_id.to_string(), path.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn save(&mut self, container_id: &str, path: &str, content: &str) -> Result<(), AssetStoreError> {
        if self.reject.iter().any(|p| p == path) {
            return Err(AssetStoreError::Rejected {
                path: path.to_string(),
                reason: "rejected by store".to_string(),
            });
        }
        self.files.insert(
            (container_id.to_string(), path.to_string()),
            content.to_string(),
        );
        Ok(())
    }
}
