//! HTML reference pages for Sono libraries.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

pub mod model;
pub mod page;
pub mod render;

pub use model::Catalog;
pub use page::{PageOptions, assemble};
pub use render::{Page, render};

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

const BUNDLED_STDLIB: &str = include_str!("../data/stdlib.json");

/// Standard library metadata shipped with this crate.
pub fn bundled_catalog() -> Result<Catalog> {
    Ok(serde_json::from_str(BUNDLED_STDLIB)?)
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    debug!("Loading catalog from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Render a catalog straight to a full HTML document.
pub fn generate(catalog: &Catalog, options: &PageOptions) -> Result<String> {
    let page = render(catalog)?;
    Ok(assemble(&page, options))
}
