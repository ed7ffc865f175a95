// ABOUTME: Error types for pattern catalog scanning and index rendering
// ABOUTME: Separates missing templates, which are skipped, from fatal I/O failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Template does not exist: {0}")]
    NotFound(String),

    #[error("Failed to read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to walk pattern directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template load error: {0}")]
    LoadError(#[from] LoadError),

    #[error("Index template error: {0}")]
    IndexTemplate(#[from] handlebars::TemplateError),

    #[error("Index render error: {0}")]
    IndexRender(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
