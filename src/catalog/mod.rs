// ABOUTME: Pattern catalog module
// ABOUTME: Discovers pattern templates by type and subtype and renders a navigable index

pub mod error;
pub mod index;
pub mod loader;
pub mod scanner;

pub use error::{CatalogError, LoadError, Result};
pub use index::{render_index, PatternIndex};
pub use loader::{FileTemplateLoader, TemplateHandle, TemplateLoader};
pub use scanner::{
    PatternCatalog, PatternScanner, PATTERNS_DIR, PATTERN_TEMPLATE_SUFFIX, PATTERN_TYPES,
};
