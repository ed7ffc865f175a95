// ABOUTME: Main library module for the pattern library
// ABOUTME: Exports the preview template tags, the pattern catalog scanner and configuration

pub mod catalog;
pub mod config;
pub mod tags;
pub mod template;

// Re-export commonly used types
pub use catalog::{
    render_index, FileTemplateLoader, PatternCatalog, PatternScanner, TemplateHandle,
    TemplateLoader, PATTERN_TYPES,
};
pub use config::{init_logging, Config, LoggingConfig};
pub use tags::{pattern_library_tags, FixtureSource, PatternExtendsNode, PatternIncludeNode, StaticFixtures};
pub use template::{Context, Library, Node, TagParser, TemplateError, Token};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
