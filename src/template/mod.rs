// ABOUTME: Template engine seams used by the pattern library tags
// ABOUTME: Provides the render context, node trait, tag tokens and the tag registration library

pub mod context;
pub mod error;
pub mod expression;
pub mod library;
pub mod node;
pub mod token;

pub use context::{Context, ContextGuard, Layer, LayerOrigin, Variables, PATTERN_LIBRARY_VIEW_FLAG};
pub use error::{ContextError, Result, TemplateError};
pub use expression::{construct_relative_path, Expression};
pub use library::{Library, TagCompiler, TagParser};
pub use node::{Node, NodeKind, NodeList};
pub use token::{token_kwargs, Token};
