// ABOUTME: Error types for template engine integration
// ABOUTME: Defines syntax, context and render errors raised by nodes and tag compilers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error: {0}")]
    SyntaxError(String),

    #[error("Template render error: {0}")]
    RenderError(String),

    #[error("Context error: {0}")]
    ContextError(#[from] ContextError),

    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl TemplateError {
    pub fn syntax(message: impl Into<String>) -> Self {
        TemplateError::SyntaxError(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("pop() has been called more times than push()")]
    PopEmpty,
}

pub type Result<T> = std::result::Result<T, TemplateError>;
