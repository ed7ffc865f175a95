// ABOUTME: Tag parser seam and tag registration library
// ABOUTME: Lets the host engine look up tag compilers by name and build default nodes

use indexmap::IndexMap;
use std::fmt;

use super::error::{Result, TemplateError};
use super::expression::Expression;
use super::node::{Node, NodeList};
use super::token::Token;

/// The host engine's parser, as seen by a tag compiler.
pub trait TagParser {
    /// Name of the template being parsed, if known
    fn origin_name(&self) -> Option<&str>;

    fn compile_filter(&self, token: &str) -> Result<Expression> {
        Expression::compile(token)
    }

    /// Parse the remainder of the template
    fn parse(&mut self) -> Result<NodeList>;

    /// The engine's default inheritance node
    fn builtin_extends(&self, nodelist: NodeList, parent_name: Expression) -> Box<dyn Node>;

    /// The engine's default inclusion node
    fn builtin_include(
        &self,
        template: Expression,
        extra_context: IndexMap<String, Expression>,
        isolated_context: bool,
    ) -> Box<dyn Node>;
}

pub type TagCompiler = Box<dyn Fn(&mut dyn TagParser, &Token) -> Result<Box<dyn Node>>>;

#[derive(Default)]
pub struct Library {
    tags: IndexMap<String, TagCompiler>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag compiler, replacing any previous one with the same name
    pub fn tag<F>(&mut self, name: &str, compiler: F) -> &mut Self
    where
        F: Fn(&mut dyn TagParser, &Token) -> Result<Box<dyn Node>> + 'static,
    {
        self.tags.insert(name.to_string(), Box::new(compiler));
        self
    }

    pub fn get(&self, name: &str) -> Option<&TagCompiler> {
        self.tags.get(name)
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Compile `token` with the compiler registered for its tag name
    pub fn compile(&self, parser: &mut dyn TagParser, token: &Token) -> Result<Box<dyn Node>> {
        let name = token.tag_name();
        let compiler = self.get(name).ok_or_else(|| {
            TemplateError::syntax(format!("Invalid block tag: '{}'", name))
        })?;
        compiler(parser, token)
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .finish()
    }
}
