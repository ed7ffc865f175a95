// ABOUTME: Pattern library version of the include tag
// ABOUTME: Makes the included template's fixture context visible for the duration of the include

use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use super::fixtures::FixtureSource;
use crate::template::{
    construct_relative_path, token_kwargs, Context, Expression, Layer, Node, NodeKind, NodeList,
    Result, TagParser, TemplateError, Token, Variables,
};

/// Wraps the engine's inclusion node. In preview mode the included
/// template's fixtures are pushed for the nested render only, and never
/// shadow variables the including template already has.
pub struct PatternIncludeNode {
    inner: Box<dyn Node>,
    template: Expression,
    fixtures: Arc<dyn FixtureSource>,
}

impl PatternIncludeNode {
    pub fn new(inner: Box<dyn Node>, template: Expression, fixtures: Arc<dyn FixtureSource>) -> Self {
        Self {
            inner,
            template,
            fixtures,
        }
    }

    pub fn template(&self) -> &Expression {
        &self.template
    }
}

impl Node for PatternIncludeNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        if !context.is_pattern_library_view() {
            return self.inner.render(context);
        }

        let template_name = self.template.resolve_template_name(context);
        let fixture = match &template_name {
            Some(name) => self.fixtures.context_for_template(name)?.unwrap_or_default(),
            None => {
                debug!("Included template name {:?} did not resolve", self.template);
                Variables::new()
            }
        };

        let include_context: Variables = fixture
            .into_iter()
            .filter(|(key, _)| !context.contains_key(key))
            .collect();

        let template_name = template_name.unwrap_or_default();
        trace!(
            "Including '{}' with {} fixture variables",
            template_name,
            include_context.len()
        );

        let mut scope = context.push_scoped(Layer::fixture(&template_name, include_context));
        self.inner.render(&mut scope)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Include
    }

    fn child_nodelists(&self) -> Vec<&NodeList> {
        self.inner.child_nodelists()
    }
}

impl fmt::Debug for PatternIncludeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternIncludeNode")
            .field("inner", &self.inner)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// Compile `{% include "name.html" [with key=value ...] [only] %}` into a
/// `PatternIncludeNode`.
pub fn do_include(
    parser: &mut dyn TagParser,
    token: &Token,
    fixtures: Arc<dyn FixtureSource>,
) -> Result<Box<dyn Node>> {
    let bits = token.split_contents();
    let tag = token.tag_name();
    if bits.len() < 2 {
        return Err(TemplateError::syntax(format!(
            "'{}' tag takes at least one argument: the name of the template to be included.",
            tag
        )));
    }

    let mut seen = HashSet::new();
    let mut extra_context = IndexMap::new();
    let mut isolated_context = false;
    let mut remaining: VecDeque<String> = bits[2..].iter().cloned().collect();

    while let Some(option) = remaining.pop_front() {
        if !seen.insert(option.clone()) {
            return Err(TemplateError::syntax(format!(
                "The '{}' option was specified more than once.",
                option
            )));
        }

        match option.as_str() {
            "with" => {
                extra_context = token_kwargs(&mut remaining, &*parser)?;
                if extra_context.is_empty() {
                    return Err(TemplateError::syntax(format!(
                        "\"with\" in '{}' tag needs at least one keyword argument.",
                        tag
                    )));
                }
            }
            "only" => isolated_context = true,
            other => {
                return Err(TemplateError::syntax(format!(
                    "Unknown argument for '{}' tag: '{}'.",
                    tag, other
                )));
            }
        }
    }

    let template_bit = construct_relative_path(parser.origin_name(), &bits[1])?;
    let template = parser.compile_filter(&template_bit)?;
    let inner = parser.builtin_include(template.clone(), extra_context, isolated_context);
    Ok(Box::new(PatternIncludeNode::new(inner, template, fixtures)))
}
