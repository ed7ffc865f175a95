// ABOUTME: Pattern library version of the extends tag
// ABOUTME: Layers the parent template's fixture context beneath the local context in preview mode

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use super::fixtures::FixtureSource;
use crate::template::{
    construct_relative_path, Context, Expression, Layer, LayerOrigin, Node, NodeKind, NodeList,
    Result, TagParser, TemplateError, Token, Variables,
};

/// Wraps the engine's inheritance node. Outside pattern library previews it
/// renders exactly like the wrapped node.
pub struct PatternExtendsNode {
    inner: Box<dyn Node>,
    parent_name: Expression,
    fixtures: Arc<dyn FixtureSource>,
}

impl PatternExtendsNode {
    pub fn new(inner: Box<dyn Node>, parent_name: Expression, fixtures: Arc<dyn FixtureSource>) -> Self {
        Self {
            inner,
            parent_name,
            fixtures,
        }
    }

    pub fn parent_name(&self) -> &Expression {
        &self.parent_name
    }

    /// Fixture variables for the parent, minus keys a more derived
    /// template's fixtures already provide.
    fn parent_fixtures(&self, parent_name: &str, context: &Context) -> Result<Variables> {
        let fixture = self
            .fixtures
            .context_for_template(parent_name)?
            .unwrap_or_default();

        let derived: HashSet<&String> = context.fixture_keys().collect();
        Ok(fixture
            .into_iter()
            .filter(|(key, _)| !derived.contains(key))
            .collect())
    }

    /// Take the parent's fixture layer back off the stack, keeping the
    /// restored local layer on top.
    fn remove_fixture_layer(parent_name: &str, restored: bool, context: &mut Context) {
        let is_fixture_layer =
            |layer: &Layer| matches!(&layer.origin, LayerOrigin::Fixture(name) if name == parent_name);

        let top = if restored { context.pop().ok() } else { None };
        let top = match top {
            Some(layer) if is_fixture_layer(&layer) => {
                debug!(
                    "Local layer above fixture context for '{}' was popped during render",
                    parent_name
                );
                None
            }
            other => other,
        };

        match context.pop() {
            Ok(layer) if is_fixture_layer(&layer) => {}
            Ok(layer) => {
                debug!(
                    "Expected fixture layer for '{}' but found {:?} layer; context stack is unbalanced",
                    parent_name, layer.origin
                );
                context.push(layer);
                context.remove_fixture(parent_name);
            }
            Err(_) => debug!("Fixture layer for '{}' was already removed", parent_name),
        }

        if let Some(layer) = top {
            context.push(layer);
        }
    }
}

impl Node for PatternExtendsNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        if !context.is_pattern_library_view() {
            return self.inner.render(context);
        }

        let Some(parent_name) = self.parent_name.resolve_template_name(context) else {
            debug!("Parent template name {:?} did not resolve", self.parent_name);
            return self.inner.render(context);
        };

        let fixture = self.parent_fixtures(&parent_name, context)?;
        if fixture.is_empty() {
            trace!("No fixture context for parent template '{}'", parent_name);
            return self.inner.render(context);
        }

        debug!(
            "Injecting {} fixture variables for parent template '{}'",
            fixture.len(),
            parent_name
        );

        // The fixture layer goes underneath the most recent layer so that
        // variables set by the current template still win.
        let preserved = match context.pop() {
            Ok(layer) => Some(layer),
            Err(_) => {
                trace!("No local layer to preserve above fixture context");
                None
            }
        };
        let restored = preserved.is_some();

        context.push(Layer::fixture(&parent_name, fixture));
        if let Some(layer) = preserved {
            context.push(layer);
        }

        let rendered = self.inner.render(context);
        Self::remove_fixture_layer(&parent_name, restored, context);
        rendered
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Extends
    }

    fn child_nodelists(&self) -> Vec<&NodeList> {
        self.inner.child_nodelists()
    }
}

impl fmt::Debug for PatternExtendsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternExtendsNode")
            .field("inner", &self.inner)
            .field("parent_name", &self.parent_name)
            .finish_non_exhaustive()
    }
}

/// Compile `{% extends "parent.html" %}` into a `PatternExtendsNode`.
pub fn do_extends(
    parser: &mut dyn TagParser,
    token: &Token,
    fixtures: Arc<dyn FixtureSource>,
) -> Result<Box<dyn Node>> {
    let mut bits = token.split_contents();
    if bits.len() != 2 {
        return Err(TemplateError::syntax(format!(
            "'{}' takes one argument",
            token.tag_name()
        )));
    }

    bits[1] = construct_relative_path(parser.origin_name(), &bits[1])?;
    let parent_name = parser.compile_filter(&bits[1])?;
    let nodelist = parser.parse()?;

    if nodelist.contains_kind(NodeKind::Extends) {
        return Err(TemplateError::syntax(format!(
            "'{}' cannot appear more than once in the same template",
            bits[0]
        )));
    }

    let inner = parser.builtin_extends(nodelist, parent_name.clone());
    Ok(Box::new(PatternExtendsNode::new(inner, parent_name, fixtures)))
}
