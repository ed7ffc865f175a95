// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides a minimal host engine with default extends/include nodes and a token-stream parser

#![allow(dead_code)]

use indexmap::IndexMap;
use serde_json::{json, Value as JsonValue};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use pattern_library::template::{
    token_kwargs, Context, Expression, Layer, Library, Node, NodeKind, NodeList, Result,
    TagParser, TemplateError, Token, Variables,
};

/// Template name -> the template's source as a list of tag contents.
pub type HostTemplates = Rc<HashMap<String, Vec<String>>>;

/// Build host templates that only print variables, from
/// `(name, "space separated variables")` pairs
pub fn host_templates(entries: &[(&str, &str)]) -> HostTemplates {
    Rc::new(
        entries
            .iter()
            .map(|(name, keys)| {
                (
                    name.to_string(),
                    keys.split_whitespace().map(|key| format!("var {}", key)).collect(),
                )
            })
            .collect(),
    )
}

/// Build host templates from `(name, tags)` pairs
pub fn host_sources(entries: &[(&str, Vec<&str>)]) -> HostTemplates {
    Rc::new(
        entries
            .iter()
            .map(|(name, tags)| {
                (
                    name.to_string(),
                    tags.iter().map(|tag| tag.to_string()).collect(),
                )
            })
            .collect(),
    )
}

pub fn vars(value: JsonValue) -> Variables {
    value.as_object().cloned().expect("expected a JSON object")
}

fn print_variables(keys: &[String], context: &Context) -> String {
    keys.iter()
        .map(|key| {
            let value = match context.get(key) {
                Some(JsonValue::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "-".to_string(),
            };
            format!("{}={};", key, value)
        })
        .collect()
}

/// Compile the named host template with `library` and render it
fn render_template(
    name: &str,
    library: &Rc<Library>,
    templates: &HostTemplates,
    context: &mut Context,
) -> Result<String> {
    let source = templates
        .get(name)
        .ok_or_else(|| TemplateError::RenderError(format!("TemplateDoesNotExist: {}", name)))?;
    let tags: Vec<&str> = source.iter().map(String::as_str).collect();
    let nodelist =
        HostParser::new(name, &tags, Rc::clone(library), Rc::clone(templates)).parse()?;
    nodelist.render(context)
}

/// Stand-in for the engine's inheritance node: renders the child's own
/// nodes, then the parent template, which may itself extend another.
pub struct HostExtendsNode {
    nodelist: NodeList,
    parent_name: Expression,
    library: Rc<Library>,
    templates: HostTemplates,
}

impl std::fmt::Debug for HostExtendsNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostExtendsNode")
            .field("nodelist", &self.nodelist)
            .field("parent_name", &self.parent_name)
            .finish_non_exhaustive()
    }
}

impl Node for HostExtendsNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        let name = self
            .parent_name
            .resolve_template_name(context)
            .ok_or_else(|| TemplateError::RenderError("Invalid parent template name".to_string()))?;

        let mut output = self.nodelist.render(context)?;
        output.push_str(&format!("[{}]", name));
        output.push_str(&render_template(
            &name,
            &self.library,
            &self.templates,
            context,
        )?);
        Ok(output)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Extends
    }

    fn child_nodelists(&self) -> Vec<&NodeList> {
        vec![&self.nodelist]
    }
}

/// Stand-in for the engine's inclusion node.
pub struct HostIncludeNode {
    template: Expression,
    extra_context: IndexMap<String, Expression>,
    isolated_context: bool,
    library: Rc<Library>,
    templates: HostTemplates,
}

impl std::fmt::Debug for HostIncludeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostIncludeNode")
            .field("template", &self.template)
            .field("isolated_context", &self.isolated_context)
            .finish_non_exhaustive()
    }
}

impl Node for HostIncludeNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        let name = self
            .template
            .resolve_template_name(context)
            .ok_or_else(|| TemplateError::RenderError("Invalid template name".to_string()))?;
        if !self.templates.contains_key(&name) {
            return Err(TemplateError::RenderError(format!(
                "TemplateDoesNotExist: {}",
                name
            )));
        }

        let mut values = Variables::new();
        for (key, expression) in &self.extra_context {
            values.insert(
                key.clone(),
                expression.resolve(context).unwrap_or(JsonValue::Null),
            );
        }

        if self.isolated_context {
            let mut isolated = Context::new(values);
            let body = render_template(&name, &self.library, &self.templates, &mut isolated)?;
            return Ok(format!("<{}>{}", name, body));
        }

        context.push(Layer::new(values));
        let body = render_template(&name, &self.library, &self.templates, context);
        context.pop()?;
        Ok(format!("<{}>{}", name, body?))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Include
    }
}

/// Prints one variable; used as ordinary template content.
#[derive(Debug)]
pub struct VariableNode(pub String);

impl Node for VariableNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        Ok(print_variables(std::slice::from_ref(&self.0), context))
    }
}

/// Sets a variable on the most recent layer.
#[derive(Debug)]
pub struct SetNode(pub String, pub JsonValue);

impl Node for SetNode {
    fn render(&self, context: &mut Context) -> Result<String> {
        context.set(self.0.clone(), self.1.clone());
        Ok(String::new())
    }
}

/// Parses a template given as a list of tag contents. `var x` and
/// `set x=v` are handled directly, everything else goes to the library.
pub struct HostParser {
    origin: Option<String>,
    pending: VecDeque<Token>,
    library: Rc<Library>,
    templates: HostTemplates,
}

impl HostParser {
    pub fn new(origin: &str, tags: &[&str], library: Rc<Library>, templates: HostTemplates) -> Self {
        Self {
            origin: Some(origin.to_string()),
            pending: tags.iter().map(|t| Token::new(*t)).collect(),
            library,
            templates,
        }
    }
}

impl TagParser for HostParser {
    fn origin_name(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    fn parse(&mut self) -> Result<NodeList> {
        let mut nodes = NodeList::default();
        while let Some(token) = self.pending.pop_front() {
            let bits = token.split_contents();
            match bits.first().map(String::as_str) {
                Some("var") => nodes.push(Box::new(VariableNode(bits[1].clone()))),
                Some("set") => {
                    let (key, value) = bits[1].split_once('=').unwrap();
                    nodes.push(Box::new(SetNode(key.to_string(), json!(value))));
                }
                _ => {
                    let library = Rc::clone(&self.library);
                    nodes.push(library.compile(self, &token)?);
                }
            }
        }
        Ok(nodes)
    }

    fn builtin_extends(&self, nodelist: NodeList, parent_name: Expression) -> Box<dyn Node> {
        Box::new(HostExtendsNode {
            nodelist,
            parent_name,
            library: Rc::clone(&self.library),
            templates: Rc::clone(&self.templates),
        })
    }

    fn builtin_include(
        &self,
        template: Expression,
        extra_context: IndexMap<String, Expression>,
        isolated_context: bool,
    ) -> Box<dyn Node> {
        Box::new(HostIncludeNode {
            template,
            extra_context,
            isolated_context,
            library: Rc::clone(&self.library),
            templates: Rc::clone(&self.templates),
        })
    }
}

/// The engine's own tags, without any fixture injection.
pub fn builtin_library() -> Library {
    let mut library = Library::new();
    library.tag("extends", |parser, token| {
        let bits = token.split_contents();
        let parent_name = parser.compile_filter(&bits[1])?;
        let nodelist = parser.parse()?;
        Ok(parser.builtin_extends(nodelist, parent_name))
    });
    library.tag("include", |parser, token| {
        let bits = token.split_contents();
        let template = parser.compile_filter(&bits[1])?;
        let mut remaining: VecDeque<String> = bits[2..].iter().cloned().collect();
        let mut extra_context = IndexMap::new();
        let mut isolated_context = false;
        while let Some(option) = remaining.pop_front() {
            if option == "with" {
                extra_context = token_kwargs(&mut remaining, &*parser)?;
            } else {
                isolated_context = true;
            }
        }
        Ok(parser.builtin_include(template, extra_context, isolated_context))
    });
    library
}

/// Compile a template given as tag contents
pub fn compile(
    library: Library,
    origin: &str,
    tags: &[&str],
    templates: &HostTemplates,
) -> Result<NodeList> {
    let mut parser = HostParser::new(origin, tags, Rc::new(library), Rc::clone(templates));
    parser.parse()
}

/// Create a file at `relative` under `root`, creating parent directories
pub fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("<!-- {} -->", relative)).unwrap();
}
