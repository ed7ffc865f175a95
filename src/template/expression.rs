// ABOUTME: Compiled tag argument expressions and relative template name handling
// ABOUTME: Resolves constants and dotted variables against a render context

use serde_json::Value as JsonValue;

use super::context::Context;
use super::error::{Result, TemplateError};

/// A compiled tag argument: either a constant or a variable lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(JsonValue),
    Variable(String),
}

impl Expression {
    pub fn compile(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TemplateError::syntax("Empty expression"));
        }

        if let Some(literal) = unquote(token) {
            return Ok(Expression::Constant(JsonValue::String(literal)));
        }

        if token.contains('|') {
            return Err(TemplateError::syntax(format!(
                "Filters are not supported in tag arguments: '{}'",
                token
            )));
        }

        if let Ok(int) = token.parse::<i64>() {
            return Ok(Expression::Constant(JsonValue::from(int)));
        }
        if let Ok(float) = token.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Ok(Expression::Constant(JsonValue::Number(number)));
            }
        }

        let valid = token
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'));
        if !valid || token.starts_with('_') {
            return Err(TemplateError::syntax(format!(
                "Could not parse the remainder: '{}'",
                token
            )));
        }

        Ok(Expression::Variable(token.to_string()))
    }

    pub fn resolve(&self, context: &Context) -> Option<JsonValue> {
        match self {
            Expression::Constant(value) => Some(value.clone()),
            Expression::Variable(path) => context.lookup(path).cloned(),
        }
    }

    /// Resolve to a template identifier, if the expression yields a string
    pub fn resolve_template_name(&self, context: &Context) -> Option<String> {
        match self.resolve(context)? {
            JsonValue::String(name) => Some(name),
            _ => None,
        }
    }
}

fn unquote(token: &str) -> Option<String> {
    let first = token.chars().next()?;
    if token.len() < 2 || !(first == '"' || first == '\'') || !token.ends_with(first) {
        return None;
    }

    let inner = &token[1..token.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// Turn a `./` or `../` template reference into a name relative to the
/// template the tag appears in. Other references are returned unchanged.
pub fn construct_relative_path(current_template_name: Option<&str>, relative_name: &str) -> Result<String> {
    let quote = relative_name
        .chars()
        .next()
        .filter(|c| (*c == '"' || *c == '\'') && relative_name.len() >= 2 && relative_name.ends_with(*c));
    let new_name = match quote {
        Some(q) => relative_name.trim_matches(q),
        None => relative_name,
    };

    if !(new_name.starts_with("./") || new_name.starts_with("../")) {
        return Ok(relative_name.to_string());
    }

    let Some(current) = current_template_name else {
        return Ok(relative_name.to_string());
    };
    let current = current.trim_start_matches('/');

    let directory = match current.rfind('/') {
        Some(idx) => &current[..idx],
        None => "",
    };

    let mut parts: Vec<&str> = Vec::new();
    let mut escaped = false;
    for part in directory.split('/').chain(new_name.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    escaped = true;
                }
            }
            other => parts.push(other),
        }
    }
    let normalized = parts.join("/");

    if escaped {
        return Err(TemplateError::syntax(format!(
            "The relative path '{}' points outside the file hierarchy that template '{}' is in.",
            relative_name, current
        )));
    }
    if normalized == current {
        return Err(TemplateError::syntax(format!(
            "The relative path '{}' was translated to template name '{}', the same template in which the tag appears.",
            relative_name, current
        )));
    }

    Ok(match quote {
        Some(q) => format!("{q}{normalized}{q}"),
        None => normalized,
    })
}
