// ABOUTME: Layered render context shared by template nodes during one render
// ABOUTME: Provides push/pop scoping, scoped guards and the pattern library view flag

use serde_json::{Map, Value as JsonValue};
use std::ops::{Deref, DerefMut};

use super::error::ContextError;

/// Context key that marks a render as an isolated pattern library preview.
pub const PATTERN_LIBRARY_VIEW_FLAG: &str = "__pattern_library_view";

pub type Variables = Map<String, JsonValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOrigin {
    /// Engine-provided bottom layer; never popped
    Builtins,
    Local,
    /// Fixture data injected for the named template
    Fixture(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub variables: Variables,
    pub origin: LayerOrigin,
}

impl Layer {
    pub fn new(variables: Variables) -> Self {
        Self {
            variables,
            origin: LayerOrigin::Local,
        }
    }

    pub fn fixture(template_name: &str, variables: Variables) -> Self {
        Self {
            variables,
            origin: LayerOrigin::Fixture(template_name.to_string()),
        }
    }

    fn builtins() -> Self {
        Self {
            variables: Variables::new(),
            origin: LayerOrigin::Builtins,
        }
    }

    pub fn is_fixture(&self) -> bool {
        matches!(self.origin, LayerOrigin::Fixture(_))
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(Variables::new())
    }
}

/// Stack of variable layers. Lookups search from the most recently pushed
/// layer down to the builtins layer, which is never popped. The caller's
/// variables sit in their own layer above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    layers: Vec<Layer>,
}

impl Context {
    /// Create a context holding `variables` in a layer above the builtins
    pub fn new(variables: Variables) -> Self {
        Self {
            layers: vec![Layer::builtins(), Layer::new(variables)],
        }
    }

    /// Create a context with the pattern library view flag set
    pub fn for_pattern_library(mut variables: Variables) -> Self {
        variables.insert(PATTERN_LIBRARY_VIEW_FLAG.to_string(), JsonValue::Bool(true));
        Self::new(variables)
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Remove the most recent layer. The builtins layer is never removed.
    pub fn pop(&mut self) -> std::result::Result<Layer, ContextError> {
        if self.layers.len() <= 1 {
            return Err(ContextError::PopEmpty);
        }
        self.layers.pop().ok_or(ContextError::PopEmpty)
    }

    /// Push a layer that is popped again when the returned guard is dropped
    pub fn push_scoped(&mut self, layer: Layer) -> ContextGuard<'_> {
        self.push(layer);
        ContextGuard { context: self }
    }

    /// Remove the most recent fixture layer injected for `template_name`
    pub fn remove_fixture(&mut self, template_name: &str) -> Option<Layer> {
        let index = self.layers.iter().rposition(|layer| {
            matches!(&layer.origin, LayerOrigin::Fixture(name) if name == template_name)
        })?;
        Some(self.layers.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.variables.get(key))
    }

    /// Resolve a dotted lookup such as `page.title`
    pub fn lookup(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = match current {
                JsonValue::Object(map) => map.get(part)?,
                JsonValue::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.variables.contains_key(key))
    }

    pub fn set(&mut self, key: impl Into<String>, value: JsonValue) {
        if let Some(top) = self.layers.last_mut() {
            top.variables.insert(key.into(), value);
        }
    }

    pub fn is_pattern_library_view(&self) -> bool {
        self.get(PATTERN_LIBRARY_VIEW_FLAG).is_some_and(is_truthy)
    }

    /// Keys contributed by fixture layers currently on the stack
    pub fn fixture_keys(&self) -> impl Iterator<Item = &String> {
        self.layers
            .iter()
            .filter(|layer| layer.is_fixture())
            .flat_map(|layer| layer.variables.keys())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Merge all layers into one map, later layers winning
    pub fn flatten(&self) -> Variables {
        let mut merged = Variables::new();
        for layer in &self.layers {
            for (key, value) in &layer.variables {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Variables::new())
    }
}

/// Pops its layer on drop, whether the scope ends normally or by `?`.
#[derive(Debug)]
pub struct ContextGuard<'a> {
    context: &'a mut Context,
}

impl Deref for ContextGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.context
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        let _ = self.context.pop();
    }
}

/// Python-style truthiness for context values
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    }
}
