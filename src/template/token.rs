// ABOUTME: Block tag tokens and argument splitting
// ABOUTME: Splits tag contents on whitespace while keeping quoted strings and keyword arguments intact

use indexmap::IndexMap;
use std::collections::VecDeque;

use super::error::Result;
use super::expression::Expression;
use super::library::TagParser;

/// The contents of one `{% ... %}` block, without the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub contents: String,
}

impl Token {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    /// Split on whitespace, keeping quoted sections (with escapes) in one bit
    pub fn split_contents(&self) -> Vec<String> {
        let mut bits = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;
        let mut chars = self.contents.trim().chars();

        while let Some(c) = chars.next() {
            match quote {
                Some(q) => {
                    current.push(c);
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            current.push(escaped);
                        }
                    } else if c == q {
                        quote = None;
                    }
                }
                None if c == '"' || c == '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                None if c.is_whitespace() => {
                    if !current.is_empty() {
                        bits.push(std::mem::take(&mut current));
                    }
                }
                None => current.push(c),
            }
        }

        if !current.is_empty() {
            bits.push(current);
        }
        bits
    }

    /// Tag name, i.e. the first bit
    pub fn tag_name(&self) -> &str {
        self.contents.split_whitespace().next().unwrap_or("")
    }
}

fn split_kwarg(bit: &str) -> Option<(&str, &str)> {
    let (key, value) = bit.split_once('=')?;
    let is_word = !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_');
    if is_word && !value.is_empty() {
        Some((key, value))
    } else {
        None
    }
}

/// Consume leading `key=value` bits, compiling each value with the parser.
/// Stops at the first bit that is not a keyword argument.
pub fn token_kwargs(
    bits: &mut VecDeque<String>,
    parser: &dyn TagParser,
) -> Result<IndexMap<String, Expression>> {
    let mut kwargs = IndexMap::new();

    while let Some(bit) = bits.front() {
        let Some((key, value)) = split_kwarg(bit) else {
            break;
        };
        let expression = parser.compile_filter(value)?;
        kwargs.insert(key.to_string(), expression);
        bits.pop_front();
    }

    Ok(kwargs)
}
