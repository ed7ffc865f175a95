// ABOUTME: Fixture context sources for pattern library previews
// ABOUTME: Maps a template identifier to the mock variables used when previewing it

use indexmap::IndexMap;

use crate::template::{Result, Variables};

/// Supplies fixture variables for a template.
///
/// `Ok(None)` and an empty map both mean "nothing to inject".
pub trait FixtureSource {
    fn context_for_template(&self, template_name: &str) -> Result<Option<Variables>>;
}

impl<F> FixtureSource for F
where
    F: Fn(&str) -> Option<Variables>,
{
    fn context_for_template(&self, template_name: &str) -> Result<Option<Variables>> {
        Ok(self(template_name))
    }
}

/// In-memory fixtures keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct StaticFixtures {
    fixtures: IndexMap<String, Variables>,
}

impl StaticFixtures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture(mut self, template_name: &str, variables: Variables) -> Self {
        self.insert(template_name, variables);
        self
    }

    pub fn insert(&mut self, template_name: &str, variables: Variables) {
        self.fixtures.insert(template_name.to_string(), variables);
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

impl FixtureSource for StaticFixtures {
    fn context_for_template(&self, template_name: &str) -> Result<Option<Variables>> {
        Ok(self.fixtures.get(template_name).cloned())
    }
}
