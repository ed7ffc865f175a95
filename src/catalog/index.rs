// ABOUTME: Navigable index of the pattern catalog rendered with Handlebars
// ABOUTME: Lists pattern types, their subtypes and the templates found in each

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use super::error::Result;
use super::scanner::PatternCatalog;

const INDEX_TEMPLATE_NAME: &str = "pattern_index";

const DEFAULT_INDEX_TEMPLATE: &str = r#"<nav class="pattern-library">
{{#each catalog}}
<section class="pattern-type">
<h2>{{@key}}</h2>
{{#each this}}
<h3>{{@key}}</h3>
<ul>
{{#each this}}
<li><a href="{{@root.base_url}}{{name}}">{{name}}</a></li>
{{/each}}
</ul>
{{/each}}
</section>
{{/each}}
</nav>
"#;

pub struct PatternIndex {
    handlebars: Handlebars<'static>,
    base_url: String,
}

impl PatternIndex {
    pub fn new() -> Result<Self> {
        Self::with_template(DEFAULT_INDEX_TEMPLATE)
    }

    /// Use a custom index template; it receives `catalog` and `base_url`
    pub fn with_template(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_template_string(INDEX_TEMPLATE_NAME, template)?;

        Ok(Self {
            handlebars,
            base_url: String::new(),
        })
    }

    /// Prefix for pattern links
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn render<T: Serialize>(&self, catalog: &PatternCatalog<T>) -> Result<String> {
        let data = json!({
            "catalog": catalog,
            "base_url": self.base_url,
        });
        Ok(self.handlebars.render(INDEX_TEMPLATE_NAME, &data)?)
    }
}

/// Render `catalog` with the default index template
pub fn render_index<T: Serialize>(catalog: &PatternCatalog<T>) -> Result<String> {
    PatternIndex::new()?.render(catalog)
}
