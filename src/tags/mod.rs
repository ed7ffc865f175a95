// ABOUTME: Pattern library template tags
// ABOUTME: Registers extends and include overrides that inject fixture context in preview mode

pub mod extends;
pub mod fixtures;
pub mod include;

use std::sync::Arc;

use crate::template::Library;

pub use extends::{do_extends, PatternExtendsNode};
pub use fixtures::{FixtureSource, StaticFixtures};
pub use include::{do_include, PatternIncludeNode};

/// Register the `extends` and `include` overrides on `library`
pub fn register(library: &mut Library, fixtures: Arc<dyn FixtureSource>) {
    let extends_fixtures = Arc::clone(&fixtures);
    library.tag("extends", move |parser, token| {
        do_extends(parser, token, Arc::clone(&extends_fixtures))
    });
    library.tag("include", move |parser, token| {
        do_include(parser, token, Arc::clone(&fixtures))
    });
}

/// A library holding only the pattern library tags
pub fn pattern_library_tags(fixtures: Arc<dyn FixtureSource>) -> Library {
    let mut library = Library::new();
    register(&mut library, fixtures);
    library
}
