// ABOUTME: Pattern catalog discovery under the patterns directory
// ABOUTME: Walks each pattern type directory and groups template handles by subtype

use indexmap::IndexMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::error::{CatalogError, LoadError, Result};
use super::loader::TemplateLoader;
use crate::config::Config;

/// Pattern types in display order.
pub const PATTERN_TYPES: [&str; 5] = ["atoms", "molecules", "organisms", "templates", "pages"];

pub const PATTERN_TEMPLATE_SUFFIX: &str = ".html";

/// Directory under the base lookup directory that holds all patterns.
pub const PATTERNS_DIR: &str = "patterns";

/// pattern type -> subtype -> templates
pub type PatternCatalog<T> = IndexMap<&'static str, IndexMap<String, Vec<T>>>;

#[derive(Debug, Clone)]
pub struct PatternScanner<L> {
    base_lookup_dir: PathBuf,
    loader: L,
}

impl<L: TemplateLoader> PatternScanner<L> {
    pub fn new<P: AsRef<Path>>(base_lookup_dir: P, loader: L) -> Self {
        Self {
            base_lookup_dir: base_lookup_dir.as_ref().to_path_buf(),
            loader,
        }
    }

    pub fn from_config(config: &Config, loader: L) -> Self {
        Self::new(config.base_lookup_dir(), loader)
    }

    pub fn base_lookup_dir(&self) -> &Path {
        &self.base_lookup_dir
    }

    /// Build the catalog of pattern templates.
    ///
    /// Every pattern type is present in the result. Only files inside a
    /// subtype directory are considered; files placed directly in a pattern
    /// type directory, and files without the template suffix, are ignored.
    /// Templates the loader cannot find are skipped.
    pub fn get_pattern_templates(&self) -> Result<PatternCatalog<L::Template>> {
        let lookup_dir = self.base_lookup_dir.join(PATTERNS_DIR);
        let mut templates: PatternCatalog<L::Template> = IndexMap::new();

        for pattern_type in PATTERN_TYPES {
            let subtypes = templates.entry(pattern_type).or_default();
            let pattern_type_path = lookup_dir.join(pattern_type);

            if !pattern_type_path.is_dir() {
                debug!("No pattern directory at {}", pattern_type_path.display());
                continue;
            }

            for entry in WalkDir::new(&pattern_type_path)
                .min_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|source| CatalogError::Walk {
                    path: pattern_type_path.clone(),
                    source,
                })?;
                if !entry.file_type().is_dir() {
                    continue;
                }

                let files = list_files(entry.path())?;
                if files.is_empty() {
                    continue;
                }

                let pattern_subtype = relative_name(entry.path(), &pattern_type_path);
                let handles = subtypes.entry(pattern_subtype).or_default();

                for file in files {
                    let pattern_path = relative_name(&file, &self.base_lookup_dir);
                    if !pattern_path.ends_with(PATTERN_TEMPLATE_SUFFIX) {
                        continue;
                    }

                    match self.loader.get_template(&pattern_path) {
                        Ok(template) => handles.push(template),
                        Err(LoadError::NotFound(name)) => {
                            debug!("Skipping pattern template that does not exist: {}", name);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        let total: usize = templates
            .values()
            .flat_map(|subtypes| subtypes.values())
            .map(Vec::len)
            .sum();
        info!(
            "Found {} pattern templates under {}",
            total,
            lookup_dir.display()
        );

        Ok(templates)
    }
}

/// Non-directory entries directly inside `dir`, sorted by file name
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(CatalogError::IoError)? {
        let path = entry.map_err(CatalogError::IoError)?.path();
        if !path.is_dir() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `path` relative to `base`, joined with `/`
fn relative_name(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
