// ABOUTME: Template loading seam used by the pattern catalog
// ABOUTME: Provides the TemplateLoader trait and a filesystem loader returning template handles

use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::LoadError;

/// Loads a template by its name relative to the lookup directory.
pub trait TemplateLoader {
    type Template;

    fn get_template(&self, name: &str) -> Result<Self::Template, LoadError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateHandle {
    pub name: String,
    pub origin: PathBuf,
    #[serde(skip)]
    pub source: String,
}

/// Reads templates from a single root directory.
#[derive(Debug, Clone)]
pub struct FileTemplateLoader {
    root: PathBuf,
}

impl FileTemplateLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLoader for FileTemplateLoader {
    type Template = TemplateHandle;

    fn get_template(&self, name: &str) -> Result<TemplateHandle, LoadError> {
        let origin = self.root.join(name);
        if origin.is_dir() {
            return Err(LoadError::NotFound(name.to_string()));
        }

        match fs::read_to_string(&origin) {
            Ok(source) => Ok(TemplateHandle {
                name: name.to_string(),
                origin,
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LoadError::NotFound(name.to_string())),
            Err(e) => Err(LoadError::Io {
                name: name.to_string(),
                source: e,
            }),
        }
    }
}
