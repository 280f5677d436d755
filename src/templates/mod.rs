use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::GenError;

/// Read-only lookup of template text by base filename.
pub trait TemplateSource {
    /// Load a template. Only the base filename component of `name` is used.
    fn load(&self, name: &str) -> Result<String, GenError>;

    /// Names of all available templates, sorted.
    fn names(&self) -> Vec<String>;
}

/// Reduce a requested template name to its base filename component.
///
/// `"../../etc/passwd"` becomes `"passwd"`; names with no usable component
/// (`""`, `"."`, `".."`, `"dir/"`) give `None`.
pub fn base_name(name: &str) -> Option<&str> {
    let base = name.trim().rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base),
    }
}

/// Templates stored as files directly under one directory.
/// Files are read on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn load(&self, name: &str) -> Result<String, GenError> {
        let base = base_name(name).ok_or_else(|| GenError::TemplateNotFound(name.to_string()))?;
        let path = self.root.join(base);

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loaded template {}", path.display());
                Ok(content)
            }
            Err(e) => {
                tracing::warn!("Template {} unavailable: {}", path.display(), e);
                Err(GenError::TemplateNotFound(base.to_string()))
            }
        }
    }

    fn names(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list templates in {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }
}

/// In-memory templates, keyed by base filename.
impl TemplateSource for HashMap<String, String> {
    fn load(&self, name: &str) -> Result<String, GenError> {
        base_name(name)
            .and_then(|base| self.get(base))
            .cloned()
            .ok_or_else(|| GenError::TemplateNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}
