use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::PlaceholderStyle;

/// TemplateList names every template in one directory
#[derive(Debug, Clone, Serialize)]
pub struct TemplateList {
    pub templates: Vec<String>,
}

/// TemplatePlaceholders lists the fields a template expects
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePlaceholders {
    pub template: String,
    pub style: PlaceholderStyle,
    pub placeholders: Vec<String>,
}

/// BundleRequest renders backup-system snippets for a new device
#[derive(Debug, Clone, Deserialize)]
pub struct BundleRequest {
    pub template_principal: String,
    #[serde(default)]
    pub template_secundario: Option<String>,
    #[serde(default)]
    pub dados: Map<String, Value>,
}

/// BundleResponse carries the joined snippets and the inventory group they belong to
#[derive(Debug, Clone, Serialize)]
pub struct BundleResponse {
    pub preview: String,
    pub grupo: String,
}
