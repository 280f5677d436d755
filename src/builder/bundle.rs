use crate::error::GenError;
use crate::models::FieldMap;
use crate::render;
use crate::templates::TemplateSource;

/// Line placed between the rendered parts of a bundle.
pub const BUNDLE_SEPARATOR: &str = "\n---END_OF_CONFIG---\n";

/// Backup-system values are identifiers: no spaces, upper case.
fn normalize_value(value: &str) -> String {
    value.replace(' ', "").to_uppercase()
}

/// Render a primary snippet and, when it exists, a secondary one with the same
/// normalised fields, joined by [`BUNDLE_SEPARATOR`].
pub fn render_bundle<T: TemplateSource>(
    templates: &T,
    primary: &str,
    secondary: Option<&str>,
    fields: &FieldMap,
) -> Result<String, GenError> {
    let mut values = fields.clone();
    values.map_values(normalize_value);

    let mut parts = vec![render::render_single_brace(&templates.load(primary)?, &values)];

    if let Some(name) = secondary.map(str::trim).filter(|n| !n.is_empty()) {
        match templates.load(name) {
            Ok(text) => parts.push(render::render_single_brace(&text, &values)),
            Err(e) => tracing::debug!("Secondary snippet skipped: {}", e),
        }
    }

    Ok(parts.join(BUNDLE_SEPARATOR))
}
