//! Placeholder substitution for configuration skeletons.
//!
//! Two syntaxes exist side by side. Router scripts use `{NAME}` and are
//! rendered tolerantly so a partially filled map can be rendered again later.
//! Firewall skeletons use `{{NAME}}`. Neither mode ever fails: anything that
//! cannot be resolved is copied to the output untouched.

use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::FieldMap;

const SINGLE_BRACE: &str = r"\{([^{}]+)\}";
const DOUBLE_BRACE: &str = r"\{\{([^{}]*)\}\}";

/// Placeholder syntax of a template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    SingleBrace,
    DoubleBrace,
}

impl PlaceholderStyle {
    fn pattern(self) -> &'static str {
        match self {
            Self::SingleBrace => SINGLE_BRACE,
            Self::DoubleBrace => DOUBLE_BRACE,
        }
    }
}

/// Render `template` with `fields` in the given style.
pub fn render(template: &str, fields: &FieldMap, style: PlaceholderStyle) -> String {
    let Some(re) = Regex::new(style.pattern()).ok() else {
        return template.to_string();
    };

    // Single left-to-right pass: substituted values are never rescanned.
    re.replace_all(template, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let name = caps.get(1).map_or("", |m| m.as_str());
        fields.get(name).unwrap_or(whole).to_string()
    })
    .into_owned()
}

/// `{NAME}` substitution; unknown names stay as `{NAME}`.
pub fn render_single_brace(template: &str, fields: &FieldMap) -> String {
    render(template, fields, PlaceholderStyle::SingleBrace)
}

/// Sorted, de-duplicated placeholder names used by a template.
/// Brace groups containing whitespace are script blocks, not fields.
pub fn placeholders(template: &str, style: PlaceholderStyle) -> Vec<String> {
    let Some(re) = Regex::new(style.pattern()).ok() else {
        return Vec::new();
    };
    re.captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| !name.trim().is_empty() && !name.contains(char::is_whitespace))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
