use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat name -> value mapping that feeds derivation and rendering.
///
/// Keys are case-sensitive. A value that is empty after trimming is treated as
/// absent by [`FieldMap::present`], which is what every derivation step reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a decoded JSON object.
    /// Strings are kept verbatim, `null` is dropped, anything else is stored as
    /// its JSON text (`5`, `true`, ...).
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut fields = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            fields.insert(key.clone(), text);
        }
        fields
    }

    /// Raw value, exactly as supplied.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed value, or `None` when the key is missing or blank.
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Caller-side insert; replaces whatever was there.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Derivation-side insert. Empty values are ignored so a computed field can
    /// never blank out an existing one.
    pub fn set_derived(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.0.insert(key.into(), value);
    }

    /// Value or a fallback, used for artifact naming.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Apply `f` to every value in place.
    pub fn map_values(&mut self, f: impl Fn(&str) -> String) {
        for value in self.0.values_mut() {
            *value = f(value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
