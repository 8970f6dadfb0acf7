//! # Area Settings
//!
//! The parameter values a user enters for one action or reaction. Values are
//! strings or integers; strings may embed `{{component}}` tokens that the
//! server substitutes when the applet runs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Replacement used for an endpoint placeholder whose field is still empty.
pub const PLACEHOLDER_FALLBACK: &str = "default";

/// A single committed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(i64),
    Text(String),
}

impl SettingValue {
    /// Empty strings never make it into [`Settings`], so every stored value
    /// counts as filled.
    pub fn as_text(&self) -> String {
        match self {
            SettingValue::Number(n) => n.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

/// Field name → value. Absence of a key means "not filled".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, SettingValue>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    pub fn is_filled(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Store `value`, or remove the key when `value` is `None`. Empty text is
    /// treated as `None`.
    pub fn update(&mut self, key: impl Into<String>, value: Option<SettingValue>) {
        let key = key.into();
        match value {
            Some(SettingValue::Text(text)) if text.is_empty() => {
                self.0.remove(&key);
            }
            Some(value) => {
                self.0.insert(key, value);
            }
            None => {
                self.0.remove(&key);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }

    /// Resolve `${key}` placeholders in a service endpoint from the current
    /// values. Missing keys resolve to [`PLACEHOLDER_FALLBACK`].
    pub fn resolve_endpoint(&self, endpoint: &str) -> String {
        PLACEHOLDER_REGEX
            .replace_all(endpoint, |caps: &regex::Captures<'_>| {
                self.get(&caps[1])
                    .map(SettingValue::as_text)
                    .unwrap_or_else(|| PLACEHOLDER_FALLBACK.to_string())
            })
            .into_owned()
    }
}

impl FromIterator<(String, SettingValue)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (key, value) in iter {
            settings.update(key, Some(value));
        }
        settings
    }
}

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("Invalid placeholder regex"));

/// The text inserted into a field to reference a component.
pub fn component_token(component: &str) -> String {
    format!("{{{{{component}}}}}")
}

/// Whether a component can feed a remote-select field.
///
/// A component such as `discord:message:id` matches the field `req:message:id`
/// of the `discord` service: it starts with the service name and ends with
/// the field name minus its first segment.
pub fn component_matches_field(component: &str, service: &str, field: &str) -> bool {
    let suffix = field.split_once(':').map(|(_, rest)| rest).unwrap_or(field);
    component.starts_with(service) && component.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_empty_text_removes_key() {
        let mut settings = Settings::new();
        settings.update("req:message", Some(SettingValue::Text("hello".into())));
        assert!(settings.is_filled("req:message"));

        settings.update("req:message", Some(SettingValue::Text(String::new())));
        assert!(!settings.is_filled("req:message"));
        assert!(settings.is_empty());
    }

    #[test]
    fn test_update_with_none_removes_key() {
        let mut settings = Settings::new();
        settings.update("req:count", Some(SettingValue::Number(3)));
        settings.update("req:count", None);
        assert_eq!(settings.get("req:count"), None);
    }

    #[test]
    fn test_resolve_endpoint_substitutes_and_falls_back() {
        let mut settings = Settings::new();
        settings.update("req:guild_id", Some(SettingValue::Text("42".into())));

        assert_eq!(
            settings.resolve_endpoint("/guilds/${req:guild_id}/channels"),
            "/guilds/42/channels"
        );
        assert_eq!(
            settings.resolve_endpoint("/repos/${req:owner}/${req:repo}"),
            "/repos/default/default"
        );
        assert_eq!(settings.resolve_endpoint("/plain"), "/plain");
    }

    #[test]
    fn test_serializes_numbers_and_text() {
        let settings: Settings = [
            ("req:count".to_string(), SettingValue::Number(5)),
            ("req:text".to_string(), SettingValue::Text("hi".into())),
        ]
        .into_iter()
        .collect();
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, serde_json::json!({"req:count": 5, "req:text": "hi"}));
    }

    #[test]
    fn test_component_token_and_matching() {
        assert_eq!(component_token("github:issue:title"), "{{github:issue:title}}");
        assert!(component_matches_field(
            "discord:message:id",
            "discord",
            "req:message:id"
        ));
        assert!(!component_matches_field(
            "github:message:id",
            "discord",
            "req:message:id"
        ));
        assert!(!component_matches_field(
            "discord:channel:name",
            "discord",
            "req:message:id"
        ));
    }
}
