//! # Service Catalog
//!
//! Services, their authenticators and the action/reaction definitions they
//! expose. The catalog is read once from `GET /about.json` and never mutated
//! by the client.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::field::FieldSchema;

/// Fallback color when neither a service nor its authenticator carries one.
pub const DEFAULT_COLOR: &str = "#222222";

/// Deserialize `null` as `T::default()`. The server serializes empty Go
/// slices and maps as `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── AreaType ──────────────────────────────────────────────────────────────────

/// The slot an area occupies in an applet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Action,
    Reaction,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Action => "action",
            AreaType::Reaction => "reaction",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Appearance ────────────────────────────────────────────────────────────────

/// Display metadata attached to services and authenticators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// Whether an avatar image exists for this entry.
    #[serde(rename = "take_avatar", alias = "avatar", default)]
    pub avatar: bool,
    /// Hex color, e.g. `#5865F2`.
    #[serde(default)]
    pub color: String,
}

// ── Authenticator ─────────────────────────────────────────────────────────────

/// An OAuth2 provider the server knows how to talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authenticator {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub more: Appearance,
    #[serde(default)]
    pub authorization_uri: String,
}

// ── AreaDefinition ────────────────────────────────────────────────────────────

/// A capability a service exposes: either a trigger (action) or an effect
/// (reaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Tokens this area produces, insertable into reaction fields as
    /// `{{component}}`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<String>,
    /// Parameter schema keyed by field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub store: BTreeMap<String, FieldSchema>,
    /// Work in progress. Hidden in production and confirmed in development.
    #[serde(default)]
    pub wip: bool,
    #[serde(default)]
    pub use_gateway: bool,
}

impl AreaDefinition {
    /// An area with no parameters is committed without a settings step.
    pub fn has_parameters(&self) -> bool {
        !self.store.is_empty()
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authenticator: Option<Authenticator>,
    #[serde(default)]
    pub more: Option<Appearance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<AreaDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactions: Vec<AreaDefinition>,
}

impl Service {
    /// Actions or reactions depending on the slot.
    pub fn areas(&self, area_type: AreaType) -> &[AreaDefinition] {
        match area_type {
            AreaType::Action => &self.actions,
            AreaType::Reaction => &self.reactions,
        }
    }

    pub fn find_area(&self, area_type: AreaType, name: &str) -> Option<&AreaDefinition> {
        self.areas(area_type).iter().find(|area| area.name == name)
    }

    /// Whether this service can fill the given slot.
    ///
    /// In production at least one non-wip item is needed; in development any
    /// item counts.
    pub fn offers(&self, area_type: AreaType, include_wip: bool) -> bool {
        self.areas(area_type)
            .iter()
            .any(|area| include_wip || !area.wip)
    }

    /// The authenticator to use for a connect flow, if it is usable.
    pub fn enabled_authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref().filter(|auth| auth.enabled)
    }

    /// Service color, falling back to the authenticator's, then to
    /// [`DEFAULT_COLOR`].
    pub fn color(&self) -> &str {
        self.more
            .as_ref()
            .map(|more| more.color.as_str())
            .filter(|color| !color.is_empty())
            .or_else(|| {
                self.authenticator
                    .as_ref()
                    .map(|auth| auth.more.color.as_str())
                    .filter(|color| !color.is_empty())
            })
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// Look up a service by name.
pub fn find_service<'a>(services: &'a [Service], name: &str) -> Option<&'a Service> {
    services.iter().find(|service| service.name == name)
}

/// Color for a possibly unknown service.
pub fn color_of(service: Option<&Service>) -> &str {
    service.map(Service::color).unwrap_or(DEFAULT_COLOR)
}

// ── About ─────────────────────────────────────────────────────────────────────

/// Bootstrap descriptor served at `GET /about.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(default)]
    pub client: AboutClient,
    pub server: AboutServer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutClient {
    #[serde(default)]
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutServer {
    #[serde(default)]
    pub current_time: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authenticators: Vec<Authenticator>,
}
