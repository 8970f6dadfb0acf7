//! # Applets and Drafts
//!
//! Persisted applets, the areas they are built from, and the request bodies
//! used while assembling the server-side draft.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::service::{null_as_default, AreaType};
use crate::settings::Settings;

// ── Area ──────────────────────────────────────────────────────────────────────

/// A configured action or reaction attached to an applet or to the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub service: String,
    pub name: String,
    /// Settings as the server stored them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub store: BTreeMap<String, serde_json::Value>,
}

impl Area {
    /// Settings rendered as `key: value` lines for display.
    pub fn store_lines(&self) -> Vec<(String, String)> {
        self.store
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

// ── Draft ─────────────────────────────────────────────────────────────────────

/// The applet under construction, as last fetched from `GET /applet/new`.
///
/// There is one draft per account. The client never merges: each mutation is
/// followed by a re-fetch and the latest server answer replaces this value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub action: Option<Area>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactions: Vec<Area>,
}

impl Draft {
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Reactions may only be added after the action is set.
    pub fn can_add_reaction(&self) -> bool {
        self.has_action()
    }

    /// "Next Step" is enabled iff the action is set and there is at least one
    /// reaction.
    pub fn is_complete(&self) -> bool {
        self.has_action() && !self.reactions.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.reactions.is_empty()
    }

    /// Components produced by the draft action, offered to reaction fields.
    pub fn action_components<'a>(&self, services: &'a [crate::Service]) -> &'a [String] {
        self.action
            .as_ref()
            .and_then(|action| {
                crate::service::find_service(services, &action.service)
                    .and_then(|svc| svc.find_area(AreaType::Action, &action.name))
            })
            .map(|area| area.components.as_slice())
            .unwrap_or(&[])
    }
}

/// Which part of the draft a `GET /applet/new?field=` fetch asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    All,
    Action,
    Reactions,
}

impl DraftField {
    pub fn as_query(&self) -> &'static str {
        match self {
            DraftField::All => "",
            DraftField::Action => "action",
            DraftField::Reactions => "reactions",
        }
    }
}

/// Body of `PUT /applet/new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAreaRequest {
    pub service: String,
    pub area_type: AreaType,
    pub area_item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_settings: Option<Settings>,
}

/// Target of `DELETE /applet/new?type=&number=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftRemoval {
    /// The action. The server drops the reactions with it.
    Action,
    /// One reaction by index.
    Reaction(usize),
    /// All reactions.
    AllReactions,
}

impl DraftRemoval {
    /// `(type, number)` query values.
    pub fn query(&self) -> (&'static str, String) {
        match self {
            DraftRemoval::Action => ("action", String::new()),
            DraftRemoval::Reaction(index) => ("reaction", index.to_string()),
            DraftRemoval::AllReactions => ("reaction", String::new()),
        }
    }
}

/// Body of `POST /applet/new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAppletRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

impl SubmitAppletRequest {
    /// Name and description are both required.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

// ── Applet ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppletStatus {
    Running,
    #[default]
    #[serde(other)]
    Stopped,
}

impl AppletStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, AppletStatus::Running)
    }
}

/// A persisted automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub public: bool,
    /// `<service>;<action name>`.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub status: AppletStatus,
}

impl Applet {
    pub fn action_service(&self) -> &str {
        self.action.split(';').next().unwrap_or_default()
    }

    pub fn action_name(&self) -> &str {
        self.action.split(';').nth(1).unwrap_or_default()
    }
}
