//! Accounts, credentials and third-party authorizations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::service::null_as_default;

const CIPHER_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Which `POST /auth/{mode}` endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    Login,
    Register,
    External,
}

impl AuthMode {
    pub fn as_path(&self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Register => "register",
            AuthMode::External => "external",
        }
    }
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub encoded_password: String,
}

impl PasswordCredentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        let email = email.into();
        let encoded_password = encode_password(password, &email);
        Self {
            email,
            encoded_password,
        }
    }
}

/// An authorization code obtained through the OAuth redirect, ready to be
/// exchanged by the server. Body of `POST /auth/external` and
/// `POST /authorization`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExchange {
    pub authenticator: String,
    pub code: String,
    pub redirect_uri: String,
}

/// Encode a password the way the server expects it.
///
/// `password + email` is lowercased, then every character of
/// `[a-zA-Z0-9]` is shifted through that alphabet by `3 * len(email)`.
/// Other characters pass through.
pub fn encode_password(password: &str, email: &str) -> String {
    let alphabet: Vec<char> = CIPHER_ALPHABET.chars().collect();
    let shift = email.chars().count() * 3;

    format!("{password}{email}")
        .to_lowercase()
        .chars()
        .map(|c| match alphabet.iter().position(|a| *a == c) {
            Some(index) => alphabet[(index + shift) % alphabet.len()],
            None => c,
        })
        .collect()
}

// ── Authorizations ────────────────────────────────────────────────────────────

/// A stored OAuth grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    /// Grant type, e.g. `oauth2`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Authenticator name.
    pub name: String,
    /// Permanent grants back the account itself and cannot be removed.
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub expire_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Which applets use an authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUsage {
    pub authenticator: String,
    #[serde(default)]
    pub applets: Option<Vec<String>>,
}

impl AuthorizationUsage {
    pub fn is_in_use(&self) -> bool {
        self.applets.as_ref().is_some_and(|applets| !applets.is_empty())
    }
}

/// Body of `GET /authorization`: grants and their usage, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorizations: Vec<Authorization>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Vec<AuthorizationUsage>,
}

/// One row of the Authenticators page.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationEntry {
    pub authorization: Authorization,
    pub usage: AuthorizationUsage,
}

impl AuthorizationEntry {
    /// Why this grant cannot be removed, if it cannot.
    pub fn removal_blocker(&self) -> Option<String> {
        if self.authorization.permanent {
            return Some("This authorization is permanent".to_string());
        }
        self.usage.applets.as_ref().filter(|a| !a.is_empty()).map(|applets| {
            format!(
                "You cannot remove this authorization: Used by ({})",
                applets.join(", ")
            )
        })
    }
}

impl AuthorizationList {
    /// Removable (non-permanent) grants paired with their usage.
    pub fn entries(&self) -> Vec<AuthorizationEntry> {
        self.authorizations
            .iter()
            .enumerate()
            .filter(|(_, auth)| !auth.permanent)
            .map(|(index, auth)| AuthorizationEntry {
                authorization: auth.clone(),
                usage: self
                    .meta
                    .get(index)
                    .filter(|meta| meta.authenticator == auth.name)
                    .or_else(|| self.meta.iter().find(|meta| meta.authenticator == auth.name))
                    .cloned()
                    .unwrap_or_else(|| AuthorizationUsage {
                        authenticator: auth.name.clone(),
                        applets: None,
                    }),
            })
            .collect()
    }
}

/// `GET /authorization/services`: whether each service can be used right
/// away. Services without an authenticator are always `true`.
pub type ServiceAuthorizations = HashMap<String, bool>;
