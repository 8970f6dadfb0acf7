//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes
//! - `failure`: Central handling of failed API calls
//! - `pages`: Page commands and query results
//! - `builder`: Draft overview, wizard and submit form
//! - `auth`: Sign in, OAuth and account handlers

pub(crate) mod auth;
pub(crate) mod builder;
pub(crate) mod failure;
pub(crate) mod keys;
pub(crate) mod pages;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use area_api::Credentials;
use area_core::{
    AddAreaRequest, Authenticator, AuthMode, CodeExchange, DraftField, DraftRemoval,
    SubmitAppletRequest,
};

use crate::message::OAuthPurpose;
use crate::query::Ticket;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Cache keys of remote queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKey {
    ServiceAuthorizations,
    Authorizations,
    Applets,
    Store,
    Draft(DraftField),
    Profile,
    Avatar,
    Applet { id: String },
    AppletReactions { id: String },
    /// Reactions of a listed applet, for the profile usage chart
    UsageReactions { id: String },
}

/// Server-side changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddDraftArea(AddAreaRequest),
    RemoveDraftArea(DraftRemoval),
    SubmitDraft(SubmitAppletRequest),
    SetAppletActivity { id: String, active: bool },
    StartApplet { id: String },
    StopApplet { id: String },
    DeleteApplet { id: String },
    CreateAuthorization(CodeExchange),
    DeleteAuthorization { name: String },
    UpdateProfile { username: String },
    UpdateAvatar { path: PathBuf },
    DeleteProfile,
    Logout,
    TriggerWebhook { applet: String, message: String },
}

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Poll the catalog until the server answers
    Bootstrap,

    /// Run a query; the answer comes back as `QueryLoaded`
    Fetch { key: QueryKey, ticket: Ticket },

    /// Run a mutation; the answer comes back as `MutationDone`
    Mutate(Mutation),

    /// Options of a dynamic select
    FetchOptions {
        service: String,
        field: String,
        endpoint: String,
        ticket: Ticket,
    },

    /// Exchange credentials for a token and store it in the session
    Authenticate {
        mode: AuthMode,
        credentials: Credentials,
    },

    /// Open the authenticator in the browser and wait for the callback
    StartOAuth {
        authenticator: Authenticator,
        purpose: OAuthPurpose,
    },

    /// Drop a running OAuth callback listener
    CancelOAuth,

    /// Forget the session token (memory and file)
    ClearSession,

    /// Connect the applet's live log stream
    OpenLogStream { applet_id: String },

    /// Close the live log stream
    CloseLogStream,

    /// Several actions at once
    Batch(Vec<UpdateAction>),
}

impl UpdateAction {
    /// Combine actions, flattening empty and single-element batches.
    pub fn batch(actions: impl IntoIterator<Item = UpdateAction>) -> Option<UpdateAction> {
        let mut actions: Vec<UpdateAction> = actions.into_iter().collect();
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Batch(actions)),
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<crate::message::Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: crate::message::Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Result carrying an optional action.
    pub fn maybe(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }
}
