//! The remote operations the application depends on.
//!
//! [`AreaApi`] is the seam between the app layer and HTTP: the app is generic
//! over it, [`crate::ApiClient`] implements it against the real server, and
//! the `test-helpers` feature provides an in-memory fake.

use std::path::PathBuf;

use area_core::prelude::*;
use area_core::{
    About, AddAreaRequest, Applet, Area, AuthMode, AuthorizationList, CodeExchange, Draft,
    DraftField, DraftRemoval, PasswordCredentials, SelectOption, ServiceAuthorizations,
    SubmitAppletRequest, User,
};

/// Credentials accepted by `POST /auth/{mode}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Password(PasswordCredentials),
    External(CodeExchange),
}

impl Credentials {
    /// The endpoint these credentials go to, given whether the user is
    /// registering.
    pub fn mode(&self, register: bool) -> AuthMode {
        match self {
            Credentials::External(_) => AuthMode::External,
            Credentials::Password(_) if register => AuthMode::Register,
            Credentials::Password(_) => AuthMode::Login,
        }
    }
}

/// Every remote operation of the AREA API.
///
/// Queries return typed payloads; mutations return the server message.
#[trait_variant::make(AreaApi: Send)]
pub trait LocalAreaApi {
    // ── Bootstrap ────────────────────────────────────────────────

    /// `GET /about.json` (not enveloped).
    async fn about(&self) -> Result<About>;

    // ── Authentication ───────────────────────────────────────────

    /// `POST /auth/{login|register|external}`; returns the session token.
    async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<String>;

    // ── Authorizations ───────────────────────────────────────────

    async fn authorizations(&self) -> Result<AuthorizationList>;

    async fn service_authorizations(&self) -> Result<ServiceAuthorizations>;

    async fn create_authorization(&self, exchange: CodeExchange) -> Result<String>;

    async fn delete_authorization(&self, name: &str) -> Result<String>;

    // ── Profile ──────────────────────────────────────────────────

    async fn profile(&self) -> Result<User>;

    async fn logout(&self) -> Result<String>;

    async fn update_profile(&self, username: &str) -> Result<String>;

    async fn delete_profile(&self) -> Result<String>;

    async fn avatar(&self) -> Result<String>;

    async fn update_avatar(&self, file: PathBuf) -> Result<String>;

    // ── Applets ──────────────────────────────────────────────────

    async fn applets(&self) -> Result<Vec<Applet>>;

    async fn applet(&self, id: &str) -> Result<Applet>;

    async fn applet_reactions(&self, id: &str) -> Result<Vec<Area>>;

    async fn set_applet_activity(&self, id: &str, active: bool) -> Result<String>;

    async fn delete_applet(&self, id: &str) -> Result<String>;

    async fn start_applet(&self, id: &str) -> Result<String>;

    async fn stop_applet(&self, id: &str) -> Result<String>;

    /// `GET /store`: public applets (anonymous).
    async fn store(&self) -> Result<Vec<Applet>>;

    // ── Draft ────────────────────────────────────────────────────

    async fn draft(&self, field: DraftField) -> Result<Draft>;

    async fn add_draft_area(&self, request: AddAreaRequest) -> Result<String>;

    async fn remove_draft_area(&self, removal: DraftRemoval) -> Result<String>;

    async fn submit_draft(&self, request: SubmitAppletRequest) -> Result<String>;

    // ── Service proxy ────────────────────────────────────────────

    /// `GET /services/{service}/api{endpoint}` and extract select options.
    async fn service_options(&self, service: &str, endpoint: &str) -> Result<Vec<SelectOption>>;

    /// Post `message` to the webhook of the applet named `applet`.
    async fn trigger_webhook(&self, applet: &str, message: &str) -> Result<String>;
}
