//! Test utilities for code that talks to the AREA API
//!
//! [`FakeApi`] is an in-memory [`AreaApi`] with canned answers and a call
//! log. The builders create catalog entries with sensible defaults.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use area_core::prelude::*;
use area_core::{
    About, AddAreaRequest, Applet, AppletStatus, Appearance, Area, AreaDefinition, AreaType,
    AuthMode, Authenticator, AuthorizationList, CodeExchange, Draft, DraftField, DraftRemoval,
    FieldSchema, SelectOption, Service, ServiceAuthorizations, SubmitAppletRequest, User,
};

use crate::api::{AreaApi, Credentials};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    pub operation: &'static str,
    /// Main argument, formatted.
    pub detail: String,
}

#[derive(Default)]
struct FakeState {
    about: About,
    about_failures: u32,
    token: String,
    service_authorizations: ServiceAuthorizations,
    authorizations: AuthorizationList,
    user: Option<User>,
    applets: Vec<Applet>,
    store: Vec<Applet>,
    draft: Draft,
    options: HashMap<String, Vec<SelectOption>>,
    failures: HashMap<&'static str, ApiFailure>,
    added_areas: Vec<AddAreaRequest>,
    calls: Vec<FakeCall>,
}

/// In-memory [`AreaApi`].
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.lock().token = "fake-token".to_string();
        api
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, operation: &'static str, detail: impl Into<String>) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(FakeCall {
            operation,
            detail: detail.into(),
        });
        match state.failures.get(operation) {
            Some(failure) => Err(Error::Api(failure.clone())),
            None => Ok(()),
        }
    }

    // ── Canned answers ───────────────────────────────────────────

    pub fn with_services(self, services: Vec<Service>) -> Self {
        self.lock().about.server.services = services;
        self
    }

    pub fn with_authenticators(self, authenticators: Vec<Authenticator>) -> Self {
        self.lock().about.server.authenticators = authenticators;
        self
    }

    pub fn with_authorized(self, service: &str, authorized: bool) -> Self {
        self.lock()
            .service_authorizations
            .insert(service.to_string(), authorized);
        self
    }

    pub fn with_applets(self, applets: Vec<Applet>) -> Self {
        self.lock().applets = applets;
        self
    }

    pub fn with_store(self, applets: Vec<Applet>) -> Self {
        self.lock().store = applets;
        self
    }

    pub fn with_draft(self, draft: Draft) -> Self {
        self.lock().draft = draft;
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.lock().user = Some(user);
        self
    }

    pub fn with_authorizations(self, list: AuthorizationList) -> Self {
        self.lock().authorizations = list;
        self
    }

    /// Options answered for `service` + resolved `endpoint`.
    pub fn with_options(self, service: &str, endpoint: &str, options: Vec<SelectOption>) -> Self {
        self.lock()
            .options
            .insert(format!("{service}{endpoint}"), options);
        self
    }

    /// Make every call to `operation` fail with `failure`.
    pub fn fail(&self, operation: &'static str, failure: ApiFailure) {
        self.lock().failures.insert(operation, failure);
    }

    /// Make the next `times` about queries fail with a transport error.
    pub fn fail_about_times(&self, times: u32) {
        self.lock().about_failures = times;
    }

    // ── Inspection ───────────────────────────────────────────────

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    /// Bodies received by `add_draft_area`, in order.
    pub fn added_areas(&self) -> Vec<AddAreaRequest> {
        self.lock().added_areas.clone()
    }

    pub fn current_draft(&self) -> Draft {
        self.lock().draft.clone()
    }
}

impl AreaApi for FakeApi {
    async fn about(&self) -> Result<About> {
        self.record("about", "")?;
        let mut state = self.lock();
        if state.about_failures > 0 {
            state.about_failures -= 1;
            return Err(Error::Api(ApiFailure::Transport("connection refused".to_string())));
        }
        Ok(state.about.clone())
    }

    async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<String> {
        let detail = match &credentials {
            Credentials::Password(password) => password.email.clone(),
            Credentials::External(exchange) => exchange.authenticator.clone(),
        };
        self.record("authenticate", format!("{}:{detail}", mode.as_path()))?;
        Ok(self.lock().token.clone())
    }

    async fn authorizations(&self) -> Result<AuthorizationList> {
        self.record("authorizations", "")?;
        Ok(self.lock().authorizations.clone())
    }

    async fn service_authorizations(&self) -> Result<ServiceAuthorizations> {
        self.record("service_authorizations", "")?;
        Ok(self.lock().service_authorizations.clone())
    }

    async fn create_authorization(&self, exchange: CodeExchange) -> Result<String> {
        self.record("create_authorization", exchange.authenticator.clone())?;
        Ok("Authorization created".to_string())
    }

    async fn delete_authorization(&self, name: &str) -> Result<String> {
        self.record("delete_authorization", name)?;
        Ok("Authorization deleted".to_string())
    }

    async fn profile(&self) -> Result<User> {
        self.record("profile", "")?;
        self.lock()
            .user
            .clone()
            .ok_or(Error::Api(ApiFailure::Unauthorized))
    }

    async fn logout(&self) -> Result<String> {
        self.record("logout", "")?;
        Ok("Logged out".to_string())
    }

    async fn update_profile(&self, username: &str) -> Result<String> {
        self.record("update_profile", username)?;
        if let Some(user) = self.lock().user.as_mut() {
            user.username = username.to_string();
        }
        Ok("Profile updated".to_string())
    }

    async fn delete_profile(&self) -> Result<String> {
        self.record("delete_profile", "")?;
        Ok("Account deleted".to_string())
    }

    async fn avatar(&self) -> Result<String> {
        self.record("avatar", "")?;
        Ok("http://localhost:8080/static/avatar.png".to_string())
    }

    async fn update_avatar(&self, file: PathBuf) -> Result<String> {
        self.record("update_avatar", file.display().to_string())?;
        Ok("Avatar updated".to_string())
    }

    async fn applets(&self) -> Result<Vec<Applet>> {
        self.record("applets", "")?;
        Ok(self.lock().applets.clone())
    }

    async fn applet(&self, id: &str) -> Result<Applet> {
        self.record("applet", id)?;
        self.lock()
            .applets
            .iter()
            .find(|applet| applet.id == id)
            .cloned()
            .ok_or_else(|| {
                Error::Api(ApiFailure::Rejected {
                    status: 404,
                    payload: serde_json::json!({"code": 404, "error": "Applet not found"}),
                })
            })
    }

    async fn applet_reactions(&self, id: &str) -> Result<Vec<Area>> {
        self.record("applet_reactions", id)?;
        Ok(Vec::new())
    }

    async fn set_applet_activity(&self, id: &str, active: bool) -> Result<String> {
        self.record("set_applet_activity", format!("{id}:{active}"))?;
        if let Some(applet) = self.lock().applets.iter_mut().find(|a| a.id == id) {
            applet.active = active;
        }
        Ok("Applet updated".to_string())
    }

    async fn delete_applet(&self, id: &str) -> Result<String> {
        self.record("delete_applet", id)?;
        self.lock().applets.retain(|applet| applet.id != id);
        Ok("Applet deleted".to_string())
    }

    async fn start_applet(&self, id: &str) -> Result<String> {
        self.record("start_applet", id)?;
        if let Some(applet) = self.lock().applets.iter_mut().find(|a| a.id == id) {
            applet.status = AppletStatus::Running;
        }
        Ok("Applet started".to_string())
    }

    async fn stop_applet(&self, id: &str) -> Result<String> {
        self.record("stop_applet", id)?;
        if let Some(applet) = self.lock().applets.iter_mut().find(|a| a.id == id) {
            applet.status = AppletStatus::Stopped;
        }
        Ok("Applet stopped".to_string())
    }

    async fn store(&self) -> Result<Vec<Applet>> {
        self.record("store", "")?;
        Ok(self.lock().store.clone())
    }

    async fn draft(&self, field: DraftField) -> Result<Draft> {
        self.record("draft", field.as_query())?;
        let draft = self.lock().draft.clone();
        Ok(match field {
            DraftField::All => draft,
            DraftField::Action => Draft {
                action: draft.action,
                reactions: Vec::new(),
            },
            DraftField::Reactions => Draft {
                action: None,
                reactions: draft.reactions,
            },
        })
    }

    async fn add_draft_area(&self, request: AddAreaRequest) -> Result<String> {
        self.record(
            "add_draft_area",
            format!("{}:{}:{}", request.area_type, request.service, request.area_item),
        )?;
        let mut state = self.lock();
        let store = request
            .area_settings
            .as_ref()
            .map(|settings| {
                settings
                    .iter()
                    .map(|(key, value)| (key.clone(), serde_json::json!(value.as_text())))
                    .collect()
            })
            .unwrap_or_default();
        let area = Area {
            id: String::new(),
            area_type: request.area_type,
            service: request.service.clone(),
            name: request.area_item.clone(),
            store,
        };
        match request.area_type {
            AreaType::Action => {
                state.draft.action = Some(area);
                state.draft.reactions.clear();
            }
            AreaType::Reaction => state.draft.reactions.push(area),
        }
        state.added_areas.push(request);
        Ok("Area added".to_string())
    }

    async fn remove_draft_area(&self, removal: DraftRemoval) -> Result<String> {
        let (area_type, number) = removal.query();
        self.record("remove_draft_area", format!("{area_type}:{number}"))?;
        let mut state = self.lock();
        match removal {
            DraftRemoval::Action => state.draft = Draft::default(),
            DraftRemoval::Reaction(index) if index < state.draft.reactions.len() => {
                state.draft.reactions.remove(index);
            }
            DraftRemoval::Reaction(_) => {}
            DraftRemoval::AllReactions => state.draft.reactions.clear(),
        }
        Ok("Area removed".to_string())
    }

    async fn submit_draft(&self, request: SubmitAppletRequest) -> Result<String> {
        self.record("submit_draft", request.name.clone())?;
        let mut state = self.lock();
        let action = state
            .draft
            .action
            .as_ref()
            .map(|a| format!("{};{}", a.service, a.name))
            .unwrap_or_default();
        let id = format!("applet-{}", state.applets.len() + 1);
        state.applets.push(Applet {
            id,
            name: request.name,
            description: request.description,
            public: request.public,
            action,
            active: true,
            status: AppletStatus::Stopped,
        });
        state.draft = Draft::default();
        Ok("Applet created".to_string())
    }

    async fn service_options(&self, service: &str, endpoint: &str) -> Result<Vec<SelectOption>> {
        self.record("service_options", format!("{service}{endpoint}"))?;
        Ok(self
            .lock()
            .options
            .get(&format!("{service}{endpoint}"))
            .cloned()
            .unwrap_or_default())
    }

    async fn trigger_webhook(&self, applet: &str, message: &str) -> Result<String> {
        self.record("trigger_webhook", format!("{applet}:{message}"))?;
        Ok("Webhook triggered".to_string())
    }
}

// ── Catalog builders ─────────────────────────────────────────────

/// An action or reaction with the given parameter store.
pub fn test_area(name: &str, store: Vec<(&str, FieldSchema)>) -> AreaDefinition {
    AreaDefinition {
        name: name.to_string(),
        description: format!("{name} description"),
        components: Vec::new(),
        store: store
            .into_iter()
            .map(|(key, schema)| (key.to_string(), schema))
            .collect::<BTreeMap<_, _>>(),
        wip: false,
        use_gateway: false,
    }
}

/// A service without authenticator.
pub fn test_service(
    name: &str,
    actions: Vec<AreaDefinition>,
    reactions: Vec<AreaDefinition>,
) -> Service {
    Service {
        name: name.to_string(),
        description: format!("{name} service"),
        authenticator: None,
        more: Some(Appearance {
            avatar: false,
            color: "#5865F2".to_string(),
        }),
        actions,
        reactions,
    }
}

pub fn test_authenticator(name: &str, enabled: bool) -> Authenticator {
    Authenticator {
        name: name.to_string(),
        enabled,
        more: Appearance::default(),
        authorization_uri: format!("https://{name}.example.com/oauth/authorize?client_id=area"),
    }
}

pub fn test_applet(id: &str, name: &str) -> Applet {
    Applet {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        public: false,
        action: "timer;every_minute".to_string(),
        active: true,
        status: AppletStatus::Stopped,
    }
}

pub fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_core::{SettingValue, Settings};

    #[tokio::test]
    async fn test_fake_records_calls_and_applies_draft_mutations() {
        let api = FakeApi::new();
        api.add_draft_area(AddAreaRequest {
            service: "timer".to_string(),
            area_type: AreaType::Action,
            area_item: "every_minute".to_string(),
            area_settings: None,
        })
        .await
        .unwrap();

        let mut settings = Settings::new();
        settings.update("message", Some(SettingValue::Text("hi".to_string())));
        api.add_draft_area(AddAreaRequest {
            service: "discord".to_string(),
            area_type: AreaType::Reaction,
            area_item: "send".to_string(),
            area_settings: Some(settings),
        })
        .await
        .unwrap();

        let draft = api.draft(DraftField::All).await.unwrap();
        assert!(draft.is_complete());
        assert_eq!(draft.reactions[0].store["message"], serde_json::json!("hi"));
        assert_eq!(api.call_count("add_draft_area"), 2);
    }

    #[tokio::test]
    async fn test_fake_failure_injection() {
        let api = FakeApi::new();
        api.fail("applets", ApiFailure::Unauthorized);
        let err = api.applets().await.unwrap_err();
        assert_eq!(err.api_failure(), Some(&ApiFailure::Unauthorized));
        assert_eq!(api.call_count("applets"), 1);
    }
}
