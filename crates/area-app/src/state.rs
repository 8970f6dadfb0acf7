//! Application state (Model in TEA pattern)

use std::collections::BTreeMap;

use area_core::{
    About, Applet, Area, AuthMode, AuthorizationEntry, AuthorizationList, Authenticator, Draft,
    LogTail, Service, ServiceAuthorizations, SubmitAppletRequest, User,
};

use crate::config::Settings;
use crate::message::OAuthPurpose;
use crate::query::Query;
use crate::toast::Toasts;
use crate::wizard::Wizard;

/// Service whose actions fire on an incoming HTTP call.
pub const WEBHOOK_SERVICE: &str = "webhook";

/// Routed pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Applets,
    AppletDetail {
        id: String,
    },
    Explore,
    Profile,
    Authenticators,
    /// Draft overview
    CreateApplet,
    /// Name/description step after the overview
    Submit,
}

impl Route {
    /// Pages reachable from the navigation bar, in order.
    pub fn navigation() -> [Route; 6] {
        [
            Route::Home,
            Route::Applets,
            Route::CreateApplet,
            Route::Explore,
            Route::Authenticators,
            Route::Profile,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Applets => "Applets",
            Route::AppletDetail { .. } => "Applet",
            Route::Explore => "Explore",
            Route::Profile => "Profile",
            Route::Authenticators => "Authenticators",
            Route::CreateApplet => "Create",
            Route::Submit => "Publish",
        }
    }

    /// Pages that only make sense with a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Home | Route::Explore)
    }
}

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Page navigation
    #[default]
    Normal,

    /// Email/password form
    SignIn,

    /// Applet builder wizard over the overview
    Wizard,

    /// Yes/no confirmation
    ConfirmDialog,

    /// Single-line text prompt
    Prompt,

    /// Authenticator picker
    Picker,

    /// Waiting for the browser to come back with an OAuth code
    OAuthPending,
}

/// Application lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Polling `GET /about.json`
    #[default]
    Bootstrapping,
    Ready,
    /// Catalog polling gave up
    Unavailable(String),
    Quitting,
}

// ─────────────────────────────────────────────────────────
// Dialog state
// ─────────────────────────────────────────────────────────

/// What a confirmed dialog does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Remove the draft action, which drops the reactions with it
    RemoveDraftAction,
    ClearDraft,
    DeleteApplet { id: String },
    DeleteAccount,
    /// Use a work-in-progress area in the wizard
    UseWipArea { area: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
    /// Mode restored when the dialog closes
    pub return_mode: UiMode,
}

impl ConfirmDialogState {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        action: ConfirmAction,
        return_mode: UiMode,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            action,
            return_mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    Username,
    /// Path of an image to upload as avatar
    AvatarPath,
    /// Message posted to the webhook of the named applet
    WebhookMessage { applet: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub purpose: PromptPurpose,
    pub title: String,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerPurpose {
    /// Authenticator to run an OAuth flow with
    Authenticate(OAuthPurpose),
    /// Applet whose webhook gets a message
    Webhook,
}

/// A short list to choose one entry from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub purpose: PickerPurpose,
    pub items: Vec<String>,
    pub cursor: usize,
    pub return_mode: UiMode,
}

// ─────────────────────────────────────────────────────────
// Forms
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct SignInState {
    pub register: bool,
    pub email: String,
    pub password: String,
    pub focus: SignInField,
    pub submitting: bool,
}

impl SignInState {
    pub fn mode(&self) -> AuthMode {
        if self.register {
            AuthMode::Register
        } else {
            AuthMode::Login
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            SignInField::Email => &mut self.email,
            SignInField::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitField {
    #[default]
    Name,
    Description,
    Visibility,
}

impl SubmitField {
    pub fn next(self) -> Self {
        match self {
            SubmitField::Name => SubmitField::Description,
            SubmitField::Description => SubmitField::Visibility,
            SubmitField::Visibility => SubmitField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SubmitField::Name => SubmitField::Visibility,
            SubmitField::Description => SubmitField::Name,
            SubmitField::Visibility => SubmitField::Description,
        }
    }
}

/// Final step of the builder: name, description and visibility.
#[derive(Debug, Clone, Default)]
pub struct SubmitForm {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub focus: SubmitField,
    pub submitting: bool,
}

impl SubmitForm {
    pub fn request(&self) -> SubmitAppletRequest {
        SubmitAppletRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            public: self.public,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.request().is_valid()
    }
}

// ─────────────────────────────────────────────────────────
// Pages
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStreamStatus {
    Connecting,
    Live,
    Closed(Option<String>),
}

/// The applet detail page.
#[derive(Debug, Clone)]
pub struct AppletDetailState {
    pub id: String,
    pub applet: Query<Applet>,
    pub reactions: Query<Vec<Area>>,
    pub logs: LogTail,
    pub stream: LogStreamStatus,
}

impl AppletDetailState {
    pub fn new(id: impl Into<String>, log_lines: usize) -> Self {
        Self {
            id: id.into(),
            applet: Query::new(),
            reactions: Query::new(),
            logs: LogTail::new(log_lines),
            stream: LogStreamStatus::Connecting,
        }
    }
}

/// Selection of each list page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursors {
    pub applets: usize,
    pub explore: usize,
    pub authorizations: usize,
    /// Row of the draft overview: 0 is the action, then the reactions
    pub overview: usize,
    pub navigation: usize,
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub phase: AppPhase,
    pub route: Route,
    pub ui_mode: UiMode,

    /// A session token is held
    pub signed_in: bool,

    /// Services and authenticators from `GET /about.json`
    pub catalog: About,

    pub service_authorizations: Query<ServiceAuthorizations>,
    pub authorizations: Query<AuthorizationList>,
    pub applets: Query<Vec<Applet>>,
    pub store: Query<Vec<Applet>>,
    pub draft: Query<Draft>,
    pub profile: Query<User>,
    pub avatar: Query<String>,
    pub detail: Option<AppletDetailState>,
    /// Reactions of each listed applet, by applet id
    pub usage_reactions: BTreeMap<String, Query<Vec<Area>>>,

    pub cursors: Cursors,
    pub toasts: Toasts,

    pub confirm_dialog_state: Option<ConfirmDialogState>,
    pub prompt: Option<PromptState>,
    pub picker: Option<PickerState>,
    pub sign_in: SignInState,
    pub wizard: Option<Wizard>,
    pub submit_form: SubmitForm,

    /// OAuth flow in progress
    pub oauth: Option<OAuthPurpose>,
}

impl AppState {
    pub fn new(settings: Settings, signed_in: bool) -> Self {
        let toasts = Toasts::new(settings.ui.toast_duration());
        Self {
            settings,
            phase: AppPhase::default(),
            route: Route::default(),
            ui_mode: UiMode::default(),
            signed_in,
            catalog: About::default(),
            service_authorizations: Query::new(),
            authorizations: Query::new(),
            applets: Query::new(),
            store: Query::new(),
            draft: Query::new(),
            profile: Query::new(),
            avatar: Query::new(),
            detail: None,
            usage_reactions: BTreeMap::new(),
            cursors: Cursors::default(),
            toasts,
            confirm_dialog_state: None,
            prompt: None,
            picker: None,
            sign_in: SignInState::default(),
            wizard: None,
            submit_form: SubmitForm::default(),
            oauth: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn dev_mode(&self) -> bool {
        self.settings.server.mode.is_development()
    }

    pub fn services(&self) -> &[Service] {
        &self.catalog.server.services
    }

    /// Authenticators usable for a connect or sign-in flow.
    pub fn enabled_authenticators(&self) -> Vec<&Authenticator> {
        self.catalog
            .server
            .authenticators
            .iter()
            .filter(|auth| auth.enabled && !auth.authorization_uri.is_empty())
            .collect()
    }

    pub fn find_authenticator(&self, name: &str) -> Option<&Authenticator> {
        self.catalog
            .server
            .authenticators
            .iter()
            .find(|auth| auth.name == name)
            .or_else(|| {
                self.services()
                    .iter()
                    .filter_map(|service| service.authenticator.as_ref())
                    .find(|auth| auth.name == name)
            })
    }

    /// Components the draft action produces, offered to reaction fields.
    pub fn draft_components(&self) -> Vec<String> {
        self.draft
            .data()
            .map(|draft| draft.action_components(self.services()).to_vec())
            .unwrap_or_default()
    }

    /// Rows of the draft overview: the action (if set) then the reactions.
    pub fn overview_rows(&self) -> usize {
        self.draft
            .data()
            .map(|draft| usize::from(draft.has_action()) + draft.reactions.len())
            .unwrap_or(0)
    }

    pub fn selected_applet(&self) -> Option<&Applet> {
        self.applets.data()?.get(self.cursors.applets)
    }

    pub fn authorization_entries(&self) -> Vec<AuthorizationEntry> {
        self.authorizations
            .data()
            .map(AuthorizationList::entries)
            .unwrap_or_default()
    }

    /// Names of the user's applets triggered by a webhook.
    pub fn webhook_applets(&self) -> Vec<String> {
        self.applets
            .data()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|applet| applet.action_service() == WEBHOOK_SERVICE)
            .map(|applet| applet.name.clone())
            .collect()
    }

    /// Uses of each service across the user's applets, for the profile
    /// chart. An applet counts once for its action and once per reaction
    /// whose list has loaded.
    pub fn usage_by_service(&self) -> Vec<(String, u64)> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for applet in self.applets.data().map(Vec::as_slice).unwrap_or_default() {
            *counts.entry(applet.action_service().to_string()).or_default() += 1;
            let reactions = self.usage_reactions.get(&applet.id).and_then(Query::data);
            for reaction in reactions.map(Vec::as_slice).unwrap_or_default() {
                *counts.entry(reaction.service.clone()).or_default() += 1;
            }
        }
        counts.into_iter().collect()
    }

    /// Forget everything tied to the signed-in account.
    pub fn clear_account_data(&mut self) {
        self.signed_in = false;
        self.service_authorizations.clear();
        self.authorizations.clear();
        self.applets.clear();
        self.draft.clear();
        self.profile.clear();
        self.avatar.clear();
        self.detail = None;
        self.usage_reactions.clear();
        self.wizard = None;
        self.picker = None;
        self.prompt = None;
        self.confirm_dialog_state = None;
        self.oauth = None;
        self.sign_in = SignInState::default();
        self.submit_form = SubmitForm::default();
        self.cursors = Cursors::default();
        self.ui_mode = UiMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_core::AppletStatus;

    fn applet(id: &str, action: &str) -> Applet {
        Applet {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            public: false,
            action: action.into(),
            active: true,
            status: AppletStatus::Stopped,
        }
    }

    fn reaction(service: &str) -> Area {
        Area {
            id: format!("{service}-r"),
            area_type: area_core::AreaType::Reaction,
            service: service.into(),
            name: "r".into(),
            store: BTreeMap::new(),
        }
    }

    #[test]
    fn test_usage_by_service_counts_action_and_reaction_services() {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.applets.begin();
        state.applets.resolve(
            ticket,
            Ok(vec![
                applet("1", "discord;on_message"),
                applet("2", "timer;every_minute"),
                applet("3", "discord;on_reaction"),
            ]),
        );
        assert_eq!(
            state.usage_by_service(),
            vec![("discord".to_string(), 2), ("timer".to_string(), 1)]
        );

        let ticket = state.usage_reactions.entry("2".into()).or_default().begin();
        state
            .usage_reactions
            .entry("2".into())
            .or_default()
            .resolve(ticket, Ok(vec![reaction("discord"), reaction("gmail")]));
        // Still loading: not counted yet
        state.usage_reactions.entry("3".into()).or_default().begin();

        assert_eq!(
            state.usage_by_service(),
            vec![
                ("discord".to_string(), 3),
                ("gmail".to_string(), 1),
                ("timer".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_submit_form_requires_name_and_description() {
        let mut form = SubmitForm {
            name: "  ".into(),
            description: "d".into(),
            ..Default::default()
        };
        assert!(!form.is_valid());
        form.name = "n".into();
        assert!(form.is_valid());
    }

    #[test]
    fn test_route_session_requirements() {
        assert!(!Route::Home.requires_session());
        assert!(!Route::Explore.requires_session());
        assert!(Route::CreateApplet.requires_session());
    }
}
