//! Message types for the application (TEA pattern)

use area_api::AuthorizationCodeReceived;
use area_core::{
    About, ApiFailure, Applet, Area, AuthorizationList, Draft, SelectOption,
    ServiceAuthorizations, User,
};

use crate::handler::{Mutation, QueryKey};
use crate::input_key::InputKey;
use crate::query::Ticket;
use crate::state::Route;

/// Why an OAuth connect flow was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthPurpose {
    /// Connect the service picked in the applet builder.
    WizardService { service: String },
    /// Connect an authenticator from the authenticators page.
    Connect,
    /// Sign in with an external account.
    SignIn,
}

/// A typed query payload.
#[derive(Debug, Clone)]
pub enum QueryData {
    ServiceAuthorizations(ServiceAuthorizations),
    Authorizations(AuthorizationList),
    Applets(Vec<Applet>),
    Store(Vec<Applet>),
    Draft(Draft),
    Profile(User),
    Avatar(String),
    Applet(Applet),
    AppletReactions(Vec<Area>),
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Exit the application
    Quit,

    /// Switch page
    Navigate(Route),

    /// Re-fetch the current page's data
    Refresh,

    // ─────────────────────────────────────────────────────────
    // Input (interpreted per UI mode)
    // ─────────────────────────────────────────────────────────
    MoveUp,
    MoveDown,
    /// Previous option of a select
    SelectPrev,
    /// Next option of a select
    SelectNext,
    /// Enter on the focused element
    Activate,
    /// Esc: close or step back
    Back,
    FocusNext,
    FocusPrev,
    InputChar(char),
    InputBackspace,
    /// Clear the focused input
    InputClear,

    // ─────────────────────────────────────────────────────────
    // Page commands
    // ─────────────────────────────────────────────────────────
    /// Flip the `active` flag of the selected applet
    ToggleActive,
    /// Start or stop the selected applet
    ToggleRunning,
    /// Delete the selected applet, draft area or authorization
    DeleteSelected,
    /// Remove the whole draft (asks first)
    ClearDraft,
    OpenSignIn,
    /// Switch between sign in and register
    ToggleSignInMode,
    /// Pick an authenticator to sign in with
    SignInExternal,
    /// Pick an authenticator to connect
    ConnectAuthenticator,
    EditUsername,
    ChangeAvatar,
    /// Post a message to a webhook-triggered applet
    TriggerWebhook,
    Logout,
    DeleteAccount,
    /// Public/private switch of the submit form
    TogglePublic,

    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────
    /// Service catalog fetched
    CatalogLoaded(About),
    /// Catalog polling gave up
    BootstrapFailed(String),

    // ─────────────────────────────────────────────────────────
    // Remote data
    // ─────────────────────────────────────────────────────────
    /// Answer to a query issued with `ticket`
    QueryLoaded {
        key: QueryKey,
        ticket: Ticket,
        result: Result<QueryData, ApiFailure>,
    },
    /// A mutation finished; `result` carries the server message
    MutationDone {
        mutation: Mutation,
        result: Result<String, ApiFailure>,
    },

    // ─────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────
    /// Token obtained and stored in the session
    SignedIn,
    /// Sign in or register rejected
    SignInFailed(ApiFailure),
    /// OAuth callback delivered or failed
    OAuthFinished {
        purpose: OAuthPurpose,
        authenticator: String,
        result: Result<AuthorizationCodeReceived, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Applet builder
    // ─────────────────────────────────────────────────────────
    /// Open the wizard for the action slot
    AddAction,
    /// Open the wizard for the reaction slot
    AddReaction,
    /// Options of a dynamic select
    FieldOptionsLoaded {
        service: String,
        field: String,
        /// Endpoint the options were fetched from, placeholders resolved
        endpoint: String,
        ticket: Ticket,
        result: Result<Vec<SelectOption>, ApiFailure>,
    },
    /// "Next Step" from the overview
    NextStep,
    /// Open the "Add parameter" menu
    OpenParameterMenu,
    /// Open the "Insert component" menu
    OpenComponentMenu,
    /// Hide the focused optional field
    RemoveField,
    /// Commit the settings form
    CommitArea,

    // ─────────────────────────────────────────────────────────
    // Live logs
    // ─────────────────────────────────────────────────────────
    /// One text frame from the applet log stream
    LogFrame { applet_id: String, text: String },
    /// The log stream ended
    LogStreamClosed {
        applet_id: String,
        error: Option<String>,
    },

    // ─────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────
    /// Confirm the pending dialog action
    ConfirmDialogAccept,
    /// Dismiss the pending dialog
    ConfirmDialogCancel,
    /// Submit the prompt's text
    PromptSubmit,
    /// Dismiss the prompt
    PromptCancel,
}
