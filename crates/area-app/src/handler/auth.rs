//! Sign in, OAuth flows, prompts and account commands

use std::path::PathBuf;

use area_api::{AuthorizationCodeReceived, Credentials};
use area_core::{ApiFailure, AuthMode, PasswordCredentials};
use tracing::{info, warn};

use crate::message::{Message, OAuthPurpose};
use crate::state::{
    AppState, ConfirmAction, ConfirmDialogState, PickerPurpose, PickerState, PromptPurpose,
    PromptState, Route, SignInField, UiMode,
};

use super::failure::handle_failure;
use super::pages::{fetch, fetch_all, navigate, notify_success};
use super::{Mutation, QueryKey, UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────
// Sign in
// ─────────────────────────────────────────────────────────

pub(crate) fn open_sign_in(state: &mut AppState) -> UpdateResult {
    if state.signed_in {
        return UpdateResult::none();
    }
    state.sign_in.submitting = false;
    state.sign_in.password.clear();
    state.ui_mode = UiMode::SignIn;
    UpdateResult::none()
}

pub(crate) fn toggle_sign_in_mode(state: &mut AppState) -> UpdateResult {
    if state.ui_mode == UiMode::SignIn && !state.sign_in.submitting {
        state.sign_in.register = !state.sign_in.register;
    }
    UpdateResult::none()
}

pub(crate) fn sign_in_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let form = &mut state.sign_in;
    if form.submitting {
        return UpdateResult::none();
    }
    match msg {
        Message::FocusNext | Message::FocusPrev | Message::MoveDown | Message::MoveUp => {
            form.focus = match form.focus {
                SignInField::Email => SignInField::Password,
                SignInField::Password => SignInField::Email,
            };
        }
        Message::InputChar(c) => form.focused_mut().push(c),
        Message::InputBackspace => {
            form.focused_mut().pop();
        }
        Message::InputClear => form.focused_mut().clear(),
        Message::Activate => {
            if form.focus == SignInField::Email && form.password.is_empty() {
                form.focus = SignInField::Password;
                return UpdateResult::none();
            }
            if !form.is_complete() {
                state.toasts.error("Email and password are required");
                return UpdateResult::none();
            }
            form.submitting = true;
            let mode = form.mode();
            let credentials = Credentials::Password(PasswordCredentials::new(
                form.email.trim(),
                &form.password,
            ));
            info!("Submitting {:?} for {}", mode, form.email.trim());
            return UpdateResult::action(UpdateAction::Authenticate { mode, credentials });
        }
        Message::Back => state.ui_mode = UiMode::Normal,
        _ => {}
    }
    UpdateResult::none()
}

/// A token was stored; load the account's data.
pub(crate) fn signed_in(state: &mut AppState) -> UpdateResult {
    state.signed_in = true;
    state.sign_in = Default::default();
    state.oauth = None;
    state.picker = None;
    state.toasts.success("Signed in");

    let account = fetch_all(
        state,
        [
            QueryKey::Profile,
            QueryKey::ServiceAuthorizations,
            QueryKey::Draft(Default::default()),
        ],
    );
    let result = navigate(state, Route::Applets);
    UpdateResult::maybe(UpdateAction::batch(account.into_iter().chain(result.action)))
}

pub(crate) fn sign_in_failed(state: &mut AppState, failure: ApiFailure) -> UpdateResult {
    state.sign_in.submitting = false;
    state.oauth = None;
    match failure {
        ApiFailure::Unauthorized => {
            state.toasts.error("Invalid email or password");
            UpdateResult::none()
        }
        other => UpdateResult::maybe(handle_failure(state, &other)),
    }
}

// ─────────────────────────────────────────────────────────
// OAuth
// ─────────────────────────────────────────────────────────

/// List the enabled authenticators for a connect or sign-in flow.
pub(crate) fn open_picker(state: &mut AppState, purpose: OAuthPurpose) -> UpdateResult {
    if purpose == OAuthPurpose::Connect && !state.signed_in {
        return navigate(state, Route::Authenticators);
    }
    let items: Vec<String> = state
        .enabled_authenticators()
        .into_iter()
        .map(|auth| auth.name.clone())
        .collect();
    if items.is_empty() {
        state.toasts.error("No authenticator is available");
        return UpdateResult::none();
    }
    show_picker(state, PickerPurpose::Authenticate(purpose), items);
    UpdateResult::none()
}

fn show_picker(state: &mut AppState, purpose: PickerPurpose, items: Vec<String>) {
    let return_mode = if state.ui_mode == UiMode::Picker {
        UiMode::Normal
    } else {
        state.ui_mode
    };
    state.picker = Some(PickerState {
        purpose,
        items,
        cursor: 0,
        return_mode,
    });
    state.ui_mode = UiMode::Picker;
}

pub(crate) fn picker_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let Some(picker) = state.picker.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match msg {
        Message::MoveUp => picker.cursor = picker.cursor.saturating_sub(1),
        Message::MoveDown => {
            picker.cursor = (picker.cursor + 1).min(picker.items.len().saturating_sub(1))
        }
        Message::Back => {
            state.ui_mode = picker.return_mode;
            state.picker = None;
        }
        Message::Activate => return picker_choose(state),
        _ => {}
    }
    UpdateResult::none()
}

pub(crate) fn oauth_pending_input(state: &mut AppState, msg: Message) -> UpdateResult {
    match msg {
        Message::Back => {
            state.oauth = None;
            state.ui_mode = UiMode::Normal;
            state.toasts.info("Authorization cancelled");
            UpdateResult::action(UpdateAction::CancelOAuth)
        }
        _ => UpdateResult::none(),
    }
}

/// Mode to return to once an OAuth flow ends.
fn after_oauth_mode(state: &AppState, purpose: &OAuthPurpose) -> UiMode {
    match purpose {
        OAuthPurpose::WizardService { .. } if state.wizard.is_some() => UiMode::Wizard,
        OAuthPurpose::SignIn if !state.signed_in => UiMode::SignIn,
        _ => UiMode::Normal,
    }
}

pub(crate) fn oauth_finished(
    state: &mut AppState,
    purpose: OAuthPurpose,
    authenticator: String,
    result: Result<AuthorizationCodeReceived, String>,
) -> UpdateResult {
    if state.oauth.as_ref() != Some(&purpose) {
        info!("Ignoring callback of a cancelled {} authorization", authenticator);
        return UpdateResult::none();
    }
    state.oauth = None;

    let received = match result {
        Ok(received) => received,
        Err(reason) => {
            warn!("Authorization with {} failed: {}", authenticator, reason);
            state.toasts.error(format!("Authorization failed: {reason}"));
            if let Some(wizard) = state.wizard.as_mut() {
                wizard.authorization_failed();
            }
            state.ui_mode = after_oauth_mode(state, &purpose);
            return UpdateResult::none();
        }
    };

    let exchange = received.into_exchange(authenticator);
    match purpose {
        OAuthPurpose::SignIn => {
            state.sign_in.submitting = true;
            state.ui_mode = UiMode::SignIn;
            UpdateResult::action(UpdateAction::Authenticate {
                mode: AuthMode::External,
                credentials: Credentials::External(exchange),
            })
        }
        OAuthPurpose::WizardService { .. } | OAuthPurpose::Connect => {
            state.ui_mode = after_oauth_mode(state, &purpose);
            UpdateResult::action(UpdateAction::Mutate(Mutation::CreateAuthorization(exchange)))
        }
    }
}

fn picker_choose(state: &mut AppState) -> UpdateResult {
    let Some(picker) = state.picker.take() else {
        return UpdateResult::none();
    };
    state.ui_mode = picker.return_mode;
    let Some(item) = picker.items.get(picker.cursor).cloned() else {
        return UpdateResult::none();
    };
    match picker.purpose {
        PickerPurpose::Authenticate(purpose) => {
            let Some(authenticator) = state.find_authenticator(&item).cloned() else {
                return UpdateResult::none();
            };
            state.oauth = Some(purpose.clone());
            state.ui_mode = UiMode::OAuthPending;
            UpdateResult::action(UpdateAction::StartOAuth {
                authenticator,
                purpose,
            })
        }
        PickerPurpose::Webhook => {
            let title = format!("Message for {item}");
            let purpose = PromptPurpose::WebhookMessage { applet: item };
            open_prompt(state, purpose, &title, String::new());
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────

fn open_prompt(state: &mut AppState, purpose: PromptPurpose, title: &str, buffer: String) {
    state.prompt = Some(PromptState {
        purpose,
        title: title.to_string(),
        buffer,
    });
    state.ui_mode = UiMode::Prompt;
}

pub(crate) fn edit_username(state: &mut AppState) -> UpdateResult {
    if !state.signed_in {
        return UpdateResult::none();
    }
    let current = state
        .profile
        .data()
        .map(|user| user.username.clone())
        .unwrap_or_default();
    open_prompt(state, PromptPurpose::Username, "Username", current);
    UpdateResult::none()
}

pub(crate) fn change_avatar(state: &mut AppState) -> UpdateResult {
    if !state.signed_in {
        return UpdateResult::none();
    }
    open_prompt(state, PromptPurpose::AvatarPath, "Path of the new avatar", String::new());
    UpdateResult::none()
}

/// Choose a webhook-triggered applet, then type the message to post.
pub(crate) fn trigger_webhook(state: &mut AppState) -> UpdateResult {
    if !state.signed_in {
        return UpdateResult::none();
    }
    let items = state.webhook_applets();
    if items.is_empty() {
        state.toasts.error("No applet is triggered by a webhook");
        return UpdateResult::none();
    }
    show_picker(state, PickerPurpose::Webhook, items);
    UpdateResult::none()
}

pub(crate) fn logout(state: &mut AppState) -> UpdateResult {
    if !state.signed_in {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::Mutate(Mutation::Logout))
}

pub(crate) fn delete_account(state: &mut AppState) -> UpdateResult {
    if !state.signed_in {
        return UpdateResult::none();
    }
    state.confirm_dialog_state = Some(ConfirmDialogState::new(
        "Delete account",
        "Delete your account and every applet? This cannot be undone.",
        ConfirmAction::DeleteAccount,
        UiMode::Normal,
    ));
    state.ui_mode = UiMode::ConfirmDialog;
    UpdateResult::none()
}

pub(crate) fn prompt_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let Some(prompt) = state.prompt.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match msg {
        Message::InputChar(c) => prompt.buffer.push(c),
        Message::InputBackspace => {
            prompt.buffer.pop();
        }
        Message::InputClear => prompt.buffer.clear(),
        Message::Activate => return prompt_submit(state),
        Message::Back => return UpdateResult::message(Message::PromptCancel),
        _ => {}
    }
    UpdateResult::none()
}

pub(crate) fn prompt_submit(state: &mut AppState) -> UpdateResult {
    let Some(prompt) = state.prompt.take() else {
        return UpdateResult::none();
    };
    state.ui_mode = UiMode::Normal;

    let value = prompt.buffer.trim().to_string();
    if value.is_empty() {
        state.toasts.error(format!("{} cannot be empty", prompt.title));
        return UpdateResult::none();
    }
    let mutation = match prompt.purpose {
        PromptPurpose::Username => Mutation::UpdateProfile { username: value },
        PromptPurpose::AvatarPath => {
            let path = PathBuf::from(value);
            if !path.is_file() {
                state
                    .toasts
                    .error(format!("No such file: {}", path.display()));
                return UpdateResult::none();
            }
            Mutation::UpdateAvatar { path }
        }
        PromptPurpose::WebhookMessage { applet } => Mutation::TriggerWebhook {
            applet,
            message: value,
        },
    };
    UpdateResult::action(UpdateAction::Mutate(mutation))
}

// ─────────────────────────────────────────────────────────
// Account mutation results
// ─────────────────────────────────────────────────────────

fn end_session(state: &mut AppState) -> UpdateResult {
    state.clear_account_data();
    state.route = Route::Home;
    state.cursors.navigation = 0;
    UpdateResult::action(UpdateAction::Batch(vec![
        UpdateAction::CloseLogStream,
        UpdateAction::ClearSession,
    ]))
}

pub(crate) fn account_mutation_done(
    state: &mut AppState,
    mutation: Mutation,
    result: Result<String, ApiFailure>,
) -> UpdateResult {
    match (mutation, result) {
        (Mutation::Logout, result) => {
            if let Err(failure) = &result {
                warn!("Logout request failed, dropping the session anyway: {}", failure);
            }
            state.toasts.info("Signed out");
            end_session(state)
        }
        (Mutation::DeleteProfile, Ok(message)) => {
            notify_success(state, message, "Account deleted");
            end_session(state)
        }
        (Mutation::CreateAuthorization(exchange), Ok(message)) => {
            notify_success(state, message, &format!("{} connected", exchange.authenticator));
            if let Some(wizard) = state.wizard.as_mut() {
                wizard.authorized();
                state.ui_mode = UiMode::Wizard;
            }
            UpdateResult::maybe(fetch_all(
                state,
                [QueryKey::ServiceAuthorizations, QueryKey::Authorizations],
            ))
        }
        (Mutation::CreateAuthorization(_), Err(failure)) => {
            if let Some(wizard) = state.wizard.as_mut() {
                wizard.authorization_failed();
                state.ui_mode = UiMode::Wizard;
            }
            UpdateResult::maybe(handle_failure(state, &failure))
        }
        (Mutation::DeleteAuthorization { name }, Ok(message)) => {
            notify_success(state, message, &format!("{name} disconnected"));
            UpdateResult::maybe(fetch_all(
                state,
                [QueryKey::Authorizations, QueryKey::ServiceAuthorizations],
            ))
        }
        (Mutation::UpdateProfile { .. }, Ok(message)) => {
            notify_success(state, message, "Profile updated");
            UpdateResult::maybe(fetch(state, QueryKey::Profile))
        }
        (Mutation::UpdateAvatar { .. }, Ok(message)) => {
            notify_success(state, message, "Avatar updated");
            UpdateResult::maybe(fetch(state, QueryKey::Avatar))
        }
        (Mutation::TriggerWebhook { applet, .. }, Ok(message)) => {
            notify_success(state, message, &format!("Webhook of {applet} triggered"));
            UpdateResult::none()
        }
        (_, Err(failure)) => UpdateResult::maybe(handle_failure(state, &failure)),
        (mutation, Ok(_)) => {
            warn!("Unexpected account mutation result: {:?}", mutation);
            UpdateResult::none()
        }
    }
}
