//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in:
//! - `pages`: navigation, page commands, query results and mutation results
//! - `builder`: draft overview, wizard and submit form
//! - `auth`: sign in, OAuth, prompts and account commands

use std::time::Instant;

use tracing::{debug, warn};

use area_core::{AreaType, DraftRemoval};

use crate::message::{Message, OAuthPurpose};
use crate::state::{AppPhase, AppState, ConfirmAction, Route, UiMode};
use crate::wizard::FormMenuKind;

use super::{auth, builder, keys::handle_key, pages, Mutation, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => {
            state.toasts.prune(Instant::now());
            UpdateResult::none()
        }

        Message::Navigate(route) => pages::navigate(state, route),
        Message::Refresh => pages::refresh(state),

        // ─────────────────────────────────────────────────────────
        // Input
        // ─────────────────────────────────────────────────────────
        msg @ (Message::MoveUp
        | Message::MoveDown
        | Message::SelectPrev
        | Message::SelectNext
        | Message::Activate
        | Message::Back
        | Message::FocusNext
        | Message::FocusPrev
        | Message::InputChar(_)
        | Message::InputBackspace
        | Message::InputClear) => dispatch_input(state, msg),

        // ─────────────────────────────────────────────────────────
        // Page commands
        // ─────────────────────────────────────────────────────────
        Message::ToggleActive => pages::toggle_active(state),
        Message::ToggleRunning => pages::toggle_running(state),
        Message::DeleteSelected => pages::delete_selected(state),
        Message::ClearDraft => builder::clear_draft(state),
        Message::OpenSignIn => auth::open_sign_in(state),
        Message::ToggleSignInMode => auth::toggle_sign_in_mode(state),
        Message::SignInExternal => auth::open_picker(state, OAuthPurpose::SignIn),
        Message::ConnectAuthenticator => auth::open_picker(state, OAuthPurpose::Connect),
        Message::EditUsername => auth::edit_username(state),
        Message::ChangeAvatar => auth::change_avatar(state),
        Message::TriggerWebhook => auth::trigger_webhook(state),
        Message::Logout => auth::logout(state),
        Message::DeleteAccount => auth::delete_account(state),
        Message::TogglePublic => builder::toggle_public(state),

        // ─────────────────────────────────────────────────────────
        // Bootstrap and remote data
        // ─────────────────────────────────────────────────────────
        Message::CatalogLoaded(about) => pages::catalog_loaded(state, about),
        Message::BootstrapFailed(reason) => {
            warn!("Bootstrap failed: {}", reason);
            state.toasts.error(format!("Server unavailable: {reason}"));
            state.phase = AppPhase::Unavailable(reason);
            UpdateResult::none()
        }
        Message::QueryLoaded {
            key,
            ticket,
            result,
        } => pages::query_loaded(state, key, ticket, result),
        Message::MutationDone { mutation, result } => pages::mutation_done(state, mutation, result),

        // ─────────────────────────────────────────────────────────
        // Authentication
        // ─────────────────────────────────────────────────────────
        Message::SignedIn => auth::signed_in(state),
        Message::SignInFailed(failure) => auth::sign_in_failed(state, failure),
        Message::OAuthFinished {
            purpose,
            authenticator,
            result,
        } => auth::oauth_finished(state, purpose, authenticator, result),

        // ─────────────────────────────────────────────────────────
        // Applet builder
        // ─────────────────────────────────────────────────────────
        Message::AddAction => builder::open_wizard(state, AreaType::Action),
        Message::AddReaction => builder::open_wizard(state, AreaType::Reaction),
        Message::FieldOptionsLoaded {
            service,
            field,
            endpoint,
            ticket,
            result,
        } => builder::options_loaded(state, &service, &field, &endpoint, ticket, result),
        Message::NextStep => builder::next_step(state),
        Message::OpenParameterMenu => builder::open_menu(state, FormMenuKind::AddParameter),
        Message::OpenComponentMenu => builder::open_menu(state, FormMenuKind::InsertComponent),
        Message::RemoveField => builder::remove_field(state),
        Message::CommitArea => builder::commit_area(state),

        // ─────────────────────────────────────────────────────────
        // Live logs
        // ─────────────────────────────────────────────────────────
        Message::LogFrame { applet_id, text } => pages::log_frame(state, &applet_id, &text),
        Message::LogStreamClosed { applet_id, error } => {
            pages::log_stream_closed(state, &applet_id, error)
        }

        // ─────────────────────────────────────────────────────────
        // Dialogs
        // ─────────────────────────────────────────────────────────
        Message::ConfirmDialogAccept => confirm_accept(state),
        Message::ConfirmDialogCancel => {
            if let Some(dialog) = state.confirm_dialog_state.take() {
                state.ui_mode = dialog.return_mode;
            }
            UpdateResult::none()
        }
        Message::PromptSubmit => auth::prompt_submit(state),
        Message::PromptCancel => {
            state.prompt = None;
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }
    }
}

/// Route an input message to the handler of the active mode.
fn dispatch_input(state: &mut AppState, msg: Message) -> UpdateResult {
    match state.ui_mode {
        UiMode::Wizard => builder::wizard_input(state, msg),
        UiMode::SignIn => auth::sign_in_input(state, msg),
        UiMode::Prompt => auth::prompt_input(state, msg),
        UiMode::Picker => auth::picker_input(state, msg),
        UiMode::OAuthPending => auth::oauth_pending_input(state, msg),
        UiMode::ConfirmDialog => {
            debug!("Ignoring {:?} while a dialog is open", msg);
            UpdateResult::none()
        }
        UiMode::Normal if state.route == Route::Submit => builder::submit_input(state, msg),
        UiMode::Normal if state.route == Route::CreateApplet => builder::overview_input(state, msg),
        UiMode::Normal => pages::page_input(state, msg),
    }
}

fn confirm_accept(state: &mut AppState) -> UpdateResult {
    let Some(dialog) = state.confirm_dialog_state.take() else {
        return UpdateResult::none();
    };
    state.ui_mode = dialog.return_mode;

    match dialog.action {
        ConfirmAction::RemoveDraftAction => UpdateResult::action(UpdateAction::Mutate(
            Mutation::RemoveDraftArea(DraftRemoval::Action),
        )),
        ConfirmAction::ClearDraft => builder::clear_draft_confirmed(state),
        ConfirmAction::DeleteApplet { id } => {
            UpdateResult::action(UpdateAction::Mutate(Mutation::DeleteApplet { id }))
        }
        ConfirmAction::DeleteAccount => {
            UpdateResult::action(UpdateAction::Mutate(Mutation::DeleteProfile))
        }
        ConfirmAction::UseWipArea { area } => builder::use_wip_area(state, &area),
    }
}
