//! Applet builder handlers: draft overview, wizard and submit form

use area_core::{field_label, ApiFailure, AreaType, DraftField, DraftRemoval, SelectOption};
use tracing::{debug, info};

use crate::message::{Message, OAuthPurpose};
use crate::query::Ticket;
use crate::state::{AppState, ConfirmAction, ConfirmDialogState, Route, SubmitField, UiMode};
use crate::wizard::{
    available_areas, available_services, FormMenuKind, OptionsRequest, Selection, Wizard,
    WizardStep, OAUTH_UNAVAILABLE,
};

use super::failure::handle_failure;
use super::pages::{fetch, navigate, notify_success};
use super::{Mutation, QueryKey, UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────
// Overview
// ─────────────────────────────────────────────────────────

pub(crate) fn overview_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let rows = state.overview_rows();
    let cursor = &mut state.cursors.overview;
    match msg {
        Message::MoveDown if rows > 0 => *cursor = (*cursor + 1).min(rows - 1),
        Message::MoveUp => *cursor = cursor.saturating_sub(1),
        Message::Activate => return next_step(state),
        Message::Back => return navigate(state, Route::Applets),
        _ => {}
    }
    UpdateResult::none()
}

pub(crate) fn open_wizard(state: &mut AppState, slot: AreaType) -> UpdateResult {
    if !state.signed_in {
        return navigate(state, Route::CreateApplet);
    }
    let draft = state.draft.data();
    match slot {
        AreaType::Action if draft.is_some_and(|d| d.has_action()) => {
            state.toasts.error("Remove the current action first");
            return UpdateResult::none();
        }
        AreaType::Reaction if !draft.is_some_and(|d| d.can_add_reaction()) => {
            state.toasts.error("Set the action before adding reactions");
            return UpdateResult::none();
        }
        _ => {}
    }

    info!("Opening applet builder for the {} slot", slot);
    state.wizard = Some(Wizard::new(slot));
    state.ui_mode = UiMode::Wizard;
    state.route = Route::CreateApplet;
    UpdateResult::maybe(fetch(state, QueryKey::ServiceAuthorizations))
}

/// Row under the cursor: the action first, then reactions.
pub(crate) fn remove_selected(state: &mut AppState) -> UpdateResult {
    let Some(draft) = state.draft.data() else {
        return UpdateResult::none();
    };
    let cursor = state.cursors.overview;

    if draft.has_action() && cursor == 0 {
        let message = if draft.reactions.is_empty() {
            "Remove the action?".to_string()
        } else {
            format!(
                "Removing the action also removes its {} reaction(s). Continue?",
                draft.reactions.len()
            )
        };
        state.confirm_dialog_state = Some(ConfirmDialogState::new(
            "Remove action",
            message,
            ConfirmAction::RemoveDraftAction,
            UiMode::Normal,
        ));
        state.ui_mode = UiMode::ConfirmDialog;
        return UpdateResult::none();
    }

    let index = cursor - usize::from(draft.has_action());
    if index >= draft.reactions.len() {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::Mutate(Mutation::RemoveDraftArea(
        DraftRemoval::Reaction(index),
    )))
}

pub(crate) fn clear_draft(state: &mut AppState) -> UpdateResult {
    if state.draft.data().map_or(true, |d| d.is_empty()) {
        return UpdateResult::none();
    }
    state.confirm_dialog_state = Some(ConfirmDialogState::new(
        "Clear applet",
        "Remove the action and every reaction?",
        ConfirmAction::ClearDraft,
        UiMode::Normal,
    ));
    state.ui_mode = UiMode::ConfirmDialog;
    UpdateResult::none()
}

pub(crate) fn clear_draft_confirmed(state: &mut AppState) -> UpdateResult {
    let removal = match state.draft.data() {
        Some(draft) if draft.has_action() => DraftRemoval::Action,
        Some(draft) if !draft.reactions.is_empty() => DraftRemoval::AllReactions,
        _ => return UpdateResult::none(),
    };
    UpdateResult::action(UpdateAction::Mutate(Mutation::RemoveDraftArea(removal)))
}

pub(crate) fn next_step(state: &mut AppState) -> UpdateResult {
    navigate(state, Route::Submit)
}

// ─────────────────────────────────────────────────────────
// Wizard
// ─────────────────────────────────────────────────────────

fn options_actions(service: &str, requests: Vec<OptionsRequest>) -> Option<UpdateAction> {
    UpdateAction::batch(requests.into_iter().map(|request| UpdateAction::FetchOptions {
        service: service.to_string(),
        field: request.field,
        endpoint: request.endpoint,
        ticket: request.ticket,
    }))
}

fn close_wizard(state: &mut AppState) -> UpdateResult {
    state.wizard = None;
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub(crate) fn wizard_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let Some(wizard) = state.wizard.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    if wizard.is_committing() && !matches!(msg, Message::Back) {
        return UpdateResult::none();
    }

    match wizard.step() {
        WizardStep::ChooseService => choose_service_input(state, msg),
        WizardStep::AwaitingAuthorization { .. } => match msg {
            Message::Back => {
                if let Some(wizard) = state.wizard.as_mut() {
                    wizard.authorization_failed();
                }
                state.oauth = None;
                UpdateResult::action(UpdateAction::CancelOAuth)
            }
            _ => UpdateResult::none(),
        },
        WizardStep::ChooseArea { .. } => choose_area_input(state, msg),
        WizardStep::ChooseAreaSettings(_) => settings_input(state, msg),
    }
}

fn choose_service_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let dev_mode = state.dev_mode();
    let services = &state.catalog.server.services;
    let Some(wizard) = state.wizard.as_mut() else {
        return UpdateResult::none();
    };
    let listed = available_services(services, wizard.slot(), dev_mode, wizard.filter()).len();

    match msg {
        Message::MoveUp => wizard.move_cursor(-1, listed),
        Message::MoveDown => wizard.move_cursor(1, listed),
        Message::InputChar(c) => wizard.push_filter(c),
        Message::InputBackspace => wizard.pop_filter(),
        Message::Activate => {
            let authorizations = state.service_authorizations.data().cloned().unwrap_or_default();
            let selection = wizard.select_service(services, &authorizations, dev_mode);
            return handle_selection(state, selection);
        }
        Message::Back => return close_wizard(state),
        _ => {}
    }
    UpdateResult::none()
}

fn choose_area_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let dev_mode = state.dev_mode();
    let components = state.draft_components();
    let services = &state.catalog.server.services;
    let Some(wizard) = state.wizard.as_mut() else {
        return UpdateResult::none();
    };
    let listed = wizard
        .service()
        .and_then(|name| area_core::find_service(services, name))
        .map_or(0, |service| available_areas(service, wizard.slot(), dev_mode).len());

    match msg {
        Message::MoveUp => wizard.move_cursor(-1, listed),
        Message::MoveDown => wizard.move_cursor(1, listed),
        Message::Activate => {
            let selection = wizard.select_area(services, dev_mode, &components);
            return handle_selection(state, selection);
        }
        Message::Back => {
            wizard.back();
        }
        _ => {}
    }
    UpdateResult::none()
}

fn settings_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let Some(form) = state.wizard.as_mut().and_then(Wizard::form_mut) else {
        return UpdateResult::none();
    };

    if form.menu().is_some() {
        let requests = match msg {
            Message::MoveUp | Message::FocusPrev => {
                form.menu_move(-1);
                Vec::new()
            }
            Message::MoveDown | Message::FocusNext => {
                form.menu_move(1);
                Vec::new()
            }
            Message::Activate => form.menu_choose(),
            Message::Back => {
                form.close_menu();
                Vec::new()
            }
            _ => Vec::new(),
        };
        let service = form.service().to_string();
        return UpdateResult::maybe(options_actions(&service, requests));
    }

    let requests = match msg {
        Message::MoveUp | Message::FocusPrev => {
            form.focus_prev();
            Vec::new()
        }
        Message::MoveDown | Message::FocusNext => {
            form.focus_next();
            Vec::new()
        }
        Message::SelectPrev => form.select(-1),
        Message::SelectNext => form.select(1),
        Message::InputChar(c) => form.type_char(c),
        Message::InputBackspace => form.backspace(),
        Message::InputClear => form.clear_focused(),
        Message::Activate => return commit_area(state),
        Message::Back => {
            if let Some(wizard) = state.wizard.as_mut() {
                wizard.back();
            }
            return UpdateResult::none();
        }
        _ => Vec::new(),
    };
    let service = form.service().to_string();
    UpdateResult::maybe(options_actions(&service, requests))
}

fn handle_selection(state: &mut AppState, selection: Selection) -> UpdateResult {
    match selection {
        Selection::Nothing | Selection::Advanced => UpdateResult::none(),
        Selection::Unavailable => {
            state.toasts.error(OAUTH_UNAVAILABLE);
            UpdateResult::none()
        }
        Selection::Authorize(authenticator) => {
            let Some(service) = state.wizard.as_ref().and_then(Wizard::service) else {
                return UpdateResult::none();
            };
            let purpose = OAuthPurpose::WizardService {
                service: service.to_string(),
            };
            state.oauth = Some(purpose.clone());
            UpdateResult::action(UpdateAction::StartOAuth {
                authenticator,
                purpose,
            })
        }
        Selection::ConfirmWip { area } => {
            state.confirm_dialog_state = Some(ConfirmDialogState::new(
                "Work in progress",
                format!("\"{area}\" is still in development and may not work. Use it anyway?"),
                ConfirmAction::UseWipArea { area },
                UiMode::Wizard,
            ));
            state.ui_mode = UiMode::ConfirmDialog;
            UpdateResult::none()
        }
        Selection::Commit(request) => {
            info!("Adding {} {} to the draft", request.area_type, request.area_item);
            UpdateResult::action(UpdateAction::Mutate(Mutation::AddDraftArea(request)))
        }
        Selection::Configure(requests) => {
            let service = state
                .wizard
                .as_ref()
                .and_then(Wizard::service)
                .unwrap_or_default()
                .to_string();
            UpdateResult::maybe(options_actions(&service, requests))
        }
    }
}

pub(crate) fn use_wip_area(state: &mut AppState, area: &str) -> UpdateResult {
    let components = state.draft_components();
    let services = &state.catalog.server.services;
    let Some(wizard) = state.wizard.as_mut() else {
        return UpdateResult::none();
    };
    let selection = wizard.confirm_wip(services, area, &components);
    handle_selection(state, selection)
}

pub(crate) fn open_menu(state: &mut AppState, kind: FormMenuKind) -> UpdateResult {
    if let Some(form) = state.wizard.as_mut().and_then(Wizard::form_mut) {
        if !form.open_menu(kind) {
            let reason = match kind {
                FormMenuKind::AddParameter => "No optional parameter left",
                FormMenuKind::InsertComponent => "No component can be inserted here",
            };
            state.toasts.info(reason);
        }
    }
    UpdateResult::none()
}

pub(crate) fn remove_field(state: &mut AppState) -> UpdateResult {
    if let Some(form) = state.wizard.as_mut().and_then(Wizard::form_mut) {
        if let Some(name) = form.focused_field() {
            if !form.remove_optional(&name) {
                debug!("Field {} cannot be removed", name);
            }
        }
    }
    UpdateResult::none()
}

pub(crate) fn commit_area(state: &mut AppState) -> UpdateResult {
    let Some(wizard) = state.wizard.as_mut() else {
        return UpdateResult::none();
    };
    if let Some(request) = wizard.commit() {
        info!("Adding {} {} to the draft", request.area_type, request.area_item);
        return UpdateResult::action(UpdateAction::Mutate(Mutation::AddDraftArea(request)));
    }

    let missing: Vec<String> = wizard
        .form()
        .map(|form| form.missing_required().into_iter().map(field_label).collect())
        .unwrap_or_default();
    if !missing.is_empty() {
        state
            .toasts
            .error(format!("Missing required fields: {}", missing.join(", ")));
    }
    UpdateResult::none()
}

pub(crate) fn options_loaded(
    state: &mut AppState,
    service: &str,
    field: &str,
    endpoint: &str,
    ticket: Ticket,
    result: Result<Vec<SelectOption>, ApiFailure>,
) -> UpdateResult {
    let Some(form) = state.wizard.as_mut().and_then(Wizard::form_mut) else {
        return UpdateResult::none();
    };
    // Answer for a form that was closed since
    if form.service() != service {
        debug!("Dropping {} options of service {}", field, service);
        return UpdateResult::none();
    }
    let failure = result.as_ref().err().cloned();
    let applied = form.options_loaded(
        field,
        endpoint,
        ticket,
        result.map_err(|failure| failure.notification_text()),
    );
    match failure {
        Some(failure) if applied => UpdateResult::maybe(handle_failure(state, &failure)),
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────
// Submit form
// ─────────────────────────────────────────────────────────

pub(crate) fn toggle_public(state: &mut AppState) -> UpdateResult {
    state.submit_form.public = !state.submit_form.public;
    UpdateResult::none()
}

pub(crate) fn submit_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let form = &mut state.submit_form;
    if form.submitting {
        return UpdateResult::none();
    }
    match msg {
        Message::FocusNext | Message::MoveDown => form.focus = form.focus.next(),
        Message::FocusPrev | Message::MoveUp => form.focus = form.focus.prev(),
        Message::InputChar(c) => match form.focus {
            SubmitField::Name => form.name.push(c),
            SubmitField::Description => form.description.push(c),
            SubmitField::Visibility if c == ' ' => form.public = !form.public,
            SubmitField::Visibility => {}
        },
        Message::InputBackspace => match form.focus {
            SubmitField::Name => {
                form.name.pop();
            }
            SubmitField::Description => {
                form.description.pop();
            }
            SubmitField::Visibility => {}
        },
        Message::SelectPrev | Message::SelectNext if form.focus == SubmitField::Visibility => {
            form.public = !form.public;
        }
        Message::Activate => {
            if !form.is_valid() {
                state.toasts.error("Name and description are required");
                return UpdateResult::none();
            }
            form.submitting = true;
            let request = form.request();
            return UpdateResult::action(UpdateAction::Mutate(Mutation::SubmitDraft(request)));
        }
        Message::Back => return navigate(state, Route::CreateApplet),
        _ => {}
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Draft mutation results
// ─────────────────────────────────────────────────────────

pub(crate) fn draft_mutation_done(
    state: &mut AppState,
    mutation: Mutation,
    result: Result<String, ApiFailure>,
) -> UpdateResult {
    let draft_key = || QueryKey::Draft(DraftField::All);

    match (mutation, result) {
        (Mutation::AddDraftArea(request), Ok(message)) => {
            notify_success(state, message, &format!("Added {}", request.area_item));
            state.wizard = None;
            state.ui_mode = UiMode::Normal;
            state.route = Route::CreateApplet;
            UpdateResult::maybe(fetch(state, draft_key()))
        }
        (Mutation::AddDraftArea(_), Err(failure)) => {
            let has_form = state.wizard.as_ref().and_then(Wizard::form).is_some();
            if let Some(wizard) = state.wizard.as_mut() {
                wizard.commit_failed(&failure);
            }
            if has_form && matches!(failure, ApiFailure::InvalidFields(_)) {
                for name in failure.invalid_fields() {
                    state.toasts.error(format!(
                        "Please enter a valid value for {}.",
                        field_label(name)
                    ));
                }
                return UpdateResult::none();
            }
            UpdateResult::maybe(handle_failure(state, &failure))
        }
        (Mutation::RemoveDraftArea(_), Ok(_)) => UpdateResult::maybe(fetch(state, draft_key())),
        (Mutation::SubmitDraft(_), Ok(message)) => {
            notify_success(state, message, "Applet created");
            state.submit_form = Default::default();
            let draft = fetch(state, draft_key());
            let result = navigate(state, Route::Applets);
            UpdateResult::maybe(UpdateAction::batch(draft.into_iter().chain(result.action)))
        }
        (Mutation::SubmitDraft(_), Err(failure)) => {
            state.submit_form.submitting = false;
            UpdateResult::maybe(handle_failure(state, &failure))
        }
        (_, Err(failure)) => {
            // A failed removal may still have changed the server draft
            let refetch = fetch(state, draft_key());
            let handled = handle_failure(state, &failure);
            UpdateResult::maybe(UpdateAction::batch(refetch.into_iter().chain(handled)))
        }
        (mutation, Ok(_)) => {
            debug!("Unexpected draft mutation result: {:?}", mutation);
            UpdateResult::none()
        }
    }
}
