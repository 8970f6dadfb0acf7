//! Page handlers: navigation, list pages, query and mutation results

use area_core::{About, ApiFailure, Applet};
use tracing::debug;

use crate::message::{Message, QueryData};
use crate::query::{Query, Ticket};
use crate::state::{
    AppPhase, AppState, AppletDetailState, ConfirmAction, ConfirmDialogState, LogStreamStatus,
    Route, UiMode,
};

use super::failure::handle_failure;
use super::{auth, builder, Mutation, QueryKey, UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────

/// Take a ticket for `key` and build the fetch action.
///
/// Detail queries are only issued while that applet's page is open.
pub(crate) fn fetch(state: &mut AppState, key: QueryKey) -> Option<UpdateAction> {
    let ticket = match &key {
        QueryKey::ServiceAuthorizations => state.service_authorizations.begin(),
        QueryKey::Authorizations => state.authorizations.begin(),
        QueryKey::Applets => state.applets.begin(),
        QueryKey::Store => state.store.begin(),
        QueryKey::Draft(_) => state.draft.begin(),
        QueryKey::Profile => state.profile.begin(),
        QueryKey::Avatar => state.avatar.begin(),
        QueryKey::Applet { id } => state.detail.as_mut().filter(|d| &d.id == id)?.applet.begin(),
        QueryKey::AppletReactions { id } => state
            .detail
            .as_mut()
            .filter(|d| &d.id == id)?
            .reactions
            .begin(),
        QueryKey::UsageReactions { id } => {
            state.usage_reactions.entry(id.clone()).or_default().begin()
        }
    };
    Some(UpdateAction::Fetch { key, ticket })
}

/// Fetch several keys at once.
pub(crate) fn fetch_all(
    state: &mut AppState,
    keys: impl IntoIterator<Item = QueryKey>,
) -> Option<UpdateAction> {
    let actions: Vec<UpdateAction> = keys.into_iter().filter_map(|key| fetch(state, key)).collect();
    UpdateAction::batch(actions)
}

fn resolve<T>(
    query: &mut Query<T>,
    ticket: Ticket,
    result: Result<QueryData, ApiFailure>,
    extract: impl FnOnce(QueryData) -> Option<T>,
) -> bool {
    let result = result.and_then(|data| {
        extract(data).ok_or_else(|| ApiFailure::Decode("unexpected payload".to_string()))
    });
    query.resolve(ticket, result)
}

pub(crate) fn query_loaded(
    state: &mut AppState,
    key: QueryKey,
    ticket: Ticket,
    result: Result<QueryData, ApiFailure>,
) -> UpdateResult {
    let failure = result.as_ref().err().cloned();
    let applets_listed = key == QueryKey::Applets && failure.is_none();

    let applied = match key {
        QueryKey::ServiceAuthorizations => {
            resolve(&mut state.service_authorizations, ticket, result, |d| match d {
                QueryData::ServiceAuthorizations(v) => Some(v),
                _ => None,
            })
        }
        QueryKey::Authorizations => resolve(&mut state.authorizations, ticket, result, |d| match d {
            QueryData::Authorizations(v) => Some(v),
            _ => None,
        }),
        QueryKey::Applets => resolve(&mut state.applets, ticket, result, |d| match d {
            QueryData::Applets(v) => Some(v),
            _ => None,
        }),
        QueryKey::Store => resolve(&mut state.store, ticket, result, |d| match d {
            QueryData::Store(v) => Some(v),
            _ => None,
        }),
        QueryKey::Draft(_) => resolve(&mut state.draft, ticket, result, |d| match d {
            QueryData::Draft(v) => Some(v),
            _ => None,
        }),
        QueryKey::Profile => resolve(&mut state.profile, ticket, result, |d| match d {
            QueryData::Profile(v) => Some(v),
            _ => None,
        }),
        QueryKey::Avatar => resolve(&mut state.avatar, ticket, result, |d| match d {
            QueryData::Avatar(v) => Some(v),
            _ => None,
        }),
        QueryKey::Applet { id } => match state.detail.as_mut().filter(|d| d.id == id) {
            Some(detail) => resolve(&mut detail.applet, ticket, result, |d| match d {
                QueryData::Applet(v) => Some(v),
                _ => None,
            }),
            None => false,
        },
        QueryKey::AppletReactions { id } => match state.detail.as_mut().filter(|d| d.id == id) {
            Some(detail) => resolve(&mut detail.reactions, ticket, result, |d| match d {
                QueryData::AppletReactions(v) => Some(v),
                _ => None,
            }),
            None => false,
        },
        QueryKey::UsageReactions { id } => match state.usage_reactions.get_mut(&id) {
            Some(query) => resolve(query, ticket, result, |d| match d {
                QueryData::AppletReactions(v) => Some(v),
                _ => None,
            }),
            None => false,
        },
    };

    if !applied {
        debug!("Dropped stale query answer (ticket {})", ticket);
        return UpdateResult::none();
    }
    clamp_cursors(state);

    match failure {
        Some(failure) => UpdateResult::maybe(handle_failure(state, &failure)),
        None if applets_listed && state.route == Route::Profile => {
            UpdateResult::maybe(fetch_usage(state))
        }
        None => UpdateResult::none(),
    }
}

/// Fetch the reactions of every listed applet for the usage chart.
fn fetch_usage(state: &mut AppState) -> Option<UpdateAction> {
    let ids: Vec<String> = state
        .applets
        .data()
        .map(|applets| applets.iter().map(|a| a.id.clone()).collect())
        .unwrap_or_default();
    state.usage_reactions.retain(|id, _| ids.contains(id));
    fetch_all(state, ids.into_iter().map(|id| QueryKey::UsageReactions { id }))
}

fn clamp_cursors(state: &mut AppState) {
    let clamp = |cursor: &mut usize, len: usize| {
        if *cursor >= len {
            *cursor = len.saturating_sub(1);
        }
    };
    let applets = state.applets.data().map_or(0, Vec::len);
    let store = state.store.data().map_or(0, Vec::len);
    let authorizations = state.authorization_entries().len();
    let rows = state.overview_rows();
    clamp(&mut state.cursors.applets, applets);
    clamp(&mut state.cursors.explore, store);
    clamp(&mut state.cursors.authorizations, authorizations);
    clamp(&mut state.cursors.overview, rows);
}

// ─────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────

/// Queries backing a page.
fn route_keys(route: &Route) -> Vec<QueryKey> {
    match route {
        Route::Home => Vec::new(),
        Route::Applets => vec![QueryKey::Applets],
        Route::AppletDetail { id } => vec![
            QueryKey::Applet { id: id.clone() },
            QueryKey::AppletReactions { id: id.clone() },
        ],
        Route::Explore => vec![QueryKey::Store],
        Route::Profile => vec![QueryKey::Profile, QueryKey::Avatar, QueryKey::Applets],
        Route::Authenticators => vec![QueryKey::Authorizations],
        Route::CreateApplet | Route::Submit => {
            vec![QueryKey::Draft(Default::default()), QueryKey::ServiceAuthorizations]
        }
    }
}

pub(crate) fn navigate(state: &mut AppState, route: Route) -> UpdateResult {
    if route.requires_session() && !state.signed_in {
        state.toasts.info("Sign in to continue");
        return auth::open_sign_in(state);
    }
    if route == Route::Submit && !state.draft.data().is_some_and(|d| d.is_complete()) {
        state.toasts.error("Add an action and at least one reaction first");
        return UpdateResult::none();
    }

    let mut actions = Vec::new();
    let leaving_detail = state.detail.is_some()
        && !matches!(&route, Route::AppletDetail { id } if state.detail.as_ref().is_some_and(|d| &d.id == id));
    if leaving_detail {
        state.detail = None;
        actions.push(UpdateAction::CloseLogStream);
    }

    if let Route::AppletDetail { id } = &route {
        if state.detail.is_none() {
            state.detail = Some(AppletDetailState::new(id.clone(), state.settings.ui.log_lines));
            actions.push(UpdateAction::OpenLogStream {
                applet_id: id.clone(),
            });
        }
    }

    if let Some(index) = Route::navigation().iter().position(|r| r == &route) {
        state.cursors.navigation = index;
    }
    state.route = route;
    state.ui_mode = UiMode::Normal;

    let keys = route_keys(&state.route);
    actions.extend(fetch_all(state, keys));
    UpdateResult::maybe(UpdateAction::batch(actions))
}

pub(crate) fn refresh(state: &mut AppState) -> UpdateResult {
    if matches!(state.phase, AppPhase::Unavailable(_)) {
        state.phase = AppPhase::Bootstrapping;
        return UpdateResult::action(UpdateAction::Bootstrap);
    }
    if state.route.requires_session() && !state.signed_in {
        return UpdateResult::none();
    }
    let keys = route_keys(&state.route);
    UpdateResult::maybe(fetch_all(state, keys))
}

pub(crate) fn catalog_loaded(state: &mut AppState, about: About) -> UpdateResult {
    state.catalog = about;
    state.phase = AppPhase::Ready;
    if state.signed_in {
        let profile = fetch(state, QueryKey::Profile);
        let result = navigate(state, Route::Applets);
        let action = UpdateAction::batch(profile.into_iter().chain(result.action));
        return UpdateResult::maybe(action);
    }
    navigate(state, Route::Explore)
}

// ─────────────────────────────────────────────────────────
// List pages
// ─────────────────────────────────────────────────────────

fn move_cursor(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
    } else if down {
        *cursor = (*cursor + 1).min(len - 1);
    } else {
        *cursor = cursor.saturating_sub(1);
    }
}

pub(crate) fn page_input(state: &mut AppState, msg: Message) -> UpdateResult {
    let down = match msg {
        Message::MoveDown => true,
        Message::MoveUp => false,
        Message::Activate => return activate(state),
        Message::Back => return back(state),
        _ => return UpdateResult::none(),
    };

    match state.route {
        Route::Applets => {
            let len = state.applets.data().map_or(0, Vec::len);
            move_cursor(&mut state.cursors.applets, len, down);
        }
        Route::Explore => {
            let len = state.store.data().map_or(0, Vec::len);
            move_cursor(&mut state.cursors.explore, len, down);
        }
        Route::Authenticators => {
            let len = state.authorization_entries().len();
            move_cursor(&mut state.cursors.authorizations, len, down);
        }
        _ => {}
    }
    UpdateResult::none()
}

fn activate(state: &mut AppState) -> UpdateResult {
    match &state.route {
        Route::Home if !state.signed_in => auth::open_sign_in(state),
        Route::Home => navigate(state, Route::Applets),
        Route::Applets => match state.selected_applet() {
            Some(applet) => {
                let id = applet.id.clone();
                navigate(state, Route::AppletDetail { id })
            }
            None => UpdateResult::none(),
        },
        _ => UpdateResult::none(),
    }
}

fn back(state: &mut AppState) -> UpdateResult {
    match state.route {
        Route::AppletDetail { .. } => navigate(state, Route::Applets),
        _ => UpdateResult::none(),
    }
}

/// The applet a page command applies to: the open detail page, or the
/// selected card on the applets list.
fn target_applet(state: &AppState) -> Option<Applet> {
    match &state.route {
        Route::AppletDetail { .. } => state.detail.as_ref()?.applet.data().cloned(),
        Route::Applets => state.selected_applet().cloned(),
        _ => None,
    }
}

pub(crate) fn toggle_active(state: &mut AppState) -> UpdateResult {
    match target_applet(state) {
        Some(applet) => UpdateResult::action(UpdateAction::Mutate(Mutation::SetAppletActivity {
            id: applet.id,
            active: !applet.active,
        })),
        None => UpdateResult::none(),
    }
}

pub(crate) fn toggle_running(state: &mut AppState) -> UpdateResult {
    let Some(applet) = target_applet(state) else {
        return UpdateResult::none();
    };
    let mutation = if applet.status.is_running() {
        Mutation::StopApplet { id: applet.id }
    } else {
        Mutation::StartApplet { id: applet.id }
    };
    UpdateResult::action(UpdateAction::Mutate(mutation))
}

pub(crate) fn delete_selected(state: &mut AppState) -> UpdateResult {
    match state.route {
        Route::Applets | Route::AppletDetail { .. } => {
            let Some(applet) = target_applet(state) else {
                return UpdateResult::none();
            };
            state.confirm_dialog_state = Some(ConfirmDialogState::new(
                "Delete applet",
                format!("Delete \"{}\"? This cannot be undone.", applet.name),
                ConfirmAction::DeleteApplet { id: applet.id },
                state.ui_mode,
            ));
            state.ui_mode = UiMode::ConfirmDialog;
            UpdateResult::none()
        }
        Route::Authenticators => {
            let entries = state.authorization_entries();
            let Some(entry) = entries.get(state.cursors.authorizations) else {
                return UpdateResult::none();
            };
            if let Some(reason) = entry.removal_blocker() {
                state.toasts.error(reason);
                return UpdateResult::none();
            }
            UpdateResult::action(UpdateAction::Mutate(Mutation::DeleteAuthorization {
                name: entry.authorization.name.clone(),
            }))
        }
        Route::CreateApplet => builder::remove_selected(state),
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────

pub(crate) fn mutation_done(
    state: &mut AppState,
    mutation: Mutation,
    result: Result<String, ApiFailure>,
) -> UpdateResult {
    match mutation {
        Mutation::AddDraftArea(_) | Mutation::RemoveDraftArea(_) | Mutation::SubmitDraft(_) => {
            builder::draft_mutation_done(state, mutation, result)
        }
        Mutation::CreateAuthorization(_)
        | Mutation::DeleteAuthorization { .. }
        | Mutation::UpdateProfile { .. }
        | Mutation::UpdateAvatar { .. }
        | Mutation::DeleteProfile
        | Mutation::Logout
        | Mutation::TriggerWebhook { .. } => auth::account_mutation_done(state, mutation, result),
        Mutation::SetAppletActivity { id, .. }
        | Mutation::StartApplet { id }
        | Mutation::StopApplet { id } => match result {
            Ok(_) => {
                let keys = [QueryKey::Applets, QueryKey::Applet { id }];
                UpdateResult::maybe(fetch_all(state, keys))
            }
            Err(failure) => UpdateResult::maybe(handle_failure(state, &failure)),
        },
        Mutation::DeleteApplet { id } => match result {
            Ok(message) => {
                notify_success(state, message, "Applet deleted");
                let on_detail = state.detail.as_ref().is_some_and(|d| d.id == id);
                if on_detail {
                    return navigate(state, Route::Applets);
                }
                UpdateResult::maybe(fetch(state, QueryKey::Applets))
            }
            Err(failure) => UpdateResult::maybe(handle_failure(state, &failure)),
        },
    }
}

/// Success toast with the server message, or `fallback` if it sent none.
pub(crate) fn notify_success(state: &mut AppState, message: String, fallback: &str) {
    if message.trim().is_empty() {
        state.toasts.success(fallback);
    } else {
        state.toasts.success(message);
    }
}

// ─────────────────────────────────────────────────────────
// Live logs
// ─────────────────────────────────────────────────────────

pub(crate) fn log_frame(state: &mut AppState, applet_id: &str, text: &str) -> UpdateResult {
    if let Some(detail) = state.detail.as_mut().filter(|d| d.id == applet_id) {
        detail.logs.push_message(text);
        detail.stream = LogStreamStatus::Live;
    }
    UpdateResult::none()
}

pub(crate) fn log_stream_closed(
    state: &mut AppState,
    applet_id: &str,
    error: Option<String>,
) -> UpdateResult {
    if let Some(detail) = state.detail.as_mut().filter(|d| d.id == applet_id) {
        if let Some(error) = &error {
            state.toasts.error(format!("Log stream: {error}"));
        }
        detail.stream = LogStreamStatus::Closed(error);
    }
    UpdateResult::none()
}
