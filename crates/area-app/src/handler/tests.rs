//! Tests for handler module

use std::collections::BTreeMap;

use super::*;
use crate::config::Settings;
use crate::input_key::InputKey;
use crate::message::{Message, QueryData};
use crate::state::{AppPhase, AppState, ConfirmAction, Route, UiMode};
use crate::wizard::{FieldInput, WizardStep, OAUTH_UNAVAILABLE};
use area_api::test_utils::{test_applet, test_area, test_authenticator, test_service};
use area_api::AuthorizationCodeReceived;
use area_core::{
    ApiFailure, Area, AreaType, Draft, FieldKind, FieldSchema, SelectOption, Service,
    SettingValue,
};

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

/// Run a message and every follow-up message, collecting the actions with
/// batches flattened.
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    fn flatten(action: UpdateAction, out: &mut Vec<UpdateAction>) {
        match action {
            UpdateAction::Batch(actions) => actions.into_iter().for_each(|a| flatten(a, out)),
            other => out.push(other),
        }
    }

    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(msg) = next.take() {
        let result = update(state, msg);
        if let Some(action) = result.action {
            flatten(action, &mut actions);
        }
        next = result.message;
    }
    actions
}

fn key(state: &mut AppState, key: InputKey) -> Vec<UpdateAction> {
    run(state, Message::Key(key))
}

fn draft_area(area_type: AreaType, service: &str, name: &str) -> Area {
    Area {
        id: format!("{service}-{name}"),
        area_type,
        service: service.to_string(),
        name: name.to_string(),
        store: BTreeMap::new(),
    }
}

fn set_draft(state: &mut AppState, draft: Draft) {
    let ticket = state.draft.begin();
    assert!(state.draft.resolve(ticket, Ok(draft)));
}

fn set_authorized(state: &mut AppState, service: &str, authorized: bool) {
    let mut map = state.service_authorizations.data().cloned().unwrap_or_default();
    map.insert(service.to_string(), authorized);
    let ticket = state.service_authorizations.begin();
    assert!(state.service_authorizations.resolve(ticket, Ok(map)));
}

/// Signed-in state on the builder page with the given catalog.
fn builder_state(services: Vec<Service>) -> AppState {
    let mut state = AppState::new(Settings::default(), true);
    state.phase = AppPhase::Ready;
    state.catalog.server.services = services;
    state.route = Route::CreateApplet;
    set_draft(&mut state, Draft::default());
    state
}

fn ping_service() -> Service {
    test_service("A", vec![test_area("ping", vec![])], vec![])
}

fn message_service() -> Service {
    test_service(
        "A",
        vec![test_area("ping", vec![])],
        vec![test_area(
            "say",
            vec![("message", FieldSchema::new(FieldKind::Text).required())],
        )],
    )
}

fn latest_toast(state: &AppState) -> String {
    state
        .toasts
        .latest()
        .map(|toast| toast.text.clone())
        .unwrap_or_default()
}

fn is_draft_fetch(action: &UpdateAction) -> bool {
    matches!(
        action,
        UpdateAction::Fetch {
            key: QueryKey::Draft(_),
            ..
        }
    )
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new(Settings::default(), false);
    assert!(!state.should_quit());

    update(&mut state, Message::Quit);

    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
}

#[test]
fn test_q_key_produces_quit_message() {
    let mut state = AppState::new(Settings::default(), false);
    state.phase = AppPhase::Ready;

    let result = handle_key(&state, InputKey::Char('q'));

    assert!(matches!(result, Some(Message::Quit)));
}

#[test]
fn test_catalog_loaded_signed_in_goes_to_applets() {
    let mut state = AppState::new(Settings::default(), true);
    let mut about = area_core::About::default();
    about.server.services = vec![ping_service()];

    let actions = run(&mut state, Message::CatalogLoaded(about));

    assert_eq!(state.phase, AppPhase::Ready);
    assert_eq!(state.route, Route::Applets);
    assert_eq!(state.services().len(), 1);
    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::Fetch {
            key: QueryKey::Profile,
            ..
        }
    )));
}

#[test]
fn test_catalog_loaded_anonymous_goes_to_explore() {
    let mut state = AppState::new(Settings::default(), false);

    let actions = run(&mut state, Message::CatalogLoaded(Default::default()));

    assert_eq!(state.route, Route::Explore);
    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::Fetch {
            key: QueryKey::Store,
            ..
        }
    )));
}

#[test]
fn test_bootstrap_failure_marks_unavailable() {
    let mut state = AppState::new(Settings::default(), false);

    update(&mut state, Message::BootstrapFailed("gave up".to_string()));

    assert_eq!(state.phase, AppPhase::Unavailable("gave up".to_string()));
    assert!(latest_toast(&state).contains("gave up"));

    let actions = run(&mut state, Message::Refresh);

    assert_eq!(state.phase, AppPhase::Bootstrapping);
    assert!(matches!(actions.as_slice(), [UpdateAction::Bootstrap]));
}

#[test]
fn test_private_page_requires_sign_in() {
    let mut state = AppState::new(Settings::default(), false);
    state.phase = AppPhase::Ready;

    let actions = run(&mut state, Message::Navigate(Route::Applets));

    assert!(actions.is_empty());
    assert_eq!(state.ui_mode, UiMode::SignIn);
    assert_eq!(state.route, Route::Home);
}

// ─────────────────────────────────────────────────────────
// Queries and failures
// ─────────────────────────────────────────────────────────

#[test]
fn test_stale_query_answer_is_dropped() {
    let mut state = builder_state(vec![]);
    let first = state.applets.begin();
    let second = state.applets.begin();

    update(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Applets,
            ticket: second,
            result: Ok(QueryData::Applets(vec![test_applet("2", "new")])),
        },
    );
    update(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Applets,
            ticket: first,
            result: Ok(QueryData::Applets(vec![test_applet("1", "old")])),
        },
    );

    let applets = state.applets.data().cloned().unwrap_or_default();
    assert_eq!(applets.len(), 1);
    assert_eq!(applets[0].name, "new");
}

#[test]
fn test_profile_counts_reaction_services_in_usage() {
    let mut state = builder_state(vec![]);
    let actions = run(&mut state, Message::Navigate(Route::Profile));
    let applets_ticket = actions
        .iter()
        .find_map(|a| match a {
            UpdateAction::Fetch {
                key: QueryKey::Applets,
                ticket,
            } => Some(*ticket),
            _ => None,
        })
        .expect("applets fetch");

    let actions = run(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Applets,
            ticket: applets_ticket,
            result: Ok(QueryData::Applets(vec![
                test_applet("1", "first"),
                test_applet("2", "second"),
            ])),
        },
    );
    let usage: Vec<(String, Ticket)> = actions
        .iter()
        .filter_map(|a| match a {
            UpdateAction::Fetch {
                key: QueryKey::UsageReactions { id },
                ticket,
            } => Some((id.clone(), *ticket)),
            _ => None,
        })
        .collect();
    assert_eq!(
        usage.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
        vec!["1", "2"]
    );

    run(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::UsageReactions {
                id: "1".to_string(),
            },
            ticket: usage[0].1,
            result: Ok(QueryData::AppletReactions(vec![
                draft_area(AreaType::Reaction, "discord", "post"),
                draft_area(AreaType::Reaction, "timer", "wait"),
            ])),
        },
    );

    assert_eq!(
        state.usage_by_service(),
        vec![("discord".to_string(), 1), ("timer".to_string(), 3)]
    );
}

#[test]
fn test_applets_page_does_not_fetch_usage() {
    let mut state = builder_state(vec![]);
    state.route = Route::Applets;
    let ticket = state.applets.begin();

    let actions = run(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Applets,
            ticket,
            result: Ok(QueryData::Applets(vec![test_applet("1", "first")])),
        },
    );

    assert!(actions.is_empty());
}

#[test]
fn test_unauthorized_clears_session_and_goes_home() {
    let mut state = builder_state(vec![]);
    state.route = Route::Applets;
    let ticket = state.applets.begin();

    let actions = run(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Applets,
            ticket,
            result: Err(ApiFailure::Unauthorized),
        },
    );

    assert!(actions.iter().any(|a| matches!(a, UpdateAction::ClearSession)));
    assert_eq!(state.route, Route::Home);
    assert!(!state.signed_in);
    assert!(state.draft.data().is_none());
}

#[test]
fn test_other_failures_only_notify() {
    let mut state = builder_state(vec![]);
    let ticket = state.store.begin();

    let actions = run(
        &mut state,
        Message::QueryLoaded {
            key: QueryKey::Store,
            ticket,
            result: Err(ApiFailure::Transport("timed out".to_string())),
        },
    );

    assert!(actions.is_empty());
    assert!(state.signed_in);
    assert_eq!(latest_toast(&state), "Network error: timed out");
}

// ─────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────

#[test]
fn test_reaction_requires_action() {
    let mut state = builder_state(vec![message_service()]);

    run(&mut state, Message::AddReaction);

    assert!(state.wizard.is_none());
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_next_step_needs_action_and_reaction() {
    let mut state = builder_state(vec![message_service()]);
    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![],
        },
    );

    run(&mut state, Message::NextStep);
    assert_eq!(state.route, Route::CreateApplet);

    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![draft_area(AreaType::Reaction, "A", "say")],
        },
    );
    run(&mut state, Message::NextStep);
    assert_eq!(state.route, Route::Submit);
}

#[test]
fn test_unavailable_service_notifies_without_oauth() {
    let mut state = builder_state(vec![ping_service()]);
    set_authorized(&mut state, "A", false);

    run(&mut state, Message::AddAction);
    assert_eq!(state.ui_mode, UiMode::Wizard);

    let actions = key(&mut state, InputKey::Enter);

    assert!(!actions
        .iter()
        .any(|a| matches!(a, UpdateAction::StartOAuth { .. })));
    assert_eq!(latest_toast(&state), OAUTH_UNAVAILABLE);
    let wizard = state.wizard.as_ref().map(|w| w.step().clone());
    assert!(matches!(wizard, Some(WizardStep::ChooseService)));
}

#[test]
fn test_zero_parameter_action_commits_directly() {
    let mut state = builder_state(vec![ping_service()]);
    set_authorized(&mut state, "A", true);

    run(&mut state, Message::AddAction);
    key(&mut state, InputKey::Enter);
    let actions = key(&mut state, InputKey::Enter);

    let adds: Vec<&AddAreaRequest> = actions
        .iter()
        .filter_map(|a| match a {
            UpdateAction::Mutate(Mutation::AddDraftArea(request)) => Some(request),
            _ => None,
        })
        .collect();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].service, "A");
    assert_eq!(adds[0].area_type, AreaType::Action);
    assert_eq!(adds[0].area_item, "ping");
    assert!(adds[0].area_settings.is_none());

    let request = adds[0].clone();
    let actions = run(
        &mut state,
        Message::MutationDone {
            mutation: Mutation::AddDraftArea(request),
            result: Ok(String::new()),
        },
    );

    assert!(state.wizard.is_none());
    assert_eq!(state.ui_mode, UiMode::Normal);
    assert_eq!(state.route, Route::CreateApplet);
    assert!(actions.iter().any(is_draft_fetch));
}

#[test]
fn test_oauth_connect_resumes_wizard() {
    let mut service = ping_service();
    service.authenticator = Some(test_authenticator("github", true));
    let mut state = builder_state(vec![service]);

    run(&mut state, Message::AddAction);
    let actions = key(&mut state, InputKey::Enter);
    assert!(actions
        .iter()
        .any(|a| matches!(a, UpdateAction::StartOAuth { .. })));

    let purpose = state.oauth.clone();
    assert!(matches!(
        purpose,
        Some(crate::message::OAuthPurpose::WizardService { .. })
    ));

    let actions = run(
        &mut state,
        Message::OAuthFinished {
            purpose: purpose.clone().unwrap_or(crate::message::OAuthPurpose::Connect),
            authenticator: "github".to_string(),
            result: Ok(AuthorizationCodeReceived {
                code: "abc".to_string(),
                redirect_uri: "http://localhost:8081/callback".to_string(),
            }),
        },
    );
    let exchange = actions.iter().find_map(|a| match a {
        UpdateAction::Mutate(Mutation::CreateAuthorization(exchange)) => Some(exchange.clone()),
        _ => None,
    });
    let exchange = exchange.expect("code exchange");
    assert_eq!(exchange.authenticator, "github");
    assert_eq!(exchange.code, "abc");

    run(
        &mut state,
        Message::MutationDone {
            mutation: Mutation::CreateAuthorization(exchange),
            result: Ok(String::new()),
        },
    );

    assert_eq!(state.ui_mode, UiMode::Wizard);
    let step = state.wizard.as_ref().map(|w| w.step().clone());
    assert!(matches!(step, Some(WizardStep::ChooseArea { .. })));
}

#[test]
fn test_cancelled_oauth_ignores_late_callback() {
    let mut service = ping_service();
    service.authenticator = Some(test_authenticator("github", true));
    let mut state = builder_state(vec![service]);

    run(&mut state, Message::AddAction);
    key(&mut state, InputKey::Enter);
    let purpose = state.oauth.clone();
    let actions = key(&mut state, InputKey::Esc);
    assert!(actions.iter().any(|a| matches!(a, UpdateAction::CancelOAuth)));

    let actions = run(
        &mut state,
        Message::OAuthFinished {
            purpose: purpose.unwrap_or(crate::message::OAuthPurpose::Connect),
            authenticator: "github".to_string(),
            result: Ok(AuthorizationCodeReceived {
                code: "late".to_string(),
                redirect_uri: "http://localhost:8081/callback".to_string(),
            }),
        },
    );
    assert!(actions.is_empty());
}

/// Builder state positioned on the settings step of the "say" reaction.
fn say_form_state() -> AppState {
    let mut state = builder_state(vec![message_service()]);
    set_authorized(&mut state, "A", true);
    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![],
        },
    );
    run(&mut state, Message::AddReaction);
    key(&mut state, InputKey::Enter);
    key(&mut state, InputKey::Enter);
    state
}

#[test]
fn test_clearing_field_removes_its_key() {
    let mut state = say_form_state();
    key(&mut state, InputKey::Char('h'));
    key(&mut state, InputKey::Char('i'));

    let form = state.wizard.as_ref().and_then(|w| w.form());
    assert_eq!(
        form.and_then(|f| f.settings().get("message")).cloned(),
        Some(SettingValue::Text("hi".to_string()))
    );

    key(&mut state, InputKey::CharCtrl('u'));

    let form = state.wizard.as_ref().and_then(|w| w.form());
    assert!(form.is_some_and(|f| f.settings().get("message").is_none()));
}

#[test]
fn test_missing_required_blocks_commit() {
    let mut state = say_form_state();

    let actions = key(&mut state, InputKey::Enter);

    assert!(actions.is_empty());
    assert!(latest_toast(&state).contains("Message"));
}

#[test]
fn test_invalid_fields_are_marked_on_the_form() {
    let mut state = say_form_state();
    key(&mut state, InputKey::Char('x'));
    let actions = key(&mut state, InputKey::Enter);
    let request = actions
        .iter()
        .find_map(|a| match a {
            UpdateAction::Mutate(Mutation::AddDraftArea(request)) => Some(request.clone()),
            _ => None,
        })
        .expect("add request");
    let toasts_before = state.toasts.len();

    let actions = run(
        &mut state,
        Message::MutationDone {
            mutation: Mutation::AddDraftArea(request),
            result: Err(ApiFailure::InvalidFields(BTreeMap::from([(
                "message".to_string(),
                false,
            )]))),
        },
    );

    assert!(actions.is_empty());
    assert_eq!(state.toasts.len(), toasts_before + 1);
    assert_eq!(latest_toast(&state), "Please enter a valid value for Message.");
    let form = state.wizard.as_ref().and_then(|w| w.form());
    assert!(form.is_some_and(|f| f.is_invalid("message") && !f.is_submitting()));
}

fn fetched_endpoints(actions: &[UpdateAction]) -> Vec<String> {
    actions
        .iter()
        .filter_map(|a| match a {
            UpdateAction::FetchOptions { endpoint, .. } => Some(endpoint.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_options_from_abandoned_form_are_dropped() {
    let remote = |endpoint: &str| {
        FieldSchema::new(FieldKind::RemoteSelect {
            endpoint: endpoint.to_string(),
        })
        .required()
    };
    let service = test_service(
        "A",
        vec![test_area("ping", vec![])],
        vec![
            test_area("r1", vec![("req:id", remote("/one"))]),
            test_area("r2", vec![("req:id", remote("/two"))]),
        ],
    );
    let mut state = builder_state(vec![service]);
    set_authorized(&mut state, "A", true);
    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![],
        },
    );
    run(&mut state, Message::AddReaction);
    key(&mut state, InputKey::Enter);
    let first = key(&mut state, InputKey::Enter);
    assert_eq!(fetched_endpoints(&first), vec!["/one".to_string()]);

    key(&mut state, InputKey::Esc);
    key(&mut state, InputKey::Down);
    let second = key(&mut state, InputKey::Enter);
    assert_eq!(fetched_endpoints(&second), vec!["/two".to_string()]);

    // Same field name and ticket as the live fetch, but from the first form
    run(
        &mut state,
        Message::FieldOptionsLoaded {
            service: "A".to_string(),
            field: "req:id".to_string(),
            endpoint: "/one".to_string(),
            ticket: 1,
            result: Ok(vec![SelectOption::new("from /one", "stale")]),
        },
    );

    let choices = |state: &AppState| {
        let form = state.wizard.as_ref().and_then(|w| w.form());
        match form.and_then(|f| f.input("req:id")) {
            Some(FieldInput::Remote(input)) => input.choices(),
            _ => panic!("expected remote select"),
        }
    };
    assert!(choices(&state).iter().all(|c| c.value != "stale"));

    run(
        &mut state,
        Message::FieldOptionsLoaded {
            service: "A".to_string(),
            field: "req:id".to_string(),
            endpoint: "/two".to_string(),
            ticket: 1,
            result: Ok(vec![SelectOption::new("from /two", "fresh")]),
        },
    );
    assert!(choices(&state).iter().any(|c| c.value == "fresh"));
}

#[test]
fn test_remove_action_asks_first() {
    let mut state = builder_state(vec![message_service()]);
    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![draft_area(AreaType::Reaction, "A", "say")],
        },
    );

    run(&mut state, Message::DeleteSelected);
    assert_eq!(state.ui_mode, UiMode::ConfirmDialog);
    assert!(matches!(
        state.confirm_dialog_state.as_ref().map(|d| &d.action),
        Some(ConfirmAction::RemoveDraftAction)
    ));

    let actions = run(&mut state, Message::ConfirmDialogAccept);
    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::Mutate(Mutation::RemoveDraftArea(area_core::DraftRemoval::Action))
    )));
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_remove_reaction_targets_its_index() {
    let mut state = builder_state(vec![message_service()]);
    set_draft(
        &mut state,
        Draft {
            action: Some(draft_area(AreaType::Action, "A", "ping")),
            reactions: vec![
                draft_area(AreaType::Reaction, "A", "say"),
                draft_area(AreaType::Reaction, "A", "say"),
            ],
        },
    );
    state.cursors.overview = 2;

    let actions = run(&mut state, Message::DeleteSelected);

    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::Mutate(Mutation::RemoveDraftArea(area_core::DraftRemoval::Reaction(1)))
    )));
}

#[test]
fn test_submit_requires_name_and_description() {
    let mut state = builder_state(vec![]);
    state.route = Route::Submit;

    let actions = key(&mut state, InputKey::Enter);
    assert!(actions.is_empty());

    for c in "Ping".chars() {
        key(&mut state, InputKey::Char(c));
    }
    key(&mut state, InputKey::Tab);
    for c in "pings".chars() {
        key(&mut state, InputKey::Char(c));
    }
    let actions = key(&mut state, InputKey::Enter);

    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::Mutate(Mutation::SubmitDraft(request))
            if request.name == "Ping" && request.description == "pings" && !request.public
    )));
}

// ─────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────

#[test]
fn test_wrong_password_does_not_clear_session() {
    let mut state = AppState::new(Settings::default(), false);
    state.ui_mode = UiMode::SignIn;

    let actions = run(&mut state, Message::SignInFailed(ApiFailure::Unauthorized));

    assert!(actions.is_empty());
    assert_eq!(latest_toast(&state), "Invalid email or password");
}

#[test]
fn test_sign_in_form_submits_encoded_credentials() {
    let mut state = AppState::new(Settings::default(), false);
    state.phase = AppPhase::Ready;
    run(&mut state, Message::OpenSignIn);
    for c in "a@b.c".chars() {
        key(&mut state, InputKey::Char(c));
    }
    key(&mut state, InputKey::Tab);
    for c in "pw".chars() {
        key(&mut state, InputKey::Char(c));
    }

    let actions = key(&mut state, InputKey::Enter);

    let submitted = actions.iter().find_map(|a| match a {
        UpdateAction::Authenticate {
            mode,
            credentials: area_api::Credentials::Password(credentials),
        } => Some((*mode, credentials.clone())),
        _ => None,
    });
    let (mode, credentials) = submitted.expect("authenticate action");
    assert_eq!(mode, area_core::AuthMode::Login);
    assert_eq!(credentials.email, "a@b.c");
    assert_ne!(credentials.encoded_password, "pw");
}

#[test]
fn test_logout_clears_session_even_on_failure() {
    let mut state = builder_state(vec![]);
    state.route = Route::Profile;

    let actions = run(
        &mut state,
        Message::MutationDone {
            mutation: Mutation::Logout,
            result: Err(ApiFailure::Transport("offline".to_string())),
        },
    );

    assert!(actions.iter().any(|a| matches!(a, UpdateAction::ClearSession)));
    assert!(!state.signed_in);
    assert_eq!(state.route, Route::Home);
}

fn profile_with_applets(applets: Vec<area_core::Applet>) -> AppState {
    let mut state = builder_state(vec![]);
    state.route = Route::Profile;
    let ticket = state.applets.begin();
    state.applets.resolve(ticket, Ok(applets));
    state
}

#[test]
fn test_webhook_message_goes_to_the_chosen_applet() {
    let mut hook = test_applet("2", "Deploy");
    hook.action = "webhook;on_call".to_string();
    let mut state = profile_with_applets(vec![test_applet("1", "Ping"), hook]);

    key(&mut state, InputKey::Char('w'));
    assert_eq!(state.ui_mode, UiMode::Picker);
    assert_eq!(
        state.picker.as_ref().map(|p| p.items.clone()),
        Some(vec!["Deploy".to_string()])
    );

    key(&mut state, InputKey::Enter);
    assert_eq!(state.ui_mode, UiMode::Prompt);
    key(&mut state, InputKey::Char('g'));
    key(&mut state, InputKey::Char('o'));
    let actions = key(&mut state, InputKey::Enter);

    let mutation = Mutation::TriggerWebhook {
        applet: "Deploy".to_string(),
        message: "go".to_string(),
    };
    assert!(actions
        .iter()
        .any(|a| matches!(a, UpdateAction::Mutate(m) if *m == mutation)));
    assert_eq!(state.ui_mode, UiMode::Normal);

    run(
        &mut state,
        Message::MutationDone {
            mutation,
            result: Ok("Deploy received go".to_string()),
        },
    );
    assert_eq!(latest_toast(&state), "Deploy received go");
}

#[test]
fn test_webhook_needs_a_webhook_applet() {
    let mut state = profile_with_applets(vec![test_applet("1", "Ping")]);

    let actions = key(&mut state, InputKey::Char('w'));

    assert!(actions.is_empty());
    assert!(state.picker.is_none());
    assert_eq!(latest_toast(&state), "No applet is triggered by a webhook");
}

#[test]
fn test_authorization_in_use_cannot_be_removed() {
    let mut state = builder_state(vec![]);
    state.route = Route::Authenticators;
    let list = area_core::AuthorizationList {
        authorizations: vec![area_core::Authorization {
            kind: "oauth2".to_string(),
            name: "github".to_string(),
            permanent: false,
            expire_at: None,
        }],
        meta: vec![area_core::AuthorizationUsage {
            authenticator: "github".to_string(),
            applets: Some(vec!["Ping".to_string()]),
        }],
    };
    let ticket = state.authorizations.begin();
    state.authorizations.resolve(ticket, Ok(list));

    let actions = run(&mut state, Message::DeleteSelected);

    assert!(actions.is_empty());
    assert_eq!(
        latest_toast(&state),
        "You cannot remove this authorization: Used by (Ping)"
    );
}

#[test]
fn test_live_log_frames_land_in_the_tail() {
    let mut state = builder_state(vec![]);
    state.route = Route::Applets;
    let actions = run(
        &mut state,
        Message::Navigate(Route::AppletDetail {
            id: "42".to_string(),
        }),
    );
    assert!(actions.iter().any(|a| matches!(
        a,
        UpdateAction::OpenLogStream { applet_id } if applet_id == "42"
    )));

    update(
        &mut state,
        Message::LogFrame {
            applet_id: "42".to_string(),
            text: "started".to_string(),
        },
    );
    update(
        &mut state,
        Message::LogFrame {
            applet_id: "other".to_string(),
            text: "ignored".to_string(),
        },
    );

    let lines: Vec<String> = state
        .detail
        .as_ref()
        .map(|d| d.logs.lines().map(str::to_string).collect())
        .unwrap_or_default();
    assert_eq!(lines, vec!["started".to_string()]);

    let actions = run(&mut state, Message::Navigate(Route::Applets));
    assert!(actions.iter().any(|a| matches!(a, UpdateAction::CloseLogStream)));
    assert!(state.detail.is_none());
}
