//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use area_api::{AreaApi, RetryPolicy, Session};
use area_core::{ApiFailure, Error};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::handler::UpdateAction;
use crate::message::Message;

mod remote;
mod streams;


/// Long-running tasks of which at most one runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    /// OAuth callback listener
    OAuth,
    /// Live log WebSocket of the open applet
    LogStream,
}

/// Convenience type alias for slot task tracking
pub type TaskSlots = Arc<Mutex<HashMap<TaskSlot, JoinHandle<()>>>>;

/// Everything an action needs to run.
#[derive(Clone)]
pub struct ActionContext<A> {
    pub api: A,
    pub session: Session,
    /// Base URL of the REST API, used to derive the log stream URL
    pub api_base: Url,
    pub log_stream_url: Option<String>,
    pub redirect_uri: String,
    pub callback_timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub msg_tx: mpsc::Sender<Message>,
    pub tasks: TaskSlots,
    pub shutdown_rx: watch::Receiver<bool>,
}

impl<A> ActionContext<A> {
    pub fn new(
        api: A,
        session: Session,
        api_base: Url,
        settings: &Settings,
        msg_tx: mpsc::Sender<Message>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            session,
            api_base,
            log_stream_url: settings.server.log_stream_url.clone(),
            redirect_uri: settings.oauth.redirect_uri.clone(),
            callback_timeout: settings.oauth.callback_timeout(),
            retry_policy: settings.bootstrap.retry_policy(),
            msg_tx,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            shutdown_rx,
        }
    }

    /// Track `handle` in `slot`, aborting the task it replaces.
    pub(crate) fn occupy(&self, slot: TaskSlot, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = tasks.insert(slot, handle) {
            debug!("Replacing running {:?} task", slot);
            previous.abort();
        }
    }

    /// Abort the task in `slot`, if any.
    pub(crate) fn vacate(&self, slot: TaskSlot) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = tasks.remove(&slot) {
            handle.abort();
        }
    }

    /// Abort every tracked task (shutdown or sign out).
    pub fn abort_all(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}

/// Flatten an API error into the cloneable failure messages carry.
pub(crate) fn failure_of(error: Error) -> ApiFailure {
    match error {
        Error::Api(failure) => failure,
        other => ApiFailure::Transport(other.to_string()),
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<A>(action: UpdateAction, ctx: &ActionContext<A>)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    match action {
        UpdateAction::Bootstrap => remote::spawn_bootstrap(ctx),

        UpdateAction::Fetch { key, ticket } => remote::spawn_query(ctx, key, ticket),

        UpdateAction::Mutate(mutation) => remote::spawn_mutation(ctx, mutation),

        UpdateAction::FetchOptions {
            service,
            field,
            endpoint,
            ticket,
        } => remote::spawn_options(ctx, service, field, endpoint, ticket),

        UpdateAction::Authenticate { mode, credentials } => {
            remote::spawn_authenticate(ctx, mode, credentials)
        }

        UpdateAction::StartOAuth {
            authenticator,
            purpose,
        } => streams::spawn_oauth(ctx, authenticator, purpose),

        UpdateAction::CancelOAuth => {
            // Dropping the listener future shuts the callback server down
            ctx.vacate(TaskSlot::OAuth);
        }

        UpdateAction::ClearSession => {
            if let Err(e) = ctx.session.clear() {
                warn!("Failed to remove the session file: {}", e);
            }
            ctx.abort_all();
        }

        UpdateAction::OpenLogStream { applet_id } => streams::spawn_log_stream(ctx, applet_id),

        UpdateAction::CloseLogStream => ctx.vacate(TaskSlot::LogStream),

        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(action, ctx);
            }
        }
    }
}
