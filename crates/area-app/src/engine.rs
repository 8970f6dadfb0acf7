//! Engine - state, message channel and action context in one place
//!
//! The TUI owns an [`Engine`]: it feeds terminal events in with
//! [`Engine::process`], drains background results with
//! [`Engine::drain_pending`] and reads [`Engine::state`] to render.

use area_api::{AreaApi, Session};
use tokio::sync::{mpsc, watch};
use tracing::info;
use url::Url;

use crate::actions::ActionContext;
use crate::config::Settings;
use crate::handler::UpdateAction;
use crate::message::Message;
use crate::process::process_message;
use crate::state::AppState;

/// Capacity of the message channel fed by background tasks.
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

pub struct Engine<A> {
    pub state: AppState,
    ctx: ActionContext<A>,
    msg_rx: mpsc::Receiver<Message>,
    shutdown_tx: watch::Sender<bool>,
}

impl<A> Engine<A>
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    /// Build the engine. Must be called inside a Tokio runtime.
    pub fn new(settings: Settings, api: A, session: Session, api_base: Url) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ctx = ActionContext::new(api, session.clone(), api_base, &settings, msg_tx, shutdown_rx);
        let state = AppState::new(settings, session.is_authenticated());

        Self {
            state,
            ctx,
            msg_rx,
            shutdown_tx,
        }
    }

    /// Start polling the catalog.
    pub fn start(&mut self) {
        info!("Connecting to {}", self.ctx.api_base);
        crate::actions::handle_action(UpdateAction::Bootstrap, &self.ctx);
    }

    pub fn process(&mut self, message: Message) {
        process_message(&mut self.state, message, &self.ctx);
    }

    /// Process every message background tasks delivered so far.
    /// Returns whether anything was processed.
    pub fn drain_pending(&mut self) -> bool {
        let mut processed = false;
        while let Ok(message) = self.msg_rx.try_recv() {
            process_message(&mut self.state, message, &self.ctx);
            processed = true;
        }
        processed
    }

    /// Wait for the next background message.
    pub async fn recv(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Stop background work: the bootstrap poll, the log stream and any
    /// OAuth listener.
    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        self.ctx.abort_all();
    }
}
