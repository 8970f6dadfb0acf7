//! Message processing
//!
//! Runs a message through the TEA update loop and hands every resulting
//! action to the action dispatcher.

use area_api::AreaApi;

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<A>(state: &mut AppState, message: Message, ctx: &ActionContext<A>)
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, ctx);
        }

        msg = result.message;
    }
}
