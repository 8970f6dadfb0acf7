//! Central handling of failed API calls.

use area_core::ApiFailure;
use tracing::{info, warn};

use crate::state::{AppState, Route};

use super::UpdateAction;

/// Surface a failure that no caller handled more specifically.
///
/// `401` ends the session: account data is dropped, the route returns to
/// Home and the token is cleared. Everything else becomes a notification.
pub(crate) fn handle_failure(state: &mut AppState, failure: &ApiFailure) -> Option<UpdateAction> {
    match failure {
        ApiFailure::Unauthorized => {
            if state.signed_in {
                info!("Session rejected by the server, signing out");
            }
            state.clear_account_data();
            state.route = Route::Home;
            state.toasts.error(failure.notification_text());
            Some(UpdateAction::ClearSession)
        }
        other => {
            warn!("API call failed: {}", other);
            state.toasts.error(other.notification_text());
            None
        }
    }
}
