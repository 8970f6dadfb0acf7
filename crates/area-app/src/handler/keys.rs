//! Key event handlers for different UI modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppPhase, AppState, Route, UiMode};
use crate::wizard::WizardStep;

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit with Ctrl+C in every mode
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match state.ui_mode {
        UiMode::Normal => handle_key_normal(state, key),
        UiMode::SignIn => handle_key_sign_in(key),
        UiMode::Wizard => handle_key_wizard(state, key),
        UiMode::ConfirmDialog => handle_key_confirm_dialog(key),
        UiMode::Prompt => handle_key_text_input(key, Message::PromptSubmit, Message::PromptCancel),
        UiMode::Picker => handle_key_list(key),
        UiMode::OAuthPending => match key {
            InputKey::Esc => Some(Message::Back),
            _ => None,
        },
    }
}

/// Handle key events in confirm dialog mode
fn handle_key_confirm_dialog(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y' | 'Y') | InputKey::Enter => Some(Message::ConfirmDialogAccept),
        InputKey::Char('n' | 'N') | InputKey::Esc => Some(Message::ConfirmDialogCancel),
        _ => None,
    }
}

/// Single-line text entry.
fn handle_key_text_input(key: InputKey, submit: Message, cancel: Message) -> Option<Message> {
    match key {
        InputKey::Char(c) => Some(Message::InputChar(c)),
        InputKey::Backspace => Some(Message::InputBackspace),
        InputKey::CharCtrl('u') => Some(Message::InputClear),
        InputKey::Enter => Some(submit),
        InputKey::Esc => Some(cancel),
        _ => None,
    }
}

fn handle_key_list(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::MoveUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::MoveDown),
        InputKey::Enter => Some(Message::Activate),
        InputKey::Esc => Some(Message::Back),
        _ => None,
    }
}

fn handle_key_sign_in(key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('r') => Some(Message::ToggleSignInMode),
        InputKey::CharCtrl('o') => Some(Message::SignInExternal),
        InputKey::Tab | InputKey::Down => Some(Message::FocusNext),
        InputKey::BackTab | InputKey::Up => Some(Message::FocusPrev),
        other => handle_key_text_input(other, Message::Activate, Message::Back),
    }
}

// ─────────────────────────────────────────────────────────
// Wizard
// ─────────────────────────────────────────────────────────

fn handle_key_wizard(state: &AppState, key: InputKey) -> Option<Message> {
    let wizard = state.wizard.as_ref()?;
    match wizard.step() {
        WizardStep::ChooseService => match key {
            InputKey::Up => Some(Message::MoveUp),
            InputKey::Down => Some(Message::MoveDown),
            InputKey::Enter => Some(Message::Activate),
            InputKey::Esc => Some(Message::Back),
            InputKey::Backspace => Some(Message::InputBackspace),
            // Letters go to the service filter
            InputKey::Char(c) => Some(Message::InputChar(c)),
            _ => None,
        },
        WizardStep::AwaitingAuthorization { .. } => match key {
            InputKey::Esc => Some(Message::Back),
            _ => None,
        },
        WizardStep::ChooseArea { .. } => handle_key_list(key),
        WizardStep::ChooseAreaSettings(form) => {
            if form.menu().is_some() {
                return handle_key_list(key);
            }
            match key {
                InputKey::CharCtrl('a') => Some(Message::OpenParameterMenu),
                InputKey::CharCtrl('k') => Some(Message::OpenComponentMenu),
                InputKey::CharCtrl('x') => Some(Message::RemoveField),
                InputKey::CharCtrl('s') | InputKey::Enter => Some(Message::CommitArea),
                InputKey::CharCtrl('u') | InputKey::Delete => Some(Message::InputClear),
                InputKey::Tab | InputKey::Down => Some(Message::FocusNext),
                InputKey::BackTab | InputKey::Up => Some(Message::FocusPrev),
                InputKey::Left => Some(Message::SelectPrev),
                InputKey::Right => Some(Message::SelectNext),
                InputKey::Backspace => Some(Message::InputBackspace),
                InputKey::Char(c) => Some(Message::InputChar(c)),
                InputKey::Esc => Some(Message::Back),
                _ => None,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────
// Normal mode
// ─────────────────────────────────────────────────────────

fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    if state.phase != AppPhase::Ready {
        let unavailable = matches!(state.phase, AppPhase::Unavailable(_));
        return match key {
            InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
            InputKey::F(5) | InputKey::CharCtrl('r') if unavailable => Some(Message::Refresh),
            _ => None,
        };
    }

    // The submit page is a text form
    if state.route == Route::Submit {
        return handle_key_submit(key);
    }

    if let Some(message) = handle_key_page(state, &key) {
        return Some(message);
    }

    let navigation = Route::navigation();
    match key {
        InputKey::Char('q') => Some(Message::Quit),

        InputKey::Char(c @ '1'..='6') => {
            let index = c.to_digit(10)? as usize - 1;
            navigation.get(index).cloned().map(Message::Navigate)
        }
        InputKey::Tab => {
            let next = (state.cursors.navigation + 1) % navigation.len();
            Some(Message::Navigate(navigation[next].clone()))
        }
        InputKey::BackTab => {
            let prev = (state.cursors.navigation + navigation.len() - 1) % navigation.len();
            Some(Message::Navigate(navigation[prev].clone()))
        }

        InputKey::Up | InputKey::Char('k') => Some(Message::MoveUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::MoveDown),
        InputKey::Enter => Some(Message::Activate),
        InputKey::Esc => Some(Message::Back),
        InputKey::F(5) | InputKey::CharCtrl('r') => Some(Message::Refresh),
        _ => None,
    }
}

/// Page-specific shortcuts.
fn handle_key_page(state: &AppState, key: &InputKey) -> Option<Message> {
    match (&state.route, key) {
        (Route::Home, InputKey::Char('s')) => Some(Message::OpenSignIn),
        (Route::Home, InputKey::Char('o')) => Some(Message::SignInExternal),

        (Route::Applets, InputKey::Char(' ')) => Some(Message::ToggleActive),
        (Route::Applets, InputKey::Char('d') | InputKey::Delete) => Some(Message::DeleteSelected),

        (Route::AppletDetail { .. }, InputKey::Char(' ' | 'a')) => Some(Message::ToggleActive),
        (Route::AppletDetail { .. }, InputKey::Char('s')) => Some(Message::ToggleRunning),
        (Route::AppletDetail { .. }, InputKey::Char('d') | InputKey::Delete) => {
            Some(Message::DeleteSelected)
        }

        (Route::CreateApplet, InputKey::Char('a')) => Some(Message::AddAction),
        (Route::CreateApplet, InputKey::Char('r')) => Some(Message::AddReaction),
        (Route::CreateApplet, InputKey::Char('d') | InputKey::Delete) => {
            Some(Message::DeleteSelected)
        }
        (Route::CreateApplet, InputKey::Char('c')) => Some(Message::ClearDraft),
        (Route::CreateApplet, InputKey::Char('n')) => Some(Message::NextStep),

        (Route::Authenticators, InputKey::Char('c')) => Some(Message::ConnectAuthenticator),
        (Route::Authenticators, InputKey::Char('d') | InputKey::Delete) => {
            Some(Message::DeleteSelected)
        }

        (Route::Profile, InputKey::Char('e')) => Some(Message::EditUsername),
        (Route::Profile, InputKey::Char('v')) => Some(Message::ChangeAvatar),
        (Route::Profile, InputKey::Char('w')) => Some(Message::TriggerWebhook),
        (Route::Profile, InputKey::Char('l')) => Some(Message::Logout),
        (Route::Profile, InputKey::Char('D')) => Some(Message::DeleteAccount),

        _ => None,
    }
}

fn handle_key_submit(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Tab | InputKey::Down => Some(Message::FocusNext),
        InputKey::BackTab | InputKey::Up => Some(Message::FocusPrev),
        InputKey::Left => Some(Message::SelectPrev),
        InputKey::Right => Some(Message::SelectNext),
        InputKey::CharCtrl('p') => Some(Message::TogglePublic),
        other => handle_key_text_input(other, Message::Activate, Message::Back),
    }
}
