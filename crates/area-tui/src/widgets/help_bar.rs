//! Key hints for the current page and mode.

use area_app::wizard::WizardStep;
use area_app::{AppState, Route, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

type Hint = (&'static str, &'static str);

const NAVIGATION: &[Hint] = &[("1-6", "pages"), ("F5", "refresh"), ("q", "quit")];

pub struct HelpBar<'a> {
    state: &'a AppState,
}

impl<'a> HelpBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn hints(&self) -> Vec<Hint> {
        let state = self.state;
        match state.ui_mode {
            UiMode::SignIn => vec![
                ("Tab", "next field"),
                ("Enter", "submit"),
                ("^R", "sign in/register"),
                ("^O", "external"),
                ("Esc", "close"),
            ],
            UiMode::ConfirmDialog => vec![("y", "confirm"), ("n", "cancel")],
            UiMode::Prompt => vec![("Enter", "save"), ("^U", "clear"), ("Esc", "cancel")],
            UiMode::Picker => vec![("↑↓", "choose"), ("Enter", "connect"), ("Esc", "cancel")],
            UiMode::OAuthPending => vec![("Esc", "cancel")],
            UiMode::Wizard => wizard_hints(state),
            UiMode::Normal => page_hints(&state.route),
        }
    }
}

fn wizard_hints(state: &AppState) -> Vec<Hint> {
    let Some(wizard) = state.wizard.as_ref() else {
        return Vec::new();
    };
    match wizard.step() {
        WizardStep::ChooseService => vec![
            ("type", "filter"),
            ("↑↓", "choose"),
            ("Enter", "select"),
            ("Esc", "back"),
        ],
        WizardStep::AwaitingAuthorization { .. } => vec![("Esc", "cancel")],
        WizardStep::ChooseArea { .. } => vec![("↑↓", "choose"), ("Enter", "select"), ("Esc", "back")],
        WizardStep::ChooseAreaSettings(form) if form.menu().is_some() => {
            vec![("↑↓", "choose"), ("Enter", "pick"), ("Esc", "close")]
        }
        WizardStep::ChooseAreaSettings(_) => vec![
            ("Tab", "next"),
            ("←→", "option"),
            ("^A", "add parameter"),
            ("^K", "component"),
            ("^X", "remove"),
            ("Enter", "save"),
            ("Esc", "back"),
        ],
    }
}

fn page_hints(route: &Route) -> Vec<Hint> {
    let page: &[Hint] = match route {
        Route::Home => &[("s", "sign in"), ("o", "external sign in")],
        Route::Applets => &[("Enter", "open"), ("Space", "toggle active"), ("d", "delete")],
        Route::AppletDetail { .. } => &[
            ("a", "toggle active"),
            ("s", "start/stop"),
            ("d", "delete"),
            ("Esc", "back"),
        ],
        Route::Explore => &[("↑↓", "browse")],
        Route::CreateApplet => &[
            ("a", "action"),
            ("r", "reaction"),
            ("d", "remove"),
            ("c", "clear"),
            ("n", "next step"),
        ],
        Route::Submit => &[
            ("Tab", "next field"),
            ("^P", "public"),
            ("Enter", "create"),
            ("Esc", "back"),
        ],
        Route::Authenticators => &[("c", "connect"), ("d", "remove")],
        Route::Profile => &[
            ("e", "username"),
            ("v", "avatar"),
            ("w", "webhook"),
            ("l", "logout"),
            ("D", "delete account"),
        ],
    };
    // The submit form takes letters, so page numbers do not apply there
    if *route == Route::Submit {
        return page.to_vec();
    }
    page.iter().chain(NAVIGATION).copied().collect()
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let mut spans = vec![Span::raw(" ")];
        for (index, (key, action)) in self.hints().into_iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(" · ", styles::text_muted()));
            }
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!(" {action}"), styles::text_muted()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
