//! Email/password form for signing in or registering.

use area_app::state::{SignInField, SignInState};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay::open_modal;
use crate::theme::styles;

pub struct SignInForm<'a> {
    state: &'a SignInState,
    /// An external authenticator is available
    external: bool,
}

impl<'a> SignInForm<'a> {
    pub fn new(state: &'a SignInState, external: bool) -> Self {
        Self { state, external }
    }

    fn field_line(&self, field: SignInField, label: &'static str, value: String) -> Line<'static> {
        let focused = self.state.focus == field;
        let label_style = if focused {
            styles::accent_bold()
        } else {
            styles::text_secondary()
        };
        let mut spans = vec![
            Span::styled(format!("{label:>9} "), label_style),
            Span::styled(value, styles::text_primary()),
        ];
        if focused {
            spans.push(Span::styled("▏", styles::accent()));
        }
        Line::from(spans)
    }
}

impl Widget for SignInForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.state.register {
            "Register"
        } else {
            "Sign in"
        };
        let inner = open_modal(buf, area, 52, 10, title);
        let [email, password, _, status, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let masked = "•".repeat(self.state.password.chars().count());
        Paragraph::new(self.field_line(SignInField::Email, "Email", self.state.email.clone()))
            .render(email, buf);
        Paragraph::new(self.field_line(SignInField::Password, "Password", masked))
            .render(password, buf);

        if self.state.submitting {
            Paragraph::new(Span::styled("Signing in...", styles::status_yellow()))
                .alignment(Alignment::Center)
                .render(status, buf);
        }

        let switch = if self.state.register {
            "have an account"
        } else {
            "register"
        };
        let mut spans = vec![
            Span::styled("Enter", styles::keybinding()),
            Span::styled(" submit  ", styles::text_muted()),
            Span::styled("^R", styles::keybinding()),
            Span::styled(format!(" {switch}"), styles::text_muted()),
        ];
        if self.external {
            spans.push(Span::styled("  ^O", styles::keybinding()));
            spans.push(Span::styled(" external", styles::text_muted()));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(hints, buf);
    }
}
