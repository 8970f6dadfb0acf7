//! Small modal dialogs: confirmation, text prompt, authenticator picker and
//! the "waiting for the browser" notice.

use area_app::state::{ConfirmDialogState, PickerPurpose, PickerState, PromptState};
use area_app::OAuthPurpose;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::modal_overlay::open_modal;
use crate::theme::styles;

const DIALOG_WIDTH: u16 = 56;

fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, (key, action)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(*key, styles::keybinding()));
        spans.push(Span::styled(format!(" {action}"), styles::text_muted()));
    }
    Line::from(spans)
}

// ─────────────────────────────────────────────────────────
// Confirm
// ─────────────────────────────────────────────────────────

pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmDialogState) -> Self {
        Self { state }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = open_modal(buf, area, DIALOG_WIDTH, 8, &self.state.title);
        let [message, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(self.state.message.as_str())
            .style(styles::text_primary())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message, buf);
        Paragraph::new(hint_line(&[("y", "yes"), ("n", "no")]))
            .alignment(Alignment::Center)
            .render(hints, buf);
    }
}

// ─────────────────────────────────────────────────────────
// Prompt
// ─────────────────────────────────────────────────────────

pub struct PromptDialog<'a> {
    state: &'a PromptState,
}

impl<'a> PromptDialog<'a> {
    pub fn new(state: &'a PromptState) -> Self {
        Self { state }
    }
}

impl Widget for PromptDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = open_modal(buf, area, DIALOG_WIDTH, 6, &self.state.title);
        let [input, _, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(Line::from(vec![
            Span::styled("> ", styles::accent()),
            Span::styled(self.state.buffer.as_str(), styles::text_primary()),
            Span::styled("▏", styles::accent()),
        ]))
        .render(input, buf);
        Paragraph::new(hint_line(&[("Enter", "save"), ("Esc", "cancel")]))
            .alignment(Alignment::Center)
            .render(hints, buf);
    }
}

// ─────────────────────────────────────────────────────────
// Picker
// ─────────────────────────────────────────────────────────

pub struct PickerDialog<'a> {
    state: &'a PickerState,
}

impl<'a> PickerDialog<'a> {
    pub fn new(state: &'a PickerState) -> Self {
        Self { state }
    }

    fn title(&self) -> &'static str {
        match &self.state.purpose {
            PickerPurpose::Authenticate(OAuthPurpose::SignIn) => "Sign in with",
            PickerPurpose::Authenticate(_) => "Connect",
            PickerPurpose::Webhook => "Trigger webhook of",
        }
    }
}

impl Widget for PickerDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.state.items.len() as u16 + 4;
        let inner = open_modal(buf, area, 40, height, self.title());

        let lines: Vec<Line> = self
            .state
            .items
            .iter()
            .enumerate()
            .map(|(index, name)| {
                if index == self.state.cursor {
                    Line::styled(format!(" › {name} "), styles::focused_selected())
                } else {
                    Line::styled(format!("   {name}"), styles::text_secondary())
                }
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

// ─────────────────────────────────────────────────────────
// OAuth pending
// ─────────────────────────────────────────────────────────

/// Shown while the browser is out collecting an authorization code.
pub struct OAuthPendingDialog<'a> {
    purpose: Option<&'a OAuthPurpose>,
}

impl<'a> OAuthPendingDialog<'a> {
    pub fn new(purpose: Option<&'a OAuthPurpose>) -> Self {
        Self { purpose }
    }
}

impl Widget for OAuthPendingDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let subject = match self.purpose {
            Some(OAuthPurpose::WizardService { service }) => format!("Connecting {service}"),
            Some(OAuthPurpose::SignIn) => "Signing in".to_string(),
            _ => "Connecting".to_string(),
        };
        let inner = open_modal(buf, area, DIALOG_WIDTH, 7, "Authorization");

        Paragraph::new(vec![
            Line::styled(subject, styles::accent_bold()),
            Line::styled(
                "Finish the authorization in your browser.",
                styles::text_secondary(),
            ),
            Line::raw(""),
            hint_line(&[("Esc", "cancel")]),
        ])
        .alignment(Alignment::Center)
        .render(inner, buf);
    }
}
