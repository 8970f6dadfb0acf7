use area_app::AppState;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::page_block;
use crate::theme::styles;

/// Landing page: sign-in entry points when signed out, a greeting otherwise.
pub struct HomePage<'a> {
    state: &'a AppState,
}

impl<'a> HomePage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let services = self.state.services().len();
        let mut lines = vec![
            Line::styled("AREA", styles::accent_bold()),
            Line::styled(
                "Connect your services and let actions trigger reactions.",
                styles::text_secondary(),
            ),
            Line::styled(
                format!("{services} services available"),
                styles::text_muted(),
            ),
            Line::raw(""),
        ];

        if self.state.signed_in {
            let greeting = match self.state.profile.data() {
                Some(user) => format!("Welcome back, {}", user.username),
                None => "Welcome back".to_string(),
            };
            lines.push(Line::styled(greeting, styles::text_primary()));
            lines.push(Line::from(vec![
                Span::styled("2", styles::keybinding()),
                Span::styled(" your applets   ", styles::text_muted()),
                Span::styled("3", styles::keybinding()),
                Span::styled(" create one   ", styles::text_muted()),
                Span::styled("4", styles::keybinding()),
                Span::styled(" explore", styles::text_muted()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("s", styles::keybinding()),
                Span::styled(" sign in or register   ", styles::text_muted()),
                Span::styled("o", styles::keybinding()),
                Span::styled(" sign in with an external account", styles::text_muted()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("4", styles::keybinding()),
                Span::styled(" browse public applets", styles::text_muted()),
            ]));
        }
        lines
    }
}

impl Widget for HomePage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Home");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines();
        let top = inner.height.saturating_sub(lines.len() as u16) / 2;
        let body = Rect::new(inner.x, inner.y + top, inner.width, inner.height - top);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(body, buf);
    }
}
