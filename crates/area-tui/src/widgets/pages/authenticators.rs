use area_app::AppState;
use area_core::{pretty, AuthorizationEntry, DEFAULT_COLOR};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{ListItem, Paragraph, Widget},
};

use super::page_block;
use crate::theme::styles;
use crate::widgets::list::{query_placeholder, render_list, render_placeholder};

/// Removable authorizations with what uses them.
pub struct AuthenticatorsPage<'a> {
    state: &'a AppState,
}

impl<'a> AuthenticatorsPage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn item(&self, entry: &AuthorizationEntry) -> ListItem<'static> {
        let name = &entry.authorization.name;
        let color = self
            .state
            .find_authenticator(name)
            .map(|auth| auth.more.color.as_str())
            .filter(|color| !color.is_empty())
            .unwrap_or(DEFAULT_COLOR);

        let expiry = match entry.authorization.expire_at {
            Some(at) => format!("expires {}", at.format("%Y-%m-%d %H:%M")),
            None => "no expiry".to_string(),
        };
        let usage = match entry.usage.applets.as_deref() {
            Some(applets) if !applets.is_empty() => {
                Span::styled(format!("used by {}", applets.join(", ")), styles::status_yellow())
            }
            _ => Span::styled("unused", styles::text_muted()),
        };

        ListItem::new(vec![
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(styles::hex_color(color))),
                Span::styled(pretty(name), styles::text_primary()),
                Span::styled(format!("  {}", entry.authorization.kind), styles::text_muted()),
            ]),
            Line::from(vec![
                Span::styled(format!("  {expiry} · "), styles::text_muted()),
                usage,
            ]),
        ])
    }
}

impl Widget for AuthenticatorsPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Authenticators");
        let inner = block.inner(area);
        block.render(area, buf);

        let [list, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        let available = self.state.enabled_authenticators().len();
        Paragraph::new(Line::from(vec![
            Span::styled("c", styles::keybinding()),
            Span::styled(
                format!(" connect ({available} available)"),
                styles::text_muted(),
            ),
        ]))
        .render(footer, buf);

        if let Some(text) = query_placeholder(&self.state.authorizations) {
            render_placeholder(text, list, buf);
            return;
        }
        let entries = self.state.authorization_entries();
        if entries.is_empty() {
            render_placeholder("No authorization yet", list, buf);
            return;
        }
        let items = entries.iter().map(|entry| self.item(entry)).collect();
        render_list(items, Some(self.state.cursors.authorizations), list, buf);
    }
}
