use area_app::AppState;
use area_core::pretty;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Paragraph, Widget, Wrap},
};

use super::page_block;
use crate::theme::styles;
use crate::widgets::list::{query_placeholder, render_placeholder};

/// Widest bar of the usage chart.
const BAR_WIDTH: u16 = 9;

/// Account details, account commands and service usage.
pub struct ProfilePage<'a> {
    state: &'a AppState,
}

impl<'a> ProfilePage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn account_lines(&self) -> Vec<Line<'static>> {
        let Some(user) = self.state.profile.data() else {
            let text = query_placeholder(&self.state.profile).unwrap_or_default();
            return vec![Line::styled(text, styles::text_muted())];
        };
        let avatar = match (self.state.avatar.data(), self.state.avatar.is_pending()) {
            (Some(uri), _) => uri.clone(),
            (None, true) => "Loading...".to_string(),
            (None, false) => "none".to_string(),
        };
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:>10}  "), styles::text_secondary()),
                Span::styled(value, styles::text_primary()),
            ])
        };
        vec![
            row("Username", user.username.clone()),
            row("Email", user.email.clone()),
            row("Avatar", avatar),
        ]
    }

    fn render_usage(&self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(" Service usage ");
        let inner = block.inner(area);
        block.render(area, buf);

        let usage: Vec<(String, u64)> = self
            .state
            .usage_by_service()
            .into_iter()
            .map(|(service, count)| (pretty(&service), count))
            .collect();
        if usage.is_empty() {
            render_placeholder("No applet yet", inner, buf);
            return;
        }

        let data: Vec<(&str, u64)> = usage
            .iter()
            .map(|(service, count)| (service.as_str(), *count))
            .collect();
        BarChart::default()
            .data(data.as_slice())
            .bar_width(BAR_WIDTH)
            .bar_gap(2)
            .bar_style(styles::accent())
            .value_style(styles::focused_selected())
            .label_style(styles::text_secondary())
            .render(inner, buf);
    }
}

impl Widget for ProfilePage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Profile");
        let inner = block.inner(area);
        block.render(area, buf);

        let [account, commands, usage] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(inner);

        Paragraph::new(self.account_lines())
            .wrap(Wrap { trim: true })
            .render(account, buf);

        let mut spans = Vec::new();
        for (key, action) in [
            ("e", "edit username"),
            ("v", "change avatar"),
            ("w", "trigger webhook"),
            ("l", "logout"),
            ("D", "delete account"),
        ] {
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!(" {action}   "), styles::text_muted()));
        }
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .render(commands, buf);

        if usage.height > 2 {
            self.render_usage(usage, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use area_api::test_utils::{test_applet, test_user};
    use area_app::config::Settings;

    #[test]
    fn test_profile_shows_account_and_usage() {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.profile.begin();
        state.profile.resolve(ticket, Ok(test_user()));
        let ticket = state.avatar.begin();
        state
            .avatar
            .resolve(ticket, Ok("https://cdn.example.com/a.png".to_string()));
        let ticket = state.applets.begin();
        state.applets.resolve(
            ticket,
            Ok(vec![test_applet("1", "One"), test_applet("2", "Two")]),
        );

        let mut term = TestTerminal::with_size(80, 30);
        term.render_widget(ProfilePage::new(&state), term.area());

        assert!(term.buffer_contains("alice@example.com"));
        assert!(term.buffer_contains("https://cdn.example.com/a.png"));
        assert!(term.buffer_contains("Service usage"));
        assert!(term.buffer_contains("Timer"));
    }

    #[test]
    fn test_profile_without_applets() {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.applets.begin();
        state.applets.resolve(ticket, Ok(vec![]));

        let mut term = TestTerminal::with_size(80, 30);
        term.render_widget(ProfilePage::new(&state), term.area());

        assert!(term.buffer_contains("No applet yet"));
        assert!(term.buffer_contains("Loading..."));
    }
}
