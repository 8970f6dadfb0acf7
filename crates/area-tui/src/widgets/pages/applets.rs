use area_app::state::{AppletDetailState, LogStreamStatus};
use area_app::AppState;
use area_core::{field_label, pretty, Area, Service};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{ListItem, Paragraph, Widget, Wrap},
};

use super::{applet_card, applet_trigger, page_block};
use crate::theme::styles;
use crate::widgets::list::{query_placeholder, render_list, render_placeholder};

/// The user's applets as cards with their active flag and run status.
pub struct AppletsPage<'a> {
    state: &'a AppState,
}

impl<'a> AppletsPage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for AppletsPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Applets");
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(text) = query_placeholder(&self.state.applets) {
            render_placeholder(text, inner, buf);
            return;
        }
        let applets = self.state.applets.data().map(Vec::as_slice).unwrap_or_default();
        if applets.is_empty() {
            render_placeholder("No applet yet. Press 3 to create one.", inner, buf);
            return;
        }

        let services = self.state.services();
        let items = applets
            .iter()
            .map(|applet| {
                let (icon, label, style) = styles::status_indicator(&applet.status);
                let active = if applet.active {
                    Span::styled("  on", styles::status_green())
                } else {
                    Span::styled("  off", styles::text_muted())
                };
                let extra = vec![active, Span::styled(format!("  {icon} {label}"), style)];
                ListItem::new(applet_card(services, applet, extra))
            })
            .collect();
        render_list(items, Some(self.state.cursors.applets), inner, buf);
    }
}

/// One applet: its trigger, reactions, controls and the live log tail.
pub struct AppletDetailPage<'a> {
    services: &'a [Service],
    detail: &'a AppletDetailState,
}

impl<'a> AppletDetailPage<'a> {
    pub fn new(services: &'a [Service], detail: &'a AppletDetailState) -> Self {
        Self { services, detail }
    }

    fn info_lines(&self) -> Vec<Line<'static>> {
        let Some(applet) = self.detail.applet.data() else {
            return vec![Line::styled(
                query_placeholder(&self.detail.applet).unwrap_or_default(),
                styles::text_muted(),
            )];
        };
        let (icon, label, style) = styles::status_indicator(&applet.status);
        let visibility = if applet.public { "public" } else { "private" };
        let mut lines = vec![
            Line::from(applet_trigger(self.services, applet)),
            Line::styled(applet.description.clone(), styles::text_secondary()),
            Line::from(vec![
                Span::styled(format!("{icon} {label}"), style),
                Span::styled(
                    if applet.active { "  active" } else { "  inactive" },
                    styles::text_secondary(),
                ),
                Span::styled(format!("  {visibility}"), styles::text_muted()),
            ]),
            Line::raw(""),
            Line::styled("Reactions", styles::accent_bold()),
        ];

        match self.detail.reactions.data() {
            Some(reactions) if reactions.is_empty() => {
                lines.push(Line::styled("  none", styles::text_muted()))
            }
            Some(reactions) => lines.extend(reactions.iter().flat_map(|r| area_lines(self.services, r))),
            None => lines.push(Line::styled("  Loading...", styles::text_muted())),
        }
        lines
    }
}

/// An area with its settings, indented under its service.
pub(super) fn area_lines(services: &[Service], area: &Area) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("  ■ ", styles::service_swatch(services, &area.service)),
        Span::styled(pretty(&area.service), styles::text_secondary()),
        Span::styled(" · ", styles::text_muted()),
        Span::styled(pretty(&area.name), styles::text_primary()),
    ])];
    lines.extend(area.store_lines().into_iter().map(|(key, value)| {
        Line::from(vec![
            Span::styled(format!("      {}: ", field_label(&key)), styles::text_muted()),
            Span::styled(value, styles::text_secondary()),
        ])
    }));
    lines
}

impl Widget for AppletDetailPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .detail
            .applet
            .data()
            .map(|applet| applet.name.clone())
            .unwrap_or_else(|| "Applet".to_string());
        let block = page_block(&title);
        let inner = block.inner(area);
        block.render(area, buf);

        let log_height = self.detail.logs.capacity() as u16 + 2;
        let [info, logs] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(log_height)]).areas(inner);

        Paragraph::new(self.info_lines())
            .wrap(Wrap { trim: false })
            .render(info, buf);

        let (status, status_style) = match &self.detail.stream {
            LogStreamStatus::Connecting => ("connecting".to_string(), styles::status_yellow()),
            LogStreamStatus::Live => ("live".to_string(), styles::status_green()),
            LogStreamStatus::Closed(None) => ("closed".to_string(), styles::text_muted()),
            LogStreamStatus::Closed(Some(e)) => (format!("closed: {e}"), styles::status_red()),
        };
        let terminal = styles::glass_block(false).title(Line::from(vec![
            Span::styled(" Logs ", styles::text_secondary()),
            Span::styled(format!("[{status}] "), status_style),
        ]));
        let lines: Vec<Line> = self
            .detail
            .logs
            .lines()
            .map(|line| Line::styled(line.to_string(), styles::text_primary()))
            .collect();
        Paragraph::new(lines).block(terminal).render(logs, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use area_app::config::Settings;
    use area_api::test_utils::test_applet;

    #[test]
    fn test_applets_page_lists_cards() {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.applets.begin();
        state
            .applets
            .resolve(ticket, Ok(vec![test_applet("1", "Morning ping")]));

        let mut term = TestTerminal::new();
        term.render_widget(AppletsPage::new(&state), term.area());

        assert!(term.buffer_contains("Morning ping"));
        assert!(term.buffer_contains("Applets"));
    }

    #[test]
    fn test_applets_page_empty_state() {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.applets.begin();
        state.applets.resolve(ticket, Ok(vec![]));

        let mut term = TestTerminal::new();
        term.render_widget(AppletsPage::new(&state), term.area());

        assert!(term.buffer_contains("No applet yet"));
    }

    #[test]
    fn test_detail_page_shows_log_tail_and_stream_status() {
        let mut detail = AppletDetailState::new("1", 10);
        let ticket = detail.applet.begin();
        detail.applet.resolve(ticket, Ok(test_applet("1", "Morning ping")));
        detail.logs.push_message("tick 1\ntick 2");
        detail.stream = LogStreamStatus::Live;

        let mut term = TestTerminal::with_size(80, 30);
        term.render_widget(AppletDetailPage::new(&[], &detail), term.area());

        assert!(term.buffer_contains("Morning ping"));
        assert!(term.buffer_contains("tick 2"));
        assert!(term.buffer_contains("[live]"));
    }
}
