//! Navigation bar
//!
//! Title, one numbered tab per page and the account indicator, inside the
//! header's glass container.

use area_app::Route;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{palette, styles};

const TITLE: &str = " AREA ";

pub struct NavBar<'a> {
    route: &'a Route,
    signed_in: bool,
    username: Option<&'a str>,
    dev_mode: bool,
}

impl<'a> NavBar<'a> {
    pub fn new(route: &'a Route, signed_in: bool) -> Self {
        Self {
            route,
            signed_in,
            username: None,
            dev_mode: false,
        }
    }

    pub fn username(mut self, username: Option<&'a str>) -> Self {
        self.username = username;
        self
    }

    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Tab highlighted for the current route; sub-pages light their parent.
    fn selected_tab(&self) -> Option<usize> {
        let parent = match self.route {
            Route::AppletDetail { .. } => Route::Applets,
            Route::Submit => Route::CreateApplet,
            other => other.clone(),
        };
        Route::navigation().iter().position(|route| *route == parent)
    }

    fn tab_titles(&self) -> Vec<Line<'static>> {
        Route::navigation()
            .iter()
            .enumerate()
            .map(|(index, route)| {
                let locked = route.requires_session() && !self.signed_in;
                let style = if locked {
                    styles::text_muted()
                } else {
                    styles::text_secondary()
                };
                Line::from(vec![
                    Span::styled(format!("{}", index + 1), styles::keybinding()),
                    Span::styled(format!(" {}", route.title()), style),
                ])
            })
            .collect()
    }

    fn account(&self) -> Line<'static> {
        let mut spans = Vec::new();
        if self.dev_mode {
            spans.push(Span::styled("[dev] ", styles::status_yellow()));
        }
        match (self.signed_in, self.username) {
            (true, Some(name)) => {
                spans.push(Span::styled("● ", styles::status_green()));
                spans.push(Span::styled(name.to_string(), styles::text_primary()));
            }
            (true, None) => spans.push(Span::styled("● signed in", styles::status_green())),
            (false, _) => spans.push(Span::styled("○ signed out", styles::text_muted())),
        }
        spans.push(Span::raw(" "));
        Line::from(spans)
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let account = self.account();
        let account_width = account.width() as u16;
        let [title_area, tabs_area, account_area] = Layout::horizontal([
            Constraint::Length(TITLE.width() as u16),
            Constraint::Min(0),
            Constraint::Length(account_width),
        ])
        .areas(inner);

        Paragraph::new(Span::styled(
            TITLE,
            Style::default()
                .fg(palette::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .render(title_area, buf);

        Tabs::new(self.tab_titles())
            .select(self.selected_tab())
            .highlight_style(styles::focused_selected())
            .divider(Span::styled("│", styles::text_muted()))
            .render(tabs_area, buf);

        Paragraph::new(account).render(account_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_nav_bar_lists_pages() {
        let mut term = TestTerminal::with_size(120, 3);
        let route = Route::Home;
        term.render_widget(NavBar::new(&route, false), term.area());

        assert!(term.buffer_contains("AREA"));
        assert!(term.buffer_contains("1 Home"));
        assert!(term.buffer_contains("6 Profile"));
        assert!(term.buffer_contains("signed out"));
    }

    #[test]
    fn test_nav_bar_shows_username() {
        let mut term = TestTerminal::with_size(120, 3);
        let route = Route::Applets;
        term.render_widget(
            NavBar::new(&route, true).username(Some("alice")).dev_mode(true),
            term.area(),
        );

        assert!(term.buffer_contains("alice"));
        assert!(term.buffer_contains("[dev]"));
    }

    #[test]
    fn test_sub_pages_highlight_parent_tab() {
        let route = Route::AppletDetail { id: "1".into() };
        assert_eq!(NavBar::new(&route, true).selected_tab(), Some(1));
        let route = Route::Submit;
        assert_eq!(NavBar::new(&route, true).selected_tab(), Some(2));
    }
}
