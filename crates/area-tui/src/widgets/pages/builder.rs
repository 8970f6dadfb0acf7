use area_app::state::SubmitField;
use area_app::AppState;
use area_core::Draft;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{ListItem, Paragraph, Widget},
};

use super::applets::area_lines;
use super::page_block;
use crate::theme::styles;
use crate::widgets::list::{query_placeholder, render_list, render_placeholder};

/// The server draft: its action, its reactions and the "Next step" gate.
pub struct DraftOverview<'a> {
    state: &'a AppState,
}

impl<'a> DraftOverview<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn items(&self, draft: &Draft) -> Vec<ListItem<'static>> {
        let services = self.state.services();
        let mut items = Vec::new();
        if let Some(action) = &draft.action {
            let mut lines = vec![Line::styled("When", styles::accent_bold())];
            lines.extend(area_lines(services, action));
            items.push(ListItem::new(lines));
        }
        for (index, reaction) in draft.reactions.iter().enumerate() {
            let mut lines = vec![Line::styled(
                format!("Then #{}", index + 1),
                styles::accent_bold(),
            )];
            lines.extend(area_lines(services, reaction));
            items.push(ListItem::new(lines));
        }
        items
    }
}

fn next_step_line(draft: &Draft) -> Line<'static> {
    if draft.is_complete() {
        Line::from(vec![
            Span::styled("n", styles::keybinding()),
            Span::styled(" Next step", styles::status_green()),
        ])
    } else if !draft.has_action() {
        Line::styled("Add an action to start (a)", styles::text_muted())
    } else {
        Line::styled(
            "Next step needs at least one reaction (r)",
            styles::text_muted(),
        )
    }
}

impl Widget for DraftOverview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Create applet");
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(text) = query_placeholder(&self.state.draft) {
            render_placeholder(text, inner, buf);
            return;
        }
        let Some(draft) = self.state.draft.data() else {
            return;
        };

        let [list, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        if draft.is_empty() {
            render_placeholder("Empty draft. Press a to choose the action.", list, buf);
        } else {
            let selected = self.state.overview_rows().checked_sub(1).map(|last| {
                self.state.cursors.overview.min(last)
            });
            render_list(self.items(draft), selected, list, buf);
        }
        Paragraph::new(next_step_line(draft)).render(footer, buf);
    }
}

/// Name, description and visibility of the applet being published.
pub struct SubmitPage<'a> {
    state: &'a AppState,
}

impl<'a> SubmitPage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn field(&self, field: SubmitField, label: &'static str, value: String) -> Line<'static> {
        let focused = self.state.submit_form.focus == field;
        let label_style = if focused {
            styles::accent_bold()
        } else {
            styles::text_secondary()
        };
        let mut spans = vec![
            Span::styled(format!("{label:>12}  "), label_style),
            Span::styled(value, styles::text_primary()),
        ];
        if focused && field != SubmitField::Visibility {
            spans.push(Span::styled("▏", styles::accent()));
        }
        Line::from(spans)
    }
}

impl Widget for SubmitPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Publish applet");
        let inner = block.inner(area);
        block.render(area, buf);

        let form = &self.state.submit_form;
        let visibility = if form.public {
            "◉ public  ○ private"
        } else {
            "○ public  ◉ private"
        };
        let mut lines = vec![
            self.field(SubmitField::Name, "Name", form.name.clone()),
            self.field(SubmitField::Description, "Description", form.description.clone()),
            self.field(SubmitField::Visibility, "Visibility", visibility.to_string()),
            Line::raw(""),
        ];
        lines.push(if form.submitting {
            Line::styled("Creating applet...", styles::status_yellow())
        } else if form.is_valid() {
            Line::styled("Press Enter to create the applet", styles::status_green())
        } else {
            Line::styled("Name and description are required", styles::text_muted())
        });

        if let Some(draft) = self.state.draft.data() {
            lines.push(Line::raw(""));
            if let Some(action) = &draft.action {
                lines.extend(area_lines(self.state.services(), action));
            }
            for reaction in &draft.reactions {
                lines.extend(area_lines(self.state.services(), reaction));
            }
        }
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use area_app::config::Settings;
    use area_core::{AreaType, Area};

    fn area(area_type: AreaType, service: &str, name: &str) -> Area {
        Area {
            id: format!("{service}-{name}"),
            area_type,
            service: service.into(),
            name: name.into(),
            store: Default::default(),
        }
    }

    fn state_with_draft(draft: Draft) -> AppState {
        let mut state = AppState::new(Settings::default(), true);
        let ticket = state.draft.begin();
        state.draft.resolve(ticket, Ok(draft));
        state
    }

    #[test]
    fn test_overview_gates_next_step() {
        let state = state_with_draft(Draft {
            action: Some(area(AreaType::Action, "timer", "every_minute")),
            reactions: vec![],
        });
        let mut term = TestTerminal::new();
        term.render_widget(DraftOverview::new(&state), term.area());

        assert!(term.buffer_contains("Every Minute"));
        assert!(term.buffer_contains("needs at least one reaction"));
    }

    #[test]
    fn test_complete_overview_offers_next_step() {
        let state = state_with_draft(Draft {
            action: Some(area(AreaType::Action, "timer", "every_minute")),
            reactions: vec![area(AreaType::Reaction, "discord", "send_message")],
        });
        let mut term = TestTerminal::new();
        term.render_widget(DraftOverview::new(&state), term.area());

        assert!(term.buffer_contains("Then #1"));
        assert!(term.buffer_contains("Send Message"));
        assert!(term.buffer_contains("n Next step"));
    }

    #[test]
    fn test_empty_draft_prompts_for_action() {
        let state = state_with_draft(Draft::default());
        let mut term = TestTerminal::new();
        term.render_widget(DraftOverview::new(&state), term.area());

        assert!(term.buffer_contains("Empty draft"));
    }

    #[test]
    fn test_submit_page_shows_form() {
        let mut state = state_with_draft(Draft::default());
        state.submit_form.name = "My applet".into();
        state.submit_form.public = true;

        let mut term = TestTerminal::new();
        term.render_widget(SubmitPage::new(&state), term.area());

        assert!(term.buffer_contains("My applet"));
        assert!(term.buffer_contains("◉ public"));
        assert!(term.buffer_contains("Name and description are required"));
    }
}
