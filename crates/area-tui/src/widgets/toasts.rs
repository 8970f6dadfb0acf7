//! Transient notifications, newest at the top.

use area_app::{Toast, Toasts};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::theme::{palette, styles};

pub struct ToastStack<'a> {
    toasts: &'a Toasts,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a Toasts) -> Self {
        Self { toasts }
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut newest_first: Vec<&Toast> = self.toasts.iter().collect();
        newest_first.reverse();
        if newest_first.is_empty() || area.height < 3 {
            return;
        }

        let slots = Layout::vertical(vec![Constraint::Length(3); newest_first.len()]).split(area);
        for (toast, slot) in newest_first.into_iter().zip(slots.iter()) {
            if slot.height < 3 {
                break;
            }
            let (icon, style) = styles::toast_indicator(toast.level);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(style)
                .style(Style::default().bg(palette::TOAST_BG));

            Clear.render(*slot, buf);
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{icon} "), style),
                Span::styled(toast.text.as_str(), styles::text_primary()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(*slot, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use std::time::Duration;

    #[test]
    fn test_newest_toast_is_on_top() {
        let mut toasts = Toasts::new(Duration::from_secs(5));
        toasts.info("first");
        toasts.error("second");

        let mut term = TestTerminal::with_size(40, 6);
        term.render_widget(ToastStack::new(&toasts), term.area());

        assert!(term.line_contains(1, "second"));
        assert!(term.line_contains(4, "first"));
    }

    #[test]
    fn test_empty_stack_draws_nothing() {
        let toasts = Toasts::new(Duration::from_secs(5));
        let mut term = TestTerminal::with_size(40, 6);
        term.render_widget(ToastStack::new(&toasts), term.area());

        assert!(!term.buffer_contains("│"));
    }
}
