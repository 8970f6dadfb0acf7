//! Selectable lists and empty-state placeholders shared by the pages.

use area_app::Query;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::theme::styles;

/// Render `items` with the row at `selected` highlighted and kept in view.
pub fn render_list(items: Vec<ListItem<'_>>, selected: Option<usize>, area: Rect, buf: &mut Buffer) {
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .highlight_style(styles::focused_selected())
        .highlight_symbol("› ");
    StatefulWidget::render(list, area, buf, &mut list_state);
}

/// Centered muted text for empty or loading content.
pub fn render_placeholder(text: &str, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    Paragraph::new(text)
        .style(styles::text_muted())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(middle, buf);
}

/// What to show instead of a query's data, if it has none.
pub fn query_placeholder<T>(query: &Query<T>) -> Option<&'static str> {
    if query.data().is_some() {
        return None;
    }
    if query.error().is_some() && !query.is_loading() {
        Some("Could not load this page. Press F5 to retry.")
    } else {
        Some("Loading...")
    }
}
