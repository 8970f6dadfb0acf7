use area_app::AppState;
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::{ListItem, Widget}};

use super::{applet_card, page_block};
use crate::theme::styles;
use crate::widgets::list::{query_placeholder, render_list, render_placeholder};

/// Public applets from the store. Works without a session.
pub struct ExplorePage<'a> {
    state: &'a AppState,
}

impl<'a> ExplorePage<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for ExplorePage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = page_block("Explore");
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(text) = query_placeholder(&self.state.store) {
            render_placeholder(text, inner, buf);
            return;
        }
        let applets = self.state.store.data().map(Vec::as_slice).unwrap_or_default();
        if applets.is_empty() {
            render_placeholder("The store is empty", inner, buf);
            return;
        }

        let services = self.state.services();
        let items = applets
            .iter()
            .map(|applet| {
                let extra = vec![Span::styled("  public", styles::text_muted())];
                ListItem::new(applet_card(services, applet, extra))
            })
            .collect();
        render_list(items, Some(self.state.cursors.explore), inner, buf);
    }
}
