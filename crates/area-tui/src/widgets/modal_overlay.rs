//! Shared drawing for modal dialogs.
//!
//! Every dialog dims the page behind it, clears its own rectangle, drops a
//! one-cell shadow and draws a titled block. [`open_modal`] does all of it
//! and hands back the inner area.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::{palette, styles};

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

/// Mute every cell of `area`.
pub fn dim_background(buf: &mut Buffer, area: Rect) {
    let dim = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim);
            }
        }
    }
}

/// Shadow one cell right of and below `rect`, clipped to `bounds`.
pub fn render_shadow(buf: &mut Buffer, rect: Rect, bounds: Rect) {
    let style = Style::default().fg(palette::SHADOW).bg(palette::SHADOW);
    let mut paint = |x: u16, y: u16| {
        if x < bounds.right() && y < bounds.bottom() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }
    };

    for y in rect.top() + 1..=rect.bottom() {
        paint(rect.right(), y);
    }
    for x in rect.left() + 1..=rect.right() {
        paint(x, rect.bottom());
    }
}

/// Draw a modal frame over `area` and return its inner area.
pub fn open_modal(buf: &mut Buffer, area: Rect, width: u16, height: u16, title: &str) -> Rect {
    dim_background(buf, area);
    let rect = centered_rect(width, height, area);
    render_shadow(buf, rect, area);
    Clear.render(rect, buf);

    let block = styles::modal_block(title);
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}
