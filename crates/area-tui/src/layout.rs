//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the navigation header: border, tab row, border.
pub const HEADER_HEIGHT: u16 = 3;

/// Widest a toast gets before wrapping.
const TOAST_WIDTH: u16 = 48;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Navigation bar
    pub header: Rect,

    /// The current page
    pub content: Rect,

    /// Key hints
    pub footer: Rect,
}

/// Split the screen into header, page and hint line.
///
/// Terminals too short for all three drop the hint line first.
pub fn create(area: Rect) -> ScreenAreas {
    let footer_height = if area.height > HEADER_HEIGHT + 4 { 1 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(footer_height),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        content: chunks[1],
        footer: chunks[2],
    }
}

/// Top-right corner of `content` holding `count` single-line toasts.
pub fn toast_area(content: Rect, count: usize) -> Rect {
    let width = TOAST_WIDTH.min(content.width);
    let height = (count as u16).saturating_mul(3).min(content.height);
    Rect::new(
        content.x + content.width.saturating_sub(width),
        content.y,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout_standard_terminal() {
        let layout = create(Rect::new(0, 0, 80, 24));

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.content.y, 3);
        assert_eq!(layout.content.height, 20); // 24 - 3 - 1
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.footer.y, 23);
    }

    #[test]
    fn test_create_layout_drops_footer_when_short() {
        let layout = create(Rect::new(0, 0, 80, 6));

        assert_eq!(layout.footer.height, 0);
        assert_eq!(layout.content.height, 3);
    }

    #[test]
    fn test_toast_area_hugs_right_edge() {
        let content = Rect::new(0, 3, 100, 20);
        let area = toast_area(content, 2);

        assert_eq!(area.x + area.width, 100);
        assert_eq!(area.y, 3);
        assert_eq!(area.height, 6);
    }

    #[test]
    fn test_toast_area_clamps_to_narrow_content() {
        let area = toast_area(Rect::new(0, 0, 30, 4), 3);
        assert_eq!(area.width, 30);
        assert_eq!(area.height, 4);
    }
}
