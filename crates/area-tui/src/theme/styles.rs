//! Semantic style builders.

use std::str::FromStr;

use area_app::ToastLevel;
use area_core::{color_of, find_service, AppletStatus, Service};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// Key names in hint lines
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - the focused row of every list
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Red label of a field the server rejected
pub fn invalid_field() -> Style {
    Style::default()
        .fg(palette::STATUS_RED)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(accent_bold())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Domain mappings ---

/// Icon and style of a toast level.
pub fn toast_indicator(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => ("i", Style::default().fg(palette::STATUS_BLUE)),
        ToastLevel::Success => ("✓", status_green()),
        ToastLevel::Error => ("✗", status_red()),
    }
}

/// `(icon, label, style)` for an applet run status.
pub fn status_indicator(status: &AppletStatus) -> (&'static str, &'static str, Style) {
    if status.is_running() {
        (
            "●",
            "Running",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("○", "Stopped", text_muted())
    }
}

/// Parse a `#rrggbb` color, falling back to the default service color.
pub fn hex_color(hex: &str) -> Color {
    Color::from_str(hex).unwrap_or(palette::SERVICE_FALLBACK)
}

/// Color of a service by name; unknown services get the default.
pub fn service_color(services: &[Service], name: &str) -> Color {
    hex_color(color_of(find_service(services, name)))
}

/// A colored square marking a service.
pub fn service_swatch(services: &[Service], name: &str) -> Style {
    Style::default().fg(service_color(services, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_api::test_utils::test_service;
    use area_core::{Appearance, Authenticator};

    #[test]
    fn test_hex_color_parses_rgb() {
        assert_eq!(hex_color("#ff0000"), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_hex_color_falls_back_on_garbage() {
        assert_eq!(hex_color("not a color"), palette::SERVICE_FALLBACK);
    }

    #[test]
    fn test_service_color_prefers_service_then_authenticator() {
        let mut service = test_service("discord", vec![], vec![]);
        service.more = None;
        service.authenticator = Some(Authenticator {
            name: "discord".into(),
            enabled: true,
            more: Appearance {
                avatar: false,
                color: "#5865f2".into(),
            },
            authorization_uri: String::new(),
        });
        let mut branded = test_service("github", vec![], vec![]);
        branded.more = Some(Appearance {
            avatar: false,
            color: "#24292e".into(),
        });
        let services = vec![service, branded];
        assert_eq!(service_color(&services, "github"), Color::Rgb(0x24, 0x29, 0x2e));
        assert_eq!(
            service_color(&services, "discord"),
            Color::Rgb(0x58, 0x65, 0xf2)
        );

        assert_eq!(service_color(&services, "unknown"), palette::SERVICE_FALLBACK);
    }

    #[test]
    fn test_status_indicator_labels() {
        assert_eq!(status_indicator(&AppletStatus::Stopped).1, "Stopped");
    }
}
