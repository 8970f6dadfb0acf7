//! Main render/view function (View in TEA pattern)


use area_app::{AppPhase, AppState, Route, UiMode};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::layout;
use crate::theme::{palette, styles};
use crate::widgets::{self, pages};

/// Render the complete UI (View function in TEA)
///
/// Pure rendering: reads state and never changes it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    match &state.phase {
        AppPhase::Bootstrapping => {
            render_status_screen(frame, area, "Connecting", &connecting_text(state));
            return;
        }
        AppPhase::Unavailable(reason) => {
            let text = format!("{reason}\nPress F5 to retry or q to quit.");
            render_status_screen(frame, area, "Server unavailable", &text);
            return;
        }
        AppPhase::Ready | AppPhase::Quitting => {}
    }

    let areas = layout::create(area);

    let username = state.profile.data().map(|user| user.username.as_str());
    frame.render_widget(
        widgets::NavBar::new(&state.route, state.signed_in)
            .username(username)
            .dev_mode(state.dev_mode()),
        areas.header,
    );

    render_page(frame, state, areas.content);

    // Mode overlays
    match state.ui_mode {
        UiMode::Normal => {}
        UiMode::SignIn => {
            let external = !state.enabled_authenticators().is_empty();
            frame.render_widget(widgets::SignInForm::new(&state.sign_in, external), area);
        }
        UiMode::Wizard => {
            if let Some(wizard) = &state.wizard {
                frame.render_widget(widgets::WizardView::new(state, wizard), areas.content);
            }
        }
        UiMode::ConfirmDialog => {
            if let Some(dialog) = &state.confirm_dialog_state {
                frame.render_widget(widgets::ConfirmDialog::new(dialog), area);
            }
        }
        UiMode::Prompt => {
            if let Some(prompt) = &state.prompt {
                frame.render_widget(widgets::PromptDialog::new(prompt), area);
            }
        }
        UiMode::Picker => {
            if let Some(picker) = &state.picker {
                frame.render_widget(widgets::PickerDialog::new(picker), area);
            }
        }
        UiMode::OAuthPending => {
            frame.render_widget(widgets::OAuthPendingDialog::new(state.oauth.as_ref()), area);
        }
    }

    frame.render_widget(widgets::HelpBar::new(state), areas.footer);

    // Toasts go on top of everything
    let toast_area = layout::toast_area(areas.content, state.toasts.len());
    frame.render_widget(widgets::ToastStack::new(&state.toasts), toast_area);
}

fn render_page(frame: &mut Frame, state: &AppState, area: Rect) {
    match &state.route {
        Route::Home => frame.render_widget(pages::HomePage::new(state), area),
        Route::Applets => frame.render_widget(pages::AppletsPage::new(state), area),
        Route::AppletDetail { .. } => match &state.detail {
            Some(detail) => frame.render_widget(
                pages::AppletDetailPage::new(state.services(), detail),
                area,
            ),
            None => frame.render_widget(pages::AppletsPage::new(state), area),
        },
        Route::Explore => frame.render_widget(pages::ExplorePage::new(state), area),
        Route::Profile => frame.render_widget(pages::ProfilePage::new(state), area),
        Route::Authenticators => frame.render_widget(pages::AuthenticatorsPage::new(state), area),
        Route::CreateApplet => frame.render_widget(pages::DraftOverview::new(state), area),
        Route::Submit => frame.render_widget(pages::SubmitPage::new(state), area),
    }
}

fn connecting_text(state: &AppState) -> String {
    format!("Waiting for {} ...", state.settings.server.api_url)
}

/// Centered box for the bootstrap and unavailable screens.
fn render_status_screen(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let rect = widgets::modal_overlay::centered_rect(60, 7, area);
    frame.render_widget(Clear, rect);

    let mut lines = vec![Line::styled("AREA", styles::accent_bold()), Line::raw("")];
    lines.extend(
        text.lines()
            .map(|line| Line::styled(line.to_string(), styles::text_secondary())),
    );

    let block = styles::glass_block(true)
        .title(format!(" {title} "))
        .style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rect,
    );
}
