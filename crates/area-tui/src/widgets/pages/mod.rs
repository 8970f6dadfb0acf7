//! One widget per routed page.

mod applets;
mod authenticators;
mod builder;
mod explore;
mod home;
mod profile;

pub use applets::{AppletDetailPage, AppletsPage};
pub use authenticators::AuthenticatorsPage;
pub use builder::{DraftOverview, SubmitPage};
pub use explore::ExplorePage;
pub use home::HomePage;
pub use profile::ProfilePage;

use area_core::{pretty, Applet, Service};
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;

use crate::theme::styles;

/// The glass container every page draws in.
fn page_block(title: &str) -> Block<'_> {
    styles::glass_block(true)
        .title(format!(" {title} "))
        .title_style(styles::accent_bold())
}

/// `■ Service · Action` header of an applet card.
fn applet_trigger(services: &[Service], applet: &Applet) -> Vec<Span<'static>> {
    let service = applet.action_service();
    vec![
        Span::styled("■ ", styles::service_swatch(services, service)),
        Span::styled(pretty(service), styles::text_secondary()),
        Span::styled(" · ", styles::text_muted()),
        Span::styled(pretty(applet.action_name()), styles::text_secondary()),
    ]
}

/// Two-line card body shared by the applet and store lists.
fn applet_card(services: &[Service], applet: &Applet, extra: Vec<Span<'static>>) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(applet.name.clone(), styles::text_primary())];
    title.push(Span::raw("  "));
    title.extend(applet_trigger(services, applet));
    title.extend(extra);
    vec![
        Line::from(title),
        Line::styled(format!("  {}", applet.description), styles::text_muted()),
    ]
}
