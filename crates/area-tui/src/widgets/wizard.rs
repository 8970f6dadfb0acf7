//! The applet builder wizard, drawn as a large modal over the draft
//! overview. One view per step: service list with search, area list, and
//! the settings form with its popup menus.

use area_app::wizard::{
    available_areas, available_services, service_access, FormMenuKind, ServiceAccess,
    SettingsForm, Wizard, WizardStep,
};
use area_app::AppState;
use area_core::{field_label, find_service, pretty, AreaType, ServiceAuthorizations};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{ListItem, Paragraph, Widget, Wrap},
};

use super::list::{render_list, render_placeholder};
use super::modal_overlay::open_modal;
use crate::theme::styles;

pub struct WizardView<'a> {
    state: &'a AppState,
    wizard: &'a Wizard,
}

impl<'a> WizardView<'a> {
    pub fn new(state: &'a AppState, wizard: &'a Wizard) -> Self {
        Self { state, wizard }
    }

    fn title(&self) -> String {
        let slot = match self.wizard.slot() {
            AreaType::Action => "Add action",
            AreaType::Reaction => "Add reaction",
        };
        match self.wizard.service() {
            Some(service) => format!("{slot} · {}", pretty(service)),
            None => slot.to_string(),
        }
    }

    fn render_services(&self, area: Rect, buf: &mut Buffer) {
        let [search, list] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled("Search: ", styles::text_secondary()),
            Span::styled(self.wizard.filter(), styles::text_primary()),
            Span::styled("▏", styles::accent()),
        ]))
        .render(search, buf);

        let Some(authorizations) = self.state.service_authorizations.data() else {
            render_placeholder("Loading...", list, buf);
            return;
        };
        let services = available_services(
            self.state.services(),
            self.wizard.slot(),
            self.state.dev_mode(),
            self.wizard.filter(),
        );
        if services.is_empty() {
            render_placeholder("No service matches", list, buf);
            return;
        }

        let items = services
            .iter()
            .map(|service| {
                let (badge, badge_style) = access_badge(service, authorizations);
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", styles::service_swatch(self.state.services(), &service.name)),
                    Span::styled(pretty(&service.name), styles::text_primary()),
                    Span::styled(format!("  {badge}"), badge_style),
                ]))
            })
            .collect();
        render_list(items, Some(self.wizard.cursor()), list, buf);
    }

    fn render_awaiting(&self, service: &str, area: Rect, buf: &mut Buffer) {
        render_placeholder(
            &format!("Waiting for {} authorization... (Esc to cancel)", pretty(service)),
            area,
            buf,
        );
    }

    fn render_areas(&self, service_name: &str, area: Rect, buf: &mut Buffer) {
        let Some(service) = find_service(self.state.services(), service_name) else {
            render_placeholder("Unknown service", area, buf);
            return;
        };
        let areas = available_areas(service, self.wizard.slot(), self.state.dev_mode());
        if areas.is_empty() {
            render_placeholder("Nothing to add from this service", area, buf);
            return;
        }

        let items = areas
            .iter()
            .map(|definition| {
                let mut title = vec![Span::styled(pretty(&definition.name), styles::text_primary())];
                if definition.wip {
                    title.push(Span::styled(" [wip]", styles::status_yellow()));
                }
                if !definition.has_parameters() {
                    title.push(Span::styled(" · no parameters", styles::text_muted()));
                }
                ListItem::new(vec![
                    Line::from(title),
                    Line::styled(format!("  {}", definition.description), styles::text_muted()),
                ])
            })
            .collect();
        render_list(items, Some(self.wizard.cursor()), area, buf);
    }

    fn render_settings(&self, form: &SettingsForm, area: Rect, buf: &mut Buffer) {
        let [heading, fields, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(form.area().description.as_str())
            .style(styles::text_secondary())
            .wrap(Wrap { trim: true })
            .render(heading, buf);

        let visible = form.visible();
        let items: Vec<ListItem> = visible.iter().map(|name| field_item(form, name)).collect();
        render_list(items, Some(form.focus()), fields, buf);

        let status_line = if self.wizard.is_committing() {
            Line::styled("Saving...", styles::status_yellow())
        } else if form.is_submittable() {
            Line::styled("Ready to save", styles::status_green())
        } else {
            let missing: Vec<String> = form.missing_required().into_iter().map(field_label).collect();
            Line::styled(format!("Missing: {}", missing.join(", ")), styles::text_muted())
        };
        Paragraph::new(status_line).render(status, buf);

        if let Some(menu) = form.menu() {
            let title = match menu.kind {
                FormMenuKind::AddParameter => "Add parameter",
                FormMenuKind::InsertComponent => "Insert component",
            };
            let entries = form.menu_items();
            let height = entries.len() as u16 + 2;
            let inner = open_modal(buf, area, 36, height, title);
            let items = entries
                .iter()
                .map(|entry| match menu.kind {
                    FormMenuKind::AddParameter => ListItem::new(field_label(entry)),
                    FormMenuKind::InsertComponent => ListItem::new(entry.clone()),
                })
                .collect();
            render_list(items, Some(menu.cursor), inner, buf);
        }
    }
}

fn access_badge(
    service: &area_core::Service,
    authorizations: &ServiceAuthorizations,
) -> (&'static str, Style) {
    match service_access(service, authorizations) {
        ServiceAccess::Authorized => ("connected", styles::status_green()),
        ServiceAccess::NeedsOAuth(_) => ("connect", styles::status_yellow()),
        ServiceAccess::Unavailable => ("unavailable", styles::text_muted()),
    }
}

/// One row of the settings form: label, value and description.
fn field_item<'a>(form: &'a SettingsForm, name: &str) -> ListItem<'a> {
    let schema = form.schema(name);
    let required = schema.is_some_and(|schema| schema.required);
    let label_style = if form.is_invalid(name) {
        styles::invalid_field()
    } else {
        styles::text_secondary()
    };
    let value = form.input(name).map(|input| input.display()).unwrap_or_default();

    let mut label = vec![Span::styled(field_label(name), label_style)];
    if required {
        label.push(Span::styled("*", styles::status_red()));
    }
    label.push(Span::raw(": "));
    label.push(Span::styled(value, styles::text_primary()));

    let mut lines = vec![Line::from(label)];
    if let Some(description) = schema.map(|schema| schema.description.as_str()) {
        if !description.is_empty() {
            lines.push(Line::styled(format!("  {description}"), styles::text_muted()));
        }
    }
    ListItem::new(lines)
}

impl Widget for WizardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(8).max(40);
        let height = area.height.saturating_sub(2).max(10);
        let inner = open_modal(buf, area, width, height, &self.title());

        match self.wizard.step() {
            WizardStep::ChooseService => self.render_services(inner, buf),
            WizardStep::AwaitingAuthorization { service } => {
                self.render_awaiting(service, inner, buf)
            }
            WizardStep::ChooseArea { service } => self.render_areas(service, inner, buf),
            WizardStep::ChooseAreaSettings(form) => self.render_settings(form, inner, buf),
        }
    }
}
