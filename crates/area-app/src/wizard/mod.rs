//! Applet builder wizard.
//!
//! One [`Wizard`] adds one area to the server draft. It walks
//! `ChooseService → ChooseArea → ChooseAreaSettings`, detouring through an
//! OAuth connect when the chosen service is not authorized yet. The wizard
//! never talks to the server itself: each selection returns a [`Selection`]
//! telling the handler what to do next.

pub mod fields;
pub mod form;
pub mod fuzzy;

pub use fields::{FieldInput, FieldUpdate, OptionsRequest, RemoteOptions};
pub use form::{FormMenu, FormMenuKind, SettingsForm};

use area_core::{
    find_service, AddAreaRequest, AreaDefinition, AreaType, Authenticator, Service,
    ServiceAuthorizations,
};

/// Notification shown when a service cannot be connected.
pub const OAUTH_UNAVAILABLE: &str = "Service is not available for oauth2";

/// Whether the user may pick a service right away.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceAccess {
    Authorized,
    /// Needs a connect flow through this authenticator first.
    NeedsOAuth(Authenticator),
    /// Not authorized and no usable authenticator.
    Unavailable,
}

pub fn service_access(service: &Service, authorizations: &ServiceAuthorizations) -> ServiceAccess {
    if authorizations.get(&service.name).copied().unwrap_or(false) {
        return ServiceAccess::Authorized;
    }
    match service.enabled_authenticator() {
        Some(auth) if !auth.authorization_uri.is_empty() => ServiceAccess::NeedsOAuth(auth.clone()),
        _ => ServiceAccess::Unavailable,
    }
}

/// Services able to fill `slot`, filtered by the search query.
pub fn available_services<'a>(
    services: &'a [Service],
    slot: AreaType,
    dev_mode: bool,
    filter: &str,
) -> Vec<&'a Service> {
    let capable: Vec<&Service> = services
        .iter()
        .filter(|service| service.offers(slot, dev_mode))
        .collect();
    let names: Vec<&str> = capable.iter().map(|service| service.name.as_str()).collect();
    fuzzy::fuzzy_filter(filter, &names)
        .into_iter()
        .map(|index| capable[index])
        .collect()
}

/// Areas of `service` for `slot`; wip items only in development mode.
pub fn available_areas(service: &Service, slot: AreaType, dev_mode: bool) -> Vec<&AreaDefinition> {
    service
        .areas(slot)
        .iter()
        .filter(|area| dev_mode || !area.wip)
        .collect()
}

#[derive(Debug, Clone)]
pub enum WizardStep {
    ChooseService,
    /// OAuth connect running for `service`.
    AwaitingAuthorization { service: String },
    ChooseArea { service: String },
    ChooseAreaSettings(Box<SettingsForm>),
}

/// Outcome of a selection, for the handler to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Nothing selectable under the cursor.
    Nothing,
    /// Moved to the next step.
    Advanced,
    /// Notify [`OAUTH_UNAVAILABLE`] and stay.
    Unavailable,
    /// Run a connect flow; the wizard waits in `AwaitingAuthorization`.
    Authorize(Authenticator),
    /// Ask before using a work-in-progress item.
    ConfirmWip { area: String },
    /// Commit this area to the draft right away.
    Commit(AddAreaRequest),
    /// Settings step opened; issue these option fetches.
    Configure(Vec<OptionsRequest>),
}

#[derive(Debug, Clone)]
pub struct Wizard {
    slot: AreaType,
    step: WizardStep,
    filter: String,
    cursor: usize,
    committing: bool,
}

impl Wizard {
    pub fn new(slot: AreaType) -> Self {
        Self {
            slot,
            step: WizardStep::ChooseService,
            filter: String::new(),
            cursor: 0,
            committing: false,
        }
    }

    pub fn slot(&self) -> AreaType {
        self.slot
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_committing(&self) -> bool {
        self.committing
            || matches!(&self.step, WizardStep::ChooseAreaSettings(form) if form.is_submitting())
    }

    pub fn form(&self) -> Option<&SettingsForm> {
        match &self.step {
            WizardStep::ChooseAreaSettings(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        match &mut self.step {
            WizardStep::ChooseAreaSettings(form) => Some(form),
            _ => None,
        }
    }

    /// Service whose areas are being chosen or configured.
    pub fn service(&self) -> Option<&str> {
        match &self.step {
            WizardStep::ChooseService => None,
            WizardStep::AwaitingAuthorization { service } | WizardStep::ChooseArea { service } => {
                Some(service)
            }
            WizardStep::ChooseAreaSettings(form) => Some(form.service()),
        }
    }

    // ── List navigation ──────────────────────────────────────

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn push_filter(&mut self, c: char) {
        if matches!(self.step, WizardStep::ChooseService) {
            self.filter.push(c);
            self.cursor = 0;
        }
    }

    pub fn pop_filter(&mut self) {
        if matches!(self.step, WizardStep::ChooseService) && self.filter.pop().is_some() {
            self.cursor = 0;
        }
    }

    // ── Transitions ──────────────────────────────────────────

    /// Pick the service under the cursor.
    pub fn select_service(
        &mut self,
        services: &[Service],
        authorizations: &ServiceAuthorizations,
        dev_mode: bool,
    ) -> Selection {
        if !matches!(self.step, WizardStep::ChooseService) {
            return Selection::Nothing;
        }
        let listed = available_services(services, self.slot, dev_mode, &self.filter);
        let Some(service) = listed.get(self.cursor) else {
            return Selection::Nothing;
        };

        match service_access(service, authorizations) {
            ServiceAccess::Authorized => {
                self.step = WizardStep::ChooseArea {
                    service: service.name.clone(),
                };
                self.cursor = 0;
                Selection::Advanced
            }
            ServiceAccess::NeedsOAuth(authenticator) => {
                self.step = WizardStep::AwaitingAuthorization {
                    service: service.name.clone(),
                };
                Selection::Authorize(authenticator)
            }
            ServiceAccess::Unavailable => Selection::Unavailable,
        }
    }

    /// The connect flow succeeded.
    pub fn authorized(&mut self) {
        if let WizardStep::AwaitingAuthorization { service } = &self.step {
            self.step = WizardStep::ChooseArea {
                service: service.clone(),
            };
            self.cursor = 0;
        }
    }

    /// The connect flow failed or was cancelled.
    pub fn authorization_failed(&mut self) {
        if matches!(self.step, WizardStep::AwaitingAuthorization { .. }) {
            self.step = WizardStep::ChooseService;
        }
    }

    /// Pick the area under the cursor. `components` feed reaction fields.
    pub fn select_area(
        &mut self,
        services: &[Service],
        dev_mode: bool,
        components: &[String],
    ) -> Selection {
        let WizardStep::ChooseArea { service } = &self.step else {
            return Selection::Nothing;
        };
        let Some(service) = find_service(services, service) else {
            return Selection::Nothing;
        };
        let Some(area) = available_areas(service, self.slot, dev_mode)
            .get(self.cursor)
            .copied()
        else {
            return Selection::Nothing;
        };

        if area.wip {
            return Selection::ConfirmWip {
                area: area.name.clone(),
            };
        }
        let area = area.clone();
        let service = service.name.clone();
        self.open_area(service, area, components)
    }

    /// Use a wip area after the user confirmed it.
    pub fn confirm_wip(
        &mut self,
        services: &[Service],
        area_name: &str,
        components: &[String],
    ) -> Selection {
        let WizardStep::ChooseArea { service } = &self.step else {
            return Selection::Nothing;
        };
        let Some(area) = find_service(services, service)
            .and_then(|service| service.find_area(self.slot, area_name))
            .cloned()
        else {
            return Selection::Nothing;
        };
        let service = service.clone();
        self.open_area(service, area, components)
    }

    fn open_area(
        &mut self,
        service: String,
        area: AreaDefinition,
        components: &[String],
    ) -> Selection {
        if !area.has_parameters() {
            self.committing = true;
            return Selection::Commit(AddAreaRequest {
                service,
                area_type: self.slot,
                area_item: area.name,
                area_settings: None,
            });
        }

        let components = match self.slot {
            AreaType::Reaction => components.to_vec(),
            AreaType::Action => Vec::new(),
        };
        let mut form = SettingsForm::new(service, self.slot, area, components);
        let requests = form.sync_remote();
        self.step = WizardStep::ChooseAreaSettings(Box::new(form));
        Selection::Configure(requests)
    }

    /// The settings form's commit request, if it can be submitted.
    pub fn commit(&mut self) -> Option<AddAreaRequest> {
        self.form_mut()?.commit_request()
    }

    /// The draft mutation failed.
    pub fn commit_failed(&mut self, failure: &area_core::ApiFailure) {
        self.committing = false;
        if let Some(form) = self.form_mut() {
            form.rejected(failure);
        }
    }

    /// Step back. Returns `false` when already at the first step, meaning the
    /// wizard should close.
    pub fn back(&mut self) -> bool {
        let previous = match &self.step {
            WizardStep::ChooseService => return false,
            WizardStep::AwaitingAuthorization { .. } | WizardStep::ChooseArea { .. } => {
                WizardStep::ChooseService
            }
            WizardStep::ChooseAreaSettings(form) => WizardStep::ChooseArea {
                service: form.service().to_string(),
            },
        };
        self.step = previous;
        self.cursor = 0;
        self.committing = false;
        true
    }
}
