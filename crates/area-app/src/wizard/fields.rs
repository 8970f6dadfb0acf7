//! Field resolvers.
//!
//! Each parameter of an area gets one [`FieldInput`] chosen from its
//! [`FieldKind`]. Resolvers own only transient editing state (a text buffer,
//! a cursor, fetched options); every value change is reported to the
//! settings form as a [`FieldUpdate`] and committed there.

use area_core::{variable_options, FieldKind, SelectOption, SettingValue, Settings};

use crate::query::Ticket;

/// A value change reported by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Store this value.
    Set(SettingValue),
    /// Remove the key.
    Clear,
    /// Remove the key and flag the field.
    Invalid,
}

/// Options of a dynamic select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOptions {
    /// No response yet for the current endpoint.
    Loading,
    Ready(Vec<SelectOption>),
    Failed(String),
}

/// A fetch the settings form must issue for a dynamic select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsRequest {
    pub field: String,
    /// Endpoint with placeholders resolved.
    pub endpoint: String,
    pub ticket: Ticket,
}

// ── Plain input ──────────────────────────────────────────────────────────────

/// Text, long text, email, number and date fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainInput {
    kind: FieldKind,
    buffer: String,
}

impl PlainInput {
    fn new(kind: FieldKind, current: Option<&SettingValue>) -> Self {
        Self {
            kind,
            buffer: current.map(SettingValue::as_text).unwrap_or_default(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, c: char) -> FieldUpdate {
        if c == '\n' && !matches!(self.kind, FieldKind::LongText) {
            return self.commit();
        }
        self.buffer.push(c);
        self.commit()
    }

    pub fn backspace(&mut self) -> FieldUpdate {
        self.buffer.pop();
        self.commit()
    }

    pub fn clear(&mut self) -> FieldUpdate {
        self.buffer.clear();
        FieldUpdate::Clear
    }

    /// Append a `{{component}}` token. Number fields cannot hold one.
    pub fn insert(&mut self, token: &str) -> Option<FieldUpdate> {
        if matches!(self.kind, FieldKind::Number) {
            return None;
        }
        self.buffer.push_str(token);
        Some(self.commit())
    }

    fn commit(&self) -> FieldUpdate {
        if self.buffer.is_empty() {
            return FieldUpdate::Clear;
        }
        match self.kind {
            FieldKind::Number => match self.buffer.trim().parse::<i64>() {
                Ok(n) => FieldUpdate::Set(SettingValue::Number(n)),
                Err(_) => FieldUpdate::Invalid,
            },
            _ => FieldUpdate::Set(SettingValue::Text(self.buffer.clone())),
        }
    }
}

// ── Static select ────────────────────────────────────────────────────────────

/// Select over the schema's `values`. Index 0 is the empty entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectInput {
    options: Vec<SelectOption>,
    cursor: usize,
}

impl SelectInput {
    fn new(values: &[String], current: Option<&SettingValue>) -> Self {
        let options: Vec<SelectOption> = std::iter::once(SelectOption::new("", ""))
            .chain(values.iter().map(|value| SelectOption::plain(value.clone())))
            .collect();
        let cursor = position_of(&options, current);
        Self { options, cursor }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the selection by `delta`, wrapping around.
    pub fn select(&mut self, delta: isize) -> FieldUpdate {
        self.cursor = step(self.cursor, delta, self.options.len());
        value_update(&self.options[self.cursor])
    }
}

// ── Dynamic select ───────────────────────────────────────────────────────────

/// Select whose options come from a service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInput {
    endpoint: String,
    resolved: Option<String>,
    components: Vec<String>,
    variables: Vec<SelectOption>,
    options: RemoteOptions,
    current: Option<String>,
    cursor: usize,
    ticket: Ticket,
}

impl RemoteInput {
    fn new(endpoint: String, current: Option<&SettingValue>) -> Self {
        Self {
            endpoint,
            resolved: None,
            components: Vec::new(),
            variables: Vec::new(),
            options: RemoteOptions::Loading,
            current: current.map(SettingValue::as_text),
            cursor: 0,
            ticket: 0,
        }
    }

    pub fn options(&self) -> &RemoteOptions {
        &self.options
    }

    pub fn resolved_endpoint(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Recompute the endpoint and variables; returns a fetch to issue when
    /// the resolved endpoint or the available components changed.
    pub fn sync(
        &mut self,
        field: &str,
        service: &str,
        settings: &Settings,
        components: &[String],
    ) -> Option<OptionsRequest> {
        let resolved = settings.resolve_endpoint(&self.endpoint);
        let changed =
            self.resolved.as_deref() != Some(resolved.as_str()) || self.components != components;
        if !changed {
            return None;
        }

        self.resolved = Some(resolved.clone());
        self.components = components.to_vec();
        self.variables = variable_options(components, service, field);
        self.options = RemoteOptions::Loading;
        self.ticket += 1;
        self.realign();

        Some(OptionsRequest {
            field: field.to_string(),
            endpoint: resolved,
            ticket: self.ticket,
        })
    }

    /// Apply a fetch result. Answers to superseded fetches, or fetched from
    /// another endpoint than the one currently resolved, are dropped.
    pub fn loaded(
        &mut self,
        endpoint: &str,
        ticket: Ticket,
        result: Result<Vec<SelectOption>, String>,
    ) -> bool {
        if ticket != self.ticket || self.resolved.as_deref() != Some(endpoint) {
            return false;
        }
        self.options = match result {
            Ok(options) => RemoteOptions::Ready(options),
            Err(message) => RemoteOptions::Failed(message),
        };
        self.realign();
        true
    }

    /// Entries offered to the user: empty entry, variables, fetched options.
    pub fn choices(&self) -> Vec<SelectOption> {
        let fetched: &[SelectOption] = match &self.options {
            RemoteOptions::Ready(options) => options,
            RemoteOptions::Loading | RemoteOptions::Failed(_) => &[],
        };
        std::iter::once(SelectOption::new("", ""))
            .chain(self.variables.iter().cloned())
            .chain(fetched.iter().cloned())
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the selection. Nothing is selectable before the first response.
    pub fn select(&mut self, delta: isize) -> Option<FieldUpdate> {
        if matches!(self.options, RemoteOptions::Loading) {
            return None;
        }
        let choices = self.choices();
        self.cursor = step(self.cursor, delta, choices.len());
        let choice = &choices[self.cursor];
        self.current = (!choice.value.is_empty()).then(|| choice.value.clone());
        Some(value_update(choice))
    }

    fn realign(&mut self) {
        let choices = self.choices();
        self.cursor = self
            .current
            .as_ref()
            .and_then(|current| choices.iter().position(|c| &c.value == current))
            .unwrap_or(0);
    }
}

// ── FieldInput ───────────────────────────────────────────────────────────────

/// The resolver for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Plain(PlainInput),
    Select(SelectInput),
    Remote(RemoteInput),
}

impl FieldInput {
    /// Build the resolver for `kind`, seeded with the committed value.
    pub fn for_kind(kind: &FieldKind, current: Option<&SettingValue>) -> Self {
        match kind {
            FieldKind::Text
            | FieldKind::LongText
            | FieldKind::Email
            | FieldKind::Number
            | FieldKind::Date => FieldInput::Plain(PlainInput::new(kind.clone(), current)),
            FieldKind::Select { options } => FieldInput::Select(SelectInput::new(options, current)),
            FieldKind::RemoteSelect { endpoint } => {
                FieldInput::Remote(RemoteInput::new(endpoint.clone(), current))
            }
        }
    }

    /// Whether the field takes typed characters.
    pub fn is_text(&self) -> bool {
        matches!(self, FieldInput::Plain(_))
    }

    pub fn push(&mut self, c: char) -> Option<FieldUpdate> {
        match self {
            FieldInput::Plain(input) => Some(input.push(c)),
            FieldInput::Select(_) | FieldInput::Remote(_) => None,
        }
    }

    pub fn backspace(&mut self) -> Option<FieldUpdate> {
        match self {
            FieldInput::Plain(input) => Some(input.backspace()),
            FieldInput::Select(_) | FieldInput::Remote(_) => None,
        }
    }

    pub fn select(&mut self, delta: isize) -> Option<FieldUpdate> {
        match self {
            FieldInput::Plain(_) => None,
            FieldInput::Select(input) => Some(input.select(delta)),
            FieldInput::Remote(input) => input.select(delta),
        }
    }

    pub fn insert(&mut self, token: &str) -> Option<FieldUpdate> {
        match self {
            FieldInput::Plain(input) => input.insert(token),
            FieldInput::Select(_) | FieldInput::Remote(_) => None,
        }
    }

    /// Reset the control and clear the value.
    pub fn clear(&mut self) -> FieldUpdate {
        match self {
            FieldInput::Plain(input) => input.clear(),
            FieldInput::Select(input) => {
                input.cursor = 0;
                FieldUpdate::Clear
            }
            FieldInput::Remote(input) => {
                input.cursor = 0;
                input.current = None;
                FieldUpdate::Clear
            }
        }
    }

    /// Short text describing the current control value.
    pub fn display(&self) -> String {
        match self {
            FieldInput::Plain(input) => input.buffer.clone(),
            FieldInput::Select(input) => input.options[input.cursor].label.clone(),
            FieldInput::Remote(input) => match &input.options {
                RemoteOptions::Loading => "Loading...".to_string(),
                RemoteOptions::Failed(_) if input.variables.is_empty() => {
                    "Options unavailable".to_string()
                }
                RemoteOptions::Ready(options) if options.is_empty() && input.variables.is_empty() => {
                    "No options".to_string()
                }
                _ => input
                    .choices()
                    .get(input.cursor)
                    .map(|choice| choice.label.clone())
                    .unwrap_or_default(),
            },
        }
    }
}

fn value_update(option: &SelectOption) -> FieldUpdate {
    if option.value.is_empty() {
        FieldUpdate::Clear
    } else {
        FieldUpdate::Set(SettingValue::Text(option.value.clone()))
    }
}

fn position_of(options: &[SelectOption], current: Option<&SettingValue>) -> usize {
    current
        .map(SettingValue::as_text)
        .and_then(|current| options.iter().position(|o| o.value == current))
        .unwrap_or(0)
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> SettingValue {
        SettingValue::Text(value.to_string())
    }

    #[test]
    fn test_plain_input_clears_when_emptied() {
        let mut input = FieldInput::for_kind(&FieldKind::Text, Some(&text("a")));
        assert_eq!(input.backspace(), Some(FieldUpdate::Clear));
        assert_eq!(input.push('b'), Some(FieldUpdate::Set(text("b"))));
    }

    #[test]
    fn test_number_input_parses_or_flags() {
        let mut input = FieldInput::for_kind(&FieldKind::Number, None);
        assert_eq!(
            input.push('4'),
            Some(FieldUpdate::Set(SettingValue::Number(4)))
        );
        assert_eq!(input.push('x'), Some(FieldUpdate::Invalid));
        assert_eq!(input.backspace(), Some(FieldUpdate::Set(SettingValue::Number(4))));
        assert_eq!(input.insert("{{timer:time}}"), None);
    }

    #[test]
    fn test_insert_component_appends_token() {
        let mut input = FieldInput::for_kind(&FieldKind::LongText, Some(&text("Hi ")));
        assert_eq!(
            input.insert("{{github:issue:title}}"),
            Some(FieldUpdate::Set(text("Hi {{github:issue:title}}")))
        );
    }

    #[test]
    fn test_static_select_empty_entry_clears() {
        let kind = FieldKind::Select {
            options: vec!["red".into(), "blue".into()],
        };
        let mut input = FieldInput::for_kind(&kind, Some(&text("blue")));
        assert_eq!(input.display(), "blue");

        assert_eq!(input.select(1), Some(FieldUpdate::Clear));
        assert_eq!(input.select(1), Some(FieldUpdate::Set(text("red"))));
        assert_eq!(input.select(-1), Some(FieldUpdate::Clear));
    }

    #[test]
    fn test_remote_select_refetches_when_endpoint_changes() {
        let kind = FieldKind::RemoteSelect {
            endpoint: "/guilds/${req:guild}/channels".into(),
        };
        let mut input = FieldInput::for_kind(&kind, None);
        let FieldInput::Remote(remote) = &mut input else {
            panic!("expected remote select");
        };

        let mut settings = Settings::new();
        let request = remote.sync("req:channel", "discord", &settings, &[]).unwrap();
        assert_eq!(request.endpoint, "/guilds/default/channels");
        assert!(remote.sync("req:channel", "discord", &settings, &[]).is_none());

        settings.update("req:guild", Some(text("42")));
        let request = remote.sync("req:channel", "discord", &settings, &[]).unwrap();
        assert_eq!(request.endpoint, "/guilds/42/channels");
        assert_eq!(request.ticket, 2);
    }

    #[test]
    fn test_remote_select_loading_then_ready_with_variables() {
        let kind = FieldKind::RemoteSelect {
            endpoint: "/channels".into(),
        };
        let mut input = FieldInput::for_kind(&kind, None);
        let FieldInput::Remote(remote) = &mut input else {
            panic!("expected remote select");
        };
        let components = vec!["discord:channel:id".to_string(), "timer:time".to_string()];
        let request = remote
            .sync("req:channel:id", "discord", &Settings::new(), &components)
            .unwrap();

        assert_eq!(input.display(), "Loading...");
        assert_eq!(input.select(1), None);

        let FieldInput::Remote(remote) = &mut input else {
            unreachable!()
        };
        // Superseded tickets are ignored
        assert!(!remote.loaded(&request.endpoint, request.ticket + 1, Ok(vec![])));
        // So are answers from another endpoint
        assert!(!remote.loaded("/elsewhere", request.ticket, Ok(vec![])));
        assert!(remote.loaded(
            &request.endpoint,
            request.ticket,
            Ok(vec![SelectOption::new("general", "10")])
        ));

        let choices = remote.choices();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[1].label, "[Variable]: Discord:channel:id");
        assert_eq!(choices[1].value, "{{discord:channel:id}}");
        assert_eq!(choices[2].value, "10");

        assert_eq!(
            input.select(2),
            Some(FieldUpdate::Set(text("10")))
        );
    }

    #[test]
    fn test_remote_select_empty_response() {
        let kind = FieldKind::RemoteSelect {
            endpoint: "/channels".into(),
        };
        let mut input = FieldInput::for_kind(&kind, None);
        if let FieldInput::Remote(remote) = &mut input {
            let request = remote.sync("req:channel", "discord", &Settings::new(), &[]).unwrap();
            remote.loaded(&request.endpoint, request.ticket, Ok(vec![]));
        }
        assert_eq!(input.display(), "No options");
    }
}
