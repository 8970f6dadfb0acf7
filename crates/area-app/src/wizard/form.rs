//! The settings step of the applet builder.
//!
//! [`SettingsForm`] owns the settings object for one area and is the only
//! place values get committed. Field resolvers report changes through
//! [`FieldUpdate`]; the form applies them, tracks which optional fields the
//! user revealed, and knows which remote selects need a (re)fetch.

use std::collections::{BTreeMap, BTreeSet};

use area_core::{
    component_token, is_submittable, missing_required, revealable_fields, visible_fields,
    AddAreaRequest, ApiFailure, AreaDefinition, AreaType, FieldKind, FieldSchema, SelectOption,
    Settings,
};

use super::fields::{FieldInput, FieldUpdate, OptionsRequest};
use crate::query::Ticket;

/// Popup menus of the settings step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMenuKind {
    /// Optional fields not shown yet.
    AddParameter,
    /// Components of the draft action.
    InsertComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormMenu {
    pub kind: FormMenuKind,
    pub cursor: usize,
}

#[derive(Debug, Clone)]
pub struct SettingsForm {
    service: String,
    slot: AreaType,
    area: AreaDefinition,
    settings: Settings,
    revealed: BTreeSet<String>,
    inputs: BTreeMap<String, FieldInput>,
    invalid: BTreeSet<String>,
    components: Vec<String>,
    focus: usize,
    menu: Option<FormMenu>,
    submitting: bool,
}

impl SettingsForm {
    /// A blank form. `components` are the tokens reaction fields may
    /// reference; pass an empty list for the action slot.
    pub fn new(
        service: impl Into<String>,
        slot: AreaType,
        area: AreaDefinition,
        components: Vec<String>,
    ) -> Self {
        let inputs = area
            .store
            .iter()
            .map(|(name, schema)| (name.clone(), FieldInput::for_kind(&schema.kind, None)))
            .collect();
        Self {
            service: service.into(),
            slot,
            area,
            settings: Settings::new(),
            revealed: BTreeSet::new(),
            inputs,
            invalid: BTreeSet::new(),
            components,
            focus: 0,
            menu: None,
            submitting: false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn slot(&self) -> AreaType {
        self.slot
    }

    pub fn area(&self) -> &AreaDefinition {
        &self.area
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn schema(&self, name: &str) -> Option<&FieldSchema> {
        self.area.store.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&FieldInput> {
        self.inputs.get(name)
    }

    /// Visible field names in display order.
    pub fn visible(&self) -> Vec<&str> {
        visible_fields(&self.area.store, &self.settings, &self.revealed)
    }

    pub fn revealable(&self) -> Vec<&str> {
        revealable_fields(&self.area.store, &self.settings, &self.revealed)
    }

    pub fn missing_required(&self) -> Vec<&str> {
        missing_required(&self.area.store, &self.settings)
    }

    pub fn is_invalid(&self, name: &str) -> bool {
        self.invalid.contains(name)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<String> {
        self.visible().get(self.focus).map(|name| name.to_string())
    }

    pub fn menu(&self) -> Option<FormMenu> {
        self.menu
    }

    /// Entries of the open menu.
    pub fn menu_items(&self) -> Vec<String> {
        self.menu
            .map(|menu| self.menu_items_for(menu.kind))
            .unwrap_or_default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Every required field has a value and no commit is in flight.
    pub fn is_submittable(&self) -> bool {
        !self.submitting && is_submittable(&self.area.store, &self.settings)
    }

    /// Whether the focused field can take a component token.
    pub fn can_insert_component(&self) -> bool {
        !self.components.is_empty()
            && self
                .focused_field()
                .and_then(|name| self.schema(&name))
                .is_some_and(|schema| {
                    schema.kind.is_free_text() && !matches!(schema.kind, FieldKind::Number)
                })
    }

    // ─────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────

    /// Commit a resolver's change to the settings object.
    pub fn apply(&mut self, name: &str, update: FieldUpdate) -> Vec<OptionsRequest> {
        match update {
            FieldUpdate::Set(value) => {
                self.invalid.remove(name);
                self.settings.update(name, Some(value));
            }
            FieldUpdate::Clear => {
                self.invalid.remove(name);
                self.settings.remove(name);
            }
            FieldUpdate::Invalid => {
                self.invalid.insert(name.to_string());
                self.settings.remove(name);
            }
        }
        self.clamp_focus();
        self.sync_remote()
    }

    pub fn type_char(&mut self, c: char) -> Vec<OptionsRequest> {
        self.edit_focused(|input| input.push(c))
    }

    pub fn backspace(&mut self) -> Vec<OptionsRequest> {
        self.edit_focused(FieldInput::backspace)
    }

    pub fn select(&mut self, delta: isize) -> Vec<OptionsRequest> {
        self.edit_focused(|input| input.select(delta))
    }

    pub fn clear_focused(&mut self) -> Vec<OptionsRequest> {
        self.edit_focused(|input| Some(input.clear()))
    }

    fn edit_focused(
        &mut self,
        edit: impl FnOnce(&mut FieldInput) -> Option<FieldUpdate>,
    ) -> Vec<OptionsRequest> {
        let Some(name) = self.focused_field() else {
            return Vec::new();
        };
        let Some(update) = self.inputs.get_mut(&name).and_then(edit) else {
            return Vec::new();
        };
        self.apply(&name, update)
    }

    pub fn focus_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    /// Show an optional field and focus it.
    pub fn reveal(&mut self, name: &str) -> Vec<OptionsRequest> {
        if !self.area.store.contains_key(name) {
            return Vec::new();
        }
        self.revealed.insert(name.to_string());
        if let Some(index) = self.visible().iter().position(|field| *field == name) {
            self.focus = index;
        }
        self.sync_remote()
    }

    /// Hide a revealed optional field and drop its value.
    ///
    /// Returns `false` for required fields and fields the user did not
    /// reveal.
    pub fn remove_optional(&mut self, name: &str) -> bool {
        let required = self.schema(name).is_some_and(|schema| schema.required);
        if required || !self.revealed.remove(name) {
            return false;
        }
        if let Some(input) = self.inputs.get_mut(name) {
            input.clear();
        }
        self.apply(name, FieldUpdate::Clear);
        true
    }

    /// Append `{{component}}` to the focused field.
    pub fn insert_component(&mut self, component: &str) -> Vec<OptionsRequest> {
        let token = component_token(component);
        self.edit_focused(|input| input.insert(&token))
    }

    // ─────────────────────────────────────────────────────────
    // Menus
    // ─────────────────────────────────────────────────────────

    /// Open a menu if it would have entries.
    pub fn open_menu(&mut self, kind: FormMenuKind) -> bool {
        let available = match kind {
            FormMenuKind::AddParameter => !self.revealable().is_empty(),
            FormMenuKind::InsertComponent => self.can_insert_component(),
        };
        if available {
            self.menu = Some(FormMenu { kind, cursor: 0 });
        }
        available
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    pub fn menu_move(&mut self, delta: isize) {
        let len = self.menu_items().len();
        if let Some(menu) = self.menu.as_mut() {
            if len > 0 {
                menu.cursor = (menu.cursor as isize + delta).rem_euclid(len as isize) as usize;
            }
        }
    }

    /// Apply the highlighted menu entry and close the menu.
    pub fn menu_choose(&mut self) -> Vec<OptionsRequest> {
        let Some(menu) = self.menu.take() else {
            return Vec::new();
        };
        let Some(item) = self.menu_items_for(menu.kind).into_iter().nth(menu.cursor) else {
            return Vec::new();
        };
        match menu.kind {
            FormMenuKind::AddParameter => self.reveal(&item),
            FormMenuKind::InsertComponent => self.insert_component(&item),
        }
    }

    fn menu_items_for(&self, kind: FormMenuKind) -> Vec<String> {
        match kind {
            FormMenuKind::AddParameter => {
                self.revealable().into_iter().map(str::to_string).collect()
            }
            FormMenuKind::InsertComponent => self.components.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Remote selects
    // ─────────────────────────────────────────────────────────

    /// Fetches needed by visible dynamic selects after the last change.
    pub fn sync_remote(&mut self) -> Vec<OptionsRequest> {
        let visible: Vec<String> = self.visible().into_iter().map(str::to_string).collect();
        let mut requests = Vec::new();
        for name in visible {
            if let Some(FieldInput::Remote(input)) = self.inputs.get_mut(&name) {
                if let Some(request) =
                    input.sync(&name, &self.service, &self.settings, &self.components)
                {
                    requests.push(request);
                }
            }
        }
        requests
    }

    /// Apply a fetched option list. Returns `false` for superseded answers.
    pub fn options_loaded(
        &mut self,
        field: &str,
        endpoint: &str,
        ticket: Ticket,
        result: Result<Vec<SelectOption>, String>,
    ) -> bool {
        match self.inputs.get_mut(field) {
            Some(FieldInput::Remote(input)) => input.loaded(endpoint, ticket, result),
            _ => false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Commit
    // ─────────────────────────────────────────────────────────

    /// The draft mutation for this form, marking it as submitting.
    pub fn commit_request(&mut self) -> Option<AddAreaRequest> {
        if !self.is_submittable() {
            return None;
        }
        self.submitting = true;
        Some(AddAreaRequest {
            service: self.service.clone(),
            area_type: self.slot,
            area_item: self.area.name.clone(),
            area_settings: Some(self.settings.clone()),
        })
    }

    /// The commit failed. Entered values stay; 406 marks flag fields.
    pub fn rejected(&mut self, failure: &ApiFailure) {
        self.submitting = false;
        for name in failure.invalid_fields() {
            self.invalid.insert(name.to_string());
        }
    }

    fn clamp_focus(&mut self) {
        let len = self.visible().len();
        if self.focus >= len {
            self.focus = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_core::SettingValue;

    fn area(fields: Vec<(&str, FieldSchema)>) -> AreaDefinition {
        AreaDefinition {
            name: "send_message".into(),
            description: String::new(),
            components: Vec::new(),
            store: fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            wip: false,
            use_gateway: false,
        }
    }

    fn message_form() -> SettingsForm {
        SettingsForm::new(
            "discord",
            AreaType::Reaction,
            area(vec![
                (
                    "req:content",
                    FieldSchema::new(FieldKind::LongText).required().with_priority(2),
                ),
                ("req:guild", FieldSchema::new(FieldKind::Text).required().with_priority(1)),
                ("opt:tts", FieldSchema::new(FieldKind::Number).with_priority(3)),
                (
                    "req:channel",
                    FieldSchema::new(FieldKind::RemoteSelect {
                        endpoint: "/guilds/${req:guild}/channels".into(),
                    })
                    .with_priority(0)
                    .depends_on(&["req:guild"]),
                ),
            ]),
            vec!["timer:time".to_string()],
        )
    }

    #[test]
    fn test_visible_fields_follow_dependencies() {
        let mut form = message_form();
        assert_eq!(form.visible(), vec!["req:guild", "req:content"]);

        assert_eq!(form.focused_field().as_deref(), Some("req:guild"));
        let requests = form.type_char('7');
        assert_eq!(form.visible(), vec!["req:guild", "req:channel", "req:content"]);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, "/guilds/7/channels");
    }

    #[test]
    fn test_clearing_input_removes_key() {
        let mut form = message_form();
        form.type_char('a');
        assert!(form.settings().is_filled("req:guild"));

        form.backspace();
        assert!(form.settings().get("req:guild").is_none());

        form.type_char('b');
        form.clear_focused();
        assert!(form.settings().is_empty());
    }

    #[test]
    fn test_submittable_once_required_filled() {
        let mut form = message_form();
        assert!(form.commit_request().is_none());

        form.type_char('1');
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused_field().as_deref(), Some("req:content"));
        form.type_char('h');
        form.type_char('i');

        let request = form.commit_request().unwrap();
        assert_eq!(request.area_type, AreaType::Reaction);
        assert_eq!(request.area_item, "send_message");
        let settings = request.area_settings.unwrap();
        assert_eq!(settings.get("req:content"), Some(&SettingValue::Text("hi".into())));
        assert!(form.is_submitting());
        assert!(form.commit_request().is_none());
    }

    #[test]
    fn test_reveal_and_remove_optional_field() {
        let mut form = message_form();
        assert_eq!(form.revealable(), vec!["req:channel", "opt:tts"]);
        assert!(form.open_menu(FormMenuKind::AddParameter));
        form.menu_move(1);
        form.menu_choose();
        assert!(form.visible().contains(&"opt:tts"));
        assert_eq!(form.focused_field().as_deref(), Some("opt:tts"));

        form.type_char('3');
        assert_eq!(form.settings().get("opt:tts"), Some(&SettingValue::Number(3)));

        assert!(form.remove_optional("opt:tts"));
        assert!(!form.visible().contains(&"opt:tts"));
        assert!(form.settings().get("opt:tts").is_none());
        assert!(!form.remove_optional("req:guild"));
    }

    #[test]
    fn test_unparseable_number_flags_field() {
        let mut form = message_form();
        form.reveal("opt:tts");
        form.type_char('x');
        assert!(form.is_invalid("opt:tts"));
        assert!(form.settings().get("opt:tts").is_none());

        form.backspace();
        assert!(!form.is_invalid("opt:tts"));
    }

    #[test]
    fn test_insert_component_into_text_field() {
        let mut form = message_form();
        form.focus_next();
        assert!(form.can_insert_component());
        assert!(form.open_menu(FormMenuKind::InsertComponent));
        form.menu_choose();
        assert_eq!(
            form.settings().get("req:content"),
            Some(&SettingValue::Text("{{timer:time}}".into()))
        );
    }

    #[test]
    fn test_rejected_marks_invalid_and_keeps_values() {
        let mut form = message_form();
        form.type_char('1');
        form.focus_next();
        form.focus_next();
        form.type_char('x');
        form.commit_request().unwrap();

        let failure = ApiFailure::InvalidFields(
            [("req:guild".to_string(), false), ("req:content".to_string(), true)]
                .into_iter()
                .collect(),
        );
        form.rejected(&failure);
        assert!(form.is_invalid("req:guild"));
        assert!(!form.is_invalid("req:content"));
        assert!(form.settings().is_filled("req:guild"));
        assert!(!form.is_submitting());
    }
}
