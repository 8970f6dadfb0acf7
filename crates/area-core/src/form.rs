//! # Settings Form Rules
//!
//! Pure functions deciding which parameters of an area are shown, in which
//! order, and whether the form can be committed. The wizard and the renderer
//! both read from these so they never disagree.

use std::collections::{BTreeMap, BTreeSet};

use crate::field::FieldSchema;
use crate::settings::Settings;

/// Parameter store of an area, keyed by field name.
pub type Store = BTreeMap<String, FieldSchema>;

/// Field names in display order.
///
/// Fields are sorted by ascending priority, ties keeping name order. A field
/// listed in another field's `need_fields` always comes before that field,
/// whatever the priorities say. Dependencies on unknown fields are ignored;
/// fields caught in a dependency cycle keep their priority order.
pub fn ordered_fields(store: &Store) -> Vec<&str> {
    let mut by_priority: Vec<&str> = store.keys().map(String::as_str).collect();
    // sort_by_key is stable, so equal priorities keep name order
    by_priority.sort_by_key(|name| store[*name].priority);

    let mut placed: BTreeSet<&str> = BTreeSet::new();
    let mut ordered = Vec::with_capacity(by_priority.len());

    while ordered.len() < by_priority.len() {
        let ready = by_priority.iter().copied().find(|name| {
            !placed.contains(name)
                && store[*name]
                    .need_fields
                    .iter()
                    .filter(|dep| store.contains_key(dep.as_str()))
                    .all(|dep| placed.contains(dep.as_str()))
        });

        // Cycle: fall back to the first unplaced field by priority.
        let next = match ready {
            Some(name) => name,
            None => match by_priority.iter().copied().find(|name| !placed.contains(name)) {
                Some(name) => name,
                None => break,
            },
        };

        placed.insert(next);
        ordered.push(next);
    }

    ordered
}

/// Whether a field is shown.
///
/// A field is shown when it is required, when the user revealed it, or when
/// it declares dependencies and all of them have values.
pub fn is_visible(
    name: &str,
    schema: &FieldSchema,
    settings: &Settings,
    revealed: &BTreeSet<String>,
) -> bool {
    schema.required
        || revealed.contains(name)
        || (!schema.need_fields.is_empty()
            && schema.need_fields.iter().all(|dep| settings.is_filled(dep)))
}

/// Visible field names in display order.
pub fn visible_fields<'a>(
    store: &'a Store,
    settings: &Settings,
    revealed: &BTreeSet<String>,
) -> Vec<&'a str> {
    ordered_fields(store)
        .into_iter()
        .filter(|name| is_visible(name, &store[*name], settings, revealed))
        .collect()
}

/// Optional fields the user may still reveal through "Add parameter".
pub fn revealable_fields<'a>(
    store: &'a Store,
    settings: &Settings,
    revealed: &BTreeSet<String>,
) -> Vec<&'a str> {
    ordered_fields(store)
        .into_iter()
        .filter(|name| {
            let schema = &store[*name];
            !schema.required && !is_visible(name, schema, settings, revealed)
        })
        .collect()
}

/// Commit is allowed once every required field has a value.
pub fn is_submittable(store: &Store, settings: &Settings) -> bool {
    store
        .iter()
        .filter(|(_, schema)| schema.required)
        .all(|(name, _)| settings.is_filled(name))
}

/// Required fields still missing a value, in display order.
pub fn missing_required<'a>(store: &'a Store, settings: &Settings) -> Vec<&'a str> {
    ordered_fields(store)
        .into_iter()
        .filter(|name| store[*name].required && !settings.is_filled(name))
        .collect()
}
