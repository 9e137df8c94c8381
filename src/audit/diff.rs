//! Field-level change collection for audit entries
//!
//! Compares two JSON snapshots of an entity and produces the field
//! changes an Updated entry records. Values are compared by their
//! canonical text, so `10` and `"10"` are the same value.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::models::value::{has_changed, to_canonical_string};
use crate::models::{FieldChange, FieldValue};

/// Collect the top-level fields that differ between two snapshots
///
/// Fields present on only one side are reported with the other side
/// absent. Non-object snapshots are treated as having no fields. The
/// result is ordered by field name.
pub fn collect_changes(before: &Value, after: &Value) -> Vec<FieldChange> {
    let empty = Map::new();
    let before_obj = before.as_object().unwrap_or(&empty);
    let after_obj = after.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = before_obj.keys().chain(after_obj.keys()).collect();

    keys.into_iter()
        .filter_map(|key| {
            let old = before_obj.get(key).and_then(FieldValue::from_json);
            let new = after_obj.get(key).and_then(FieldValue::from_json);

            if has_changed(old.as_ref(), new.as_ref()) {
                Some(FieldChange::update(
                    key.clone(),
                    to_canonical_string(old.as_ref()),
                    to_canonical_string(new.as_ref()),
                ))
            } else {
                None
            }
        })
        .collect()
}

/// Collect a snapshot's non-null top-level fields as related-entry values
pub fn collect_values(snapshot: &Value) -> Vec<FieldChange> {
    let Some(obj) = snapshot.as_object() else {
        return Vec::new();
    };

    let keys: BTreeSet<&String> = obj.keys().collect();
    keys.into_iter()
        .filter_map(|key| {
            let value = obj.get(key).and_then(FieldValue::from_json)?;
            Some(FieldChange::related(key.clone(), Some(value.to_string())))
        })
        .collect()
}

/// Human-readable one-line summary of field changes
///
/// Returns `None` when there is nothing to summarize.
pub fn summarize_changes(changes: &[FieldChange]) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    let parts: Vec<String> = changes
        .iter()
        .map(|change| {
            format!(
                "{}: {} -> {}",
                change.name,
                change.before.as_deref().unwrap_or("(none)"),
                change.after.as_deref().unwrap_or("(none)")
            )
        })
        .collect();

    Some(parts.join(", "))
}
