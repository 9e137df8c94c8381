//! Audit entry display formatting
//!
//! Formats parsed log entries for terminal output in table and detail views.

use crate::models::value::display_timestamp;
use crate::models::{AuditAction, AuditLogEntry, FieldChange};

/// Format one field change on a single line
///
/// Update fields render as `name: before -> after`, related fields as
/// `name = value`.
pub fn format_field_change(field: &FieldChange) -> String {
    if field.before.is_some() || field.after.is_some() {
        format!(
            "{}: {} -> {}",
            field.name,
            field.before.as_deref().unwrap_or("(none)"),
            field.after.as_deref().unwrap_or("(none)")
        )
    } else {
        format!(
            "{} = {}",
            field.name,
            field.value.as_deref().unwrap_or("(none)")
        )
    }
}

/// Format a field as recorded under `action`
///
/// Related-entity actions always show the recorded value; other actions
/// always show the before/after pair.
pub fn format_entry_field(action: AuditAction, field: &FieldChange) -> String {
    if action.is_related() {
        format!(
            "{} = {}",
            field.name,
            field.value.as_deref().unwrap_or("(none)")
        )
    } else if field.before.is_none() && field.after.is_none() && field.value.is_some() {
        format_field_change(field)
    } else {
        format!(
            "{}: {} -> {}",
            field.name,
            field.before.as_deref().unwrap_or("(none)"),
            field.after.as_deref().unwrap_or("(none)")
        )
    }
}

/// Format a list of entries as a table, oldest first
pub fn format_entry_list(entries: &[AuditLogEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries.".to_string();
    }

    let user_width = entries
        .iter()
        .map(|e| e.user.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let related_width = entries
        .iter()
        .map(|e| e.related.as_deref().map_or(0, |r| r.chars().count()))
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<20}  {:<8}  {:<user_width$}  {:<related_width$}  {}\n",
        "Timestamp",
        "Action",
        "User",
        "Related",
        "Changes",
        user_width = user_width,
        related_width = related_width,
    ));

    output.push_str(&format!(
        "{:-<20}  {:-<8}  {:-<user_width$}  {:-<related_width$}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        user_width = user_width,
        related_width = related_width,
    ));

    for entry in entries {
        let changes: Vec<String> = entry
            .fields
            .iter()
            .map(|field| format_entry_field(entry.action, field))
            .collect();

        output.push_str(&format!(
            "{:<20}  {:<8}  {:<user_width$}  {:<related_width$}  {}\n",
            display_timestamp(&entry.timestamp),
            entry.action,
            entry.user,
            entry.related.as_deref().unwrap_or(""),
            changes.join(", "),
            user_width = user_width,
            related_width = related_width,
        ));
    }

    output
}

/// Format a single entry's details
pub fn format_entry_details(entry: &AuditLogEntry) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} by {}\n", entry.action, entry.user));
    output.push_str(&format!(
        "  Timestamp: {}\n",
        display_timestamp(&entry.timestamp)
    ));
    if let Some(related) = &entry.related {
        output.push_str(&format!("  Related:   {}\n", related));
    }
    for field in &entry.fields {
        output.push_str(&format!("  - {}\n", format_entry_field(entry.action, field)));
    }

    output
}
