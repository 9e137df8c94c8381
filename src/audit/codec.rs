//! Log codec abstraction and format sniffing
//!
//! A codec knows how to load a serialized log into entries and render
//! entries back to text. Every append is built on those two operations:
//! parse the whole existing value, push one entry, render the whole log.

use tracing::warn;

use crate::error::AuditResult;
use crate::models::{AuditAction, AuditLogEntry, FieldChange, LogFormat, RelatedAction};

/// Serializer/parser for one log format
pub trait LogCodec: Send + Sync {
    /// The format this codec reads and writes
    fn format(&self) -> LogFormat;

    /// Parse a non-blank serialized log
    ///
    /// Returns [`crate::AuditError::Corrupt`] if the value is not a
    /// well-formed log in this format.
    fn load(&self, existing: &str) -> AuditResult<Vec<AuditLogEntry>>;

    /// Serialize entries as a complete, compact log value
    fn render(&self, entries: &[AuditLogEntry]) -> AuditResult<String>;

    /// Parse a stored value, surfacing corruption as an error
    ///
    /// Absent or blank input is an empty log.
    fn try_parse(&self, existing: Option<&str>) -> AuditResult<Vec<AuditLogEntry>> {
        match non_blank(existing) {
            Some(text) => self.load(text),
            None => Ok(Vec::new()),
        }
    }

    /// Parse a stored value; unreadable input yields an empty list
    fn parse(&self, existing: Option<&str>) -> Vec<AuditLogEntry> {
        self.try_parse(existing).unwrap_or_else(|e| {
            warn!(format = %self.format(), error = %e, "ignoring unreadable audit log");
            Vec::new()
        })
    }

    /// Append one entry to a stored value and return the new value
    ///
    /// An unreadable existing value is discarded and a new log is started.
    fn append(&self, existing: Option<&str>, entry: AuditLogEntry) -> AuditResult<String> {
        let mut entries = self.try_parse(existing).unwrap_or_else(|e| {
            warn!(
                format = %self.format(),
                error = %e,
                "existing audit log is unreadable, starting a new log"
            );
            Vec::new()
        });
        entries.push(entry);
        self.render(&entries)
    }

    /// Append a Created entry
    fn append_create(&self, existing: Option<&str>, user: &str) -> AuditResult<String> {
        self.append(existing, AuditLogEntry::new(AuditAction::Created, user))
    }

    /// Append an Updated entry carrying before/after values
    fn append_update(
        &self,
        existing: Option<&str>,
        changes: &[FieldChange],
        user: &str,
    ) -> AuditResult<String> {
        let entry = AuditLogEntry::new(AuditAction::Updated, user)
            .with_fields(changes.iter().map(FieldChange::to_update).collect());
        self.append(existing, entry)
    }

    /// Append a Deleted entry
    fn append_delete(&self, existing: Option<&str>, user: &str) -> AuditResult<String> {
        self.append(existing, AuditLogEntry::new(AuditAction::Deleted, user))
    }

    /// Append an Added/Removed entry for a related entity
    ///
    /// Each field is stored with a single value taken from `value`,
    /// then `after`, then `before`.
    fn append_related(
        &self,
        existing: Option<&str>,
        action: RelatedAction,
        related: &str,
        fields: &[FieldChange],
        user: &str,
    ) -> AuditResult<String> {
        let entry = AuditLogEntry::new(action.into(), user)
            .with_related(related)
            .with_fields(fields.iter().map(FieldChange::to_related).collect());
        self.append(existing, entry)
    }
}

/// Classify a stored value by its first non-whitespace character
///
/// `{` or `[` is JSON, anything else (including `<`) is XML.
pub fn detect_format(existing: &str) -> LogFormat {
    match existing.trim_start().chars().next() {
        Some('{') | Some('[') => LogFormat::Json,
        _ => LogFormat::Xml,
    }
}

/// `None` for absent or whitespace-only values
pub(crate) fn non_blank(existing: Option<&str>) -> Option<&str> {
    existing.filter(|s| !s.trim().is_empty())
}
