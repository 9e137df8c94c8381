//! Format-aware entry point for appending to and reading audit logs
//!
//! New logs are written in the configured default format. Once a log
//! exists its format is a property of the stored value: appends sniff the
//! existing text and keep writing in that format, whatever the default is.

use tracing::debug;

use super::codec::{detect_format, non_blank, LogCodec};
use super::json::JsonCodec;
use super::xml::XmlCodec;
use crate::config::Settings;
use crate::error::AuditResult;
use crate::models::value as canonical;
use crate::models::{AuditLogEntry, FieldChange, FieldValue, LogFormat, RelatedAction};

/// The codec for a format
pub fn codec(format: LogFormat) -> &'static dyn LogCodec {
    match format {
        LogFormat::Xml => &XmlCodec,
        LogFormat::Json => &JsonCodec,
    }
}

/// Appends entries to and parses serialized audit logs
#[derive(Debug, Clone)]
pub struct AuditTrail {
    default_format: LogFormat,
    anonymous_user: String,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AuditTrail {
    /// Create a trail writing new logs in `default_format`
    pub fn new(default_format: LogFormat) -> Self {
        Self {
            default_format,
            anonymous_user: Settings::default().anonymous_user,
        }
    }

    /// Create a trail from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_format: settings.default_format,
            anonymous_user: settings.anonymous_user.clone(),
        }
    }

    /// Format used for new logs
    pub fn default_format(&self) -> LogFormat {
        self.default_format
    }

    /// Format an append to `existing` will write
    pub fn format_for(&self, existing: Option<&str>) -> LogFormat {
        match non_blank(existing) {
            Some(text) => detect_format(text),
            None => self.default_format,
        }
    }

    fn writer_for(&self, existing: Option<&str>) -> &'static dyn LogCodec {
        let format = self.format_for(existing);
        debug!(%format, new_log = non_blank(existing).is_none(), "selected audit log format");
        codec(format)
    }

    /// Append a Created entry
    pub fn append_create(&self, existing: Option<&str>, user: &str) -> AuditResult<String> {
        self.writer_for(existing).append_create(existing, user)
    }

    /// Append an Updated entry
    pub fn append_update(
        &self,
        existing: Option<&str>,
        changes: &[FieldChange],
        user: &str,
    ) -> AuditResult<String> {
        self.writer_for(existing).append_update(existing, changes, user)
    }

    /// Append a Deleted entry
    pub fn append_delete(&self, existing: Option<&str>, user: &str) -> AuditResult<String> {
        self.writer_for(existing).append_delete(existing, user)
    }

    /// Append an Added/Removed entry for a related entity
    pub fn append_related(
        &self,
        existing: Option<&str>,
        action: RelatedAction,
        related: &str,
        fields: &[FieldChange],
        user: &str,
    ) -> AuditResult<String> {
        self.writer_for(existing)
            .append_related(existing, action, related, fields, user)
    }

    /// Parse a stored log of either format; never fails
    pub fn parse(&self, existing: Option<&str>) -> Vec<AuditLogEntry> {
        match non_blank(existing) {
            Some(text) => codec(detect_format(text)).parse(Some(text)),
            None => Vec::new(),
        }
    }

    /// Parse a stored log, reporting corruption as an error
    pub fn try_parse(&self, existing: Option<&str>) -> AuditResult<Vec<AuditLogEntry>> {
        match non_blank(existing) {
            Some(text) => codec(detect_format(text)).try_parse(Some(text)),
            None => Ok(Vec::new()),
        }
    }

    /// Returns true when the canonical forms of two values differ
    pub fn has_changed(&self, original: Option<&FieldValue>, current: Option<&FieldValue>) -> bool {
        canonical::has_changed(original, current)
    }

    /// Canonical text of a value
    pub fn to_canonical_string(&self, value: Option<&FieldValue>) -> Option<String> {
        canonical::to_canonical_string(value)
    }

    /// The identity recorded for an append
    ///
    /// Missing or blank identities are recorded as the anonymous user.
    pub fn resolve_user(&self, user: Option<&str>) -> String {
        match user.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.anonymous_user.clone(),
        }
    }
}
