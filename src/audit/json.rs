//! JSON log codec
//!
//! Stored as one compact object with lower camel case keys:
//!
//! ```text
//! {"auditLog":[{"action":"Updated","user":"bob","timestamp":"2025-01-02T03:04:05.0000000Z",
//!   "fields":[{"name":"Price","before":"10","after":"20"}]}]}
//! ```
//!
//! Null properties and empty field lists are left out so the stored value
//! stays small and queryable with database JSON operators.

use serde::{Deserialize, Serialize};

use super::codec::LogCodec;
use crate::error::{AuditError, AuditResult};
use crate::models::value::{format_timestamp, parse_timestamp};
use crate::models::{AuditAction, AuditLogEntry, FieldChange, LogFormat};

/// Codec for the JSON log format
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogDocument {
    #[serde(default)]
    audit_log: Vec<EntryRecord>,
}

/// Shapes accepted on read; a bare entry array is still JSON by sniffing
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLog {
    Document(LogDocument),
    Entries(Vec<EntryRecord>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    user: Option<String>,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    related: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl From<&AuditLogEntry> for EntryRecord {
    fn from(entry: &AuditLogEntry) -> Self {
        let fields = if entry.fields.is_empty() {
            None
        } else {
            Some(entry.fields.iter().map(FieldRecord::from).collect())
        };

        Self {
            action: Some(entry.action.as_str().to_string()),
            user: Some(entry.user.clone()),
            timestamp: format_timestamp(&entry.timestamp),
            related: entry.related.clone(),
            fields,
        }
    }
}

impl From<&FieldChange> for FieldRecord {
    fn from(field: &FieldChange) -> Self {
        Self {
            name: Some(field.name.clone()),
            before: field.before.clone(),
            after: field.after.clone(),
            value: field.value.clone(),
        }
    }
}

impl TryFrom<EntryRecord> for AuditLogEntry {
    type Error = AuditError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
            AuditError::corrupt_json(format!("invalid entry timestamp '{}'", record.timestamp))
        })?;

        let fields = record
            .fields
            .unwrap_or_default()
            .into_iter()
            .map(|f| FieldChange {
                name: f.name.unwrap_or_default(),
                before: f.before,
                after: f.after,
                value: f.value,
            })
            .collect();

        Ok(Self {
            action: AuditAction::parse_lenient(record.action.as_deref().unwrap_or_default()),
            user: record.user.unwrap_or_default(),
            timestamp,
            related: record.related,
            fields,
        })
    }
}

impl LogCodec for JsonCodec {
    fn format(&self) -> LogFormat {
        LogFormat::Json
    }

    fn load(&self, existing: &str) -> AuditResult<Vec<AuditLogEntry>> {
        let stored: StoredLog = serde_json::from_str(existing)
            .map_err(|e| AuditError::corrupt_json(e.to_string()))?;

        let records = match stored {
            StoredLog::Document(document) => document.audit_log,
            StoredLog::Entries(records) => records,
        };

        records.into_iter().map(AuditLogEntry::try_from).collect()
    }

    fn render(&self, entries: &[AuditLogEntry]) -> AuditResult<String> {
        let document = LogDocument {
            audit_log: entries.iter().map(EntryRecord::from).collect(),
        };
        Ok(serde_json::to_string(&document)?)
    }
}
