//! Audit log entry data structures
//!
//! An entry is one historical event in an entity's log: the action, who
//! performed it, when, and the field-level changes it carried.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::action::AuditAction;

/// One field's change within an entry
///
/// Update entries use `before`/`after`. Added/Removed entries use `value`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Field identifier
    pub name: String,

    /// Value before the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// Value after the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Single value of a related-entity field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldChange {
    /// Create a field change for an update entry
    pub fn update(
        name: impl Into<String>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            before,
            after,
            value: None,
        }
    }

    /// Create a field for an Added/Removed entry
    pub fn related(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
            value,
        }
    }

    /// The value written for an Added/Removed entry
    ///
    /// First non-null of `value`, `after`, `before`, in that order.
    pub fn related_value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .or(self.after.as_deref())
            .or(self.before.as_deref())
    }

    /// Copy of this field reduced to the related-entry shape
    pub fn to_related(&self) -> Self {
        Self::related(self.name.clone(), self.related_value().map(str::to_string))
    }

    /// Copy of this field reduced to the update-entry shape
    pub fn to_update(&self) -> Self {
        Self::update(self.name.clone(), self.before.clone(), self.after.clone())
    }
}

/// One historical audit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// What happened
    pub action: AuditAction,

    /// Identity that performed the action
    pub user: String,

    /// When the entry was appended (UTC)
    pub timestamp: DateTime<Utc>,

    /// Related entity type name, for Added/Removed entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,

    /// Field changes in append order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldChange>,
}

impl AuditLogEntry {
    /// Create an entry stamped with the current time
    pub fn new(action: AuditAction, user: impl Into<String>) -> Self {
        Self {
            action,
            user: user.into(),
            timestamp: Utc::now(),
            related: None,
            fields: Vec::new(),
        }
    }

    /// Set the related entity name
    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related = Some(related.into());
        self
    }

    /// Set the field list
    pub fn with_fields(mut self, fields: Vec<FieldChange>) -> Self {
        self.fields = fields;
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldChange> {
        self.fields.iter().find(|f| f.name == name)
    }
}
