//! Audit action kinds
//!
//! Every entry in a log records exactly one action. Related-entity actions
//! get their own narrower type so a related append cannot be tagged with
//! a lifecycle action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// The kind of event an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AuditAction {
    /// Entity was created
    #[default]
    Created,
    /// Entity fields were updated
    Updated,
    /// Entity was deleted
    Deleted,
    /// A related entity was attached
    Added,
    /// A related entity was detached
    Removed,
}

impl AuditAction {
    /// Parse an action name, ignoring ASCII case
    ///
    /// Returns `None` for names this version does not know.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "added" => Some(Self::Added),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }

    /// Parse an action name read back from a stored log
    ///
    /// Unknown names are coerced to [`AuditAction::Created`] so the entry
    /// survives; a warning is emitted for each coercion.
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(action = s, "unrecognized audit action, treating as Created");
            Self::default()
        })
    }

    /// Canonical name as written to stored logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
            Self::Added => "Added",
            Self::Removed => "Removed",
        }
    }

    /// Returns true for actions that describe a related entity
    pub fn is_related(&self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action of a related-entity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedAction {
    Added,
    Removed,
}

impl RelatedAction {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" | "add" => Some(Self::Added),
            "removed" | "remove" => Some(Self::Removed),
            _ => None,
        }
    }
}

impl FromStr for RelatedAction {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            AuditError::InvalidArgument(format!(
                "unknown related action '{}', expected added or removed",
                s
            ))
        })
    }
}

impl From<RelatedAction> for AuditAction {
    fn from(action: RelatedAction) -> Self {
        match action {
            RelatedAction::Added => AuditAction::Added,
            RelatedAction::Removed => AuditAction::Removed,
        }
    }
}

impl fmt::Display for RelatedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(AuditAction::from(*self).as_str())
    }
}
