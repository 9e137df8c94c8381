//! Core data models for audit-trail
//!
//! The in-memory shape logs are parsed into and built from: actions,
//! entries with their field changes, the two serialized formats, and
//! typed field values with their canonical text.

pub mod action;
pub mod entry;
pub mod format;
pub mod value;

pub use action::{AuditAction, RelatedAction};
pub use entry::{AuditLogEntry, FieldChange};
pub use format::LogFormat;
pub use value::{has_changed, to_canonical_string, FieldValue};
