//! Configuration module for audit-trail
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (default write format, anonymous identity)

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::Settings;
