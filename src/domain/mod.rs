//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`. All functions
//! are synchronous and take data in, returning data out.

pub mod config;
pub mod error;

pub use config::{
    AppEntry, ARCHIVE_PREFIX, CONFIG_KEY, Manifest, archive_key, expand_placeholders,
    expand_with, validate_image_name,
};
pub use error::{ArchiveError, ConfigError, NotConfigured, PersistError, TransportError};
