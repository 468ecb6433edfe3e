//! Core domain logic for the address book app.
//! This crate is the single owner of contact data and its persistence.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{CodecError, CodecResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{
    is_valid_email, Contact, ContactEntry, ContactId, ContactValidationError, SortKey,
};
pub use repo::preference_repo::{PreferenceStore, RepoError, RepoResult, SqlitePreferenceStore};
pub use service::contact_store::{ContactStore, StoreError, StoreResult, CONTACT_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
