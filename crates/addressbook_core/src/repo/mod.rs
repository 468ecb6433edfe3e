//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key/value preference storage contract used by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes replace the whole value list of a key atomically.

pub mod preference_repo;
