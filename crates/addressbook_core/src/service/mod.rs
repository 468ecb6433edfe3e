//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory collections and orchestrate their persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod contact_store;
