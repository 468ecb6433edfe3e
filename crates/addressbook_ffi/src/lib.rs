//! Flutter-facing bindings for the address book core.

pub mod api;
