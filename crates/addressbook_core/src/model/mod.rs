//! Domain model for the address book.
//!
//! # Responsibility
//! - Define the contact record shown by the list and edited by the dialog.
//! - Keep identity (`ContactId`) separate from record content.
//!
//! # Invariants
//! - Every stored contact is identified by a stable `ContactId`.
//! - Contact content equality ignores identity.

pub mod contact;
