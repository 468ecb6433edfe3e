//! Persistence codec for contact records.
//!
//! # Responsibility
//! - Encode one contact (optionally with its stable id) into a self-describing
//!   JSON text value.
//! - Decode stored values back, rejecting malformed or foreign-version input.
//!
//! # Invariants
//! - `decode(&encode(c)) == c` for every contact.
//! - Output is deterministic: field order is fixed by `PersistedRecord`.
//! - Every record carries `version`; records of another version are rejected.

use crate::codec::{CodecError, CodecResult};
use crate::model::contact::{Contact, ContactEntry, ContactId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version tag written into every persisted record.
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    first_name: String,
    last_name: String,
    email: String,
}

impl PersistedRecord {
    fn from_contact(id: Option<ContactId>, contact: &Contact) -> Self {
        Self {
            version: RECORD_VERSION,
            id: id.map(|value| value.to_string()),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
        }
    }

    fn into_contact(self) -> Contact {
        Contact {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

/// Encodes a contact without identity.
pub fn encode(contact: &Contact) -> String {
    to_json(&PersistedRecord::from_contact(None, contact))
}

/// Decodes a contact, ignoring any stored identity.
///
/// # Errors
/// - `MalformedRecord` for invalid JSON, missing or non-string fields.
/// - `UnsupportedVersion` when `version` differs from `RECORD_VERSION`.
pub fn decode(raw: &str) -> CodecResult<Contact> {
    Ok(parse_record(raw)?.into_contact())
}

/// Encodes a stored entry including its stable id.
pub fn encode_entry(entry: &ContactEntry) -> String {
    to_json(&PersistedRecord::from_contact(
        Some(entry.id),
        &entry.contact,
    ))
}

/// Decodes a stored entry.
///
/// A record written without `id` gets a fresh one, so records produced by
/// `encode` remain loadable.
pub fn decode_entry(raw: &str) -> CodecResult<ContactEntry> {
    let mut record = parse_record(raw)?;
    let id = match record.id.take() {
        Some(text) => Uuid::parse_str(&text).map_err(|_| {
            CodecError::MalformedRecord(format!("invalid contact id `{text}`"))
        })?,
        None => Uuid::new_v4(),
    };
    Ok(ContactEntry::with_id(id, record.into_contact()))
}

fn parse_record(raw: &str) -> CodecResult<PersistedRecord> {
    let record: PersistedRecord = serde_json::from_str(raw)?;
    if record.version != RECORD_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: record.version,
            supported: RECORD_VERSION,
        });
    }
    Ok(record)
}

fn to_json(record: &PersistedRecord) -> String {
    serde_json::to_string(record).expect("string-only record always serializes")
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_entry, encode, encode_entry, RECORD_VERSION};
    use crate::codec::CodecError;
    use crate::model::contact::{Contact, ContactEntry};

    #[test]
    fn encode_is_deterministic_and_tagged() {
        let contact = Contact::new("Amy", "Young", "a@x.io");
        let first = encode(&contact);
        assert_eq!(first, encode(&contact));
        assert_eq!(
            first,
            r#"{"version":1,"first_name":"Amy","last_name":"Young","email":"a@x.io"}"#
        );
    }

    #[test]
    fn decode_ignores_entry_id() {
        let entry = ContactEntry::new(Contact::new("Bob", "Zed", "b@x.io"));
        let decoded = decode(&encode_entry(&entry)).unwrap();
        assert_eq!(decoded, entry.contact);
    }

    #[test]
    fn decode_entry_assigns_id_when_missing() {
        let contact = Contact::new("Bob", "Zed", "b@x.io");
        let entry = decode_entry(&encode(&contact)).unwrap();
        assert_eq!(entry.contact, contact);
        assert!(!entry.id.is_nil());
    }

    #[test]
    fn decode_rejects_future_version() {
        let raw = r#"{"version":2,"first_name":"A","last_name":"B","email":"c"}"#;
        let err = decode(raw).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedVersion {
                found: 2,
                supported: RECORD_VERSION
            }
        );
    }

    #[test]
    fn decode_entry_rejects_bad_id() {
        let raw = r#"{"version":1,"id":"not-a-uuid","first_name":"A","last_name":"B","email":"c"}"#;
        assert!(matches!(
            decode_entry(raw),
            Err(CodecError::MalformedRecord(message)) if message.contains("not-a-uuid")
        ));
    }
}
