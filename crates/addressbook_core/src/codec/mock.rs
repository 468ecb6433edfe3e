//! Mock-data import format.
//!
//! # Responsibility
//! - Parse mock documents (JSON array of `first_name`/`last_name`/`email`
//!   objects) into raw records.
//! - Decode one raw record into a `Contact`.
//! - Ship the bundled fixture used by the "generate" action.
//!
//! # Invariants
//! - All three fields must be present and be JSON strings.
//! - Extra fields on a record are ignored.

use crate::codec::{CodecError, CodecResult};
use crate::model::contact::Contact;
use serde_json::Value;

/// Mock document compiled into the binary.
pub const BUNDLED_MOCK_CONTACTS: &str = include_str!("../../assets/mock_contacts.json");

const FIELD_FIRST_NAME: &str = "first_name";
const FIELD_LAST_NAME: &str = "last_name";
const FIELD_EMAIL: &str = "email";

/// Parses a mock document into its ordered raw records.
///
/// # Errors
/// - `MalformedRecord` when the text is not JSON or the top level is not an
///   array.
pub fn parse_document(document: &str) -> CodecResult<Vec<Value>> {
    match serde_json::from_str::<Value>(document)? {
        Value::Array(records) => Ok(records),
        other => Err(CodecError::MalformedRecord(format!(
            "mock document must be an array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decodes one raw mock record.
pub fn decode_record(record: &Value) -> CodecResult<Contact> {
    let object = record.as_object().ok_or_else(|| {
        CodecError::MalformedRecord(format!(
            "mock record must be an object, got {}",
            json_kind(record)
        ))
    })?;

    let field = |name: &str| -> CodecResult<String> {
        match object.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(CodecError::MalformedRecord(format!(
                "field `{name}` must be a string, got {}",
                json_kind(other)
            ))),
            None => Err(CodecError::MalformedRecord(format!(
                "missing field `{name}`"
            ))),
        }
    };

    Ok(Contact {
        first_name: field(FIELD_FIRST_NAME)?,
        last_name: field(FIELD_LAST_NAME)?,
        email: field(FIELD_EMAIL)?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
