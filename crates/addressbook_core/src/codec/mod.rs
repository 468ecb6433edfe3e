//! Text codecs for contact records.
//!
//! # Responsibility
//! - `record`: durable persistence encoding (versioned JSON, one record per
//!   stored value).
//! - `mock`: structured mock-data import documents.
//!
//! # Invariants
//! - Decoding never yields a partially filled `Contact`; any missing or
//!   mistyped field is a `CodecError::MalformedRecord`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod mock;
pub mod record;

pub type CodecResult<T> = Result<T, CodecError>;

/// Decode failure for persisted or imported records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not a well-formed record of the expected shape.
    MalformedRecord(String),
    /// Record carries a version tag this binary cannot read.
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRecord(message) => write!(f, "malformed contact record: {message}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "contact record version {found} is not supported (expected {supported})"
            ),
        }
    }
}

impl Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedRecord(value.to_string())
    }
}
