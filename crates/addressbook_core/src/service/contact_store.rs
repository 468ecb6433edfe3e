//! Contact store use-case service.
//!
//! # Responsibility
//! - Own the ordered contact collection and be its only writer.
//! - Persist a full snapshot after every mutating call (except sorting).
//! - Decode persisted and imported records through the codecs.
//!
//! # Invariants
//! - Order is insertion/sort order; duplicates are allowed.
//! - Every entry keeps the `ContactId` assigned when it entered the store.
//! - A failed `load` or import leaves the in-memory collection untouched.
//! - Out-of-range or stale positions never mutate the collection.
//! - The store never validates contact content; callers do.

use crate::codec::mock::{self, BUNDLED_MOCK_CONTACTS};
use crate::codec::record;
use crate::codec::CodecError;
use crate::model::contact::{Contact, ContactEntry, ContactId, SortKey};
use crate::repo::preference_repo::{PreferenceStore, RepoError};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Preference key holding the persisted contact list.
pub const CONTACT_KEY: &str = "contact_key";

pub type StoreResult<T> = Result<T, StoreError>;

/// Contact store error surfaced to callers.
#[derive(Debug)]
pub enum StoreError {
    /// A persisted or imported record could not be decoded. `position` is the
    /// record offset within its snapshot/document when known.
    Codec {
        position: Option<usize>,
        source: CodecError,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    NotFound(ContactId),
    /// The entry at `index` is no longer the one the caller observed.
    StaleIndex {
        index: usize,
        expected: ContactId,
    },
    /// Import source could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec {
                position: Some(position),
                source,
            } => write!(f, "record #{position}: {source}"),
            Self::Codec {
                position: None,
                source,
            } => write!(f, "{source}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "contact index {index} out of range for {len} contact(s)")
            }
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::StaleIndex { index, expected } => write!(
                f,
                "contact at index {index} is no longer {expected}; refresh and retry"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
            Self::IndexOutOfRange { .. } | Self::NotFound(_) | Self::StaleIndex { .. } => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Owner of the contact collection backed by a preference store.
pub struct ContactStore<P: PreferenceStore> {
    prefs: P,
    key: String,
    entries: Vec<ContactEntry>,
}

impl<P: PreferenceStore> ContactStore<P> {
    /// Creates an empty store over `prefs` using `CONTACT_KEY`.
    ///
    /// Nothing is read until `load` is called.
    pub fn new(prefs: P) -> Self {
        Self::with_key(prefs, CONTACT_KEY)
    }

    /// Creates an empty store persisting under a custom preference key.
    pub fn with_key(prefs: P, key: impl Into<String>) -> Self {
        Self {
            prefs,
            key: key.into(),
            entries: Vec::new(),
        }
    }

    /// Creates a store and loads the persisted snapshot.
    pub fn open(prefs: P) -> StoreResult<Self> {
        let mut store = Self::new(prefs);
        store.load()?;
        Ok(store)
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn entries(&self) -> &[ContactEntry] {
        &self.entries
    }

    /// Iterates contacts in collection order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.entries.iter().map(|entry| &entry.contact)
    }

    pub fn get(&self, index: usize) -> Option<&ContactEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position of the entry carrying `id`.
    pub fn position_of(&self, id: ContactId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn get_by_id(&self, id: ContactId) -> Option<&Contact> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.contact)
    }

    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    pub fn into_preferences(self) -> P {
        self.prefs
    }

    /// Replaces the in-memory collection with the persisted snapshot.
    ///
    /// # Errors
    /// - `Codec` when any stored record fails to decode; nothing is replaced.
    /// - `Repo` when the snapshot cannot be read.
    pub fn load(&mut self) -> StoreResult<&[ContactEntry]> {
        let started_at = Instant::now();
        let values = match self.prefs.get_values(&self.key) {
            Ok(values) => values,
            Err(err) => {
                error!(
                    "event=contacts_load module=store status=error error_code=read_failed error={err}"
                );
                return Err(err.into());
            }
        };

        let mut entries = Vec::with_capacity(values.len());
        let mut seen = HashSet::with_capacity(values.len());
        for (position, raw) in values.iter().enumerate() {
            let mut entry = match record::decode_entry(raw) {
                Ok(entry) => entry,
                Err(source) => {
                    error!(
                        "event=contacts_load module=store status=error error_code=malformed_record position={position} error={source}"
                    );
                    return Err(StoreError::Codec {
                        position: Some(position),
                        source,
                    });
                }
            };
            if !seen.insert(entry.id) {
                warn!("event=contacts_load module=store status=warn reason=duplicate_id position={position}");
                entry.id = Uuid::new_v4();
                seen.insert(entry.id);
            }
            entries.push(entry);
        }

        self.entries = entries;
        info!(
            "event=contacts_load module=store status=ok count={} duration_ms={}",
            self.entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(&self.entries)
    }

    /// Overwrites the persisted snapshot with the whole in-memory collection.
    pub fn save(&mut self) -> StoreResult<()> {
        let values = self
            .entries
            .iter()
            .map(record::encode_entry)
            .collect::<Vec<_>>();

        match self.prefs.replace_values(&self.key, &values) {
            Ok(()) => {
                debug!(
                    "event=contacts_save module=store status=ok count={}",
                    values.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=contacts_save module=store status=error count={} error={err}",
                    values.len()
                );
                Err(err.into())
            }
        }
    }

    /// Appends a contact and persists. Returns the id assigned to it.
    pub fn add(&mut self, contact: Contact) -> StoreResult<ContactId> {
        let entry = ContactEntry::new(contact);
        let id = entry.id;
        self.entries.push(entry);
        self.save()?;
        info!(
            "event=contact_add module=store status=ok position={}",
            self.entries.len() - 1
        );
        Ok(id)
    }

    /// Replaces the contact at `index` wholesale and persists.
    ///
    /// The entry keeps its id.
    pub fn update(&mut self, index: usize, contact: Contact) -> StoreResult<()> {
        self.check_index(index)?;
        self.entries[index].contact = contact;
        self.save()?;
        info!("event=contact_update module=store status=ok position={index}");
        Ok(())
    }

    /// Like `update`, but first re-validates that `index` still holds
    /// `expected`.
    pub fn update_checked(
        &mut self,
        index: usize,
        expected: ContactId,
        contact: Contact,
    ) -> StoreResult<()> {
        self.check_slot(index, expected)?;
        self.update(index, contact)
    }

    pub fn update_by_id(&mut self, id: ContactId, contact: Contact) -> StoreResult<()> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.update(index, contact)
    }

    /// Removes the contact at `index`, shifting later entries left, and
    /// persists. Returns the removed contact.
    pub fn remove(&mut self, index: usize) -> StoreResult<Contact> {
        self.check_index(index)?;
        let entry = self.entries.remove(index);
        self.save()?;
        info!(
            "event=contact_remove module=store status=ok position={index} remaining={}",
            self.entries.len()
        );
        Ok(entry.contact)
    }

    /// Like `remove`, but first re-validates that `index` still holds
    /// `expected`.
    pub fn remove_checked(&mut self, index: usize, expected: ContactId) -> StoreResult<Contact> {
        self.check_slot(index, expected)?;
        self.remove(index)
    }

    pub fn remove_by_id(&mut self, id: ContactId) -> StoreResult<Contact> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.remove(index)
    }

    /// Empties the collection and persists the empty snapshot.
    pub fn clear(&mut self) -> StoreResult<()> {
        let removed = self.entries.len();
        self.entries.clear();
        self.save()?;
        info!("event=contacts_clear module=store status=ok removed={removed}");
        Ok(())
    }

    /// Stable ascending sort on the selected field.
    ///
    /// Sort order is in-memory only; the next mutating call persists it.
    pub fn sort_by(&mut self, key: SortKey) {
        self.entries
            .sort_by(|a, b| a.contact.sort_value(key).cmp(b.contact.sort_value(key)));
        debug!(
            "event=contacts_sort module=store status=ok key={} count={}",
            key.as_str(),
            self.entries.len()
        );
    }

    /// Appends every mock-format record in order, then persists once.
    ///
    /// # Errors
    /// - `Codec` with the offending record position; nothing is appended.
    pub fn import_from(&mut self, records: &[Value]) -> StoreResult<usize> {
        let mut imported = Vec::with_capacity(records.len());
        for (position, raw) in records.iter().enumerate() {
            match mock::decode_record(raw) {
                Ok(contact) => imported.push(ContactEntry::new(contact)),
                Err(source) => {
                    warn!(
                        "event=contacts_import module=store status=error error_code=malformed_record position={position} error={source}"
                    );
                    return Err(StoreError::Codec {
                        position: Some(position),
                        source,
                    });
                }
            }
        }

        let count = imported.len();
        self.entries.extend(imported);
        self.save()?;
        info!(
            "event=contacts_import module=store status=ok imported={count} total={}",
            self.entries.len()
        );
        Ok(count)
    }

    /// Parses a whole mock document, then imports its records.
    pub fn import_json(&mut self, document: &str) -> StoreResult<usize> {
        let records = mock::parse_document(document).map_err(|source| {
            warn!(
                "event=contacts_import module=store status=error error_code=malformed_document error={source}"
            );
            StoreError::Codec {
                position: None,
                source,
            }
        })?;
        self.import_from(&records)
    }

    /// Reads a mock document from disk, then imports it.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| {
            warn!(
                "event=contacts_import module=store status=error error_code=read_failed error={source}"
            );
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.import_json(&document)
    }

    /// Imports the mock fixture bundled with the crate.
    pub fn generate_mock(&mut self) -> StoreResult<usize> {
        self.import_json(BUNDLED_MOCK_CONTACTS)
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn check_slot(&self, index: usize, expected: ContactId) -> StoreResult<()> {
        self.check_index(index)?;
        if self.entries[index].id != expected {
            warn!("event=contact_slot_check module=store status=stale position={index}");
            return Err(StoreError::StaleIndex { index, expected });
        }
        Ok(())
    }
}
