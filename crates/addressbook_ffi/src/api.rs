//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/add/edit/delete/sort/generate actions to Dart via FRB.
//! - Run add/edit input validation before anything reaches the store.
//! - Translate positional UI gestures into checked store calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All calls share one process-wide store session and run one at a time.
//! - Position-based calls carry the contact id observed by the UI; a stale
//!   position is rejected instead of acting on another contact.

use addressbook_core::db::open_db;
use addressbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Contact, ContactEntry, ContactId, ContactStore, SortKey, SqlitePreferenceStore,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

const DB_FILE_NAME: &str = "addressbook.sqlite3";
const DB_PATH_ENV: &str = "ADDRESSBOOK_DB_PATH";

type SessionStore = ContactStore<SqlitePreferenceStore>;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<SessionStore>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    /// Stable contact id in string form.
    pub contact_id: String,
    /// Current position; pass it back together with `contact_id`.
    pub position: u32,
    /// `"{first_name} {last_name}"`.
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    /// Rows in collection order (empty on failure).
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected contact id, when the action targets one contact.
    pub contact_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<ContactId>) -> Self {
        Self {
            ok: true,
            contact_id: contact_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Lists all contacts in current collection order.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    let listed = with_store(|store| {
        Ok(store
            .entries()
            .iter()
            .enumerate()
            .map(to_item)
            .collect::<Vec<_>>())
    });

    match listed {
        Ok(items) => ContactListResponse {
            ok: true,
            message: format!("{} contact(s).", items.len()),
            items,
        },
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("contacts_list failed: {err}"),
        },
    }
}

/// Validates dialog input and appends a new contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_add(first_name: String, last_name: String, email: String) -> ContactActionResponse {
    let contact = Contact::new(first_name.trim(), last_name.trim(), email.trim());
    if let Err(err) = contact.validate() {
        return ContactActionResponse::failure(format!("contact_add rejected: {err}"));
    }

    match with_store(|store| store.add(contact).map_err(|err| err.to_string())) {
        Ok(id) => ContactActionResponse::success("Contact added.", Some(id)),
        Err(err) => ContactActionResponse::failure(format!("contact_add failed: {err}")),
    }
}

/// Replaces the email of the contact shown at `position`.
///
/// Name fields stay as stored; the record is replaced wholesale.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_edit_email(
    position: u32,
    contact_id: String,
    email: String,
) -> ContactActionResponse {
    let id = match parse_contact_id(&contact_id) {
        Ok(id) => id,
        Err(err) => {
            return ContactActionResponse::failure(format!("contact_edit_email rejected: {err}"))
        }
    };
    let email = email.trim().to_string();

    let result = with_store(|store| {
        let current = store
            .get_by_id(id)
            .ok_or_else(|| format!("contact not found: {id}"))?;
        let edited = current.with_email(email);
        edited.validate().map_err(|err| err.to_string())?;
        store
            .update_checked(position as usize, id, edited)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(()) => ContactActionResponse::success("Contact updated.", Some(id)),
        Err(err) => ContactActionResponse::failure(format!("contact_edit_email failed: {err}")),
    }
}

/// Swipe-to-delete for the contact shown at `position`.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(position: u32, contact_id: String) -> ContactActionResponse {
    let id = match parse_contact_id(&contact_id) {
        Ok(id) => id,
        Err(err) => {
            return ContactActionResponse::failure(format!("contact_delete rejected: {err}"))
        }
    };

    match with_store(|store| {
        store
            .remove_checked(position as usize, id)
            .map_err(|err| err.to_string())
    }) {
        Ok(_) => ContactActionResponse::success("Contact deleted.", Some(id)),
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

/// Removes every contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_clear() -> ContactActionResponse {
    match with_store(|store| store.clear().map_err(|err| err.to_string())) {
        Ok(()) => ContactActionResponse::success("Contacts cleared.", None),
        Err(err) => ContactActionResponse::failure(format!("contacts_clear failed: {err}")),
    }
}

/// Sorts by `first_name` or `last_name`. Order is not persisted on its own.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_sort(key: String) -> ContactActionResponse {
    let Some(sort_key) = SortKey::parse(&key) else {
        return ContactActionResponse::failure(format!(
            "contacts_sort rejected: unsupported key `{}`; expected first_name|last_name",
            key.trim()
        ));
    };

    match with_store(|store| {
        store.sort_by(sort_key);
        Ok(())
    }) {
        Ok(()) => ContactActionResponse::success("Contacts sorted.", None),
        Err(err) => ContactActionResponse::failure(format!("contacts_sort failed: {err}")),
    }
}

/// Appends the bundled mock contacts.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_generate() -> ContactActionResponse {
    match with_store(|store| store.generate_mock().map_err(|err| err.to_string())) {
        Ok(count) => ContactActionResponse::success(format!("Imported {count} contact(s)."), None),
        Err(err) => ContactActionResponse::failure(format!("contacts_generate failed: {err}")),
    }
}

fn with_store<T>(f: impl FnOnce(&mut SessionStore) -> Result<T, String>) -> Result<T, String> {
    let mut session = SESSION.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_session module=ffi status=warn reason=poisoned_lock");
        poisoned.into_inner()
    });

    if session.is_none() {
        *session = Some(open_session()?);
    }
    match session.as_mut() {
        Some(store) => f(store),
        None => Err("contact session unavailable".to_string()),
    }
}

fn open_session() -> Result<SessionStore, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let prefs = SqlitePreferenceStore::try_new(conn)
        .map_err(|err| format!("preference store init failed: {err}"))?;
    ContactStore::open(prefs).map_err(|err| format!("contacts load failed: {err}"))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn parse_contact_id(raw: &str) -> Result<ContactId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid contact id `{}`", raw.trim()))
}

fn to_item((position, entry): (usize, &ContactEntry)) -> ContactItem {
    ContactItem {
        contact_id: entry.id.to_string(),
        position: position as u32,
        display_name: entry.contact.display_name(),
        first_name: entry.contact.first_name.clone(),
        last_name: entry.contact.last_name.clone(),
        email: entry.contact.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contact_add, contact_delete, contact_edit_email, contacts_generate, contacts_list,
        contacts_sort, core_version, init_logging, ping, ContactItem,
    };
    use addressbook_core::codec::mock::{parse_document, BUNDLED_MOCK_CONTACTS};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn add_edit_delete_roundtrip() {
        let email = unique_email("roundtrip");
        let added = contact_add("Amy".to_string(), "Young".to_string(), email.clone());
        assert!(added.ok, "{}", added.message);
        let id = added.contact_id.expect("add should return contact_id");

        let row = find_row(&id).expect("added contact should be listed");
        assert_eq!(row.display_name, "Amy Young");
        assert_eq!(row.email, email);

        let new_email = unique_email("roundtrip-edited");
        let edited = contact_edit_email(row.position, id.clone(), new_email.clone());
        assert!(edited.ok, "{}", edited.message);
        let row = find_row(&id).expect("edited contact should be listed");
        assert_eq!(row.email, new_email);
        assert_eq!(row.first_name, "Amy");

        let deleted = contact_delete(row.position, id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(find_row(&id).is_none());
    }

    #[test]
    fn add_rejects_invalid_input() {
        let response = contact_add(" ".to_string(), "Young".to_string(), "a@x.io".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("first_name"));

        let response = contact_add("Amy".to_string(), "Young".to_string(), "nope".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("email"));
    }

    #[test]
    fn edit_rejects_invalid_email() {
        let added = contact_add("Bob".to_string(), "Zed".to_string(), unique_email("edit"));
        let id = added.contact_id.expect("add should return contact_id");
        let row = find_row(&id).expect("added contact should be listed");

        let response = contact_edit_email(row.position, id.clone(), "not-an-email".to_string());
        assert!(!response.ok);
        assert_eq!(find_row(&id).unwrap().email, row.email);
    }

    #[test]
    fn delete_with_unknown_id_is_rejected() {
        let added = contact_add("Cid".to_string(), "Xu".to_string(), unique_email("stale"));
        let id = added.contact_id.expect("add should return contact_id");
        let row = find_row(&id).expect("added contact should be listed");

        let response = contact_delete(row.position, Uuid::new_v4().to_string());
        assert!(!response.ok);
        assert!(find_row(&id).is_some());

        let response = contact_delete(row.position, "garbage".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid contact id"));
    }

    #[test]
    fn sort_rejects_unknown_key() {
        let response = contacts_sort("email".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("first_name|last_name"));
    }

    #[test]
    fn generate_imports_bundled_fixture() {
        let expected = parse_document(BUNDLED_MOCK_CONTACTS).unwrap().len();
        let response = contacts_generate();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.message, format!("Imported {expected} contact(s)."));
    }

    fn find_row(contact_id: &str) -> Option<ContactItem> {
        let listed = contacts_list();
        assert!(listed.ok, "{}", listed.message);
        listed
            .items
            .into_iter()
            .find(|item| item.contact_id == contact_id)
    }

    fn unique_email(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}@example.com")
    }
}
