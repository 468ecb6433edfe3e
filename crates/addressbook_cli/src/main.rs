//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `addressbook_core` linkage without the Flutter runtime.
//! - Optionally print the persisted contacts of a database file, taken from
//!   the first argument or `ADDRESSBOOK_DB_PATH`.

use addressbook_core::db::open_db;
use addressbook_core::{ContactStore, SqlitePreferenceStore};
use std::process::ExitCode;

const DB_PATH_ENV: &str = "ADDRESSBOOK_DB_PATH";

fn main() -> ExitCode {
    println!("addressbook_core ping={}", addressbook_core::ping());
    println!("addressbook_core version={}", addressbook_core::core_version());

    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DB_PATH_ENV).ok())
        .filter(|path| !path.trim().is_empty());
    let Some(db_path) = db_path else {
        return ExitCode::SUCCESS;
    };

    match print_contacts(db_path.trim()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_contacts(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let prefs = SqlitePreferenceStore::try_new(open_db(db_path)?)?;
    let store = ContactStore::open(prefs)?;

    println!("contacts={}", store.len());
    for (position, entry) in store.entries().iter().enumerate() {
        println!(
            "{position}\t{}\t{}\t{}",
            entry.id,
            entry.contact.display_name(),
            entry.contact.email
        );
    }
    Ok(())
}
