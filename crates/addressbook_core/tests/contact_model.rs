use addressbook_core::{Contact, ContactEntry, ContactValidationError};
use std::collections::HashSet;

#[test]
fn contact_serialization_uses_snake_case_wire_fields() {
    let contact = Contact::new("Amy", "Young", "amy@example.com");

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["first_name"], "Amy");
    assert_eq!(json["last_name"], "Young");
    assert_eq!(json["email"], "amy@example.com");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn validate_accepts_complete_input() {
    Contact::new("Amy", "Young", "amy@example.com")
        .validate()
        .unwrap();
}

#[test]
fn validate_reports_first_failing_field() {
    assert_eq!(
        Contact::new("", "", "bad").validate().unwrap_err(),
        ContactValidationError::EmptyFirstName
    );
    assert_eq!(
        Contact::new("Amy", "", "amy@example.com")
            .validate()
            .unwrap_err(),
        ContactValidationError::EmptyLastName
    );
    assert_eq!(
        Contact::new("Amy", "Young", "amy.example.com")
            .validate()
            .unwrap_err(),
        ContactValidationError::InvalidEmail("amy.example.com".to_string())
    );
}

#[test]
fn entries_for_identical_contacts_get_distinct_ids() {
    let contact = Contact::new("Amy", "Young", "amy@example.com");
    let ids: HashSet<_> = (0..16)
        .map(|_| ContactEntry::new(contact.clone()).id)
        .collect();
    assert_eq!(ids.len(), 16);
}
