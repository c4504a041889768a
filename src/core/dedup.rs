use crate::domain::model::Contact;
use std::collections::HashSet;

/// Collapses contacts sharing a normalised email. The first occurrence wins
/// and the output keeps first-seen order.
pub fn deduplicate(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen = HashSet::with_capacity(contacts.len());

    contacts
        .into_iter()
        .filter(|contact| seen.insert(contact.normalised_email()))
        .collect()
}
