use shared_types::ContactRecord;
use std::collections::HashMap;

/// Ordered header candidates for each contact field. The first candidate
/// whose cell holds a non-empty value wins.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub first_name: &'static [&'static str],
    pub phone: &'static [&'static str],
    pub notes: &'static [&'static str],
}

pub const FIRST_NAME_ALIASES: &[&str] = &["FirstName", "firstname", "First Name", "Name", "name"];
pub const PHONE_ALIASES: &[&str] = &[
    "Phone",
    "phone",
    "PhoneNumber",
    "phonenumber",
    "Phone Number",
];
pub const NOTES_ALIASES: &[&str] = &["Notes", "notes", "Note", "note"];

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            first_name: FIRST_NAME_ALIASES,
            phone: PHONE_ALIASES,
            notes: NOTES_ALIASES,
        }
    }
}

impl FieldAliases {
    /// Builds a record from one row keyed by header name.
    pub fn resolve(&self, row: &HashMap<String, String>) -> ContactRecord {
        ContactRecord {
            first_name: pick(row, self.first_name),
            phone: pick(row, self.phone),
            notes: pick(row, self.notes),
        }
    }
}

fn pick(row: &HashMap<String, String>, candidates: &[&str]) -> String {
    candidates
        .iter()
        .filter_map(|key| row.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}
