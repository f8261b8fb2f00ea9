use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One row of an uploaded contact list, after header alias resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactRecord {
    pub first_name: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl ContactRecord {
    pub fn new(
        first_name: impl Into<String>,
        phone: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            phone: phone.into(),
            notes: notes.into(),
        }
    }
}
