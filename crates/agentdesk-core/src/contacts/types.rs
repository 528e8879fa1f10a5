use serde::{Deserialize, Serialize};

/// One row of an uploaded contact list.
///
/// Records carry no key of their own; their identity is their position in
/// the upload they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub first_name: String,
    pub phone: String,
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
