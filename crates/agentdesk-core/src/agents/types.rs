use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contacts::ContactRecord;

/// Opaque agent identifier (UUID v4 string)
pub type AgentId = String;

/// Loose address shape check: something@something.tld with no whitespace
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Validation errors for agent profile payloads
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Name, email, and mobile are required")]
    MissingFields,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// A registered agent eligible to receive tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub email: String,
    pub mobile_with_country: String,
    #[serde(default)]
    pub assigned_tasks: Vec<ContactRecord>,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Create a new agent with a fresh id and no tasks.
    ///
    /// The profile is expected to be normalized already.
    pub fn new(profile: AgentProfile) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: profile.name,
            email: profile.email,
            mobile_with_country: profile.mobile_with_country,
            assigned_tasks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields, keeping id and tasks
    pub fn apply_profile(&mut self, profile: AgentProfile) {
        self.name = profile.name;
        self.email = profile.email;
        self.mobile_with_country = profile.mobile_with_country;
    }

    pub fn task_count(&self) -> usize {
        self.assigned_tasks.len()
    }
}

/// Editable agent fields, used as the payload for both add and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_with_country: String,
}

impl AgentProfile {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        mobile_with_country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            mobile_with_country: mobile_with_country.into(),
        }
    }

    /// Trim every field, lowercase the email and check the result.
    pub fn normalized(self) -> Result<Self, ProfileError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_lowercase();
        let mobile_with_country = self.mobile_with_country.trim().to_string();

        if name.is_empty() || email.is_empty() || mobile_with_country.is_empty() {
            return Err(ProfileError::MissingFields);
        }
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ProfileError::InvalidEmail(email));
        }

        Ok(Self {
            name,
            email,
            mobile_with_country,
        })
    }
}
