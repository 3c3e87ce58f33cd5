// src/person.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of the person directory.
///
/// The current balance is always derived from the ledger; `opening_balance`
/// only seeds it while the person has no entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub phone: String,
    pub phone2: Option<String>,
    pub opening_balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        phone: impl Into<String>,
        phone2: Option<String>,
        opening_balance: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            short_name: short_name.into(),
            phone: phone.into(),
            phone2,
            opening_balance,
            created_at: Utc::now(),
        }
    }
}
