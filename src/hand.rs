// src/hand.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cycle of a pool, corresponding to one payout event.
///
/// A hand has no stored lifecycle flag: it is open while no distribution
/// exists for it and settled once one does. Settlement is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub id: Uuid,
    pub pool: Uuid,
    /// Sequence number, 1..=tenure.
    pub number: u32,
    /// Scheduled date: pool start + 30 days per preceding hand.
    pub date: DateTime<Utc>,
    /// Nominal equal share of the face value (pool amount / tenure).
    pub contribution_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl Hand {
    pub fn new(pool: Uuid, number: u32, date: DateTime<Utc>, contribution_amount: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            pool,
            number,
            date,
            contribution_amount,
            created_at: Utc::now(),
        }
    }
}
