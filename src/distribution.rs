// src/distribution.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A winner's payout record for a settled hand.
///
/// One record per winner; the amounts across a hand's distributions sum to
/// the winning bid price exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub id: Uuid,
    pub hand: Uuid,
    pub person: Uuid,
    pub amount: i64,
    pub narration: String,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Distribution {
    pub fn new(
        hand: Uuid,
        person: Uuid,
        amount: i64,
        narration: impl Into<String>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            hand,
            person,
            amount,
            narration: narration.into(),
            paid_at,
            created_at: Utc::now(),
        }
    }
}
