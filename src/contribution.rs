// src/contribution.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member's obligation or payment record for one hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub hand: Uuid,
    pub person: Uuid,
    pub amount: i64,
    pub date: DateTime<Utc>,
    /// True once the member has paid this share in. Winners' settlement
    /// shares are created paid: the payout nets against their own share.
    pub paid: bool,
}

impl Contribution {
    pub fn new(hand: Uuid, person: Uuid, amount: i64, date: DateTime<Utc>, paid: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            hand,
            person,
            amount,
            date,
            paid,
        }
    }
}
