// src/pool.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hand::Hand;
use crate::money::Rate;

/// A rotating savings pool: fixed roster, fixed face value, one payout per
/// hand until every member has taken one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: Uuid,
    /// Sequential number across the store, assigned at creation.
    pub number: u32,
    pub name: String,
    pub start_date: DateTime<Utc>,
    /// Face value of the pool in minor units.
    pub amount: i64,
    /// Number of hands; equals the member count under the strict roster rule.
    pub tenure: u32,
    /// Floor on the per-hand discount, scaled by hands remaining.
    pub min_interest: Rate,
    /// 1-indexed pointer to the next hand expected to settle. Advances past
    /// `tenure` when the last hand settles; readers clamp.
    pub current_hand: u32,
    pub narration: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Creation parameters for a pool. The roster is fixed once created.
#[derive(Debug, Clone)]
pub struct PoolSpec {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub amount: i64,
    pub tenure: u32,
    pub min_interest: Rate,
    pub member_ids: Vec<Uuid>,
    pub narration: Option<String>,
}

impl Pool {
    pub fn new(number: u32, spec: &PoolSpec) -> Self {
        Self {
            id: Uuid::now_v7(),
            number,
            name: spec.name.clone(),
            start_date: spec.start_date,
            amount: spec.amount,
            tenure: spec.tenure,
            min_interest: spec.min_interest,
            current_hand: 1,
            narration: spec.narration.clone(),
            created_at: Utc::now(),
        }
    }

    /// Generate the full hand schedule: one hand per month of tenure, dated
    /// 30 days apart, each carrying the nominal equal share of the face value.
    pub fn generate_hands(&self) -> Vec<Hand> {
        let nominal_share = self.amount / self.tenure as i64;
        (1..=self.tenure)
            .map(|number| {
                let date = self.start_date + Duration::days(30 * (number as i64 - 1));
                Hand::new(self.id, number, date, nominal_share)
            })
            .collect()
    }

    /// The current hand pointer, clamped to `tenure` once the final hand has
    /// settled and the pointer has overrun.
    pub fn clamped_current_hand(&self) -> u32 {
        self.current_hand.min(self.tenure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(amount: i64, tenure: u32) -> PoolSpec {
        PoolSpec {
            name: "Monthly committee".to_string(),
            start_date: Utc::now(),
            amount,
            tenure,
            min_interest: Rate::ZERO,
            member_ids: (0..tenure).map(|_| Uuid::now_v7()).collect(),
            narration: None,
        }
    }

    #[test]
    fn test_hand_schedule() {
        let pool = Pool::new(1, &spec(120_000_00, 12));
        let hands = pool.generate_hands();

        assert_eq!(hands.len(), 12);
        assert_eq!(hands[0].number, 1);
        assert_eq!(hands[0].date, pool.start_date);
        assert_eq!(hands[11].date, pool.start_date + Duration::days(330));
        assert!(hands.iter().all(|h| h.contribution_amount == 10_000_00));
        assert!(hands.iter().all(|h| h.pool == pool.id));
    }

    #[test]
    fn test_clamped_current_hand() {
        let mut pool = Pool::new(1, &spec(30_000_00, 3));
        assert_eq!(pool.clamped_current_hand(), 1);
        pool.current_hand = 4;
        assert_eq!(pool.clamped_current_hand(), 3);
    }
}
