// src/lib.rs
//! # rosca
//!
//! A settlement engine for rotating savings pools — chit funds, committees,
//! ROSCAs. A fixed roster of members pays an installment every cycle
//! ("hand"), one member per hand takes the pooled payout at an auctioned
//! discount, and every movement lands on an append-only per-person ledger.
//!
//! ## What's inside
//!
//! ### The auction state machine
//! A hand is **open** until a distribution settles it, and settled at most
//! once. Settlement validates the bid against the minimum-interest floor,
//! enforces one payout per member per pool, and produces the winners'
//! credits, every member's contribution share, and the non-winners' debits
//! as one atomic plan.
//!
//! ```rust,ignore
//! let engine = system.engine();
//! let result = engine
//!     .distribute_hand(pool.id, hand.id, &[winner], 80_000_00, None)
//!     .await?;
//! ```
//!
//! ### Append-only ledger
//! Each entry snapshots the running balance at insertion time, chained from
//! the previous entry inside the writing transaction. History is never
//! rewritten; corrections are new entries, and `close_ledger` is the one
//! sanctioned collapse (pool deletion freezes each member's net position
//! into a single closing line).
//!
//! ### Exact fixed-point money
//! Amounts are `i64` minor units and equal splits use largest-remainder
//! allocation, so a settled hand's distributions and contributions each sum
//! to the bid price exactly.
//!
//! ### Storage adapters
//! The engine plans; an adapter applies. `MemoryAdapter` stages a clone and
//! commits by swap, `PostgresAdapter` wraps the plan in one database
//! transaction with row locks on the hand under settlement.

pub mod adapters;
pub mod contribution;
pub mod distribution;
pub mod engine;
pub mod entry;
pub mod error;
pub mod hand;
pub mod money;
pub mod person;
pub mod pool;
pub mod projection;

pub use contribution::Contribution;
pub use distribution::Distribution;
pub use engine::{
    DistributionResult, Engine, EntryFilter, ExecutionPlan, Guard, Operation, PoolSummary,
};
pub use entry::{EntryDraft, LedgerEntry};
pub use error::Error;
pub use hand::Hand;
pub use money::Rate;
pub use person::Person;
pub use pool::{Pool, PoolSpec};

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Storage seam between the engine and a persistent store.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Apply the complete plan atomically. Implementors MUST:
    /// 1. enter an exclusive transaction for the whole plan
    /// 2. re-verify every guard inside it — return the business error if
    ///    violated (engine-side checks are advisory; this is the real race
    ///    protection)
    /// 3. apply all operations in order, resolving each ledger draft against
    ///    the last balance visible in the transaction, including entries
    ///    written earlier in the same plan
    /// 4. commit on success, roll back on any error — partial plans must
    ///    never be observable
    async fn execute_plan(&self, plan: &ExecutionPlan) -> Result<(), Error>;

    // READ OPERATIONS
    async fn get_person(&self, person_id: Uuid) -> Result<Person, Error>;
    async fn get_pool(&self, pool_id: Uuid) -> Result<Pool, Error>;
    async fn next_pool_number(&self) -> Result<u32, Error>;
    /// Members of a pool, sorted ascending by person id. Share assignment
    /// relies on this order being stable.
    async fn get_members(&self, pool_id: Uuid) -> Result<Vec<Uuid>, Error>;
    async fn get_hand(&self, hand_id: Uuid) -> Result<Hand, Error>;
    /// Hands of a pool in sequence order.
    async fn get_hands(&self, pool_id: Uuid) -> Result<Vec<Hand>, Error>;
    async fn get_contributions(&self, hand_id: Uuid) -> Result<Vec<Contribution>, Error>;
    async fn get_distributions(&self, hand_id: Uuid) -> Result<Vec<Distribution>, Error>;
    /// Every distribution across all hands of a pool (winner eligibility).
    async fn get_pool_distributions(&self, pool_id: Uuid) -> Result<Vec<Distribution>, Error>;
    async fn get_entry(&self, entry_id: Uuid) -> Result<LedgerEntry, Error>;
    /// A person's entries in (date, id) order, oldest first.
    async fn get_entries(&self, person_id: Uuid) -> Result<Vec<LedgerEntry>, Error>;
    /// The latest entry by (date, id), if any.
    async fn last_entry(&self, person_id: Uuid) -> Result<Option<LedgerEntry>, Error>;
}

/// Initialize the settlement system with an adapter.
pub struct RoscaSystem {
    adapter: Arc<dyn StoreAdapter>,
}

impl RoscaSystem {
    pub fn new(adapter: Box<dyn StoreAdapter>) -> Self {
        Self {
            adapter: adapter.into(),
        }
    }

    /// Get adapter reference
    pub fn adapter(&self) -> &dyn StoreAdapter {
        self.adapter.as_ref()
    }

    /// Get adapter Arc (for creating engines)
    pub fn adapter_arc(&self) -> Arc<dyn StoreAdapter> {
        Arc::clone(&self.adapter)
    }

    pub fn engine(&self) -> Engine {
        Engine::new(self.adapter_arc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_conservation() {
        let shares = money::split_equal(1000_00, 3);
        assert_eq!(shares.iter().sum::<i64>(), 1000_00);
    }

    #[test]
    fn test_rate_from_percent() {
        let rate = Rate::from_percent(2.0);
        assert_eq!(rate.of(100_000_00), 2_000_00);
        assert_eq!(rate.as_percent(), 2.0);
    }
}
