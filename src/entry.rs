// src/entry.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a person's append-only ledger.
///
/// Invariants:
/// - debit and credit are non-negative
/// - `balance` is a point-in-time snapshot: previous balance + credit - debit
/// - entries are never mutated after insertion; corrections are new entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub person: Uuid,
    /// Pool this posting belongs to, if any. Manual postings and closing
    /// entries carry no pool.
    pub pool: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub narration: String,
    pub debit: i64,
    pub credit: i64,
    /// Running balance snapshotted at insertion time.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Net effect of this entry on the running balance.
    pub fn net(&self) -> i64 {
        self.credit - self.debit
    }
}

/// A ledger posting before its balance is known.
///
/// The engine plans drafts; the adapter resolves each draft against the last
/// balance it can see inside its own transaction, so postings made earlier in
/// the same plan chain correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    pub id: Uuid,
    pub person: Uuid,
    pub pool: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub narration: String,
    pub debit: i64,
    pub credit: i64,
}

impl EntryDraft {
    pub fn new(
        person: Uuid,
        pool: Option<Uuid>,
        date: DateTime<Utc>,
        narration: impl Into<String>,
        debit: i64,
        credit: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            person,
            pool,
            date,
            narration: narration.into(),
            debit,
            credit,
        }
    }

    /// Resolve the draft into an entry chained onto `previous_balance`.
    pub fn into_entry(self, previous_balance: i64) -> LedgerEntry {
        let balance = previous_balance + self.credit - self.debit;
        LedgerEntry {
            id: self.id,
            person: self.person,
            pool: self.pool,
            date: self.date,
            narration: self.narration,
            debit: self.debit,
            credit: self.credit,
            balance,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_chains_balance() {
        let person = Uuid::now_v7();
        let draft = EntryDraft::new(person, None, Utc::now(), "deposit", 0, 500_00);
        let entry = draft.into_entry(100_00);
        assert_eq!(entry.balance, 600_00);
        assert_eq!(entry.net(), 500_00);

        let draft = EntryDraft::new(person, None, Utc::now(), "installment", 200_00, 0);
        let entry = draft.into_entry(entry.balance);
        assert_eq!(entry.balance, 400_00);
        assert_eq!(entry.net(), -200_00);
    }
}
