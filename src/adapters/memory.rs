// src/adapters/memory.rs
use crate::{
    Contribution, Distribution, Error, ExecutionPlan, Guard, Hand, LedgerEntry, Operation, Person,
    Pool, StoreAdapter,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// The whole store as one cloneable value. `execute_plan` stages a clone,
/// applies the plan to it, and commits by swap — an error at any point
/// leaves the original untouched, which is the all-or-nothing guarantee
/// the trait demands.
#[derive(Clone, Default)]
struct MemoryStore {
    persons: HashMap<Uuid, Person>,
    pools: HashMap<Uuid, Pool>,
    /// pool id -> sorted member ids
    members: HashMap<Uuid, Vec<Uuid>>,
    hands: HashMap<Uuid, Hand>,
    contributions: HashMap<Uuid, Contribution>,
    distributions: HashMap<Uuid, Distribution>,
    entries: HashMap<Uuid, LedgerEntry>,
}

impl MemoryStore {
    fn hand_ids_of_pool(&self, pool_id: Uuid) -> Vec<Uuid> {
        self.hands
            .values()
            .filter(|h| h.pool == pool_id)
            .map(|h| h.id)
            .collect()
    }

    fn distributions_of_hand(&self, hand_id: Uuid) -> Vec<Distribution> {
        let mut out: Vec<Distribution> = self
            .distributions
            .values()
            .filter(|d| d.hand == hand_id)
            .cloned()
            .collect();
        out.sort_by_key(|d| d.id);
        out
    }

    fn last_entry_of(&self, person_id: Uuid) -> Option<LedgerEntry> {
        self.entries
            .values()
            .filter(|e| e.person == person_id)
            .max_by_key(|e| (e.date, e.id))
            .cloned()
    }

    /// Last visible balance for a person, opening balance when the ledger
    /// is empty. Called at apply time, so postings earlier in the same plan
    /// are already visible here (read-your-writes).
    fn last_balance_of(&self, person_id: Uuid) -> Result<i64, Error> {
        if let Some(entry) = self.last_entry_of(person_id) {
            return Ok(entry.balance);
        }
        self.persons
            .get(&person_id)
            .map(|p| p.opening_balance)
            .ok_or_else(|| Error::Storage(format!("person {} missing for posting", person_id)))
    }

    fn check_guard(&self, guard: &Guard) -> Result<(), Error> {
        match guard {
            Guard::HandOpen { hand_id } => {
                if self.distributions.values().any(|d| d.hand == *hand_id) {
                    return Err(Error::AlreadySettled(*hand_id));
                }
                Ok(())
            }
            Guard::HasNotWon { pool_id, person_id } => {
                let hands = self.hand_ids_of_pool(*pool_id);
                let won = self
                    .distributions
                    .values()
                    .any(|d| d.person == *person_id && hands.contains(&d.hand));
                if won {
                    return Err(Error::IneligibleWinner(*person_id));
                }
                Ok(())
            }
        }
    }

    fn apply(&mut self, op: &Operation) -> Result<(), Error> {
        match op {
            Operation::CreatePerson { person } => {
                let taken = self
                    .persons
                    .values()
                    .any(|p| p.name == person.name || p.short_name == person.short_name);
                if taken {
                    return Err(Error::Storage(format!(
                        "person name '{}' already taken",
                        person.name
                    )));
                }
                self.persons.insert(person.id, person.clone());
            }
            Operation::CreatePool { pool, members } => {
                if self.pools.values().any(|p| p.number == pool.number) {
                    return Err(Error::Storage(format!(
                        "pool number {} already taken",
                        pool.number
                    )));
                }
                self.pools.insert(pool.id, pool.clone());
                self.members.insert(pool.id, members.clone());
            }
            Operation::CreateHand { hand } => {
                self.hands.insert(hand.id, hand.clone());
            }
            Operation::CreateDistribution { distribution } => {
                self.distributions.insert(distribution.id, distribution.clone());
            }
            Operation::RetargetDistribution {
                distribution_id,
                person,
                amount,
            } => {
                let distribution = self.distributions.get_mut(distribution_id).ok_or_else(|| {
                    Error::Storage(format!("distribution {} missing", distribution_id))
                })?;
                distribution.person = *person;
                distribution.amount = *amount;
            }
            Operation::CreateContribution { contribution } => {
                self.contributions.insert(contribution.id, contribution.clone());
            }
            Operation::MarkContributionPaid { contribution_id } => {
                let contribution = self.contributions.get_mut(contribution_id).ok_or_else(|| {
                    Error::Storage(format!("contribution {} missing", contribution_id))
                })?;
                contribution.paid = true;
            }
            Operation::DeleteContributions { hand_id } => {
                self.contributions.retain(|_, c| c.hand != *hand_id);
            }
            Operation::PostEntry { draft } => {
                let previous = self.last_balance_of(draft.person)?;
                let entry = draft.clone().into_entry(previous);
                self.entries.insert(entry.id, entry);
            }
            Operation::AdvancePool {
                pool_id,
                settled_hand,
            } => {
                let pool = self
                    .pools
                    .get_mut(pool_id)
                    .ok_or_else(|| Error::Storage(format!("pool {} missing", pool_id)))?;
                if pool.current_hand == *settled_hand {
                    pool.current_hand += 1;
                }
            }
            Operation::CloseLedger {
                person_id,
                closed_at,
            } => {
                let Some(last) = self.last_entry_of(*person_id) else {
                    return Ok(());
                };
                let final_balance = last.balance;
                self.entries.retain(|_, e| e.person != *person_id);
                let closing = crate::EntryDraft::new(
                    *person_id,
                    None,
                    *closed_at,
                    format!("Ledger closed on {}", closed_at.format("%d-%m-%Y %H:%M")),
                    0,
                    0,
                );
                // Zero debit/credit: the closing entry carries the balance
                // forward unchanged.
                let entry = closing.into_entry(final_balance);
                self.entries.insert(entry.id, entry);
            }
            Operation::DeletePool { pool_id } => {
                let hands = self.hand_ids_of_pool(*pool_id);
                self.contributions.retain(|_, c| !hands.contains(&c.hand));
                self.distributions.retain(|_, d| !hands.contains(&d.hand));
                self.hands.retain(|_, h| h.pool != *pool_id);
                self.members.remove(pool_id);
                self.pools.remove(pool_id);
            }
        }
        Ok(())
    }
}

pub struct MemoryAdapter {
    store: Mutex<MemoryStore>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(MemoryStore::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStore> {
        // A poisoned mutex means a panic mid-apply on a staged clone; the
        // committed store is still consistent.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreAdapter for MemoryAdapter {
    async fn execute_plan(&self, plan: &ExecutionPlan) -> Result<(), Error> {
        let mut store = self.lock();

        // Guards checked under the same lock the commit happens under, so a
        // racing settlement of the same hand serializes here.
        let mut staged = store.clone();
        for guard in plan.guards() {
            staged.check_guard(guard)?;
        }
        for op in plan.operations() {
            staged.apply(op)?;
        }

        *store = staged;
        Ok(())
    }

    async fn get_person(&self, person_id: Uuid) -> Result<Person, Error> {
        self.lock()
            .persons
            .get(&person_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("person {}", person_id)))
    }

    async fn get_pool(&self, pool_id: Uuid) -> Result<Pool, Error> {
        self.lock()
            .pools
            .get(&pool_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("pool {}", pool_id)))
    }

    async fn next_pool_number(&self) -> Result<u32, Error> {
        let store = self.lock();
        Ok(store.pools.values().map(|p| p.number).max().unwrap_or(0) + 1)
    }

    async fn get_members(&self, pool_id: Uuid) -> Result<Vec<Uuid>, Error> {
        self.lock()
            .members
            .get(&pool_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("pool {}", pool_id)))
    }

    async fn get_hand(&self, hand_id: Uuid) -> Result<Hand, Error> {
        self.lock()
            .hands
            .get(&hand_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("hand {}", hand_id)))
    }

    async fn get_hands(&self, pool_id: Uuid) -> Result<Vec<Hand>, Error> {
        let store = self.lock();
        let mut hands: Vec<Hand> = store
            .hands
            .values()
            .filter(|h| h.pool == pool_id)
            .cloned()
            .collect();
        hands.sort_by_key(|h| h.number);
        Ok(hands)
    }

    async fn get_contributions(&self, hand_id: Uuid) -> Result<Vec<Contribution>, Error> {
        let store = self.lock();
        let mut contributions: Vec<Contribution> = store
            .contributions
            .values()
            .filter(|c| c.hand == hand_id)
            .cloned()
            .collect();
        contributions.sort_by_key(|c| (c.date, c.id));
        Ok(contributions)
    }

    async fn get_distributions(&self, hand_id: Uuid) -> Result<Vec<Distribution>, Error> {
        Ok(self.lock().distributions_of_hand(hand_id))
    }

    async fn get_pool_distributions(&self, pool_id: Uuid) -> Result<Vec<Distribution>, Error> {
        let store = self.lock();
        let hands = store.hand_ids_of_pool(pool_id);
        let mut out: Vec<Distribution> = store
            .distributions
            .values()
            .filter(|d| hands.contains(&d.hand))
            .cloned()
            .collect();
        out.sort_by_key(|d| d.id);
        Ok(out)
    }

    async fn get_entry(&self, entry_id: Uuid) -> Result<LedgerEntry, Error> {
        self.lock()
            .entries
            .get(&entry_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("ledger entry {}", entry_id)))
    }

    async fn get_entries(&self, person_id: Uuid) -> Result<Vec<LedgerEntry>, Error> {
        let store = self.lock();
        let mut entries: Vec<LedgerEntry> = store
            .entries
            .values()
            .filter(|e| e.person == person_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.date, e.id));
        Ok(entries)
    }

    async fn last_entry(&self, person_id: Uuid) -> Result<Option<LedgerEntry>, Error> {
        Ok(self.lock().last_entry_of(person_id))
    }
}
