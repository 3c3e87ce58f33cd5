// src/engine.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use tracing::{debug, info};
use uuid::Uuid;

use crate::contribution::Contribution;
use crate::distribution::Distribution;
use crate::entry::{EntryDraft, LedgerEntry};
use crate::error::Error;
use crate::hand::Hand;
use crate::money::split_equal;
use crate::person::Person;
use crate::pool::{Pool, PoolSpec};
use crate::projection;
use crate::StoreAdapter;

/// One mutation inside an execution plan. Adapters apply operations in
/// order; ledger postings resolve their balance against writes made earlier
/// in the same plan.
#[derive(Debug, Clone)]
pub enum Operation {
    CreatePerson {
        person: Person,
    },
    CreatePool {
        pool: Pool,
        members: Vec<Uuid>,
    },
    CreateHand {
        hand: Hand,
    },
    CreateDistribution {
        distribution: Distribution,
    },
    /// Re-point an existing distribution at a new person/amount. Posted
    /// ledger entries are left alone (see `Engine::edit_payout`).
    RetargetDistribution {
        distribution_id: Uuid,
        person: Uuid,
        amount: i64,
    },
    CreateContribution {
        contribution: Contribution,
    },
    MarkContributionPaid {
        contribution_id: Uuid,
    },
    DeleteContributions {
        hand_id: Uuid,
    },
    PostEntry {
        draft: EntryDraft,
    },
    /// Advance the pool's current-hand pointer iff it still sits on
    /// `settled_hand`. The condition is evaluated inside the transaction.
    AdvancePool {
        pool_id: Uuid,
        settled_hand: u32,
    },
    /// Collapse a person's ledger into a single closing entry carrying the
    /// final balance. A no-op when the person has no entries.
    CloseLedger {
        person_id: Uuid,
        closed_at: DateTime<Utc>,
    },
    /// Cascade-delete a pool with its hands, contributions and distributions.
    DeletePool {
        pool_id: Uuid,
    },
}

/// A precondition the adapter must re-verify inside its exclusive section.
/// Engine-side validation is advisory; the guard is the real race protection.
#[derive(Debug, Clone)]
pub enum Guard {
    /// The hand must still have no distribution (fails `AlreadySettled`).
    HandOpen { hand_id: Uuid },
    /// The person must not have won any hand of the pool (fails
    /// `IneligibleWinner`).
    HasNotWon { pool_id: Uuid, person_id: Uuid },
}

/// A validated, ordered batch of mutations applied atomically by an adapter.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    guards: Vec<Guard>,
    operations: Vec<Operation>,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&mut self, guard: Guard) {
        self.guards.push(guard);
    }

    pub fn add(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// Outcome of a successful hand settlement.
#[derive(Debug, Clone)]
pub struct DistributionResult {
    pub hand_id: Uuid,
    pub bid_price: i64,
    pub distributions: Vec<Distribution>,
    pub contributions: Vec<Contribution>,
}

/// Dashboard aggregate for one pool.
#[derive(Debug, Clone)]
pub struct PoolSummary {
    pub number: u32,
    pub member_count: usize,
    pub total_due: i64,
    pub completed_hands: u32,
    pub current_hand: u32,
}

/// Optional filters for ledger history reads.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub pool: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// The settlement engine. Validates against adapter reads, plans mutations,
/// and hands complete plans to the adapter for atomic application.
#[derive(Clone)]
pub struct Engine {
    adapter: Arc<dyn StoreAdapter>,
}

impl Engine {
    pub fn new(adapter: Arc<dyn StoreAdapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &dyn StoreAdapter {
        self.adapter.as_ref()
    }

    async fn execute(&self, plan: &ExecutionPlan) -> Result<(), Error> {
        let result = self.adapter.execute_plan(plan).await;

        counter!("rosca.plans.total",
            "status" => if result.is_ok() { "success" } else { "failed" }
        )
        .increment(1);

        result
    }

    /// Add a person to the directory. A nonzero opening amount is posted as
    /// the first ledger entry so the opening position lives on the ledger,
    /// and the person record itself carries a zero opening balance.
    pub async fn register_person(
        &self,
        name: &str,
        short_name: &str,
        phone: &str,
        phone2: Option<&str>,
        opening_balance: i64,
    ) -> Result<Person, Error> {
        if name.trim().is_empty() || short_name.trim().is_empty() {
            return Err(Error::Validation(
                "name and short name are required".to_string(),
            ));
        }
        for value in [Some(phone), phone2].into_iter().flatten() {
            if !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::Validation(
                    "phone numbers must contain only digits".to_string(),
                ));
            }
        }

        let person = Person::new(name, short_name, phone, phone2.map(String::from), 0);

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::CreatePerson {
            person: person.clone(),
        });
        if opening_balance != 0 {
            let (debit, credit) = if opening_balance > 0 {
                (0, opening_balance)
            } else {
                (-opening_balance, 0)
            };
            plan.add(Operation::PostEntry {
                draft: EntryDraft::new(
                    person.id,
                    None,
                    person.created_at,
                    "Opening balance",
                    debit,
                    credit,
                ),
            });
        }

        self.execute(&plan).await?;
        debug!(person = %person.id, "registered person");
        Ok(person)
    }

    /// Create a pool with its full hand schedule in one transaction.
    ///
    /// The strict roster rule applies: the member count must equal the
    /// tenure, so every hand has exactly one first-time winner available.
    pub async fn create_pool(&self, spec: PoolSpec) -> Result<Pool, Error> {
        if spec.member_ids.is_empty() {
            return Err(Error::Validation(
                "a pool needs at least one member".to_string(),
            ));
        }
        let unique: HashSet<Uuid> = spec.member_ids.iter().copied().collect();
        if unique.len() != spec.member_ids.len() {
            return Err(Error::Validation(
                "duplicate members in the roster".to_string(),
            ));
        }
        if spec.tenure == 0 {
            return Err(Error::Validation("tenure must be at least 1".to_string()));
        }
        if spec.member_ids.len() != spec.tenure as usize {
            return Err(Error::Validation(format!(
                "member count {} must equal tenure {}",
                spec.member_ids.len(),
                spec.tenure
            )));
        }
        if spec.amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        for member in &spec.member_ids {
            self.adapter.get_person(*member).await?;
        }

        let number = self.adapter.next_pool_number().await?;
        let pool = Pool::new(number, &spec);
        let mut members = spec.member_ids.clone();
        members.sort();

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::CreatePool {
            pool: pool.clone(),
            members,
        });
        for hand in pool.generate_hands() {
            plan.add(Operation::CreateHand { hand });
        }

        self.execute(&plan).await?;
        info!(pool = %pool.id, number = pool.number, tenure = pool.tenure, "created pool");
        Ok(pool)
    }

    /// Settle a hand: record the winning bid, pay out the winner(s), and
    /// raise every member's contribution share — atomically.
    ///
    /// Validation order: input shape, existence, open-hand, eligibility,
    /// bid floor. All checks re-run as guards inside the adapter's
    /// transaction; two racing settlements serialize and the loser fails.
    pub async fn distribute_hand(
        &self,
        pool_id: Uuid,
        hand_id: Uuid,
        winner_ids: &[Uuid],
        bid_price: i64,
        narration: Option<&str>,
    ) -> Result<DistributionResult, Error> {
        if winner_ids.is_empty() {
            return Err(Error::Validation(
                "at least one winner is required".to_string(),
            ));
        }
        let unique_winners: HashSet<Uuid> = winner_ids.iter().copied().collect();
        if unique_winners.len() != winner_ids.len() {
            return Err(Error::Validation("duplicate winners".to_string()));
        }
        if bid_price <= 0 {
            return Err(Error::InvalidAmount);
        }

        let pool = self.adapter.get_pool(pool_id).await?;
        let hand = self.adapter.get_hand(hand_id).await?;
        if hand.pool != pool.id {
            return Err(Error::NotFound(format!(
                "hand {} in pool {}",
                hand_id, pool_id
            )));
        }

        if !self.adapter.get_distributions(hand.id).await?.is_empty() {
            return Err(Error::AlreadySettled(hand.id));
        }

        let members = self.adapter.get_members(pool.id).await?;
        for winner in winner_ids {
            if !members.contains(winner) {
                return Err(Error::Validation(format!(
                    "winner {} is not a member of this pool",
                    winner
                )));
            }
        }

        let prior_winners: HashSet<Uuid> = self
            .adapter
            .get_pool_distributions(pool.id)
            .await?
            .iter()
            .map(|d| d.person)
            .collect();
        for winner in winner_ids {
            if prior_winners.contains(winner) {
                return Err(Error::IneligibleWinner(*winner));
            }
        }

        let floor = projection::projected_payout(&pool, &hand);
        if projection::earned_interest(&pool, bid_price) < projection::required_interest(&pool, &hand)
        {
            return Err(Error::BidTooHigh {
                bid: bid_price,
                floor,
            });
        }

        let now = Utc::now();
        let note = narration
            .map(String::from)
            .unwrap_or_else(|| format!("Payout for hand {}", hand.number));

        let mut plan = ExecutionPlan::new();
        plan.guard(Guard::HandOpen { hand_id: hand.id });
        for winner in winner_ids {
            plan.guard(Guard::HasNotWon {
                pool_id: pool.id,
                person_id: *winner,
            });
        }

        // Payout side: one distribution and one ledger credit per winner.
        let winner_shares = split_equal(bid_price, winner_ids.len());
        let mut distributions = Vec::with_capacity(winner_ids.len());
        for (winner, share) in winner_ids.iter().zip(winner_shares) {
            let distribution = Distribution::new(hand.id, *winner, share, note.clone(), now);
            plan.add(Operation::CreateDistribution {
                distribution: distribution.clone(),
            });
            plan.add(Operation::PostEntry {
                draft: EntryDraft::new(
                    *winner,
                    Some(pool.id),
                    now,
                    format!(
                        "Payout received for pool {}, hand {}. ({})",
                        pool.number, hand.number, note
                    ),
                    0,
                    share,
                ),
            });
            distributions.push(distribution);
        }

        // Contribution side: one share per member. Winners' shares are
        // created paid and get no debit — the payout nets against them.
        let member_shares = split_equal(bid_price, members.len());
        let mut contributions = Vec::with_capacity(members.len());
        for (member, share) in members.iter().zip(member_shares) {
            let is_winner = unique_winners.contains(member);
            let contribution = Contribution::new(hand.id, *member, share, now, is_winner);
            plan.add(Operation::CreateContribution {
                contribution: contribution.clone(),
            });
            if !is_winner {
                plan.add(Operation::PostEntry {
                    draft: EntryDraft::new(
                        *member,
                        Some(pool.id),
                        now,
                        format!("Contribution for pool {}, hand {}", pool.number, hand.number),
                        share,
                        0,
                    ),
                });
            }
            contributions.push(contribution);
        }

        plan.add(Operation::AdvancePool {
            pool_id: pool.id,
            settled_hand: hand.number,
        });

        let result = self.execute(&plan).await;

        counter!("rosca.settlements.total",
            "status" => if result.is_ok() { "success" } else { "failed" }
        )
        .increment(1);

        result?;
        histogram!("rosca.settlement.bid_amount").record(bid_price as f64);
        info!(
            pool = %pool.id,
            hand = hand.number,
            bid = bid_price,
            winners = winner_ids.len(),
            "settled hand"
        );

        Ok(DistributionResult {
            hand_id: hand.id,
            bid_price,
            distributions,
            contributions,
        })
    }

    /// Re-target a settled hand's single payout before later hands depend
    /// on it. Re-validates the bid floor and regenerates every contribution
    /// at the new per-person split.
    ///
    /// Ledger entries already posted for the old distribution are NOT
    /// reversed or restated here; use `post_entry` to compensate manually.
    pub async fn edit_payout(
        &self,
        hand_id: Uuid,
        new_person: Uuid,
        new_amount: i64,
    ) -> Result<Distribution, Error> {
        if new_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let hand = self.adapter.get_hand(hand_id).await?;
        let pool = self.adapter.get_pool(hand.pool).await?;
        let distributions = self.adapter.get_distributions(hand.id).await?;

        let payout = match distributions.as_slice() {
            [] => {
                return Err(Error::NotFound(format!("distribution for hand {}", hand_id)));
            }
            [single] => single.clone(),
            _ => {
                return Err(Error::Validation(
                    "cannot edit a multi-winner payout".to_string(),
                ));
            }
        };

        self.adapter.get_person(new_person).await?;
        let members = self.adapter.get_members(pool.id).await?;
        if !members.contains(&new_person) {
            return Err(Error::Validation(format!(
                "person {} is not a member of this pool",
                new_person
            )));
        }

        // The new winner must not hold a payout from any other hand.
        let has_won_elsewhere = self
            .adapter
            .get_pool_distributions(pool.id)
            .await?
            .iter()
            .any(|d| d.person == new_person && d.id != payout.id);
        if has_won_elsewhere {
            return Err(Error::IneligibleWinner(new_person));
        }

        let floor = projection::projected_payout(&pool, &hand);
        if projection::earned_interest(&pool, new_amount)
            < projection::required_interest(&pool, &hand)
        {
            return Err(Error::BidTooHigh {
                bid: new_amount,
                floor,
            });
        }

        let now = Utc::now();
        let mut plan = ExecutionPlan::new();
        plan.add(Operation::RetargetDistribution {
            distribution_id: payout.id,
            person: new_person,
            amount: new_amount,
        });
        plan.add(Operation::DeleteContributions { hand_id: hand.id });
        let shares = split_equal(new_amount, members.len());
        for (member, share) in members.iter().zip(shares) {
            plan.add(Operation::CreateContribution {
                contribution: Contribution::new(hand.id, *member, share, now, *member == new_person),
            });
        }

        self.execute(&plan).await?;
        info!(hand = %hand.id, person = %new_person, amount = new_amount, "re-targeted payout");

        Ok(Distribution {
            person: new_person,
            amount: new_amount,
            ..payout
        })
    }

    /// Record a member paying their share in. Matches the earliest unpaid
    /// contribution for the (hand, person) pair rather than duplicating it;
    /// creates a fresh paid contribution when none is pending. Always posts
    /// a ledger credit for the amount.
    pub async fn record_contribution_payment(
        &self,
        hand_id: Uuid,
        person_id: Uuid,
        amount: i64,
        date: DateTime<Utc>,
        narration: Option<&str>,
    ) -> Result<LedgerEntry, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let hand = self.adapter.get_hand(hand_id).await?;
        let pool = self.adapter.get_pool(hand.pool).await?;
        self.adapter.get_person(person_id).await?;
        let members = self.adapter.get_members(pool.id).await?;
        if !members.contains(&person_id) {
            return Err(Error::Validation(format!(
                "person {} is not a member of this pool",
                person_id
            )));
        }

        let contributions = self.adapter.get_contributions(hand.id).await?;
        let pending = contributions
            .iter()
            .filter(|c| c.person == person_id && !c.paid)
            .min_by_key(|c| (c.date, c.id));

        let mut plan = ExecutionPlan::new();
        match pending {
            Some(contribution) => plan.add(Operation::MarkContributionPaid {
                contribution_id: contribution.id,
            }),
            None => plan.add(Operation::CreateContribution {
                contribution: Contribution::new(hand.id, person_id, amount, date, true),
            }),
        }

        let narr = match narration {
            Some(text) => format!(
                "Payment for pool {}, hand {}: {}",
                pool.number, hand.number, text
            ),
            None => format!("Payment for pool {}, hand {}", pool.number, hand.number),
        };
        let draft = EntryDraft::new(person_id, Some(pool.id), date, narr, 0, amount);
        let entry_id = draft.id;
        plan.add(Operation::PostEntry { draft });

        self.execute(&plan).await?;
        self.adapter.get_entry(entry_id).await
    }

    /// Append a manual ledger posting. This is also the sanctioned way to
    /// restate history after `edit_payout`: post a compensating entry
    /// instead of rewriting old ones.
    pub async fn post_entry(
        &self,
        person_id: Uuid,
        pool: Option<Uuid>,
        date: DateTime<Utc>,
        narration: &str,
        debit: i64,
        credit: i64,
    ) -> Result<LedgerEntry, Error> {
        if debit < 0 || credit < 0 {
            return Err(Error::InvalidAmount);
        }
        self.adapter.get_person(person_id).await?;
        if let Some(pool_id) = pool {
            self.adapter.get_pool(pool_id).await?;
        }

        let draft = EntryDraft::new(person_id, pool, date, narration, debit, credit);
        let entry_id = draft.id;

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::PostEntry { draft });
        self.execute(&plan).await?;

        self.adapter.get_entry(entry_id).await
    }

    /// Collapse a person's ledger history into one closing entry carrying
    /// the final balance. Returns false when there is nothing to close.
    /// Irreversible.
    pub async fn close_ledger(&self, person_id: Uuid) -> Result<bool, Error> {
        self.adapter.get_person(person_id).await?;
        if self.adapter.last_entry(person_id).await?.is_none() {
            return Ok(false);
        }

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::CloseLedger {
            person_id,
            closed_at: Utc::now(),
        });
        self.execute(&plan).await?;
        info!(person = %person_id, "closed ledger");
        Ok(true)
    }

    /// Delete a pool and everything it owns. Every member's ledger is closed
    /// first so their net position survives the loss of the contribution
    /// trail. Destructive and irreversible.
    pub async fn delete_pool(&self, pool_id: Uuid) -> Result<(), Error> {
        let pool = self.adapter.get_pool(pool_id).await?;
        let members = self.adapter.get_members(pool.id).await?;
        let now = Utc::now();

        let mut plan = ExecutionPlan::new();
        for member in &members {
            plan.add(Operation::CloseLedger {
                person_id: *member,
                closed_at: now,
            });
        }
        plan.add(Operation::DeletePool { pool_id: pool.id });

        self.execute(&plan).await?;
        info!(pool = %pool.id, number = pool.number, "deleted pool");
        Ok(())
    }

    /// Balance of the latest entry by (date, id), falling back to the
    /// opening balance. The only sanctioned balance source for posting.
    pub async fn get_last_balance(&self, person_id: Uuid) -> Result<i64, Error> {
        match self.adapter.last_entry(person_id).await? {
            Some(entry) => Ok(entry.balance),
            None => Ok(self.adapter.get_person(person_id).await?.opening_balance),
        }
    }

    /// Audit-only replay of the full history:
    /// `opening_balance + Σ(credit - debit)`. A reconciliation check against
    /// `get_last_balance`, never a posting source.
    pub async fn total_balance(&self, person_id: Uuid) -> Result<i64, Error> {
        let person = self.adapter.get_person(person_id).await?;
        let entries = self.adapter.get_entries(person_id).await?;
        Ok(person.opening_balance + entries.iter().map(LedgerEntry::net).sum::<i64>())
    }

    /// A person's ledger history, newest first, optionally filtered by pool
    /// and date range.
    pub async fn entries_for(
        &self,
        person_id: Uuid,
        filter: &EntryFilter,
    ) -> Result<Vec<LedgerEntry>, Error> {
        self.adapter.get_person(person_id).await?;
        let mut entries = self.adapter.get_entries(person_id).await?;
        entries.retain(|e| {
            filter.pool.is_none_or(|p| e.pool == Some(p))
                && filter.from.is_none_or(|from| e.date >= from)
                && filter.to.is_none_or(|to| e.date <= to)
        });
        entries.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        Ok(entries)
    }

    /// Expected payout for a hand under the minimum-interest schedule.
    pub async fn projected_payout(&self, hand_id: Uuid) -> Result<i64, Error> {
        let hand = self.adapter.get_hand(hand_id).await?;
        let pool = self.adapter.get_pool(hand.pool).await?;
        Ok(projection::projected_payout(&pool, &hand))
    }

    /// Effective discount for a hand in basis points: from the actual bid
    /// when settled, the projection otherwise.
    pub async fn interest_rate_bps(&self, hand_id: Uuid) -> Result<u32, Error> {
        let hand = self.adapter.get_hand(hand_id).await?;
        let pool = self.adapter.get_pool(hand.pool).await?;
        let distributions = self.adapter.get_distributions(hand.id).await?;
        let payout = projection::payout_amount(&pool, &hand, &distributions);
        Ok(projection::interest_rate_bps(pool.amount, payout))
    }

    /// What a member still owes for a hand. Winners owe nothing for the
    /// hand they won; non-members owe nothing.
    pub async fn amount_due(&self, hand_id: Uuid, person_id: Uuid) -> Result<i64, Error> {
        let hand = self.adapter.get_hand(hand_id).await?;
        let pool = self.adapter.get_pool(hand.pool).await?;
        let members = self.adapter.get_members(pool.id).await?;
        let contributions = self.adapter.get_contributions(hand.id).await?;
        let distributions = self.adapter.get_distributions(hand.id).await?;
        Ok(due_for(
            &pool,
            &hand,
            &members,
            &contributions,
            &distributions,
            person_id,
        ))
    }

    /// Total outstanding unpaid contributions across every hand of a pool.
    pub async fn total_due(&self, pool_id: Uuid) -> Result<i64, Error> {
        let pool = self.adapter.get_pool(pool_id).await?;
        let mut total = 0;
        for hand in self.adapter.get_hands(pool.id).await? {
            total += self
                .adapter
                .get_contributions(hand.id)
                .await?
                .iter()
                .filter(|c| !c.paid)
                .map(|c| c.amount)
                .sum::<i64>();
        }
        Ok(total)
    }

    /// Count of hands where no member owes anything. An open hand still
    /// projects dues for everyone, so only settled, fully paid hands count.
    pub async fn completed_hands(&self, pool_id: Uuid) -> Result<u32, Error> {
        let pool = self.adapter.get_pool(pool_id).await?;
        let members = self.adapter.get_members(pool.id).await?;
        let mut completed = 0;
        for hand in self.adapter.get_hands(pool.id).await? {
            let contributions = self.adapter.get_contributions(hand.id).await?;
            let distributions = self.adapter.get_distributions(hand.id).await?;
            let settled = members.iter().all(|m| {
                due_for(&pool, &hand, &members, &contributions, &distributions, *m) == 0
            });
            if settled {
                completed += 1;
            }
        }
        Ok(completed)
    }

    /// The pool's current hand number, clamped to the tenure after overrun.
    pub async fn current_hand(&self, pool_id: Uuid) -> Result<u32, Error> {
        Ok(self.adapter.get_pool(pool_id).await?.clamped_current_hand())
    }

    pub async fn pool_summary(&self, pool_id: Uuid) -> Result<PoolSummary, Error> {
        let pool = self.adapter.get_pool(pool_id).await?;
        let members = self.adapter.get_members(pool.id).await?;
        Ok(PoolSummary {
            number: pool.number,
            member_count: members.len(),
            total_due: self.total_due(pool.id).await?,
            completed_hands: self.completed_hands(pool.id).await?,
            current_hand: pool.clamped_current_hand(),
        })
    }
}

/// Shared due formula: winners owe 0; otherwise the member's exact share
/// (settled) or the projected per-person share (open), less what they have
/// already paid in.
fn due_for(
    pool: &Pool,
    hand: &Hand,
    members: &[Uuid],
    contributions: &[Contribution],
    distributions: &[Distribution],
    person: Uuid,
) -> i64 {
    if distributions.iter().any(|d| d.person == person) {
        return 0;
    }

    let expected = if distributions.is_empty() {
        let projected = projection::projected_payout(pool, hand);
        match projection::member_share(projected, members, person) {
            Some(share) => share,
            None => return 0,
        }
    } else {
        let bid: i64 = distributions.iter().map(|d| d.amount).sum();
        match projection::member_share(bid, members, person) {
            Some(share) => share,
            None => return 0,
        }
    };

    let paid: i64 = contributions
        .iter()
        .filter(|c| c.person == person && c.paid)
        .map(|c| c.amount)
        .sum();

    (expected - paid).max(0)
}
