// src/adapters/postgres.rs
use crate::{
    Contribution, Distribution, Error, ExecutionPlan, Guard, Hand, LedgerEntry, Operation, Person,
    Pool, Rate, StoreAdapter,
};
use sqlx::Row;
use uuid::Uuid;

pub trait PostgresStore {
    fn pg_pool(&self) -> sqlx::PgPool;
}

/// Concrete adapter over a sqlx connection pool.
pub struct PostgresAdapter {
    pool: sqlx::PgPool,
}

impl PostgresAdapter {
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl PostgresStore for PostgresAdapter {
    fn pg_pool(&self) -> sqlx::PgPool {
        self.pool.clone()
    }
}

#[async_trait::async_trait]
pub trait PostgresSchemaStore {
    /// Initialize the settlement schema. Idempotent.
    async fn init_schema(&self) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl<T> PostgresSchemaStore for T
where
    T: PostgresStore + Send + Sync,
{
    async fn init_schema(&self) -> Result<(), Error> {
        let mut tx = self
            .pg_pool()
            .begin()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS persons (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                short_name TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL,
                phone2 TEXT,
                opening_balance BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pools (
                id UUID PRIMARY KEY,
                number INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                start_date TIMESTAMPTZ NOT NULL,
                amount BIGINT NOT NULL CHECK (amount > 0),
                tenure INTEGER NOT NULL CHECK (tenure > 0),
                min_interest_bps INTEGER NOT NULL DEFAULT 0,
                current_hand INTEGER NOT NULL DEFAULT 1,
                narration TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pool_members (
                pool_id UUID NOT NULL REFERENCES pools(id) ON DELETE CASCADE,
                person_id UUID NOT NULL REFERENCES persons(id),
                PRIMARY KEY (pool_id, person_id)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hands (
                id UUID PRIMARY KEY,
                pool UUID NOT NULL REFERENCES pools(id) ON DELETE CASCADE,
                number INTEGER NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                contribution_amount BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (pool, number)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contributions (
                id UUID PRIMARY KEY,
                hand UUID NOT NULL REFERENCES hands(id) ON DELETE CASCADE,
                person UUID NOT NULL REFERENCES persons(id),
                amount BIGINT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                paid BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS distributions (
                id UUID PRIMARY KEY,
                hand UUID NOT NULL REFERENCES hands(id) ON DELETE CASCADE,
                person UUID NOT NULL REFERENCES persons(id),
                amount BIGINT NOT NULL,
                narration TEXT NOT NULL,
                paid_at TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_entries (
                id UUID PRIMARY KEY,
                person UUID NOT NULL REFERENCES persons(id),
                pool UUID REFERENCES pools(id) ON DELETE SET NULL,
                date TIMESTAMPTZ NOT NULL,
                narration TEXT NOT NULL,
                debit BIGINT NOT NULL DEFAULT 0,
                credit BIGINT NOT NULL DEFAULT 0,
                balance BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_hands_pool ON hands(pool)",
            "CREATE INDEX IF NOT EXISTS idx_contributions_hand ON contributions(hand)",
            "CREATE INDEX IF NOT EXISTS idx_contributions_person ON contributions(person)",
            "CREATE INDEX IF NOT EXISTS idx_distributions_hand ON distributions(hand)",
            "CREATE INDEX IF NOT EXISTS idx_distributions_person ON distributions(person)",
            "CREATE INDEX IF NOT EXISTS idx_entries_person_date ON ledger_entries(person, date, id)",
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(())
    }
}

fn person_from_row(row: &sqlx::postgres::PgRow) -> Result<Person, Error> {
    Ok(Person {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| Error::Storage(e.to_string()))?,
        short_name: row
            .try_get("short_name")
            .map_err(|e| Error::Storage(e.to_string()))?,
        phone: row
            .try_get("phone")
            .map_err(|e| Error::Storage(e.to_string()))?,
        phone2: row
            .try_get("phone2")
            .map_err(|e| Error::Storage(e.to_string()))?,
        opening_balance: row
            .try_get("opening_balance")
            .map_err(|e| Error::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

fn pool_from_row(row: &sqlx::postgres::PgRow) -> Result<Pool, Error> {
    Ok(Pool {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        number: row
            .try_get::<i32, _>("number")
            .map_err(|e| Error::Storage(e.to_string()))? as u32,
        name: row
            .try_get("name")
            .map_err(|e| Error::Storage(e.to_string()))?,
        start_date: row
            .try_get("start_date")
            .map_err(|e| Error::Storage(e.to_string()))?,
        amount: row
            .try_get("amount")
            .map_err(|e| Error::Storage(e.to_string()))?,
        tenure: row
            .try_get::<i32, _>("tenure")
            .map_err(|e| Error::Storage(e.to_string()))? as u32,
        min_interest: Rate::from_bps(
            row.try_get::<i32, _>("min_interest_bps")
                .map_err(|e| Error::Storage(e.to_string()))? as u32,
        ),
        current_hand: row
            .try_get::<i32, _>("current_hand")
            .map_err(|e| Error::Storage(e.to_string()))? as u32,
        narration: row
            .try_get("narration")
            .map_err(|e| Error::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

fn hand_from_row(row: &sqlx::postgres::PgRow) -> Result<Hand, Error> {
    Ok(Hand {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        pool: row
            .try_get("pool")
            .map_err(|e| Error::Storage(e.to_string()))?,
        number: row
            .try_get::<i32, _>("number")
            .map_err(|e| Error::Storage(e.to_string()))? as u32,
        date: row
            .try_get("date")
            .map_err(|e| Error::Storage(e.to_string()))?,
        contribution_amount: row
            .try_get("contribution_amount")
            .map_err(|e| Error::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

fn contribution_from_row(row: &sqlx::postgres::PgRow) -> Result<Contribution, Error> {
    Ok(Contribution {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        hand: row
            .try_get("hand")
            .map_err(|e| Error::Storage(e.to_string()))?,
        person: row
            .try_get("person")
            .map_err(|e| Error::Storage(e.to_string()))?,
        amount: row
            .try_get("amount")
            .map_err(|e| Error::Storage(e.to_string()))?,
        date: row
            .try_get("date")
            .map_err(|e| Error::Storage(e.to_string()))?,
        paid: row
            .try_get("paid")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

fn distribution_from_row(row: &sqlx::postgres::PgRow) -> Result<Distribution, Error> {
    Ok(Distribution {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        hand: row
            .try_get("hand")
            .map_err(|e| Error::Storage(e.to_string()))?,
        person: row
            .try_get("person")
            .map_err(|e| Error::Storage(e.to_string()))?,
        amount: row
            .try_get("amount")
            .map_err(|e| Error::Storage(e.to_string()))?,
        narration: row
            .try_get("narration")
            .map_err(|e| Error::Storage(e.to_string()))?,
        paid_at: row
            .try_get("paid_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<LedgerEntry, Error> {
    Ok(LedgerEntry {
        id: row.try_get("id").map_err(|e| Error::Storage(e.to_string()))?,
        person: row
            .try_get("person")
            .map_err(|e| Error::Storage(e.to_string()))?,
        pool: row
            .try_get("pool")
            .map_err(|e| Error::Storage(e.to_string()))?,
        date: row
            .try_get("date")
            .map_err(|e| Error::Storage(e.to_string()))?,
        narration: row
            .try_get("narration")
            .map_err(|e| Error::Storage(e.to_string()))?,
        debit: row
            .try_get("debit")
            .map_err(|e| Error::Storage(e.to_string()))?,
        credit: row
            .try_get("credit")
            .map_err(|e| Error::Storage(e.to_string()))?,
        balance: row
            .try_get("balance")
            .map_err(|e| Error::Storage(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| Error::Storage(e.to_string()))?,
    })
}

#[async_trait::async_trait]
trait PostgresInternalStore {
    async fn check_guard_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        guard: &Guard,
    ) -> Result<(), Error>;

    async fn last_balance_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        person_id: Uuid,
    ) -> Result<i64, Error>;

    async fn apply_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        op: &Operation,
    ) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl<T> PostgresInternalStore for T
where
    T: PostgresStore + Send + Sync,
{
    async fn check_guard_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        guard: &Guard,
    ) -> Result<(), Error> {
        match guard {
            Guard::HandOpen { hand_id } => {
                // Lock the hand row for the duration of the plan; a racing
                // settlement of the same hand blocks here and then fails the
                // count below.
                sqlx::query("SELECT id FROM hands WHERE id = $1 FOR UPDATE")
                    .bind(hand_id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?
                    .ok_or_else(|| Error::NotFound(format!("hand {}", hand_id)))?;

                let settled: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*)::BIGINT FROM distributions WHERE hand = $1",
                )
                .bind(hand_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;

                if settled > 0 {
                    return Err(Error::AlreadySettled(*hand_id));
                }
                Ok(())
            }
            Guard::HasNotWon { pool_id, person_id } => {
                sqlx::query("SELECT id FROM pools WHERE id = $1 FOR UPDATE")
                    .bind(pool_id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?
                    .ok_or_else(|| Error::NotFound(format!("pool {}", pool_id)))?;

                let won: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)::BIGINT
                    FROM distributions d
                    JOIN hands h ON d.hand = h.id
                    WHERE h.pool = $1 AND d.person = $2
                    "#,
                )
                .bind(pool_id)
                .bind(person_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;

                if won > 0 {
                    return Err(Error::IneligibleWinner(*person_id));
                }
                Ok(())
            }
        }
    }

    async fn last_balance_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        person_id: Uuid,
    ) -> Result<i64, Error> {
        let last: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT balance FROM ledger_entries
            WHERE person = $1
            ORDER BY date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(person_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        if let Some(balance) = last {
            return Ok(balance);
        }

        sqlx::query_scalar("SELECT opening_balance FROM persons WHERE id = $1")
            .bind(person_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::Storage(format!("person {} missing for posting", person_id)))
    }

    async fn apply_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        op: &Operation,
    ) -> Result<(), Error> {
        match op {
            Operation::CreatePerson { person } => {
                sqlx::query(
                    r#"
                    INSERT INTO persons (id, name, short_name, phone, phone2, opening_balance, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(person.id)
                .bind(&person.name)
                .bind(&person.short_name)
                .bind(&person.phone)
                .bind(&person.phone2)
                .bind(person.opening_balance)
                .bind(person.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::CreatePool { pool, members } => {
                sqlx::query(
                    r#"
                    INSERT INTO pools (id, number, name, start_date, amount, tenure, min_interest_bps, current_hand, narration, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(pool.id)
                .bind(pool.number as i32)
                .bind(&pool.name)
                .bind(pool.start_date)
                .bind(pool.amount)
                .bind(pool.tenure as i32)
                .bind(pool.min_interest.bps() as i32)
                .bind(pool.current_hand as i32)
                .bind(&pool.narration)
                .bind(pool.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;

                for member in members {
                    sqlx::query(
                        "INSERT INTO pool_members (pool_id, person_id) VALUES ($1, $2)",
                    )
                    .bind(pool.id)
                    .bind(member)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?;
                }
            }
            Operation::CreateHand { hand } => {
                sqlx::query(
                    r#"
                    INSERT INTO hands (id, pool, number, date, contribution_amount, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(hand.id)
                .bind(hand.pool)
                .bind(hand.number as i32)
                .bind(hand.date)
                .bind(hand.contribution_amount)
                .bind(hand.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::CreateDistribution { distribution } => {
                sqlx::query(
                    r#"
                    INSERT INTO distributions (id, hand, person, amount, narration, paid_at, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(distribution.id)
                .bind(distribution.hand)
                .bind(distribution.person)
                .bind(distribution.amount)
                .bind(&distribution.narration)
                .bind(distribution.paid_at)
                .bind(distribution.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::RetargetDistribution {
                distribution_id,
                person,
                amount,
            } => {
                let updated = sqlx::query(
                    "UPDATE distributions SET person = $2, amount = $3 WHERE id = $1",
                )
                .bind(distribution_id)
                .bind(person)
                .bind(amount)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;

                if updated.rows_affected() == 0 {
                    return Err(Error::Storage(format!(
                        "distribution {} missing",
                        distribution_id
                    )));
                }
            }
            Operation::CreateContribution { contribution } => {
                sqlx::query(
                    r#"
                    INSERT INTO contributions (id, hand, person, amount, date, paid)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(contribution.id)
                .bind(contribution.hand)
                .bind(contribution.person)
                .bind(contribution.amount)
                .bind(contribution.date)
                .bind(contribution.paid)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::MarkContributionPaid { contribution_id } => {
                let updated =
                    sqlx::query("UPDATE contributions SET paid = TRUE WHERE id = $1")
                        .bind(contribution_id)
                        .execute(&mut **tx)
                        .await
                        .map_err(|e| Error::Storage(e.to_string()))?;

                if updated.rows_affected() == 0 {
                    return Err(Error::Storage(format!(
                        "contribution {} missing",
                        contribution_id
                    )));
                }
            }
            Operation::DeleteContributions { hand_id } => {
                sqlx::query("DELETE FROM contributions WHERE hand = $1")
                    .bind(hand_id)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::PostEntry { draft } => {
                // Reads entries written earlier in this transaction, so
                // balances chain correctly within one plan.
                let previous = self.last_balance_tx(tx, draft.person).await?;
                let entry = draft.clone().into_entry(previous);

                sqlx::query(
                    r#"
                    INSERT INTO ledger_entries (id, person, pool, date, narration, debit, credit, balance, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(entry.id)
                .bind(entry.person)
                .bind(entry.pool)
                .bind(entry.date)
                .bind(&entry.narration)
                .bind(entry.debit)
                .bind(entry.credit)
                .bind(entry.balance)
                .bind(entry.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::AdvancePool {
                pool_id,
                settled_hand,
            } => {
                sqlx::query(
                    "UPDATE pools SET current_hand = current_hand + 1 WHERE id = $1 AND current_hand = $2",
                )
                .bind(pool_id)
                .bind(*settled_hand as i32)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::CloseLedger {
                person_id,
                closed_at,
            } => {
                let last: Option<i64> = sqlx::query_scalar(
                    r#"
                    SELECT balance FROM ledger_entries
                    WHERE person = $1
                    ORDER BY date DESC, id DESC
                    LIMIT 1
                    "#,
                )
                .bind(person_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;

                let Some(final_balance) = last else {
                    return Ok(());
                };

                sqlx::query("DELETE FROM ledger_entries WHERE person = $1")
                    .bind(person_id)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?;

                sqlx::query(
                    r#"
                    INSERT INTO ledger_entries (id, person, pool, date, narration, debit, credit, balance, created_at)
                    VALUES ($1, $2, NULL, $3, $4, 0, 0, $5, NOW())
                    "#,
                )
                .bind(Uuid::now_v7())
                .bind(person_id)
                .bind(closed_at)
                .bind(format!(
                    "Ledger closed on {}",
                    closed_at.format("%d-%m-%Y %H:%M")
                ))
                .bind(final_balance)
                .execute(&mut **tx)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
            Operation::DeletePool { pool_id } => {
                // Hands, contributions, distributions and the member rows go
                // with the pool via ON DELETE CASCADE; ledger entries keep
                // their rows with the pool reference nulled.
                sqlx::query("DELETE FROM pools WHERE id = $1")
                    .bind(pool_id)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| Error::Storage(e.to_string()))?;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StoreAdapter for PostgresAdapter {
    async fn execute_plan(&self, plan: &ExecutionPlan) -> Result<(), Error> {
        let mut tx = self
            .pg_pool()
            .begin()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        // Guards verified under row locks INSIDE the transaction — this is
        // the real protection against racing settlements.
        for guard in plan.guards() {
            if let Err(e) = self.check_guard_tx(&mut tx, guard).await {
                tx.rollback().await.ok();
                return Err(e);
            }
        }

        for op in plan.operations() {
            if let Err(e) = self.apply_tx(&mut tx, op).await {
                tx.rollback().await.ok();
                return Err(e);
            }
        }

        tx.commit()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get_person(&self, person_id: Uuid) -> Result<Person, Error> {
        let row = sqlx::query("SELECT * FROM persons WHERE id = $1")
            .bind(person_id)
            .fetch_optional(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("person {}", person_id)))?;

        person_from_row(&row)
    }

    async fn get_pool(&self, pool_id: Uuid) -> Result<Pool, Error> {
        let row = sqlx::query("SELECT * FROM pools WHERE id = $1")
            .bind(pool_id)
            .fetch_optional(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("pool {}", pool_id)))?;

        pool_from_row(&row)
    }

    async fn next_pool_number(&self) -> Result<u32, Error> {
        let max: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(number), 0) FROM pools")
            .fetch_one(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(max as u32 + 1)
    }

    async fn get_members(&self, pool_id: Uuid) -> Result<Vec<Uuid>, Error> {
        sqlx::query("SELECT id FROM pools WHERE id = $1")
            .bind(pool_id)
            .fetch_optional(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("pool {}", pool_id)))?;

        let members: Vec<Uuid> = sqlx::query_scalar(
            "SELECT person_id FROM pool_members WHERE pool_id = $1 ORDER BY person_id",
        )
        .bind(pool_id)
        .fetch_all(&self.pg_pool())
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(members)
    }

    async fn get_hand(&self, hand_id: Uuid) -> Result<Hand, Error> {
        let row = sqlx::query("SELECT * FROM hands WHERE id = $1")
            .bind(hand_id)
            .fetch_optional(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("hand {}", hand_id)))?;

        hand_from_row(&row)
    }

    async fn get_hands(&self, pool_id: Uuid) -> Result<Vec<Hand>, Error> {
        let rows = sqlx::query("SELECT * FROM hands WHERE pool = $1 ORDER BY number")
            .bind(pool_id)
            .fetch_all(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(hand_from_row).collect()
    }

    async fn get_contributions(&self, hand_id: Uuid) -> Result<Vec<Contribution>, Error> {
        let rows = sqlx::query("SELECT * FROM contributions WHERE hand = $1 ORDER BY date, id")
            .bind(hand_id)
            .fetch_all(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(contribution_from_row).collect()
    }

    async fn get_distributions(&self, hand_id: Uuid) -> Result<Vec<Distribution>, Error> {
        let rows = sqlx::query("SELECT * FROM distributions WHERE hand = $1 ORDER BY id")
            .bind(hand_id)
            .fetch_all(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(distribution_from_row).collect()
    }

    async fn get_pool_distributions(&self, pool_id: Uuid) -> Result<Vec<Distribution>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT d.*
            FROM distributions d
            JOIN hands h ON d.hand = h.id
            WHERE h.pool = $1
            ORDER BY d.id
            "#,
        )
        .bind(pool_id)
        .fetch_all(&self.pg_pool())
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(distribution_from_row).collect()
    }

    async fn get_entry(&self, entry_id: Uuid) -> Result<LedgerEntry, Error> {
        let row = sqlx::query("SELECT * FROM ledger_entries WHERE id = $1")
            .bind(entry_id)
            .fetch_optional(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?
            .ok_or_else(|| Error::NotFound(format!("ledger entry {}", entry_id)))?;

        entry_from_row(&row)
    }

    async fn get_entries(&self, person_id: Uuid) -> Result<Vec<LedgerEntry>, Error> {
        let rows = sqlx::query("SELECT * FROM ledger_entries WHERE person = $1 ORDER BY date, id")
            .bind(person_id)
            .fetch_all(&self.pg_pool())
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn last_entry(&self, person_id: Uuid) -> Result<Option<LedgerEntry>, Error> {
        let row = sqlx::query(
            r#"
            SELECT * FROM ledger_entries
            WHERE person = $1
            ORDER BY date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(person_id)
        .fetch_optional(&self.pg_pool())
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        row.as_ref().map(entry_from_row).transpose()
    }
}
