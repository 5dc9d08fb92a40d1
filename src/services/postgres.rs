use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::core::{select_unpaired, MAX_MATCHES};
use crate::models::{CommitOutcome, CorpusEntry, PairUniqueness, Pairing, Profile};
use crate::services::store::{paired_names, MatchLedger, ProfileStore, RematchOutcome, StoreError};

/// PostgreSQL-backed profile store and match ledger
///
/// Every operation checks a connection out of the pool for its own
/// duration; nothing holds a cursor between requests.
pub struct PostgresClient {
    pool: PgPool,
    uniqueness: PairUniqueness,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
        uniqueness: PairUniqueness,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool, uniqueness })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
        uniqueness: PairUniqueness,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
            uniqueness,
        )
        .await
    }

    /// Wrap an existing pool; migrations are the caller's concern
    pub fn with_pool(pool: PgPool, uniqueness: PairUniqueness) -> Self {
        Self { pool, uniqueness }
    }

    pub fn uniqueness(&self) -> PairUniqueness {
        self.uniqueness
    }

    async fn delete_pairings_of(conn: &mut PgConnection, name: &str) -> Result<u64, sqlx::Error> {
        let query = r#"
            DELETE FROM pairings
            WHERE member_a = $1 OR member_b = $1
        "#;

        let result = sqlx::query(query).bind(name).execute(conn).await?;
        Ok(result.rows_affected())
    }

    async fn insert_pairing(
        conn: &mut PgConnection,
        uniqueness: PairUniqueness,
        member_a: &str,
        member_b: &str,
    ) -> Result<CommitOutcome, sqlx::Error> {
        // The table constraint only covers the ordered pair
        let query = match uniqueness {
            PairUniqueness::Ordered => r#"
                INSERT INTO pairings (member_a, member_b)
                VALUES ($1, $2)
                ON CONFLICT (member_a, member_b) DO NOTHING
            "#,
            PairUniqueness::Unordered => r#"
                INSERT INTO pairings (member_a, member_b)
                SELECT $1, $2
                WHERE NOT EXISTS (
                    SELECT 1 FROM pairings WHERE member_a = $2 AND member_b = $1
                )
                ON CONFLICT (member_a, member_b) DO NOTHING
            "#,
        };

        let result = sqlx::query(query)
            .bind(member_a)
            .bind(member_b)
            .execute(conn)
            .await?;

        if result.rows_affected() > 0 {
            Ok(CommitOutcome::Committed)
        } else {
            Ok(CommitOutcome::Duplicate)
        }
    }

    async fn load_pairings(conn: &mut PgConnection) -> Result<Vec<Pairing>, sqlx::Error> {
        let rows = sqlx::query("SELECT member_a, member_b FROM pairings ORDER BY id")
            .fetch_all(conn)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Pairing::new(row.get::<String, _>("member_a"), row.get::<String, _>("member_b")))
            .collect())
    }
}

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        name: row.get("name"),
        department: row.get("department"),
        year: row.get("year"),
        interests: row.get("interests"),
        linkedin_id: row.get("linkedin_id"),
        phone_number: row.get("phone_number"),
        email: row.get("email"),
        user_id: row.get("user_id"),
    }
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn list_all(&self) -> Result<Vec<CorpusEntry>, StoreError> {
        let query = r#"
            SELECT id, name, interests, email
            FROM profiles
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let corpus: Vec<CorpusEntry> = rows
            .iter()
            .map(|row| CorpusEntry {
                id: row.get("id"),
                name: row.get("name"),
                interests: row.get("interests"),
                email: row.get("email"),
            })
            .collect();

        tracing::debug!("Loaded corpus snapshot of {} profiles", corpus.len());

        Ok(corpus)
    }

    async fn find_by_auth_id(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let query = r#"
            SELECT id, name, department, year, interests, linkedin_id, phone_number, email, user_id
            FROM profiles
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl MatchLedger for PostgresClient {
    async fn release(&self, name: &str) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let released = Self::delete_pairings_of(&mut conn, name).await?;

        tracing::debug!("Released {} pairings for {}", released, name);

        Ok(released)
    }

    async fn commit(&self, member_a: &str, member_b: &str) -> Result<CommitOutcome, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let outcome = Self::insert_pairing(&mut conn, self.uniqueness, member_a, member_b).await?;

        if outcome == CommitOutcome::Duplicate {
            tracing::warn!("Pairing {} / {} already exists", member_a, member_b);
        }

        Ok(outcome)
    }

    async fn active_names(&self) -> Result<HashSet<String>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = Self::load_pairings(&mut conn).await?;
        Ok(paired_names(&rows))
    }

    async fn pairings(&self) -> Result<Vec<Pairing>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(Self::load_pairings(&mut conn).await?)
    }

    /// Release, select and commit inside one transaction
    ///
    /// The table lock conflicts with itself, so concurrent rematches run
    /// one after another and cannot both claim the same free name. Plain
    /// reads are not blocked.
    async fn rematch(&self, requester: &str, ranked_names: &[String]) -> Result<RematchOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE pairings IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let released = Self::delete_pairings_of(&mut tx, requester).await?;
        let paired = paired_names(&Self::load_pairings(&mut tx).await?);
        let matched = select_unpaired(ranked_names, &paired, MAX_MATCHES);

        let commit = match matched.as_slice() {
            [a, b] => Some(Self::insert_pairing(&mut tx, self.uniqueness, a, b).await?),
            _ => None,
        };

        tx.commit().await?;

        tracing::debug!(
            "Rematched {}: released {}, selected {:?}, commit {:?}",
            requester,
            released,
            matched,
            commit
        );

        Ok(RematchOutcome {
            matched,
            released,
            commit,
        })
    }
}
