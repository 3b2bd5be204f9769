use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use common::{BakedGoodId, BakeryId};

use crate::{
    BakedGood, Bakery, NewBakedGood, Result, StoreError,
    store::BakeryStore,
};

/// PostgreSQL-backed store implementation.
///
/// Write operations run inside an explicit transaction that is rolled back
/// before the error is returned if the statement fails. The schema declares
/// the `baked_goods.bakery_id` foreign key, so dangling references are
/// rejected here as constraint violations while the in-memory store accepts
/// them.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    fn row_to_bakery(row: PgRow) -> Result<Bakery> {
        Ok(Bakery {
            id: BakeryId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }

    fn row_to_baked_good(row: PgRow) -> Result<BakedGood> {
        Ok(BakedGood {
            id: BakedGoodId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            bakery_id: BakeryId::new(row.try_get("bakery_id")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

fn map_db_error(e: sqlx::Error) -> StoreError {
    // Constraint failures get their own kind so callers can tell a rejected
    // reference apart from a connection problem.
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint().is_some()
    {
        return StoreError::ConstraintViolation(db_err.message().to_string());
    }
    StoreError::Database(e)
}

#[async_trait]
impl BakeryStore for PostgresStore {
    async fn list_bakeries(&self) -> Result<Vec<Bakery>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM bakeries ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_bakery).collect()
    }

    async fn get_bakery(&self, id: BakeryId) -> Result<Option<Bakery>> {
        let row = sqlx::query("SELECT id, name, created_at FROM bakeries WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_bakery).transpose()
    }

    async fn rename_bakery(&self, id: BakeryId, name: &str) -> Result<Option<Bakery>> {
        let mut tx = self.pool.begin().await?;

        let row = match sqlx::query(
            "UPDATE bakeries SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id.as_i64())
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                tx.rollback().await.ok();
                return Err(map_db_error(e));
            }
        };

        tx.commit().await?;
        row.map(Self::row_to_bakery).transpose()
    }

    async fn list_baked_goods(&self) -> Result<Vec<BakedGood>> {
        let rows = sqlx::query(
            "SELECT id, name, price, bakery_id, created_at FROM baked_goods ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_baked_good).collect()
    }

    async fn baked_goods_for_bakery(&self, bakery_id: BakeryId) -> Result<Vec<BakedGood>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            WHERE bakery_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(bakery_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_baked_good).collect()
    }

    async fn baked_goods_by_price(&self) -> Result<Vec<BakedGood>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            ORDER BY price DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_baked_good).collect()
    }

    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            ORDER BY price DESC, id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_baked_good).transpose()
    }

    async fn insert_baked_good(&self, new: NewBakedGood) -> Result<BakedGood> {
        let mut tx = self.pool.begin().await?;

        let row = match sqlx::query(
            r#"
            INSERT INTO baked_goods (name, price, bakery_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, bakery_id, created_at
            "#,
        )
        .bind(&new.name)
        .bind(new.price)
        .bind(new.bakery_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                tx.rollback().await.ok();
                return Err(map_db_error(e));
            }
        };

        tx.commit().await?;
        Self::row_to_baked_good(row)
    }

    async fn delete_baked_good(&self, id: BakedGoodId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = match sqlx::query("DELETE FROM baked_goods WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tx.rollback().await.ok();
                return Err(map_db_error(e));
            }
        };

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
