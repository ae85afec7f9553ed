use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Item;
use crate::error::{AppError, AppResult};

// ============================================================================
// Item Repository
// ============================================================================

pub struct ItemRepository;

impl ItemRepository {
    pub async fn create(
        pool: &SqlitePool,
        list_id: &str,
        name: &str,
        estimated_price: Option<f64>,
        quantity: i64,
    ) -> AppResult<Item> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, list_id, name, estimated_price, quantity, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING id, list_id, name, estimated_price, quantity, completed, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(list_id)
        .bind(name)
        .bind(estimated_price)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, list_id, name, estimated_price, quantity, completed, created_at, updated_at
            FROM items
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_by_list(pool: &SqlitePool, list_id: &str) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, list_id, name, estimated_price, quantity, completed, created_at, updated_at
            FROM items
            WHERE list_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn set_completed(pool: &SqlitePool, id: &str, completed: bool) -> AppResult<Item> {
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET completed = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, list_id, name, estimated_price, quantity, completed, created_at, updated_at
            "#,
        )
        .bind(completed)
        .bind(now)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete_by_list<'e, E>(executor: E, list_id: &str) -> AppResult<u64>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM items WHERE list_id = ?")
            .bind(list_id)
            .execute(executor)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
