use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::List;
use crate::error::{AppError, AppResult};

// ============================================================================
// List Repository
// ============================================================================

pub struct ListRepository;

impl ListRepository {
    pub async fn create(pool: &SqlitePool, owner_id: &str, name: &str) -> AppResult<List> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (id, name, owner_id, family_id, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            RETURNING id, name, owner_id, family_id, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<List>> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, name, owner_id, family_id, created_at, updated_at
            FROM lists
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_by_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<List>> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, name, owner_id, family_id, created_at, updated_at
            FROM lists
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_by_family(pool: &SqlitePool, family_id: &str) -> AppResult<Vec<List>> {
        sqlx::query_as::<_, List>(
            r#"
            SELECT id, name, owner_id, family_id, created_at, updated_at
            FROM lists
            WHERE family_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Record that the list was shared with a family as a whole.
    pub async fn set_family(pool: &SqlitePool, list_id: &str, family_id: &str) -> AppResult<()> {
        let now = chrono::Utc::now().naive_utc();

        sqlx::query("UPDATE lists SET family_id = ?, updated_at = ? WHERE id = ?")
            .bind(family_id)
            .bind(now)
            .bind(list_id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    /// Delete the list row itself. Shares and items must already be gone;
    /// see `ListService::delete_list` for the full cascade.
    pub async fn delete<'e, E>(executor: E, id: &str) -> AppResult<u64>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
