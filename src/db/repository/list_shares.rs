use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::db::models::ListShare;
use crate::error::{AppError, AppResult};

// ============================================================================
// List Share Repository
// ============================================================================

/// A share joined with the list it grants access to, as seen by the grantee.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SharedListRow {
    pub share_id: String,
    pub can_edit: bool,
    pub list_id: String,
    pub name: String,
    pub owner_id: String,
}

pub struct ListShareRepository;

impl ListShareRepository {
    /// Insert a share for `(list_id, user_id)`, or refresh `can_edit` on the
    /// existing row. The UNIQUE constraint makes duplicates impossible.
    pub async fn upsert(
        pool: &SqlitePool,
        list_id: &str,
        user_id: &str,
        can_edit: bool,
    ) -> AppResult<ListShare> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, ListShare>(
            r#"
            INSERT INTO list_shares (id, list_id, user_id, can_edit, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(list_id, user_id)
            DO UPDATE SET can_edit = excluded.can_edit, updated_at = excluded.updated_at
            RETURNING id, list_id, user_id, can_edit, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(list_id)
        .bind(user_id)
        .bind(can_edit)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find(
        pool: &SqlitePool,
        list_id: &str,
        user_id: &str,
    ) -> AppResult<Option<ListShare>> {
        sqlx::query_as::<_, ListShare>(
            r#"
            SELECT id, list_id, user_id, can_edit, created_at, updated_at
            FROM list_shares
            WHERE list_id = ? AND user_id = ?
            LIMIT 1
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_by_list(pool: &SqlitePool, list_id: &str) -> AppResult<Vec<ListShare>> {
        sqlx::query_as::<_, ListShare>(
            r#"
            SELECT id, list_id, user_id, can_edit, created_at, updated_at
            FROM list_shares
            WHERE list_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Delete the share for `(list_id, user_id)`. Returns the number of rows
    /// removed; revoking an absent share is not an error.
    pub async fn delete(pool: &SqlitePool, list_id: &str, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM list_shares WHERE list_id = ? AND user_id = ?")
            .bind(list_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_list<'e, E>(executor: E, list_id: &str) -> AppResult<u64>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM list_shares WHERE list_id = ?")
            .bind(list_id)
            .execute(executor)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    /// Lists shared with the given user, joined with the list rows.
    pub async fn list_for_user_with_lists(
        pool: &SqlitePool,
        user_id: &str,
    ) -> AppResult<Vec<SharedListRow>> {
        sqlx::query_as::<_, SharedListRow>(
            r#"
            SELECT
                ls.id AS share_id,
                ls.can_edit AS can_edit,
                l.id AS list_id,
                l.name AS name,
                l.owner_id AS owner_id
            FROM list_shares ls
            JOIN lists l ON l.id = ls.list_id
            WHERE ls.user_id = ?
            ORDER BY ls.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }
}
