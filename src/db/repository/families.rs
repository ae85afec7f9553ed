use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Family;
use crate::error::{AppError, AppResult};

// ============================================================================
// Family Repository
// ============================================================================

pub struct FamilyRepository;

impl FamilyRepository {
    pub async fn create(pool: &SqlitePool, owner_id: &str, name: &str) -> AppResult<Family> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, Family>(
            r#"
            INSERT INTO families (id, name, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, owner_id, created_at, updated_at
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

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Family>> {
        sqlx::query_as::<_, Family>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM families
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Families the given user belongs to, owner or plain member alike.
    pub async fn list_for_member(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<Family>> {
        sqlx::query_as::<_, Family>(
            r#"
            SELECT f.id, f.name, f.owner_id, f.created_at, f.updated_at
            FROM families f
            JOIN family_members fm ON fm.family_id = f.id
            WHERE fm.user_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }
}
