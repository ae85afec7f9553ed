use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{FamilyMember, MemberRole};
use crate::error::{AppError, AppResult};

// ============================================================================
// Family Member Repository
// ============================================================================

pub struct FamilyMemberRepository;

impl FamilyMemberRepository {
    pub async fn create(
        pool: &SqlitePool,
        family_id: &str,
        user_id: &str,
        role: MemberRole,
    ) -> AppResult<FamilyMember> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();

        sqlx::query_as::<_, FamilyMember>(
            r#"
            INSERT INTO family_members (id, family_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, family_id, user_id, role, created_at
            "#,
        )
        .bind(&id)
        .bind(family_id)
        .bind(user_id)
        .bind(role)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find(
        pool: &SqlitePool,
        family_id: &str,
        user_id: &str,
    ) -> AppResult<Option<FamilyMember>> {
        sqlx::query_as::<_, FamilyMember>(
            r#"
            SELECT id, family_id, user_id, role, created_at
            FROM family_members
            WHERE family_id = ? AND user_id = ?
            LIMIT 1
            "#,
        )
        .bind(family_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_by_family(
        pool: &SqlitePool,
        family_id: &str,
    ) -> AppResult<Vec<FamilyMember>> {
        sqlx::query_as::<_, FamilyMember>(
            r#"
            SELECT id, family_id, user_id, role, created_at
            FROM family_members
            WHERE family_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, family_id: &str, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM family_members WHERE family_id = ? AND user_id = ?")
            .bind(family_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
