use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::models::{Item, ListShare};
use crate::db::{
    FamilyMemberRepository, FamilyRepository, ItemRepository, ListRepository, ListShareRepository,
};
use crate::error::{AppError, AppResult};
use crate::services::access::AccessService;

// ============================================================================
// Share Service
// ============================================================================

/// Outcome of sharing a list with a whole family. Per-member failures never
/// cancel the grants already applied; they are collected here instead.
#[derive(Debug, Serialize)]
pub struct FamilyShareReport {
    pub list_id: String,
    pub family_id: String,
    pub shared: Vec<String>,
    pub failed: Vec<FailedShare>,
}

#[derive(Debug, Serialize)]
pub struct FailedShare {
    pub user_id: String,
    pub error: String,
}

/// A list as seen by a user it was shared with.
#[derive(Debug, Serialize)]
pub struct SharedList {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub share_id: String,
    pub can_edit: bool,
    pub items: Vec<Item>,
}

pub struct ShareService;

impl ShareService {
    /// Grant (or refresh) a share on a list for a single user.
    pub async fn share_with_user(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
        target_user_id: &str,
        can_edit: bool,
    ) -> AppResult<ListShare> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_owner(actor, &list)?;

        if target_user_id == actor {
            return Err(AppError::Validation(
                "Cannot share a list with yourself".to_string(),
            ));
        }

        ListShareRepository::upsert(pool, list_id, target_user_id, can_edit).await
    }

    /// Grant an edit-capable share to every member of a family except the
    /// acting user. Upserts run concurrently; they target disjoint rows.
    pub async fn share_with_family(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
        family_id: &str,
    ) -> AppResult<FamilyShareReport> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_owner(actor, &list)?;

        let family = FamilyRepository::find_by_id(pool, family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        // The actor must belong to the family used as the share target, but
        // does not have to own it.
        AccessService::require_family_member(pool, actor, &family).await?;

        let members = FamilyMemberRepository::list_by_family(pool, family_id).await?;

        let grants = members
            .iter()
            .filter(|m| m.user_id != actor)
            .map(|m| {
                let user_id = m.user_id.clone();
                let list_id = list.id.clone();
                async move {
                    let result = ListShareRepository::upsert(pool, &list_id, &user_id, true).await;
                    (user_id, result)
                }
            });

        let mut shared = Vec::new();
        let mut failed = Vec::new();

        for (user_id, result) in futures::future::join_all(grants).await {
            match result {
                Ok(_) => shared.push(user_id),
                Err(e) => {
                    tracing::warn!(
                        "Failed to share list {} with family member {}: {}",
                        list.id,
                        user_id,
                        e
                    );
                    failed.push(FailedShare {
                        user_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        // Remember the association so the family listing can surface it.
        ListRepository::set_family(pool, &list.id, family_id).await?;

        Ok(FamilyShareReport {
            list_id: list.id,
            family_id: family.id,
            shared,
            failed,
        })
    }

    /// All shares on a list; owner only.
    pub async fn shares_for_list(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
    ) -> AppResult<Vec<ListShare>> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_owner(actor, &list)?;

        ListShareRepository::list_by_list(pool, list_id).await
    }

    /// Every list shared with the given user, items included.
    pub async fn shared_with_me(pool: &SqlitePool, actor: &str) -> AppResult<Vec<SharedList>> {
        let rows = ListShareRepository::list_for_user_with_lists(pool, actor).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let items = ItemRepository::list_by_list(pool, &row.list_id).await?;
            out.push(SharedList {
                id: row.list_id,
                name: row.name,
                owner_id: row.owner_id,
                share_id: row.share_id,
                can_edit: row.can_edit,
                items,
            });
        }

        Ok(out)
    }

    /// Revoke a share; absent shares are a no-op, not an error.
    pub async fn revoke(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
        target_user_id: &str,
    ) -> AppResult<()> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_owner(actor, &list)?;

        ListShareRepository::delete(pool, list_id, target_user_id).await?;

        Ok(())
    }
}
