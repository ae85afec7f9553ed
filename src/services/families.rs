use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::models::{Family, FamilyMember, List, MemberRole};
use crate::db::{FamilyMemberRepository, FamilyRepository, ListRepository};
use crate::error::{AppError, AppResult};
use crate::services::access::AccessService;

// ============================================================================
// Family Service
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FamilyWithMembers {
    #[serde(flatten)]
    pub family: Family,
    pub members: Vec<FamilyMember>,
}

#[derive(Debug, Serialize)]
pub struct FamilyOverview {
    #[serde(flatten)]
    pub family: Family,
    pub members: Vec<FamilyMember>,
    /// Lists that have been shared with the family as a whole.
    pub lists: Vec<List>,
}

pub struct FamilyService;

impl FamilyService {
    /// Create a family and its owner membership row. The two inserts are
    /// deliberately separate store operations; if the membership insert
    /// fails after the family insert succeeded, the partial write is
    /// surfaced as a fatal inconsistency instead of leaving an ownerless
    /// family behind silently.
    pub async fn create_family(
        pool: &SqlitePool,
        owner_id: &str,
        name: &str,
    ) -> AppResult<FamilyWithMembers> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Family name is required".to_string()));
        }

        let family = FamilyRepository::create(pool, owner_id, name).await?;

        let owner_row =
            FamilyMemberRepository::create(pool, &family.id, owner_id, MemberRole::Owner)
                .await
                .map_err(|e| {
                    AppError::Inconsistency(format!(
                        "family {} created but owner membership insert failed: {}",
                        family.id, e
                    ))
                })?;

        Ok(FamilyWithMembers {
            family,
            members: vec![owner_row],
        })
    }

    /// Families the caller belongs to, with members and associated lists.
    pub async fn families_for(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<FamilyOverview>> {
        let families = FamilyRepository::list_for_member(pool, user_id).await?;

        let mut out = Vec::with_capacity(families.len());
        for family in families {
            let members = FamilyMemberRepository::list_by_family(pool, &family.id).await?;
            let lists = ListRepository::list_by_family(pool, &family.id).await?;
            out.push(FamilyOverview {
                family,
                members,
                lists,
            });
        }

        Ok(out)
    }

    /// Members of a family; the caller must be a member themselves.
    pub async fn members(
        pool: &SqlitePool,
        actor: &str,
        family_id: &str,
    ) -> AppResult<Vec<FamilyMember>> {
        let family = FamilyRepository::find_by_id(pool, family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        AccessService::require_family_member(pool, actor, &family).await?;

        FamilyMemberRepository::list_by_family(pool, family_id).await
    }

    pub async fn add_member(
        pool: &SqlitePool,
        actor: &str,
        family_id: &str,
        target_user_id: &str,
    ) -> AppResult<FamilyMember> {
        let family = FamilyRepository::find_by_id(pool, family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        AccessService::require_family_owner(actor, &family)?;

        if FamilyMemberRepository::find(pool, family_id, target_user_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyMember);
        }

        let member =
            FamilyMemberRepository::create(pool, family_id, target_user_id, MemberRole::Member)
                .await?;

        tracing::info!(
            "Added {} to family {} as {}",
            target_user_id,
            family_id,
            member.role.as_str()
        );

        Ok(member)
    }

    /// Remove a member. The owner row is non-removable, even when the owner
    /// targets themselves.
    pub async fn remove_member(
        pool: &SqlitePool,
        actor: &str,
        family_id: &str,
        target_user_id: &str,
    ) -> AppResult<()> {
        let family = FamilyRepository::find_by_id(pool, family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        AccessService::require_family_owner(actor, &family)?;

        if target_user_id == family.owner_id {
            return Err(AppError::CannotRemoveOwner);
        }

        if FamilyMemberRepository::find(pool, family_id, target_user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotAMember);
        }

        FamilyMemberRepository::delete(pool, family_id, target_user_id).await?;

        tracing::info!("Removed {} from family {}", target_user_id, family_id);

        Ok(())
    }
}
