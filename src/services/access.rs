use sqlx::SqlitePool;

use crate::db::models::{Family, List};
use crate::db::{FamilyMemberRepository, ListShareRepository};
use crate::error::{AppError, AppResult};

/// Capability checks for lists and families.
///
/// Checks are evaluated ownership-first so the "owner always wins" rule is
/// unambiguous and the common case costs no extra query. Every mutation path
/// goes through one of these before touching the store.
pub struct AccessService;

impl AccessService {
    /// Share management and list deletion are owner-only.
    pub fn require_list_owner(actor: &str, list: &List) -> AppResult<()> {
        if list.owner_id == actor {
            Ok(())
        } else {
            Err(AppError::NotOwner)
        }
    }

    /// Read access: the owner, or anyone with a share row regardless of its
    /// edit flag.
    pub async fn require_list_read(
        pool: &SqlitePool,
        actor: &str,
        list: &List,
    ) -> AppResult<()> {
        if list.owner_id == actor {
            return Ok(());
        }

        match ListShareRepository::find(pool, &list.id, actor).await? {
            Some(_) => Ok(()),
            None => {
                tracing::warn!(
                    "Access denied: user {} attempted to read list {} without a share",
                    actor,
                    list.id
                );
                Err(AppError::NotOwnerOrShared)
            }
        }
    }

    /// Item mutations: the owner, or a share with `can_edit = true`. A
    /// read-only share is reported separately from no share at all.
    pub async fn require_item_write(
        pool: &SqlitePool,
        actor: &str,
        list: &List,
    ) -> AppResult<()> {
        if list.owner_id == actor {
            return Ok(());
        }

        match ListShareRepository::find(pool, &list.id, actor).await? {
            Some(share) if share.can_edit => Ok(()),
            Some(_) => {
                tracing::warn!(
                    "Access denied: user {} holds a read-only share on list {}",
                    actor,
                    list.id
                );
                Err(AppError::InsufficientSharePermission)
            }
            None => {
                tracing::warn!(
                    "Access denied: user {} attempted to edit list {} without a share",
                    actor,
                    list.id
                );
                Err(AppError::NotShared)
            }
        }
    }

    /// Member management is reserved for the family owner.
    pub fn require_family_owner(actor: &str, family: &Family) -> AppResult<()> {
        if family.owner_id == actor {
            Ok(())
        } else {
            Err(AppError::NotFamilyOwner)
        }
    }

    pub async fn is_family_member(
        pool: &SqlitePool,
        family_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        Ok(FamilyMemberRepository::find(pool, family_id, user_id)
            .await?
            .is_some())
    }

    pub async fn require_family_member(
        pool: &SqlitePool,
        actor: &str,
        family: &Family,
    ) -> AppResult<()> {
        if Self::is_family_member(pool, &family.id, actor).await? {
            Ok(())
        } else {
            tracing::warn!(
                "Access denied: user {} is not a member of family {}",
                actor,
                family.id
            );
            Err(AppError::NotAMember)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_owned_by(owner: &str) -> List {
        let now = chrono::Utc::now().naive_utc();
        List {
            id: "list-1".to_string(),
            name: "Groceries".to_string(),
            owner_id: owner.to_string(),
            family_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn family_owned_by(owner: &str) -> Family {
        let now = chrono::Utc::now().naive_utc();
        Family {
            id: "family-1".to_string(),
            name: "Smiths".to_string(),
            owner_id: owner.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_manage_own_list() {
        let list = list_owned_by("u1");
        assert!(AccessService::require_list_owner("u1", &list).is_ok());
    }

    #[test]
    fn non_owner_may_not_manage_list() {
        let list = list_owned_by("u1");
        let err = AccessService::require_list_owner("u2", &list).unwrap_err();
        assert!(matches!(err, AppError::NotOwner));
    }

    #[test]
    fn only_family_owner_may_manage_members() {
        let family = family_owned_by("u1");
        assert!(AccessService::require_family_owner("u1", &family).is_ok());
        let err = AccessService::require_family_owner("u2", &family).unwrap_err();
        assert!(matches!(err, AppError::NotFamilyOwner));
    }
}
