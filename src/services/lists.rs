use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::models::{Item, List};
use crate::db::{ItemRepository, ListRepository, ListShareRepository};
use crate::error::{AppError, AppResult};
use crate::services::access::AccessService;

// ============================================================================
// List Service
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ListWithItems {
    #[serde(flatten)]
    pub list: List,
    pub items: Vec<Item>,
}

pub struct ListService;

impl ListService {
    pub async fn create_list(
        pool: &SqlitePool,
        owner_id: &str,
        name: &str,
    ) -> AppResult<ListWithItems> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("List name is required".to_string()));
        }

        let list = ListRepository::create(pool, owner_id, name).await?;

        Ok(ListWithItems {
            list,
            items: Vec::new(),
        })
    }

    pub async fn lists_for(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<ListWithItems>> {
        let lists = ListRepository::list_by_owner(pool, owner_id).await?;

        let mut out = Vec::with_capacity(lists.len());
        for list in lists {
            let items = ItemRepository::list_by_list(pool, &list.id).await?;
            out.push(ListWithItems { list, items });
        }

        Ok(out)
    }

    pub async fn get_list(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
    ) -> AppResult<ListWithItems> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_read(pool, actor, &list).await?;

        let items = ItemRepository::list_by_list(pool, list_id).await?;

        Ok(ListWithItems { list, items })
    }

    /// Delete a list together with its shares and items, children before
    /// parent, in one transaction so a concurrent reader never observes a
    /// half-deleted list.
    pub async fn delete_list(pool: &SqlitePool, actor: &str, list_id: &str) -> AppResult<()> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_list_owner(actor, &list)?;

        let mut tx = pool.begin().await.map_err(AppError::Database)?;

        let shares = ListShareRepository::delete_by_list(&mut *tx, list_id).await?;
        let items = ItemRepository::delete_by_list(&mut *tx, list_id).await?;
        ListRepository::delete(&mut *tx, list_id).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Deleted list {} ({} items, {} shares)",
            list_id,
            items,
            shares
        );

        Ok(())
    }

    pub async fn add_item(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
        name: &str,
        estimated_price: Option<f64>,
        quantity: Option<i64>,
    ) -> AppResult<Item> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_item_write(pool, actor, &list).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Item name is required".to_string()));
        }

        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(AppError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        if let Some(price) = estimated_price {
            if price < 0.0 || !price.is_finite() {
                return Err(AppError::Validation(
                    "Estimated price must be a non-negative number".to_string(),
                ));
            }
        }

        ItemRepository::create(pool, list_id, name, estimated_price, quantity).await
    }

    pub async fn set_item_completed(
        pool: &SqlitePool,
        actor: &str,
        list_id: &str,
        item_id: &str,
        completed: bool,
    ) -> AppResult<Item> {
        let list = ListRepository::find_by_id(pool, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;

        AccessService::require_item_write(pool, actor, &list).await?;

        let item = ItemRepository::find_by_id(pool, item_id)
            .await?
            .filter(|item| item.list_id == list_id)
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        ItemRepository::set_completed(pool, &item.id, completed).await
    }
}
