use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::models::Item;
use crate::error::AppResult;
use crate::services::lists::{ListService, ListWithItems};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(my_lists).post(create_list))
        .route("/:list_id", get(get_list).delete(delete_list))
        .route("/:list_id/items", post(add_item).patch(update_item))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    #[serde(alias = "estimatedPrice")]
    pub estimated_price: Option<f64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(alias = "itemId")]
    pub item_id: String,
    pub completed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a list owned by the caller
async fn create_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateListRequest>,
) -> AppResult<Json<ListWithItems>> {
    let list = ListService::create_list(&state.db, &user_id, &request.name).await?;
    Ok(Json(list))
}

/// Lists owned by the caller, items included
async fn my_lists(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ListWithItems>>> {
    let lists = ListService::lists_for(&state.db, &user_id).await?;
    Ok(Json(lists))
}

/// Fetch a single list; the caller must own it or hold a share
async fn get_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
) -> AppResult<Json<ListWithItems>> {
    let list = ListService::get_list(&state.db, &user_id, &list_id).await?;
    Ok(Json(list))
}

/// Delete a list with its items and shares; owner only
async fn delete_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    ListService::delete_list(&state.db, &user_id, &list_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Add an item; requires an edit-capable share or ownership
async fn add_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> AppResult<Json<Item>> {
    let item = ListService::add_item(
        &state.db,
        &user_id,
        &list_id,
        &request.name,
        request.estimated_price,
        request.quantity,
    )
    .await?;
    Ok(Json(item))
}

/// Toggle an item's completion flag; requires an edit-capable share or ownership
async fn update_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
    Json(request): Json<UpdateItemRequest>,
) -> AppResult<Json<Item>> {
    let item = ListService::set_item_completed(
        &state.db,
        &user_id,
        &list_id,
        &request.item_id,
        request.completed,
    )
    .await?;
    Ok(Json(item))
}
