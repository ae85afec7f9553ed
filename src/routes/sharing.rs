use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::models::ListShare;
use crate::error::AppResult;
use crate::services::sharing::{FamilyShareReport, SharedList, ShareService};
use crate::AppState;

/// Share endpoints; nested under the same prefix as the list routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shared", get(shared_with_me))
        .route(
            "/:list_id/share",
            get(list_shares).post(share_with_user).delete(remove_share),
        )
        .route("/:list_id/share/family", post(share_with_family))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    #[serde(alias = "targetUserId")]
    pub target_user_id: String,
    #[serde(alias = "canEdit")]
    pub can_edit: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct FamilyShareRequest {
    #[serde(alias = "familyId")]
    pub family_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveShareRequest {
    #[serde(alias = "targetUserId")]
    pub target_user_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Grant or refresh a share; owner only. Sharing twice updates the existing
/// row instead of erroring.
async fn share_with_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
    Json(request): Json<ShareRequest>,
) -> AppResult<Json<ListShare>> {
    let share = ShareService::share_with_user(
        &state.db,
        &user_id,
        &list_id,
        &request.target_user_id,
        request.can_edit.unwrap_or(true),
    )
    .await?;
    Ok(Json(share))
}

/// Share a list with every member of a family; returns the cascade report
async fn share_with_family(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
    Json(request): Json<FamilyShareRequest>,
) -> AppResult<Json<FamilyShareReport>> {
    let report =
        ShareService::share_with_family(&state.db, &user_id, &list_id, &request.family_id).await?;
    Ok(Json(report))
}

/// All shares on a list; owner only
async fn list_shares(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
) -> AppResult<Json<Vec<ListShare>>> {
    let shares = ShareService::shares_for_list(&state.db, &user_id, &list_id).await?;
    Ok(Json(shares))
}

/// Lists shared with the caller, annotated with share id and edit flag
async fn shared_with_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<SharedList>>> {
    let lists = ShareService::shared_with_me(&state.db, &user_id).await?;
    Ok(Json(lists))
}

/// Revoke a share; owner only. Revoking an absent share succeeds quietly.
async fn remove_share(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(list_id): Path<String>,
    Json(request): Json<RemoveShareRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ShareService::revoke(&state.db, &user_id, &list_id, &request.target_user_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
