use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::models::FamilyMember;
use crate::error::AppResult;
use crate::services::families::{FamilyOverview, FamilyService, FamilyWithMembers};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(my_families).post(create_family))
        .route(
            "/:family_id/members",
            get(list_members).post(add_member).delete(remove_member),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    #[serde(alias = "targetUserId")]
    pub target_user_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a family; the caller becomes its owner and first member
async fn create_family(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateFamilyRequest>,
) -> AppResult<Json<FamilyWithMembers>> {
    let family = FamilyService::create_family(&state.db, &user_id, &request.name).await?;
    Ok(Json(family))
}

/// Families the caller belongs to, with members and family-shared lists
async fn my_families(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<FamilyOverview>>> {
    let families = FamilyService::families_for(&state.db, &user_id).await?;
    Ok(Json(families))
}

/// Members of a family; the caller must be a member
async fn list_members(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(family_id): Path<String>,
) -> AppResult<Json<Vec<FamilyMember>>> {
    let members = FamilyService::members(&state.db, &user_id, &family_id).await?;
    Ok(Json(members))
}

/// Add a member; family owner only
async fn add_member(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(family_id): Path<String>,
    Json(request): Json<MemberRequest>,
) -> AppResult<Json<FamilyMember>> {
    let member =
        FamilyService::add_member(&state.db, &user_id, &family_id, &request.target_user_id).await?;
    Ok(Json(member))
}

/// Remove a member; family owner only, and the owner row is untouchable
async fn remove_member(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(family_id): Path<String>,
    Json(request): Json<MemberRequest>,
) -> AppResult<Json<serde_json::Value>> {
    FamilyService::remove_member(&state.db, &user_id, &family_id, &request.target_user_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testutil::{error_code, request, test_app, test_state, token_for};

    #[tokio::test]
    async fn creating_a_family_also_creates_the_owner_membership() {
        let app = test_app(test_state().await);
        let token = token_for("u1");

        let (status, body) = request(
            &app,
            "POST",
            "/api/families",
            Some(&token),
            Some(json!({ "name": "Smiths" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Smiths");
        assert_eq!(body["owner_id"], "u1");
        assert_eq!(body["members"].as_array().unwrap().len(), 1);
        assert_eq!(body["members"][0]["user_id"], "u1");
        assert_eq!(body["members"][0]["role"], "owner");
    }

    #[tokio::test]
    async fn adding_the_same_member_twice_conflicts() {
        let app = test_app(test_state().await);
        let token = token_for("u1");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&token),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let uri = format!("/api/families/{}/members", family["id"].as_str().unwrap());

        let (status, _) = request(
            &app,
            "POST",
            &uri,
            Some(&token),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = request(
            &app,
            "POST",
            &uri,
            Some(&token),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "ALREADY_MEMBER");
    }

    #[tokio::test]
    async fn only_the_owner_may_add_members() {
        let app = test_app(test_state().await);
        let owner = token_for("u1");
        let member = token_for("u2");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&owner),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let uri = format!("/api/families/{}/members", family["id"].as_str().unwrap());

        request(
            &app,
            "POST",
            &uri,
            Some(&owner),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;

        let (status, body) = request(
            &app,
            "POST",
            &uri,
            Some(&member),
            Some(json!({ "target_user_id": "u3" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_FAMILY_OWNER");
    }

    #[tokio::test]
    async fn the_owner_membership_cannot_be_removed() {
        let app = test_app(test_state().await);
        let token = token_for("u1");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&token),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let uri = format!("/api/families/{}/members", family["id"].as_str().unwrap());

        // Even the owner targeting themselves is rejected.
        let (status, body) = request(
            &app,
            "DELETE",
            &uri,
            Some(&token),
            Some(json!({ "target_user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "CANNOT_REMOVE_OWNER");
    }

    #[tokio::test]
    async fn removing_a_non_member_is_rejected() {
        let app = test_app(test_state().await);
        let token = token_for("u1");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&token),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let uri = format!("/api/families/{}/members", family["id"].as_str().unwrap());

        let (status, body) = request(
            &app,
            "DELETE",
            &uri,
            Some(&token),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_A_MEMBER");
    }

    #[tokio::test]
    async fn members_are_visible_to_members_only() {
        let app = test_app(test_state().await);
        let owner = token_for("u1");
        let outsider = token_for("u3");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&owner),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let uri = format!("/api/families/{}/members", family["id"].as_str().unwrap());

        request(
            &app,
            "POST",
            &uri,
            Some(&owner),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;

        let (status, members) = request(&app, "GET", &uri, Some(&token_for("u2")), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(members.as_array().unwrap().len(), 2);

        let (status, body) = request(&app, "GET", &uri, Some(&outsider), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_A_MEMBER");
    }

    #[tokio::test]
    async fn unknown_family_yields_not_found() {
        let app = test_app(test_state().await);
        let token = token_for("u1");

        let (status, body) = request(
            &app,
            "GET",
            "/api/families/missing/members",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn family_listing_includes_members_and_family_shared_lists() {
        let app = test_app(test_state().await);
        let owner = token_for("u1");

        let (_, family) = request(
            &app,
            "POST",
            "/api/families",
            Some(&owner),
            Some(json!({ "name": "Smiths" })),
        )
        .await;
        let family_id = family["id"].as_str().unwrap().to_string();

        request(
            &app,
            "POST",
            &format!("/api/families/{}/members", family_id),
            Some(&owner),
            Some(json!({ "target_user_id": "u2" })),
        )
        .await;

        let (_, list) = request(
            &app,
            "POST",
            "/api/lists",
            Some(&owner),
            Some(json!({ "name": "Party" })),
        )
        .await;
        request(
            &app,
            "POST",
            &format!("/api/lists/{}/share/family", list["id"].as_str().unwrap()),
            Some(&owner),
            Some(json!({ "family_id": family_id })),
        )
        .await;

        // The member sees the family, both members, and the shared list.
        let (status, families) =
            request(&app, "GET", "/api/families", Some(&token_for("u2")), None).await;
        assert_eq!(status, StatusCode::OK);

        let families = families.as_array().unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0]["id"], family_id.as_str());
        assert_eq!(families[0]["members"].as_array().unwrap().len(), 2);
        assert_eq!(families[0]["lists"].as_array().unwrap().len(), 1);
        assert_eq!(families[0]["lists"][0]["name"], "Party");
    }
}
