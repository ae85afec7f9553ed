use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// List Share Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ListShare {
    pub id: String,
    pub list_id: String,
    /// The user the list is shared with. Never the list owner.
    pub user_id: String,
    /// Read access is implied by the row's existence; writes require this flag.
    pub can_edit: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
