use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    /// The creating user. Ownership never changes after creation.
    pub owner_id: String,
    /// Set when the list has been shared with a family as a whole.
    pub family_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
