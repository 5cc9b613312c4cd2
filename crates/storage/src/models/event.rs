use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub level: Option<String>,
    pub age_group: Option<String>,
    pub entry_fee: Decimal,
    /// `None` means the event takes any number of entries
    pub max_entries: Option<i32>,
    pub requirements: Option<String>,
    pub start_time: Option<chrono::NaiveDateTime>,
    pub end_time: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
}
