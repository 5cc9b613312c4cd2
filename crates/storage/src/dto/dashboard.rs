use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::competition::CompetitionListItem;
use super::registration::RegistrationResponse;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardFilter {
    /// Restrict every figure to competitions run by this organizer
    pub organizer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_competitions: i64,
    pub total_registrations: i64,
    pub revenue: Decimal,
    pub upcoming_events: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_competitions: Vec<CompetitionListItem>,
    pub recent_registrations: Vec<RegistrationResponse>,
}
