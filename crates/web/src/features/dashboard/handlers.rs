use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use storage::{
    Database,
    dto::dashboard::{DashboardFilter, DashboardResponse},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardFilter),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard figures with recent competitions and registrations", body = DashboardResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(db): State<Database>,
    filter: Result<Query<DashboardFilter>, QueryRejection>,
) -> Result<Json<DashboardResponse>, WebError> {
    let Query(filter) = filter?;

    let dashboard = services::get_dashboard(db.pool(), filter.organizer_id).await?;

    Ok(Json(dashboard))
}
