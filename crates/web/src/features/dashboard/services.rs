use sqlx::PgPool;
use storage::{
    dto::dashboard::DashboardResponse,
    error::Result,
    repository::{
        competition::CompetitionRepository, dashboard::DashboardRepository,
        registration::RegistrationRepository,
    },
};
use uuid::Uuid;

const RECENT_LIMIT: i64 = 5;

/// Organizer overview: headline figures plus the latest competitions and entries
pub async fn get_dashboard(pool: &PgPool, organizer_id: Option<Uuid>) -> Result<DashboardResponse> {
    let stats = DashboardRepository::new(pool).stats(organizer_id).await?;
    let recent_competitions = CompetitionRepository::new(pool)
        .list_recent(organizer_id, RECENT_LIMIT)
        .await?;
    let recent_registrations = RegistrationRepository::new(pool)
        .list_recent(organizer_id, RECENT_LIMIT)
        .await?;

    Ok(DashboardResponse {
        stats,
        recent_competitions,
        recent_registrations,
    })
}
