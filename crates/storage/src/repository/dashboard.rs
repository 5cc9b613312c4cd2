use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::competition::ACTIVE_STATUSES;
use crate::dto::dashboard::DashboardStats;
use crate::error::Result;

pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Headline figures, scoped to one organizer when given.
    ///
    /// Revenue is the event entry fee summed over registrations; upcoming
    /// events belong to competitions that have not ended yet.
    pub async fn stats(&self, organizer_id: Option<Uuid>) -> Result<DashboardStats> {
        let active_statuses: Vec<String> = ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect();

        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*)
                 FROM competitions c
                 WHERE c.status = ANY($1)
                   AND ($2::uuid IS NULL OR c.organizer_id = $2)) AS active_competitions,
                (SELECT COUNT(*)
                 FROM registrations r
                 JOIN competitions c ON c.id = r.competition_id
                 WHERE $2::uuid IS NULL OR c.organizer_id = $2) AS total_registrations,
                (SELECT COALESCE(SUM(e.entry_fee), 0)
                 FROM registrations r
                 JOIN events e ON e.id = r.event_id
                 JOIN competitions c ON c.id = e.competition_id
                 WHERE $2::uuid IS NULL OR c.organizer_id = $2) AS revenue,
                (SELECT COUNT(*)
                 FROM events e
                 JOIN competitions c ON c.id = e.competition_id
                 WHERE c.end_date >= CURRENT_DATE
                   AND ($2::uuid IS NULL OR c.organizer_id = $2)) AS upcoming_events
            "#,
        )
        .bind(active_statuses)
        .bind(organizer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }
}
