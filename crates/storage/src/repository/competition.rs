use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::{ClubSummary, UserSummary};
use crate::dto::competition::{
    CompetitionDetailResponse, CompetitionFilter, CompetitionListItem, CreateCompetitionRequest,
    PUBLIC_STATUSES,
};
use crate::dto::event::EventFilter;
use crate::error::{Result, StorageError};
use crate::models::{Competition, Event};
use crate::repository::event::EventRepository;

const COMPETITION_COLUMNS: &str = r#"
    c.id, c.name, c.description, c.start_date, c.end_date, c.venue, c.address, c.status,
    c.entry_fee, c.max_entries, c.organizer_id, c.club_id, c.created_at, c.updated_at
"#;

const RETURNING_COLUMNS: &str = r#"
    RETURNING id, name, description, start_date, end_date, venue, address, status,
              entry_fee, max_entries, organizer_id, club_id, created_at, updated_at
"#;

#[derive(FromRow)]
struct CompetitionRow {
    #[sqlx(flatten)]
    competition: Competition,
    registration_count: i64,
    event_count: i64,
}

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List competitions with their events and counters, newest first
    pub async fn list(&self, filter: &CompetitionFilter) -> Result<Vec<CompetitionListItem>> {
        self.fetch_list(filter, None).await
    }

    /// Latest competitions, used by the organizer dashboard
    pub async fn list_recent(
        &self,
        organizer_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<CompetitionListItem>> {
        let filter = CompetitionFilter {
            organizer_id,
            ..Default::default()
        };
        self.fetch_list(&filter, Some(limit)).await
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT");
        query.push(COMPETITION_COLUMNS);
        query.push(" FROM competitions c WHERE c.id = ");
        query.push_bind(id);

        let competition = query
            .build_query_as::<Competition>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Get a competition with organizer, club, events and entries
    pub async fn find_detail(&self, id: Uuid) -> Result<CompetitionDetailResponse> {
        let competition = self.find_by_id(id).await?;

        let organizer = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users WHERE id = $1",
        )
        .bind(competition.organizer_id)
        .fetch_one(self.pool)
        .await?;

        let club = match competition.club_id {
            Some(club_id) => {
                sqlx::query_as::<_, ClubSummary>("SELECT id, name FROM clubs WHERE id = $1")
                    .bind(club_id)
                    .fetch_optional(self.pool)
                    .await?
            }
            None => None,
        };

        let events = EventRepository::new(self.pool)
            .list(&EventFilter {
                competition_id: Some(competition.id),
            })
            .await?;

        let registration_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE competition_id = $1")
                .bind(competition.id)
                .fetch_one(self.pool)
                .await?;

        Ok(CompetitionDetailResponse {
            organizer,
            club,
            registration_count,
            event_count: events.len() as i64,
            events,
            competition,
        })
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let sql = format!(
            r#"
            INSERT INTO competitions (
                id, name, description, start_date, end_date, venue, address, status,
                entry_fee, max_entries, organizer_id, club_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            {RETURNING_COLUMNS}
            "#
        );

        let competition = sqlx::query_as::<_, Competition>(&sql)
            .bind(Uuid::new_v4())
            .bind(&req.name)
            .bind(&req.description)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(&req.venue)
            .bind(&req.address)
            .bind(&req.status)
            .bind(req.entry_fee)
            .bind(req.max_entries)
            .bind(req.organizer_id)
            .bind(req.club_id)
            .fetch_one(self.pool)
            .await?;

        Ok(competition)
    }

    /// Store an updated competition
    pub async fn update(&self, competition: &Competition) -> Result<Competition> {
        let sql = format!(
            r#"
            UPDATE competitions
            SET
                name = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                venue = $6,
                address = $7,
                status = $8,
                entry_fee = $9,
                max_entries = $10,
                club_id = $11,
                updated_at = NOW()
            WHERE id = $1
            {RETURNING_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Competition>(&sql)
            .bind(competition.id)
            .bind(&competition.name)
            .bind(&competition.description)
            .bind(competition.start_date)
            .bind(competition.end_date)
            .bind(&competition.venue)
            .bind(&competition.address)
            .bind(&competition.status)
            .bind(competition.entry_fee)
            .bind(competition.max_entries)
            .bind(competition.club_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(updated)
    }

    /// Delete a competition; events and registrations go with it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competitions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn fetch_list(
        &self,
        filter: &CompetitionFilter,
        limit: Option<i64>,
    ) -> Result<Vec<CompetitionListItem>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT");
        query.push(COMPETITION_COLUMNS);
        query.push(
            r#",
            (SELECT COUNT(*) FROM registrations r WHERE r.competition_id = c.id) AS registration_count,
            (SELECT COUNT(*) FROM events e WHERE e.competition_id = c.id) AS event_count
            FROM competitions c
            WHERE 1=1
            "#,
        );

        if let Some(ref status) = filter.status {
            query.push(" AND c.status = ");
            query.push_bind(status.clone());
        }

        if filter.public {
            let statuses: Vec<String> = PUBLIC_STATUSES.iter().map(|s| s.to_string()).collect();
            query.push(" AND c.status = ANY(");
            query.push_bind(statuses);
            query.push(")");
        }

        if let Some(organizer_id) = filter.organizer_id {
            query.push(" AND c.organizer_id = ");
            query.push_bind(organizer_id);
        }

        query.push(" ORDER BY c.created_at DESC");

        if let Some(limit) = limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
        }

        let rows = query
            .build_query_as::<CompetitionRow>()
            .fetch_all(self.pool)
            .await?;

        let competition_ids: Vec<Uuid> = rows.iter().map(|row| row.competition.id).collect();

        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, competition_id, name, description, category, level, age_group,
                   entry_fee, max_entries, requirements, start_time, end_time, created_at
            FROM events
            WHERE competition_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&competition_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_competition: HashMap<Uuid, Vec<Event>> = HashMap::new();
        for event in events {
            by_competition
                .entry(event.competition_id)
                .or_default()
                .push(event);
        }

        Ok(rows
            .into_iter()
            .map(|row| CompetitionListItem {
                events: by_competition
                    .remove(&row.competition.id)
                    .unwrap_or_default(),
                registration_count: row.registration_count,
                event_count: row.event_count,
                competition: row.competition,
            })
            .collect())
    }
}
