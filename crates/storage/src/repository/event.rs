use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::{CompetitionSummary, UserSummary};
use crate::dto::event::{CreateEventRequest, EventEntry, EventFilter, EventResponse};
use crate::error::{Result, StorageError};
use crate::models::Event;
use crate::services::admission::EventCapacity;

const EVENT_COLUMNS: &str = r#"
    e.id, e.competition_id, e.name, e.description, e.category, e.level, e.age_group,
    e.entry_fee, e.max_entries, e.requirements, e.start_time, e.end_time, e.created_at
"#;

#[derive(FromRow)]
struct EventRow {
    #[sqlx(flatten)]
    event: Event,
    competition_name: String,
    registration_count: i64,
}

#[derive(FromRow)]
struct EntryRow {
    id: Uuid,
    event_id: Uuid,
    notes: Option<String>,
    created_at: NaiveDateTime,
    skater_id: Uuid,
    skater_name: String,
    skater_email: String,
}

impl From<EntryRow> for EventEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            notes: row.notes,
            created_at: row.created_at,
            skater: UserSummary {
                id: row.skater_id,
                name: row.skater_name,
                email: row.skater_email,
            },
        }
    }
}

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List events with their competition and entries, newest first
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<EventResponse>> {
        let mut query = Self::detail_query();
        query.push(" WHERE 1=1");

        if let Some(competition_id) = filter.competition_id {
            query.push(" AND e.competition_id = ");
            query.push_bind(competition_id);
        }

        query.push(" ORDER BY e.created_at DESC");

        let rows = query
            .build_query_as::<EventRow>()
            .fetch_all(self.pool)
            .await?;

        self.attach_entries(rows).await
    }

    /// Get an event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Event> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT");
        query.push(EVENT_COLUMNS);
        query.push(" FROM events e WHERE e.id = ");
        query.push_bind(id);

        let event = query
            .build_query_as::<Event>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Get an event with its competition and entries
    pub async fn find_detail(&self, id: Uuid) -> Result<EventResponse> {
        let mut query = Self::detail_query();
        query.push(" WHERE e.id = ");
        query.push_bind(id);

        let row = query
            .build_query_as::<EventRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        self.attach_entries(vec![row])
            .await?
            .pop()
            .ok_or(StorageError::NotFound)
    }

    /// Create a new event
    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                id, competition_id, name, description, category, level, age_group,
                entry_fee, max_entries, requirements, start_time, end_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, competition_id, name, description, category, level, age_group,
                      entry_fee, max_entries, requirements, start_time, end_time, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.competition_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.category)
        .bind(&req.level)
        .bind(&req.age_group)
        .bind(req.entry_fee)
        .bind(req.max_entries)
        .bind(&req.requirements)
        .bind(req.start_time)
        .bind(req.end_time)
        .fetch_one(self.pool)
        .await?;

        Ok(event)
    }

    /// Store an updated event.
    ///
    /// The event row is locked while the registration count is checked, so a
    /// lowered `max_entries` can never end up below the number of entries.
    pub async fn update(&self, event: &Event) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(event.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        let registration_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event.id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(max_entries) = event.max_entries
            && i64::from(max_entries) < registration_count
        {
            return Err(StorageError::ConstraintViolation(format!(
                "Max entries cannot be lower than the {} existing registrations",
                registration_count
            )));
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                name = $2,
                description = $3,
                category = $4,
                level = $5,
                age_group = $6,
                entry_fee = $7,
                max_entries = $8,
                requirements = $9,
                start_time = $10,
                end_time = $11
            WHERE id = $1
            RETURNING id, competition_id, name, description, category, level, age_group,
                      entry_fee, max_entries, requirements, start_time, end_time, created_at
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.level)
        .bind(&event.age_group)
        .bind(event.entry_fee)
        .bind(event.max_entries)
        .bind(&event.requirements)
        .bind(event.start_time)
        .bind(event.end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete an event and its registrations
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    fn detail_query() -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT");
        query.push(EVENT_COLUMNS);
        query.push(
            r#",
            c.name AS competition_name,
            (SELECT COUNT(*) FROM registrations r WHERE r.event_id = e.id) AS registration_count
            FROM events e
            JOIN competitions c ON c.id = e.competition_id
            "#,
        );
        query
    }

    async fn attach_entries(&self, rows: Vec<EventRow>) -> Result<Vec<EventResponse>> {
        let event_ids: Vec<Uuid> = rows.iter().map(|row| row.event.id).collect();

        let entries = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT r.id, r.event_id, r.notes, r.created_at,
                   u.id AS skater_id, u.name AS skater_name, u.email AS skater_email
            FROM registrations r
            JOIN users u ON u.id = r.skater_id
            WHERE r.event_id = ANY($1)
            ORDER BY r.created_at
            "#,
        )
        .bind(&event_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_event: HashMap<Uuid, Vec<EventEntry>> = HashMap::new();
        for entry in entries {
            by_event.entry(entry.event_id).or_default().push(entry.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let capacity = EventCapacity {
                    competition_id: row.event.competition_id,
                    max_entries: row.event.max_entries,
                    registration_count: row.registration_count,
                };

                EventResponse {
                    competition: CompetitionSummary {
                        id: row.event.competition_id,
                        name: row.competition_name,
                    },
                    registration_count: row.registration_count,
                    spots_remaining: capacity.spots_remaining(),
                    registrations: by_event.remove(&row.event.id).unwrap_or_default(),
                    event: row.event,
                }
            })
            .collect())
    }
}
