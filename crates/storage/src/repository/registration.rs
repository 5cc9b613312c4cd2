use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::{CompetitionSummary, UserSummary};
use crate::dto::registration::{RegistrationEvent, RegistrationFilter, RegistrationResponse};
use crate::error::{Result, StorageError};
use crate::models::Registration;
use crate::services::admission::{
    self, AdmissionError, AdmissionStore, EventCapacity, NewRegistration,
};

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.event_id, r.skater_id, r.competition_id, r.notes, r.created_at,
           e.name AS event_name, e.category AS event_category, e.level AS event_level,
           e.age_group AS event_age_group, e.entry_fee AS event_entry_fee,
           c.id AS event_competition_id, c.name AS competition_name,
           u.name AS skater_name, u.email AS skater_email
    FROM registrations r
    JOIN events e ON e.id = r.event_id
    JOIN competitions c ON c.id = e.competition_id
    JOIN users u ON u.id = r.skater_id
"#;

#[derive(FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    skater_id: Uuid,
    competition_id: Uuid,
    notes: Option<String>,
    created_at: NaiveDateTime,
    event_name: String,
    event_category: String,
    event_level: Option<String>,
    event_age_group: Option<String>,
    event_entry_fee: Decimal,
    event_competition_id: Uuid,
    competition_name: String,
    skater_name: String,
    skater_email: String,
}

impl From<RegistrationRow> for RegistrationResponse {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            skater_id: row.skater_id,
            competition_id: row.competition_id,
            notes: row.notes,
            created_at: row.created_at,
            event: RegistrationEvent {
                id: row.event_id,
                name: row.event_name,
                category: row.event_category,
                level: row.event_level,
                age_group: row.event_age_group,
                entry_fee: row.event_entry_fee,
                competition: CompetitionSummary {
                    id: row.event_competition_id,
                    name: row.competition_name,
                },
            },
            skater: UserSummary {
                id: row.skater_id,
                name: row.skater_name,
                email: row.skater_email,
            },
        }
    }
}

/// Repository for Registration database operations
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List registrations, newest first
    pub async fn list(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationResponse>> {
        let mut query = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        query.push(" WHERE 1=1");

        if let Some(competition_id) = filter.competition_id {
            query.push(" AND e.competition_id = ");
            query.push_bind(competition_id);
        }

        if let Some(skater_id) = filter.skater_id {
            query.push(" AND r.skater_id = ");
            query.push_bind(skater_id);
        }

        query.push(" ORDER BY r.created_at DESC");

        let rows = query
            .build_query_as::<RegistrationRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(RegistrationResponse::from).collect())
    }

    /// Latest registrations, optionally only for one organizer's competitions
    pub async fn list_recent(
        &self,
        organizer_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<RegistrationResponse>> {
        let mut query = QueryBuilder::<Postgres>::new(DETAIL_SELECT);

        if let Some(organizer_id) = organizer_id {
            query.push(" WHERE c.organizer_id = ");
            query.push_bind(organizer_id);
        }

        query.push(" ORDER BY r.created_at DESC LIMIT ");
        query.push_bind(limit);

        let rows = query
            .build_query_as::<RegistrationRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(RegistrationResponse::from).collect())
    }

    /// Get a registration with its event, competition and skater
    pub async fn find_detail(&self, id: Uuid) -> Result<RegistrationResponse> {
        fetch_detail(self.pool, id).await
    }

    /// Run the admission check, insert the registration and read it back
    /// enriched, all in one transaction
    pub async fn admit(
        &self,
        request: &NewRegistration,
    ) -> std::result::Result<RegistrationResponse, AdmissionError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let registration = {
            let mut store = PgAdmissionStore::new(&mut *tx);
            admission::admit(&mut store, request).await?
        };

        let detail = fetch_detail(&mut *tx, registration.id).await?;

        tx.commit().await.map_err(StorageError::from)?;

        Ok(detail)
    }
}

async fn fetch_detail<'e, E>(executor: E, id: Uuid) -> Result<RegistrationResponse>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut query = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
    query.push(" WHERE r.id = ");
    query.push_bind(id);

    let row = query
        .build_query_as::<RegistrationRow>()
        .fetch_optional(executor)
        .await?
        .ok_or(StorageError::NotFound)?;

    Ok(row.into())
}

/// Admission store bound to an open transaction
pub struct PgAdmissionStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgAdmissionStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl AdmissionStore for PgAdmissionStore<'_> {
    async fn find_registration(
        &mut self,
        event_id: Uuid,
        skater_id: Uuid,
    ) -> Result<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, event_id, skater_id, competition_id, notes, created_at
            FROM registrations
            WHERE event_id = $1 AND skater_id = $2
            "#,
        )
        .bind(event_id)
        .bind(skater_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(registration)
    }

    async fn event_capacity(&mut self, event_id: Uuid) -> Result<Option<EventCapacity>> {
        // The row lock is held until commit, so admissions to one event
        // take turns between here and the insert.
        let event = sqlx::query_as::<_, (Uuid, Option<i32>)>(
            r#"
            SELECT competition_id, max_entries
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some((competition_id, max_entries)) = event else {
            return Ok(None);
        };

        // Separate statement: its snapshot is taken after the lock is granted.
        let registration_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM registrations
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Some(EventCapacity {
            competition_id,
            max_entries,
            registration_count,
        }))
    }

    async fn insert_registration(&mut self, registration: &NewRegistration) -> Result<Registration> {
        let created = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (id, event_id, skater_id, competition_id, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, skater_id, competition_id, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(registration.event_id)
        .bind(registration.skater_id)
        .bind(registration.competition_id)
        .bind(&registration.notes)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            StorageError::on_unique_violation(e, "Skater is already registered for this event")
        })?;

        Ok(created)
    }
}
