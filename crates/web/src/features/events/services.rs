use sqlx::PgPool;
use storage::{
    dto::event::{CreateEventRequest, EventFilter, EventResponse},
    error::Result,
    models::Event,
    repository::event::EventRepository,
};
use uuid::Uuid;

pub async fn list_events(pool: &PgPool, filter: &EventFilter) -> Result<Vec<EventResponse>> {
    let repo = EventRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(id).await
}

/// Get event with competition summary, entries and remaining spots
pub async fn get_event_detailed(pool: &PgPool, id: Uuid) -> Result<EventResponse> {
    let repo = EventRepository::new(pool);
    repo.find_detail(id).await
}

pub async fn create_event(pool: &PgPool, request: &CreateEventRequest) -> Result<EventResponse> {
    let repo = EventRepository::new(pool);
    let event = repo.create(request).await?;

    tracing::info!(
        event_id = %event.id,
        competition_id = %event.competition_id,
        max_entries = ?event.max_entries,
        "Event created"
    );

    repo.find_detail(event.id).await
}

/// Store an event already merged with the requested changes
pub async fn update_event(pool: &PgPool, event: &Event) -> Result<EventResponse> {
    let repo = EventRepository::new(pool);
    let updated = repo.update(event).await?;
    repo.find_detail(updated.id).await
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.delete(id).await?;

    tracing::info!(event_id = %id, "Event deleted");

    Ok(())
}
