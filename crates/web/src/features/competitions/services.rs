use sqlx::PgPool;
use storage::{
    dto::competition::{
        CompetitionDetailResponse, CompetitionFilter, CompetitionListItem,
        CreateCompetitionRequest,
    },
    error::Result,
    models::Competition,
    repository::competition::CompetitionRepository,
};
use uuid::Uuid;

/// List competitions matching the filter
pub async fn list_competitions(
    pool: &PgPool,
    filter: &CompetitionFilter,
) -> Result<Vec<CompetitionListItem>> {
    let repo = CompetitionRepository::new(pool);
    repo.list(filter).await
}

/// Get the stored competition record
pub async fn get_competition(pool: &PgPool, id: Uuid) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Get competition with organizer, club and events
pub async fn get_competition_detailed(
    pool: &PgPool,
    id: Uuid,
) -> Result<CompetitionDetailResponse> {
    let repo = CompetitionRepository::new(pool);
    repo.find_detail(id).await
}

/// Create a new competition
pub async fn create_competition(
    pool: &PgPool,
    request: &CreateCompetitionRequest,
) -> Result<CompetitionDetailResponse> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.create(request).await?;

    tracing::info!(
        competition_id = %competition.id,
        organizer_id = %competition.organizer_id,
        "Competition created"
    );

    repo.find_detail(competition.id).await
}

/// Store a competition already merged with the requested changes
pub async fn update_competition(
    pool: &PgPool,
    competition: &Competition,
) -> Result<CompetitionDetailResponse> {
    let repo = CompetitionRepository::new(pool);
    let updated = repo.update(competition).await?;
    repo.find_detail(updated.id).await
}

/// Delete a competition
pub async fn delete_competition(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = CompetitionRepository::new(pool);
    repo.delete(id).await?;

    tracing::info!(competition_id = %id, "Competition deleted");

    Ok(())
}
