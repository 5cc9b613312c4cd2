use sqlx::PgPool;
use storage::{
    dto::registration::{CreateRegistrationRequest, RegistrationFilter, RegistrationResponse},
    error::Result,
    repository::registration::RegistrationRepository,
    services::admission::{AdmissionError, NewRegistration},
};
use uuid::Uuid;

/// List registrations matching the filter
pub async fn list_registrations(
    pool: &PgPool,
    filter: &RegistrationFilter,
) -> Result<Vec<RegistrationResponse>> {
    let repo = RegistrationRepository::new(pool);
    repo.list(filter).await
}

/// Get one registration with its event, competition and skater
pub async fn get_registration(pool: &PgPool, id: Uuid) -> Result<RegistrationResponse> {
    let repo = RegistrationRepository::new(pool);
    repo.find_detail(id).await
}

/// Admit a skater into an event and return the enriched registration
pub async fn register(
    pool: &PgPool,
    request: &CreateRegistrationRequest,
) -> std::result::Result<RegistrationResponse, AdmissionError> {
    let repo = RegistrationRepository::new(pool);
    let new_registration = NewRegistration::from(request);

    let registration = repo.admit(&new_registration).await.inspect_err(|e| {
        if !matches!(e, AdmissionError::Storage(_)) {
            tracing::info!(
                event_id = %new_registration.event_id,
                skater_id = %new_registration.skater_id,
                "Registration rejected: {}",
                e
            );
        }
    })?;

    tracing::info!(
        registration_id = %registration.id,
        event_id = %registration.event_id,
        skater_id = %registration.skater_id,
        "Registration created"
    );

    Ok(registration)
}
