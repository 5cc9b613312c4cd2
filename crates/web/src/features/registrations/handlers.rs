use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::registration::{CreateRegistrationRequest, RegistrationFilter, RegistrationResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Registrations, newest first", body = Vec<RegistrationResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(db): State<Database>,
    filter: Result<Query<RegistrationFilter>, QueryRejection>,
) -> Result<Json<Vec<RegistrationResponse>>, WebError> {
    let Query(filter) = filter?;

    let registrations = services::list_registrations(db.pool(), &filter).await?;

    Ok(Json(registrations))
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration found", body = RegistrationResponse),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn get_registration(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let registration = services::get_registration(db.pool(), id).await?;

    Ok(Json(registration).into_response())
}

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Skater registered", body = RegistrationResponse),
        (status = 400, description = "Invalid body, skater already registered, event full or event outside the competition"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "registrations"
)]
pub async fn create_registration(
    State(db): State<Database>,
    payload: Result<Json<CreateRegistrationRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let registration = services::register(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(registration)).into_response())
}
