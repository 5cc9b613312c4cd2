use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{CompetitionSummary, UserSummary};
use crate::services::admission::NewRegistration;

/// Request payload for registering a skater for an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,

    pub skater_id: Uuid,

    pub competition_id: Uuid,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RegistrationFilter {
    /// Matches registrations whose event belongs to this competition
    pub competition_id: Option<Uuid>,
    pub skater_id: Option<Uuid>,
}

/// Event details embedded in a registration
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationEvent {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub level: Option<String>,
    pub age_group: Option<String>,
    pub entry_fee: Decimal,
    pub competition: CompetitionSummary,
}

/// Registration enriched with its event, competition and skater
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub skater_id: Uuid,
    pub competition_id: Uuid,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub event: RegistrationEvent,
    pub skater: UserSummary,
}

impl From<&CreateRegistrationRequest> for NewRegistration {
    fn from(req: &CreateRegistrationRequest) -> Self {
        let notes = req
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        Self {
            event_id: req.event_id,
            skater_id: req.skater_id,
            competition_id: req.competition_id,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_are_optional() {
        let json = r#"{
            "eventId": "5d0c3f4e-1e6b-4a55-9a9d-1b9d7f3d2a01",
            "skaterId": "a3e2c1b0-7f4d-4c8e-9b1a-2c3d4e5f6a02",
            "competitionId": "0b6a3a0e-6a43-4df4-9a39-2d0a3b3f9c01"
        }"#;
        let req: CreateRegistrationRequest = serde_json::from_str(json).unwrap();

        assert!(req.notes.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_skater_is_a_parse_error() {
        let json = r#"{
            "eventId": "5d0c3f4e-1e6b-4a55-9a9d-1b9d7f3d2a01",
            "competitionId": "0b6a3a0e-6a43-4df4-9a39-2d0a3b3f9c01"
        }"#;

        assert!(serde_json::from_str::<CreateRegistrationRequest>(json).is_err());
    }

    #[test]
    fn test_overlong_notes_fail_validation() {
        let req = CreateRegistrationRequest {
            event_id: Uuid::new_v4(),
            skater_id: Uuid::new_v4(),
            competition_id: Uuid::new_v4(),
            notes: Some("x".repeat(1001)),
        };

        assert!(req.validate().unwrap_err().field_errors().contains_key("notes"));
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let req = CreateRegistrationRequest {
            event_id: Uuid::new_v4(),
            skater_id: Uuid::new_v4(),
            competition_id: Uuid::new_v4(),
            notes: Some("   ".to_string()),
        };
        let new = NewRegistration::from(&req);

        assert_eq!(new.event_id, req.event_id);
        assert!(new.notes.is_none());
    }
}
