use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{ClubSummary, UserSummary, nullable, validate_fee};
use super::event::EventResponse;
use crate::models::{Competition, Event};

pub const COMPETITION_STATUSES: &[&str] = &[
    "DRAFT",
    "PUBLISHED",
    "REGISTRATION_OPEN",
    "ACTIVE",
    "COMPLETED",
    "CANCELLED",
];

/// Statuses shown on the public listing page
pub const PUBLIC_STATUSES: &[&str] = &["PUBLISHED", "REGISTRATION_OPEN"];

/// Statuses counted as running on the organizer dashboard
pub const ACTIVE_STATUSES: &[&str] = &["PUBLISHED", "REGISTRATION_OPEN", "ACTIVE"];

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Venue must be between 1 and 255 characters"
    ))]
    pub venue: String,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom(function = "validate_status"))]
    #[serde(default = "default_status")]
    pub status: String,

    #[validate(custom(function = "validate_fee"))]
    #[serde(default)]
    pub entry_fee: Decimal,

    #[validate(range(min = 1, message = "Max entries must be at least 1"))]
    pub max_entries: Option<i32>,

    pub organizer_id: Uuid,

    pub club_id: Option<Uuid>,
}

/// Request payload for updating an existing competition
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 255))]
    pub venue: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_fee"))]
    pub entry_fee: Option<Decimal>,

    /// `null` removes the entry limit
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    #[validate(range(min = 1, message = "Max entries must be at least 1"))]
    pub max_entries: Option<Option<i32>>,

    pub club_id: Option<Uuid>,
}

/// Query parameters for listing competitions
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CompetitionFilter {
    pub status: Option<String>,
    pub organizer_id: Option<Uuid>,
    /// Only competitions visible on the public listing page
    #[serde(default)]
    pub public: bool,
}

/// Competition as shown in listings, with its events and counters
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionListItem {
    #[serde(flatten)]
    pub competition: Competition,
    pub events: Vec<Event>,
    pub registration_count: i64,
    pub event_count: i64,
}

/// Competition with organizer, club and events including their entries
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDetailResponse {
    #[serde(flatten)]
    pub competition: Competition,
    pub organizer: UserSummary,
    pub club: Option<ClubSummary>,
    pub events: Vec<EventResponse>,
    pub registration_count: i64,
    pub event_count: i64,
}

fn default_status() -> String {
    "DRAFT".to_string()
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if COMPETITION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_status"))
    }
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if end < start {
        return Err("End date must be on or after start date");
    }

    Ok(())
}

impl CreateCompetitionRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        check_date_range(self.start_date, self.end_date)
    }
}

impl UpdateCompetitionRequest {
    /// Apply the update on top of the stored competition
    pub fn merge_into(&self, mut competition: Competition) -> Result<Competition, &'static str> {
        if let Some(ref name) = self.name {
            competition.name = name.clone();
        }
        if self.description.is_some() {
            competition.description = self.description.clone();
        }
        if let Some(start_date) = self.start_date {
            competition.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            competition.end_date = end_date;
        }
        if let Some(ref venue) = self.venue {
            competition.venue = venue.clone();
        }
        if self.address.is_some() {
            competition.address = self.address.clone();
        }
        if let Some(ref status) = self.status {
            competition.status = status.clone();
        }
        if let Some(entry_fee) = self.entry_fee {
            competition.entry_fee = entry_fee;
        }
        if let Some(max_entries) = self.max_entries {
            competition.max_entries = max_entries;
        }
        if self.club_id.is_some() {
            competition.club_id = self.club_id;
        }

        check_date_range(competition.start_date, competition.end_date)?;

        Ok(competition)
    }
}

impl CompetitionFilter {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref status) = self.status
            && !COMPETITION_STATUSES.contains(&status.as_str())
        {
            return Err(format!(
                "status must be one of {}",
                COMPETITION_STATUSES.join(", ")
            ));
        }

        Ok(())
    }
}
