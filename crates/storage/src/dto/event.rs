use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{CompetitionSummary, UserSummary, nullable, validate_fee};
use crate::models::Event;

/// Request payload for adding an event to a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub competition_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Event name is required"))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(max = 100))]
    pub level: Option<String>,

    #[validate(length(max = 100))]
    pub age_group: Option<String>,

    #[validate(custom(function = "validate_fee"))]
    pub entry_fee: Decimal,

    #[validate(range(min = 1, message = "Max entries must be at least 1"))]
    pub max_entries: Option<i32>,

    #[validate(length(max = 5000))]
    pub requirements: Option<String>,

    pub start_time: Option<NaiveDateTime>,

    pub end_time: Option<NaiveDateTime>,
}

/// Request payload for updating an event
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    #[validate(length(max = 100))]
    pub level: Option<String>,

    #[validate(length(max = 100))]
    pub age_group: Option<String>,

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

    #[validate(length(max = 5000))]
    pub requirements: Option<String>,

    pub start_time: Option<NaiveDateTime>,

    pub end_time: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    pub competition_id: Option<Uuid>,
}

/// A skater's entry as listed under an event
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub id: Uuid,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub skater: UserSummary,
}

/// Event with its competition, entries and remaining capacity
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(flatten)]
    pub event: Event,
    pub competition: CompetitionSummary,
    pub registration_count: i64,
    /// `None` when the event has no entry limit
    pub spots_remaining: Option<i64>,
    pub registrations: Vec<EventEntry>,
}

fn check_time_range(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(), &'static str> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err("End time must be on or after start time");
    }

    Ok(())
}

impl CreateEventRequest {
    pub fn validate_times(&self) -> Result<(), &'static str> {
        check_time_range(self.start_time, self.end_time)
    }
}

impl UpdateEventRequest {
    /// Apply the update on top of the stored event
    pub fn merge_into(&self, mut event: Event) -> Result<Event, &'static str> {
        if let Some(ref name) = self.name {
            event.name = name.clone();
        }
        if self.description.is_some() {
            event.description = self.description.clone();
        }
        if let Some(ref category) = self.category {
            event.category = category.clone();
        }
        if self.level.is_some() {
            event.level = self.level.clone();
        }
        if self.age_group.is_some() {
            event.age_group = self.age_group.clone();
        }
        if let Some(entry_fee) = self.entry_fee {
            event.entry_fee = entry_fee;
        }
        if let Some(max_entries) = self.max_entries {
            event.max_entries = max_entries;
        }
        if self.requirements.is_some() {
            event.requirements = self.requirements.clone();
        }
        if self.start_time.is_some() {
            event.start_time = self.start_time;
        }
        if self.end_time.is_some() {
            event.end_time = self.end_time;
        }

        check_time_range(event.start_time, event.end_time)?;

        Ok(event)
    }
}
