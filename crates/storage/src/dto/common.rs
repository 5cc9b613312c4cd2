use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Public identity of a user embedded in other responses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
}

pub(crate) fn validate_fee(fee: &Decimal) -> Result<(), validator::ValidationError> {
    if *fee < Decimal::ZERO {
        return Err(validator::ValidationError::new("negative_fee"));
    }

    Ok(())
}

/// Keeps an explicit `null` (`Some(None)`) apart from an absent field (`None`)
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_positive_fees_are_accepted() {
        assert!(validate_fee(&Decimal::ZERO).is_ok());
        assert!(validate_fee(&Decimal::new(7500, 2)).is_ok());
    }

    #[test]
    fn test_negative_fee_is_rejected() {
        let err = validate_fee(&Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(err.code, "negative_fee");
    }
}
