use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const USER_ROLES: &[&str] = &["ORGANIZER", "SKATER", "COACH"];

/// Request payload for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(custom(function = "validate_role"))]
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// One of ORGANIZER, SKATER, COACH
    pub role: Option<String>,
}

impl UserFilter {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref role) = self.role
            && !USER_ROLES.contains(&role.as_str())
        {
            return Err(format!("role must be one of {}", USER_ROLES.join(", ")));
        }

        Ok(())
    }
}

fn default_role() -> String {
    "SKATER".to_string()
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if USER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_role"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_skater() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email":"emma@example.com","name":"Emma Wilson"}"#).unwrap();
        assert_eq!(req.role, "SKATER");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let req = CreateUserRequest {
            email: "judge@example.com".to_string(),
            name: "Judge".to_string(),
            role: "JUDGE".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_filter_rejects_lowercase_role() {
        let filter = UserFilter {
            role: Some("skater".to_string()),
        };
        assert!(filter.validate().is_err());
    }
}
