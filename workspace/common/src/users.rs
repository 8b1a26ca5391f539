use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// User row of the admin user list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// One of `client`, `agent`, `admin`
    pub role: String,
    /// Number of listings owned by the user
    pub properties_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Filters of the admin user list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams, Validate, PartialEq)]
#[into_params(parameter_in = Query)]
pub struct AdminUserFilters {
    /// Exact role
    pub role: Option<String>,
    /// Substring of the name or the email
    pub search: Option<String>,
    /// Page number, 1-indexed (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
}

/// Request body for changing a user's role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpdateRoleRequest {
    /// One of `client`, `agent`, `admin`
    pub role: String,
}
