use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::PropertyDto;

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardStats {
    pub total_properties: u64,
    pub pending_properties: u64,
    pub published_properties: u64,
    pub archived_properties: u64,
    pub total_users: u64,
    pub agents: u64,
    pub clients: u64,
    pub admins: u64,
}

/// Admin dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AdminDashboard {
    pub stats: DashboardStats,
    /// The ten most recent listings, any status
    pub recent_properties: Vec<PropertyDto>,
}

/// Filters of the admin moderation list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams, Validate, PartialEq)]
#[into_params(parameter_in = Query)]
pub struct AdminPropertyFilters {
    /// Exact status
    pub status: Option<String>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    /// Page number, 1-indexed (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
}

/// Request body for a moderation decision.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `published`, `archived`
    pub status: String,
}
