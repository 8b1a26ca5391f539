use common::{
    AdminDashboard, AdminPropertyFilters, AdminUserFilters, DashboardStats, HomePage, OwnerDto,
    Page, PropertyDto, PropertyImageDto, SearchFilters, UpdateRoleRequest, UpdateStatusRequest,
    UserDto,
};
use marketplace::ImageStore;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Storage for listing images
    pub images: ImageStore,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, images: ImageStore, settings: Settings) -> Self {
        Self {
            db,
            images,
            settings: Arc::new(settings),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Field-scoped messages, present on validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Multipart body of listing create and update requests
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PropertyMultipartForm {
    pub title: String,
    pub description: String,
    /// Decimal, at least 0
    pub price: String,
    /// Whole square meters, at least 1
    pub surface_area: i32,
    /// 0 to 20
    pub bedrooms: i32,
    pub city: String,
    pub neighborhood: String,
    /// Administrators only
    pub status: Option<String>,
    /// Up to 10 JPEG, PNG or WebP files of at most 2MB each
    #[schema(value_type = Vec<String>)]
    pub images: Vec<Vec<u8>>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::home::home,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::get_property,
        crate::handlers::properties::create_property,
        crate::handlers::properties::edit_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,
        crate::handlers::admin::dashboard,
        crate::handlers::admin::list_properties,
        crate::handlers::admin::update_property_status,
        crate::handlers::admin::list_users,
        crate::handlers::admin::update_user_role,
        crate::handlers::admin::delete_user,
    ),
    components(
        schemas(
            ApiResponse<PropertyDto>,
            ApiResponse<Page<PropertyDto>>,
            ApiResponse<HomePage>,
            ApiResponse<AdminDashboard>,
            ApiResponse<Page<UserDto>>,
            ApiResponse<UserDto>,
            ErrorResponse,
            HealthResponse,
            PropertyMultipartForm,
            PropertyDto,
            PropertyImageDto,
            OwnerDto,
            UserDto,
            DashboardStats,
            AdminDashboard,
            HomePage,
            SearchFilters,
            AdminPropertyFilters,
            AdminUserFilters,
            UpdateStatusRequest,
            UpdateRoleRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "properties", description = "Public browsing and agent listing management"),
        (name = "admin", description = "Moderation, dashboard and user management"),
    ),
    info(
        title = "ImmoRust API",
        description = "Real-estate listing marketplace: agents publish listings, clients browse them and administrators moderate",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
