use crate::handlers::{
    admin::{dashboard, delete_user, list_users, update_property_status, update_user_role},
    health::health_check,
    home::home,
    properties::{
        create_property, delete_property, edit_property, get_property, list_properties,
        update_property,
    },
};
use crate::helpers::multipart::MAX_SUBMISSION_BYTES;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let storage = ServeDir::new(&state.settings.storage_root);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public browsing
        .route("/", get(home))
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/:id",
            get(get_property).post(update_property).delete(delete_property),
        )
        // Listing management
        .route("/properties/:id/edit", get(edit_property).post(update_property))
        // Administration
        .route("/admin", get(dashboard))
        .route("/admin/properties", get(crate::handlers::admin::list_properties))
        .route("/admin/properties/:id", patch(update_property_status))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", patch(update_user_role).delete(delete_user))
        // Uploaded images
        .nest_service("/storage", storage)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
