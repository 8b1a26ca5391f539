use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{Page, PropertyDto, SearchFilters};
use marketplace::listings;
use marketplace::search::{self, PUBLIC_PAGE_SIZE, Scope, SearchCriteria};
use tracing::{debug, info, instrument, trace};

use crate::error::ApiResult;
use crate::extract::{MaybeActor, RequireActor};
use crate::helpers::converters::{details_list_to_dto, details_to_dto, page_with};
use crate::helpers::multipart::read_property_submission;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PropertyMultipartForm};

/// Runs a public search and loads owners and images for the page.
pub(crate) async fn published_page(
    state: &AppState,
    filters: &SearchFilters,
) -> ApiResult<Page<PropertyDto>> {
    let criteria = SearchCriteria::from_filters(filters)?;
    let page = search::search(
        &state.db,
        &Scope::Published(criteria),
        filters.page.unwrap_or(1),
        PUBLIC_PAGE_SIZE,
    )
    .await?;
    let details = listings::with_details(&state.db, page.items.clone()).await?;
    Ok(page_with(page, details_list_to_dto(details, &state.settings)))
}

/// Browse published listings
#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    params(SearchFilters),
    responses(
        (status = 200, description = "Published listings, newest first, 12 per page", body = ApiResponse<Page<PropertyDto>>),
        (status = 400, description = "Invalid page number"),
        (status = 422, description = "Malformed numeric filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
    Valid(Query(filters)): Valid<Query<SearchFilters>>,
) -> ApiResult<Json<ApiResponse<Page<PropertyDto>>>> {
    trace!("Entering list_properties function");

    let page = published_page(&state, &filters).await?;
    debug!(
        "Returning {} of {} published listings",
        page.items.len(),
        page.total_count
    );
    Ok(Json(ApiResponse::ok(page, "Properties retrieved successfully")))
}

/// Show one listing
#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "properties",
    params(
        ("id" = i32, Path, description = "Listing ID"),
        ("x-user-id" = Option<i32>, Header, description = "Authenticated user"),
    ),
    responses(
        (status = 200, description = "Listing with owner and images", body = ApiResponse<PropertyDto>),
        (status = 403, description = "Listing is not published and the user is neither its owner nor an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_property(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<PropertyDto>>> {
    trace!("Entering get_property function for id: {}", id);

    let details = listings::view(&state.db, actor.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(
        details_to_dto(details, &state.settings),
        "Property retrieved successfully",
    )))
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    params(("x-user-id" = i32, Header, description = "Authenticated agent or admin")),
    request_body(content = PropertyMultipartForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<PropertyDto>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Clients cannot create listings", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn create_property(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<PropertyDto>>)> {
    trace!("Entering create_property function");

    let (form, uploads) = read_property_submission(multipart).await?;
    debug!("Creating listing with {} images", uploads.len());
    let details = listings::create(&state.db, &state.images, &actor, &form, uploads).await?;
    info!("Listing {} created by user {}", details.property.id, actor.id);

    let message = if details.property.is_published() {
        "Property listed successfully!"
    } else {
        "Property listed successfully! It will be published after admin approval."
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(details_to_dto(details, &state.settings), message)),
    ))
}

/// Load a listing for editing
#[utoipa::path(
    get,
    path = "/properties/{id}/edit",
    tag = "properties",
    params(
        ("id" = i32, Path, description = "Listing ID"),
        ("x-user-id" = i32, Header, description = "Owner agent or admin"),
    ),
    responses(
        (status = 200, description = "Listing to edit", body = ApiResponse<PropertyDto>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn edit_property(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<PropertyDto>>> {
    trace!("Entering edit_property function for id: {}", id);

    let details = listings::edit_form(&state.db, &actor, id).await?;
    Ok(Json(ApiResponse::ok(
        details_to_dto(details, &state.settings),
        "Property retrieved successfully",
    )))
}

/// Update a listing
///
/// Accepts the same fields as creation. New images are appended after the
/// existing ones. Only administrators may send `status`.
#[utoipa::path(
    post,
    path = "/properties/{id}/edit",
    tag = "properties",
    params(
        ("id" = i32, Path, description = "Listing ID"),
        ("x-user-id" = i32, Header, description = "Owner agent or admin"),
    ),
    request_body(content = PropertyMultipartForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<PropertyDto>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn update_property(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<Json<ApiResponse<PropertyDto>>> {
    trace!("Entering update_property function for id: {}", id);

    let (form, uploads) = read_property_submission(multipart).await?;
    let details = listings::update(&state.db, &state.images, &actor, id, &form, uploads).await?;
    info!("Listing {} updated by user {}", id, actor.id);

    Ok(Json(ApiResponse::ok(
        details_to_dto(details, &state.settings),
        "Property updated successfully.",
    )))
}

/// Delete a listing with its images
#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "properties",
    params(
        ("id" = i32, Path, description = "Listing ID"),
        ("x-user-id" = i32, Header, description = "Owner agent or admin"),
    ),
    responses(
        (status = 200, description = "Listing deleted; data is the deleted id", body = ApiResponse<i32>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_property(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<i32>>> {
    trace!("Entering delete_property function for id: {}", id);

    listings::delete(&state.db, &state.images, &actor, id).await?;
    Ok(Json(ApiResponse::ok(id, "Property deleted successfully.")))
}
