use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::{
    AdminDashboard, AdminPropertyFilters, AdminUserFilters, Page, PropertyDto, UpdateRoleRequest,
    UpdateStatusRequest, UserDto,
};
use marketplace::search::{self, ADMIN_PAGE_SIZE, DASHBOARD_RECENT_COUNT, Scope};
use marketplace::{MarketplaceError, dashboard, listings, moderation, policy, users};
use tracing::{debug, info, instrument, trace};

use crate::error::ApiResult;
use crate::extract::RequireActor;
use crate::helpers::converters::{details_list_to_dto, details_to_dto, page_with, summary_to_dto, user_to_dto};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Admin dashboard: counts plus the ten most recent listings of any status
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    params(("x-user-id" = i32, Header, description = "Authenticated admin")),
    responses(
        (status = 200, description = "Dashboard statistics", body = ApiResponse<AdminDashboard>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> ApiResult<Json<ApiResponse<AdminDashboard>>> {
    trace!("Entering dashboard function");

    let stats = dashboard::stats(&state.db, &actor).await?;
    let recent = search::recent(&state.db, DASHBOARD_RECENT_COUNT).await?;
    let recent_properties =
        details_list_to_dto(listings::with_details(&state.db, recent).await?, &state.settings);

    Ok(Json(ApiResponse::ok(
        AdminDashboard {
            stats,
            recent_properties,
        },
        "Dashboard retrieved successfully",
    )))
}

/// Moderation list: listings of any status, 20 per page
#[utoipa::path(
    get,
    path = "/admin/properties",
    tag = "admin",
    params(
        AdminPropertyFilters,
        ("x-user-id" = i32, Header, description = "Authenticated admin"),
    ),
    responses(
        (status = 200, description = "Listings matching the moderation filters", body = ApiResponse<Page<PropertyDto>>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 422, description = "Unknown status filter", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Valid(Query(filters)): Valid<Query<AdminPropertyFilters>>,
) -> ApiResult<Json<ApiResponse<Page<PropertyDto>>>> {
    trace!("Entering admin list_properties function");

    policy::ensure(policy::is_admin(&actor), "moderate listings")?;
    let scope = Scope::moderation_from_filters(&filters)?;
    let page = search::search(&state.db, &scope, filters.page.unwrap_or(1), ADMIN_PAGE_SIZE).await?;
    let details = listings::with_details(&state.db, page.items.clone()).await?;
    debug!("Moderation list matched {} listings", page.total_count);

    Ok(Json(ApiResponse::ok(
        page_with(page, details_list_to_dto(details, &state.settings)),
        "Properties retrieved successfully",
    )))
}

/// Change a listing's moderation status
#[utoipa::path(
    patch,
    path = "/admin/properties/{id}",
    tag = "admin",
    params(
        ("id" = i32, Path, description = "Listing ID"),
        ("x-user-id" = i32, Header, description = "Authenticated admin"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<PropertyDto>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 422, description = "Status must be pending, published or archived", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_property_status(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<PropertyDto>>> {
    trace!("Entering update_property_status function for id: {}", id);

    policy::ensure(policy::is_admin(&actor), "change listing status")?;
    let listing = listings::find_by_id(&state.db, id).await?;
    let updated = moderation::set_status(&state.db, &actor, listing, &request.status).await?;

    let mut details = listings::with_details(&state.db, vec![updated]).await?;
    let details = details.pop().ok_or(MarketplaceError::NotFound {
        resource: "Property",
        id,
    })?;
    Ok(Json(ApiResponse::ok(
        details_to_dto(details, &state.settings),
        "Property status updated successfully.",
    )))
}

/// User directory with listing counts, 20 per page
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(
        AdminUserFilters,
        ("x-user-id" = i32, Header, description = "Authenticated admin"),
    ),
    responses(
        (status = 200, description = "Users matching the filters, newest first", body = ApiResponse<Page<UserDto>>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 422, description = "Unknown role filter", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Valid(Query(filters)): Valid<Query<AdminUserFilters>>,
) -> ApiResult<Json<ApiResponse<Page<UserDto>>>> {
    trace!("Entering list_users function");

    let page = users::search(&state.db, &actor, &filters).await?;
    Ok(Json(ApiResponse::ok(
        page.map(summary_to_dto),
        "Users retrieved successfully",
    )))
}

/// Change a user's role
#[utoipa::path(
    patch,
    path = "/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("x-user-id" = i32, Header, description = "Authenticated admin"),
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserDto>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "The user is the last administrator", body = ErrorResponse),
        (status = 422, description = "Role must be client, agent or admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    trace!("Entering update_user_role function for id: {}", id);

    let updated = users::update_role(&state.db, &actor, id, &request.role).await?;
    let properties_count = listings::owned_by(&state.db, updated.id).await?.len() as u64;
    Ok(Json(ApiResponse::ok(
        user_to_dto(updated, properties_count),
        "User role updated successfully.",
    )))
}

/// Delete a user together with their listings and images
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("x-user-id" = i32, Header, description = "Authenticated admin"),
    ),
    responses(
        (status = 200, description = "User deleted; data is the deleted id", body = ApiResponse<i32>),
        (status = 401, description = "No authenticated user", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "The user is the last administrator", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<i32>>> {
    trace!("Entering delete_user function for id: {}", id);

    users::delete(&state.db, &state.images, &actor, id).await?;
    info!("User {} deleted by admin {}", id, actor.id);
    Ok(Json(ApiResponse::ok(
        id,
        "User and their properties deleted successfully.",
    )))
}
