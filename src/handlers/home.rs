use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::{HomePage, SearchFilters};
use marketplace::listings;
use marketplace::search::{self, HOME_RECENT_COUNT};
use tracing::{debug, instrument, trace};

use crate::error::ApiResult;
use crate::handlers::properties::published_page;
use crate::helpers::converters::details_list_to_dto;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Home page: latest listings, plus search results when a filter is given
#[utoipa::path(
    get,
    path = "/",
    tag = "properties",
    params(SearchFilters),
    responses(
        (status = 200, description = "Six most recent published listings and optional search results", body = ApiResponse<HomePage>),
        (status = 422, description = "Malformed numeric filter", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Valid(Query(filters)): Valid<Query<SearchFilters>>,
) -> ApiResult<Json<ApiResponse<HomePage>>> {
    trace!("Entering home function");

    let recent = search::recent_published(&state.db, HOME_RECENT_COUNT).await?;
    let recent = details_list_to_dto(listings::with_details(&state.db, recent).await?, &state.settings);

    let search_results = if filters.has_criteria() {
        let page = published_page(&state, &filters).await?;
        debug!("Home search matched {} listings", page.total_count);
        Some(page)
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(
        HomePage {
            recent,
            search_results,
            filters,
        },
        "Home page retrieved successfully",
    )))
}
