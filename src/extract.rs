//! Resolution of the acting user.
//!
//! Sessions are handled upstream; the gateway forwards the authenticated
//! user's id in the `x-user-id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use marketplace::{Actor, MarketplaceError};
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::schemas::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user, if any. Unknown or malformed ids count as anonymous.
#[derive(Debug, Clone, Copy)]
pub struct MaybeActor(pub Option<Actor>);

/// The acting user; rejects the request with 401 when there is none.
#[derive(Debug, Clone, Copy)]
pub struct RequireActor(pub Actor);

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<Actor>, ApiError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        trace!("No {} header, anonymous request", USER_ID_HEADER);
        return Ok(None);
    };
    let Some(user_id) = raw.to_str().ok().and_then(|v| v.trim().parse::<i32>().ok()) else {
        debug!("Ignoring malformed {} header", USER_ID_HEADER);
        return Ok(None);
    };

    match marketplace::users::find_by_id(&state.db, user_id).await {
        Ok(user) => Ok(Some(Actor::from(&user))),
        Err(MarketplaceError::NotFound { .. }) => {
            debug!("Header names unknown user {}", user_id);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(resolve(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(RequireActor)
            .ok_or(ApiError::Unauthenticated)
    }
}
