//! Listing status workflow.
//!
//! `pending`, `published` and `archived` are all mutually reachable; the only
//! guard on a transition is that an administrator asks for it.

use model::PropertyStatus;
use model::entities::property;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::actor::Actor;
use crate::error::{MarketplaceError, Result};
use crate::policy;

pub const INVALID_STATUS: &str = "Status must be pending, published, or archived.";

/// Status given to a newly created listing.
pub fn initial_status(creator: &Actor) -> PropertyStatus {
    if policy::is_admin(creator) {
        PropertyStatus::Published
    } else {
        PropertyStatus::Pending
    }
}

/// Parses a status name, failing with a `status` field error.
pub fn parse_status(raw: &str) -> Result<PropertyStatus> {
    PropertyStatus::from_str(raw).map_err(|_| MarketplaceError::invalid("status", INVALID_STATUS))
}

/// Moves `listing` to `new_status`. Admin only; any transition is allowed.
#[instrument(skip(db, listing), fields(listing_id = listing.id, from = %listing.status))]
pub async fn set_status(
    db: &DatabaseConnection,
    actor: &Actor,
    listing: property::Model,
    new_status: &str,
) -> Result<property::Model> {
    if !policy::is_admin(actor) {
        warn!("User {} attempted to moderate listing {}", actor.id, listing.id);
        return Err(MarketplaceError::forbidden("change listing status"));
    }
    let status = parse_status(new_status)?;

    if status == listing.status {
        debug!("Listing {} already {}", listing.id, status);
    }

    let listing_id = listing.id;
    let mut active = listing.into_active_model();
    active.status = Set(status);
    let updated = active.update(db).await?;

    info!("Listing {} status set to {} by admin {}", listing_id, status, actor.id);
    Ok(updated)
}
