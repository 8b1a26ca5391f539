//! Authorization decisions.
//!
//! Every function here is pure: callers look up the actor and the listing,
//! ask for a decision, and fail with `Forbidden` before touching storage.

use model::UserRole;
use model::entities::property;

use crate::actor::Actor;
use crate::error::{MarketplaceError, Result};

/// Published listings are public; anything else is visible to admins and the owning agent.
pub fn can_view_listing(actor: Option<&Actor>, listing: &property::Model) -> bool {
    if listing.is_published() {
        return true;
    }
    match actor {
        None => false,
        Some(actor) => match actor.role {
            UserRole::Admin => true,
            UserRole::Agent => actor.id == listing.user_id,
            UserRole::Client => false,
        },
    }
}

pub fn can_create_listing(actor: &Actor) -> bool {
    match actor.role {
        UserRole::Agent | UserRole::Admin => true,
        UserRole::Client => false,
    }
}

pub fn can_edit_listing(actor: &Actor, listing: &property::Model) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::Agent => actor.id == listing.user_id,
        UserRole::Client => false,
    }
}

pub fn can_delete_listing(actor: &Actor, listing: &property::Model) -> bool {
    can_edit_listing(actor, listing)
}

pub fn is_admin(actor: &Actor) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::Agent | UserRole::Client => false,
    }
}

/// Turns a negative decision into `Forbidden`.
pub fn ensure(allowed: bool, action: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(MarketplaceError::forbidden(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use model::PropertyStatus;
    use rust_decimal::Decimal;

    fn listing(owner: i32, status: PropertyStatus) -> property::Model {
        property::Model {
            id: 1,
            title: "Loft".to_string(),
            description: "Bright".to_string(),
            price: Decimal::new(250_000, 0),
            surface_area: 120,
            bedrooms: 3,
            city: "Brussels".to_string(),
            neighborhood: "Ixelles".to_string(),
            status,
            user_id: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const ADMIN: Actor = Actor { id: 1, role: UserRole::Admin };
    const OWNER: Actor = Actor { id: 2, role: UserRole::Agent };
    const OTHER_AGENT: Actor = Actor { id: 3, role: UserRole::Agent };
    const CLIENT: Actor = Actor { id: 4, role: UserRole::Client };

    #[test]
    fn test_published_listing_is_public() {
        let published = listing(OWNER.id, PropertyStatus::Published);
        assert!(can_view_listing(None, &published));
        assert!(can_view_listing(Some(&CLIENT), &published));
    }

    #[test]
    fn test_unpublished_listing_visibility() {
        for status in [PropertyStatus::Pending, PropertyStatus::Archived] {
            let hidden = listing(OWNER.id, status);
            assert!(!can_view_listing(None, &hidden));
            assert!(!can_view_listing(Some(&CLIENT), &hidden));
            assert!(!can_view_listing(Some(&OTHER_AGENT), &hidden));
            assert!(can_view_listing(Some(&OWNER), &hidden));
            assert!(can_view_listing(Some(&ADMIN), &hidden));
        }
    }

    #[test]
    fn test_a_client_owning_a_listing_still_cannot_see_it_unpublished() {
        let odd = listing(CLIENT.id, PropertyStatus::Pending);
        assert!(!can_view_listing(Some(&CLIENT), &odd));
        assert!(!can_edit_listing(&CLIENT, &odd));
    }

    #[test]
    fn test_create_requires_agent_or_admin() {
        assert!(can_create_listing(&ADMIN));
        assert!(can_create_listing(&OWNER));
        assert!(!can_create_listing(&CLIENT));
    }

    #[test]
    fn test_edit_and_delete_rules() {
        let own = listing(OWNER.id, PropertyStatus::Published);
        assert!(can_edit_listing(&OWNER, &own));
        assert!(can_delete_listing(&OWNER, &own));
        assert!(!can_edit_listing(&OTHER_AGENT, &own));
        assert!(!can_delete_listing(&OTHER_AGENT, &own));
        assert!(can_edit_listing(&ADMIN, &own));
        assert!(can_delete_listing(&ADMIN, &own));
        assert!(!can_delete_listing(&CLIENT, &own));
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(is_admin(&ADMIN), "moderate").is_ok());
        assert!(matches!(
            ensure(is_admin(&OWNER), "moderate"),
            Err(MarketplaceError::Forbidden(_))
        ));
    }
}
