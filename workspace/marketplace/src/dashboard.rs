use common::DashboardStats;
use model::entities::{property, user};
use model::{PropertyStatus, UserRole};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::instrument;

use crate::actor::Actor;
use crate::error::Result;
use crate::policy;
use crate::users::count_by_role;

async fn count_by_status(db: &DatabaseConnection, status: PropertyStatus) -> Result<u64> {
    Ok(property::Entity::find()
        .filter(property::Column::Status.eq(status))
        .count(db)
        .await?)
}

/// Listing and user counters for the admin dashboard.
#[instrument(skip(db))]
pub async fn stats(db: &DatabaseConnection, actor: &Actor) -> Result<DashboardStats> {
    policy::ensure(policy::is_admin(actor), "view the dashboard")?;

    Ok(DashboardStats {
        total_properties: property::Entity::find().count(db).await?,
        pending_properties: count_by_status(db, PropertyStatus::Pending).await?,
        published_properties: count_by_status(db, PropertyStatus::Published).await?,
        archived_properties: count_by_status(db, PropertyStatus::Archived).await?,
        total_users: user::Entity::find().count(db).await?,
        agents: count_by_role(db, UserRole::Agent).await?,
        clients: count_by_role(db, UserRole::Client).await?,
        admins: count_by_role(db, UserRole::Admin).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketplaceError;
    use crate::testing::{create_listing_row, create_user, setup_db};

    #[tokio::test]
    async fn test_stats_count_everything() {
        let db = setup_db().await;
        let admin = create_user(&db, "admin@example.com", UserRole::Admin).await;
        let agent = create_user(&db, "agent@example.com", UserRole::Agent).await;
        create_user(&db, "c1@example.com", UserRole::Client).await;
        create_user(&db, "c2@example.com", UserRole::Client).await;
        create_listing_row(&db, &agent, PropertyStatus::Pending, 1).await;
        create_listing_row(&db, &agent, PropertyStatus::Pending, 2).await;
        create_listing_row(&db, &agent, PropertyStatus::Published, 3).await;
        create_listing_row(&db, &admin, PropertyStatus::Archived, 4).await;

        let stats = stats(&db, &Actor::from(&admin)).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_properties: 4,
                pending_properties: 2,
                published_properties: 1,
                archived_properties: 1,
                total_users: 4,
                agents: 1,
                clients: 2,
                admins: 1,
            }
        );

        assert!(matches!(
            super::stats(&db, &Actor::from(&agent)).await,
            Err(MarketplaceError::Forbidden(_))
        ));
    }
}
