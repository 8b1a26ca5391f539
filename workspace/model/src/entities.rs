//! SeaORM entities of the listing marketplace.
//!
//! `users` own `properties`, and each property owns its `property_images`.
//! There are no many-to-many relations.

pub mod property;
pub mod property_image;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::property::Entity as Property;
    pub use super::property_image::Entity as PropertyImage;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    };

    use super::property::PropertyStatus;
    use super::user::UserRole;
    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys so cascades behave like production
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, email: &str, role: UserRole) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            name: Set(email.split('@').next().unwrap_or(email).to_string()),
            email: Set(email.to_string()),
            role: Set(role),
            password_hash: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn insert_property(db: &DatabaseConnection, owner: &user::Model) -> Result<property::Model, DbErr> {
        property::ActiveModel {
            title: Set("Bright loft".to_string()),
            description: Set("Open plan loft near the canal".to_string()),
            price: Set(Decimal::new(25_000_000, 2)),
            surface_area: Set(120),
            bedrooms: Set(3),
            city: Set("Brussels".to_string()),
            neighborhood: Set("Ixelles".to_string()),
            status: Set(PropertyStatus::Pending),
            user_id: Set(owner.id),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let agent = insert_user(&db, "agent@example.com", UserRole::Agent).await?;
        assert_eq!(agent.role, UserRole::Agent);
        assert_eq!(agent.created_at, agent.updated_at);

        let listing = insert_property(&db, &agent).await?;
        assert_eq!(listing.status, PropertyStatus::Pending);
        assert_eq!(listing.price, Decimal::new(25_000_000, 2));
        assert!(!listing.is_published());

        for sort_order in [1, 0] {
            property_image::ActiveModel {
                property_id: Set(listing.id),
                path: Set(format!("properties/{}.png", sort_order)),
                alt_text: Set(None),
                sort_order: Set(sort_order),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let images = listing
            .find_related(PropertyImage)
            .order_by_asc(property_image::Column::SortOrder)
            .all(&db)
            .await?;
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].path, "properties/0.png");

        let owned = agent.find_related(Property).all(&db).await?;
        assert_eq!(owned.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_rows() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let agent = insert_user(&db, "cascade@example.com", UserRole::Agent).await?;
        let listing = insert_property(&db, &agent).await?;
        property_image::ActiveModel {
            property_id: Set(listing.id),
            path: Set("properties/a.jpg".to_string()),
            alt_text: Set(Some("Bright loft - Image 1".to_string())),
            sort_order: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(agent.id).exec(&db).await?;

        assert_eq!(Property::find().count(&db).await?, 0);
        assert_eq!(PropertyImage::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_email_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        insert_user(&db, "dup@example.com", UserRole::Client).await?;
        let second = insert_user(&db, "dup@example.com", UserRole::Agent).await;
        assert!(second.is_err());

        let admins = User::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .count(&db)
            .await?;
        assert_eq!(admins, 0);
        Ok(())
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("published".parse::<PropertyStatus>(), Ok(PropertyStatus::Published));
        assert_eq!("agent".parse::<UserRole>(), Ok(UserRole::Agent));
        assert!("deleted".parse::<PropertyStatus>().is_err());
        assert!("Admin".parse::<UserRole>().is_err());
        assert_eq!(PropertyStatus::Archived.to_string(), "archived");
    }
}
