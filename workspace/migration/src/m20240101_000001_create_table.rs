use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Email).unique_key())
                    .col(string_len(Users::Role, 16).default("client"))
                    .col(string_null(Users::PasswordHash))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(pk_auto(Properties::Id))
                    .col(string(Properties::Title))
                    .col(text(Properties::Description))
                    .col(decimal(Properties::Price).decimal_len(12, 2))
                    .col(integer(Properties::SurfaceArea))
                    .col(integer(Properties::Bedrooms))
                    .col(string(Properties::City))
                    .col(string(Properties::Neighborhood))
                    .col(string_len(Properties::Status, 16).default("pending"))
                    .col(integer(Properties::UserId))
                    .col(timestamp_with_time_zone(Properties::CreatedAt))
                    .col(timestamp_with_time_zone(Properties::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_user")
                            .from(Properties::Table, Properties::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create property_images table
        manager
            .create_table(
                Table::create()
                    .table(PropertyImages::Table)
                    .if_not_exists()
                    .col(pk_auto(PropertyImages::Id))
                    .col(integer(PropertyImages::PropertyId))
                    .col(string(PropertyImages::Path))
                    .col(string_null(PropertyImages::AltText))
                    .col(integer(PropertyImages::SortOrder).default(0))
                    .col(timestamp_with_time_zone(PropertyImages::CreatedAt))
                    .col(timestamp_with_time_zone(PropertyImages::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_image_property")
                            .from(PropertyImages::Table, PropertyImages::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(PropertyImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Properties {
    Table,
    Id,
    Title,
    Description,
    Price,
    SurfaceArea,
    Bedrooms,
    City,
    Neighborhood,
    Status,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum PropertyImages {
    Table,
    Id,
    PropertyId,
    Path,
    AltText,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
