use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_table::{Properties, PropertyImages};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Single-column indexes backing the public search filters.
const PROPERTY_FILTER_COLUMNS: [(&str, Properties); 5] = [
    ("idx_properties_city", Properties::City),
    ("idx_properties_price", Properties::Price),
    ("idx_properties_surface_area", Properties::SurfaceArea),
    ("idx_properties_bedrooms", Properties::Bedrooms),
    ("idx_properties_user_id", Properties::UserId),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, column) in PROPERTY_FILTER_COLUMNS {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Properties::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        // Browsing always filters on status and sorts newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_properties_status_created_at")
                    .table(Properties::Table)
                    .col(Properties::Status)
                    .col(Properties::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_property_images_property_sort")
                    .table(PropertyImages::Table)
                    .col(PropertyImages::PropertyId)
                    .col(PropertyImages::SortOrder)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_property_images_property_sort")
                    .table(PropertyImages::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_properties_status_created_at")
                    .table(Properties::Table)
                    .to_owned(),
            )
            .await?;
        for (name, _) in PROPERTY_FILTER_COLUMNS {
            manager
                .drop_index(Index::drop().name(name).table(Properties::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}
