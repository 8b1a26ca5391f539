//! Listing store: reads with their owner and images, and the write path.

use model::entities::{property, property_image, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    LoaderTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::actor::Actor;
use crate::error::{MarketplaceError, Result};
use crate::images::{CheckedImage, ImageStore, ImageUpload};
use crate::moderation;
use crate::policy;
use crate::validation::{PropertyForm, validate_submission};

/// A listing with its owner and its images in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    pub property: property::Model,
    pub owner: Option<user::Model>,
    pub images: Vec<property_image::Model>,
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<property::Model> {
    property::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(MarketplaceError::NotFound {
            resource: "Property",
            id,
        })
}

/// Loads owners and images for a batch of listings, preserving their order.
pub async fn with_details(
    db: &DatabaseConnection,
    listings: Vec<property::Model>,
) -> Result<Vec<ListingDetails>> {
    let owners = listings.load_one(user::Entity, db).await?;
    let images = listings.load_many(property_image::Entity, db).await?;

    Ok(listings
        .into_iter()
        .zip(owners)
        .zip(images)
        .map(|((property, owner), mut images)| {
            images.sort_by_key(|image| (image.sort_order, image.id));
            ListingDetails {
                property,
                owner,
                images,
            }
        })
        .collect())
}

async fn details(db: &DatabaseConnection, listing: property::Model) -> Result<ListingDetails> {
    let id = listing.id;
    with_details(db, vec![listing])
        .await?
        .pop()
        .ok_or(MarketplaceError::NotFound {
            resource: "Property",
            id,
        })
}

/// Shows one listing. Unpublished listings need the owner or an admin.
#[instrument(skip(db))]
pub async fn view(db: &DatabaseConnection, actor: Option<&Actor>, id: i32) -> Result<ListingDetails> {
    let listing = find_by_id(db, id).await?;
    if !policy::can_view_listing(actor, &listing) {
        warn!("Listing {} ({}) hidden from {:?}", id, listing.status, actor.map(|a| a.id));
        return Err(MarketplaceError::forbidden("view this listing"));
    }
    details(db, listing).await
}

/// Loads a listing for its edit form, with the same rule as `update`.
#[instrument(skip(db))]
pub async fn edit_form(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<ListingDetails> {
    let listing = find_by_id(db, id).await?;
    policy::ensure(policy::can_edit_listing(actor, &listing), "edit this listing")?;
    details(db, listing).await
}

/// Creates a listing owned by `actor`.
///
/// Agents' listings start pending, admins' are published right away. A
/// submitted `status` is ignored; it can only change through an update or
/// moderation.
#[instrument(skip(db, store, form, uploads), fields(uploads = uploads.len()))]
pub async fn create(
    db: &DatabaseConnection,
    store: &ImageStore,
    actor: &Actor,
    form: &PropertyForm,
    uploads: Vec<ImageUpload>,
) -> Result<ListingDetails> {
    policy::ensure(policy::can_create_listing(actor), "create listings")?;
    if form.status.is_some() {
        debug!("Ignoring status submitted with a new listing");
    }
    let form = PropertyForm {
        status: None,
        ..form.clone()
    };
    let submission = validate_submission(actor, &form, uploads)?;
    let attributes = submission.attributes;

    let status = moderation::initial_status(actor);
    let listing = property::ActiveModel {
        title: Set(attributes.title),
        description: Set(attributes.description),
        price: Set(attributes.price),
        surface_area: Set(attributes.surface_area),
        bedrooms: Set(attributes.bedrooms),
        city: Set(attributes.city),
        neighborhood: Set(attributes.neighborhood),
        status: Set(status),
        user_id: Set(actor.id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(
        "Listing {} created by user {} with status {}",
        listing.id, actor.id, listing.status
    );

    attach_images(db, store, &listing, &submission.images, 0).await?;
    details(db, listing).await
}

/// Updates a listing's attributes and appends new images after the existing ones.
#[instrument(skip(db, store, form, uploads), fields(uploads = uploads.len()))]
pub async fn update(
    db: &DatabaseConnection,
    store: &ImageStore,
    actor: &Actor,
    id: i32,
    form: &PropertyForm,
    uploads: Vec<ImageUpload>,
) -> Result<ListingDetails> {
    let listing = find_by_id(db, id).await?;
    policy::ensure(policy::can_edit_listing(actor, &listing), "edit this listing")?;
    let submission = validate_submission(actor, form, uploads)?;
    let attributes = submission.attributes;

    let mut active = listing.into_active_model();
    active.title = Set(attributes.title);
    active.description = Set(attributes.description);
    active.price = Set(attributes.price);
    active.surface_area = Set(attributes.surface_area);
    active.bedrooms = Set(attributes.bedrooms);
    active.city = Set(attributes.city);
    active.neighborhood = Set(attributes.neighborhood);
    if let Some(status) = attributes.status {
        active.status = Set(status);
    }
    let listing = active.update(db).await?;

    let existing = property_image::Entity::find()
        .filter(property_image::Column::PropertyId.eq(listing.id))
        .count(db)
        .await?;
    let start = i32::try_from(existing).unwrap_or(i32::MAX);
    attach_images(db, store, &listing, &submission.images, start).await?;

    info!("Listing {} updated by user {}", listing.id, actor.id);
    details(db, listing).await
}

/// Deletes a listing, its images and their files.
#[instrument(skip(db, store))]
pub async fn delete(db: &DatabaseConnection, store: &ImageStore, actor: &Actor, id: i32) -> Result<()> {
    let listing = find_by_id(db, id).await?;
    policy::ensure(policy::can_delete_listing(actor, &listing), "delete this listing")?;
    purge(db, store, listing).await?;
    info!("Listing {} deleted by user {}", id, actor.id);
    Ok(())
}

/// Removes files, then image rows, then the listing row.
///
/// A file that cannot be removed is logged and skipped.
pub(crate) async fn purge(db: &DatabaseConnection, store: &ImageStore, listing: property::Model) -> Result<()> {
    let images = listing.find_related(property_image::Entity).all(db).await?;
    for image in &images {
        store.remove(&image.path).await;
    }

    property_image::Entity::delete_many()
        .filter(property_image::Column::PropertyId.eq(listing.id))
        .exec(db)
        .await?;
    debug!("Removed {} images of listing {}", images.len(), listing.id);

    listing.delete(db).await?;
    Ok(())
}

async fn attach_images(
    db: &DatabaseConnection,
    store: &ImageStore,
    listing: &property::Model,
    images: &[CheckedImage],
    start: i32,
) -> Result<()> {
    for (sort_order, image) in (start..).zip(images) {
        let path = store.put(image).await?;
        property_image::ActiveModel {
            property_id: Set(listing.id),
            path: Set(path),
            alt_text: Set(Some(format!("{} - Image {}", listing.title, sort_order + 1))),
            sort_order: Set(sort_order),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    if !images.is_empty() {
        debug!(
            "Attached {} images to listing {} from position {}",
            images.len(),
            listing.id,
            start
        );
    }
    Ok(())
}

/// All listings of one owner, newest first.
pub async fn owned_by(db: &DatabaseConnection, user_id: i32) -> Result<Vec<property::Model>> {
    Ok(property::Entity::find()
        .filter(property::Column::UserId.eq(user_id))
        .order_by_desc(property::Column::CreatedAt)
        .all(db)
        .await?)
}
