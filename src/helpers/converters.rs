use common::{OwnerDto, Page, PropertyDto, PropertyImageDto, UserDto};
use marketplace::ListingDetails;
use marketplace::users::UserSummary;
use model::entities::{property, property_image, user};

use crate::config::Settings;

pub fn owner_to_dto(owner: &user::Model) -> OwnerDto {
    OwnerDto {
        id: owner.id,
        name: owner.name.clone(),
        email: owner.email.clone(),
    }
}

pub fn image_to_dto(image: property_image::Model, settings: &Settings) -> PropertyImageDto {
    PropertyImageDto {
        id: image.id,
        url: settings.public_url(&image.path),
        path: image.path,
        alt_text: image.alt_text,
        sort_order: image.sort_order,
    }
}

/// Maps a listing row without owner or images.
pub fn property_to_dto(property: property::Model) -> PropertyDto {
    PropertyDto {
        id: property.id,
        title: property.title,
        description: property.description,
        price: property.price,
        surface_area: property.surface_area,
        bedrooms: property.bedrooms,
        city: property.city,
        neighborhood: property.neighborhood,
        status: property.status.to_string(),
        user_id: property.user_id,
        owner: None,
        images: Vec::new(),
        created_at: property.created_at,
        updated_at: property.updated_at,
    }
}

pub fn details_to_dto(details: ListingDetails, settings: &Settings) -> PropertyDto {
    PropertyDto {
        owner: details.owner.as_ref().map(owner_to_dto),
        images: details
            .images
            .into_iter()
            .map(|image| image_to_dto(image, settings))
            .collect(),
        ..property_to_dto(details.property)
    }
}

pub fn details_list_to_dto(details: Vec<ListingDetails>, settings: &Settings) -> Vec<PropertyDto> {
    details
        .into_iter()
        .map(|d| details_to_dto(d, settings))
        .collect()
}

/// Rebuilds a page around already-converted items.
pub fn page_with<T, U>(page: Page<T>, items: Vec<U>) -> Page<U> {
    Page {
        items,
        total_count: page.total_count,
        page: page.page,
        page_size: page.page_size,
        last_page: page.last_page,
    }
}

pub fn user_to_dto(user: user::Model, properties_count: u64) -> UserDto {
    UserDto {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.to_string(),
        properties_count,
        created_at: user.created_at,
    }
}

pub fn summary_to_dto(summary: UserSummary) -> UserDto {
    user_to_dto(summary.user, summary.properties_count)
}
