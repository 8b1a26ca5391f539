use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::Page;

/// Owner summary embedded in listing payloads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OwnerDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// An image attached to a listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PropertyImageDto {
    pub id: i32,
    /// Relative path inside the image store
    pub path: String,
    /// Public URL, `/storage/{path}`
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
}

/// Listing view model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PropertyDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Decimal price, serialized as a string to keep precision
    #[schema(value_type = String, example = "250000.00")]
    pub price: Decimal,
    pub surface_area: i32,
    pub bedrooms: i32,
    pub city: String,
    pub neighborhood: String,
    /// One of `pending`, `published`, `archived`
    pub status: String,
    pub user_id: i32,
    pub owner: Option<OwnerDto>,
    /// Images ordered by sort order
    pub images: Vec<PropertyImageDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public search parameters.
///
/// Values arrive as raw strings; empty strings are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams, Validate, PartialEq)]
#[into_params(parameter_in = Query)]
pub struct SearchFilters {
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// Inclusive lower surface bound (m²)
    pub min_surface: Option<String>,
    /// Inclusive upper surface bound (m²)
    pub max_surface: Option<String>,
    /// Exact number of bedrooms
    pub bedrooms: Option<String>,
    /// Page number, 1-indexed (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
}

impl SearchFilters {
    /// True when at least one search criterion was filled in.
    pub fn has_criteria(&self) -> bool {
        [
            &self.city,
            &self.min_price,
            &self.max_price,
            &self.min_surface,
            &self.max_surface,
            &self.bedrooms,
        ]
        .iter()
        .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Home page payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HomePage {
    /// The six most recent published listings
    pub recent: Vec<PropertyDto>,
    /// Only present when at least one search criterion was supplied
    pub search_results: Option<Page<PropertyDto>>,
    pub filters: SearchFilters,
}
