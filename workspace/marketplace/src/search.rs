//! Filtered, paginated listing queries.
//!
//! Public browsing is always restricted to published listings. The admin
//! moderation view sees every status and filters on status and city only.

use common::{AdminPropertyFilters, Page, SearchFilters};
use model::PropertyStatus;
use model::entities::property;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::{FieldErrors, MarketplaceError, Result};
use crate::moderation;

/// Page size of public browsing and search results.
pub const PUBLIC_PAGE_SIZE: u64 = 12;
/// Page size of the admin listing and user tables.
pub const ADMIN_PAGE_SIZE: u64 = 20;
/// Number of listings on the home page when no search is active.
pub const HOME_RECENT_COUNT: u64 = 6;
/// Number of listings on the admin dashboard.
pub const DASHBOARD_RECENT_COUNT: u64 = 10;

/// Attribute filters over listings; every present criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_surface: Option<i32>,
    pub max_surface: Option<i32>,
    pub bedrooms: Option<i32>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        *self == SearchCriteria::default()
    }

    /// Parses raw query values. Blank values are absent; malformed numbers
    /// are reported per field.
    pub fn from_filters(filters: &SearchFilters) -> Result<Self> {
        let mut errors = FieldErrors::new();

        let criteria = SearchCriteria {
            city: filled(&filters.city).map(str::to_string),
            min_price: parse_field(&mut errors, "min_price", &filters.min_price, "Minimum price must be a valid number."),
            max_price: parse_field(&mut errors, "max_price", &filters.max_price, "Maximum price must be a valid number."),
            min_surface: parse_field(&mut errors, "min_surface", &filters.min_surface, "Minimum surface must be a whole number."),
            max_surface: parse_field(&mut errors, "max_surface", &filters.max_surface, "Maximum surface must be a whole number."),
            bedrooms: parse_field(&mut errors, "bedrooms", &filters.bedrooms, "Number of bedrooms must be a whole number."),
        };

        errors.into_result()?;
        Ok(criteria)
    }

    fn apply(&self, mut query: Select<property::Entity>) -> Select<property::Entity> {
        if let Some(city) = &self.city {
            query = query.filter(city_contains(city));
        }
        if let Some(min_price) = self.min_price {
            query = query.filter(property::Column::Price.gte(min_price));
        }
        if let Some(max_price) = self.max_price {
            query = query.filter(property::Column::Price.lte(max_price));
        }
        if let Some(min_surface) = self.min_surface {
            query = query.filter(property::Column::SurfaceArea.gte(min_surface));
        }
        if let Some(max_surface) = self.max_surface {
            query = query.filter(property::Column::SurfaceArea.lte(max_surface));
        }
        if let Some(bedrooms) = self.bedrooms {
            query = query.filter(property::Column::Bedrooms.eq(bedrooms));
        }
        query
    }
}

/// Which listings a search may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Public browsing: published listings matching the criteria
    Published(SearchCriteria),
    /// Admin moderation list: any status unless one is given
    Moderation {
        status: Option<PropertyStatus>,
        city: Option<String>,
    },
}

impl Scope {
    pub fn moderation_from_filters(filters: &AdminPropertyFilters) -> Result<Self> {
        let status = filled(&filters.status)
            .map(moderation::parse_status)
            .transpose()?;
        Ok(Scope::Moderation {
            status,
            city: filled(&filters.city).map(str::to_string),
        })
    }

    fn query(&self) -> Select<property::Entity> {
        let query = property::Entity::find();
        match self {
            Scope::Published(criteria) => criteria
                .apply(query.filter(property::Column::Status.eq(PropertyStatus::Published))),
            Scope::Moderation { status, city } => {
                let mut query = query;
                if let Some(status) = status {
                    query = query.filter(property::Column::Status.eq(*status));
                }
                if let Some(city) = city {
                    query = query.filter(city_contains(city));
                }
                query
            }
        }
    }
}

/// Runs a search, newest first. Pages past the end are empty, not errors.
#[instrument(skip(db))]
pub async fn search(
    db: &DatabaseConnection,
    scope: &Scope,
    page: u64,
    page_size: u64,
) -> Result<Page<property::Model>> {
    if page < 1 {
        return Err(MarketplaceError::invalid("page", "The page must be at least 1."));
    }

    let paginator = newest_first(scope.query()).paginate(db, page_size);
    let total_count = paginator.num_items().await?;
    if !page_has_rows(page, page_size, total_count) {
        debug!("Page {} is past the last of {} listings", page, total_count);
        return Ok(Page::new(Vec::new(), total_count, page, page_size));
    }
    let items = paginator.fetch_page(page - 1).await?;

    debug!(
        "Search returned {} of {} listings on page {}",
        items.len(),
        total_count,
        page
    );
    Ok(Page::new(items, total_count, page, page_size))
}

/// The most recent published listings.
#[instrument(skip(db))]
pub async fn recent_published(db: &DatabaseConnection, limit: u64) -> Result<Vec<property::Model>> {
    let listings = newest_first(
        property::Entity::find().filter(property::Column::Status.eq(PropertyStatus::Published)),
    )
    .limit(limit)
    .all(db)
    .await?;
    Ok(listings)
}

/// The most recent listings of any status.
#[instrument(skip(db))]
pub async fn recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<property::Model>> {
    let listings = newest_first(property::Entity::find())
        .limit(limit)
        .all(db)
        .await?;
    Ok(listings)
}

fn newest_first(query: Select<property::Entity>) -> Select<property::Entity> {
    query
        .order_by_desc(property::Column::CreatedAt)
        .order_by_desc(property::Column::Id)
}

fn city_contains(city: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col((property::Entity, property::Column::City))))
        .like(format!("%{}%", city.to_lowercase()))
}

/// Whether a 1-based `page` starts before the end of `total_count` rows.
/// Offsets too large to compute count as past the end.
pub(crate) fn page_has_rows(page: u64, page_size: u64, total_count: u64) -> bool {
    (page - 1)
        .checked_mul(page_size)
        .is_some_and(|offset| offset < total_count)
}

/// The trimmed value, or `None` when missing or blank.
pub(crate) fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_field<T: FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
    message: &str,
) -> Option<T> {
    let raw = filled(value)?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, message);
            None
        }
    }
}
