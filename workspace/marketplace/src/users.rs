//! User directory.
//!
//! The system must keep at least one administrator: the last admin can be
//! neither deleted nor demoted.

use common::{AdminUserFilters, Page};
use model::UserRole;
use model::entities::{property, user};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::actor::Actor;
use crate::error::{FieldErrors, MarketplaceError, Result};
use crate::images::ImageStore;
use crate::listings;
use crate::policy;
use crate::search::{ADMIN_PAGE_SIZE, filled, page_has_rows};

pub const INVALID_ROLE: &str = "Role must be client, agent, or admin.";

/// A user with the number of listings they own.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user: user::Model,
    pub properties_count: u64,
}

/// Account data for a new user.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    pub role: UserRole,
    /// Already hashed; the directory never sees plain passwords
    pub password_hash: Option<String>,
}

pub fn parse_role(raw: &str) -> Result<UserRole> {
    raw.parse::<UserRole>()
        .map_err(|_| MarketplaceError::invalid("role", INVALID_ROLE))
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<user::Model> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(MarketplaceError::NotFound { resource: "User", id })
}

pub async fn list_by_role(db: &DatabaseConnection, role: UserRole) -> Result<Vec<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Role.eq(role))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

pub async fn count_by_role(db: &DatabaseConnection, role: UserRole) -> Result<u64> {
    Ok(user::Entity::find()
        .filter(user::Column::Role.eq(role))
        .count(db)
        .await?)
}

#[instrument(skip(db, new_user), fields(email = %new_user.email, role = %new_user.role))]
pub async fn create(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let mut errors = FieldErrors::new();
    if let Err(validation_errors) = new_user.validate() {
        errors.extend_from_validator(&validation_errors);
    }
    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(new_user.email.as_str()))
        .count(db)
        .await?
        > 0;
    if email_taken {
        errors.add("email", "The email has already been taken.");
    }
    errors.into_result()?;

    let created = user::ActiveModel {
        name: Set(new_user.name),
        email: Set(new_user.email),
        role: Set(new_user.role),
        password_hash: Set(new_user.password_hash),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("User {} created with role {}", created.id, created.role);
    Ok(created)
}

/// Changes a user's role. Admin only; the last admin keeps their role.
#[instrument(skip(db))]
pub async fn update_role(
    db: &DatabaseConnection,
    actor: &Actor,
    target_id: i32,
    new_role: &str,
) -> Result<user::Model> {
    policy::ensure(policy::is_admin(actor), "change user roles")?;
    let role = parse_role(new_role)?;
    let target = find_by_id(db, target_id).await?;

    if target.is_admin() && role != UserRole::Admin && count_by_role(db, UserRole::Admin).await? <= 1 {
        warn!("Refusing to demote {}, the last administrator", target.id);
        return Err(MarketplaceError::LastAdmin);
    }

    let previous = target.role;
    let mut active = target.into_active_model();
    active.role = Set(role);
    let updated = active.update(db).await?;
    info!(
        "User {} role changed from {} to {} by admin {}",
        updated.id, previous, updated.role, actor.id
    );
    Ok(updated)
}

/// Deletes a user with all their listings, images and image files.
#[instrument(skip(db, store))]
pub async fn delete(db: &DatabaseConnection, store: &ImageStore, actor: &Actor, target_id: i32) -> Result<()> {
    policy::ensure(policy::is_admin(actor), "delete users")?;
    let target = find_by_id(db, target_id).await?;

    if target.is_admin() && count_by_role(db, UserRole::Admin).await? <= 1 {
        warn!("Refusing to delete {}, the last administrator", target.id);
        return Err(MarketplaceError::LastAdmin);
    }

    let owned = listings::owned_by(db, target.id).await?;
    let listing_count = owned.len();
    for listing in owned {
        listings::purge(db, store, listing).await?;
    }

    target.delete(db).await?;
    info!(
        "User {} deleted with {} listings by admin {}",
        target_id, listing_count, actor.id
    );
    Ok(())
}

/// Admin user table: optional role filter and name/email search, newest first.
#[instrument(skip(db))]
pub async fn search(
    db: &DatabaseConnection,
    actor: &Actor,
    filters: &AdminUserFilters,
) -> Result<Page<UserSummary>> {
    policy::ensure(policy::is_admin(actor), "manage users")?;
    let page = filters.page.unwrap_or(1);
    if page < 1 {
        return Err(MarketplaceError::invalid("page", "The page must be at least 1."));
    }

    let mut query = user::Entity::find();
    if let Some(role) = filled(&filters.role) {
        query = query.filter(user::Column::Role.eq(parse_role(role)?));
    }
    if let Some(term) = filled(&filters.search) {
        let pattern = format!("%{}%", term.to_lowercase());
        let lower = |column: user::Column| Expr::expr(Func::lower(Expr::col((user::Entity, column))));
        query = query.filter(
            Condition::any()
                .add(lower(user::Column::Name).like(pattern.as_str()))
                .add(lower(user::Column::Email).like(pattern.as_str())),
        );
    }

    let paginator = query
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .paginate(db, ADMIN_PAGE_SIZE);
    let total_count = paginator.num_items().await?;
    if !page_has_rows(page, ADMIN_PAGE_SIZE, total_count) {
        return Ok(Page::new(Vec::new(), total_count, page, ADMIN_PAGE_SIZE));
    }
    let users = paginator.fetch_page(page - 1).await?;

    let counts = listing_counts(db, users.iter().map(|u| u.id).collect()).await?;
    debug!("User search matched {} users", total_count);

    let items = users
        .into_iter()
        .map(|user| UserSummary {
            properties_count: counts.get(&user.id).copied().unwrap_or(0),
            user,
        })
        .collect();
    Ok(Page::new(items, total_count, page, ADMIN_PAGE_SIZE))
}

async fn listing_counts(db: &DatabaseConnection, user_ids: Vec<i32>) -> Result<HashMap<i32, u64>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = property::Entity::find()
        .select_only()
        .column(property::Column::UserId)
        .column_as(Expr::col(property::Column::Id).count(), "properties_count")
        .filter(property::Column::UserId.is_in(user_ids))
        .group_by(property::Column::UserId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(user_id, count)| (user_id, u64::try_from(count).unwrap_or(0)))
        .collect())
}
