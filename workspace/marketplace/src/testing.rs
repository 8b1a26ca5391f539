//! Shared fixtures for the core tests.

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use model::entities::{property, user};
use model::{PropertyStatus, UserRole};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
use std::path::Path;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::images::{ImageStore, ImageUpload};

/// In-memory SQLite with the full schema and foreign keys enforced.
pub async fn setup_db() -> DatabaseConnection {
    init_test_tracing();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Installs a stderr subscriber once per test binary; level from `RUST_LOG`, default WARN.
pub fn init_test_tracing() {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    // Another test may have installed it already
    let _ = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();
}

#[test]
fn test_tracing_can_be_initialized_twice() {
    init_test_tracing();
    init_test_tracing();
    assert!(tracing::dispatcher::has_been_set());
}

pub async fn create_user(db: &DatabaseConnection, email: &str, role: UserRole) -> user::Model {
    user::ActiveModel {
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        email: Set(email.to_string()),
        role: Set(role),
        password_hash: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

/// Inserts a listing row directly, bypassing validation and images.
pub async fn create_listing_row(
    db: &DatabaseConnection,
    owner: &user::Model,
    status: PropertyStatus,
    price: i64,
) -> property::Model {
    insert_listing(db, owner, status, price, 100, 2, "Brussels", 0).await
}

/// Inserts a listing with explicit attributes; `age_minutes` pushes `created_at` into the past.
#[allow(clippy::too_many_arguments)]
pub async fn insert_listing(
    db: &DatabaseConnection,
    owner: &user::Model,
    status: PropertyStatus,
    price: i64,
    surface_area: i32,
    bedrooms: i32,
    city: &str,
    age_minutes: i64,
) -> property::Model {
    property::ActiveModel {
        title: Set(format!("{} bedroom home in {}", bedrooms, city)),
        description: Set("A pleasant place to live".to_string()),
        price: Set(Decimal::new(price, 0)),
        surface_area: Set(surface_area),
        bedrooms: Set(bedrooms),
        city: Set(city.to_string()),
        neighborhood: Set("Centre".to_string()),
        status: Set(status),
        user_id: Set(owner.id),
        created_at: Set(Utc::now() - Duration::minutes(age_minutes)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create listing")
}

pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&[0u8; 64]);
    data
}

pub fn jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(&[0u8; 64]);
    data
}

pub fn png_upload(name: &str) -> ImageUpload {
    ImageUpload::new(Some(name.to_string()), png_bytes())
}

pub fn jpeg_upload(name: &str) -> ImageUpload {
    ImageUpload::new(Some(name.to_string()), jpeg_bytes())
}

/// Image store backed by a temporary directory that lives as long as the `TempDir`.
pub fn local_store() -> (TempDir, ImageStore) {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let store = ImageStore::local(dir.path()).expect("Failed to open local image store");
    (dir, store)
}

/// Replaces a stored file with a non-empty directory, so deleting it fails.
pub fn block_removal(root: &Path, path: &str) {
    let file = root.join(path);
    std::fs::remove_file(&file).expect("Failed to remove stored file");
    std::fs::create_dir_all(file.join("locked")).expect("Failed to create blocking directory");
}
