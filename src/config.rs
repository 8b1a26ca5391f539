use anyhow::{Context, Result};
use ::config::{Config, Environment};
use marketplace::ImageStore;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://immorust.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_STORAGE_ROOT: &str = "storage/public";
pub const DEFAULT_PUBLIC_STORAGE_URL: &str = "/storage";

/// Runtime settings.
///
/// Defaults are overridden by `IMMORUST_*` environment variables (a `.env`
/// file is honoured), and CLI flags override both.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Directory holding uploaded images
    pub storage_root: String,
    /// URL prefix under which stored images are served
    pub public_storage_url: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("storage_root", DEFAULT_STORAGE_ROOT)?
            .set_default("public_storage_url", DEFAULT_PUBLIC_STORAGE_URL)?
            .add_source(Environment::with_prefix("IMMORUST"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Public URL of a stored image path.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_storage_url.trim_end_matches('/'), path)
    }
}

/// Open the image store and assemble the application state
pub fn initialize_app_state(db: DatabaseConnection, settings: Settings) -> Result<AppState> {
    info!("Storing images under {}", settings.storage_root);
    let images = ImageStore::local(&settings.storage_root)
        .with_context(|| format!("Failed to open image storage at {}", settings.storage_root))?;

    Ok(AppState::new(db, images, settings))
}
