use anyhow::{Context, Result};
use marketplace::users::{self, NewUser};
use tracing::{info, trace};

use crate::cli::commands::connect_and_migrate;

pub async fn create_user(
    database_url: &str,
    name: String,
    email: String,
    role: &str,
    password: Option<&str>,
) -> Result<()> {
    trace!("Entering create_user function");
    let db = connect_and_migrate(database_url).await?;

    let role = users::parse_role(role)?;
    let password_hash = password
        .map(|p| bcrypt::hash(p, bcrypt::DEFAULT_COST))
        .transpose()
        .context("Failed to hash password")?;

    let user = users::create(
        &db,
        NewUser {
            name,
            email,
            role,
            password_hash,
        },
    )
    .await?;

    info!("Created {} {} <{}> with id {}", user.role, user.name, user.email, user.id);
    Ok(())
}
