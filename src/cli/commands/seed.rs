use anyhow::Result;
use marketplace::users::{self, NewUser};
use model::entities::{property, property_image, user};
use model::{PropertyStatus, UserRole};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{debug, info, trace};

use crate::cli::commands::connect_and_migrate;

const LISTING_COUNT: usize = 50;

const CITIES: [(&str, &[&str]); 5] = [
    ("Brussels", &["Ixelles", "Etterbeek", "Uccle", "Saint-Gilles"]),
    ("Antwerp", &["Zurenborg", "Berchem", "Het Eilandje"]),
    ("Ghent", &["Patershol", "Sint-Pieters", "Ledeberg"]),
    ("Liège", &["Outremeuse", "Cointe", "Guillemins"]),
    ("Namur", &["Jambes", "Salzinnes", "Bomel"]),
];

const KINDS: [&str; 5] = ["Apartment", "Townhouse", "Loft", "Villa", "Studio"];

async fn seed_user(db: &DatabaseConnection, name: String, email: String, role: UserRole) -> Result<user::Model> {
    let user = users::create(
        db,
        NewUser {
            name,
            email,
            role,
            password_hash: None,
        },
    )
    .await?;
    debug!("Seeded {} {}", user.role, user.email);
    Ok(user)
}

/// Status for the n-th demo listing: mostly published, some pending and archived.
fn status_for(n: usize) -> PropertyStatus {
    match n % 6 {
        0 => PropertyStatus::Pending,
        5 => PropertyStatus::Archived,
        _ => PropertyStatus::Published,
    }
}

async fn seed_listing(db: &DatabaseConnection, n: usize, owner: &user::Model) -> Result<usize> {
    let (city, neighborhoods) = CITIES[n % CITIES.len()];
    let neighborhood = neighborhoods[n % neighborhoods.len()];
    let kind = KINDS[n % KINDS.len()];
    let bedrooms = (n % 6) as i32 + 1;

    let listing = property::ActiveModel {
        title: Set(format!("{} in {}", kind, neighborhood)),
        description: Set(format!(
            "Bright {} with {} bedrooms in the {} area of {}. Close to shops and public transport.",
            kind.to_lowercase(),
            bedrooms,
            neighborhood,
            city
        )),
        price: Set(Decimal::new(10_000_000 + (n as i64 * 3_753_117) % 190_000_000, 2)),
        surface_area: Set(50 + ((n * 37) % 450) as i32),
        bedrooms: Set(bedrooms),
        city: Set(city.to_string()),
        neighborhood: Set(neighborhood.to_string()),
        status: Set(status_for(n)),
        user_id: Set(owner.id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let image_count = n % 5 + 1;
    for sort_order in 0..image_count {
        property_image::ActiveModel {
            property_id: Set(listing.id),
            path: Set(format!("properties/seed-{}-{}.jpg", listing.id, sort_order)),
            alt_text: Set(Some(format!("{} - Image {}", listing.title, sort_order + 1))),
            sort_order: Set(sort_order as i32),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(image_count)
}

pub async fn seed(database_url: &str) -> Result<()> {
    trace!("Entering seed function");
    let db = connect_and_migrate(database_url).await?;

    info!("Seeding users");
    seed_user(&db, "Admin User".to_string(), "admin@kj-immo.com".to_string(), UserRole::Admin).await?;

    let mut agents = Vec::new();
    for i in 1..=3 {
        agents.push(seed_user(&db, format!("Agent {}", i), format!("agent{}@kj-immo.com", i), UserRole::Agent).await?);
    }
    for i in 1..=6 {
        seed_user(&db, format!("Client {}", i), format!("client{}@example.com", i), UserRole::Client).await?;
    }
    seed_user(&db, "Test User".to_string(), "test@example.com".to_string(), UserRole::Client).await?;

    info!("Seeding {} listings", LISTING_COUNT);
    let mut image_total = 0;
    for n in 0..LISTING_COUNT {
        image_total += seed_listing(&db, n, &agents[n % agents.len()]).await?;
    }

    info!(
        "Seed completed: 11 users, {} listings, {} image records",
        LISTING_COUNT, image_total
    );
    Ok(())
}
