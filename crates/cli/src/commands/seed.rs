//! Seed the database with demo accounts and products.
//!
//! Creates one seller and one customer (both with password `password123`)
//! and a handful of listings, so the API is usable right after
//! `bazaar-cli migrate`. Running it twice skips accounts that already
//! exist.

use rust_decimal::Decimal;
use secrecy::SecretString;

use bazaar_api::db::{ProductRepository, RepositoryError, UserRepository, create_pool};
use bazaar_api::models::NewProduct;
use bazaar_api::services::auth::hash_password;
use bazaar_core::{Email, Price, UserRole};

const DEMO_PASSWORD: &str = "password123";

const DEMO_PRODUCTS: &[(&str, &str, &str)] = &[
    ("Walnut desk lamp", "Mid-century lamp, rewired", "89.90"),
    ("Film camera", "35mm rangefinder, tested", "240.00"),
    ("Oak bookshelf", "Five shelves, some scratches", "120.50"),
    ("Vinyl record crate", "About 40 mixed LPs", "75.00"),
];

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BAZAAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "BAZAAR_DATABASE_URL not set")?;

    let pool = create_pool(&database_url).await?;
    tracing::info!("Connected to database");

    let users = UserRepository::new(&pool);
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let seller = match users
        .create(
            "Demo Seller",
            &Email::parse("seller@bazaar.test")?,
            &password_hash,
            UserRole::Seller,
        )
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Created demo seller");
            Some(user)
        }
        Err(RepositoryError::Conflict(_)) => {
            tracing::info!("Demo seller already exists, skipping");
            None
        }
        Err(e) => return Err(e.into()),
    };

    match users
        .create(
            "Demo Customer",
            &Email::parse("customer@bazaar.test")?,
            &password_hash,
            UserRole::Customer,
        )
        .await
    {
        Ok(user) => tracing::info!(user_id = %user.id, "Created demo customer"),
        Err(RepositoryError::Conflict(_)) => {
            tracing::info!("Demo customer already exists, skipping");
        }
        Err(e) => return Err(e.into()),
    }

    if let Some(seller) = seller {
        let products = ProductRepository::new(&pool);
        for (name, description, price) in DEMO_PRODUCTS {
            let product = products
                .create(
                    seller.id,
                    &NewProduct {
                        name: (*name).to_owned(),
                        description: (*description).to_owned(),
                        price: Price::new(price.parse::<Decimal>()?),
                        url: String::new(),
                    },
                )
                .await?;
            tracing::info!(product_id = %product.id, name, "Created demo product");
        }
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
