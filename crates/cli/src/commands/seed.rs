//! Seed default site settings and demo categories.
//!
//! Existing rows are never overwritten, so seeding is safe to repeat and
//! never clobbers values edited in the admin panel.

use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::info;

use velora_admin::db::SettingsRepository;
use velora_core::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_SITE_NAME, ThemeColors, generate_slug, keys};

/// Categories created on a fresh database.
const DEMO_CATEGORIES: &[&str] = &[
    "Electronics",
    "Fashion",
    "Home & Kitchen",
    "Beauty",
    "Sports & Outdoors",
];

/// Settings a fresh install starts with. SMTP credentials are left unset.
fn default_settings() -> Vec<(String, Value)> {
    let mut settings = vec![
        (keys::SITE_NAME.to_owned(), json!(DEFAULT_SITE_NAME)),
        (keys::CURRENCY_SYMBOL.to_owned(), json!(DEFAULT_CURRENCY_SYMBOL)),
        (keys::SMTP_PORT.to_owned(), json!("587")),
        (keys::SMTP_SECURE.to_owned(), json!(false)),
    ];
    if let Ok(Value::Object(theme)) = serde_json::to_value(ThemeColors::default()) {
        settings.extend(theme);
    }
    settings
}

/// Insert default settings and demo categories that are not present yet.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a query fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let settings = seed_settings(&pool).await?;
    let categories = seed_categories(&pool).await?;

    info!("Seeding complete!");
    info!("  Settings inserted: {settings}");
    info!("  Categories inserted: {categories}");
    Ok(())
}

async fn seed_settings(pool: &PgPool) -> Result<usize, Box<dyn std::error::Error>> {
    let repo = SettingsRepository::new(pool);
    let mut inserted = 0;
    for (key, value) in default_settings() {
        if repo.insert_default(&key, &value).await? {
            info!(key = %key, "Setting added");
            inserted += 1;
        }
    }
    Ok(inserted)
}

async fn seed_categories(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for name in DEMO_CATEGORIES {
        let result = sqlx::query(
            r"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(name)
        .bind(generate_slug(name))
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}
