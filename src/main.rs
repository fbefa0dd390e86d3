use dotenvy::dotenv;
use pantry_planner::{
    api::ApiContext,
    config::{app, database},
    core::{
        identity::{Identity, StaticTokenVerifier},
        store,
    },
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = app::load_default_config()
        .inspect_err(|e| error!("Failed to load application configuration: {e}"))?;

    // 4. Open the database and register the schema once
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to open database: {e}"))?;
    database::create_tables(&db).await?;

    // 5. Seed the configured stores
    let seeded = store::seed_stores(&db, &app_config.stores, &Identity::system()).await?;
    info!(seeded, "Store directory ready");

    // 6. Build the operation surface a transport would bind to
    if app_config.identities.is_empty() {
        warn!("No identities configured, guarded operations will reject every credential");
    }
    let verifier = StaticTokenVerifier::from_config(&app_config.identities);
    let api = ApiContext::new(db, Arc::new(verifier))
        .with_max_concurrent_lookups(app_config.pricing.max_concurrent_lookups);

    for item in api.low_stock_items().await? {
        info!(
            item = %item.name,
            current = item.current_quantity,
            minimum = item.minimum_quantity,
            "Low stock"
        );
    }
    for offer in api.cheapest_prices_for_shopping_list().await? {
        let item = offer.inventory_item.map(|i| i.name).unwrap_or_default();
        let store = offer.store.map(|s| s.name).unwrap_or_default();
        info!(
            %item,
            %store,
            price = offer.item_price.price,
            "Cheapest current offer"
        );
    }

    api.close().await
}
