//! Database configuration module for the pantry planner.
//!
//! This module handles the `SQLite` connection lifecycle and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! once, at startup, so the storage schema always matches the Rust structs.

use crate::entities::{InventoryItem, ItemPrice, ShoppingList, ShoppingListItem, Store};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/pantry_planner.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection pool for `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first, so a fresh
/// checkout can start without any manual setup.
pub async fn open(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Opening database connection to {database_url}");
    let db = Database::connect(database_url).await?;
    info!("Database connection opened");
    Ok(db)
}

/// Establishes a connection using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    open(&get_database_url()).await
}

/// Closes the connection pool. Call once at shutdown.
pub async fn close(db: DatabaseConnection) -> Result<()> {
    db.close().await?;
    info!("Database connection closed");
    Ok(())
}

/// Creates all tables that do not exist yet, parents before children.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Store).await?;
    create_table(db, &schema, InventoryItem).await?;
    create_table(db, &schema, ItemPrice).await?;
    create_table(db, &schema, ShoppingList).await?;
    create_table(db, &schema, ShoppingListItem).await?;

    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement))
        .await?;
    Ok(())
}

/// Directory holding a file-backed `SQLite` database, if the URL names one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}
