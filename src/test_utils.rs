//! Shared test utilities for the pantry planner.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        identity::Identity,
        inventory::{self, NewInventoryItem},
        price::{self, NewItemPrice},
        shopping_list::{self, NewShoppingList},
        shopping_list_item::{self, NewShoppingListItem, Priority},
        store::{self, NewStore},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The household member most tests act as.
pub fn alice() -> Identity {
    Identity::new("alice")
}

/// A second household member, for ownership checks.
pub fn sam() -> Identity {
    Identity::new("sam")
}

/// Creates an active store with only a name, as alice.
pub async fn create_test_store(db: &DatabaseConnection, name: &str) -> Result<entities::store::Model> {
    store::create_store(
        db,
        &alice(),
        NewStore {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an inventory item with sensible defaults, as alice.
///
/// # Defaults
/// * `category`: None
/// * `current_quantity` / `minimum_quantity`: 0.0
/// * `unit_of_measure`: "each"
pub async fn create_test_inventory_item(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::inventory_item::Model> {
    inventory::create_inventory_item(
        db,
        &alice(),
        NewInventoryItem {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an inventory item in a category with explicit stock levels, as alice.
/// Use this when a test depends on the low-stock rule.
pub async fn create_stocked_item(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    current_quantity: f64,
    minimum_quantity: f64,
) -> Result<entities::inventory_item::Model> {
    inventory::create_inventory_item(
        db,
        &alice(),
        NewInventoryItem {
            name: name.to_string(),
            category: Some(category.to_string()),
            current_quantity: Some(current_quantity),
            minimum_quantity: Some(minimum_quantity),
            ..Default::default()
        },
    )
    .await
}

/// Records a current price through the regular price book path.
pub async fn create_test_price(
    db: &DatabaseConnection,
    inventory_item_id: i64,
    store_id: i64,
    price: f64,
) -> Result<entities::item_price::Model> {
    price::record_price(
        db,
        NewItemPrice {
            inventory_item_id,
            store_id,
            price,
            unit_of_measure: None,
        },
    )
    .await
}

/// Creates a shopping list owned by `identity`.
pub async fn create_test_list(
    db: &DatabaseConnection,
    identity: &Identity,
    name: &str,
    store_id: Option<i64>,
) -> Result<entities::shopping_list::Model> {
    shopping_list::create_shopping_list(
        db,
        identity,
        NewShoppingList {
            name: name.to_string(),
            store_id,
        },
    )
    .await
}

/// Creates an outstanding entry for one unit of an item.
///
/// # Defaults
/// * `quantity_needed`: 1.0
/// * `priority`: low
pub async fn create_test_entry(
    db: &DatabaseConnection,
    identity: &Identity,
    inventory_item_id: i64,
    shopping_list_id: Option<i64>,
) -> Result<entities::shopping_list_item::Model> {
    shopping_list_item::create_shopping_list_item(
        db,
        identity,
        NewShoppingListItem {
            inventory_item_id,
            shopping_list_id,
            quantity_needed: 1.0,
            priority: None,
            notes: None,
        },
    )
    .await
}

/// Creates a loose entry with the given priority, as alice.
pub async fn create_entry_with_priority(
    db: &DatabaseConnection,
    inventory_item_id: i64,
    priority: Priority,
) -> Result<entities::shopping_list_item::Model> {
    shopping_list_item::create_shopping_list_item(
        db,
        &alice(),
        NewShoppingListItem {
            inventory_item_id,
            shopping_list_id: None,
            quantity_needed: 1.0,
            priority: Some(priority),
            notes: None,
        },
    )
    .await
}
