//! Inventory item entity - Something the household keeps on hand.
//!
//! Tracks how much is in stock (`current_quantity`) against a restock threshold
//! (`minimum_quantity`). Items are never hard-deleted; `is_active = false` hides them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the item (e.g., "Olive Oil")
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Grouping such as "pantry" or "cleaning"
    pub category: Option<String>,
    /// Manufacturer or label
    pub brand: Option<String>,
    /// UPC/EAN code
    pub barcode: Option<String>,
    /// Unit the quantities are counted in (defaults to "each")
    pub unit_of_measure: String,
    /// Amount currently on hand, never negative
    pub current_quantity: f64,
    /// Restock threshold, never negative
    pub minimum_quantity: f64,
    /// Optional storage cap, at least `minimum_quantity` when present
    pub maximum_quantity: Option<f64>,
    /// Best-before date of the stock on hand
    pub expiration_date: Option<Date>,
    /// When the stock on hand was bought
    pub purchase_date: Option<Date>,
    /// Last known cost of one unit
    pub cost_per_unit: Option<f64>,
    /// Where the item is kept (e.g., "garage shelf")
    pub storage_location: Option<String>,
    /// Soft delete flag - false hides the item but keeps its history
    pub is_active: bool,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
    /// Identity that created the item
    pub created_by: String,
    /// Identity that last modified the item
    pub updated_by: String,
}

impl Model {
    /// An item is low on stock when it holds less than its restock threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity < self.minimum_quantity
    }
}

/// Defines relationships between InventoryItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item has many prices across stores
    #[sea_orm(has_many = "super::item_price::Entity")]
    ItemPrices,
    /// One item can appear on many shopping list entries
    #[sea_orm(has_many = "super::shopping_list_item::Entity")]
    ShoppingListItems,
}

impl Related<super::item_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemPrices.def()
    }
}

impl Related<super::shopping_list_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoppingListItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
