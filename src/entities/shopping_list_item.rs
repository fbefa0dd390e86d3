//! Shopping list item entity - One thing to buy, optionally attached to a list.
//!
//! `purchased_at` and `purchased_by` are set exactly when `is_purchased` is true.
//! Once purchased, an entry stays purchased.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shopping list item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_list_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// List this entry belongs to; None for loose entries
    pub shopping_list_id: Option<i64>,
    /// Item to buy
    pub inventory_item_id: i64,
    /// How much to buy, always positive
    pub quantity_needed: f64,
    /// Urgency, 1 (low) through 3 (high)
    pub priority: i32,
    /// Free-form notes (e.g., "the big bottle")
    pub notes: Option<String>,
    /// Whether the entry has been bought
    pub is_purchased: bool,
    /// When the entry was bought
    pub purchased_at: Option<DateTimeUtc>,
    /// Identity that bought the entry
    pub purchased_by: Option<String>,
    /// When the entry was created
    pub created_at: DateTimeUtc,
    /// When the entry was last modified
    pub updated_at: DateTimeUtc,
    /// Identity that created the entry
    pub created_by: String,
    /// Identity that last modified the entry
    pub updated_by: String,
}

/// Defines relationships between ShoppingListItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Entries detach from a list when the list is deleted
    #[sea_orm(
        belongs_to = "super::shopping_list::Entity",
        from = "Column::ShoppingListId",
        to = "super::shopping_list::Column::Id",
        on_delete = "SetNull"
    )]
    ShoppingList,
    /// Each entry refers to one inventory item
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::InventoryItemId",
        to = "super::inventory_item::Column::Id"
    )]
    InventoryItem,
}

impl Related<super::shopping_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoppingList.def()
    }
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
