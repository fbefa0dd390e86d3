//! Item price entity - What one store charges for one inventory item.
//!
//! Old prices are kept for history with `is_current = false`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item price database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item_prices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the price row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item being priced
    pub inventory_item_id: i64,
    /// Store offering the price
    pub store_id: i64,
    /// Price per `unit_of_measure`, always positive
    pub price: f64,
    /// Unit the price applies to
    pub unit_of_measure: String,
    /// Whether this is the active price for its (item, store) pair
    pub is_current: bool,
    /// When the price was last confirmed
    pub last_updated: DateTimeUtc,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ItemPrice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one inventory item
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::InventoryItemId",
        to = "super::inventory_item::Column::Id"
    )]
    InventoryItem,
    /// Each price belongs to one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
