//! Store entity - A vendor where inventory items can be bought.
//!
//! Stores are referenced by item prices and, optionally, by shopping lists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Store database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Corner Market")
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Inactive stores are kept for price history but hidden from pickers
    pub is_active: bool,
    /// When the store was created
    pub created_at: DateTimeUtc,
    /// When the store was last modified
    pub updated_at: DateTimeUtc,
    /// Identity that created the store
    pub created_by: String,
    /// Identity that last modified the store
    pub updated_by: String,
}

/// Defines relationships between Store and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One store has many prices
    #[sea_orm(has_many = "super::item_price::Entity")]
    ItemPrices,
    /// One store may be the target of many shopping lists
    #[sea_orm(has_many = "super::shopping_list::Entity")]
    ShoppingLists,
}

impl Related<super::item_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemPrices.def()
    }
}

impl Related<super::shopping_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoppingLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
