//! Shopping list entity - A named, owner-scoped grouping of shopping list items.
//!
//! Only the identity in `created_by` can see or change a list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shopping list database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_lists")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the list
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the list (e.g., "Weekend run")
    pub name: String,
    /// Store the list is planned for, if any
    pub store_id: Option<i64>,
    /// When the list was created
    pub created_at: DateTimeUtc,
    /// When the list was last modified
    pub updated_at: DateTimeUtc,
    /// Owner of the list
    pub created_by: String,
    /// Identity that last modified the list
    pub updated_by: String,
}

/// Defines relationships between ShoppingList and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A list may target one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    /// One list has many entries
    #[sea_orm(has_many = "super::shopping_list_item::Entity")]
    Items,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::shopping_list_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
