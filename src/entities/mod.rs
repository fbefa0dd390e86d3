//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Field names are the storage (snake_case) naming; the serde attributes on each
//! `Model` give the API-facing (camelCase) naming.

pub mod inventory_item;
pub mod item_price;
pub mod shopping_list;
pub mod shopping_list_item;
pub mod store;

// Re-export specific types to avoid conflicts
pub use inventory_item::{
    Column as InventoryItemColumn, Entity as InventoryItem, Model as InventoryItemModel,
};
pub use item_price::{Column as ItemPriceColumn, Entity as ItemPrice, Model as ItemPriceModel};
pub use shopping_list::{
    Column as ShoppingListColumn, Entity as ShoppingList, Model as ShoppingListModel,
};
pub use shopping_list_item::{
    Column as ShoppingListItemColumn, Entity as ShoppingListItem, Model as ShoppingListItemModel,
};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
