/// Identity resolution and ownership checks
pub mod identity;

/// Serde helpers for partial updates
pub mod patch;

/// Store directory
pub mod store;

/// Household inventory catalog
pub mod inventory;

/// Per-store item prices
pub mod price;

/// Owner-scoped shopping lists
pub mod shopping_list;

/// Shopping list entries and the purchase workflow
pub mod shopping_list_item;

/// Cheapest-offer aggregation over the active shopping list
pub mod aggregator;
