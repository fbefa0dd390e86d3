//! Inventory catalog - CRUD over inventory items plus low-stock detection.
//!
//! Items are soft-deleted (`is_active = false`). The low-stock predicate
//! (`current_quantity < minimum_quantity`) is evaluated after rows are fetched,
//! so it composes with every other filter.

use crate::{
    core::{identity::Identity, patch::nullable},
    entities::{InventoryItem, inventory_item},
    errors::{Error, Result, StoreContext},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Unit recorded when the caller does not name one.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "each";

/// Number of rows returned by [`list_recently_updated_items`] when no limit is given.
pub const DEFAULT_RECENTLY_UPDATED_LIMIT: u64 = 10;

/// Optional filters for [`list_inventory_items`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    /// Only items in this category
    pub category: Option<String>,
    /// Only active (true) or only deactivated (false) items
    pub is_active: Option<bool>,
    /// When true, only items below their restock threshold
    pub low_stock: Option<bool>,
}

/// Input for [`create_inventory_item`]. Omitted quantities default to zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    /// Item name, required
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Grouping such as "pantry" or "cleaning"
    pub category: Option<String>,
    /// Brand name
    pub brand: Option<String>,
    /// Barcode as printed on the package
    pub barcode: Option<String>,
    /// Unit quantities are counted in, defaults to "each"
    pub unit_of_measure: Option<String>,
    /// Amount on hand
    pub current_quantity: Option<f64>,
    /// Restock threshold
    pub minimum_quantity: Option<f64>,
    /// Upper bound, not below the minimum
    pub maximum_quantity: Option<f64>,
    /// Best-before date
    pub expiration_date: Option<NaiveDate>,
    /// When the stock on hand was bought
    pub purchase_date: Option<NaiveDate>,
    /// Price paid per unit
    pub cost_per_unit: Option<f64>,
    /// Where the item is kept
    pub storage_location: Option<String>,
}

/// Partial update for [`update_inventory_item`].
///
/// `None` leaves a field untouched. Nullable fields are doubly optional:
/// `Some(None)` (an explicit `null`) clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemChanges {
    /// New name, must not be blank
    pub name: Option<String>,
    /// New description, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// New category, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    /// New brand, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub brand: Option<Option<String>>,
    /// New barcode, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub barcode: Option<Option<String>>,
    /// New unit of measure
    pub unit_of_measure: Option<String>,
    /// New amount on hand
    pub current_quantity: Option<f64>,
    /// New restock threshold
    pub minimum_quantity: Option<f64>,
    /// New upper bound, or `Some(None)` to remove it
    #[serde(default, deserialize_with = "nullable")]
    pub maximum_quantity: Option<Option<f64>>,
    /// New best-before date, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub expiration_date: Option<Option<NaiveDate>>,
    /// New purchase date, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_date: Option<Option<NaiveDate>>,
    /// New cost per unit, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub cost_per_unit: Option<Option<f64>>,
    /// New storage location, or `Some(None)` to clear
    #[serde(default, deserialize_with = "nullable")]
    pub storage_location: Option<Option<String>>,
    /// Reactivate (true) or deactivate (false) the item
    pub is_active: Option<bool>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Inventory item name cannot be empty"));
    }
    Ok(())
}

/// Checks the quantity invariants of an inventory item.
///
/// Quantities must be finite and non-negative, and a maximum, when present,
/// must not be below the minimum.
fn validate_quantities(current: f64, minimum: f64, maximum: Option<f64>) -> Result<()> {
    if !current.is_finite() || current < 0.0 {
        return Err(Error::validation(format!(
            "Current quantity must be a non-negative number, got {current}"
        )));
    }
    if !minimum.is_finite() || minimum < 0.0 {
        return Err(Error::validation(format!(
            "Minimum quantity must be a non-negative number, got {minimum}"
        )));
    }
    if let Some(maximum) = maximum {
        if !maximum.is_finite() || maximum < minimum {
            return Err(Error::validation(format!(
                "Maximum quantity {maximum} is below minimum quantity {minimum}"
            )));
        }
    }
    Ok(())
}

fn validate_cost(cost_per_unit: Option<f64>) -> Result<()> {
    match cost_per_unit {
        Some(cost) if !cost.is_finite() || cost < 0.0 => Err(Error::validation(format!(
            "Cost per unit must be a non-negative number, got {cost}"
        ))),
        _ => Ok(()),
    }
}

fn retain_low_stock(items: Vec<inventory_item::Model>) -> Vec<inventory_item::Model> {
    items.into_iter().filter(inventory_item::Model::is_low_stock).collect()
}

/// Lists inventory items ordered by name.
///
/// `category` and `is_active` are pushed into the query; `low_stock` is applied
/// to the fetched rows.
pub async fn list_inventory_items(
    db: &DatabaseConnection,
    filter: &InventoryFilter,
) -> Result<Vec<inventory_item::Model>> {
    let mut query = InventoryItem::find();
    if let Some(category) = &filter.category {
        query = query.filter(inventory_item::Column::Category.eq(category.as_str()));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(inventory_item::Column::IsActive.eq(active));
    }

    let items = query
        .order_by_asc(inventory_item::Column::Name)
        .order_by_asc(inventory_item::Column::Id)
        .all(db)
        .await
        .context("fetch inventory items")?;

    if filter.low_stock == Some(true) {
        Ok(retain_low_stock(items))
    } else {
        Ok(items)
    }
}

/// Fetches an inventory item by id, active or not.
///
/// # Errors
/// Returns [`Error::NotFound`] if no item has this id.
pub async fn get_inventory_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<inventory_item::Model> {
    InventoryItem::find_by_id(item_id)
        .one(db)
        .await
        .context("fetch inventory item")?
        .ok_or(Error::NotFound {
            entity: "inventory item",
            id: item_id,
        })
}

/// Lists active items in one category, ordered by name.
pub async fn list_inventory_items_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .filter(inventory_item::Column::Category.eq(category))
        .filter(inventory_item::Column::IsActive.eq(true))
        .order_by_asc(inventory_item::Column::Name)
        .order_by_asc(inventory_item::Column::Id)
        .all(db)
        .await
        .context("fetch inventory items by category")
}

/// Lists active items that are below their restock threshold, grouped by category.
pub async fn list_low_stock_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    let items = InventoryItem::find()
        .filter(inventory_item::Column::IsActive.eq(true))
        .order_by_asc(inventory_item::Column::Category)
        .order_by_asc(inventory_item::Column::Name)
        .order_by_asc(inventory_item::Column::Id)
        .all(db)
        .await
        .context("fetch low stock items")?;
    Ok(retain_low_stock(items))
}

/// Lists items created by `identity`, ordered by name.
pub async fn list_items_created_by(
    db: &DatabaseConnection,
    identity: &Identity,
    category: Option<&str>,
    is_active: Option<bool>,
) -> Result<Vec<inventory_item::Model>> {
    let mut query =
        InventoryItem::find().filter(inventory_item::Column::CreatedBy.eq(identity.as_str()));
    if let Some(category) = category {
        query = query.filter(inventory_item::Column::Category.eq(category));
    }
    if let Some(active) = is_active {
        query = query.filter(inventory_item::Column::IsActive.eq(active));
    }
    query
        .order_by_asc(inventory_item::Column::Name)
        .order_by_asc(inventory_item::Column::Id)
        .all(db)
        .await
        .context("fetch my inventory items")
}

/// Lists the items `identity` touched most recently, newest first.
pub async fn list_recently_updated_items(
    db: &DatabaseConnection,
    identity: &Identity,
    limit: Option<u64>,
) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .filter(inventory_item::Column::UpdatedBy.eq(identity.as_str()))
        .order_by_desc(inventory_item::Column::UpdatedAt)
        .order_by_desc(inventory_item::Column::Id)
        .limit(limit.unwrap_or(DEFAULT_RECENTLY_UPDATED_LIMIT))
        .all(db)
        .await
        .context("fetch recently updated items")
}

/// Creates an active inventory item stamped with the acting identity.
///
/// Unit of measure defaults to [`DEFAULT_UNIT_OF_MEASURE`]; current and minimum
/// quantities default to zero.
///
/// # Errors
/// Returns [`Error::Validation`] if the name is blank or the quantities break
/// the item invariants.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_inventory_item(
    db: &DatabaseConnection,
    identity: &Identity,
    input: NewInventoryItem,
) -> Result<inventory_item::Model> {
    validate_name(&input.name)?;
    let current_quantity = input.current_quantity.unwrap_or(0.0);
    let minimum_quantity = input.minimum_quantity.unwrap_or(0.0);
    validate_quantities(current_quantity, minimum_quantity, input.maximum_quantity)?;
    validate_cost(input.cost_per_unit)?;

    let now = chrono::Utc::now();
    let item = inventory_item::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        category: Set(input.category),
        brand: Set(input.brand),
        barcode: Set(input.barcode),
        unit_of_measure: Set(input
            .unit_of_measure
            .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string())),
        current_quantity: Set(current_quantity),
        minimum_quantity: Set(minimum_quantity),
        maximum_quantity: Set(input.maximum_quantity),
        expiration_date: Set(input.expiration_date),
        purchase_date: Set(input.purchase_date),
        cost_per_unit: Set(input.cost_per_unit),
        storage_location: Set(input.storage_location),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(identity.to_string()),
        updated_by: Set(identity.to_string()),
        ..Default::default()
    };
    let created = item.insert(db).await.context("create inventory item")?;
    debug!(item_id = created.id, "Inventory item created");
    Ok(created)
}

/// Applies a partial update to an inventory item.
///
/// Only supplied fields change; `updated_by` and `updated_at` are always
/// re-stamped. The invariants are checked against the merged record.
///
/// # Errors
/// Returns [`Error::NotFound`] if the item does not exist, or
/// [`Error::Validation`] if the merged record would break an invariant.
#[instrument(skip(db, changes))]
pub async fn update_inventory_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
    changes: InventoryItemChanges,
) -> Result<inventory_item::Model> {
    let existing = get_inventory_item_by_id(db, item_id).await?;

    if let Some(name) = &changes.name {
        validate_name(name)?;
    }
    validate_quantities(
        changes.current_quantity.unwrap_or(existing.current_quantity),
        changes.minimum_quantity.unwrap_or(existing.minimum_quantity),
        changes.maximum_quantity.unwrap_or(existing.maximum_quantity),
    )?;
    validate_cost(changes.cost_per_unit.flatten())?;

    let mut item: inventory_item::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        item.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        item.description = Set(description);
    }
    if let Some(category) = changes.category {
        item.category = Set(category);
    }
    if let Some(brand) = changes.brand {
        item.brand = Set(brand);
    }
    if let Some(barcode) = changes.barcode {
        item.barcode = Set(barcode);
    }
    if let Some(unit) = changes.unit_of_measure {
        item.unit_of_measure = Set(unit);
    }
    if let Some(quantity) = changes.current_quantity {
        item.current_quantity = Set(quantity);
    }
    if let Some(quantity) = changes.minimum_quantity {
        item.minimum_quantity = Set(quantity);
    }
    if let Some(quantity) = changes.maximum_quantity {
        item.maximum_quantity = Set(quantity);
    }
    if let Some(date) = changes.expiration_date {
        item.expiration_date = Set(date);
    }
    if let Some(date) = changes.purchase_date {
        item.purchase_date = Set(date);
    }
    if let Some(cost) = changes.cost_per_unit {
        item.cost_per_unit = Set(cost);
    }
    if let Some(location) = changes.storage_location {
        item.storage_location = Set(location);
    }
    if let Some(active) = changes.is_active {
        item.is_active = Set(active);
    }
    item.updated_by = Set(identity.to_string());
    item.updated_at = Set(chrono::Utc::now());

    item.update(db).await.context("update inventory item")
}

/// Soft deletes an inventory item by marking it inactive.
///
/// # Errors
/// Returns [`Error::NotFound`] if the item does not exist.
#[instrument(skip(db))]
pub async fn deactivate_inventory_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
) -> Result<inventory_item::Model> {
    let mut item: inventory_item::ActiveModel =
        get_inventory_item_by_id(db, item_id).await?.into();
    item.is_active = Set(false);
    item.updated_by = Set(identity.to_string());
    item.updated_at = Set(chrono::Utc::now());
    item.update(db).await.context("delete inventory item")
}
