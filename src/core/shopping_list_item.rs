//! Shopping list entries - What to buy, how urgently, and who bought it.
//!
//! Entries move one way through the purchase workflow:
//!
//! ```text
//! NotPurchased --mark_purchased / update(is_purchased = true)--> Purchased
//! ```
//!
//! Entering `Purchased` stamps `purchased_at` and `purchased_by` together with
//! `is_purchased`. Nothing moves an entry back. Mutations are limited to the
//! identity that created the entry; the bare listings are household-wide.

use crate::{
    core::{
        identity::{Identity, authorize_owner},
        inventory::get_inventory_item_by_id,
        patch::nullable,
        shopping_list::get_shopping_list,
    },
    entities::{ShoppingListItem, shopping_list_item},
    errors::{Error, Result, StoreContext},
};
use sea_orm::{QueryOrder, QuerySelect, Select, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Number of rows returned by [`list_items_purchased_by`] when no limit is given.
pub const DEFAULT_PURCHASED_LIMIT: u64 = 20;

/// Number of rows returned by [`list_recently_added_items`] when no limit is given.
pub const DEFAULT_RECENTLY_ADDED_LIMIT: u64 = 10;

/// How urgently an entry is needed. Higher sorts first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub enum Priority {
    /// Buy whenever convenient
    #[default]
    Low = 1,
    /// Buy on the next regular trip
    Medium = 2,
    /// Buy as soon as possible
    High = 3,
}

impl TryFrom<i32> for Priority {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(Error::validation(format!(
                "Priority must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority as Self
    }
}

/// Optional filters for [`list_shopping_list_items`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    /// Only purchased (true) or only outstanding (false) entries
    pub is_purchased: Option<bool>,
    /// Only entries with this priority
    pub priority: Option<Priority>,
    /// Only entries attached to this list
    pub shopping_list_id: Option<i64>,
}

/// Input for [`create_shopping_list_item`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingListItem {
    /// Item to buy
    pub inventory_item_id: i64,
    /// List to attach the entry to; must belong to the caller
    pub shopping_list_id: Option<i64>,
    /// How much to buy, must be positive
    pub quantity_needed: f64,
    /// Urgency, defaults to [`Priority::Low`]
    pub priority: Option<Priority>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Partial update for [`update_shopping_list_item`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItemChanges {
    /// New quantity, must be positive
    pub quantity_needed: Option<f64>,
    /// New urgency
    pub priority: Option<Priority>,
    /// New notes, or `Some(None)` to clear them
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    /// `Some(true)` purchases the entry; `Some(false)` is refused once purchased
    pub is_purchased: Option<bool>,
}

fn validate_quantity_needed(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::validation(format!(
            "Quantity needed must be a positive number, got {quantity}"
        )));
    }
    Ok(())
}

/// Highest priority first, then oldest first.
pub(crate) fn in_default_order(query: Select<ShoppingListItem>) -> Select<ShoppingListItem> {
    query
        .order_by_desc(shopping_list_item::Column::Priority)
        .order_by_asc(shopping_list_item::Column::CreatedAt)
        .order_by_asc(shopping_list_item::Column::Id)
}

/// Outstanding entries in default order.
pub(crate) fn active_items_query() -> Select<ShoppingListItem> {
    in_default_order(
        ShoppingListItem::find().filter(shopping_list_item::Column::IsPurchased.eq(false)),
    )
}

fn stamp_purchase(
    entry: &mut shopping_list_item::ActiveModel,
    identity: &Identity,
    now: DateTimeUtc,
) {
    entry.is_purchased = Set(true);
    entry.purchased_at = Set(Some(now));
    entry.purchased_by = Set(Some(identity.to_string()));
}

/// Lists entries, highest priority first and oldest first within a priority.
pub async fn list_shopping_list_items(
    db: &DatabaseConnection,
    filter: &ItemFilter,
) -> Result<Vec<shopping_list_item::Model>> {
    let mut query = ShoppingListItem::find();
    if let Some(purchased) = filter.is_purchased {
        query = query.filter(shopping_list_item::Column::IsPurchased.eq(purchased));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(shopping_list_item::Column::Priority.eq(i32::from(priority)));
    }
    if let Some(list_id) = filter.shopping_list_id {
        query = query.filter(shopping_list_item::Column::ShoppingListId.eq(list_id));
    }
    in_default_order(query)
        .all(db)
        .await
        .context("fetch shopping list items")
}

/// Fetches an entry by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no entry has this id.
pub async fn get_shopping_list_item(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<shopping_list_item::Model> {
    ShoppingListItem::find_by_id(item_id)
        .one(db)
        .await
        .context("fetch shopping list item")?
        .ok_or(Error::NotFound {
            entity: "shopping list item",
            id: item_id,
        })
}

/// Lists every outstanding entry in default order.
pub async fn list_active_items(db: &DatabaseConnection) -> Result<Vec<shopping_list_item::Model>> {
    active_items_query()
        .all(db)
        .await
        .context("fetch active shopping list")
}

/// Lists outstanding high-priority entries, oldest first.
pub async fn list_high_priority_items(
    db: &DatabaseConnection,
) -> Result<Vec<shopping_list_item::Model>> {
    ShoppingListItem::find()
        .filter(shopping_list_item::Column::IsPurchased.eq(false))
        .filter(shopping_list_item::Column::Priority.eq(i32::from(Priority::High)))
        .order_by_asc(shopping_list_item::Column::CreatedAt)
        .order_by_asc(shopping_list_item::Column::Id)
        .all(db)
        .await
        .context("fetch high priority shopping list")
}

/// Lists entries created by `identity` in default order.
pub async fn list_items_created_by(
    db: &DatabaseConnection,
    identity: &Identity,
    is_purchased: Option<bool>,
) -> Result<Vec<shopping_list_item::Model>> {
    let mut query = ShoppingListItem::find()
        .filter(shopping_list_item::Column::CreatedBy.eq(identity.as_str()));
    if let Some(purchased) = is_purchased {
        query = query.filter(shopping_list_item::Column::IsPurchased.eq(purchased));
    }
    in_default_order(query)
        .all(db)
        .await
        .context("fetch my shopping list")
}

/// Lists entries purchased by `identity`, most recent purchase first.
pub async fn list_items_purchased_by(
    db: &DatabaseConnection,
    identity: &Identity,
    limit: Option<u64>,
) -> Result<Vec<shopping_list_item::Model>> {
    ShoppingListItem::find()
        .filter(shopping_list_item::Column::PurchasedBy.eq(identity.as_str()))
        .order_by_desc(shopping_list_item::Column::PurchasedAt)
        .order_by_desc(shopping_list_item::Column::Id)
        .limit(limit.unwrap_or(DEFAULT_PURCHASED_LIMIT))
        .all(db)
        .await
        .context("fetch my purchased items")
}

/// Lists entries `identity` added most recently, newest first.
pub async fn list_recently_added_items(
    db: &DatabaseConnection,
    identity: &Identity,
    limit: Option<u64>,
) -> Result<Vec<shopping_list_item::Model>> {
    ShoppingListItem::find()
        .filter(shopping_list_item::Column::CreatedBy.eq(identity.as_str()))
        .order_by_desc(shopping_list_item::Column::CreatedAt)
        .order_by_desc(shopping_list_item::Column::Id)
        .limit(limit.unwrap_or(DEFAULT_RECENTLY_ADDED_LIMIT))
        .all(db)
        .await
        .context("fetch recently added items")
}

/// Adds an outstanding entry stamped with the acting identity.
///
/// # Errors
/// Returns:
/// - [`Error::Validation`] if the quantity is not positive
/// - [`Error::NotFound`] if the inventory item does not exist, or the target
///   list does not exist or belongs to someone else
#[instrument(skip(db, input), fields(item = input.inventory_item_id))]
pub async fn create_shopping_list_item(
    db: &DatabaseConnection,
    identity: &Identity,
    input: NewShoppingListItem,
) -> Result<shopping_list_item::Model> {
    validate_quantity_needed(input.quantity_needed)?;
    get_inventory_item_by_id(db, input.inventory_item_id).await?;
    if let Some(list_id) = input.shopping_list_id {
        get_shopping_list(db, identity, list_id).await?;
    }

    let now = chrono::Utc::now();
    let entry = shopping_list_item::ActiveModel {
        shopping_list_id: Set(input.shopping_list_id),
        inventory_item_id: Set(input.inventory_item_id),
        quantity_needed: Set(input.quantity_needed),
        priority: Set(input.priority.unwrap_or_default().into()),
        notes: Set(input.notes),
        is_purchased: Set(false),
        purchased_at: Set(None),
        purchased_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(identity.to_string()),
        updated_by: Set(identity.to_string()),
        ..Default::default()
    };
    let created = entry
        .insert(db)
        .await
        .context("create shopping list item")?;
    debug!(entry_id = created.id, "Shopping list item created");
    Ok(created)
}

/// Fetches an entry and checks that `identity` created it.
async fn find_owned_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
) -> Result<shopping_list_item::Model> {
    let entry = get_shopping_list_item(db, item_id).await?;
    authorize_owner(identity, "shopping list item", item_id, &entry.created_by)?;
    Ok(entry)
}

/// Applies a partial update to an entry.
///
/// Setting `is_purchased` to true behaves like [`mark_purchased`] without notes.
///
/// # Errors
/// Returns:
/// - [`Error::NotFound`] if the entry does not exist
/// - [`Error::Authorization`] if the caller did not create the entry
/// - [`Error::Validation`] for a non-positive quantity or an attempt to un-purchase
#[instrument(skip(db, changes))]
pub async fn update_shopping_list_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
    changes: ShoppingListItemChanges,
) -> Result<shopping_list_item::Model> {
    let existing = find_owned_item(db, identity, item_id).await?;

    if let Some(quantity) = changes.quantity_needed {
        validate_quantity_needed(quantity)?;
    }
    if changes.is_purchased == Some(false) && existing.is_purchased {
        return Err(Error::validation(
            "A purchased shopping list item cannot be marked unpurchased",
        ));
    }

    let now = chrono::Utc::now();
    let mut entry: shopping_list_item::ActiveModel = existing.into();
    if let Some(quantity) = changes.quantity_needed {
        entry.quantity_needed = Set(quantity);
    }
    if let Some(priority) = changes.priority {
        entry.priority = Set(priority.into());
    }
    if let Some(notes) = changes.notes {
        entry.notes = Set(notes);
    }
    if changes.is_purchased == Some(true) {
        stamp_purchase(&mut entry, identity, now);
    }
    entry.updated_by = Set(identity.to_string());
    entry.updated_at = Set(now);

    entry
        .update(db)
        .await
        .context("update shopping list item")
}

/// Marks an entry purchased by the acting identity, now.
///
/// Calling this again on a purchased entry re-stamps `purchased_at`,
/// `purchased_by` and, when given, `notes` with the latest values.
///
/// # Errors
/// Returns [`Error::NotFound`] if the entry does not exist, or
/// [`Error::Authorization`] if the caller did not create it.
#[instrument(skip(db, notes))]
pub async fn mark_purchased(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
    notes: Option<String>,
) -> Result<shopping_list_item::Model> {
    let now = chrono::Utc::now();
    let mut entry: shopping_list_item::ActiveModel =
        find_owned_item(db, identity, item_id).await?.into();
    stamp_purchase(&mut entry, identity, now);
    if let Some(notes) = notes {
        entry.notes = Set(Some(notes));
    }
    entry.updated_by = Set(identity.to_string());
    entry.updated_at = Set(now);

    let purchased = entry
        .update(db)
        .await
        .context("mark item as purchased")?;
    info!(entry_id = purchased.id, %identity, "Shopping list item purchased");
    Ok(purchased)
}

/// Hard deletes an entry.
///
/// # Errors
/// Returns [`Error::NotFound`] if the entry does not exist, or
/// [`Error::Authorization`] if the caller did not create it.
#[instrument(skip(db))]
pub async fn delete_shopping_list_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item_id: i64,
) -> Result<()> {
    find_owned_item(db, identity, item_id).await?;
    ShoppingListItem::delete_by_id(item_id)
        .exec(db)
        .await
        .context("delete shopping list item")?;
    Ok(())
}
