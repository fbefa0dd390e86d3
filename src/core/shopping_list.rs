//! Shopping lists - Named groupings of entries, private to their owner.
//!
//! A list is visible only to the identity that created it: fetching someone
//! else's list looks exactly like fetching a missing one. Changing or deleting
//! someone else's list is reported as an authorization failure instead.

use crate::{
    core::{
        identity::{Identity, authorize_owner},
        patch::nullable,
        shopping_list_item::in_default_order,
        store::get_store_by_id,
    },
    entities::{
        InventoryItem, ShoppingList, ShoppingListItem, Store, inventory_item, shopping_list,
        shopping_list_item, store,
    },
    errors::{Error, Result, StoreContext},
};
use sea_orm::{
    PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A list together with the number of entries attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListSummary {
    /// The list row
    #[serde(flatten)]
    pub list: shopping_list::Model,
    /// Number of entries attached to the list
    pub items_count: u64,
}

/// An entry with the inventory item it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// The entry row
    #[serde(flatten)]
    pub entry: shopping_list_item::Model,
    /// Item to buy
    pub inventory_item: Option<inventory_item::Model>,
}

/// A list with its target store and its entries in default order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListDetails {
    /// The list row
    #[serde(flatten)]
    pub list: shopping_list::Model,
    /// Store the list is planned for
    pub store: Option<store::Model>,
    /// Attached entries, highest priority first
    pub items: Vec<ListEntry>,
    /// Number of attached entries
    pub items_count: u64,
}

/// Input for [`create_shopping_list`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingList {
    /// List name, required
    pub name: String,
    /// Store the list is planned for
    pub store_id: Option<i64>,
}

/// Partial update for [`update_shopping_list`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListChanges {
    /// New name, must not be blank
    pub name: Option<String>,
    /// New target store, or `Some(None)` to detach the list from its store
    #[serde(default, deserialize_with = "nullable")]
    pub store_id: Option<Option<i64>>,
}

fn validate_list_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Shopping list name cannot be empty"));
    }
    Ok(())
}

/// Lists the caller's shopping lists, newest first, optionally for one store.
pub async fn list_shopping_lists(
    db: &DatabaseConnection,
    identity: &Identity,
    store_id: Option<i64>,
) -> Result<Vec<shopping_list::Model>> {
    let mut query =
        ShoppingList::find().filter(shopping_list::Column::CreatedBy.eq(identity.as_str()));
    if let Some(store_id) = store_id {
        query = query.filter(shopping_list::Column::StoreId.eq(store_id));
    }
    query
        .order_by_desc(shopping_list::Column::CreatedAt)
        .order_by_desc(shopping_list::Column::Id)
        .all(db)
        .await
        .context("fetch shopping lists")
}

/// Fetches one of the caller's shopping lists.
///
/// # Errors
/// Returns [`Error::NotFound`] if the list does not exist or belongs to
/// another identity.
pub async fn get_shopping_list(
    db: &DatabaseConnection,
    identity: &Identity,
    list_id: i64,
) -> Result<shopping_list::Model> {
    ShoppingList::find_by_id(list_id)
        .filter(shopping_list::Column::CreatedBy.eq(identity.as_str()))
        .one(db)
        .await
        .context("fetch shopping list")?
        .ok_or(Error::NotFound {
            entity: "shopping list",
            id: list_id,
        })
}

/// Counts the entries attached to a list.
pub async fn count_items(db: &DatabaseConnection, list_id: i64) -> Result<u64> {
    ShoppingListItem::find()
        .filter(shopping_list_item::Column::ShoppingListId.eq(list_id))
        .count(db)
        .await
        .context("count shopping list items")
}

/// Pairs a list with its entry count.
pub async fn summarize(
    db: &DatabaseConnection,
    list: shopping_list::Model,
) -> Result<ShoppingListSummary> {
    let items_count = count_items(db, list.id).await?;
    Ok(ShoppingListSummary { list, items_count })
}

/// Fetches one of the caller's lists with its store and its entries, each
/// entry carrying its inventory item.
///
/// # Errors
/// Returns [`Error::NotFound`] if the list does not exist or belongs to
/// another identity.
pub async fn get_shopping_list_details(
    db: &DatabaseConnection,
    identity: &Identity,
    list_id: i64,
) -> Result<ShoppingListDetails> {
    let (list, store) = ShoppingList::find_by_id(list_id)
        .filter(shopping_list::Column::CreatedBy.eq(identity.as_str()))
        .find_also_related(Store)
        .one(db)
        .await
        .context("fetch shopping list")?
        .ok_or(Error::NotFound {
            entity: "shopping list",
            id: list_id,
        })?;

    let items: Vec<ListEntry> = in_default_order(
        ShoppingListItem::find().filter(shopping_list_item::Column::ShoppingListId.eq(list_id)),
    )
    .find_also_related(InventoryItem)
    .all(db)
    .await
    .context("fetch shopping list entries")?
    .into_iter()
    .map(|(entry, inventory_item)| ListEntry {
        entry,
        inventory_item,
    })
    .collect();

    Ok(ShoppingListDetails {
        items_count: items.len() as u64,
        list,
        store,
        items,
    })
}

/// Creates a list owned by the acting identity.
///
/// # Errors
/// Returns [`Error::Validation`] for a blank name, or [`Error::NotFound`] if
/// the target store does not exist.
#[instrument(skip(db, input))]
pub async fn create_shopping_list(
    db: &DatabaseConnection,
    identity: &Identity,
    input: NewShoppingList,
) -> Result<shopping_list::Model> {
    validate_list_name(&input.name)?;
    if let Some(store_id) = input.store_id {
        get_store_by_id(db, store_id).await?;
    }

    let now = chrono::Utc::now();
    let list = shopping_list::ActiveModel {
        name: Set(input.name.trim().to_string()),
        store_id: Set(input.store_id),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(identity.to_string()),
        updated_by: Set(identity.to_string()),
        ..Default::default()
    };
    let created = list.insert(db).await.context("create shopping list")?;
    info!(list_id = created.id, %identity, "Shopping list created");
    Ok(created)
}

/// Fetches a list for mutation: missing is `NotFound`, foreign is `Authorization`.
async fn find_owned_list<C>(
    db: &C,
    identity: &Identity,
    list_id: i64,
) -> Result<shopping_list::Model>
where
    C: ConnectionTrait,
{
    let list = ShoppingList::find_by_id(list_id)
        .one(db)
        .await
        .context("fetch shopping list")?
        .ok_or(Error::NotFound {
            entity: "shopping list",
            id: list_id,
        })?;
    authorize_owner(identity, "shopping list", list_id, &list.created_by)?;
    Ok(list)
}

/// Renames a list or retargets it at another store.
#[instrument(skip(db, changes))]
pub async fn update_shopping_list(
    db: &DatabaseConnection,
    identity: &Identity,
    list_id: i64,
    changes: ShoppingListChanges,
) -> Result<shopping_list::Model> {
    let existing = find_owned_list(db, identity, list_id).await?;
    if let Some(name) = &changes.name {
        validate_list_name(name)?;
    }
    if let Some(Some(store_id)) = changes.store_id {
        get_store_by_id(db, store_id).await?;
    }

    let mut list: shopping_list::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        list.name = Set(name.trim().to_string());
    }
    if let Some(store_id) = changes.store_id {
        list.store_id = Set(store_id);
    }
    list.updated_by = Set(identity.to_string());
    list.updated_at = Set(chrono::Utc::now());

    list.update(db).await.context("update shopping list")
}

/// Deletes a list. Its entries are kept and detached from it.
#[instrument(skip(db))]
pub async fn delete_shopping_list(
    db: &DatabaseConnection,
    identity: &Identity,
    list_id: i64,
) -> Result<()> {
    let txn = db.begin().await.context("begin shopping list delete")?;
    find_owned_list(&txn, identity, list_id).await?;
    let detached = ShoppingListItem::update_many()
        .col_expr(
            shopping_list_item::Column::ShoppingListId,
            Expr::value(Option::<i64>::None),
        )
        .filter(shopping_list_item::Column::ShoppingListId.eq(list_id))
        .exec(&txn)
        .await
        .context("detach shopping list items")?;
    ShoppingList::delete_by_id(list_id)
        .exec(&txn)
        .await
        .context("delete shopping list")?;
    txn.commit().await.context("commit shopping list delete")?;

    info!(
        list_id,
        detached = detached.rows_affected,
        "Shopping list deleted"
    );
    Ok(())
}
