//! Price book - Per-store item prices and "current price" lookups.
//!
//! A price is *current* when `is_current` is set. [`record_price`] keeps at most
//! one current row per (item, store) pair by demoting the previous one in the
//! same database transaction.

use crate::{
    core::inventory::DEFAULT_UNIT_OF_MEASURE,
    entities::{InventoryItem, ItemPrice, Store, inventory_item, item_price, store},
    errors::{Error, Result, StoreContext},
};
use sea_orm::{
    LoaderTrait, QueryOrder, Select, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Optional filters for [`list_item_prices`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFilter {
    /// Only prices for this item
    pub inventory_item_id: Option<i64>,
    /// Only prices at this store
    pub store_id: Option<i64>,
    /// Only current (true) or only historical (false) prices
    pub is_current: Option<bool>,
}

/// Input for [`record_price`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemPrice {
    /// Item being priced
    pub inventory_item_id: i64,
    /// Store offering the price
    pub store_id: i64,
    /// Price per unit, must be positive
    pub price: f64,
    /// Unit the price applies to, defaults to "each"
    pub unit_of_measure: Option<String>,
}

/// A price together with the item it is for and the store offering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOffer {
    /// The price row
    #[serde(flatten)]
    pub item_price: item_price::Model,
    /// Item being priced
    pub inventory_item: Option<inventory_item::Model>,
    /// Store offering the price
    pub store: Option<store::Model>,
}

/// Attaches the related item and store to each price, keeping the order.
pub async fn with_item_and_store<C>(
    db: &C,
    prices: Vec<item_price::Model>,
) -> Result<Vec<PriceOffer>>
where
    C: ConnectionTrait,
{
    if prices.is_empty() {
        return Ok(Vec::new());
    }
    let items = prices
        .load_one(InventoryItem, db)
        .await
        .context("load items for prices")?;
    let stores = prices
        .load_one(Store, db)
        .await
        .context("load stores for prices")?;

    Ok(prices
        .into_iter()
        .zip(items)
        .zip(stores)
        .map(|((item_price, inventory_item), store)| PriceOffer {
            item_price,
            inventory_item,
            store,
        })
        .collect())
}

/// Lists prices, most recently confirmed first.
pub async fn list_item_prices(
    db: &DatabaseConnection,
    filter: &PriceFilter,
) -> Result<Vec<item_price::Model>> {
    let mut query = ItemPrice::find();
    if let Some(item_id) = filter.inventory_item_id {
        query = query.filter(item_price::Column::InventoryItemId.eq(item_id));
    }
    if let Some(store_id) = filter.store_id {
        query = query.filter(item_price::Column::StoreId.eq(store_id));
    }
    if let Some(current) = filter.is_current {
        query = query.filter(item_price::Column::IsCurrent.eq(current));
    }
    query
        .order_by_desc(item_price::Column::LastUpdated)
        .order_by_desc(item_price::Column::Id)
        .all(db)
        .await
        .context("fetch item prices")
}

/// Fetches a price row by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no price has this id.
pub async fn get_item_price_by_id(
    db: &DatabaseConnection,
    price_id: i64,
) -> Result<item_price::Model> {
    ItemPrice::find_by_id(price_id)
        .one(db)
        .await
        .context("fetch item price")?
        .ok_or(Error::NotFound {
            entity: "item price",
            id: price_id,
        })
}

fn current_prices_query(inventory_item_id: i64) -> Select<ItemPrice> {
    ItemPrice::find()
        .filter(item_price::Column::InventoryItemId.eq(inventory_item_id))
        .filter(item_price::Column::IsCurrent.eq(true))
        .order_by_asc(item_price::Column::Price)
        .order_by_asc(item_price::Column::Id)
}

/// Lists the current prices for one item across all stores, cheapest first.
///
/// The first element, if any, is the cheapest current offer for the item.
pub async fn current_prices_for_item(
    db: &DatabaseConnection,
    inventory_item_id: i64,
) -> Result<Vec<item_price::Model>> {
    current_prices_query(inventory_item_id)
        .all(db)
        .await
        .context("fetch current prices for item")
}

/// Returns the single cheapest current price for one item, if it has any.
pub async fn cheapest_current_price<C>(
    db: &C,
    inventory_item_id: i64,
) -> Result<Option<item_price::Model>>
where
    C: ConnectionTrait,
{
    current_prices_query(inventory_item_id)
        .one(db)
        .await
        .context("fetch cheapest price for item")
}

/// Records a new current price for an (item, store) pair.
///
/// Any price that was current for the same pair is demoted to history in the
/// same transaction, so a pair never has two current prices.
///
/// # Errors
/// Returns:
/// - [`Error::Validation`] if the price is not a positive number
/// - [`Error::NotFound`] if the item or the store does not exist
#[instrument(skip(db, input), fields(item = input.inventory_item_id, store = input.store_id))]
pub async fn record_price(
    db: &DatabaseConnection,
    input: NewItemPrice,
) -> Result<item_price::Model> {
    if !input.price.is_finite() || input.price <= 0.0 {
        return Err(Error::validation(format!(
            "Price must be a positive number, got {}",
            input.price
        )));
    }

    let txn = db.begin().await.context("begin price update")?;

    if InventoryItem::find_by_id(input.inventory_item_id)
        .one(&txn)
        .await
        .context("fetch inventory item")?
        .is_none()
    {
        return Err(Error::NotFound {
            entity: "inventory item",
            id: input.inventory_item_id,
        });
    }
    if Store::find_by_id(input.store_id)
        .one(&txn)
        .await
        .context("fetch store")?
        .is_none()
    {
        return Err(Error::NotFound {
            entity: "store",
            id: input.store_id,
        });
    }

    let demoted = ItemPrice::update_many()
        .col_expr(item_price::Column::IsCurrent, Expr::value(false))
        .filter(item_price::Column::InventoryItemId.eq(input.inventory_item_id))
        .filter(item_price::Column::StoreId.eq(input.store_id))
        .filter(item_price::Column::IsCurrent.eq(true))
        .exec(&txn)
        .await
        .context("demote previous prices")?;

    let now = chrono::Utc::now();
    let price = item_price::ActiveModel {
        inventory_item_id: Set(input.inventory_item_id),
        store_id: Set(input.store_id),
        price: Set(input.price),
        unit_of_measure: Set(input
            .unit_of_measure
            .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string())),
        is_current: Set(true),
        last_updated: Set(now),
        created_at: Set(now),
        ..Default::default()
    };
    let created = price.insert(&txn).await.context("create item price")?;

    txn.commit().await.context("commit price update")?;

    debug!(
        price_id = created.id,
        demoted = demoted.rows_affected,
        "Recorded current price"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_record_price_validation() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = record_price(
                &db,
                NewItemPrice {
                    inventory_item_id: 1,
                    store_id: 1,
                    price: bad,
                    unit_of_measure: None,
                },
            )
            .await;
            assert!(matches!(result, Err(Error::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_record_price_requires_existing_item_and_store() -> Result<()> {
        let db = setup_test_db().await?;
        let store = create_test_store(&db, "Corner Market").await?;
        let item = create_test_inventory_item(&db, "Milk").await?;

        let missing_item = record_price(
            &db,
            NewItemPrice {
                inventory_item_id: 999,
                store_id: store.id,
                price: 1.0,
                unit_of_measure: None,
            },
        )
        .await;
        assert!(matches!(
            missing_item,
            Err(Error::NotFound {
                entity: "inventory item",
                ..
            })
        ));

        let missing_store = record_price(
            &db,
            NewItemPrice {
                inventory_item_id: item.id,
                store_id: 999,
                price: 1.0,
                unit_of_measure: None,
            },
        )
        .await;
        assert!(matches!(
            missing_store,
            Err(Error::NotFound { entity: "store", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_price_demotes_previous_current() -> Result<()> {
        let db = setup_test_db().await?;
        let store = create_test_store(&db, "Corner Market").await?;
        let item = create_test_inventory_item(&db, "Milk").await?;

        let first = create_test_price(&db, item.id, store.id, 2.50).await?;
        let second = create_test_price(&db, item.id, store.id, 2.75).await?;
        assert_eq!(second.unit_of_measure, DEFAULT_UNIT_OF_MEASURE);

        let current = list_item_prices(
            &db,
            &PriceFilter {
                inventory_item_id: Some(item.id),
                store_id: Some(store.id),
                is_current: Some(true),
            },
        )
        .await?;
        assert_eq!(current, vec![second.clone()]);

        let old = get_item_price_by_id(&db, first.id).await?;
        assert!(!old.is_current);

        let history = list_item_prices(
            &db,
            &PriceFilter {
                inventory_item_id: Some(item.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(history.len(), 2);
        // Most recently confirmed first
        assert_eq!(history[0].id, second.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_current_prices_for_item_ascending() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_inventory_item(&db, "Coffee").await?;
        let other = create_test_inventory_item(&db, "Tea").await?;
        let mut stores = Vec::new();
        for name in ["A", "B", "C"] {
            stores.push(create_test_store(&db, name).await?);
        }

        create_test_price(&db, item.id, stores[0].id, 9.99).await?;
        create_test_price(&db, item.id, stores[1].id, 7.49).await?;
        create_test_price(&db, item.id, stores[2].id, 8.25).await?;
        create_test_price(&db, other.id, stores[0].id, 1.00).await?;

        let prices = current_prices_for_item(&db, item.id).await?;
        let values: Vec<f64> = prices.iter().map(|p| p.price).collect();
        assert_eq!(values, vec![7.49, 8.25, 9.99]);
        assert!(prices.iter().all(|p| p.price >= prices[0].price));
        assert!(prices.iter().all(|p| p.inventory_item_id == item.id));

        let cheapest = cheapest_current_price(&db, item.id).await?.unwrap();
        assert_eq!(cheapest, prices[0]);
        assert_eq!(cheapest.store_id, stores[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn test_cheapest_current_price_none_without_prices() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_inventory_item(&db, "Saffron").await?;
        assert!(cheapest_current_price(&db, item.id).await?.is_none());
        assert!(current_prices_for_item(&db, item.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_item_price_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_item_price_by_id(&db, 5).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "item price",
                id: 5
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_offers_embed_item_and_store() -> Result<()> {
        let db = setup_test_db().await?;
        let corner = create_test_store(&db, "Corner Market").await?;
        let bulk = create_test_store(&db, "Bulk Barn").await?;
        let milk = create_test_inventory_item(&db, "Milk").await?;
        create_test_price(&db, milk.id, corner.id, 2.49).await?;
        create_test_price(&db, milk.id, bulk.id, 2.19).await?;

        let offers = with_item_and_store(&db, current_prices_for_item(&db, milk.id).await?).await?;
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].item_price.price, 2.19);
        assert_eq!(offers[0].store.as_ref().map(|s| s.name.as_str()), Some("Bulk Barn"));
        assert_eq!(offers[1].store.as_ref().map(|s| s.id), Some(corner.id));
        assert!(offers.iter().all(|o| o.inventory_item.as_ref() == Some(&milk)));

        let json = serde_json::to_string(&offers[0]).unwrap();
        assert!(json.contains("\"storeId\":"));
        assert!(json.contains("\"store\":{"));
        assert!(json.contains("\"inventoryItem\":{"));

        assert!(with_item_and_store(&db, Vec::new()).await?.is_empty());
        Ok(())
    }
}
