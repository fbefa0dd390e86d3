//! Price aggregation - The cheapest current offer for everything still to buy.
//!
//! Lookups fan out over the distinct inventory items on the active shopping
//! list with at most `max_concurrent_lookups` in flight. A failed lookup only
//! drops its own item; a failed read of the list itself fails the whole call.

use crate::{
    core::{price::cheapest_current_price, shopping_list_item::active_items_query},
    entities::item_price,
    errors::{Result, StoreContext},
};
use futures::{StreamExt, stream};
use sea_orm::prelude::*;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Returns the cheapest current price for each distinct item on the active
/// shopping list.
///
/// Results follow the order in which each item first appears on the list.
/// Items with no current price are omitted, as are items whose lookup fails
/// (the failure is logged). Dropping the returned future abandons any lookups
/// still in flight.
///
/// # Errors
/// Returns [`crate::errors::Error::Store`] if the active shopping list cannot
/// be read.
#[instrument(skip(db))]
pub async fn cheapest_offers_for_active_list(
    db: &DatabaseConnection,
    max_concurrent_lookups: usize,
) -> Result<Vec<item_price::Model>> {
    let entries = active_items_query()
        .all(db)
        .await
        .context("fetch shopping list for price comparison")?;

    let mut seen = HashSet::new();
    let item_ids: Vec<i64> = entries
        .iter()
        .map(|entry| entry.inventory_item_id)
        .filter(|id| seen.insert(*id))
        .collect();

    if item_ids.is_empty() {
        return Ok(Vec::new());
    }
    let lookups = item_ids.len();

    let offers = collect_cheapest(item_ids, max_concurrent_lookups, |item_id| {
        cheapest_current_price(db, item_id)
    })
    .await;

    debug!(lookups, offers = offers.len(), "Price comparison complete");
    Ok(offers)
}

/// Runs `lookup` for each id, at most `max_concurrent_lookups` at a time, and
/// keeps the offers in id order. Failed and empty lookups are left out.
async fn collect_cheapest<F, Fut>(
    item_ids: Vec<i64>,
    max_concurrent_lookups: usize,
    lookup: F,
) -> Vec<item_price::Model>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Option<item_price::Model>>>,
{
    stream::iter(item_ids)
        .map(|item_id| {
            let pending = lookup(item_id);
            async move { (item_id, pending.await) }
        })
        .buffered(max_concurrent_lookups.max(1))
        .filter_map(|(item_id, result)| async move {
            match result {
                Ok(offer) => offer,
                Err(error) => {
                    warn!(item_id, %error, "Price lookup failed, leaving item out of comparison");
                    None
                }
            }
        })
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::shopping_list_item::{Priority, mark_purchased};
    use crate::entities::shopping_list_item;
    use crate::errors::Error;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;

    /// Counts how many lookups were dropped before finishing.
    struct Abandoned(Arc<AtomicUsize>);

    impl Drop for Abandoned {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn mock_entry(id: i64, inventory_item_id: i64) -> shopping_list_item::Model {
        let now = chrono::Utc::now();
        shopping_list_item::Model {
            id,
            shopping_list_id: None,
            inventory_item_id,
            quantity_needed: 1.0,
            priority: 1,
            notes: None,
            is_purchased: false,
            purchased_at: None,
            purchased_by: None,
            created_at: now,
            updated_at: now,
            created_by: "alice".to_string(),
            updated_by: "alice".to_string(),
        }
    }

    fn mock_price(id: i64, inventory_item_id: i64, price: f64) -> item_price::Model {
        let now = chrono::Utc::now();
        item_price::Model {
            id,
            inventory_item_id,
            store_id: 1,
            price,
            unit_of_measure: "each".to_string(),
            is_current: true,
            last_updated: now,
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_empty_list_issues_no_lookups() -> Result<()> {
        // Only the list query has a result queued; a price lookup would fail.
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<shopping_list_item::Model>::new()])
            .into_connection();

        let offers = cheapest_offers_for_active_list(&db, 4).await?;
        assert!(offers.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_lookup_drops_only_that_item() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![
                mock_entry(1, 10),
                mock_entry(2, 20),
                mock_entry(3, 30),
                mock_entry(4, 40),
            ]])
            .append_query_results([vec![mock_price(100, 10, 3.5)]])
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .append_query_results([Vec::<item_price::Model>::new()])
            .append_query_results([vec![mock_price(400, 40, 1.2)]])
            .into_connection();

        let offers = cheapest_offers_for_active_list(&db, 1).await?;
        let items: Vec<i64> = offers.iter().map(|o| o.inventory_item_id).collect();
        assert_eq!(items, vec![10, 40]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_read_failure_is_surfaced() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("no such table".to_string())])
            .into_connection();

        let result = cheapest_offers_for_active_list(&db, 4).await;
        assert!(matches!(
            result,
            Err(Error::Store {
                operation: "fetch shopping list for price comparison",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_cheapest_offer_per_listed_item() -> Result<()> {
        let db = setup_test_db().await?;
        let corner = create_test_store(&db, "Corner Market").await?;
        let bulk = create_test_store(&db, "Bulk Barn").await?;

        let apples = create_test_inventory_item(&db, "Apples").await?;
        let bread = create_test_inventory_item(&db, "Bread").await?;
        let cheese = create_test_inventory_item(&db, "Cheese").await?;
        let dates = create_test_inventory_item(&db, "Dates").await?;

        create_test_price(&db, apples.id, corner.id, 4.00).await?;
        create_test_price(&db, apples.id, bulk.id, 3.50).await?;
        create_test_price(&db, cheese.id, corner.id, 1.20).await?;
        create_test_price(&db, dates.id, bulk.id, 6.00).await?;

        create_entry_with_priority(&db, apples.id, Priority::Medium).await?;
        create_entry_with_priority(&db, bread.id, Priority::Low).await?;
        create_entry_with_priority(&db, cheese.id, Priority::High).await?;
        // Listed twice, looked up once
        create_entry_with_priority(&db, apples.id, Priority::Low).await?;
        // Purchased entries are not part of the active list
        let bought = create_entry_with_priority(&db, dates.id, Priority::High).await?;
        mark_purchased(&db, &alice(), bought.id, None).await?;

        let offers = cheapest_offers_for_active_list(&db, 4).await?;
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].inventory_item_id, cheese.id);
        assert_eq!(offers[0].price, 1.20);
        assert_eq!(offers[1].inventory_item_id, apples.id);
        assert_eq!(offers[1].price, 3.50);
        assert_eq!(offers[1].store_id, bulk.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() -> Result<()> {
        let db = setup_test_db().await?;
        let store = create_test_store(&db, "Corner Market").await?;
        let milk = create_test_inventory_item(&db, "Milk").await?;
        create_test_price(&db, milk.id, store.id, 2.25).await?;
        create_entry_with_priority(&db, milk.id, Priority::Low).await?;

        let offers = cheapest_offers_for_active_list(&db, 0).await?;
        assert_eq!(offers.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropping_aggregation_abandons_outstanding_lookups() {
        let started = Arc::new(AtomicUsize::new(0));
        let abandoned = Arc::new(AtomicUsize::new(0));

        let lookup = |item_id: i64| {
            let started = Arc::clone(&started);
            let abandoned = Arc::clone(&abandoned);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                if item_id == 10 {
                    return Ok(Some(mock_price(100, item_id, 1.0)));
                }
                let _guard = Abandoned(abandoned);
                std::future::pending::<()>().await;
                Ok::<_, Error>(None)
            }
        };

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            collect_cheapest(vec![10, 20, 30, 40], 2, lookup),
        )
        .await;
        assert!(result.is_err());

        // 10 finished, 20 and 30 were in flight and got dropped, 40 never started
        assert_eq!(started.load(Ordering::SeqCst), 3);
        assert_eq!(abandoned.load(Ordering::SeqCst), 2);
    }
}
