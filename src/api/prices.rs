use super::ApiContext;
use crate::{
    core::{
        aggregator,
        price::{self, NewItemPrice, PriceFilter, PriceOffer},
    },
    entities::item_price::Model as ItemPriceRecord,
    errors::{OptionalExt, Result},
};
use tracing::debug;

impl ApiContext {
    /// `itemPrices{inventoryItemId?, storeId?, isCurrent?}`
    pub async fn item_prices(&self, filter: &PriceFilter) -> Result<Vec<PriceOffer>> {
        let prices = price::list_item_prices(self.db(), filter).await?;
        price::with_item_and_store(self.db(), prices).await
    }

    /// `itemPrice{id}`
    pub async fn item_price(&self, id: i64) -> Result<Option<PriceOffer>> {
        let Some(found) = price::get_item_price_by_id(self.db(), id).await.optional()? else {
            return Ok(None);
        };
        Ok(price::with_item_and_store(self.db(), vec![found])
            .await?
            .into_iter()
            .next())
    }

    /// `currentPricesForItem{inventoryItemId}`, cheapest first.
    pub async fn current_prices_for_item(&self, inventory_item_id: i64) -> Result<Vec<PriceOffer>> {
        let prices = price::current_prices_for_item(self.db(), inventory_item_id).await?;
        price::with_item_and_store(self.db(), prices).await
    }

    /// `recordItemPrice{inventoryItemId, storeId, price, unitOfMeasure?}`
    pub async fn record_item_price(
        &self,
        credential: Option<&str>,
        input: NewItemPrice,
    ) -> Result<ItemPriceRecord> {
        let identity = self.authenticate(credential).await?;
        debug!(%identity, "Recording item price");
        price::record_price(self.db(), input).await
    }

    /// `cheapestPricesForShoppingList{}`
    pub async fn cheapest_prices_for_shopping_list(&self) -> Result<Vec<PriceOffer>> {
        let offers =
            aggregator::cheapest_offers_for_active_list(self.db(), self.max_concurrent_lookups)
                .await?;
        price::with_item_and_store(self.db(), offers).await
    }
}
