use super::ApiContext;
use crate::{
    core::inventory::{self, InventoryFilter, InventoryItemChanges, NewInventoryItem},
    entities::inventory_item::Model as InventoryItemRecord,
    errors::{OptionalExt, Result},
};

impl ApiContext {
    /// `inventoryItems{category?, isActive?, lowStock?}`
    pub async fn inventory_items(
        &self,
        filter: &InventoryFilter,
    ) -> Result<Vec<InventoryItemRecord>> {
        inventory::list_inventory_items(self.db(), filter).await
    }

    /// `inventoryItem{id}`
    pub async fn inventory_item(&self, id: i64) -> Result<Option<InventoryItemRecord>> {
        inventory::get_inventory_item_by_id(self.db(), id)
            .await
            .optional()
    }

    /// `inventoryItemsByCategory{category}`
    pub async fn inventory_items_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<InventoryItemRecord>> {
        inventory::list_inventory_items_by_category(self.db(), category).await
    }

    /// `lowStockItems{}`
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItemRecord>> {
        inventory::list_low_stock_items(self.db()).await
    }

    /// `createInventoryItem{...}`
    pub async fn create_inventory_item(
        &self,
        credential: Option<&str>,
        input: NewInventoryItem,
    ) -> Result<InventoryItemRecord> {
        let identity = self.authenticate(credential).await?;
        inventory::create_inventory_item(self.db(), &identity, input).await
    }

    /// `updateInventoryItem{id, ...partial}`
    pub async fn update_inventory_item(
        &self,
        credential: Option<&str>,
        id: i64,
        changes: InventoryItemChanges,
    ) -> Result<InventoryItemRecord> {
        let identity = self.authenticate(credential).await?;
        inventory::update_inventory_item(self.db(), &identity, id, changes).await
    }

    /// `deleteInventoryItem{id}`, a soft delete. Returns false if the item does not exist.
    pub async fn delete_inventory_item(&self, credential: Option<&str>, id: i64) -> Result<bool> {
        let identity = self.authenticate(credential).await?;
        let deactivated = inventory::deactivate_inventory_item(self.db(), &identity, id)
            .await
            .optional()?;
        Ok(deactivated.is_some())
    }

    /// `myInventoryItems{category?, isActive?}`
    pub async fn my_inventory_items(
        &self,
        credential: Option<&str>,
        category: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Vec<InventoryItemRecord>> {
        let identity = self.authenticate(credential).await?;
        inventory::list_items_created_by(self.db(), &identity, category, is_active).await
    }

    /// `recentlyUpdatedItems{limit?}`
    pub async fn recently_updated_items(
        &self,
        credential: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<InventoryItemRecord>> {
        let identity = self.authenticate(credential).await?;
        inventory::list_recently_updated_items(self.db(), &identity, limit).await
    }
}
