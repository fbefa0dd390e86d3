use super::ApiContext;
use crate::{
    core::{
        shopping_list::{
            self, NewShoppingList, ShoppingListChanges, ShoppingListDetails, ShoppingListSummary,
        },
        shopping_list_item::{
            self, ItemFilter, NewShoppingListItem, ShoppingListItemChanges,
        },
    },
    entities::shopping_list_item::Model as ShoppingListItemRecord,
    errors::{OptionalExt, Result},
};

impl ApiContext {
    /// `shoppingLists{storeId?}`, the caller's lists with their entry counts.
    pub async fn shopping_lists(
        &self,
        credential: Option<&str>,
        store_id: Option<i64>,
    ) -> Result<Vec<ShoppingListSummary>> {
        let identity = self.authenticate(credential).await?;
        let lists = shopping_list::list_shopping_lists(self.db(), &identity, store_id).await?;
        let mut summaries = Vec::with_capacity(lists.len());
        for list in lists {
            summaries.push(shopping_list::summarize(self.db(), list).await?);
        }
        Ok(summaries)
    }

    /// `shoppingListById{id}`, with its store and entries. Someone else's list reads as `None`.
    pub async fn shopping_list_by_id(
        &self,
        credential: Option<&str>,
        id: i64,
    ) -> Result<Option<ShoppingListDetails>> {
        let identity = self.authenticate(credential).await?;
        shopping_list::get_shopping_list_details(self.db(), &identity, id)
            .await
            .optional()
    }

    /// `shoppingListItemsCount{id}` for one of the caller's lists.
    pub async fn shopping_list_items_count(
        &self,
        credential: Option<&str>,
        id: i64,
    ) -> Result<u64> {
        let identity = self.authenticate(credential).await?;
        let list = shopping_list::get_shopping_list(self.db(), &identity, id).await?;
        shopping_list::count_items(self.db(), list.id).await
    }

    /// `createShoppingList{name, storeId?}`
    pub async fn create_shopping_list(
        &self,
        credential: Option<&str>,
        input: NewShoppingList,
    ) -> Result<ShoppingListSummary> {
        let identity = self.authenticate(credential).await?;
        let list = shopping_list::create_shopping_list(self.db(), &identity, input).await?;
        Ok(ShoppingListSummary {
            list,
            items_count: 0,
        })
    }

    /// `updateShoppingList{id, ...partial}`
    pub async fn update_shopping_list(
        &self,
        credential: Option<&str>,
        id: i64,
        changes: ShoppingListChanges,
    ) -> Result<ShoppingListSummary> {
        let identity = self.authenticate(credential).await?;
        let list = shopping_list::update_shopping_list(self.db(), &identity, id, changes).await?;
        shopping_list::summarize(self.db(), list).await
    }

    /// `deleteShoppingList{id}`. Returns false if the list does not exist.
    pub async fn delete_shopping_list(&self, credential: Option<&str>, id: i64) -> Result<bool> {
        let identity = self.authenticate(credential).await?;
        let deleted = shopping_list::delete_shopping_list(self.db(), &identity, id)
            .await
            .optional()?;
        Ok(deleted.is_some())
    }

    /// `shoppingListItems{isPurchased?, priority?, shoppingListId?}`
    pub async fn shopping_list_items(
        &self,
        filter: &ItemFilter,
    ) -> Result<Vec<ShoppingListItemRecord>> {
        shopping_list_item::list_shopping_list_items(self.db(), filter).await
    }

    /// `shoppingListItem{id}`
    pub async fn shopping_list_item(&self, id: i64) -> Result<Option<ShoppingListItemRecord>> {
        shopping_list_item::get_shopping_list_item(self.db(), id)
            .await
            .optional()
    }

    /// `activeShoppingList{}`
    pub async fn active_shopping_list(&self) -> Result<Vec<ShoppingListItemRecord>> {
        shopping_list_item::list_active_items(self.db()).await
    }

    /// `highPriorityShoppingList{}`
    pub async fn high_priority_shopping_list(&self) -> Result<Vec<ShoppingListItemRecord>> {
        shopping_list_item::list_high_priority_items(self.db()).await
    }

    /// `createShoppingListItem{inventoryItemId, shoppingListId?, quantityNeeded, priority?, notes?}`
    pub async fn create_shopping_list_item(
        &self,
        credential: Option<&str>,
        input: NewShoppingListItem,
    ) -> Result<ShoppingListItemRecord> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::create_shopping_list_item(self.db(), &identity, input).await
    }

    /// `updateShoppingListItem{id, ...partial}`
    pub async fn update_shopping_list_item(
        &self,
        credential: Option<&str>,
        id: i64,
        changes: ShoppingListItemChanges,
    ) -> Result<ShoppingListItemRecord> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::update_shopping_list_item(self.db(), &identity, id, changes).await
    }

    /// `markPurchased{id, notes?}`
    pub async fn mark_purchased(
        &self,
        credential: Option<&str>,
        id: i64,
        notes: Option<String>,
    ) -> Result<ShoppingListItemRecord> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::mark_purchased(self.db(), &identity, id, notes).await
    }

    /// `deleteShoppingListItem{id}`. Returns false if the entry does not exist.
    pub async fn delete_shopping_list_item(
        &self,
        credential: Option<&str>,
        id: i64,
    ) -> Result<bool> {
        let identity = self.authenticate(credential).await?;
        let deleted = shopping_list_item::delete_shopping_list_item(self.db(), &identity, id)
            .await
            .optional()?;
        Ok(deleted.is_some())
    }

    /// `myShoppingList{isPurchased?}`
    pub async fn my_shopping_list(
        &self,
        credential: Option<&str>,
        is_purchased: Option<bool>,
    ) -> Result<Vec<ShoppingListItemRecord>> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::list_items_created_by(self.db(), &identity, is_purchased).await
    }

    /// `myPurchasedItems{limit?}`
    pub async fn my_purchased_items(
        &self,
        credential: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<ShoppingListItemRecord>> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::list_items_purchased_by(self.db(), &identity, limit).await
    }

    /// `recentlyAddedItems{limit?}`
    pub async fn recently_added_items(
        &self,
        credential: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<ShoppingListItemRecord>> {
        let identity = self.authenticate(credential).await?;
        shopping_list_item::list_recently_added_items(self.db(), &identity, limit).await
    }
}
