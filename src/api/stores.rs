use super::ApiContext;
use crate::{
    core::store::{self, NewStore},
    entities::store::Model as StoreRecord,
    errors::{OptionalExt, Result},
};

impl ApiContext {
    /// `stores{isActive?}`
    pub async fn stores(&self, is_active: Option<bool>) -> Result<Vec<StoreRecord>> {
        store::list_stores(self.db(), is_active).await
    }

    /// `store{id}`
    pub async fn store(&self, id: i64) -> Result<Option<StoreRecord>> {
        store::get_store_by_id(self.db(), id).await.optional()
    }

    /// `createStore{name, address?, phone?, website?}`
    pub async fn create_store(
        &self,
        credential: Option<&str>,
        input: NewStore,
    ) -> Result<StoreRecord> {
        let identity = self.authenticate(credential).await?;
        store::create_store(self.db(), &identity, input).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::test_support::*;
    use crate::core::store::NewStore;
    use crate::errors::{Error, Result};

    #[tokio::test]
    async fn test_store_operations() -> Result<()> {
        let api = setup_api().await?;

        let result = api
            .create_store(
                None,
                NewStore {
                    name: "Corner Market".to_string(),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert!(api.stores(None).await?.is_empty());

        let created = api
            .create_store(
                ALICE,
                NewStore {
                    name: "Corner Market".to_string(),
                    website: Some("https://corner.example".to_string()),
                    ..Default::default()
                },
            )
            .await?;
        assert!(created.is_active);
        assert_eq!(created.created_by, "alice");

        assert_eq!(api.store(created.id).await?.unwrap().name, "Corner Market");
        assert!(api.store(created.id + 1).await?.is_none());
        assert_eq!(api.stores(Some(true)).await?.len(), 1);
        assert!(api.stores(Some(false)).await?.is_empty());
        Ok(())
    }
}
