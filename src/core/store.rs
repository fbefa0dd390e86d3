//! Store directory - Lists, fetches, creates and seeds vendor records.

use crate::{
    config::app::StoreConfig,
    core::identity::Identity,
    entities::{Store, store},
    errors::{Error, Result, StoreContext},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Input for [`create_store`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    /// Store name, required
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Website URL
    pub website: Option<String>,
}

/// Lists stores ordered by name, optionally only active or only inactive ones.
pub async fn list_stores(
    db: &DatabaseConnection,
    is_active: Option<bool>,
) -> Result<Vec<store::Model>> {
    let mut query = Store::find();
    if let Some(active) = is_active {
        query = query.filter(store::Column::IsActive.eq(active));
    }
    query
        .order_by_asc(store::Column::Name)
        .all(db)
        .await
        .context("fetch stores")
}

/// Fetches a store by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no store has this id.
pub async fn get_store_by_id(db: &DatabaseConnection, store_id: i64) -> Result<store::Model> {
    Store::find_by_id(store_id)
        .one(db)
        .await
        .context("fetch store")?
        .ok_or(Error::NotFound {
            entity: "store",
            id: store_id,
        })
}

/// Creates an active store stamped with the acting identity.
///
/// # Errors
/// Returns [`Error::Validation`] if the name is blank.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_store(
    db: &DatabaseConnection,
    identity: &Identity,
    input: NewStore,
) -> Result<store::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Store name cannot be empty"));
    }

    let now = chrono::Utc::now();
    let store = store::ActiveModel {
        name: Set(input.name.trim().to_string()),
        address: Set(input.address),
        phone: Set(input.phone),
        website: Set(input.website),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(identity.to_string()),
        updated_by: Set(identity.to_string()),
        ..Default::default()
    };
    let created = store.insert(db).await.context("create store")?;
    debug!(store_id = created.id, "Store created");
    Ok(created)
}

/// Creates every configured store whose name is not in the directory yet.
///
/// Returns how many stores were created. Existing stores are left untouched,
/// so running this on every startup is safe.
#[instrument(skip(db, stores))]
pub async fn seed_stores(
    db: &DatabaseConnection,
    stores: &[StoreConfig],
    identity: &Identity,
) -> Result<usize> {
    info!("Seeding stores. Found {} configurations.", stores.len());
    let mut created = 0;
    for cfg in stores {
        let existing = Store::find()
            .filter(store::Column::Name.eq(cfg.name.trim()))
            .one(db)
            .await
            .context("look up seeded store")?;
        if existing.is_some() {
            debug!("Store '{}' already exists. Skipping.", cfg.name);
            continue;
        }

        create_store(
            db,
            identity,
            NewStore {
                name: cfg.name.clone(),
                address: cfg.address.clone(),
                phone: cfg.phone.clone(),
                website: cfg.website.clone(),
            },
        )
        .await?;
        created += 1;
    }
    info!("Seeded {created} new stores");
    Ok(created)
}
