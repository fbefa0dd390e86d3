//! API layer - The operation surface a transport binds to.
//!
//! Every operation is a method on [`ApiContext`]. Guarded operations take the
//! raw `Authorization` header value as `credential` and resolve it to an
//! [`Identity`] before any query is issued. Single-row reads return `None`
//! instead of a not-found error.

/// Inventory catalog operations
pub mod inventory;
/// Price book and price comparison operations
pub mod prices;
/// Shopping list and shopping list entry operations
pub mod shopping;
/// Store directory operations
pub mod stores;

use crate::{
    config::{app::DEFAULT_MAX_CONCURRENT_LOOKUPS, database},
    core::identity::{Identity, IdentityVerifier, resolve_identity},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared state available to every operation.
/// Holds the record store handle and the identity verifier; nothing else is
/// shared between calls.
pub struct ApiContext {
    database: DatabaseConnection,
    verifier: Arc<dyn IdentityVerifier>,
    max_concurrent_lookups: usize,
}

impl ApiContext {
    /// Creates a context over an open connection.
    #[must_use]
    pub fn new(database: DatabaseConnection, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            database,
            verifier,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Sets how many price lookups the aggregator keeps in flight.
    #[must_use]
    pub fn with_max_concurrent_lookups(mut self, max_concurrent_lookups: usize) -> Self {
        self.max_concurrent_lookups = max_concurrent_lookups;
        self
    }

    /// The underlying record store handle.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Resolves the caller behind an `Authorization` header value.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Authentication`] when the credential is
    /// missing or rejected.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Identity> {
        resolve_identity(self.verifier.as_ref(), credential).await
    }

    /// Closes the record store handle. Call once at shutdown.
    pub async fn close(self) -> Result<()> {
        database::close(self.database).await
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ApiContext;
    use crate::{core::identity::StaticTokenVerifier, errors::Result, test_utils::setup_test_db};
    use std::sync::Arc;

    /// Authorization header for alice in tests.
    pub const ALICE: Option<&str> = Some("Bearer alice-token");
    /// Authorization header for sam in tests.
    pub const SAM: Option<&str> = Some("Bearer sam-token");

    /// A context over a fresh in-memory database with two known tokens.
    pub async fn setup_api() -> Result<ApiContext> {
        let db = setup_test_db().await?;
        let verifier =
            StaticTokenVerifier::new([("alice-token", "alice"), ("sam-token", "sam")]);
        Ok(ApiContext::new(db, Arc::new(verifier)))
    }
}
