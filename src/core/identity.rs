//! Identity resolution and ownership checks.
//!
//! A request's acting identity is resolved from its bearer credential before any
//! guarded operation touches the database. Ownership-scoped operations then call
//! [`authorize_owner`] with the identity and the record's `created_by` value.

use crate::config::app::IdentityConfig;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The acting identity for one request, as stored in `created_by`/`updated_by`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps a raw user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(user_id.into())
    }

    /// Identity used for records created by the process itself (e.g. seeding).
    #[must_use]
    pub fn system() -> Self {
        Self("system".to_string())
    }

    /// The raw user id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a bearer token and returns who it belongs to.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolves `token` to an identity or fails with [`Error::Authentication`].
    async fn verify(&self, token: &str) -> Result<Identity>;
}

/// Verifier backed by a fixed token table, usually loaded from config.toml.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
    /// Builds a verifier from `(token, user_id)` pairs.
    pub fn new<I, T, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let tokens = entries
            .into_iter()
            .map(|(token, user_id)| (token.into(), Identity::new(user_id)))
            .collect();
        Self { tokens }
    }

    /// Builds a verifier from the `[[identities]]` config section.
    #[must_use]
    pub fn from_config(identities: &[IdentityConfig]) -> Self {
        Self::new(
            identities
                .iter()
                .map(|entry| (entry.token.clone(), entry.user_id.clone())),
        )
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| Error::Authentication {
                message: "Invalid or expired token".to_string(),
            })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Result<&str> {
    let trimmed = header.trim();
    let token = match trimmed.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => trimmed,
    };
    if token.is_empty() {
        return Err(Error::Authentication {
            message: "No token found in authorization header".to_string(),
        });
    }
    Ok(token)
}

/// Resolves the acting identity for a guarded operation.
///
/// # Errors
/// Returns [`Error::Authentication`] if no credential was supplied, the header
/// carries no token, or the verifier rejects the token.
pub async fn resolve_identity(
    verifier: &dyn IdentityVerifier,
    credential: Option<&str>,
) -> Result<Identity> {
    let header = credential.ok_or_else(|| Error::Authentication {
        message: "No authorization header found".to_string(),
    })?;
    let token = bearer_token(header)?;
    let identity = verifier.verify(token).await?;
    tracing::debug!(%identity, "Resolved request identity");
    Ok(identity)
}

/// Checks that `identity` owns a record whose `created_by` is `owner`.
///
/// # Errors
/// Returns [`Error::Authorization`] naming the record when the owner differs.
pub fn authorize_owner(identity: &Identity, entity: &'static str, id: i64, owner: &str) -> Result<()> {
    if identity.as_str() == owner {
        Ok(())
    } else {
        tracing::warn!(%identity, entity, id, "Rejected access to record owned by another identity");
        Err(Error::Authorization {
            entity,
            id,
            identity: identity.to_string(),
        })
    }
}
