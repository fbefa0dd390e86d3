//! Unified error type for the pantry planner.
//!
//! Every fallible operation returns [`Result`]. Record-store failures are wrapped
//! with the name of the operation that issued them so callers can tell a failed
//! "fetch shopping list" from a failed "count shopping list items" without
//! inspecting the underlying driver error.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the business-rule layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A single-row fetch matched nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up (e.g. "inventory item")
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// Input violated a record invariant.
    #[error("Validation failed: {message}")]
    Validation {
        /// Which constraint was violated
        message: String,
    },

    /// No credential, or a credential the verifier rejected.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Why the credential was rejected
        message: String,
    },

    /// The caller is authenticated but does not own the target record.
    #[error("{entity} {id} is not owned by {identity}")]
    Authorization {
        /// Kind of record the caller tried to touch
        entity: &'static str,
        /// Identifier of that record
        id: i64,
        /// Identity that attempted the operation
        identity: String,
    },

    /// The record store reported something other than "no rows".
    #[error("Failed to {operation}: {source}")]
    Store {
        /// Operation that issued the failing statement
        operation: &'static str,
        /// Driver error
        #[source]
        source: DbErr,
    },

    /// Unwrapped database error, used where no operation context applies (setup, tests).
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Application configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// I/O failure outside the record store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true if this is a [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Attaches an operation name to record-store failures.
pub trait StoreContext<T> {
    /// Wraps a [`DbErr`] into [`Error::Store`] tagged with `operation`.
    fn context(self, operation: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, DbErr> {
    fn context(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| Error::Store { operation, source })
    }
}

/// Turns a single-row fetch's [`Error::NotFound`] into `Ok(None)`.
///
/// Read operations report a missing row as an empty result; every other
/// error kind passes through unchanged.
pub trait OptionalExt<T> {
    /// Maps `NotFound` to `None` and success to `Some`.
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_store_context_wraps_db_errors() {
        let failed: std::result::Result<(), DbErr> = Err(DbErr::Custom("boom".to_string()));
        let err = failed.context("fetch store").unwrap_err();
        assert!(matches!(
            err,
            Error::Store {
                operation: "fetch store",
                ..
            }
        ));
        assert!(err.to_string().starts_with("Failed to fetch store: "));
    }

    #[test]
    fn test_optional_only_swallows_not_found() {
        let missing: Result<i32> = Err(Error::NotFound {
            entity: "store",
            id: 1,
        });
        assert!(missing.optional().unwrap().is_none());

        let found: Result<i32> = Ok(3);
        assert_eq!(found.optional().unwrap(), Some(3));

        let failed: Result<i32> = Err(Error::validation("bad"));
        assert!(matches!(failed.optional(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            entity: "store",
            id: 7,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "store 7 not found");
    }
}
