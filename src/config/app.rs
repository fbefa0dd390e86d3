//! Application configuration loading from config.toml
//!
//! The file carries three optional sections:
//! - `[pricing]` tunes the cheapest-offer lookup fan-out
//! - `[[stores]]` lists stores to seed on startup (matched by name, never duplicated)
//! - `[[identities]]` maps bearer tokens to household member ids for the built-in verifier

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default number of price lookups allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Price comparison settings
    pub pricing: PricingConfig,
    /// Stores to seed
    pub stores: Vec<StoreConfig>,
    /// Token table for the built-in identity verifier
    pub identities: Vec<IdentityConfig>,
}

/// Settings for the cheapest-offer aggregation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Upper bound on concurrent per-item price lookups
    pub max_concurrent_lookups: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// Configuration for a single seeded store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store name, used as the seeding key
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Website URL
    pub website: Option<String>,
}

/// A bearer token and the identity it resolves to
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Opaque bearer token
    pub token: String,
    /// Identity recorded in `created_by`/`updated_by` for requests using the token
    pub user_id: String,
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A section has the wrong shape
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses application configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `PANTRY_CONFIG`, or `./config.toml` when unset.
///
/// A missing file is not an error: the defaults (no seeded stores, no identities)
/// are returned instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("PANTRY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!("Config file {path} not found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [pricing]
            max_concurrent_lookups = 8

            [[stores]]
            name = "Corner Market"
            address = "1 Main St"

            [[stores]]
            name = "Bulk Barn"
            website = "https://bulk.example"

            [[identities]]
            token = "alice-token"
            user_id = "alice"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.pricing.max_concurrent_lookups, 8);
        assert_eq!(config.stores.len(), 2);
        assert_eq!(config.stores[0].name, "Corner Market");
        assert_eq!(config.stores[0].address.as_deref(), Some("1 Main St"));
        assert!(config.stores[1].address.is_none());
        assert_eq!(config.identities[0].user_id, "alice");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(
            config.pricing.max_concurrent_lookups,
            DEFAULT_MAX_CONCURRENT_LOOKUPS
        );
        assert!(config.stores.is_empty());
        assert!(config.identities.is_empty());
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let result = parse_config("[[stores]]\naddress = 3");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_shipped_config_enables_no_tokens() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
        let config = load_config(path).unwrap();
        assert!(config.identities.is_empty());
        assert_eq!(config.stores.len(), 2);
    }
}
