/// Database connection lifecycle and schema registration
pub mod database;

/// Application settings, seed stores and identities loaded from config.toml
pub mod app;
