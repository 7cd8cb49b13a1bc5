//! Error types for the relmap crate
//!
//! This module contains all error types that can be returned by relmap operations.

use thiserror::Error;

use config::ConfigError;
use type_mapping::MappingError;

#[derive(Error, Debug)]
pub enum RelmapError {
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No mapping found for {0}")]
    MappingNotFound(String),
}
