//! Shared data model for the merchant feed workspace: catalog records as the
//! host shop exposes them, resolved feed items, run configuration, and the
//! [`CatalogReader`] seam every catalog backend implements.

pub mod catalog;
pub mod config;
pub mod feed_config;
pub mod items;
pub mod reader;

pub use catalog::{
    parse_host_timestamp, Category, CombinationRow, DiscountWindow, ImageRef, Manufacturer,
    OutOfStockPolicy, Product, ProductRef, HOME_CATEGORY_ID, ROOT_CATEGORY_ID,
};
pub use config::{load_feed_config, load_feed_config_from_env};
pub use feed_config::FeedConfig;
pub use items::{
    Attribute, Availability, Condition, FeedItem, FieldParseError, Money, SaleWindow, Sellable,
    Shipping, Variant,
};
pub use reader::CatalogReader;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("no usable currency: {0}")]
    Currency(String),
}

/// Failure reported by a [`CatalogReader`] backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("invalid record {id}: {reason}")]
    Invalid { id: u32, reason: String },

    #[error("catalog backend error: {0}")]
    Backend(String),
}
