use gmfeed_core::{CatalogError, ConfigError, FieldParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("shop {shop_id} has no active products to export")]
    EmptyCatalog { shop_id: u32 },

    #[error("all {count} candidate products failed to load")]
    AllProductsFailed { count: usize },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed feed: {0}")]
    Malformed(String),

    #[error("malformed feed: {0}")]
    Field(#[from] FieldParseError),
}
