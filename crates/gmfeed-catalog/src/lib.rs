//! File-backed catalog snapshot implementing
//! [`CatalogReader`](gmfeed_core::CatalogReader).
//!
//! A snapshot is a YAML or JSON export of the host shop's catalog tables. It
//! is loaded and validated once, then answers every lookup from memory with
//! the host platform's pricing, stock and URL conventions.

pub mod error;
pub mod pricing;
pub mod snapshot;
pub mod types;

pub use error::SnapshotError;
pub use snapshot::SnapshotCatalog;
pub use types::{
    CategoryRecord, CombinationRecord, ImageRecord, ProductRecord, ReductionType, ShopInfo,
    SnapshotFile, SpecificPrice, Visibility,
};
