//! Product-to-feed transformation engine.
//!
//! Catalog records flow through four stages, strictly in order:
//! the [`CatalogReader`](gmfeed_core::CatalogReader) supplies products, the
//! [`expand`] stage groups combination rows into variants, [`resolve`] turns
//! each (product, variant) pair into a [`FeedItem`](gmfeed_core::FeedItem),
//! and [`write`] renders the items as a Google Merchant RSS document.
//! [`pipeline`] wires the stages together; [`read`] parses a written feed back.

pub mod context;
pub mod error;
pub mod expand;
pub mod pipeline;
pub mod read;
pub mod resolve;
pub mod write;

pub use context::FeedContext;
pub use error::FeedError;
pub use expand::{expand_combinations, sellable_units};
pub use pipeline::{collect_items, generate_feed, FeedStats};
pub use read::{read_feed, ParsedFeed};
pub use resolve::{resolve_item, ItemSource};
pub use write::{write_feed, FeedHeader, FeedWriter};
