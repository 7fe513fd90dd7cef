use std::path::PathBuf;

use chrono::FixedOffset;
use rust_decimal::Decimal;

/// Run-wide settings for one feed generation.
///
/// Built once before the pipeline starts and passed down by reference; nothing
/// in the engine reads the environment directly.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Shop base URL, always ending in `/`.
    pub shop_url: String,
    pub shop_name: String,
    pub shop_id: u32,
    pub lang_id: u32,
    /// Upper-case ISO 4217 code requested for the feed.
    pub currency: String,
    /// Upper-case ISO 3166 alpha-2 code.
    pub shipping_country: String,
    pub shipping_price: Decimal,
    /// Global stock-management toggle.
    pub stock_management: bool,
    /// Shop default for products whose out-of-stock policy defers to it:
    /// `true` accepts backorders.
    pub order_out_of_stock: bool,
    /// Offset applied to the host's naive discount timestamps.
    pub tz_offset: FixedOffset,
    pub catalog_path: PathBuf,
    pub log_level: String,
}
