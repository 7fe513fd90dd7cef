//! Catalog records as the host shop hands them to the feed engine.
//!
//! These are read-only snapshots rebuilt for every feed run. Free-text fields
//! keep the host's conventions: an absent identifier is an empty string, not
//! `None`, and descriptions may contain HTML.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Id of the platform's invisible root category.
pub const ROOT_CATEGORY_ID: u32 = 1;
/// Id of the platform's "Home" category that sits directly under the root.
pub const HOME_CATEGORY_ID: u32 = 2;

/// The host's placeholder for "no date".
const ZERO_DATE_PREFIX: &str = "0000-00-00";

/// Lightweight handle returned by the active-product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: u32,
}

/// What the shop does when a stock-managed product runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfStockPolicy {
    Deny,
    Allow,
    #[default]
    UseDefault,
}

impl OutOfStockPolicy {
    /// Maps the host's numeric setting (`0` deny, `1` allow, `2` use default).
    ///
    /// Unknown values fall back to [`OutOfStockPolicy::UseDefault`].
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Deny,
            1 => Self::Allow,
            _ => Self::UseDefault,
        }
    }
}

/// A product loaded in one language for one shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Short description, raw HTML.
    #[serde(default)]
    pub description_short: String,
    /// Long description, raw HTML.
    #[serde(default)]
    pub description: String,
    /// Merchant reference, emitted as MPN when no variant overrides it.
    #[serde(default)]
    pub reference: String,
    /// EAN-13 / GTIN.
    #[serde(default)]
    pub ean13: String,
    /// `0` when the product has no manufacturer.
    #[serde(default)]
    pub manufacturer_id: u32,
    pub default_category_id: u32,
    /// Raw condition string; unrecognized values resolve to `new`.
    #[serde(default)]
    pub condition: String,
    #[serde(default = "default_true")]
    pub available_for_order: bool,
    #[serde(default)]
    pub out_of_stock: OutOfStockPolicy,
    /// URL slug used for links and host-generated image paths.
    #[serde(default)]
    pub link_rewrite: String,
}

/// One flattened row of the host's combination query: a single
/// attribute group/value pair of a single combination.
///
/// A combination with three attributes arrives as three rows sharing the same
/// `variant_id` and scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRow {
    pub variant_id: u32,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub ean13: String,
    #[serde(default)]
    pub upc: String,
    /// Price impact of the combination, tax excluded.
    #[serde(default)]
    pub price: rust_decimal::Decimal,
    #[serde(default)]
    pub quantity: i64,
    pub group_name: String,
    pub attribute_name: String,
}

/// An image reference. `url` may lack a scheme; the resolver makes it absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

impl Category {
    /// `true` for the root and home nodes, which never appear in a breadcrumb.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.id <= HOME_CATEGORY_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: u32,
    pub name: String,
}

/// Validity bounds of a discount rule, exactly as the host stores them
/// (`YYYY-MM-DD HH:MM:SS`). The host writes `0000-00-00 00:00:00` for an open
/// bound; [`parse_host_timestamp`] reads both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountWindow {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Parses one of the host's timestamp strings. Empty values and the zero-date
/// sentinel are an open bound (`Ok(None)`).
///
/// # Errors
///
/// Returns the offending input when it is neither `YYYY-MM-DD HH:MM:SS` nor
/// `YYYY-MM-DD`.
pub fn parse_host_timestamp(raw: &str) -> Result<Option<NaiveDateTime>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with(ZERO_DATE_PREFIX) {
        return Ok(None);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(ts));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| raw.to_string())
}

fn default_true() -> bool {
    true
}
