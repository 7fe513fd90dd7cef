//! Resolved feed items and the value types they are built from.
//!
//! [`FeedItem`] mirrors the wire format one-to-one: every field maps to exactly
//! one `g:` element, optional fields are `None`/empty when the element is
//! omitted. Rendering and parsing of the compound text values (`Money`,
//! `SaleWindow`) live here so the writer and the reader share one definition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A wire value that could not be parsed back into its typed form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot parse {field} from {value:?}")]
pub struct FieldParseError {
    pub field: &'static str,
    pub value: String,
}

impl FieldParseError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// One attribute group/value pair of a variant, e.g. `("Size", "XL")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub group: String,
    pub name: String,
}

/// A distinct sellable combination of a product, assembled from one or more
/// combination rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u32,
    pub reference: String,
    pub ean13: String,
    /// Informational only; `g:gtin` comes from `ean13`.
    pub upc: String,
    /// Price impact, tax excluded, as carried by the first row. Informational
    /// only; item prices come from [`CatalogReader::get_price`].
    ///
    /// [`CatalogReader::get_price`]: crate::CatalogReader::get_price
    pub price: Decimal,
    /// Stock from the combination row; used when the quantity lookup fails.
    pub quantity: i64,
    /// Attribute pairs in row order.
    pub attributes: Vec<Attribute>,
}

/// The unit a feed item is generated for.
///
/// A product without combinations is sold as itself ([`Sellable::Simple`]); a
/// product with combinations is only ever sold through them.
#[derive(Debug, Clone, PartialEq)]
pub enum Sellable {
    Simple,
    Variant(Variant),
}

impl Sellable {
    #[must_use]
    pub fn variant(&self) -> Option<&Variant> {
        match self {
            Sellable::Simple => None,
            Sellable::Variant(v) => Some(v),
        }
    }

    #[must_use]
    pub fn variant_id(&self) -> Option<u32> {
        self.variant().map(|v| v.id)
    }

    /// Feed item id: `"42"` for a simple product, `"42-7"` for variant 7.
    #[must_use]
    pub fn item_id(&self, product_id: u32) -> String {
        match self {
            Sellable::Simple => product_id.to_string(),
            Sellable::Variant(v) => format!("{product_id}-{}", v.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Backorder,
}

impl Availability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::InStock => "in_stock",
            Availability::OutOfStock => "out_of_stock",
            Availability::Backorder => "backorder",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Availability::InStock),
            "out_of_stock" => Ok(Availability::OutOfStock),
            "backorder" => Ok(Availability::Backorder),
            _ => Err(FieldParseError::new("availability", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    New,
    Used,
    Refurbished,
}

impl Condition {
    /// Interprets the host's condition string. Anything unrecognized,
    /// including an empty value, is `new`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "used" => Condition::Used,
            "refurbished" => Condition::Refurbished,
            _ => Condition::New,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            "refurbished" => Ok(Condition::Refurbished),
            _ => Err(FieldParseError::new("condition", s)),
        }
    }
}

/// An amount in a currency, rendered as `"100.00 CHF"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        write!(f, "{amount} {}", self.currency)
    }
}

impl FromStr for Money {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, currency) = s
            .split_once(' ')
            .ok_or_else(|| FieldParseError::new("price", s))?;
        let amount = amount
            .parse::<Decimal>()
            .map_err(|_| FieldParseError::new("price", s))?;
        if currency.is_empty() {
            return Err(FieldParseError::new("price", s));
        }
        Ok(Money::new(amount, currency))
    }
}

/// Sale validity interval; either bound may be open. Rendered as
/// `from/to` with RFC 3339 timestamps and an empty string for an open bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleWindow {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl SaleWindow {
    /// `None` when both bounds are open: there is nothing to emit.
    #[must_use]
    pub fn new(
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
    ) -> Option<Self> {
        (from.is_some() || to.is_some()).then_some(Self { from, to })
    }
}

impl fmt::Display for SaleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |d: &Option<DateTime<FixedOffset>>| {
            d.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, false))
                .unwrap_or_default()
        };
        write!(f, "{}/{}", render(&self.from), render(&self.to))
    }
}

impl FromStr for SaleWindow {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('/')
            .ok_or_else(|| FieldParseError::new("sale_price_effective_date", s))?;
        let parse = |part: &str| -> Result<Option<DateTime<FixedOffset>>, FieldParseError> {
            if part.is_empty() {
                return Ok(None);
            }
            DateTime::parse_from_rfc3339(part)
                .map(Some)
                .map_err(|_| FieldParseError::new("sale_price_effective_date", s))
        };
        SaleWindow::new(parse(from)?, parse(to)?)
            .ok_or_else(|| FieldParseError::new("sale_price_effective_date", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipping {
    pub country: String,
    pub price: Money,
}

/// One exportable unit of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: Option<String>,
    /// At most ten entries.
    pub additional_image_links: Vec<String>,
    pub availability: Availability,
    /// Regular price when on sale, otherwise the price the customer pays.
    pub price: Money,
    pub sale_price: Option<Money>,
    pub sale_price_effective_date: Option<SaleWindow>,
    pub brand: Option<String>,
    pub gtin: Option<String>,
    pub mpn: Option<String>,
    /// `false` only when both `gtin` and `mpn` are absent.
    pub identifier_exists: bool,
    pub condition: Condition,
    pub product_type: Option<String>,
    /// Parent product id; set for variants only.
    pub item_group_id: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub shipping: Shipping,
}

impl FeedItem {
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.sale_price.is_some()
    }
}
