//! On-disk shape of a catalog snapshot.
//!
//! The layout follows the host's tables closely: combinations are a separate
//! list keyed by `product_id`, specific prices hang off their product, and
//! timestamps stay as the host's raw `YYYY-MM-DD HH:MM:SS` strings.
//!
//! Money values are decimal strings (`"83.33"`), tax rates are percentages
//! (`"7.7"`).

use gmfeed_core::{Attribute, Manufacturer, OutOfStockPolicy, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub shop: ShopInfo,
    pub default_currency: String,
    #[serde(default)]
    pub currencies: Vec<String>,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub manufacturers: Vec<Manufacturer>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub combinations: Vec<CombinationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopInfo {
    /// Host name without scheme, e.g. `shop.example`. Used for generated
    /// image paths, which the host emits scheme-less.
    pub domain: String,
    /// Storefront base URL for product links, e.g. `https://shop.example/`.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: u32,
    /// `None` (or `0`) for the root.
    #[serde(default)]
    pub parent_id: Option<u32>,
    pub name: String,
}

impl CategoryRecord {
    #[must_use]
    pub fn parent(&self) -> Option<u32> {
        self.parent_id.filter(|&p| p != 0)
    }
}

/// Where the host shows a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Both,
    Catalog,
    Search,
    #[serde(rename = "none")]
    Hidden,
}

impl Visibility {
    /// Only products reachable by browsing the catalog are exported.
    #[must_use]
    pub fn in_catalog(self) -> bool {
        matches!(self, Visibility::Both | Visibility::Catalog)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u32,
    #[serde(default)]
    pub position: u32,
    /// Absolute or scheme-less URL. When absent the host's default
    /// `large_default` path is generated.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionType {
    /// `reduction` is a percentage, `20` meaning 20 %.
    Percentage,
    /// `reduction` is a tax-included amount.
    Amount,
}

/// A discount rule scoped to a product, optionally narrowed to one shop and
/// one combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificPrice {
    /// `0` applies in every shop.
    #[serde(default)]
    pub shop_id: u32,
    /// `0` applies to the product and all its combinations.
    #[serde(default)]
    pub combination_id: u32,
    pub reduction: Decimal,
    pub reduction_type: ReductionType,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub visibility: Visibility,
    /// Shops the product is associated with; empty means every shop.
    #[serde(default)]
    pub shops: Vec<u32>,
    pub name: String,
    #[serde(default)]
    pub description_short: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub ean13: String,
    #[serde(default)]
    pub manufacturer_id: u32,
    #[serde(default)]
    pub default_category_id: u32,
    #[serde(default)]
    pub condition: String,
    #[serde(default = "default_true")]
    pub available_for_order: bool,
    #[serde(default)]
    pub out_of_stock: OutOfStockPolicy,
    #[serde(default)]
    pub link_rewrite: String,
    /// Base price, tax excluded.
    pub price: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub specific_prices: Vec<SpecificPrice>,
}

impl ProductRecord {
    #[must_use]
    pub fn sold_in(&self, shop_id: u32) -> bool {
        self.shops.is_empty() || self.shops.contains(&shop_id)
    }

    #[must_use]
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            description_short: self.description_short.clone(),
            description: self.description.clone(),
            reference: self.reference.clone(),
            ean13: self.ean13.clone(),
            manufacturer_id: self.manufacturer_id,
            default_category_id: self.default_category_id,
            condition: self.condition.clone(),
            available_for_order: self.available_for_order,
            out_of_stock: self.out_of_stock,
            link_rewrite: self.link_rewrite.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationRecord {
    pub id: u32,
    pub product_id: u32,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub ean13: String,
    #[serde(default)]
    pub upc: String,
    /// Price impact on top of the product base price, tax excluded.
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i64,
    pub attributes: Vec<Attribute>,
    /// Ids of the product images shown for this combination, in display order.
    #[serde(default)]
    pub image_ids: Vec<u32>,
}

fn default_true() -> bool {
    true
}
