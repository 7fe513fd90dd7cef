//! In-memory [`CatalogReader`] for pipeline tests.
//!
//! Every lookup answers from plain maps; failures are injected per product or
//! per (product, variant) pair.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::FixedOffset;
use gmfeed_core::{
    CatalogError, CatalogReader, Category, CombinationRow, DiscountWindow, FeedConfig, ImageRef,
    Manufacturer, OutOfStockPolicy, Product, ProductRef,
};
use rust_decimal::Decimal;

pub const SHOP_URL: &str = "https://shop.example/";

#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub products: Vec<Product>,
    pub combinations: HashMap<u32, Vec<CombinationRow>>,
    /// `(regular, final)` keyed by `(product_id, variant_id)`; missing keys
    /// price at 10.00 without reduction.
    pub prices: HashMap<(u32, Option<u32>), (Decimal, Decimal)>,
    pub windows: HashMap<u32, DiscountWindow>,
    pub quantities: HashMap<(u32, Option<u32>), i64>,
    pub images: HashMap<u32, Vec<ImageRef>>,
    pub combination_images: HashMap<u32, Vec<ImageRef>>,
    pub categories: HashMap<u32, Vec<Category>>,
    pub manufacturers: HashMap<u32, Manufacturer>,
    pub currencies: Vec<String>,
    pub default_currency: String,
    pub fail_listing: bool,
    pub failing_products: HashSet<u32>,
    pub failing_prices: HashSet<(u32, Option<u32>)>,
    pub failing_quantities: HashSet<(u32, Option<u32>)>,
    pub failing_images: bool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            currencies: vec!["CHF".to_string()],
            default_currency: "CHF".to_string(),
            ..Self::default()
        }
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_rows(mut self, product_id: u32, rows: Vec<CombinationRow>) -> Self {
        self.combinations.insert(product_id, rows);
        self
    }

    pub fn with_price(
        mut self,
        product_id: u32,
        variant_id: Option<u32>,
        regular: Decimal,
        final_price: Decimal,
    ) -> Self {
        self.prices
            .insert((product_id, variant_id), (regular, final_price));
        self
    }

    fn product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl CatalogReader for FakeCatalog {
    fn list_active_products(&self, _shop_id: u32) -> Result<Vec<ProductRef>, CatalogError> {
        if self.fail_listing {
            return Err(CatalogError::Backend("listing unavailable".to_string()));
        }
        Ok(self.products.iter().map(|p| ProductRef { id: p.id }).collect())
    }

    fn load_product(&self, id: u32, _lang_id: u32, _shop_id: u32) -> Result<Product, CatalogError> {
        if self.failing_products.contains(&id) {
            return Err(CatalogError::Backend(format!("product {id} unreadable")));
        }
        self.product(id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                entity: "product",
                id,
            })
    }

    fn load_combinations(
        &self,
        product_id: u32,
        _lang_id: u32,
    ) -> Result<Vec<CombinationRow>, CatalogError> {
        Ok(self
            .combinations
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_price(
        &self,
        product_id: u32,
        variant_id: Option<u32>,
        _with_tax: bool,
        apply_reductions: bool,
    ) -> Result<Decimal, CatalogError> {
        if self.failing_prices.contains(&(product_id, variant_id)) {
            return Err(CatalogError::Backend("price rule corrupt".to_string()));
        }
        let (regular, final_price) = self
            .prices
            .get(&(product_id, variant_id))
            .copied()
            .unwrap_or((Decimal::new(1000, 2), Decimal::new(1000, 2)));
        Ok(if apply_reductions { final_price } else { regular })
    }

    fn get_discount_window(
        &self,
        product_id: u32,
        _shop_id: u32,
        _variant_id: Option<u32>,
    ) -> Result<Option<DiscountWindow>, CatalogError> {
        Ok(self.windows.get(&product_id).cloned())
    }

    fn get_quantity(&self, product_id: u32, variant_id: Option<u32>) -> Result<i64, CatalogError> {
        if self.failing_quantities.contains(&(product_id, variant_id)) {
            return Err(CatalogError::Backend("stock service down".to_string()));
        }
        Ok(self
            .quantities
            .get(&(product_id, variant_id))
            .copied()
            .unwrap_or(5))
    }

    fn get_images(&self, product_id: u32, _lang_id: u32) -> Result<Vec<ImageRef>, CatalogError> {
        if self.failing_images {
            return Err(CatalogError::Backend("image table locked".to_string()));
        }
        Ok(self.images.get(&product_id).cloned().unwrap_or_default())
    }

    fn get_combination_images(&self, variant_id: u32) -> Result<Vec<ImageRef>, CatalogError> {
        Ok(self
            .combination_images
            .get(&variant_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_category_ancestors(
        &self,
        category_id: u32,
        _lang_id: u32,
    ) -> Result<Vec<Category>, CatalogError> {
        self.categories
            .get(&category_id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                entity: "category",
                id: category_id,
            })
    }

    fn get_manufacturer(
        &self,
        id: u32,
        _lang_id: u32,
    ) -> Result<Option<Manufacturer>, CatalogError> {
        Ok(self.manufacturers.get(&id).cloned())
    }

    fn product_link(
        &self,
        product: &Product,
        variant_id: Option<u32>,
        _lang_id: u32,
        _shop_id: u32,
    ) -> Result<String, CatalogError> {
        Ok(match variant_id {
            Some(v) => format!("{SHOP_URL}{}-{v}-{}.html", product.id, product.link_rewrite),
            None => format!("{SHOP_URL}{}-{}.html", product.id, product.link_rewrite),
        })
    }

    fn currency_exists(&self, iso_code: &str) -> bool {
        self.currencies.iter().any(|c| c == iso_code)
    }

    fn default_currency(&self) -> String {
        self.default_currency.clone()
    }
}

pub fn make_product(id: u32, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        description_short: format!("<p>{name} description</p>"),
        description: String::new(),
        reference: format!("REF-{id}"),
        ean13: String::new(),
        manufacturer_id: 0,
        default_category_id: 0,
        condition: "new".to_string(),
        available_for_order: true,
        out_of_stock: OutOfStockPolicy::Deny,
        link_rewrite: name.to_lowercase().replace(' ', "-"),
    }
}

pub fn row(variant_id: u32, group: &str, value: &str) -> CombinationRow {
    CombinationRow {
        variant_id,
        reference: String::new(),
        ean13: String::new(),
        upc: String::new(),
        price: Decimal::ZERO,
        quantity: 3,
        group_name: group.to_string(),
        attribute_name: value.to_string(),
    }
}

pub fn test_config() -> FeedConfig {
    FeedConfig {
        shop_url: SHOP_URL.to_string(),
        shop_name: "Example Shop".to_string(),
        shop_id: 1,
        lang_id: 1,
        currency: "CHF".to_string(),
        shipping_country: "CH".to_string(),
        shipping_price: Decimal::ZERO,
        stock_management: true,
        order_out_of_stock: false,
        tz_offset: FixedOffset::east_opt(0).unwrap(),
        catalog_path: PathBuf::from("catalog.yaml"),
        log_level: "info".to_string(),
    }
}
