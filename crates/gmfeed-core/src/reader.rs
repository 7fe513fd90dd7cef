//! The seam between the feed engine and whatever stores the catalog.

use rust_decimal::Decimal;

use crate::catalog::{
    Category, CombinationRow, DiscountWindow, ImageRef, Manufacturer, Product, ProductRef,
};
use crate::CatalogError;

/// Read-only access to one shop's catalog.
///
/// Implementations are expected to present a consistent snapshot for the
/// duration of a feed run. Every lookup may fail; the engine decides per call
/// whether a failure skips the record or only blanks a field.
pub trait CatalogReader {
    /// Active products visible in the catalog, in the order they should appear
    /// in the feed.
    fn list_active_products(&self, shop_id: u32) -> Result<Vec<ProductRef>, CatalogError>;

    fn load_product(&self, id: u32, lang_id: u32, shop_id: u32) -> Result<Product, CatalogError>;

    /// Flattened combination rows, one per attribute of each combination.
    fn load_combinations(
        &self,
        product_id: u32,
        lang_id: u32,
    ) -> Result<Vec<CombinationRow>, CatalogError>;

    /// Unrounded unit price. `apply_reductions = false` yields the full price.
    fn get_price(
        &self,
        product_id: u32,
        variant_id: Option<u32>,
        with_tax: bool,
        apply_reductions: bool,
    ) -> Result<Decimal, CatalogError>;

    /// Validity window of the most specific discount rule that applies to the
    /// product (or variant) in this shop, if any.
    fn get_discount_window(
        &self,
        product_id: u32,
        shop_id: u32,
        variant_id: Option<u32>,
    ) -> Result<Option<DiscountWindow>, CatalogError>;

    fn get_quantity(&self, product_id: u32, variant_id: Option<u32>) -> Result<i64, CatalogError>;

    fn get_images(&self, product_id: u32, lang_id: u32) -> Result<Vec<ImageRef>, CatalogError>;

    fn get_combination_images(&self, variant_id: u32) -> Result<Vec<ImageRef>, CatalogError>;

    /// Ancestor chain of a category, root first, ending with the category itself.
    fn get_category_ancestors(
        &self,
        category_id: u32,
        lang_id: u32,
    ) -> Result<Vec<Category>, CatalogError>;

    fn get_manufacturer(
        &self,
        id: u32,
        lang_id: u32,
    ) -> Result<Option<Manufacturer>, CatalogError>;

    /// Canonical storefront URL of the product, pointing at the variant when given.
    fn product_link(
        &self,
        product: &Product,
        variant_id: Option<u32>,
        lang_id: u32,
        shop_id: u32,
    ) -> Result<String, CatalogError>;

    fn currency_exists(&self, iso_code: &str) -> bool;

    /// ISO code of the shop's default currency.
    fn default_currency(&self) -> String;
}
