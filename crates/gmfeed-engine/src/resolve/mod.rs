//! Item Resolver: computes every feed field for one (product, variant) pair.
//!
//! Resolution is pure. All catalog lookups happen beforehand in the pipeline
//! and arrive here as an [`ItemSource`]; missing optional data turns into an
//! omitted field, never an error.

pub mod attributes;
pub mod availability;
pub mod identity;
pub mod images;
pub mod pricing;
pub mod taxonomy;
pub mod text;

use gmfeed_core::{Category, Condition, DiscountWindow, FeedItem, ImageRef, Product, Sellable};
use rust_decimal::Decimal;

use crate::context::FeedContext;

use self::attributes::extract_size_color;
use self::availability::{resolve_availability, StockState};
use self::identity::Identifiers;
use self::images::resolve_images;
use self::pricing::ResolvedPricing;
use self::taxonomy::category_path;
use self::text::{build_description, build_title};

/// Everything fetched from the catalog for one sellable unit.
#[derive(Debug, Clone)]
pub struct ItemSource<'a> {
    pub product: &'a Product,
    pub sellable: &'a Sellable,
    /// Tax-included price without reductions, unrounded.
    pub regular_price: Decimal,
    /// Tax-included price with active reductions, unrounded.
    pub final_price: Decimal,
    pub discount_window: Option<DiscountWindow>,
    pub quantity: i64,
    pub link: String,
    pub product_images: &'a [ImageRef],
    pub combination_images: &'a [ImageRef],
    /// Root-first ancestor chain of the default category.
    pub categories: &'a [Category],
    pub brand: Option<&'a str>,
}

/// Builds the feed item for one sellable unit.
#[must_use]
pub fn resolve_item(ctx: &FeedContext, source: &ItemSource<'_>) -> FeedItem {
    let product = source.product;
    let variant = source.sellable.variant();

    let pricing = ResolvedPricing::new(source.regular_price, source.final_price)
        .with_window(source.discount_window.as_ref(), ctx.tz_offset);

    let availability = resolve_availability(
        StockState {
            available_for_order: product.available_for_order,
            policy: product.out_of_stock,
            quantity: source.quantity,
        },
        ctx.stock_management,
        ctx.order_out_of_stock,
    );

    let ids = Identifiers::resolve(product, variant);
    let identifier_exists = ids.exist();
    let images = resolve_images(source.combination_images, source.product_images);
    let size_color = variant
        .map(|v| extract_size_color(&v.attributes))
        .unwrap_or_default();

    FeedItem {
        id: source.sellable.item_id(product.id),
        title: build_title(&product.name, variant),
        description: build_description(&product.description_short, &product.description),
        link: source.link.clone(),
        image_link: images.primary,
        additional_image_links: images.additional,
        availability,
        price: pricing.price(&ctx.currency),
        sale_price: pricing.sale_price(&ctx.currency),
        sale_price_effective_date: pricing.discount_window,
        brand: source
            .brand
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string),
        gtin: ids.gtin,
        mpn: ids.mpn,
        identifier_exists,
        condition: Condition::from_raw(&product.condition),
        product_type: category_path(source.categories),
        item_group_id: variant.map(|_| product.id.to_string()),
        size: size_color.size,
        color: size_color.color,
        shipping: ctx.shipping(),
    }
}
