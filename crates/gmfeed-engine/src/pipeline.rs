//! Drives a full feed run: catalog in, XML out.

use std::io::Write;

use gmfeed_core::{
    CatalogError, CatalogReader, Category, FeedConfig, FeedItem, ImageRef, Product, Sellable,
};

use crate::context::FeedContext;
use crate::error::FeedError;
use crate::expand::{expand_combinations, sellable_units};
use crate::resolve::pricing::has_discount;
use crate::resolve::{resolve_item, ItemSource};
use crate::write::write_feed;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub products_seen: usize,
    pub products_skipped: usize,
    /// Items that reached the document. Zero until the feed is written.
    pub items_written: usize,
}

/// Product-level data shared by all of a product's items.
struct ProductData {
    product: Product,
    units: Vec<Sellable>,
    images: Vec<ImageRef>,
    categories: Vec<Category>,
    brand: Option<String>,
}

/// Generates the complete feed for the configured shop into `out`.
///
/// Items are collected before anything is written, so a run that fails never
/// leaves a partial document behind.
///
/// # Errors
///
/// Returns [`FeedError::Config`] when no usable currency exists,
/// [`FeedError::Catalog`] when the product listing fails,
/// [`FeedError::EmptyCatalog`] when the shop has no active products,
/// [`FeedError::AllProductsFailed`] when every product failed to load, and
/// [`FeedError::Io`] or [`FeedError::Xml`] when writing fails.
pub fn generate_feed<R, W>(
    reader: &R,
    config: &FeedConfig,
    out: W,
) -> Result<FeedStats, FeedError>
where
    R: CatalogReader + ?Sized,
    W: Write,
{
    let ctx = FeedContext::resolve(config, reader)?;
    let (items, mut stats) = collect_items(reader, &ctx)?;
    stats.items_written = write_feed(out, &ctx.header(), &items)?;

    tracing::info!(
        shop_id = ctx.shop_id,
        currency = %ctx.currency,
        products_seen = stats.products_seen,
        products_skipped = stats.products_skipped,
        items_written = stats.items_written,
        "feed generated"
    );
    Ok(stats)
}

/// Runs the reader, expander and resolver stages and returns the items in
/// feed order.
///
/// # Errors
///
/// See [`generate_feed`]; write errors cannot occur here.
pub fn collect_items<R>(
    reader: &R,
    ctx: &FeedContext,
) -> Result<(Vec<FeedItem>, FeedStats), FeedError>
where
    R: CatalogReader + ?Sized,
{
    let candidates = reader.list_active_products(ctx.shop_id)?;
    if candidates.is_empty() {
        return Err(FeedError::EmptyCatalog {
            shop_id: ctx.shop_id,
        });
    }

    let mut stats = FeedStats {
        products_seen: candidates.len(),
        ..FeedStats::default()
    };
    let mut items = Vec::new();

    for candidate in &candidates {
        let data = match load_product_data(reader, ctx, candidate.id) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(product_id = candidate.id, error = %e, "skipping product");
                stats.products_skipped += 1;
                continue;
            }
        };

        for unit in &data.units {
            if let Some(item) = build_item(reader, ctx, &data, unit) {
                items.push(item);
            }
        }
    }

    if stats.products_skipped == stats.products_seen {
        return Err(FeedError::AllProductsFailed {
            count: stats.products_seen,
        });
    }

    tracing::debug!(items = items.len(), "items resolved");
    Ok((items, stats))
}

/// Loads the product and its combinations (both required) plus the
/// product-level optional lookups.
fn load_product_data<R>(
    reader: &R,
    ctx: &FeedContext,
    product_id: u32,
) -> Result<ProductData, CatalogError>
where
    R: CatalogReader + ?Sized,
{
    let product = reader.load_product(product_id, ctx.lang_id, ctx.shop_id)?;
    let rows = reader.load_combinations(product_id, ctx.lang_id)?;
    let units = sellable_units(expand_combinations(rows));

    let images = degrade(
        reader.get_images(product_id, ctx.lang_id),
        product_id,
        "images",
    );
    let categories = if product.default_category_id == 0 {
        Vec::new()
    } else {
        degrade(
            reader.get_category_ancestors(product.default_category_id, ctx.lang_id),
            product_id,
            "categories",
        )
    };
    let brand = if product.manufacturer_id == 0 {
        None
    } else {
        degrade(
            reader.get_manufacturer(product.manufacturer_id, ctx.lang_id),
            product_id,
            "manufacturer",
        )
        .map(|m| m.name)
    };

    Ok(ProductData {
        product,
        units,
        images,
        categories,
        brand,
    })
}

/// Fetches the per-item lookups and resolves one item. `None` when the price
/// cannot be determined.
fn build_item<R>(
    reader: &R,
    ctx: &FeedContext,
    data: &ProductData,
    unit: &Sellable,
) -> Option<FeedItem>
where
    R: CatalogReader + ?Sized,
{
    let product = &data.product;
    let variant_id = unit.variant_id();

    let prices = reader
        .get_price(product.id, variant_id, true, false)
        .and_then(|regular| {
            reader
                .get_price(product.id, variant_id, true, true)
                .map(|final_price| (regular, final_price))
        });
    let (regular_price, final_price) = match prices {
        Ok(prices) => prices,
        Err(e) => {
            tracing::warn!(
                product_id = product.id,
                variant_id = ?variant_id,
                error = %e,
                "price lookup failed, skipping item"
            );
            return None;
        }
    };

    let discount_window = if has_discount(regular_price, final_price) {
        degrade(
            reader.get_discount_window(product.id, ctx.shop_id, variant_id),
            product.id,
            "discount window",
        )
    } else {
        None
    };

    let quantity = reader
        .get_quantity(product.id, variant_id)
        .unwrap_or_else(|e| {
            let fallback = unit.variant().map_or(0, |v| v.quantity);
            tracing::warn!(
                product_id = product.id,
                variant_id = ?variant_id,
                error = %e,
                fallback,
                "quantity lookup failed"
            );
            fallback
        });

    let combination_images = match variant_id {
        Some(id) => degrade(
            reader.get_combination_images(id),
            product.id,
            "combination images",
        ),
        None => Vec::new(),
    };

    let link = reader
        .product_link(product, variant_id, ctx.lang_id, ctx.shop_id)
        .unwrap_or_else(|e| {
            tracing::warn!(
                product_id = product.id,
                error = %e,
                "link lookup failed, using fallback"
            );
            fallback_link(&ctx.shop_url, product.id)
        });

    let source = ItemSource {
        product,
        sellable: unit,
        regular_price,
        final_price,
        discount_window,
        quantity,
        link,
        product_images: &data.images,
        combination_images: &combination_images,
        categories: &data.categories,
        brand: data.brand.as_deref(),
    };
    Some(resolve_item(ctx, &source))
}

/// Unwraps an optional lookup, logging and substituting the empty value on
/// failure.
fn degrade<T: Default>(result: Result<T, CatalogError>, product_id: u32, lookup: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(product_id, lookup, error = %e, "optional lookup failed");
        T::default()
    })
}

/// Query-string product URL every storefront answers, used when the catalog
/// cannot build the rewritten one.
fn fallback_link(shop_url: &str, product_id: u32) -> String {
    format!("{shop_url}index.php?id_product={product_id}&controller=product")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_link_uses_query_string() {
        assert_eq!(
            fallback_link("https://shop.example/", 42),
            "https://shop.example/index.php?id_product=42&controller=product"
        );
    }

    #[test]
    fn degrade_substitutes_default() {
        let failed: Result<Vec<ImageRef>, CatalogError> =
            Err(CatalogError::Backend("timeout".to_string()));
        assert!(degrade(failed, 1, "images").is_empty());

        let ok: Result<Option<String>, CatalogError> = Ok(Some("Acme".to_string()));
        assert_eq!(degrade(ok, 1, "manufacturer").as_deref(), Some("Acme"));
    }
}
