//! In-memory catalog loaded from a snapshot file.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use gmfeed_core::{
    parse_host_timestamp, CatalogError, CatalogReader, Category, CombinationRow, DiscountWindow,
    ImageRef, Manufacturer, Product, ProductRef,
};
use rust_decimal::Decimal;

use crate::error::SnapshotError;
use crate::pricing::{select_rule, unit_price};
use crate::types::{CombinationRecord, ImageRecord, ProductRecord, SnapshotFile};

/// Validated, indexed snapshot answering [`CatalogReader`] lookups.
///
/// Prices are evaluated for one shop (see [`SnapshotCatalog::for_shop`]) at
/// one instant (see [`SnapshotCatalog::with_as_of`]); both default to shop 1
/// and the load time.
#[derive(Debug, Clone)]
pub struct SnapshotCatalog {
    data: SnapshotFile,
    shop_id: u32,
    as_of: NaiveDateTime,
    products: HashMap<u32, usize>,
    combinations: HashMap<u32, usize>,
    categories: HashMap<u32, usize>,
}

impl SnapshotCatalog {
    /// Loads a snapshot, choosing the parser from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedFormat`] for an unknown extension,
    /// [`SnapshotError::Io`] if the file cannot be read, a parse error, or
    /// [`SnapshotError::Validation`] if the contents are inconsistent.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let is_json = match ext.as_deref() {
            Some("yaml" | "yml") => false,
            Some("json") => true,
            _ => {
                return Err(SnapshotError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = if is_json {
            Self::from_json_str(&raw)?
        } else {
            Self::from_yaml_str(&raw)?
        };
        tracing::info!(
            path = %path.display(),
            products = catalog.data.products.len(),
            combinations = catalog.data.combinations.len(),
            "catalog snapshot loaded"
        );
        Ok(catalog)
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::Yaml`] or [`SnapshotError::Validation`].
    pub fn from_yaml_str(raw: &str) -> Result<Self, SnapshotError> {
        Self::from_file(serde_yaml::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] or [`SnapshotError::Validation`].
    pub fn from_json_str(raw: &str) -> Result<Self, SnapshotError> {
        Self::from_file(serde_json::from_str(raw)?)
    }

    /// Validates and indexes already-parsed snapshot data.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] describing the first problem found.
    pub fn from_file(data: SnapshotFile) -> Result<Self, SnapshotError> {
        let products = unique_index(data.products.iter().map(|p| p.id), "product")?;
        let combinations = unique_index(data.combinations.iter().map(|c| c.id), "combination")?;
        let categories = unique_index(data.categories.iter().map(|c| c.id), "category")?;
        unique_index(data.manufacturers.iter().map(|m| m.id), "manufacturer")?;

        let catalog = Self {
            data,
            shop_id: 1,
            as_of: Local::now().naive_local(),
            products,
            combinations,
            categories,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Shop whose specific prices apply to [`CatalogReader::get_price`].
    #[must_use]
    pub fn for_shop(mut self, shop_id: u32) -> Self {
        self.shop_id = shop_id;
        self
    }

    /// Instant at which discount rules are evaluated.
    #[must_use]
    pub fn with_as_of(mut self, as_of: NaiveDateTime) -> Self {
        self.as_of = as_of;
        self
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        for combo in &self.data.combinations {
            let Some(product) = self.product_record(combo.product_id) else {
                return Err(invalid(format!(
                    "combination {} references unknown product {}",
                    combo.id, combo.product_id
                )));
            };
            if combo.attributes.is_empty() {
                return Err(invalid(format!("combination {} has no attributes", combo.id)));
            }
            for image_id in &combo.image_ids {
                if !product.images.iter().any(|img| img.id == *image_id) {
                    return Err(invalid(format!(
                        "combination {} shows image {image_id} which product {} does not have",
                        combo.id, product.id
                    )));
                }
            }
        }

        for category in &self.data.categories {
            let mut seen = HashSet::from([category.id]);
            let mut current = category.parent();
            while let Some(parent_id) = current {
                let Some(&idx) = self.categories.get(&parent_id) else {
                    return Err(invalid(format!(
                        "category {} has unknown parent {parent_id}",
                        category.id
                    )));
                };
                if !seen.insert(parent_id) {
                    return Err(invalid(format!(
                        "category {} is part of a parent cycle",
                        category.id
                    )));
                }
                current = self.data.categories[idx].parent();
            }
        }

        for product in &self.data.products {
            for rule in &product.specific_prices {
                for raw in [&rule.from, &rule.to].into_iter().flatten() {
                    if let Err(bad) = parse_host_timestamp(raw) {
                        return Err(invalid(format!(
                            "product {} has a specific price with unreadable date {bad:?}",
                            product.id
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn product_record(&self, id: u32) -> Option<&ProductRecord> {
        self.products.get(&id).map(|&idx| &self.data.products[idx])
    }

    fn require_product(&self, id: u32) -> Result<&ProductRecord, CatalogError> {
        self.product_record(id).ok_or(CatalogError::NotFound {
            entity: "product",
            id,
        })
    }

    /// The combination, checked to belong to `product_id`.
    fn require_combination(
        &self,
        product_id: u32,
        variant_id: u32,
    ) -> Result<&CombinationRecord, CatalogError> {
        self.combinations
            .get(&variant_id)
            .map(|&idx| &self.data.combinations[idx])
            .filter(|c| c.product_id == product_id)
            .ok_or(CatalogError::NotFound {
                entity: "combination",
                id: variant_id,
            })
    }

    fn image_ref(&self, product: &ProductRecord, image: &ImageRecord) -> ImageRef {
        let url = image.url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}-large_default/{}.jpg",
                self.data.shop.domain.trim_end_matches('/'),
                image.id,
                product.link_rewrite
            )
        });
        ImageRef { id: image.id, url }
    }
}

impl CatalogReader for SnapshotCatalog {
    fn list_active_products(&self, shop_id: u32) -> Result<Vec<ProductRef>, CatalogError> {
        Ok(self
            .data
            .products
            .iter()
            .filter(|p| p.active && p.visibility.in_catalog() && p.sold_in(shop_id))
            .map(|p| ProductRef { id: p.id })
            .collect())
    }

    /// Snapshots carry a single language; `lang_id` is accepted and ignored.
    fn load_product(&self, id: u32, _lang_id: u32, shop_id: u32) -> Result<Product, CatalogError> {
        let record = self.require_product(id)?;
        if !record.sold_in(shop_id) {
            return Err(CatalogError::NotFound {
                entity: "product",
                id,
            });
        }
        Ok(record.to_product())
    }

    fn load_combinations(
        &self,
        product_id: u32,
        _lang_id: u32,
    ) -> Result<Vec<CombinationRow>, CatalogError> {
        self.require_product(product_id)?;
        Ok(self
            .data
            .combinations
            .iter()
            .filter(|c| c.product_id == product_id)
            .flat_map(|c| {
                c.attributes.iter().map(move |attr| CombinationRow {
                    variant_id: c.id,
                    reference: c.reference.clone(),
                    ean13: c.ean13.clone(),
                    upc: c.upc.clone(),
                    price: c.price,
                    quantity: c.quantity,
                    group_name: attr.group.clone(),
                    attribute_name: attr.name.clone(),
                })
            })
            .collect())
    }

    fn get_price(
        &self,
        product_id: u32,
        variant_id: Option<u32>,
        with_tax: bool,
        apply_reductions: bool,
    ) -> Result<Decimal, CatalogError> {
        let product = self.require_product(product_id)?;
        let impact = match variant_id {
            Some(v) => self.require_combination(product_id, v)?.price,
            None => Decimal::ZERO,
        };
        let rule = if apply_reductions {
            select_rule(&product.specific_prices, self.shop_id, variant_id, self.as_of)
        } else {
            None
        };
        Ok(unit_price(
            product.price + impact,
            product.tax_rate,
            with_tax,
            rule,
        ))
    }

    fn get_discount_window(
        &self,
        product_id: u32,
        shop_id: u32,
        variant_id: Option<u32>,
    ) -> Result<Option<DiscountWindow>, CatalogError> {
        let product = self.require_product(product_id)?;
        Ok(
            select_rule(&product.specific_prices, shop_id, variant_id, self.as_of).map(|rule| {
                DiscountWindow {
                    from: rule.from.clone(),
                    to: rule.to.clone(),
                }
            }),
        )
    }

    fn get_quantity(&self, product_id: u32, variant_id: Option<u32>) -> Result<i64, CatalogError> {
        match variant_id {
            Some(v) => Ok(self.require_combination(product_id, v)?.quantity),
            None => Ok(self.require_product(product_id)?.quantity),
        }
    }

    fn get_images(&self, product_id: u32, _lang_id: u32) -> Result<Vec<ImageRef>, CatalogError> {
        let product = self.require_product(product_id)?;
        let mut images: Vec<&ImageRecord> = product.images.iter().collect();
        images.sort_by_key(|img| img.position);
        Ok(images
            .into_iter()
            .map(|img| self.image_ref(product, img))
            .collect())
    }

    fn get_combination_images(&self, variant_id: u32) -> Result<Vec<ImageRef>, CatalogError> {
        let combo = self
            .combinations
            .get(&variant_id)
            .map(|&idx| &self.data.combinations[idx])
            .ok_or(CatalogError::NotFound {
                entity: "combination",
                id: variant_id,
            })?;
        let product = self.require_product(combo.product_id)?;
        Ok(combo
            .image_ids
            .iter()
            .filter_map(|id| product.images.iter().find(|img| img.id == *id))
            .map(|img| self.image_ref(product, img))
            .collect())
    }

    fn get_category_ancestors(
        &self,
        category_id: u32,
        _lang_id: u32,
    ) -> Result<Vec<Category>, CatalogError> {
        let mut chain = Vec::new();
        let mut current = Some(category_id);
        while let Some(id) = current {
            let record = self
                .categories
                .get(&id)
                .map(|&idx| &self.data.categories[idx])
                .ok_or(CatalogError::NotFound {
                    entity: "category",
                    id,
                })?;
            chain.push(Category {
                id: record.id,
                name: record.name.clone(),
            });
            current = record.parent();
        }
        chain.reverse();
        Ok(chain)
    }

    fn get_manufacturer(
        &self,
        id: u32,
        _lang_id: u32,
    ) -> Result<Option<Manufacturer>, CatalogError> {
        Ok(self.data.manufacturers.iter().find(|m| m.id == id).cloned())
    }

    fn product_link(
        &self,
        product: &Product,
        variant_id: Option<u32>,
        _lang_id: u32,
        _shop_id: u32,
    ) -> Result<String, CatalogError> {
        if product.link_rewrite.trim().is_empty() {
            return Err(CatalogError::Invalid {
                id: product.id,
                reason: "product has no URL slug".to_string(),
            });
        }
        let base = self.data.shop.base_url.trim_end_matches('/');
        Ok(match variant_id {
            Some(v) => format!("{base}/{}-{v}-{}.html", product.id, product.link_rewrite),
            None => format!("{base}/{}-{}.html", product.id, product.link_rewrite),
        })
    }

    fn currency_exists(&self, iso_code: &str) -> bool {
        self.data
            .currencies
            .iter()
            .chain(std::iter::once(&self.data.default_currency))
            .any(|c| c.eq_ignore_ascii_case(iso_code))
    }

    fn default_currency(&self) -> String {
        self.data.default_currency.clone()
    }
}

fn invalid(reason: String) -> SnapshotError {
    SnapshotError::Validation(reason)
}

/// Maps each id to its position, rejecting duplicates.
fn unique_index(
    ids: impl Iterator<Item = u32>,
    entity: &str,
) -> Result<HashMap<u32, usize>, SnapshotError> {
    let mut index = HashMap::new();
    for (pos, id) in ids.enumerate() {
        if index.insert(id, pos).is_some() {
            return Err(invalid(format!("duplicate {entity} id {id}")));
        }
    }
    Ok(index)
}
