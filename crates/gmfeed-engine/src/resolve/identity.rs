//! GTIN / MPN selection.

use gmfeed_core::{Product, Variant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    pub gtin: Option<String>,
    pub mpn: Option<String>,
}

impl Identifiers {
    /// Variant values win; an empty variant value falls back to the product's.
    #[must_use]
    pub fn resolve(product: &Product, variant: Option<&Variant>) -> Self {
        Self {
            gtin: prefer(variant.map(|v| v.ean13.as_str()), &product.ean13),
            mpn: prefer(variant.map(|v| v.reference.as_str()), &product.reference),
        }
    }

    /// `false` only when neither identifier survived.
    #[must_use]
    pub fn exist(&self) -> bool {
        self.gtin.is_some() || self.mpn.is_some()
    }
}

fn prefer(variant_value: Option<&str>, product_value: &str) -> Option<String> {
    variant_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| Some(product_value.trim()).filter(|v| !v.is_empty()))
        .map(str::to_string)
}
