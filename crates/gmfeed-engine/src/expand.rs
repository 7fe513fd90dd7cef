//! Variant Expander: regroups the host's flattened combination rows.

use std::collections::HashMap;

use gmfeed_core::{Attribute, CombinationRow, Sellable, Variant};

/// Groups combination rows by variant id.
///
/// Variants come out in order of first appearance. Scalar fields (reference,
/// identifiers, price impact, quantity) are taken from the first row of each
/// variant; every row contributes one attribute pair. An empty input yields an
/// empty output, meaning the product has no combinations.
#[must_use]
pub fn expand_combinations(rows: Vec<CombinationRow>) -> Vec<Variant> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut variants: Vec<Variant> = Vec::new();

    for row in rows {
        let attribute = Attribute {
            group: row.group_name,
            name: row.attribute_name,
        };
        if let Some(&slot) = index.get(&row.variant_id) {
            variants[slot].attributes.push(attribute);
            continue;
        }
        index.insert(row.variant_id, variants.len());
        variants.push(Variant {
            id: row.variant_id,
            reference: row.reference,
            ean13: row.ean13,
            upc: row.upc,
            price: row.price,
            quantity: row.quantity,
            attributes: vec![attribute],
        });
    }

    variants
}

/// Turns expanded variants into the units that get a feed item each.
///
/// No variants means the product itself is the single sellable unit.
#[must_use]
pub fn sellable_units(variants: Vec<Variant>) -> Vec<Sellable> {
    if variants.is_empty() {
        return vec![Sellable::Simple];
    }
    variants.into_iter().map(Sellable::Variant).collect()
}
