//! Specific-price selection and unit price computation.

use chrono::NaiveDateTime;
use gmfeed_core::parse_host_timestamp;
use rust_decimal::Decimal;

use crate::types::{ReductionType, SpecificPrice};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn bound(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(|r| parse_host_timestamp(r).ok().flatten())
}

/// Whether `as_of` lies inside the rule's window, bounds inclusive.
#[must_use]
pub fn is_active(rule: &SpecificPrice, as_of: NaiveDateTime) -> bool {
    let after_start = bound(rule.from.as_deref()).is_none_or(|from| from <= as_of);
    let before_end = bound(rule.to.as_deref()).is_none_or(|to| as_of <= to);
    after_start && before_end
}

/// Picks the most specific rule that applies.
///
/// A rule for the exact combination beats a product-wide one, and a rule for
/// the exact shop beats an all-shops one. Among equally specific rules the
/// one listed last wins.
#[must_use]
pub fn select_rule(
    rules: &[SpecificPrice],
    shop_id: u32,
    variant_id: Option<u32>,
    as_of: NaiveDateTime,
) -> Option<&SpecificPrice> {
    let mut best: Option<(u8, &SpecificPrice)> = None;
    for rule in rules {
        let combination_score = match (rule.combination_id, variant_id) {
            (0, _) => 0,
            (c, Some(v)) if c == v => 2,
            _ => continue,
        };
        let shop_score = match rule.shop_id {
            0 => 0,
            s if s == shop_id => 1,
            _ => continue,
        };
        if !is_active(rule, as_of) {
            continue;
        }
        let score = combination_score + shop_score;
        if best.is_none_or(|(top, _)| score >= top) {
            best = Some((score, rule));
        }
    }
    best.map(|(_, rule)| rule)
}

/// Unit price from a tax-excluded base.
///
/// Amount reductions are tax-included; on a tax-excluded price they are taken
/// net of tax. The result never drops below zero.
#[must_use]
pub fn unit_price(
    base_excl: Decimal,
    tax_rate: Decimal,
    with_tax: bool,
    reduction: Option<&SpecificPrice>,
) -> Decimal {
    let tax_factor = Decimal::ONE + tax_rate / HUNDRED;
    let price = if with_tax {
        base_excl * tax_factor
    } else {
        base_excl
    };
    let Some(rule) = reduction else {
        return price;
    };
    let reduced = match rule.reduction_type {
        ReductionType::Percentage => price * (Decimal::ONE - rule.reduction / HUNDRED),
        ReductionType::Amount if with_tax => price - rule.reduction,
        ReductionType::Amount => price - rule.reduction / tax_factor,
    };
    reduced.max(Decimal::ZERO)
}
