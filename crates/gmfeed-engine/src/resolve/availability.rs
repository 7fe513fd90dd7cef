//! Stock availability from order permission, stock level and backorder policy.

use gmfeed_core::{Availability, OutOfStockPolicy};

/// Stock-related inputs for one sellable unit.
#[derive(Debug, Clone, Copy)]
pub struct StockState {
    pub available_for_order: bool,
    pub policy: OutOfStockPolicy,
    pub quantity: i64,
}

/// Resolves availability; the first matching rule wins:
///
/// 1. not available for order: out of stock
/// 2. stock managed and nothing left: decided by the out-of-stock policy
/// 3. otherwise: in stock
#[must_use]
pub fn resolve_availability(
    stock: StockState,
    stock_management: bool,
    order_out_of_stock: bool,
) -> Availability {
    if !stock.available_for_order {
        return Availability::OutOfStock;
    }
    if !stock_management || stock.quantity > 0 {
        return Availability::InStock;
    }
    let backorder = match stock.policy {
        OutOfStockPolicy::Deny => false,
        OutOfStockPolicy::Allow => true,
        OutOfStockPolicy::UseDefault => order_out_of_stock,
    };
    if backorder {
        Availability::Backorder
    } else {
        Availability::OutOfStock
    }
}
