//! Regular vs. final price, discount detection and the sale window.

use chrono::{DateTime, FixedOffset, TimeZone};
use gmfeed_core::{parse_host_timestamp, DiscountWindow, Money, SaleWindow};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a raw catalog price to cents, half away from zero.
#[must_use]
pub fn round_price(raw: Decimal) -> Decimal {
    raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether the rounded final price is strictly below the rounded regular price.
#[must_use]
pub fn has_discount(regular_raw: Decimal, final_raw: Decimal) -> bool {
    round_price(final_raw) < round_price(regular_raw)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPricing {
    pub regular_price: Decimal,
    pub final_price: Decimal,
    /// Only ever set while a discount is active.
    pub discount_window: Option<SaleWindow>,
}

impl ResolvedPricing {
    /// Rounds both prices; the window is attached separately.
    #[must_use]
    pub fn new(regular_raw: Decimal, final_raw: Decimal) -> Self {
        Self {
            regular_price: round_price(regular_raw),
            final_price: round_price(final_raw),
            discount_window: None,
        }
    }

    /// Attaches the discount rule's validity window. Ignored when there is no
    /// discount or when both bounds are open.
    #[must_use]
    pub fn with_window(mut self, window: Option<&DiscountWindow>, offset: FixedOffset) -> Self {
        if !self.has_discount() {
            return self;
        }
        self.discount_window = window.and_then(|w| {
            SaleWindow::new(
                parse_bound(w.from.as_deref(), offset),
                parse_bound(w.to.as_deref(), offset),
            )
        });
        self
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.final_price < self.regular_price
    }

    /// Value of `g:price`: the regular price while on sale, otherwise the
    /// price actually charged.
    #[must_use]
    pub fn price(&self, currency: &str) -> Money {
        if self.has_discount() {
            Money::new(self.regular_price, currency)
        } else {
            Money::new(self.final_price, currency)
        }
    }

    /// Value of `g:sale_price`.
    #[must_use]
    pub fn sale_price(&self, currency: &str) -> Option<Money> {
        self.has_discount()
            .then(|| Money::new(self.final_price, currency))
    }
}

/// Interprets one raw window bound. Missing, empty, zero-sentinel and
/// unparseable values are all an open bound.
fn parse_bound(raw: Option<&str>, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let naive = match parse_host_timestamp(raw?) {
        Ok(naive) => naive?,
        Err(bad) => {
            tracing::debug!(bound = %bad, "ignoring unparseable discount bound");
            return None;
        }
    };
    offset.from_local_datetime(&naive).single()
}
