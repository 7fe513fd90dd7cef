//! Immutable run-wide context threaded through every stage.

use chrono::FixedOffset;
use gmfeed_core::{CatalogReader, ConfigError, FeedConfig, Money, Shipping};
use rust_decimal::Decimal;

use crate::write::{FeedHeader, FEED_DESCRIPTION};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedContext {
    pub shop_id: u32,
    pub lang_id: u32,
    pub shop_url: String,
    pub shop_name: String,
    /// Currency every price is labelled with, after fallback resolution.
    pub currency: String,
    pub shipping_country: String,
    pub shipping_price: Decimal,
    pub stock_management: bool,
    pub order_out_of_stock: bool,
    pub tz_offset: FixedOffset,
}

impl FeedContext {
    /// Builds the context for a run, checking the configured currency against
    /// the catalog's currency table.
    ///
    /// An unknown currency falls back to the shop default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] when neither the configured nor the
    /// default currency is usable.
    pub fn resolve<R>(config: &FeedConfig, reader: &R) -> Result<Self, ConfigError>
    where
        R: CatalogReader + ?Sized,
    {
        let currency = if reader.currency_exists(&config.currency) {
            config.currency.clone()
        } else {
            let fallback = reader.default_currency().trim().to_ascii_uppercase();
            if fallback.is_empty() {
                return Err(ConfigError::Currency(format!(
                    "{} is not known to the catalog and the shop has no default currency",
                    config.currency
                )));
            }
            tracing::warn!(
                requested = %config.currency,
                fallback = %fallback,
                "configured currency unknown to the catalog, using shop default"
            );
            fallback
        };

        Ok(Self {
            shop_id: config.shop_id,
            lang_id: config.lang_id,
            shop_url: config.shop_url.clone(),
            shop_name: config.shop_name.clone(),
            currency,
            shipping_country: config.shipping_country.clone(),
            shipping_price: config.shipping_price,
            stock_management: config.stock_management,
            order_out_of_stock: config.order_out_of_stock,
            tz_offset: config.tz_offset,
        })
    }

    #[must_use]
    pub fn shipping(&self) -> Shipping {
        Shipping {
            country: self.shipping_country.clone(),
            price: Money::new(self.shipping_price, &self.currency),
        }
    }

    #[must_use]
    pub fn header(&self) -> FeedHeader {
        FeedHeader {
            title: self.shop_name.clone(),
            link: self.shop_url.clone(),
            description: FEED_DESCRIPTION.to_string(),
        }
    }
}
