use std::env::VarError;
use std::path::PathBuf;

use chrono::FixedOffset;
use rust_decimal::Decimal;

use crate::feed_config::FeedConfig;
use crate::ConfigError;

/// Load feed configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_feed_config() -> Result<FeedConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_feed_config_from_env()
}

/// Load feed configuration from environment variables already in the process.
///
/// Unlike [`load_feed_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_feed_config_from_env() -> Result<FeedConfig, ConfigError> {
    build_feed_config(|key| std::env::var(key))
}

/// Build feed configuration using the provided env-var lookup function.
fn build_feed_config<F>(lookup: F) -> Result<FeedConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default))
            .ok_or_else(|| invalid(var, "expected a boolean (true/false/1/0/yes/no/on/off)".into()))
    };

    let parse_code = |var: &str, default: &str, len: usize| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let code = raw.trim();
        if code.len() != len || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(var, format!("expected {len} ASCII letters, got {raw:?}")));
        }
        Ok(code.to_ascii_uppercase())
    };

    let shop_url = normalize_shop_url(&require("GMFEED_SHOP_URL")?)
        .map_err(|reason| invalid("GMFEED_SHOP_URL", reason))?;
    let shop_name = require("GMFEED_SHOP_NAME")?.trim().to_string();

    let shop_id = parse_u32("GMFEED_SHOP_ID", "1")?;
    let lang_id = parse_u32("GMFEED_LANG", "1")?;
    let currency = parse_code("GMFEED_CURRENCY", "CHF", 3)?;
    let shipping_country = parse_code("GMFEED_SHIPPING_COUNTRY", "CH", 2)?;

    let raw_price = or_default("GMFEED_SHIPPING_PRICE", "0.00");
    let shipping_price = raw_price
        .trim()
        .parse::<Decimal>()
        .map_err(|e| invalid("GMFEED_SHIPPING_PRICE", e.to_string()))?;
    if shipping_price.is_sign_negative() && !shipping_price.is_zero() {
        return Err(invalid(
            "GMFEED_SHIPPING_PRICE",
            format!("must not be negative, got {raw_price}"),
        ));
    }

    let stock_management = parse_bool("GMFEED_STOCK_MANAGEMENT", "true")?;
    let order_out_of_stock = parse_bool("GMFEED_ORDER_OUT_OF_STOCK", "false")?;

    let tz_offset = or_default("GMFEED_TZ_OFFSET", "+00:00")
        .trim()
        .parse::<FixedOffset>()
        .map_err(|e| invalid("GMFEED_TZ_OFFSET", e.to_string()))?;

    let catalog_path = PathBuf::from(or_default("GMFEED_CATALOG_PATH", "./catalog.yaml"));
    let log_level = or_default("GMFEED_LOG_LEVEL", "info");

    Ok(FeedConfig {
        shop_url,
        shop_name,
        shop_id,
        lang_id,
        currency,
        shipping_country,
        shipping_price,
        stock_management,
        order_out_of_stock,
        tz_offset,
        catalog_path,
        log_level,
    })
}

/// Accepts the boolean spellings shop admins actually type.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Requires an http(s) scheme and guarantees a trailing slash.
fn normalize_shop_url(raw: &str) -> Result<String, String> {
    let url = raw.trim();
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| format!("expected an http:// or https:// URL, got {url:?}"))?;
    if host.trim_matches('/').is_empty() {
        return Err(format!("missing host in {url:?}"));
    }
    if url.ends_with('/') {
        Ok(url.to_string())
    } else {
        Ok(format!("{url}/"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("GMFEED_SHOP_URL", "https://shop.example.ch");
        m.insert("GMFEED_SHOP_NAME", "Example Shop");
        m
    }

    #[test]
    fn build_feed_config_fails_without_shop_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GMFEED_SHOP_URL"),
            "expected MissingEnvVar(GMFEED_SHOP_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_feed_config_fails_with_blank_shop_name() {
        let mut map = full_env();
        map.insert("GMFEED_SHOP_NAME", "   ");
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GMFEED_SHOP_NAME"),
            "expected MissingEnvVar(GMFEED_SHOP_NAME), got: {result:?}"
        );
    }

    #[test]
    fn build_feed_config_applies_install_defaults() {
        let map = full_env();
        let cfg = build_feed_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.shop_url, "https://shop.example.ch/");
        assert_eq!(cfg.shop_name, "Example Shop");
        assert_eq!(cfg.shop_id, 1);
        assert_eq!(cfg.lang_id, 1);
        assert_eq!(cfg.currency, "CHF");
        assert_eq!(cfg.shipping_country, "CH");
        assert_eq!(cfg.shipping_price, Decimal::ZERO);
        assert!(cfg.stock_management);
        assert!(!cfg.order_out_of_stock);
        assert_eq!(cfg.tz_offset, FixedOffset::east_opt(0).unwrap());
        assert_eq!(cfg.catalog_path, PathBuf::from("./catalog.yaml"));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn build_feed_config_uppercases_codes() {
        let mut map = full_env();
        map.insert("GMFEED_CURRENCY", "eur");
        map.insert("GMFEED_SHIPPING_COUNTRY", "fr");
        let cfg = build_feed_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.shipping_country, "FR");
    }

    #[test]
    fn build_feed_config_rejects_bad_currency() {
        let mut map = full_env();
        map.insert("GMFEED_CURRENCY", "EURO");
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMFEED_CURRENCY"),
            "expected InvalidEnvVar(GMFEED_CURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_feed_config_rejects_negative_shipping_price() {
        let mut map = full_env();
        map.insert("GMFEED_SHIPPING_PRICE", "-4.90");
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMFEED_SHIPPING_PRICE"),
            "expected InvalidEnvVar(GMFEED_SHIPPING_PRICE), got: {result:?}"
        );
    }

    #[test]
    fn build_feed_config_parses_shipping_price() {
        let mut map = full_env();
        map.insert("GMFEED_SHIPPING_PRICE", "7.5");
        let cfg = build_feed_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.shipping_price, Decimal::new(75, 1));
    }

    #[test]
    fn build_feed_config_rejects_bad_flag() {
        let mut map = full_env();
        map.insert("GMFEED_STOCK_MANAGEMENT", "maybe");
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMFEED_STOCK_MANAGEMENT"),
            "expected InvalidEnvVar(GMFEED_STOCK_MANAGEMENT), got: {result:?}"
        );
    }

    #[test]
    fn build_feed_config_reads_flags() {
        let mut map = full_env();
        map.insert("GMFEED_STOCK_MANAGEMENT", "0");
        map.insert("GMFEED_ORDER_OUT_OF_STOCK", "Yes");
        let cfg = build_feed_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.stock_management);
        assert!(cfg.order_out_of_stock);
    }

    #[test]
    fn build_feed_config_parses_tz_offset() {
        let mut map = full_env();
        map.insert("GMFEED_TZ_OFFSET", "+01:00");
        let cfg = build_feed_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.tz_offset, FixedOffset::east_opt(3600).unwrap());
    }

    #[test]
    fn build_feed_config_rejects_bad_tz_offset() {
        let mut map = full_env();
        map.insert("GMFEED_TZ_OFFSET", "Europe/Zurich");
        let result = build_feed_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMFEED_TZ_OFFSET"),
            "expected InvalidEnvVar(GMFEED_TZ_OFFSET), got: {result:?}"
        );
    }

    #[test]
    fn normalize_shop_url_keeps_existing_slash() {
        assert_eq!(
            normalize_shop_url("http://shop.local/").unwrap(),
            "http://shop.local/"
        );
    }

    #[test]
    fn normalize_shop_url_rejects_missing_scheme() {
        assert!(normalize_shop_url("shop.local").is_err());
        assert!(normalize_shop_url("https://").is_err());
    }
}
