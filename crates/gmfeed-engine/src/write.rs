//! Feed Serializer: RSS 2.0 with the Google Merchant `g:` namespace.

use std::collections::HashSet;
use std::io::Write;

use gmfeed_core::FeedItem;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::FeedError;
use crate::resolve::text::xml_safe;

pub const GOOGLE_NS: &str = "http://base.google.com/ns/1.0";
pub const FEED_DESCRIPTION: &str = "Product feed for Google Merchant Center";

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedHeader {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Streams items into an open `<channel>`.
///
/// Item ids are tracked for the lifetime of the writer; an item whose id was
/// already written is dropped and logged.
pub struct FeedWriter<W: Write> {
    xml: Writer<W>,
    seen: HashSet<String>,
    written: usize,
}

impl<W: Write> FeedWriter<W> {
    /// Writes the XML declaration, the `<rss>` root and the channel header.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] or [`FeedError::Xml`] if the sink fails.
    pub fn start(out: W, header: &FeedHeader) -> Result<Self, FeedError> {
        let mut xml = Writer::new_with_indent(out, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::Start(
            BytesStart::new("rss").with_attributes([("version", "2.0"), ("xmlns:g", GOOGLE_NS)]),
        ))?;
        xml.write_event(Event::Start(BytesStart::new("channel")))?;
        leaf(&mut xml, "title", &header.title)?;
        leaf(&mut xml, "link", &header.link)?;
        leaf(&mut xml, "description", &header.description)?;

        Ok(Self {
            xml,
            seen: HashSet::new(),
            written: 0,
        })
    }

    /// Writes one `<item>`. Returns `false` when the item was dropped as a
    /// duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] or [`FeedError::Xml`] if the sink fails.
    pub fn write_item(&mut self, item: &FeedItem) -> Result<bool, FeedError> {
        if !self.seen.insert(item.id.clone()) {
            tracing::error!(id = %item.id, "duplicate item id, dropping item");
            return Ok(false);
        }

        let xml = &mut self.xml;
        xml.write_event(Event::Start(BytesStart::new("item")))?;

        leaf(xml, "g:id", &item.id)?;
        leaf(xml, "g:title", &item.title)?;
        leaf(xml, "g:description", &item.description)?;
        leaf(xml, "g:link", &item.link)?;
        optional_leaf(xml, "g:image_link", item.image_link.as_deref())?;
        for url in &item.additional_image_links {
            leaf(xml, "g:additional_image_link", url)?;
        }
        leaf(xml, "g:availability", item.availability.as_str())?;
        leaf(xml, "g:price", &item.price.to_string())?;
        if let Some(sale) = &item.sale_price {
            leaf(xml, "g:sale_price", &sale.to_string())?;
            if let Some(window) = &item.sale_price_effective_date {
                leaf(xml, "g:sale_price_effective_date", &window.to_string())?;
            }
        }
        optional_leaf(xml, "g:brand", item.brand.as_deref())?;
        optional_leaf(xml, "g:gtin", item.gtin.as_deref())?;
        optional_leaf(xml, "g:mpn", item.mpn.as_deref())?;
        if !item.identifier_exists {
            leaf(xml, "g:identifier_exists", "false")?;
        }
        leaf(xml, "g:condition", item.condition.as_str())?;
        optional_leaf(xml, "g:product_type", item.product_type.as_deref())?;
        optional_leaf(xml, "g:item_group_id", item.item_group_id.as_deref())?;
        optional_leaf(xml, "g:size", item.size.as_deref())?;
        optional_leaf(xml, "g:color", item.color.as_deref())?;

        xml.write_event(Event::Start(BytesStart::new("g:shipping")))?;
        leaf(xml, "g:country", &item.shipping.country)?;
        leaf(xml, "g:price", &item.shipping.price.to_string())?;
        xml.write_event(Event::End(BytesEnd::new("g:shipping")))?;

        xml.write_event(Event::End(BytesEnd::new("item")))?;
        self.written += 1;
        Ok(true)
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Closes `<channel>` and `<rss>` and hands back the sink.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] or [`FeedError::Xml`] if the sink fails.
    pub fn finish(mut self) -> Result<W, FeedError> {
        self.xml.write_event(Event::End(BytesEnd::new("channel")))?;
        self.xml.write_event(Event::End(BytesEnd::new("rss")))?;
        let mut out = self.xml.into_inner();
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(out)
    }
}

/// Serializes a complete feed. Returns the number of items written, which is
/// lower than `items.len()` when duplicates were dropped.
///
/// # Errors
///
/// Returns [`FeedError::Io`] or [`FeedError::Xml`] if the sink fails.
pub fn write_feed<W: Write>(
    out: W,
    header: &FeedHeader,
    items: &[FeedItem],
) -> Result<usize, FeedError> {
    let mut writer = FeedWriter::start(out, header)?;
    for item in items {
        writer.write_item(item)?;
    }
    let written = writer.written();
    writer.finish()?;
    Ok(written)
}

/// Text element; an empty value becomes `<name/>`.
fn leaf<W: Write>(xml: &mut Writer<W>, name: &str, value: &str) -> Result<(), FeedError> {
    let value = xml_safe(value);
    if value.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(name)))?;
    } else {
        xml.write_event(Event::Start(BytesStart::new(name)))?;
        xml.write_event(Event::Text(BytesText::new(&value)))?;
        xml.write_event(Event::End(BytesEnd::new(name)))?;
    }
    Ok(())
}

/// Omitted entirely when `None` or blank.
fn optional_leaf<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    value: Option<&str>,
) -> Result<(), FeedError> {
    match value {
        Some(v) if !v.trim().is_empty() => leaf(xml, name, v),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use gmfeed_core::{Availability, Condition, Money, SaleWindow, Shipping};
    use rust_decimal::Decimal;

    use super::*;

    fn make_header() -> FeedHeader {
        FeedHeader {
            title: "Example Shop".to_string(),
            link: "https://shop.example/".to_string(),
            description: FEED_DESCRIPTION.to_string(),
        }
    }

    fn make_item(id: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: "Trail Runner".to_string(),
            description: "Light and fast.".to_string(),
            link: format!("https://shop.example/{id}-trail-runner.html"),
            image_link: None,
            additional_image_links: vec![],
            availability: Availability::InStock,
            price: Money::new(Decimal::new(100, 0), "CHF"),
            sale_price: None,
            sale_price_effective_date: None,
            brand: Some("Acme".to_string()),
            gtin: None,
            mpn: Some("TR-1".to_string()),
            identifier_exists: true,
            condition: Condition::New,
            product_type: None,
            item_group_id: None,
            size: None,
            color: None,
            shipping: Shipping {
                country: "CH".to_string(),
                price: Money::new(Decimal::ZERO, "CHF"),
            },
        }
    }

    fn render(items: &[FeedItem]) -> (String, usize) {
        let mut out = Vec::new();
        let written = write_feed(&mut out, &make_header(), items).unwrap();
        (String::from_utf8(out).unwrap(), written)
    }

    #[test]
    fn envelope_and_namespace() {
        let (xml, written) = render(&[]);
        assert_eq!(written, 0);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:g=\"http://base.google.com/ns/1.0\""));
        assert!(xml.contains("<title>Example Shop</title>"));
        assert!(xml.contains("<link>https://shop.example/</link>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn discounted_item_fields() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut item = make_item("42");
        item.sale_price = Some(Money::new(Decimal::new(80, 0), "CHF"));
        item.sale_price_effective_date = SaleWindow::new(
            Some(utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Some(utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()),
        );
        let (xml, _) = render(&[item]);
        assert!(xml.contains("<g:price>100.00 CHF</g:price>"));
        assert!(xml.contains("<g:sale_price>80.00 CHF</g:sale_price>"));
        assert!(xml.contains(
            "<g:sale_price_effective_date>2024-01-01T00:00:00+00:00/2024-01-31T00:00:00+00:00</g:sale_price_effective_date>"
        ));
    }

    #[test]
    fn window_without_sale_price_is_not_written() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut item = make_item("42");
        item.sale_price_effective_date =
            SaleWindow::new(Some(utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()), None);
        let (xml, _) = render(&[item]);
        assert!(!xml.contains("sale_price_effective_date"));
    }

    #[test]
    fn optional_elements_omitted() {
        let mut item = make_item("42");
        item.brand = None;
        let (xml, _) = render(&[item]);
        assert!(!xml.contains("g:brand"));
        assert!(!xml.contains("g:gtin"));
        assert!(!xml.contains("g:image_link"));
        assert!(!xml.contains("g:item_group_id"));
        assert!(!xml.contains("g:identifier_exists"));
    }

    #[test]
    fn identifier_exists_false_written() {
        let mut item = make_item("42");
        item.mpn = None;
        item.identifier_exists = false;
        let (xml, _) = render(&[item]);
        assert!(xml.contains("<g:identifier_exists>false</g:identifier_exists>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut item = make_item("42");
        item.title = "Fish & Chips <XL>".to_string();
        let (xml, _) = render(&[item]);
        assert!(xml.contains("<g:title>Fish &amp; Chips &lt;XL&gt;</g:title>"));
    }

    #[test]
    fn empty_description_is_empty_element() {
        let mut item = make_item("42");
        item.description = String::new();
        let (xml, _) = render(&[item]);
        assert!(xml.contains("<g:description/>"));
    }

    #[test]
    fn duplicate_ids_dropped() {
        let (xml, written) = render(&[make_item("42"), make_item("42"), make_item("43")]);
        assert_eq!(written, 2);
        assert_eq!(xml.matches("<g:id>42</g:id>").count(), 1);
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[test]
    fn element_order_within_item() {
        let mut item = make_item("42-7");
        item.image_link = Some("https://shop.example/1.jpg".to_string());
        item.additional_image_links = vec!["https://shop.example/2.jpg".to_string()];
        item.item_group_id = Some("42".to_string());
        item.size = Some("XL".to_string());
        item.color = Some("Red".to_string());
        let (xml, _) = render(&[item]);

        let order = [
            "<g:id>",
            "<g:title>",
            "<g:description>",
            "<g:link>",
            "<g:image_link>",
            "<g:additional_image_link>",
            "<g:availability>",
            "<g:price>",
            "<g:brand>",
            "<g:mpn>",
            "<g:condition>",
            "<g:item_group_id>",
            "<g:size>",
            "<g:color>",
            "<g:shipping>",
            "<g:country>",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{xml}");
    }
}
