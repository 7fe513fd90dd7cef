//! Parses a serialized feed back into [`FeedItem`]s.
//!
//! Used by `gmfeed validate` and by tests that check what the serializer
//! emits. Elements the engine never writes are skipped.

use std::mem;

use gmfeed_core::{Condition, FeedItem, Money, Shipping};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::FeedError;
use crate::write::FeedHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    pub header: FeedHeader,
    pub items: Vec<FeedItem>,
}

/// Raw element text collected for one `<item>` before conversion.
#[derive(Debug, Default)]
struct ItemDraft {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    image_link: Option<String>,
    additional_image_links: Vec<String>,
    availability: Option<String>,
    price: Option<String>,
    sale_price: Option<String>,
    sale_price_effective_date: Option<String>,
    brand: Option<String>,
    gtin: Option<String>,
    mpn: Option<String>,
    identifier_exists: Option<String>,
    condition: Option<String>,
    product_type: Option<String>,
    item_group_id: Option<String>,
    size: Option<String>,
    color: Option<String>,
    shipping_country: Option<String>,
    shipping_price: Option<String>,
}

impl ItemDraft {
    fn assign(&mut self, name: &str, parent: Option<&str>, text: String) {
        if parent == Some("g:shipping") {
            match name {
                "g:country" => self.shipping_country = Some(text),
                "g:price" => self.shipping_price = Some(text),
                _ => {}
            }
            return;
        }
        if parent != Some("item") {
            return;
        }
        match name {
            "g:id" => self.id = Some(text),
            "g:title" => self.title = Some(text),
            "g:description" => self.description = Some(text),
            "g:link" => self.link = Some(text),
            "g:image_link" => self.image_link = Some(text),
            "g:additional_image_link" => self.additional_image_links.push(text),
            "g:availability" => self.availability = Some(text),
            "g:price" => self.price = Some(text),
            "g:sale_price" => self.sale_price = Some(text),
            "g:sale_price_effective_date" => self.sale_price_effective_date = Some(text),
            "g:brand" => self.brand = Some(text),
            "g:gtin" => self.gtin = Some(text),
            "g:mpn" => self.mpn = Some(text),
            "g:identifier_exists" => self.identifier_exists = Some(text),
            "g:condition" => self.condition = Some(text),
            "g:product_type" => self.product_type = Some(text),
            "g:item_group_id" => self.item_group_id = Some(text),
            "g:size" => self.size = Some(text),
            "g:color" => self.color = Some(text),
            _ => {}
        }
    }

    fn finish(self, index: usize) -> Result<FeedItem, FeedError> {
        let id = required(self.id, "g:id", index)?;
        let identifier_exists = match self.identifier_exists.as_deref() {
            None => true,
            Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(FeedError::Malformed(format!(
                    "item {id}: g:identifier_exists has unexpected value {other:?}"
                )))
            }
        };

        Ok(FeedItem {
            title: present(self.title, "g:title", index)?,
            description: self.description.unwrap_or_default(),
            link: required(self.link, "g:link", index)?,
            image_link: non_empty(self.image_link),
            additional_image_links: self.additional_image_links,
            availability: required(self.availability, "g:availability", index)?.parse()?,
            price: required(self.price, "g:price", index)?.parse()?,
            sale_price: non_empty(self.sale_price)
                .map(|s| s.parse::<Money>())
                .transpose()?,
            sale_price_effective_date: non_empty(self.sale_price_effective_date)
                .map(|s| s.parse())
                .transpose()?,
            brand: non_empty(self.brand),
            gtin: non_empty(self.gtin),
            mpn: non_empty(self.mpn),
            identifier_exists,
            condition: non_empty(self.condition)
                .map(|s| s.parse::<Condition>())
                .transpose()?
                .unwrap_or_default(),
            product_type: non_empty(self.product_type),
            item_group_id: non_empty(self.item_group_id),
            size: non_empty(self.size),
            color: non_empty(self.color),
            shipping: Shipping {
                country: required(self.shipping_country, "g:shipping/g:country", index)?,
                price: required(self.shipping_price, "g:shipping/g:price", index)?.parse()?,
            },
            id,
        })
    }
}

fn required(value: Option<String>, field: &str, index: usize) -> Result<String, FeedError> {
    present(non_empty(value), field, index)
}

/// Like [`required`], but an element written empty reads back as `""`.
fn present(value: Option<String>, field: &str, index: usize) -> Result<String, FeedError> {
    value.ok_or_else(|| FeedError::Malformed(format!("item #{index}: missing {field}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a complete feed document.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] for XML that is not well formed,
/// [`FeedError::Malformed`] for a missing `<rss>` root or a missing required
/// item field, and [`FeedError::Field`] for a price, date, availability or
/// condition that cannot be parsed.
pub fn read_feed(xml: &str) -> Result<ParsedFeed, FeedError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut draft: Option<ItemDraft> = None;
    let mut header = FeedHeader {
        title: String::new(),
        link: String::new(),
        description: String::new(),
    };
    let mut items = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    saw_root = name == "rss";
                }
                if name == "item" {
                    draft = Some(ItemDraft::default());
                }
                stack.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let parent = stack.last().map(String::as_str);
                assign(&mut draft, &mut header, &name, parent, String::new());
                text.clear();
            }
            Event::Text(e) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| FeedError::Malformed(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::End(_) => {
                let Some(name) = stack.pop() else {
                    return Err(FeedError::Malformed("unbalanced closing tag".to_string()));
                };
                if name == "item" {
                    if let Some(done) = draft.take() {
                        items.push(done.finish(items.len() + 1)?);
                    }
                } else {
                    let parent = stack.last().map(String::as_str);
                    assign(&mut draft, &mut header, &name, parent, mem::take(&mut text));
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedError::Malformed("document root is not <rss>".to_string()));
    }

    Ok(ParsedFeed { header, items })
}

fn assign(
    draft: &mut Option<ItemDraft>,
    header: &mut FeedHeader,
    name: &str,
    parent: Option<&str>,
    text: String,
) {
    if let Some(d) = draft.as_mut() {
        d.assign(name, parent, text);
        return;
    }
    if parent == Some("channel") {
        match name {
            "title" => header.title = text,
            "link" => header.link = text,
            "description" => header.description = text,
            _ => {}
        }
    }
}
