//! Size and color extraction from variant attribute groups.

use gmfeed_core::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSlot {
    Size,
    Color,
}

/// Lower-cased attribute group names, across the shop's locales, that carry
/// a size or a color.
const SLOT_TABLE: &[(&str, AttributeSlot)] = &[
    ("size", AttributeSlot::Size),
    ("taille", AttributeSlot::Size),
    ("größe", AttributeSlot::Size),
    ("grösse", AttributeSlot::Size),
    ("color", AttributeSlot::Color),
    ("colour", AttributeSlot::Color),
    ("couleur", AttributeSlot::Color),
    ("farbe", AttributeSlot::Color),
];

#[must_use]
pub fn slot_for(group: &str) -> Option<AttributeSlot> {
    let normalized = group.trim().to_lowercase();
    SLOT_TABLE
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, slot)| *slot)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeColor {
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Scans all attributes; when several groups map to the same slot the last
/// one wins.
#[must_use]
pub fn extract_size_color(attributes: &[Attribute]) -> SizeColor {
    let mut size = String::new();
    let mut color = String::new();
    for attr in attributes {
        match slot_for(&attr.group) {
            Some(AttributeSlot::Size) => size.clone_from(&attr.name),
            Some(AttributeSlot::Color) => color.clone_from(&attr.name),
            None => {}
        }
    }
    let keep = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };
    SizeColor {
        size: keep(size),
        color: keep(color),
    }
}
