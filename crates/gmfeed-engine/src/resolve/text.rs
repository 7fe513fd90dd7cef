//! Title and description shaping.

use gmfeed_core::Variant;

pub const MAX_TITLE_CHARS: usize = 150;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Product name plus variant attribute values: `"Shirt - Red / XL"`. The
/// name is trimmed, so a blank name yields an empty title.
///
/// Cut at [`MAX_TITLE_CHARS`] characters, possibly mid-word.
#[must_use]
pub fn build_title(name: &str, variant: Option<&Variant>) -> String {
    let mut title = xml_safe(name.trim());
    if let Some(v) = variant.filter(|v| !v.attributes.is_empty()) {
        let values: Vec<String> = v.attributes.iter().map(|a| xml_safe(&a.name)).collect();
        title.push_str(" - ");
        title.push_str(&values.join(" / "));
    }
    truncate_chars(&title, MAX_TITLE_CHARS)
}

/// Plain-text description: the short description, or the long one when the
/// short one has no text. Markup is stripped, whitespace collapsed, and the
/// result cut at [`MAX_DESCRIPTION_CHARS`] characters.
#[must_use]
pub fn build_description(short: &str, long: &str) -> String {
    let mut text = collapse_whitespace(&xml_safe(&strip_markup(short)));
    if text.is_empty() {
        text = collapse_whitespace(&xml_safe(&strip_markup(long)));
    }
    truncate_chars(&text, MAX_DESCRIPTION_CHARS)
}

/// Drops tags. A `<` only opens a tag when a letter, `/`, `!` or `?` follows
/// it; any other `<` is text. Entities are left as written.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    let mut in_tag = false;
    while let Some(ch) = chars.next() {
        if in_tag {
            in_tag = ch != '>';
        } else if ch == '<' && chars.peek().is_some_and(|&next| opens_tag(next)) {
            in_tag = true;
        } else {
            out.push(ch);
        }
    }
    out
}

fn opens_tag(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '/' | '!' | '?')
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Removes characters XML 1.0 cannot carry at all.
pub(crate) fn xml_safe(s: &str) -> String {
    s.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .filter(|&c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}
