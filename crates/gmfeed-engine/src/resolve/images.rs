//! Primary and additional image selection.

use gmfeed_core::ImageRef;

/// Upper bound on `g:additional_image_link` entries.
pub const MAX_ADDITIONAL_IMAGES: usize = 10;

const DEFAULT_SCHEME: &str = "https://";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    pub primary: Option<String>,
    pub additional: Vec<String>,
}

/// Picks the images for one item.
///
/// Combination-specific images replace the product gallery entirely when
/// present. The first image is the primary one, the next ten are additional,
/// anything beyond is dropped.
#[must_use]
pub fn resolve_images(combination_images: &[ImageRef], product_images: &[ImageRef]) -> ImageSet {
    let source = if combination_images.is_empty() {
        product_images
    } else {
        combination_images
    };

    let mut urls = source
        .iter()
        .map(|img| img.url.trim())
        .filter(|url| !url.is_empty())
        .map(absolute_url);

    let primary = urls.next();
    let additional = urls.take(MAX_ADDITIONAL_IMAGES).collect();
    ImageSet {
        primary,
        additional,
    }
}

/// Makes a host-generated image URL absolute.
///
/// The host often returns `shop.example/12-large_default/x.jpg` without a scheme.
#[must_use]
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("{DEFAULT_SCHEME}{rest}")
    } else {
        format!("{DEFAULT_SCHEME}{url}")
    }
}
