use gmfeed_core::Category;

const SEPARATOR: &str = " > ";

/// Breadcrumb for `g:product_type` from a root-first ancestor chain.
///
/// Root and home nodes are skipped; `None` when nothing is left.
#[must_use]
pub fn category_path(ancestors: &[Category]) -> Option<String> {
    let names: Vec<&str> = ancestors
        .iter()
        .filter(|c| !c.is_reserved())
        .map(|c| c.name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(SEPARATOR))
    }
}
