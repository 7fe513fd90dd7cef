//! `gmfeed validate`: sanity checks on a written feed.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use gmfeed_engine::read_feed;

pub(crate) fn run_validate(path: &Path) -> anyhow::Result<()> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("reading feed {}", path.display()))?;
    let count = check_feed(&xml).with_context(|| format!("{} is not a valid feed", path.display()))?;
    println!("{}: {count} items OK", path.display());
    Ok(())
}

/// Parses the feed and rejects duplicate item ids. Missing `g:link` or
/// `g:price` elements already fail the parse. Returns the item count.
pub(crate) fn check_feed(xml: &str) -> anyhow::Result<usize> {
    let feed = read_feed(xml)?;
    let mut seen = HashSet::new();
    for item in &feed.items {
        if !seen.insert(item.id.as_str()) {
            anyhow::bail!("duplicate item id {}", item.id);
        }
    }
    Ok(feed.items.len())
}
