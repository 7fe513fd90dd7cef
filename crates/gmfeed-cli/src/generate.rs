//! `gmfeed generate`: snapshot in, feed out.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use gmfeed_catalog::SnapshotCatalog;
use gmfeed_core::FeedConfig;
use gmfeed_engine::generate_feed;

/// Runs the pipeline into memory first so a failed run never truncates an
/// existing feed file or leaves half a document on stdout.
pub(crate) fn run_generate(
    config: &FeedConfig,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    as_of: Option<NaiveDateTime>,
) -> anyhow::Result<()> {
    let catalog_path = catalog.unwrap_or_else(|| config.catalog_path.clone());
    let mut snapshot = SnapshotCatalog::load(&catalog_path)
        .with_context(|| format!("loading catalog snapshot {}", catalog_path.display()))?
        .for_shop(config.shop_id);
    if let Some(as_of) = as_of {
        snapshot = snapshot.with_as_of(as_of);
    }

    let mut buffer = Vec::new();
    let stats = generate_feed(&snapshot, config, &mut buffer).context("feed generation failed")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &buffer)
                .with_context(|| format!("writing feed to {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                items = stats.items_written,
                "feed written"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&buffer).context("writing feed to stdout")?;
            stdout.flush().context("writing feed to stdout")?;
        }
    }

    if stats.products_skipped > 0 {
        tracing::warn!(
            skipped = stats.products_skipped,
            seen = stats.products_seen,
            "some products were skipped; see earlier warnings"
        );
    }
    Ok(())
}
