use super::*;
use crate::validate::check_feed;

const ITEM: &str = r"<item>
      <g:id>ID</g:id>
      <g:title>Mug</g:title>
      <g:description/>
      <g:link>https://shop.example/1-mug.html</g:link>
      <g:availability>in_stock</g:availability>
      <g:price>10.00 CHF</g:price>
      <g:condition>new</g:condition>
      <g:shipping>
        <g:country>CH</g:country>
        <g:price>0.00 CHF</g:price>
      </g:shipping>
    </item>";

fn feed_with_ids(ids: &[&str]) -> String {
    let items: Vec<String> = ids.iter().map(|id| ITEM.replace("ID", id)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\" xmlns:g=\"http://base.google.com/ns/1.0\"><channel><title>Shop</title>{}</channel></rss>",
        items.join("")
    )
}

#[test]
fn parses_generate_with_defaults() {
    let cli = Cli::try_parse_from(["gmfeed", "generate"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Generate {
            catalog: None,
            output: None,
            as_of: None
        }
    ));
}

#[test]
fn parses_generate_with_paths() {
    let cli = Cli::try_parse_from([
        "gmfeed",
        "generate",
        "--catalog",
        "snapshot.json",
        "--output",
        "feed.xml",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Generate {
            catalog: Some(ref c),
            output: Some(ref o),
            ..
        } if c.as_path() == std::path::Path::new("snapshot.json")
            && o.as_path() == std::path::Path::new("feed.xml")
    ));
}

#[test]
fn parses_as_of_timestamp() {
    let cli = Cli::try_parse_from(["gmfeed", "generate", "--as-of", "2024-01-15 12:00:00"])
        .expect("expected valid cli args");
    let Commands::Generate { as_of: Some(ts), .. } = cli.command else {
        panic!("expected generate with --as-of");
    };
    assert_eq!(ts.to_string(), "2024-01-15 12:00:00");
}

#[test]
fn rejects_malformed_as_of() {
    assert!(Cli::try_parse_from(["gmfeed", "generate", "--as-of", "yesterday"]).is_err());
}

#[test]
fn validate_requires_feed_path() {
    assert!(Cli::try_parse_from(["gmfeed", "validate"]).is_err());
    let cli = Cli::try_parse_from(["gmfeed", "validate", "--feed", "feed.xml"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Validate { .. }));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["gmfeed"]).is_err());
}

#[test]
fn check_feed_counts_items() {
    assert_eq!(check_feed(&feed_with_ids(&["1", "2-5"])).unwrap(), 2);
}

#[test]
fn check_feed_rejects_duplicate_ids() {
    let err = check_feed(&feed_with_ids(&["1", "1"])).unwrap_err();
    assert!(err.to_string().contains("duplicate item id 1"), "{err}");
}

#[test]
fn check_feed_rejects_item_without_link() {
    let xml = feed_with_ids(&["1"]).replace("<g:link>https://shop.example/1-mug.html</g:link>", "");
    assert!(check_feed(&xml).is_err());
}
