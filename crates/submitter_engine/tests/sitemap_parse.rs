use pretty_assertions::assert_eq;
use submitter_engine::{parse_sitemap, FailureKind, SitemapDocument};

fn urls(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn namespaced_urlset_in_document_order() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
    <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
      <url><loc>https://example.com/b</loc><lastmod>2024-01-15</lastmod></url>
      <url><loc> https://example.com/a </loc></url>
      <url><loc>https://example.com/b</loc></url>
    </urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&[
            "https://example.com/b",
            "https://example.com/a",
            "https://example.com/b",
        ]))
    );
}

#[test]
fn prefixed_namespace_is_recognised() {
    let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
      <sm:url><sm:loc>https://example.com/x</sm:loc></sm:url>
    </sm:urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&["https://example.com/x"]))
    );
}

#[test]
fn plain_urlset_is_the_fallback() {
    let xml = r#"<urlset>
      <url><loc>https://example.com/one</loc></url>
      <group><url><loc>https://example.com/nested</loc></url></group>
    </urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&[
            "https://example.com/one",
            "https://example.com/nested",
        ]))
    );
}

#[test]
fn namespaced_entries_win_over_plain_ones() {
    let xml = r#"<urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
      <sm:url><sm:loc>https://example.com/ns</sm:loc></sm:url>
      <url><loc>https://example.com/plain</loc></url>
    </urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&["https://example.com/ns"]))
    );
}

#[test]
fn foreign_namespace_is_ignored() {
    let xml = r#"<urlset xmlns="http://example.com/not-a-sitemap">
      <url><loc>https://example.com/a</loc></url>
    </urlset>"#;

    assert_eq!(parse_sitemap(xml).unwrap(), SitemapDocument::Empty);
}

#[test]
fn sitemap_index_lists_children() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
    <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
      <sitemap><loc>https://example.com/posts.xml</loc><lastmod>2024-01-01</lastmod></sitemap>
      <sitemap><loc>https://example.com/pages.xml</loc></sitemap>
    </sitemapindex>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::Index(urls(&[
            "https://example.com/posts.xml",
            "https://example.com/pages.xml",
        ]))
    );
}

#[test]
fn only_first_loc_of_an_entry_counts() {
    let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
      <url><loc>https://example.com/first</loc><loc>https://example.com/second</loc></url>
      <url><loc/><loc>https://example.com/ignored</loc></url>
    </urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&["https://example.com/first"]))
    );
}

#[test]
fn entities_and_cdata_are_decoded() {
    let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
      <url><loc>https://example.com/?a=1&amp;b=2</loc></url>
      <url><loc><![CDATA[https://example.com/cdata]]></loc></url>
    </urlset>"#;

    assert_eq!(
        parse_sitemap(xml).unwrap(),
        SitemapDocument::UrlSet(urls(&[
            "https://example.com/?a=1&b=2",
            "https://example.com/cdata",
        ]))
    );
}

#[test]
fn document_without_entries_is_empty() {
    let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
    assert_eq!(parse_sitemap(xml).unwrap(), SitemapDocument::Empty);

    let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#;
    assert_eq!(parse_sitemap(xml).unwrap(), SitemapDocument::Empty);

    let xml = r#"<html><body>not a sitemap</body></html>"#;
    assert_eq!(parse_sitemap(xml).unwrap(), SitemapDocument::Empty);
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let cases = [
        "",
        "not xml at all",
        "<urlset><url><loc>https://example.com/a</loc></url>",
        "<urlset><url></loc></url></urlset>",
        "<urlset/><urlset/>",
    ];
    for xml in cases {
        let err = parse_sitemap(xml).unwrap_err();
        assert_eq!(err.kind, FailureKind::Parse, "input {xml:?}");
    }
}
