use chrono::NaiveDate;
use quire::cache::Cache;
use quire::date::{DateOverride, DateResolver};
use quire::document::DocumentParser;
use quire::render_body;
use quire::sanitize::sanitize;
use quire::store::Store;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, id: &str, body: &str) {
    fs::write(dir.path().join(format!("{}.md", id)), body).unwrap();
}

#[test]
fn listing_end_to_end() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "my-title",
        "# My Title\n\n*January 29, 2025 | By Author*\n\nFirst real line.\nSecond line here.",
    );
    write(&dir, "curated", "# Curated\n\n*March 9, 2025*\n\nOverridden.");
    write(&dir, "undated", "No heading here.\nJust text.");
    write(&dir, "empty", "");

    let mut overrides = HashMap::new();
    overrides.insert(
        String::from("curated"),
        DateOverride {
            date: String::from("2020-02-20"),
            display: String::from("Sometime in 2020"),
        },
    );
    let store = Store::new(dir.path(), DocumentParser::new(DateResolver::new(overrides)));
    let cache = Cache::new(store);

    let listing = cache.get_all().unwrap();
    let ids: Vec<&str> = listing.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["my-title", "undated", "curated"]);

    let first = &listing[0];
    assert_eq!(first.title, "My Title");
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
    assert_eq!(first.summary, "First real line. Second line here.");

    assert_eq!(listing[1].title, "Untitled");
    assert_eq!(listing[1].display_date, "January 1, 2024");

    assert_eq!(listing[2].date, NaiveDate::from_ymd_opt(2020, 2, 20).unwrap());
    assert_eq!(listing[2].display_date, "Sometime in 2020");
}

#[test]
fn ties_are_broken_by_identifier_descending() {
    let dir = TempDir::new().unwrap();
    write(&dir, "alpha", "# A\n\n*January 10, 2025*\n\nA.");
    write(&dir, "beta", "# B\n\n*January 10, 2025*\n\nB.");

    let listing = Store::new(dir.path(), DocumentParser::default())
        .list_all()
        .unwrap();
    assert_eq!(listing[0].id, "beta");
    assert_eq!(listing[1].id, "alpha");
}

#[test]
fn rendering_strips_script_and_handlers() {
    let body = concat!(
        "# Post\n\n",
        "Intro with a <a href=\"https://example.com\" onclick=\"steal()\">link</a>.\n\n",
        "<script>alert('hi')</script>\n\n",
        "**Kept** text.\n",
    );
    let html = render_body(body);
    assert!(!html.contains("onclick"), "{}", html);
    assert!(!html.contains("<script"), "{}", html);
    assert!(!html.contains("alert"), "{}", html);
    assert!(html.contains(r#"<a href="https://example.com">link</a>"#), "{}", html);
    assert!(html.contains("<strong>Kept</strong> text."), "{}", html);
    assert!(!html.contains("<h1>Post</h1>"), "{}", html);
}

#[test]
fn rendering_keeps_markdown_structure() {
    let body = concat!(
        "# Post\n\n",
        "## Section\n\n",
        "- one\n- two\n\n",
        "> quote\n\n",
        "```sh\necho hi\n```\n\n",
        "| a | b |\n|---|:-:|\n| 1 | 2 |\n\n",
        "![diagram](/img/d.png \"Diagram\")\n",
    );
    let html = render_body(body);
    assert!(html.contains("<h2>Section</h2>"), "{}", html);
    assert!(
        html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"),
        "{}",
        html
    );
    assert!(
        html.contains("<blockquote>\n<p>quote</p>\n</blockquote>"),
        "{}",
        html
    );
    assert!(html.contains(r#"<pre><code class="language-sh">echo hi"#), "{}", html);
    assert!(html.contains(r#"<th align="center">b</th>"#), "{}", html);
    assert!(
        html.contains(r#"<img src="/img/d.png" alt="diagram" title="Diagram" />"#),
        "{}",
        html
    );
}

#[test]
fn rendered_output_is_a_sanitizer_fixed_point() {
    let body = "# T\n\nText <img src=x onerror=alert(1)> and <iframe src=\"https://evil\"></iframe>.\n";
    let html = render_body(body);
    assert!(!html.contains("onerror"), "{}", html);
    assert!(!html.contains("iframe"), "{}", html);
    assert_eq!(sanitize(&html), html);
}

#[test]
fn missing_post_is_not_found() {
    let dir = TempDir::new().unwrap();
    write(&dir, "present", "# Present\n\nHere.");
    let store = Store::new(dir.path(), DocumentParser::default());
    assert!(store.get_by_identifier("absent").unwrap().is_none());
    assert!(store.get_by_identifier("present").unwrap().is_some());
}
