//! Converts a post body from markdown to (unsanitized) HTML. Callers outside
//! the crate go through [`crate::render_body`], which always sanitizes.

use pulldown_cmark::{html, Options, Parser};

/// Renders `body` as HTML. A leading `#` title line is dropped since the
/// title is displayed separately from the body. Markdown that doesn't parse
/// as anything in particular comes out as text; this never fails.
pub(crate) fn to_html(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let markdown = strip_title(body);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

fn strip_title(body: &str) -> &str {
    if !body.starts_with('#') {
        return body;
    }
    match body.find('\n') {
        Some(i) => &body[i + 1..],
        None => "",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strips_title() {
        assert_eq!(to_html("# Title\n\nHello."), "<p>Hello.</p>\n");
        assert_eq!(to_html("# Title only"), "");
        assert_eq!(
            to_html("Intro\n\n# Heading"),
            "<p>Intro</p>\n<h1>Heading</h1>\n"
        );
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            to_html("*em* **strong** ~~gone~~ `code`"),
            "<p><em>em</em> <strong>strong</strong> <del>gone</del> <code>code</code></p>\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(to_html("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
        assert_eq!(
            to_html("3. c\n4. d"),
            "<ol start=\"3\">\n<li>c</li>\n<li>d</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            to_html("```rust\nfn main() {}\nlet x = a < b;\n```"),
            "<pre><code class=\"language-rust\">fn main() {}\nlet x = a &lt; b;\n</code></pre>\n"
        );
        assert_eq!(to_html("```\nplain\n```"), "<pre><code>plain\n</code></pre>\n");
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            to_html(r#"[site](https://example.com "Home") ![a *cat*](cat.png)"#),
            concat!(
                r#"<p><a href="https://example.com" title="Home">site</a> "#,
                r#"<img src="cat.png" alt="a cat" /></p>"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            to_html("> quoted"),
            "<blockquote>\n<p>quoted</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            to_html("| a | b |\n|:--|--:|\n| 1 | 2 |"),
            concat!(
                r#"<table><thead><tr><th align="left">a</th><th align="right">b</th></tr></thead><tbody>"#,
                "\n",
                r#"<tr><td align="left">1</td><td align="right">2</td></tr>"#,
                "\n</tbody></table>\n"
            )
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(to_html("<div>raw</div>\n"), "<div>raw</div>\n");
    }
}
