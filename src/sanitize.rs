//! Allowlist-based HTML sanitization. The input fragment is parsed into a tree
//! with [`tl`] and written back out keeping only the elements and attributes
//! in [`ALLOWED`]:
//!
//! * Disallowed elements are unwrapped: the element goes, its children are
//!   kept (and filtered in turn). Elements in [`DROPPED_WITH_CONTENT`] go
//!   along with everything inside them.
//! * Disallowed attributes are dropped; the element stays.
//! * `href` and `src` survive only if they are relative or use one of
//!   [`ALLOWED_SCHEMES`].
//! * Comments are dropped.
//!
//! Output is fully re-serialized (quoted attributes in allowlist order,
//! escaped text, self-closed void elements), so sanitizing already-sanitized
//! HTML returns it unchanged.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use url::Url;

/// Permitted elements and, for each, its permitted attributes.
pub static ALLOWED: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    const NONE: &[&str] = &[];
    const CLASS: &[&str] = &["class"];
    const ALIGN: &[&str] = &["align"];

    let mut allowed: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    for tag in &[
        "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "em", "strong", "b", "i", "del", "s",
        "ul", "li", "blockquote", "table", "thead", "tbody", "tfoot", "tr", "sup", "sub",
    ] {
        allowed.insert(*tag, NONE);
    }
    for tag in &["pre", "code", "div", "span"] {
        allowed.insert(*tag, CLASS);
    }
    allowed.insert("th", ALIGN);
    allowed.insert("td", ALIGN);
    allowed.insert("ol", &["start"]);
    allowed.insert("a", &["href", "title", "rel"]);
    allowed.insert("img", &["src", "alt", "title"]);
    allowed
});

/// Disallowed elements whose content is removed too, rather than unwrapped.
pub const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "title",
];

/// Schemes permitted in URL-valued attributes. Relative URLs are always
/// permitted.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// Filters `html` against [`ALLOWED`]. See the module docs for the rules.
pub fn sanitize(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    match tl::parse(html, tl::ParserOptions::default()) {
        Ok(dom) => {
            let parser = dom.parser();
            for handle in dom.children() {
                write_node(&mut out, *handle, parser);
            }
        }
        Err(e) => {
            // Nothing in it can be trusted as markup.
            log::warn!("sanitizing unparsable HTML as text: {:?}", e);
            escape_text(&mut out, html);
        }
    }
    out
}

fn write_node(out: &mut String, handle: tl::NodeHandle, parser: &tl::Parser) {
    let node = match handle.get(parser) {
        Some(node) => node,
        None => return,
    };
    match node {
        tl::Node::Tag(tag) => write_tag(out, tag, parser),
        tl::Node::Raw(text) => escape_text(out, &text.as_utf8_str()),
        tl::Node::Comment(_) => {}
    }
}

fn write_tag(out: &mut String, tag: &tl::HTMLTag, parser: &tl::Parser) {
    let name = tag.name().as_utf8_str().to_lowercase();
    if DROPPED_WITH_CONTENT.contains(&name.as_str()) {
        return;
    }

    let attributes = match ALLOWED.get(name.as_str()) {
        Some(attributes) => *attributes,
        None => {
            write_children(out, tag, parser);
            return;
        }
    };

    out.push('<');
    out.push_str(&name);
    for attribute in attributes {
        let value = match tag.attributes().get(*attribute) {
            Some(value) => value.map(|v| v.as_utf8_str()).unwrap_or_default(),
            None => continue,
        };
        if URL_ATTRIBUTES.contains(attribute) && !is_safe_url(&value) {
            continue;
        }
        out.push(' ');
        out.push_str(attribute);
        out.push_str("=\"");
        escape_attribute(out, &value);
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&name.as_str()) {
        out.push_str(" />");
        // Void elements can't have children, but a parser may attach the
        // content following an unterminated `<img>` to it.
        write_children(out, tag, parser);
        return;
    }

    out.push('>');
    write_children(out, tag, parser);
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn write_children(out: &mut String, tag: &tl::HTMLTag, parser: &tl::Parser) {
    for child in tag.children().top().iter() {
        write_node(out, *child, parser);
    }
}

/// Text is written back as-is apart from `<` and `>`, so existing character
/// references survive and nothing in the text can open a tag.
fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Reports whether a URL is relative or uses an allowed scheme, looking at it
/// the way a browser would: after decoding character references and ignoring
/// whitespace and control characters.
fn is_safe_url(raw: &str) -> bool {
    let normalized: String = decode_char_refs(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match Url::parse(&normalized) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Decodes numeric character references (`&#106;`, `&#x6A;`, with or without
/// the trailing `;`) and the handful of named references that matter for URL
/// schemes. Anything else is left alone.
fn decode_char_refs(s: &str) -> String {
    const NAMED: &[(&str, char)] = &[
        ("&colon;", ':'),
        ("&tab;", '\t'),
        ("&newline;", '\n'),
        ("&quot;", '"'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&amp;", '&'),
    ];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];

        if let Some((entity, c)) = NAMED
            .iter()
            .find(|(entity, _)| starts_with_ignore_case(rest, entity))
        {
            out.push(*c);
            rest = &rest[entity.len()..];
            continue;
        }

        match decode_numeric(rest) {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes a numeric reference at the start of `s`, returning the character
/// and the number of bytes consumed.
fn decode_numeric(s: &str) -> Option<(char, usize)> {
    let body = s.strip_prefix("&#")?;
    let (radix, digits_start) = match body.as_bytes().first() {
        Some(b'x') | Some(b'X') => (16, 1),
        _ => (10, 0),
    };
    let digits: &str = {
        let candidates = &body[digits_start..];
        let len = candidates
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or_else(|| candidates.len());
        &candidates[..len]
    };
    if digits.is_empty() {
        return None;
    }
    let mut len = 2 + digits_start + digits.len();
    if s[len..].starts_with(';') {
        len += 1;
    }
    let c = u32::from_str_radix(digits, radix)
        .ok()
        .and_then(std::char::from_u32)
        .unwrap_or('\u{FFFD}');
    Some((c, len))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}
