//! The library code for `quire`, which serves a blog out of a directory of
//! markdown posts. There are two paths through it:
//!
//! 1. Listing posts: the [`cache::Cache`] hands out the sorted collection of
//!    [`document::ParsedRecord`]s, asking the [`store::Store`] to scan the
//!    posts directory when it has nothing cached. The store reads each post
//!    and runs it through the [`document::DocumentParser`], which works out
//!    the title, the publication date ([`date`]) and a summary ([`summary`]).
//! 2. Showing a post: the store looks the post up by identifier and
//!    [`render_body`] turns its markdown into HTML and then sanitizes that
//!    HTML ([`sanitize`]) so that nothing unsafe in a post reaches a reader.
//!
//! New posts are written by [`compose::create_document`], which invalidates
//! the cache so they appear in the next listing.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod cache;
pub mod compose;
pub mod config;
pub mod date;
pub mod document;
mod markdown;
pub mod sanitize;
pub mod store;
pub mod summary;
mod util;

/// Renders a post body (markdown) to HTML that is safe to show readers. The
/// leading `# Title` line is left out since titles are displayed separately.
/// This is the only way the crate renders markdown: the HTML always goes
/// through [`sanitize::sanitize`].
pub fn render_body(body: &str) -> String {
    sanitize::sanitize(&markdown::to_html(body))
}
