//! Creates new posts in the posts directory. A new post's identifier is the
//! slug of its title; the file gets a `# Title` heading and a
//! `*Month D, YYYY | By Author*` byline so the rest of the pipeline can pick
//! up its title, date and summary.

use crate::cache::Cache;
use crate::date::DISPLAY_FORMAT;
use crate::store;
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Characters removed from titles before anything else is done to them.
const STRIPPED_PUNCTUATION: &[char] = &[':', '?', '!', ',', '(', ')', '\'', '"'];

/// A request to create a post.
#[derive(Clone, Debug)]
pub struct NewDocument {
    pub title: String,
    pub body: String,
    pub author: Option<String>,

    /// The publication date written into the byline.
    pub date: NaiveDate,

    /// Whether to replace an existing post with the same identifier.
    pub overwrite: bool,
}

/// The outcome of [`create_document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub path: PathBuf,
}

/// Turns a title into a post identifier: lowercase, spaces become hyphens,
/// common punctuation is dropped, anything else that isn't alphanumeric or a
/// hyphen is dropped, and runs of hyphens are collapsed and trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let c = match c {
            ' ' => '-',
            c if STRIPPED_PUNCTUATION.contains(&c) => continue,
            c if c.is_alphanumeric() || c == '-' => c,
            _ => continue,
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_owned()
}

/// Produces the file contents for a new post.
pub fn compose(title: &str, author: Option<&str>, date: NaiveDate, body: &str) -> String {
    let date = date.format(DISPLAY_FORMAT);
    let byline = match author {
        Some(author) => format!("*{} | By {}*", date, author),
        None => format!("*{}*", date),
    };
    format!("# {}\n\n{}\n\n{}\n", title, byline, body)
}

/// Writes a new post into the cache's store and invalidates the cache so the
/// post shows up in the next listing. An existing post with the same
/// identifier is only replaced if `doc.overwrite` is set.
pub fn create_document(cache: &Cache, doc: &NewDocument) -> Result<Created> {
    // the title has to fit on the heading line
    let title = doc.title.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    if title.chars().any(char::is_control) {
        return Err(Error::InvalidTitle(title));
    }
    let title = title.as_str();
    let body = doc.body.trim();
    if body.is_empty() {
        return Err(Error::EmptyBody);
    }
    let id = slugify(title);
    if id.is_empty() {
        return Err(Error::InvalidIdentifier(title.to_owned()));
    }

    let path = cache.store().path_for(&id);
    if path.exists() && !doc.overwrite {
        return Err(Error::AlreadyExists(id));
    }

    let author = doc
        .author
        .as_deref()
        .map(|a| a.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|a| !a.is_empty());
    fs::write(&path, compose(title, author.as_deref(), doc.date, body)).map_err(|e| {
        Error::Store(store::Error::Annotated(
            format!("writing post `{}`", path.display()),
            Box::new(store::Error::Io(e)),
        ))
    })?;
    cache.invalidate();
    log::info!("created post `{}` at `{}`", id, path.display());
    Ok(Created { id, path })
}

/// Represents the result of a post-creation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error creating a post.
#[derive(Debug)]
pub enum Error {
    /// Returned when the title is empty.
    EmptyTitle,

    /// Returned when the title contains control characters.
    InvalidTitle(String),

    /// Returned when the body is empty.
    EmptyBody,

    /// Returned when the title has no characters that can appear in an
    /// identifier.
    InvalidIdentifier(String),

    /// Returned when a post with the same identifier already exists and
    /// overwriting wasn't requested.
    AlreadyExists(String),

    /// Returned when the post can't be written.
    Store(store::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTitle => write!(f, "Title cannot be empty"),
            Error::InvalidTitle(title) => {
                write!(f, "Title `{}` contains control characters", title.escape_debug())
            }
            Error::EmptyBody => write!(f, "Post body cannot be empty"),
            Error::InvalidIdentifier(title) => {
                write!(f, "Can't derive a post identifier from title `{}`", title)
            }
            Error::AlreadyExists(id) => write!(f, "Post `{}` already exists", id),
            Error::Store(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<store::Error> for Error {
    fn from(err: store::Error) -> Error {
        Error::Store(err)
    }
}
