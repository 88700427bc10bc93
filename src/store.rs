//! Defines the [`Store`], which reads posts from the posts directory, and its
//! [`Error`] type. The posts directory is flat: every `*.md` file in it is a
//! post whose identifier is the file name less the extension. There is no
//! index file; every listing is a full directory scan.

use crate::document::{Document, DocumentParser, ParsedRecord};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MARKDOWN_EXTENSION: &str = ".md";

/// Reads [`Document`]s from a posts directory.
#[derive(Clone, Debug)]
pub struct Store {
    directory: PathBuf,
    parser: DocumentParser,
}

impl Store {
    pub fn new(directory: impl Into<PathBuf>, parser: DocumentParser) -> Store {
        Store {
            directory: directory.into(),
            parser,
        }
    }

    /// The posts directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The path at which the post `id` is (or would be) stored.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{}{}", id, MARKDOWN_EXTENSION))
    }

    /// Parses every post in the directory and returns the resulting records
    /// ordered by date, most recent first, with ties broken by identifier
    /// (descending).
    ///
    /// Posts that can't be read (e.g., invalid UTF-8) or that are empty are
    /// logged and left out. Failing to read the directory itself is an error;
    /// an empty result always means there are no valid posts.
    pub fn list_all(&self) -> Result<Vec<ParsedRecord>> {
        let mut records = Vec::new();
        for (id, path) in self.entries()? {
            match read_document(&id, &path) {
                Ok(doc) => match self.parser.parse(&doc) {
                    Some(record) => records.push(record),
                    None => log::warn!("skipping empty post `{}`", path.display()),
                },
                Err(e) => log::warn!("skipping post `{}`: {}", path.display(), e),
            }
        }

        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        log::debug!(
            "parsed {} posts from `{}`",
            records.len(),
            self.directory.display()
        );
        Ok(records)
    }

    /// Finds the post whose identifier is exactly `id` (case-sensitive).
    /// Returns `Ok(None)` if there is no such post.
    pub fn get_by_identifier(&self, id: &str) -> Result<Option<Document>> {
        for (entry_id, path) in self.entries()? {
            if entry_id == id {
                return read_document(&entry_id, &path).map(Some);
            }
        }
        Ok(None)
    }

    /// Lists the `(id, path)` pairs for every post file in the directory.
    fn entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let metadata = fs::metadata(&self.directory).map_err(|e| {
            Error::Annotated(
                format!("opening posts directory `{}`", self.directory.display()),
                Box::new(Error::Io(e)),
            )
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(self.directory.clone()));
        }

        let mut entries = Vec::new();
        for result in WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result.map_err(|e| {
                Error::Annotated(
                    format!("scanning posts directory `{}`", self.directory.display()),
                    Box::new(Error::WalkDir(e)),
                )
            })?;
            // `Path::is_file` follows symlinks
            if !entry.path().is_file() {
                continue;
            }
            let file_name = match entry.file_name().to_str() {
                Some(name) => name,
                None => {
                    log::warn!("skipping post with non-UTF-8 name `{}`", entry.path().display());
                    continue;
                }
            };
            if let Some(id) = file_name.strip_suffix(MARKDOWN_EXTENSION) {
                entries.push((id.to_owned(), entry.path().to_owned()));
            }
        }
        Ok(entries)
    }
}

/// Reads a single post. Any failure here concerns only this post.
fn read_document(id: &str, path: &Path) -> Result<Document> {
    let annotate = |e: std::io::Error| {
        Error::Annotated(format!("reading post `{}`", path.display()), Box::new(Error::Io(e)))
    };
    let body = fs::read_to_string(path).map_err(annotate)?;
    let last_modified: DateTime<Utc> = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(annotate)?
        .into();
    Ok(Document {
        id: id.to_owned(),
        body,
        last_modified,
    })
}

/// Represents the result of a [`Store`] operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading from the posts directory.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors, including posts that aren't valid UTF-8.
    Io(std::io::Error),

    /// Returned when the posts directory can't be scanned.
    WalkDir(walkdir::Error),

    /// Returned when the posts directory path names something other than a
    /// directory.
    NotADirectory(PathBuf),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::NotADirectory(path) => {
                write!(f, "Posts directory `{}` is not a directory", path.display())
            }
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::NotADirectory(_) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory scans.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
