//! Defines the [`Document`] and [`ParsedRecord`] types and the
//! [`DocumentParser`] which turns the former into the latter.

use crate::date::{DateResolver, PublishDate};
use crate::summary::summarize;
use chrono::{DateTime, NaiveDate, Utc};

/// The title given to posts whose first line isn't a heading.
pub const UNTITLED: &str = "Untitled";

/// A raw post as it sits in the posts directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// The file name less its `.md` extension. Also the post's URL slug.
    pub id: String,

    /// The markdown source of the post. The first line is conventionally a
    /// `# Title` heading.
    pub body: String,

    /// The file's modification time.
    pub last_modified: DateTime<Utc>,
}

/// The metadata extracted from a [`Document`], plus its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRecord {
    pub id: String,
    pub title: String,
    pub body: String,

    /// The date used to order posts.
    pub date: NaiveDate,

    /// The date as it should be shown to readers.
    pub display_date: String,

    /// A plain-text excerpt; may be empty.
    pub summary: String,

    pub last_modified: DateTime<Utc>,
}

/// Parses [`Document`]s into [`ParsedRecord`]s.
#[derive(Clone, Debug, Default)]
pub struct DocumentParser {
    dates: DateResolver,
}

impl DocumentParser {
    pub fn new(dates: DateResolver) -> DocumentParser {
        DocumentParser { dates }
    }

    /// Extracts a [`ParsedRecord`] from `doc`. Returns `None` if the post is
    /// empty (or only whitespace), in which case there's nothing to list.
    pub fn parse(&self, doc: &Document) -> Option<ParsedRecord> {
        if doc.body.trim().is_empty() {
            return None;
        }

        let lines: Vec<&str> = doc.body.lines().collect();
        let PublishDate { date, display } = self.dates.resolve(&doc.id, &doc.body);
        Some(ParsedRecord {
            id: doc.id.clone(),
            title: title(lines[0]),
            body: doc.body.clone(),
            date,
            display_date: display,
            summary: summarize(&lines),
            last_modified: doc.last_modified,
        })
    }
}

/// The post title is its leading `#` heading, if it has one.
pub fn title(first_line: &str) -> String {
    if first_line.starts_with('#') {
        first_line.trim_start_matches('#').trim().to_owned()
    } else {
        String::from(UNTITLED)
    }
}
