//! Resolves the publication date of a post. Resolution is an ordered chain of
//! strategies where the first one to produce a date wins:
//!
//! 1. The override table from the project configuration ([`DateOverride`]).
//! 2. The first `*Month D, YYYY` byline found in the post body.
//! 3. The fallback date, January 1, 2024.
//!
//! A strategy that can't produce a date (no entry, malformed entry, no
//! byline, impossible calendar date) simply yields nothing and the next one
//! is consulted. Resolution itself never fails.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static BYLINE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\*({}) (\d{{1,2}}), (\d{{4}})\b",
        MONTHS.join("|")
    ))
    .expect("valid byline date regex")
});

/// The format of dates in the override table.
const ISO_FORMAT: &str = "%Y-%m-%d";

/// The display format used wherever we produce a date string ourselves
/// (e.g. `January 29, 2025`).
pub const DISPLAY_FORMAT: &str = "%B %-d, %Y";

/// A resolved publication date: the calendar date used for ordering plus the
/// human-readable string shown next to the post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishDate {
    pub date: NaiveDate,
    pub display: String,
}

impl PublishDate {
    /// The date used for posts that carry no date information at all.
    pub fn fallback() -> PublishDate {
        PublishDate {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid fallback date"),
            display: String::from("January 1, 2024"),
        }
    }
}

/// An entry in the override table. `date` is an ISO date (`2024-03-05`);
/// `display` is shown as-is.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DateOverride {
    pub date: String,
    pub display: String,
}

/// Resolves [`PublishDate`]s for posts. See the module docs for the
/// resolution order.
#[derive(Clone, Debug, Default)]
pub struct DateResolver {
    overrides: HashMap<String, DateOverride>,
}

impl DateResolver {
    pub fn new(overrides: HashMap<String, DateOverride>) -> DateResolver {
        DateResolver { overrides }
    }

    pub fn resolve(&self, id: &str, body: &str) -> PublishDate {
        self.from_override(id)
            .or_else(|| from_byline(body))
            .unwrap_or_else(|| {
                log::debug!("no date for post `{}`; using fallback", id);
                PublishDate::fallback()
            })
    }

    fn from_override(&self, id: &str) -> Option<PublishDate> {
        let entry = self.overrides.get(id)?;
        match NaiveDate::parse_from_str(&entry.date, ISO_FORMAT) {
            Ok(date) => Some(PublishDate {
                date,
                display: entry.display.clone(),
            }),
            Err(e) => {
                log::warn!(
                    "ignoring date override for `{}`: `{}`: {}",
                    id,
                    entry.date,
                    e
                );
                None
            }
        }
    }
}

/// Looks for the first `*Month D, YYYY` in `body`. Only the first match is
/// considered; if it names an impossible date (e.g. `*February 30, 2025`) we
/// give up rather than looking further.
fn from_byline(body: &str) -> Option<PublishDate> {
    let captures = BYLINE_DATE.captures(body)?;
    let month = MONTHS.iter().position(|m| *m == &captures[1])? as u32 + 1;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    // everything after the leading `*`
    let display = captures.get(0)?.as_str()[1..].to_owned();
    Some(PublishDate { date, display })
}
