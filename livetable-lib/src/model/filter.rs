//! Filter queries narrowing a table snapshot for display.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use regex::Regex;
use regex::RegexBuilder;

use super::Header;
use super::RowEvent;
use super::RowEvents;

const FUZZY_PREFIX: &str = "-f";
const INVERSE_PREFIX: char = '!';

/// A parsed filter query.
///
/// - plain text matches rows case-insensitively as a regular expression, or
///   as a substring when the text is not a valid expression
/// - `!text` keeps the rows that do *not* match
/// - `-f text` matches rows fuzzily
///
/// Age columns never take part in matching.
#[derive(Debug, Clone)]
pub enum FilterQuery {
    /// Keeps every row.
    All,
    /// Case-insensitive regular expression.
    Regex {
        /// Compiled expression.
        rx: Regex,
        /// Keep non-matching rows instead.
        inverse: bool,
    },
    /// Case-insensitive substring.
    Substring {
        /// Lowercased needle.
        needle: String,
        /// Keep non-matching rows instead.
        inverse: bool,
    },
    /// Fuzzy match.
    Fuzzy(String),
}

impl FilterQuery {
    /// Parses a filter query.
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return Self::All;
        }

        if let Some(rest) = query.strip_prefix(FUZZY_PREFIX) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let rest = rest.trim();
                if rest.is_empty() {
                    return Self::All;
                }
                return Self::Fuzzy(rest.to_string());
            }
        }

        let (text, inverse) = match query.strip_prefix(INVERSE_PREFIX) {
            Some(rest) => (rest.trim(), true),
            None => (query, false),
        };
        if text.is_empty() {
            return Self::All;
        }

        match RegexBuilder::new(text).case_insensitive(true).build() {
            Ok(rx) => Self::Regex { rx, inverse },
            Err(_) => Self::Substring {
                needle: text.to_lowercase(),
                inverse,
            },
        }
    }

    /// Returns the rows of `events` matching this query, in order.
    pub fn apply(&self, header: &Header, events: &RowEvents) -> RowEvents {
        match self {
            Self::All => events.clone(),
            Self::Regex { rx, inverse } => {
                events.filtered(|e| rx.is_match(&haystack(header, e)) != *inverse)
            }
            Self::Substring { needle, inverse } => events.filtered(|e| {
                haystack(header, e).to_lowercase().contains(needle.as_str()) != *inverse
            }),
            Self::Fuzzy(text) => {
                let mut matcher = Matcher::new(Config::DEFAULT);
                let pattern =
                    Pattern::new(text, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);
                let mut buf = Vec::new();
                events.filtered(|e| {
                    let label = haystack(header, e);
                    let candidate = Utf32Str::new(&label, &mut buf);
                    pattern.score(candidate, &mut matcher).is_some()
                })
            }
        }
    }
}

fn haystack(header: &Header, event: &RowEvent) -> String {
    event
        .row
        .fields
        .iter()
        .enumerate()
        .filter(|(i, _)| !header.is_time_col(*i))
        .map(|(_, f)| f.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
