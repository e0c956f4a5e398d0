//! Parsers turning raw validator output into records.
//!
//! Every parser is total: empty, truncated or garbage input produces fewer
//! records (possibly none), never an error.
//!
//! - [`OneLineParser`]: one record per matching line.
//! - [`TwoLineParser`]: a message line followed by its location line.
//! - [`BlockParser`]: a fixed number of lines per record, resynchronizing
//!   on malformed blocks.

use regex::Regex;
use std::collections::BTreeMap;

/// Pattern key selecting lines that start a record.
pub const GENERAL: &str = "general";
/// Pattern key capturing the message.
pub const MESSAGE: &str = "message";
/// Pattern key capturing the file location.
pub const LOCATION: &str = "location";
/// Pattern key capturing the line number.
pub const LINE: &str = "line";

/// A structured record parsed from validator output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    /// Message text, if captured.
    pub message: Option<String>,
    /// File location, if captured.
    pub location: Option<String>,
    /// Line number, if captured.
    pub line: Option<usize>,
    /// Validator-specific extra fields.
    pub fields: BTreeMap<String, String>,
}

impl ParsedRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the location and line.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>, line: usize) -> Self {
        self.location = Some(location.into());
        self.line = Some(line);
        self
    }

    /// Sets an extra field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Gets an extra field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Line number, 0 when absent.
    #[must_use]
    pub fn line_or_zero(&self) -> usize {
        self.line.unwrap_or(0)
    }
}

/// Turns raw output into records.
pub trait Parser: Send + Sync {
    /// Parses `output` into an ordered list of records.
    fn parse(&self, output: &str) -> Vec<ParsedRecord>;
}

/// A set of named regular expressions.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: BTreeMap<String, Regex>,
}

impl PatternSet {
    /// Compiles the given `(key, pattern)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile.
    pub fn new(patterns: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let mut set = Self::default();
        for (key, pattern) in patterns {
            set.patterns.insert((*key).to_string(), Regex::new(pattern)?);
        }
        Ok(set)
    }

    /// Returns true if a pattern is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.patterns.contains_key(key)
    }

    /// Returns true if the pattern under `key` matches `text`.
    ///
    /// A missing pattern never matches.
    #[must_use]
    pub fn is_match(&self, text: &str, key: &str) -> bool {
        self.patterns.get(key).is_some_and(|re| re.is_match(text))
    }

    /// Captured groups of the pattern under `key`, or an empty list if it
    /// does not match (or is not registered).
    ///
    /// Groups that did not participate in the match are returned as empty
    /// strings so positions stay stable.
    #[must_use]
    pub fn captures(&self, text: &str, key: &str) -> Vec<String> {
        let Some(caps) = self.patterns.get(key).and_then(|re| re.captures(text)) else {
            return Vec::new();
        };
        caps.iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect()
    }

    /// Last captured group of the pattern under `key`.
    #[must_use]
    pub fn last_capture(&self, text: &str, key: &str) -> Option<String> {
        self.captures(text, key).pop()
    }

    /// Last captured group under `key` parsed as a line number.
    #[must_use]
    pub fn line_number(&self, text: &str, key: &str) -> Option<usize> {
        self.last_capture(text, key).and_then(|s| s.trim().parse().ok())
    }
}

/// Parses output where each offense sits on a single line.
///
/// A line produces a record when it matches the `general` pattern;
/// `message`, `location` and `line` are then captured from that same line.
#[derive(Debug, Clone)]
pub struct OneLineParser {
    patterns: PatternSet,
}

impl OneLineParser {
    /// Creates a parser from a pattern set.
    #[must_use]
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// The underlying patterns.
    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}

impl Parser for OneLineParser {
    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        output
            .lines()
            .filter(|line| self.patterns.is_match(line, GENERAL))
            .map(|line| ParsedRecord {
                message: self.patterns.last_capture(line, MESSAGE),
                location: self.patterns.last_capture(line, LOCATION),
                line: self.patterns.line_number(line, LINE),
                fields: BTreeMap::new(),
            })
            .collect()
    }
}

/// Parses output where each offense spans a message line and a location
/// line.
///
/// A line matching `general` starts a record and is paired with the line
/// after it. The record is kept even if the second line does not match
/// (or is missing): location is then `None` and line `0`. A second line
/// that is itself a header is not consumed and starts the next record.
#[derive(Debug, Clone)]
pub struct TwoLineParser {
    patterns: PatternSet,
}

impl TwoLineParser {
    /// Creates a parser from a pattern set.
    #[must_use]
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }
}

impl Parser for TwoLineParser {
    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        let lines: Vec<&str> = output.lines().collect();
        let mut records = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let first = lines[i];
            if !self.patterns.is_match(first, GENERAL) {
                i += 1;
                continue;
            }

            let second = lines
                .get(i + 1)
                .copied()
                .filter(|line| !self.patterns.is_match(line, GENERAL));
            let second_line = second.unwrap_or_default();
            records.push(ParsedRecord {
                message: self.patterns.last_capture(first, MESSAGE),
                location: self.patterns.last_capture(second_line, LOCATION),
                line: Some(self.patterns.line_number(second_line, LINE).unwrap_or(0)),
                fields: BTreeMap::new(),
            });
            i += if second.is_some() { 2 } else { 1 };
        }

        records
    }
}

/// Builds a record from one complete block of lines.
pub type BlockBuilder = fn(&[&str]) -> Option<ParsedRecord>;

/// Parses output made of fixed-size blocks of lines.
///
/// A block starts at a line matching the `general` pattern. If another
/// header appears before the block is complete, the partial block is
/// dropped and parsing resumes at that header. Incomplete trailing blocks
/// and blocks the builder rejects produce nothing.
#[derive(Debug, Clone)]
pub struct BlockParser {
    patterns: PatternSet,
    block_len: usize,
    build: BlockBuilder,
}

impl BlockParser {
    /// Creates a parser for blocks of `block_len` lines.
    ///
    /// `block_len` is clamped to at least 1.
    #[must_use]
    pub fn new(patterns: PatternSet, block_len: usize, build: BlockBuilder) -> Self {
        Self {
            patterns,
            block_len: block_len.max(1),
            build,
        }
    }

    /// Number of lines per record.
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.block_len
    }
}

impl Parser for BlockParser {
    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        let lines: Vec<&str> = output.lines().collect();
        let mut records = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if !self.patterns.is_match(lines[i], GENERAL) {
                i += 1;
                continue;
            }

            let end = i + self.block_len;
            if end > lines.len() {
                break;
            }

            let block = &lines[i..end];
            if let Some(offset) = block[1..]
                .iter()
                .position(|l| self.patterns.is_match(l, GENERAL))
            {
                i += offset + 1;
                continue;
            }

            if let Some(record) = (self.build)(block) {
                records.push(record);
            }
            i = end;
        }

        records
    }
}
