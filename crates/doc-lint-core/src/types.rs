//! Core types for documentation offenses.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity level for documentation offenses.
///
/// Ordered by strictness: `Convention < Warning < Error`. Deserializing
/// goes through [`FromStr`], so names are case-insensitive everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    /// Style convention, the most lenient level.
    Convention,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// All severities, from strictest to most lenient.
    pub const ALL: [Self; 3] = [Self::Error, Self::Warning, Self::Convention];

    /// Returns the lowercase name used in configuration and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Convention => "convention",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}` (expected error, warning or convention)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "convention" => Ok(Self::Convention),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = UnknownSeverity;

    fn try_from(s: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        s.parse()
    }
}

/// A single documentation offense reported by a validator.
///
/// Offenses are built once by a [`ValidatorResult`](crate::ValidatorResult)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    /// Strictness of this offense.
    pub severity: Severity,
    /// Free-form classification (`line`, `method`, `tag`, ...).
    #[serde(rename = "type")]
    pub offense_type: String,
    /// Stable identifier (e.g., `MissingReturnTag`).
    pub name: String,
    /// Human-readable description.
    pub message: String,
    /// File path as supplied by the validator.
    pub location: String,
    /// Line number, 0 when unknown.
    pub location_line: usize,
}

impl std::fmt::Display for Offense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location, self.location_line, self.severity, self.name, self.message
        )
    }
}

/// Offense counts per severity.
///
/// All three severities are always present, defaulting to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of `error` offenses.
    pub error: usize,
    /// Number of `warning` offenses.
    pub warning: usize,
    /// Number of `convention` offenses.
    pub convention: usize,
}

impl Statistics {
    /// Counts the given offenses by severity.
    #[must_use]
    pub fn from_offenses<'a>(offenses: impl IntoIterator<Item = &'a Offense>) -> Self {
        let mut stats = Self::default();
        for offense in offenses {
            stats.record(offense.severity);
        }
        stats
    }

    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Convention => self.convention += 1,
        }
    }

    /// Returns the count for a single severity.
    #[must_use]
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Convention => self.convention,
        }
    }

    /// Total number of offenses.
    #[must_use]
    pub fn total(&self) -> usize {
        self.error + self.warning + self.convention
    }
}
