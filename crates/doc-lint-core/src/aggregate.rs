//! Merged report across all validators.

use crate::config::Config;
use crate::registry::Registry;
use crate::result::ValidatorResult;
use crate::types::{Offense, Severity, Statistics};
use crate::visibility::Visibility;
use serde::{Deserialize, Serialize};

/// Documentation coverage of the inspected objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Objects that should be documented.
    pub total: usize,
    /// Objects that are documented.
    pub documented: usize,
}

impl CoverageStats {
    /// Computes coverage over the registry's objects at `visibility`,
    /// honoring global excludes and the file selection.
    #[must_use]
    pub fn from_registry(
        registry: &dyn Registry,
        visibility: Visibility,
        excludes: &[String],
        file_selection: Option<&[std::path::PathBuf]>,
    ) -> Self {
        let objects = registry.objects_for_validator(visibility, excludes, file_selection);
        Self {
            total: objects.len(),
            documented: objects.iter().filter(|o| o.is_documented()).count(),
        }
    }

    /// Coverage percentage; 100 when there is nothing to document.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.documented as f64 * 100.0 / self.total as f64
        }
    }
}

/// Input accepted by [`Aggregate::new`]: nothing, one result, or many.
#[derive(Debug, Default)]
pub struct ResultSet(Vec<ValidatorResult>);

impl From<ValidatorResult> for ResultSet {
    fn from(result: ValidatorResult) -> Self {
        Self(vec![result])
    }
}

impl From<Vec<ValidatorResult>> for ResultSet {
    fn from(results: Vec<ValidatorResult>) -> Self {
        Self(results)
    }
}

impl From<Option<ValidatorResult>> for ResultSet {
    fn from(result: Option<ValidatorResult>) -> Self {
        Self(result.into_iter().collect())
    }
}

impl From<Option<Vec<ValidatorResult>>> for ResultSet {
    fn from(results: Option<Vec<ValidatorResult>>) -> Self {
        Self(results.unwrap_or_default())
    }
}

/// Offenses from every validator of a run, with summary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregate {
    offenses: Vec<Offense>,
    fail_on_severity: String,
    min_coverage: Option<f64>,
    coverage: Option<CoverageStats>,
}

impl Aggregate {
    /// Merges results in the order given.
    #[must_use]
    pub fn new(results: impl Into<ResultSet>, config: &Config) -> Self {
        let ResultSet(results) = results.into();
        Self {
            offenses: results
                .into_iter()
                .flat_map(ValidatorResult::into_offenses)
                .collect(),
            fail_on_severity: config.fail_on_severity.clone(),
            min_coverage: config.min_coverage,
            coverage: None,
        }
    }

    /// Attaches documentation coverage.
    #[must_use]
    pub fn with_coverage(mut self, coverage: CoverageStats) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// All offenses, in validator order.
    #[must_use]
    pub fn offenses(&self) -> &[Offense] {
        &self.offenses
    }

    /// Offense counts per severity.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        Statistics::from_offenses(&self.offenses)
    }

    /// Total number of offenses.
    #[must_use]
    pub fn count(&self) -> usize {
        self.offenses.len()
    }

    /// Returns true if there are no offenses.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.count() == 0
    }

    /// Coverage, if it was computed.
    #[must_use]
    pub fn coverage(&self) -> Option<CoverageStats> {
        self.coverage
    }

    /// Configured minimum coverage.
    #[must_use]
    pub fn min_coverage(&self) -> Option<f64> {
        self.min_coverage
    }

    /// Returns false only when a minimum is configured, coverage was
    /// computed, and it falls short.
    #[must_use]
    pub fn coverage_passed(&self) -> bool {
        match (self.min_coverage, self.coverage) {
            (Some(min), Some(coverage)) => coverage.percentage() >= min,
            _ => true,
        }
    }

    /// Returns true if any offense is at least as strict as the configured
    /// threshold. Unknown thresholds never fail.
    #[must_use]
    pub fn offenses_exceed_threshold(&self) -> bool {
        let Ok(threshold) = self.fail_on_severity.parse::<Severity>() else {
            return false;
        };
        self.offenses.iter().any(|o| o.severity >= threshold)
    }

    /// Process exit code: 1 when the severity threshold is breached or
    /// coverage is below the minimum, 0 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.offenses_exceed_threshold() || !self.coverage_passed())
    }
}
