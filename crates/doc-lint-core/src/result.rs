//! Turning parsed records into offenses.

use crate::config::Config;
use crate::parser::ParsedRecord;
use crate::runner::EngineError;
use crate::types::{Offense, Severity};

/// Offense type used when a validator declares none.
pub const DEFAULT_OFFENSE_TYPE: &str = "line";

/// Describes the offenses one validator family produces.
pub trait ResultKind: Send + Sync {
    /// Name of the owning validator, used for configuration lookups.
    fn validator_name(&self) -> &str;

    /// Severity used when configuration does not override it.
    ///
    /// Every validator must declare one; `None` makes offense building
    /// fail with [`EngineError::MissingDefaultSeverity`].
    fn default_severity(&self) -> Option<Severity> {
        None
    }

    /// Severity for one record, overriding the default.
    ///
    /// Configured severities still win over this.
    fn record_severity(&self, record: &ParsedRecord) -> Option<Severity> {
        let _ = record;
        None
    }

    /// Classification tag for offenses (default: `line`).
    fn offense_type(&self) -> &str {
        DEFAULT_OFFENSE_TYPE
    }

    /// Stable offense identifier.
    ///
    /// Defaults to the last segment of the validator name, so
    /// `Tags/Order` yields `Order`.
    fn offense_name(&self) -> String {
        let name = self.validator_name();
        name.rsplit('/').next().unwrap_or(name).to_string()
    }

    /// Human-readable message for one record.
    fn build_message(&self, record: &ParsedRecord) -> String;
}

/// Offenses produced by one validator in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorResult {
    validator: String,
    offenses: Vec<Offense>,
}

impl ValidatorResult {
    /// Builds offenses from parsed records.
    ///
    /// The severity is the validator's configured severity when `config`
    /// sets one, then the kind's per-record severity, then its declared
    /// default. Records without a line
    /// get line 0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingDefaultSeverity`] when an offense
    /// needs the default severity and the validator declares none.
    pub fn new(
        kind: &dyn ResultKind,
        records: &[ParsedRecord],
        config: Option<&Config>,
    ) -> Result<Self, EngineError> {
        let offenses = build_offenses(kind, records, config)?;
        Ok(Self {
            validator: kind.validator_name().to_string(),
            offenses,
        })
    }

    /// An empty result for a validator.
    #[must_use]
    pub fn empty(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            offenses: Vec::new(),
        }
    }

    /// Name of the validator that produced this result.
    #[must_use]
    pub fn validator(&self) -> &str {
        &self.validator
    }

    /// The offenses, in record order.
    #[must_use]
    pub fn offenses(&self) -> &[Offense] {
        &self.offenses
    }

    /// Number of offenses.
    #[must_use]
    pub fn count(&self) -> usize {
        self.offenses.len()
    }

    /// Consumes the result, returning its offenses.
    #[must_use]
    pub fn into_offenses(self) -> Vec<Offense> {
        self.offenses
    }
}

fn build_offenses(
    kind: &dyn ResultKind,
    records: &[ParsedRecord],
    config: Option<&Config>,
) -> Result<Vec<Offense>, EngineError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let name = kind.validator_name();
    let configured = config.and_then(|c| c.validator_severity(name));
    let offense_type = kind.offense_type().to_string();
    let offense_name = kind.offense_name();

    records
        .iter()
        .map(|record| {
            let severity = configured
                .or_else(|| kind.record_severity(record))
                .or_else(|| kind.default_severity())
                .ok_or_else(|| EngineError::MissingDefaultSeverity {
                    validator: name.to_string(),
                })?;
            Ok(Offense {
                severity,
                offense_type: offense_type.clone(),
                name: offense_name.clone(),
                message: kind.build_message(record),
                location: record.location.clone().unwrap_or_default(),
                location_line: record.line_or_zero(),
            })
        })
        .collect()
}
