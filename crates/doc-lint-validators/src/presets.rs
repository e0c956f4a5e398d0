//! Validator presets.

use crate::{TagsOrder, UndocumentedObjects, UnknownParameterName, UnknownTag};
use doc_lint_core::{ValidatorBox, ValidatorSet};

/// Preset configurations for doc-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in validator.
    Default,
    /// Only validators that run in-process, for machines without yard.
    Offline,
}

impl Preset {
    /// Returns the validators for this preset.
    #[must_use]
    pub fn validators(self) -> ValidatorSet {
        match self {
            Self::Default => default_validators(),
            Self::Offline => offline_validators(),
        }
    }
}

/// Returns every built-in validator.
///
/// Includes:
/// - `Documentation/UndocumentedObjects` (in-process)
/// - `Tags/Order` (in-process)
/// - `Warnings/UnknownTag` (yard)
/// - `Warnings/UnknownParameterName` (yard)
#[must_use]
pub fn default_validators() -> ValidatorSet {
    all_validators().into_iter().collect()
}

/// Returns the validators that need no external tool.
#[must_use]
pub fn offline_validators() -> ValidatorSet {
    ValidatorSet::new()
        .with(UndocumentedObjects::new())
        .with(TagsOrder::new())
}

/// Returns all available validators as boxes.
#[must_use]
pub fn all_validators() -> Vec<ValidatorBox> {
    vec![
        Box::new(UndocumentedObjects::new()),
        Box::new(TagsOrder::new()),
        Box::new(UnknownTag::new()),
        Box::new(UnknownParameterName::new()),
    ]
}
