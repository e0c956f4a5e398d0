//! Effective visibility resolution for validators.

use crate::config::{has_privacy_flag, Config};
use serde::{Deserialize, Serialize};

/// Which code objects a validator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public objects only.
    Public,
    /// Public, protected and private objects.
    All,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Resolves the visibility a validator runs with.
///
/// A validator's own option list, when present, always decides: it yields
/// [`Visibility::All`] if it carries a privacy flag and [`Visibility::Public`]
/// otherwise, even when it is empty. Without one, a global list carrying a
/// privacy flag yields [`Visibility::All`]; anything else falls back to the
/// validator's declared default.
#[must_use]
pub fn resolve_visibility(
    default: Visibility,
    validator_options: Option<&[String]>,
    global_options: Option<&[String]>,
) -> Visibility {
    if let Some(own) = validator_options {
        return if has_privacy_flag(own) {
            Visibility::All
        } else {
            Visibility::Public
        };
    }

    match global_options {
        Some(global) if has_privacy_flag(global) => Visibility::All,
        _ => default,
    }
}

/// Resolves visibility for a named validator from configuration.
#[must_use]
pub fn resolve_for(config: &Config, name: &str, default: Visibility) -> Visibility {
    resolve_visibility(
        default,
        config.validator_tool_options(name),
        config.global_tool_options(),
    )
}
