//! # doc-lint-validators
//!
//! Built-in documentation validators for doc-lint.
//!
//! ## Available Validators
//!
//! | Name | Strategy | Severity | Description |
//! |------|----------|----------|-------------|
//! | `Documentation/UndocumentedObjects` | in-process | warning | Objects without any documentation |
//! | `Tags/Order` | in-process | convention | Tags out of the enforced order |
//! | `Warnings/UnknownTag` | yard | error | Tags yard does not recognize |
//! | `Warnings/UnknownParameterName` | yard | error | `@param` tags for missing parameters |
//!
//! ## Usage
//!
//! ```ignore
//! use doc_lint_core::Runner;
//! use doc_lint_validators::default_validators;
//!
//! let aggregate = Runner::builder()
//!     .validators(default_validators())
//!     .registry(registry)
//!     .build()
//!     .run()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;
mod tags_order;
mod undocumented_objects;
mod unknown_parameter_name;
mod unknown_tag;
mod yard;

pub use presets::{all_validators, default_validators, offline_validators, Preset};
pub use tags_order::{TagsOrder, TagsOrderConfig, DEFAULT_ENFORCED_ORDER};
pub use undocumented_objects::{UndocumentedObjects, UndocumentedObjectsConfig};
pub use unknown_parameter_name::UnknownParameterName;
pub use unknown_tag::UnknownTag;
pub use yard::PROGRAM as YARD_PROGRAM;

/// Re-export core types for convenience.
pub use doc_lint_core::{Severity, Validator, ValidatorSet};

use doc_lint_core::PatternSet;

/// Compiles a built-in pattern table.
#[allow(clippy::expect_used)]
pub(crate) fn builtin_patterns(patterns: &[(&str, &str)]) -> PatternSet {
    PatternSet::new(patterns).expect("built-in validator patterns compile")
}
