//! Validator reporting `@param` tags naming parameters a method lacks.
//!
//! yard prints these warnings over two lines:
//!
//! ```text
//! [warn]: @param tag has unknown parameter name: opts
//!     in file `lib/widget.rb' near line 20
//! ```

use crate::builtin_patterns;
use crate::yard::{self, LOCATION_PATTERNS};
use doc_lint_core::parser::{GENERAL, MESSAGE};
use doc_lint_core::{
    CommandContext, CommandLine, ParsedRecord, Parser, QueryError, ResultKind, Severity, Strategy,
    TwoLineParser, Validator,
};
use once_cell::sync::Lazy;

/// Validator name.
pub const NAME: &str = "Warnings/UnknownParameterName";

static PARSER: Lazy<TwoLineParser> = Lazy::new(|| {
    TwoLineParser::new(builtin_patterns(&[
        (GENERAL, r"^\[warn\]: @param tag has unknown parameter name"),
        (MESSAGE, r"unknown parameter name: (\S+)"),
        LOCATION_PATTERNS[0],
        LOCATION_PATTERNS[1],
    ]))
});

/// Reports `@param` tags for parameters that do not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownParameterName;

impl UnknownParameterName {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for UnknownParameterName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Reports @param tags naming parameters the method does not have"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Shell
    }

    fn command(&self, ctx: &CommandContext<'_>) -> Result<CommandLine, QueryError> {
        Ok(yard::stats_command(ctx))
    }

    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        PARSER.parse(output)
    }

    fn result_kind(&self) -> &dyn ResultKind {
        self
    }
}

impl ResultKind for UnknownParameterName {
    fn validator_name(&self) -> &str {
        NAME
    }

    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn build_message(&self, record: &ParsedRecord) -> String {
        format!(
            "@param tag has unknown parameter name: {}",
            record.message.as_deref().unwrap_or_default()
        )
    }
}
