//! Validator reporting tags yard does not know.
//!
//! Parses one-line warnings from `yard stats`:
//!
//! ```text
//! [warn]: Unknown tag @retrun in file `lib/widget.rb' near line 12
//! ```

use crate::builtin_patterns;
use crate::yard::{self, LOCATION_PATTERNS};
use doc_lint_core::parser::{GENERAL, MESSAGE};
use doc_lint_core::{
    CommandContext, CommandLine, OneLineParser, ParsedRecord, Parser, QueryError, ResultKind,
    Severity, Strategy, Validator,
};
use once_cell::sync::Lazy;

/// Validator name.
pub const NAME: &str = "Warnings/UnknownTag";

static PARSER: Lazy<OneLineParser> = Lazy::new(|| {
    OneLineParser::new(builtin_patterns(&[
        (GENERAL, r"^\[warn\]: Unknown tag @\S+"),
        (MESSAGE, r"Unknown tag (@\S+)"),
        LOCATION_PATTERNS[0],
        LOCATION_PATTERNS[1],
    ]))
});

/// Reports unknown documentation tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownTag;

impl UnknownTag {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for UnknownTag {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Reports tags that yard does not recognize"
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

impl ResultKind for UnknownTag {
    fn validator_name(&self) -> &str {
        NAME
    }

    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn build_message(&self, record: &ParsedRecord) -> String {
        format!(
            "Unknown tag {}",
            record.message.as_deref().unwrap_or_default()
        )
    }
}
