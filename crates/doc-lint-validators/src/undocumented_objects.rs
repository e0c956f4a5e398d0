//! Validator reporting code objects without documentation.
//!
//! # Detected Patterns
//!
//! - Classes, modules and constants with neither a docstring nor tags
//! - Methods with neither a docstring nor tags, unless excluded
//!
//! # Configuration
//!
//! ```toml
//! [validators."Documentation/UndocumentedObjects"]
//! excluded_methods = ["initialize", "/^_/"]
//! ```
//!
//! Entries wrapped in slashes are regular expressions matched against the
//! method name; anything else must equal it.

use crate::builtin_patterns;
use doc_lint_core::parser::{GENERAL, LINE, LOCATION, MESSAGE};
use doc_lint_core::{
    CodeObject, Collector, ObjectKind, OneLineParser, ParsedRecord, Parser, QueryError,
    ResultKind, Severity, Strategy, Validator, ValidatorSettings,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Validator name.
pub const NAME: &str = "Documentation/UndocumentedObjects";

static PARSER: Lazy<OneLineParser> = Lazy::new(|| {
    OneLineParser::new(builtin_patterns(&[
        (GENERAL, r"^.+?:\d+: .+$"),
        (LOCATION, r"^(.+?):\d+: "),
        (LINE, r"^.+?:(\d+): "),
        (MESSAGE, r"^.+?:\d+: (.+)$"),
    ]))
});

/// Options for [`UndocumentedObjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndocumentedObjectsConfig {
    /// Method names (or `/regex/`) that may stay undocumented.
    pub excluded_methods: Vec<String>,
}

impl Default for UndocumentedObjectsConfig {
    fn default() -> Self {
        Self {
            excluded_methods: default_excluded_methods(),
        }
    }
}

fn default_excluded_methods() -> Vec<String> {
    vec!["initialize".to_string()]
}

impl UndocumentedObjectsConfig {
    /// Reads the options from a validator's settings.
    #[must_use]
    pub fn from_settings(settings: &ValidatorSettings<'_>) -> Self {
        Self {
            excluded_methods: settings
                .get("excluded_methods")
                .unwrap_or_else(default_excluded_methods),
        }
    }

    /// Returns true if `method` is excluded.
    ///
    /// # Errors
    ///
    /// Returns a runtime error when a `/regex/` entry does not compile.
    pub fn is_excluded(&self, method: &str) -> Result<bool, QueryError> {
        for entry in &self.excluded_methods {
            let matched = match entry
                .strip_prefix('/')
                .and_then(|e| e.strip_suffix('/'))
            {
                Some(pattern) => Regex::new(pattern)
                    .map_err(|e| {
                        QueryError::runtime(format!("invalid excluded_methods entry {entry}: {e}"))
                    })?
                    .is_match(method),
                None => entry == method,
            };
            if matched {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Reports objects that carry no documentation at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndocumentedObjects;

impl UndocumentedObjects {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn method_name(path: &str) -> &str {
    path.rsplit(['#', '.']).next().unwrap_or(path)
}

impl Validator for UndocumentedObjects {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Reports classes, modules, methods and constants without documentation"
    }

    fn strategy(&self) -> Strategy {
        Strategy::InProcess
    }

    fn in_process_query(
        &self,
        object: &CodeObject,
        collector: &mut Collector,
        settings: &ValidatorSettings<'_>,
    ) -> Result<(), QueryError> {
        if object.is_documented() {
            return Ok(());
        }

        if object.kind == ObjectKind::Method {
            let config = UndocumentedObjectsConfig::from_settings(settings);
            if config.is_excluded(method_name(&object.path))? {
                debug!("{}: {} is excluded", NAME, object.path);
                return Ok(());
            }
        }

        collector.puts(format!(
            "{}:{}: {}",
            object.file.as_deref().unwrap_or_default(),
            object.line.unwrap_or_default(),
            object.title()
        ));
        Ok(())
    }

    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        PARSER.parse(output)
    }

    fn result_kind(&self) -> &dyn ResultKind {
        self
    }
}

impl ResultKind for UndocumentedObjects {
    fn validator_name(&self) -> &str {
        NAME
    }

    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }

    fn offense_name(&self) -> String {
        "UndocumentedObject".to_string()
    }

    fn build_message(&self, record: &ParsedRecord) -> String {
        format!(
            "Documentation required for `{}`",
            record.message.as_deref().unwrap_or_default()
        )
    }
}
