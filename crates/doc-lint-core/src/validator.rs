//! Validator plugin interface.

use crate::collector::Collector;
use crate::command::CommandLine;
use crate::config::Config;
use crate::parser::ParsedRecord;
use crate::registry::CodeObject;
use crate::result::ResultKind;
use crate::visibility::Visibility;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a validator produces its raw output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Runs an external tool through the command cache.
    Shell,
    /// Walks the code object registry inside this process.
    InProcess,
}

/// Error raised by a validator's per-object query or command builder.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The validator does not implement a callback its strategy requires.
    #[error("validator `{validator}` does not implement `{method}`")]
    Unimplemented {
        /// Validator name.
        validator: String,
        /// Missing callback.
        method: &'static str,
    },

    /// The validator asked a code object for something it does not have.
    #[error("validator `{validator}` used unknown accessor `{accessor}` on {object}")]
    NoSuchAccessor {
        /// Validator name.
        validator: String,
        /// Accessor that does not exist.
        accessor: String,
        /// Object it was called on.
        object: String,
    },

    /// The object's data could not be handled.
    #[error("{0}")]
    Runtime(String),
}

impl QueryError {
    /// Returns true for errors that indicate a defective validator.
    ///
    /// Fatal errors abort the whole run; others only drop the current
    /// object's output.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unimplemented { .. } | Self::NoSuchAccessor { .. })
    }

    /// Creates a recoverable runtime error.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}

/// Inputs for building a shell validator's command.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Files selected for this run, if restricted.
    pub files: Option<&'a [PathBuf]>,
    /// Tool options resolved for this validator.
    pub tool_options: &'a [String],
}

/// A documentation rule.
///
/// Shell validators implement [`Validator::command`]; in-process validators
/// implement [`Validator::in_process_query`]. Both turn their raw output into
/// records with [`Validator::parse`] and describe their offenses through the
/// [`ResultKind`] returned by [`Validator::result_kind`].
///
/// # Example
///
/// ```ignore
/// use doc_lint_core::{Collector, CodeObject, QueryError, Strategy, Validator, ValidatorSettings};
///
/// pub struct EmptyDocstring;
///
/// impl Validator for EmptyDocstring {
///     fn name(&self) -> &'static str { "Documentation/EmptyDocstring" }
///     fn strategy(&self) -> Strategy { Strategy::InProcess }
///
///     fn in_process_query(
///         &self,
///         object: &CodeObject,
///         collector: &mut Collector,
///         _config: &ValidatorSettings,
///     ) -> Result<(), QueryError> {
///         if object.docstring.is_empty() {
///             collector.puts(format!("{}:{}: {}", ...));
///         }
///         Ok(())
///     }
///     // parse / result_kind ...
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Namespaced name (e.g. `Tags/Order`), also the configuration key.
    fn name(&self) -> &'static str;

    /// Brief description of what this validator checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Visibility used when configuration does not decide.
    fn default_visibility(&self) -> Visibility {
        Visibility::Public
    }

    /// Execution strategy.
    fn strategy(&self) -> Strategy;

    /// Builds the external command for shell validators.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`QueryError::Unimplemented`].
    fn command(&self, ctx: &CommandContext<'_>) -> Result<CommandLine, QueryError> {
        let _ = ctx;
        Err(QueryError::Unimplemented {
            validator: self.name().to_string(),
            method: "command",
        })
    }

    /// Inspects one code object and writes output lines for it.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`QueryError::Unimplemented`].
    fn in_process_query(
        &self,
        object: &CodeObject,
        collector: &mut Collector,
        settings: &ValidatorSettings<'_>,
    ) -> Result<(), QueryError> {
        let _ = (object, collector, settings);
        Err(QueryError::Unimplemented {
            validator: self.name().to_string(),
            method: "in_process_query",
        })
    }

    /// Parses raw output into records.
    fn parse(&self, output: &str) -> Vec<ParsedRecord>;

    /// Describes how records become offenses.
    fn result_kind(&self) -> &dyn ResultKind;
}

/// Type alias for boxed Validator trait objects.
pub type ValidatorBox = Box<dyn Validator>;

/// Read access to one validator's configuration.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorSettings<'a> {
    config: &'a Config,
    name: &'a str,
}

impl<'a> ValidatorSettings<'a> {
    /// Creates a view of `config` for validator `name`.
    #[must_use]
    pub fn new(config: &'a Config, name: &'a str) -> Self {
        Self { config, name }
    }

    /// Gets a validator-specific option as a specific type.
    #[must_use]
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .validator(self.name)
            .and_then(|c| c.get_option(key))
    }

    /// The whole configuration.
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }
}

/// Registered validators, keyed by name.
///
/// Iteration follows registration order, so runs are deterministic.
#[derive(Default)]
pub struct ValidatorSet {
    validators: Vec<ValidatorBox>,
    index: BTreeMap<&'static str, usize>,
}

impl ValidatorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator, replacing any earlier one with the same name.
    pub fn register(&mut self, validator: ValidatorBox) {
        let name = validator.name();
        if let Some(&slot) = self.index.get(name) {
            self.validators[slot] = validator;
        } else {
            self.index.insert(name, self.validators.len());
            self.validators.push(validator);
        }
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.register(Box::new(validator));
        self
    }

    /// Looks up a validator by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Validator> {
        self.index.get(name).map(|&i| self.validators[i].as_ref())
    }

    /// All validators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Validator> {
        self.validators.iter().map(AsRef::as_ref)
    }

    /// Validator names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl FromIterator<ValidatorBox> for ValidatorSet {
    fn from_iter<I: IntoIterator<Item = ValidatorBox>>(iter: I) -> Self {
        let mut set = Self::new();
        for validator in iter {
            set.register(validator);
        }
        set
    }
}
