//! Orchestrates validator execution into an [`Aggregate`].

use crate::aggregate::{Aggregate, CoverageStats};
use crate::cache::{CacheError, CommandCache};
use crate::command::ExecutionResult;
use crate::config::Config;
use crate::executor::QueryExecutor;
use crate::registry::{InMemoryRegistry, Registry};
use crate::result::ValidatorResult;
use crate::validator::{
    CommandContext, QueryError, Strategy, Validator, ValidatorBox, ValidatorSet,
};
use crate::visibility::{resolve_visibility, Visibility};

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a run.
///
/// Failing external commands are not errors; they only show up in the
/// execution result of the validator that ran them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A validator reported a fatal error.
    #[error("validator {validator} is defective: {source}")]
    Query {
        /// Validator name.
        validator: String,
        /// Underlying query error.
        source: QueryError,
    },

    /// A validator produced records but declares no default severity.
    #[error("validator {validator} does not declare a default severity")]
    MissingDefaultSeverity {
        /// Validator name.
        validator: String,
    },

    /// The command cache is unusable.
    #[error("Command cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Builder for configuring a [`Runner`].
#[derive(Default)]
pub struct RunnerBuilder {
    config: Option<Config>,
    validators: ValidatorSet,
    registry: Option<Arc<dyn Registry>>,
    cache: Option<Arc<CommandCache>>,
    files: Option<Vec<PathBuf>>,
    only: Option<Vec<String>>,
}

impl RunnerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.register(Box::new(validator));
        self
    }

    /// Adds a boxed validator.
    #[must_use]
    pub fn validator_box(mut self, validator: ValidatorBox) -> Self {
        self.validators.register(validator);
        self
    }

    /// Replaces the registered validators with a whole set.
    #[must_use]
    pub fn validators(mut self, validators: ValidatorSet) -> Self {
        self.validators = validators;
        self
    }

    /// Sets the code object registry for in-process validators.
    #[must_use]
    pub fn registry<R: Registry + 'static>(mut self, registry: R) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Sets a shared registry.
    #[must_use]
    pub fn shared_registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the command cache (defaults to a fresh cache spawning real
    /// processes).
    #[must_use]
    pub fn cache(mut self, cache: Arc<CommandCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Restricts the run to the given files.
    #[must_use]
    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    /// Runs only the named validators (still subject to `enabled`).
    #[must_use]
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the runner.
    #[must_use]
    pub fn build(self) -> Runner {
        if let Some(only) = &self.only {
            for name in only {
                if self.validators.get(name).is_none() {
                    warn!("Unknown validator: {}", name);
                }
            }
        }

        Runner {
            config: self.config.unwrap_or_default(),
            validators: self.validators,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(InMemoryRegistry::default())),
            cache: self.cache.unwrap_or_default(),
            files: self.files,
            only: self.only,
        }
    }
}

/// Runs every enabled validator and aggregates the offenses.
///
/// Use [`Runner::builder()`] to construct an instance.
pub struct Runner {
    config: Config,
    validators: ValidatorSet,
    registry: Arc<dyn Registry>,
    cache: Arc<CommandCache>,
    files: Option<Vec<PathBuf>>,
    only: Option<Vec<String>>,
}

impl Runner {
    /// Creates a new builder for configuring a runner.
    #[must_use]
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The command cache shared by shell validators.
    #[must_use]
    pub fn command_cache(&self) -> &CommandCache {
        &self.cache
    }

    /// Validators that will run, in registration order.
    pub fn enabled_validators(&self) -> impl Iterator<Item = &dyn Validator> {
        self.validators.iter().filter(|v| {
            let name = v.name();
            if !self.config.is_validator_enabled(name) {
                debug!("Skipping disabled validator: {}", name);
                return false;
            }
            self.only
                .as_ref()
                .map_or(true, |only| only.iter().any(|n| n == name))
        })
    }

    /// Number of validators that will run.
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.enabled_validators().count()
    }

    /// Runs all enabled validators.
    ///
    /// # Errors
    ///
    /// Returns an error only when a validator is defective or the command
    /// cache is unusable. Failing external tools do not stop the run.
    pub fn run(&self) -> Result<Aggregate, EngineError> {
        info!("Running {} validator(s)", self.validator_count());

        let mut executor = QueryExecutor::new(self.registry.as_ref(), &self.config);
        let mut results = Vec::new();

        for validator in self.enabled_validators() {
            let name = validator.name();
            let execution = match validator.strategy() {
                Strategy::Shell => self.execute_shell(validator)?,
                Strategy::InProcess => executor.execute(validator, self.files.as_deref())?,
            };

            if !execution.is_success() {
                warn!(
                    "{} exited with status {}: {}",
                    name,
                    execution.exit_code,
                    execution.stderr.trim()
                );
            }

            let records = validator.parse(&execution.stdout);
            let result =
                ValidatorResult::new(validator.result_kind(), &records, Some(&self.config))?;
            debug!("{}: {} offense(s)", name, result.count());
            results.push(result);
        }

        let mut aggregate = Aggregate::new(results, &self.config);
        if self.config.min_coverage.is_some() {
            aggregate = aggregate.with_coverage(self.coverage());
        }

        info!(
            "Run complete: {} offense(s), exit code {}",
            aggregate.count(),
            aggregate.exit_code()
        );

        Ok(aggregate)
    }

    /// Documentation coverage at the globally configured visibility.
    #[must_use]
    pub fn coverage(&self) -> CoverageStats {
        let visibility =
            resolve_visibility(Visibility::Public, None, self.config.global_tool_options());
        CoverageStats::from_registry(
            self.registry.as_ref(),
            visibility,
            &self.config.all_validators.exclude,
            self.files.as_deref(),
        )
    }

    fn execute_shell(&self, validator: &dyn Validator) -> Result<ExecutionResult, EngineError> {
        let name = validator.name();
        let ctx = CommandContext {
            files: self.files.as_deref(),
            tool_options: self.config.effective_tool_options(name),
        };

        let command = match validator.command(&ctx) {
            Ok(command) => command,
            Err(e) if e.is_fatal() => {
                return Err(EngineError::Query {
                    validator: name.to_string(),
                    source: e,
                });
            }
            Err(e) => return Ok(ExecutionResult::failure(e.to_string(), 1)),
        };

        debug!("{}: {}", name, command);
        Ok(self.cache.execute(&command)?)
    }
}
