//! # doc-lint-core
//!
//! Execution and aggregation engine for documentation validators.
//!
//! This crate runs a set of validators over a project, turns their raw
//! output into offenses and decides whether the run passes. It includes:
//!
//! - [`Validator`] trait with shell and in-process strategies
//! - [`CommandCache`] deduplicating identical external invocations
//! - [`QueryExecutor`] for walking a code object [`Registry`]
//! - [`OneLineParser`], [`TwoLineParser`] and [`BlockParser`] for tool output
//! - [`Aggregate`] for statistics and the exit code
//! - [`Runner`] tying it all together
//!
//! ## Example
//!
//! ```ignore
//! use doc_lint_core::{Config, InMemoryRegistry, Runner};
//!
//! let runner = Runner::builder()
//!     .config(Config::from_file("doc-lint.toml".as_ref())?)
//!     .registry(InMemoryRegistry::from_file("registry.json".as_ref())?)
//!     .validator(MyValidator)
//!     .build();
//!
//! let aggregate = runner.run()?;
//! std::process::exit(aggregate.exit_code());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod cache;
mod collector;
mod command;
mod config;
mod executor;
mod registry;
mod result;
mod runner;
mod types;
mod validator;
mod visibility;

pub mod parser;

pub use aggregate::{Aggregate, CoverageStats, ResultSet};
pub use cache::{
    CacheError, CommandCache, CommandSpawner, SystemSpawner, SPAWN_FAILURE_EXIT_CODE,
};
pub use collector::Collector;
pub use command::{CommandLine, ExecutionResult, Fingerprint};
pub use config::{
    has_privacy_flag, AllValidatorsConfig, Config, ConfigError, ValidatorConfig,
    DEFAULT_FAIL_ON_SEVERITY, PRIVACY_FLAGS,
};
pub use executor::QueryExecutor;
pub use parser::{
    BlockBuilder, BlockParser, OneLineParser, ParsedRecord, Parser, PatternSet, TwoLineParser,
};
pub use registry::{
    CodeObject, InMemoryRegistry, ObjectKind, ObjectVisibility, Registry, RegistryError, Tag,
};
pub use result::{ResultKind, ValidatorResult, DEFAULT_OFFENSE_TYPE};
pub use runner::{EngineError, Runner, RunnerBuilder};
pub use types::{Offense, Severity, Statistics, UnknownSeverity};
pub use validator::{
    CommandContext, QueryError, Strategy, Validator, ValidatorBox, ValidatorSet, ValidatorSettings,
};
pub use visibility::{resolve_for, resolve_visibility, Visibility};
