//! In-process execution of validators over the code object registry.

use crate::collector::Collector;
use crate::command::ExecutionResult;
use crate::config::Config;
use crate::registry::Registry;
use crate::runner::EngineError;
use crate::validator::{Validator, ValidatorSettings};
use crate::visibility::resolve_for;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Runs in-process validators object by object.
///
/// Produces the same [`ExecutionResult`] shape a shell invocation would, so
/// downstream parsing does not care which strategy ran.
pub struct QueryExecutor<'a> {
    registry: &'a dyn Registry,
    config: &'a Config,
    warned_about_query_errors: bool,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor over a registry and configuration.
    #[must_use]
    pub fn new(registry: &'a dyn Registry, config: &'a Config) -> Self {
        Self {
            registry,
            config,
            warned_about_query_errors: false,
        }
    }

    /// Runs `validator` over every matching object.
    ///
    /// Objects without a file or without a line are skipped. A
    /// recoverable query error drops that object's output and moves on.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Query`] when the validator reports a fatal
    /// error, which means the validator itself is defective.
    pub fn execute(
        &mut self,
        validator: &dyn Validator,
        file_selection: Option<&[PathBuf]>,
    ) -> Result<ExecutionResult, EngineError> {
        let (registry, config) = (self.registry, self.config);
        let name = validator.name();
        let visibility = resolve_for(config, name, validator.default_visibility());
        let file_excludes = config.validator_exclude(name);
        let settings = ValidatorSettings::new(config, name);

        let objects = registry.objects_for_validator(visibility, &file_excludes, file_selection);
        debug!(
            "{}: querying {} object(s) at {} visibility",
            name,
            objects.len(),
            visibility
        );

        let mut collector = Collector::new();

        for object in objects {
            if object.file.is_none() || object.line.is_none() {
                continue;
            }

            let mark = collector.len();
            match validator.in_process_query(object, &mut collector, &settings) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => {
                    return Err(EngineError::Query {
                        validator: name.to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    collector.truncate(mark);
                    self.report_query_error(name, &object.path, &e);
                }
            }
        }

        Ok(ExecutionResult::success(collector.to_stdout()))
    }

    fn report_query_error(&mut self, validator: &str, object: &str, error: &dyn std::fmt::Display) {
        if self.warned_about_query_errors {
            debug!("{}: skipped {}: {}", validator, object, error);
        } else {
            self.warned_about_query_errors = true;
            warn!(
                "{}: skipped {} after query error: {} (further skips logged at debug level)",
                validator, object, error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedRecord;
    use crate::registry::{CodeObject, InMemoryRegistry, ObjectKind, ObjectVisibility};
    use crate::result::ResultKind;
    use crate::types::Severity;
    use crate::validator::{QueryError, Strategy};
    use crate::visibility::Visibility;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prints every object it sees and fails on objects named `Broken*`.
    #[derive(Default)]
    struct EchoValidator {
        calls: AtomicUsize,
        default_visibility: Option<Visibility>,
    }

    impl ResultKind for EchoValidator {
        fn validator_name(&self) -> &str {
            "Test/Echo"
        }
        fn default_severity(&self) -> Option<Severity> {
            Some(Severity::Convention)
        }
        fn build_message(&self, _record: &ParsedRecord) -> String {
            String::new()
        }
    }

    impl Validator for EchoValidator {
        fn name(&self) -> &'static str {
            "Test/Echo"
        }
        fn default_visibility(&self) -> Visibility {
            self.default_visibility.unwrap_or(Visibility::Public)
        }
        fn strategy(&self) -> Strategy {
            Strategy::InProcess
        }
        fn in_process_query(
            &self,
            object: &CodeObject,
            collector: &mut Collector,
            _settings: &ValidatorSettings<'_>,
        ) -> Result<(), QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            collector.puts(format!("begin {}", object.path));
            if object.path.starts_with("Broken") {
                return Err(QueryError::runtime("unexpected tag shape"));
            }
            collector.puts(object.path.clone());
            Ok(())
        }
        fn parse(&self, _output: &str) -> Vec<ParsedRecord> {
            Vec::new()
        }
        fn result_kind(&self) -> &dyn ResultKind {
            self
        }
    }

    struct UnimplementedValidator;

    impl ResultKind for UnimplementedValidator {
        fn validator_name(&self) -> &str {
            "Test/Unimplemented"
        }
        fn build_message(&self, _record: &ParsedRecord) -> String {
            String::new()
        }
    }

    impl Validator for UnimplementedValidator {
        fn name(&self) -> &'static str {
            "Test/Unimplemented"
        }
        fn strategy(&self) -> Strategy {
            Strategy::InProcess
        }
        fn parse(&self, _output: &str) -> Vec<ParsedRecord> {
            Vec::new()
        }
        fn result_kind(&self) -> &dyn ResultKind {
            self
        }
    }

    #[test]
    fn skips_object_without_file() {
        let mut object = CodeObject::new("Foo", ObjectKind::Class).at("lib/foo.rb", 1);
        object.file = None;
        let registry = InMemoryRegistry::new(vec![object]);
        let config = Config::default();
        let validator = EchoValidator::default();

        let result = QueryExecutor::new(&registry, &config)
            .execute(&validator, None)
            .unwrap();

        assert_eq!(result.stdout, "");
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn skips_object_without_line() {
        let mut object = CodeObject::new("Foo", ObjectKind::Class).at("lib/foo.rb", 1);
        object.line = None;
        let registry = InMemoryRegistry::new(vec![object]);
        let config = Config::default();
        let validator = EchoValidator::default();

        let result = QueryExecutor::new(&registry, &config)
            .execute(&validator, None)
            .unwrap();

        assert_eq!(result.stdout, "");
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn returns_shell_shaped_result() {
        let registry = InMemoryRegistry::new(vec![
            CodeObject::new("Foo", ObjectKind::Class).at("lib/foo.rb", 1),
            CodeObject::new("Foo#bar", ObjectKind::Method).at("lib/foo.rb", 5),
        ]);
        let config = Config::default();

        let result = QueryExecutor::new(&registry, &config)
            .execute(&EchoValidator::default(), None)
            .unwrap();

        assert_eq!(result.stdout, "begin Foo\nFoo\nbegin Foo#bar\nFoo#bar\n");
        assert_eq!(result.stderr, "");
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn runtime_error_drops_only_that_object() {
        let registry = InMemoryRegistry::new(vec![
            CodeObject::new("Broken", ObjectKind::Class).at("lib/a.rb", 1),
            CodeObject::new("Fine", ObjectKind::Class).at("lib/b.rb", 1),
        ]);
        let config = Config::default();
        let mut executor = QueryExecutor::new(&registry, &config);

        let result = executor.execute(&EchoValidator::default(), None).unwrap();

        assert_eq!(result.stdout, "begin Fine\nFine\n");
        assert!(executor.warned_about_query_errors);
    }

    #[test]
    fn fatal_error_propagates() {
        let registry = InMemoryRegistry::new(vec![
            CodeObject::new("Foo", ObjectKind::Class).at("lib/foo.rb", 1)
        ]);
        let config = Config::default();

        let err = QueryExecutor::new(&registry, &config)
            .execute(&UnimplementedValidator, None)
            .unwrap_err();

        assert!(matches!(err, EngineError::Query { .. }));
    }

    #[test]
    fn visibility_comes_from_configuration() {
        let registry = InMemoryRegistry::new(vec![
            CodeObject::new("Foo#hidden", ObjectKind::Method)
                .at("lib/foo.rb", 3)
                .with_visibility(ObjectVisibility::Private),
        ]);

        let default_config = Config::default();
        let result = QueryExecutor::new(&registry, &default_config)
            .execute(&EchoValidator::default(), None)
            .unwrap();
        assert_eq!(result.stdout, "");

        let private_config = Config::parse(
            r#"
[all_validators]
tool_options = ["--private"]
"#,
        )
        .unwrap();
        let result = QueryExecutor::new(&registry, &private_config)
            .execute(&EchoValidator::default(), None)
            .unwrap();
        assert!(result.stdout.contains("Foo#hidden"));

        let all_by_default = EchoValidator {
            default_visibility: Some(Visibility::All),
            ..EchoValidator::default()
        };
        let result = QueryExecutor::new(&registry, &default_config)
            .execute(&all_by_default, None)
            .unwrap();
        assert!(result.stdout.contains("Foo#hidden"));
    }

    #[test]
    fn validator_excludes_are_applied() {
        let registry = InMemoryRegistry::new(vec![
            CodeObject::new("Foo", ObjectKind::Class).at("lib/foo.rb", 1),
            CodeObject::new("Gen", ObjectKind::Class).at("lib/generated/gen.rb", 1),
        ]);
        let config = Config::parse(
            r#"
[validators."Test/Echo"]
exclude = ["lib/generated/**"]
"#,
        )
        .unwrap();

        let result = QueryExecutor::new(&registry, &config)
            .execute(&EchoValidator::default(), None)
            .unwrap();

        assert_eq!(result.stdout, "begin Foo\nFoo\n");
    }
}
