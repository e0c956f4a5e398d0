//! Integration test: validators end-to-end via Runner.
//!
//! Exercises the full pipeline: shell and in-process execution, parsing,
//! offense building and aggregation, with a fake spawner standing in for
//! external tools.

use doc_lint_core::parser::{GENERAL, LINE, LOCATION, MESSAGE};
use doc_lint_core::{
    CodeObject, Collector, CommandCache, CommandContext, CommandLine, CommandSpawner, Config,
    EngineError, ExecutionResult, InMemoryRegistry, ObjectKind, OneLineParser, ParsedRecord,
    Parser, PatternSet, QueryError, ResultKind, Runner, Severity, Statistics, Strategy, Validator,
    ValidatorSettings,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replays canned output per program and counts spawns.
#[derive(Clone, Default)]
struct FakeTools {
    outputs: Arc<HashMap<String, ExecutionResult>>,
    spawns: Arc<AtomicUsize>,
}

impl FakeTools {
    fn with(outputs: &[(&str, ExecutionResult)]) -> Self {
        Self {
            outputs: Arc::new(
                outputs
                    .iter()
                    .map(|(program, result)| ((*program).to_string(), result.clone()))
                    .collect(),
            ),
            spawns: Arc::default(),
        }
    }

    fn spawns(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }
}

impl CommandSpawner for FakeTools {
    fn spawn(&self, command: &CommandLine) -> ExecutionResult {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        self.outputs
            .get(command.program())
            .cloned()
            .unwrap_or_else(|| ExecutionResult::failure("command not found", 127))
    }
}

// ── Validators used by the scenarios ──

/// Shell validator reading `[level] file:line: message` lines.
struct LevelledWarnings {
    program: &'static str,
    patterns: PatternSet,
}

impl LevelledWarnings {
    fn new(program: &'static str) -> Self {
        Self {
            program,
            patterns: PatternSet::new(&[
                (GENERAL, r"^\[(error|warning|convention)\] "),
                ("level", r"^\[(\w+)\]"),
                (LOCATION, r"\] ([^:]+):\d+:"),
                (LINE, r":(\d+):"),
                (MESSAGE, r":\d+: (.*)$"),
            ])
            .expect("patterns compile"),
        }
    }
}

impl ResultKind for LevelledWarnings {
    fn validator_name(&self) -> &str {
        "Warnings/Levelled"
    }
    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }
    fn record_severity(&self, record: &ParsedRecord) -> Option<Severity> {
        record.field("level").and_then(|l| l.parse().ok())
    }
    fn build_message(&self, record: &ParsedRecord) -> String {
        record.message.clone().unwrap_or_default()
    }
}

impl Validator for LevelledWarnings {
    fn name(&self) -> &'static str {
        "Warnings/Levelled"
    }
    fn strategy(&self) -> Strategy {
        Strategy::Shell
    }
    fn command(&self, ctx: &CommandContext<'_>) -> Result<CommandLine, QueryError> {
        Ok(CommandLine::new(self.program)
            .args(ctx.tool_options.iter().cloned())
            .args(ctx.files.unwrap_or_default().iter().map(|f| f.display().to_string())))
    }
    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        OneLineParser::new(self.patterns.clone())
            .parse(output)
            .into_iter()
            .zip(output.lines().filter(|l| self.patterns.is_match(l, GENERAL)))
            .map(|(record, line)| match self.patterns.last_capture(line, "level") {
                Some(level) => record.with_field("level", level),
                None => record,
            })
            .collect()
    }
    fn result_kind(&self) -> &dyn ResultKind {
        self
    }
}

/// In-process validator reporting objects without documentation.
struct Undocumented;

impl ResultKind for Undocumented {
    fn validator_name(&self) -> &str {
        "Documentation/Undocumented"
    }
    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }
    fn build_message(&self, record: &ParsedRecord) -> String {
        format!(
            "Documentation required for `{}`",
            record.message.as_deref().unwrap_or_default()
        )
    }
}

impl Validator for Undocumented {
    fn name(&self) -> &'static str {
        "Documentation/Undocumented"
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
        if !object.is_documented() {
            collector.puts(format!(
                "{}:{}: {}",
                object.file.as_deref().unwrap_or_default(),
                object.line.unwrap_or_default(),
                object.title()
            ));
        }
        Ok(())
    }
    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        output
            .lines()
            .filter_map(|line| {
                let (location, rest) = line.split_once(':')?;
                let (number, title) = rest.split_once(": ")?;
                Some(
                    ParsedRecord::new()
                        .with_message(title)
                        .with_location(location, number.parse().ok()?),
                )
            })
            .collect()
    }
    fn result_kind(&self) -> &dyn ResultKind {
        self
    }
}

/// In-process validator that forgot to implement its query.
struct Unfinished;

impl ResultKind for Unfinished {
    fn validator_name(&self) -> &str {
        "Broken/Unfinished"
    }
    fn build_message(&self, _record: &ParsedRecord) -> String {
        String::new()
    }
}

impl Validator for Unfinished {
    fn name(&self) -> &'static str {
        "Broken/Unfinished"
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

fn documented_registry() -> InMemoryRegistry {
    InMemoryRegistry::new(vec![
        CodeObject::new("Widget", ObjectKind::Class)
            .at("lib/widget.rb", 1)
            .with_docstring("A widget."),
        CodeObject::new("Widget#spin", ObjectKind::Method)
            .at("lib/widget.rb", 6)
            .with_docstring("Spins."),
    ])
}

// ── Scenarios ──

#[test]
fn two_validators_error_and_warning_fail_on_warning() {
    let tools = FakeTools::with(&[(
        "lint-tool",
        ExecutionResult::success(
            "[error] lib/widget.rb:3: unknown tag @retrun\n\
             [warning] lib/gadget.rb:9: unknown parameter name `opts`\n",
        ),
    )]);
    let config = Config::parse(r#"fail_on_severity = "warning""#).expect("config parses");

    let runner = Runner::builder()
        .config(config)
        .validator(LevelledWarnings::new("lint-tool"))
        .validator(Undocumented)
        .registry(documented_registry())
        .cache(Arc::new(CommandCache::with_spawner(tools.clone())))
        .build();

    let aggregate = runner.run().expect("run succeeds");

    assert_eq!(aggregate.count(), 2);
    assert_eq!(
        aggregate.statistics(),
        Statistics {
            error: 1,
            warning: 1,
            convention: 0,
        }
    );
    assert_eq!(aggregate.exit_code(), 1);
    assert_eq!(tools.spawns(), 1);

    let first = &aggregate.offenses()[0];
    assert_eq!(first.location, "lib/widget.rb");
    assert_eq!(first.location_line, 3);
    assert_eq!(first.name, "Levelled");
}

#[test]
fn same_runs_pass_with_error_threshold_when_only_warnings() {
    let tools = FakeTools::with(&[(
        "lint-tool",
        ExecutionResult::success("[warning] lib/gadget.rb:9: odd\n"),
    )]);
    let config = Config::parse(r#"fail_on_severity = "error""#).expect("config parses");

    let aggregate = Runner::builder()
        .config(config)
        .validator(LevelledWarnings::new("lint-tool"))
        .cache(Arc::new(CommandCache::with_spawner(tools)))
        .build()
        .run()
        .expect("run succeeds");

    assert_eq!(aggregate.count(), 1);
    assert_eq!(aggregate.exit_code(), 0);
}

#[test]
fn failing_tool_does_not_stop_other_validators() {
    let registry = InMemoryRegistry::new(vec![
        CodeObject::new("Widget", ObjectKind::Class).at("lib/widget.rb", 1)
    ]);

    let aggregate = Runner::builder()
        .validator(LevelledWarnings::new("missing-tool"))
        .validator(Undocumented)
        .registry(registry)
        .cache(Arc::new(CommandCache::with_spawner(FakeTools::default())))
        .build()
        .run()
        .expect("run succeeds");

    assert_eq!(aggregate.count(), 1);
    let offense = &aggregate.offenses()[0];
    assert_eq!(offense.message, "Documentation required for `Widget`");
    assert_eq!(offense.location_line, 1);
}

#[test]
fn defective_validator_aborts_the_run() {
    let err = Runner::builder()
        .validator(Undocumented)
        .validator(Unfinished)
        .registry(documented_registry())
        .build()
        .run()
        .expect_err("unimplemented query is fatal");

    match err {
        EngineError::Query { validator, source } => {
            assert_eq!(validator, "Broken/Unfinished");
            assert!(matches!(source, QueryError::Unimplemented { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn files_restrict_both_strategies() {
    let tools = FakeTools::with(&[("lint-tool", ExecutionResult::success(""))]);
    let registry = InMemoryRegistry::new(vec![
        CodeObject::new("Widget", ObjectKind::Class).at("lib/widget.rb", 1),
        CodeObject::new("Gadget", ObjectKind::Class).at("lib/gadget.rb", 1),
    ]);
    let cache = Arc::new(CommandCache::with_spawner(tools));

    let aggregate = Runner::builder()
        .validator(LevelledWarnings::new("lint-tool"))
        .validator(Undocumented)
        .registry(registry)
        .cache(Arc::clone(&cache))
        .files(["lib/gadget.rb"])
        .build()
        .run()
        .expect("run succeeds");

    let messages: Vec<_> = aggregate.offenses().iter().map(|o| &o.message).collect();
    assert_eq!(messages, vec!["Documentation required for `Gadget`"]);

    let expected = CommandLine::new("lint-tool").arg("lib/gadget.rb");
    assert!(cache.execute(&expected).is_ok());
    assert_eq!(cache.len(), 1);
}

#[test]
fn config_and_registry_load_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("doc-lint.toml");
    let registry_path = dir.path().join("registry.json");

    std::fs::write(
        &config_path,
        r#"
fail_on_severity = "convention"
min_coverage = 75.0

[validators."Documentation/Undocumented"]
severity = "convention"
"#,
    )
    .expect("write config");
    std::fs::write(
        &registry_path,
        r#"[
  {"path": "Widget", "kind": "class", "file": "lib/widget.rb", "line": 1, "docstring": "A widget."},
  {"path": "Widget#spin", "kind": "method", "file": "lib/widget.rb", "line": 6}
]"#,
    )
    .expect("write registry");

    let aggregate = Runner::builder()
        .config(Config::from_file(&config_path).expect("config loads"))
        .registry(InMemoryRegistry::from_file(&registry_path).expect("registry loads"))
        .validator(Undocumented)
        .build()
        .run()
        .expect("run succeeds");

    assert_eq!(aggregate.count(), 1);
    assert_eq!(aggregate.offenses()[0].severity, Severity::Convention);
    let coverage = aggregate.coverage().expect("coverage computed");
    assert_eq!(coverage.total, 2);
    assert_eq!(coverage.documented, 1);
    assert!(!aggregate.coverage_passed());
    assert_eq!(aggregate.exit_code(), 1);
}
