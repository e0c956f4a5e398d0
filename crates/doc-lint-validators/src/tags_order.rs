//! Validator enforcing the order of documentation tags.
//!
//! Tags that appear in `enforced_order` must follow that order; repeated
//! tags of the same kind (several `@param`s) count as one group. Tags not
//! listed are ignored.
//!
//! # Configuration
//!
//! ```toml
//! [validators."Tags/Order"]
//! enforced_order = ["param", "option", "yield", "return", "raise"]
//! ```
//!
//! # Output
//!
//! Each offending object produces a five-line block:
//!
//! ```text
//! lib/widget.rb:12
//! invalid
//! Widget#spin
//! param,return
//! return,param
//! ```

use crate::builtin_patterns;
use doc_lint_core::parser::GENERAL;
use doc_lint_core::{
    BlockParser, CodeObject, Collector, ParsedRecord, Parser, QueryError, ResultKind, Severity,
    Strategy, Validator, ValidatorSettings, Visibility,
};
use once_cell::sync::Lazy;

/// Validator name.
pub const NAME: &str = "Tags/Order";

const STATUS_INVALID: &str = "invalid";
const BLOCK_LEN: usize = 5;

static PARSER: Lazy<BlockParser> = Lazy::new(|| {
    BlockParser::new(
        builtin_patterns(&[(GENERAL, r"^.+:\d+$")]),
        BLOCK_LEN,
        build_record,
    )
});

/// Default tag order.
pub const DEFAULT_ENFORCED_ORDER: &[&str] = &[
    "param",
    "option",
    "yield",
    "yieldparam",
    "yieldreturn",
    "return",
    "raise",
    "see",
    "example",
    "note",
    "todo",
];

/// Options for [`TagsOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsOrderConfig {
    /// Tag names in the order they must appear.
    pub enforced_order: Vec<String>,
}

impl Default for TagsOrderConfig {
    fn default() -> Self {
        Self {
            enforced_order: DEFAULT_ENFORCED_ORDER
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl TagsOrderConfig {
    /// Reads the options from a validator's settings.
    #[must_use]
    pub fn from_settings(settings: &ValidatorSettings<'_>) -> Self {
        settings
            .get("enforced_order")
            .map_or_else(Self::default, |enforced_order| Self { enforced_order })
    }

    /// Tag groups of `object` in source order, limited to enforced tags,
    /// with consecutive repeats collapsed.
    #[must_use]
    pub fn actual_order(&self, object: &CodeObject) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for tag in &object.tags {
            if !self.enforced_order.contains(&tag.name) {
                continue;
            }
            if groups.last() != Some(&tag.name) {
                groups.push(tag.name.clone());
            }
        }
        groups
    }

    /// The enforced order restricted to tags `object` actually has.
    #[must_use]
    pub fn expected_order(&self, object: &CodeObject) -> Vec<String> {
        self.enforced_order
            .iter()
            .filter(|name| object.tags.iter().any(|t| &t.name == *name))
            .cloned()
            .collect()
    }
}

/// Checks that documentation tags follow the enforced order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagsOrder;

impl TagsOrder {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for TagsOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires documentation tags to appear in the configured order"
    }

    fn default_visibility(&self) -> Visibility {
        Visibility::All
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
        let config = TagsOrderConfig::from_settings(settings);
        let actual = config.actual_order(object);
        let expected = config.expected_order(object);

        if actual == expected {
            return Ok(());
        }

        collector.puts(format!(
            "{}:{}",
            object.file.as_deref().unwrap_or_default(),
            object.line.unwrap_or_default()
        ));
        collector.puts(STATUS_INVALID);
        collector.puts(object.title());
        collector.puts(expected.join(","));
        collector.puts(actual.join(","));
        Ok(())
    }

    fn parse(&self, output: &str) -> Vec<ParsedRecord> {
        PARSER.parse(output)
    }

    fn result_kind(&self) -> &dyn ResultKind {
        self
    }
}

fn build_record(block: &[&str]) -> Option<ParsedRecord> {
    let [header, status, title, expected, actual] = block else {
        return None;
    };
    if *status != STATUS_INVALID {
        return None;
    }
    let (location, line) = header.rsplit_once(':')?;

    Some(
        ParsedRecord::new()
            .with_message(*title)
            .with_location(location, line.parse().ok()?)
            .with_field("expected", *expected)
            .with_field("actual", *actual),
    )
}

impl ResultKind for TagsOrder {
    fn validator_name(&self) -> &str {
        NAME
    }

    fn default_severity(&self) -> Option<Severity> {
        Some(Severity::Convention)
    }

    fn offense_name(&self) -> String {
        "InvalidTagsOrder".to_string()
    }

    fn build_message(&self, record: &ParsedRecord) -> String {
        let list = |key: &str| {
            record
                .field(key)
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| format!("@{s}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Tags of `{}` are out of order: expected {}, found {}",
            record.message.as_deref().unwrap_or_default(),
            list("expected"),
            list("actual")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_lint_core::{Config, ObjectKind, Tag};

    fn method(tags: &[&str]) -> CodeObject {
        tags.iter().fold(
            CodeObject::new("Widget#spin", ObjectKind::Method).at("lib/widget.rb", 12),
            |object, tag| object.with_tag(Tag::new(*tag)),
        )
    }

    fn query(object: &CodeObject, config: &Config) -> String {
        let mut collector = Collector::new();
        TagsOrder
            .in_process_query(object, &mut collector, &ValidatorSettings::new(config, NAME))
            .unwrap();
        collector.to_stdout()
    }

    #[test]
    fn ordered_tags_produce_nothing() {
        let object = method(&["param", "param", "return", "raise"]);
        assert_eq!(query(&object, &Config::default()), "");
    }

    #[test]
    fn unlisted_tags_are_ignored() {
        let object = method(&["api", "param", "deprecated", "return"]);
        assert_eq!(query(&object, &Config::default()), "");
    }

    #[test]
    fn out_of_order_tags_produce_a_block() {
        let object = method(&["return", "param"]);
        let output = query(&object, &Config::default());
        assert_eq!(
            output,
            "lib/widget.rb:12\ninvalid\nWidget#spin\nparam,return\nreturn,param\n"
        );

        let records = TagsOrder.parse(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location.as_deref(), Some("lib/widget.rb"));
        assert_eq!(records[0].line, Some(12));
        assert_eq!(
            TagsOrder.build_message(&records[0]),
            "Tags of `Widget#spin` are out of order: expected @param, @return, found @return, @param"
        );
    }

    #[test]
    fn interleaved_groups_are_invalid() {
        let object = method(&["param", "return", "param"]);
        let output = query(&object, &Config::default());
        assert!(output.ends_with("param,return\nparam,return,param\n"));
    }

    #[test]
    fn configured_order_wins() {
        let config = Config::parse(
            r#"
[validators."Tags/Order"]
enforced_order = ["return", "param"]
"#,
        )
        .unwrap();
        assert_eq!(query(&method(&["return", "param"]), &config), "");
        assert_ne!(query(&method(&["param", "return"]), &config), "");
    }

    #[test]
    fn parser_resynchronizes_on_broken_blocks() {
        let output = "lib/a.rb:1\ninvalid\nA\nlib/b.rb:2\ninvalid\nB#c\nparam,return\nreturn,param\nlib/c.rb:3\ninvalid\n";
        let records = TagsOrder.parse(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message.as_deref(), Some("B#c"));
        assert_eq!(records[0].field("actual"), Some("return,param"));
    }

    #[test]
    fn blocks_with_other_status_are_skipped() {
        let output = "lib/a.rb:1\nvalid\nA\nparam\nparam\n";
        assert!(TagsOrder.parse(output).is_empty());
    }

    #[test]
    fn sees_private_objects_by_default() {
        assert_eq!(TagsOrder.default_visibility(), Visibility::All);
    }
}
