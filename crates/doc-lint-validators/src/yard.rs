//! Invocation of the external `yard` tool shared by shell validators.

use doc_lint_core::parser::{LINE, LOCATION};
use doc_lint_core::{CommandContext, CommandLine};

/// Program name of the documentation tool.
pub const PROGRAM: &str = "yard";

/// Location pattern of yard warnings: ``in file `lib/foo.rb' near line 12``.
pub(crate) const LOCATION_PATTERNS: [(&str, &str); 2] = [
    (LOCATION, r"in file [`']([^`']+)[`']"),
    (LINE, r"near line (\d+)"),
];

/// Builds `yard stats` over the selected files.
///
/// Validators sharing tool options produce identical commands, so the
/// command cache runs yard once for all of them.
pub(crate) fn stats_command(ctx: &CommandContext<'_>) -> CommandLine {
    CommandLine::new(PROGRAM)
        .args(["stats", "--no-save", "--no-progress"])
        .args(ctx.tool_options.iter().cloned())
        .args(
            ctx.files
                .unwrap_or_default()
                .iter()
                .map(|f| f.display().to_string()),
        )
}
