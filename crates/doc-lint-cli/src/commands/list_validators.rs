//! List validators command implementation.

use doc_lint_core::Strategy;
use doc_lint_validators::all_validators;

/// Runs the list-validators command.
pub fn run() {
    println!("Available validators:\n");
    println!(
        "{:<36} {:<11} {:<11} Description",
        "Name", "Strategy", "Severity"
    );
    println!("{}", "-".repeat(100));

    for validator in all_validators() {
        let strategy = match validator.strategy() {
            Strategy::Shell => "yard",
            Strategy::InProcess => "in-process",
        };
        let severity = validator
            .result_kind()
            .default_severity()
            .map_or("-", |s| s.as_str());
        println!(
            "{:<36} {:<11} {:<11} {}",
            validator.name(),
            strategy,
            severity,
            validator.description()
        );
    }

    println!("\nPresets:");
    println!("  default  - All validators (default)");
    println!("  offline  - In-process validators only, no yard needed");

    println!("\nUse --validators to filter specific validators, e.g.:");
    println!("  doc-lint check --validators Tags/Order,Warnings/UnknownTag");
}
