use truelabel_core::validate::{ValidationOutcome, ValidationResult, ValidationStatus};

pub fn print(outcome: &ValidationOutcome, show_all: bool, verbose: bool) {
    let overall = &outcome.overall_status;

    println!(
        "=== {} (v{}) ===\n",
        outcome.rule_table, outcome.rule_table_version
    );
    println!("  Overall: {} ({})\n", overall.status, overall.summary);

    let to_show: Vec<&ValidationResult> = outcome
        .validation_results
        .iter()
        .filter(|r| show_all || r.status != ValidationStatus::Approved)
        .collect();

    if !to_show.is_empty() {
        let max_name = to_show
            .iter()
            .map(|r| r.parameter.chars().count())
            .max()
            .unwrap_or(10);

        for r in &to_show {
            let value = match r.declared_value {
                Some(declared) => format!("{} {} (declared {})", r.value, r.unit, declared),
                None => format!("{} {}", r.value, r.unit),
            };
            println!(
                "  {:<width$}  {:<28}  -> {}",
                r.parameter,
                value,
                status_label(r.status),
                width = max_name
            );
            println!("    {}", r.message);
            if verbose {
                if let Some(ref reference) = r.regulatory_reference {
                    println!("    Reference: {}", reference);
                }
            }
        }
        println!();
    } else if !outcome.validation_results.is_empty() {
        println!("  All parameters within regulatory limits.\n");
    }

    let feedback = &outcome.feedback;
    for (title, lines) in [
        ("Microbiological", &feedback.microbiological),
        ("Chemical", &feedback.chemical),
        ("Nutritional", &feedback.nutritional),
    ] {
        if verbose && !lines.is_empty() {
            println!("  {} feedback:", title);
            for line in lines {
                println!("    - {}", line);
            }
            println!();
        }
    }

    if !feedback.recommendations.is_empty() {
        println!("  Recommendations:");
        for rec in &feedback.recommendations {
            println!("    - {}", rec);
        }
        println!();
    }
}

fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Approved => "APPROVED",
        ValidationStatus::Warning => "WARNING",
        ValidationStatus::Rejected => "REJECTED",
        ValidationStatus::NotApplicable => "N/A (no rule)",
    }
}
