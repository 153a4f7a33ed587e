pub mod error;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod validate;

use error::TrueLabelError;
use model::{AnalysisCategory, ProductAnalysis};
use rules::RuleTable;
use validate::outcome::{ValidationOutcome, ValidationStatus};

/// What to do with readings whose parameter name matches no rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownParameterPolicy {
    /// Emit a `not_applicable` result so callers can audit coverage.
    #[default]
    Report,
    /// Drop the reading from the results.
    Skip,
}

/// Options for a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub unknown_parameters: UnknownParameterPolicy,
}

/// Main API entry point: validate a product analysis against a rule table.
///
/// Categories are evaluated in a fixed order (microbiological, heavy metals,
/// pesticides, mycotoxins, nutritional) and readings keep their input order,
/// so the same input and table always yield the same outcome.
pub fn validate_analysis(
    analysis: &ProductAnalysis,
    table: &RuleTable,
    options: &ValidateOptions,
) -> Result<ValidationOutcome, TrueLabelError> {
    let mut results = Vec::with_capacity(analysis.reading_count());

    for category in AnalysisCategory::MEASURED {
        for reading in analysis.readings(category) {
            let result = validate::validate_reading(table, category, reading)?;
            push_result(&mut results, result, options);
        }
    }

    for reading in &analysis.nutritional {
        let result = validate::validate_nutritional_reading(table, reading)?;
        push_result(&mut results, result, options);
    }

    let overall_status = validate::calculate_overall_status(&results);
    let feedback = validate::generate_feedback(&results, table);

    tracing::info!(
        table = table.name(),
        readings = analysis.reading_count(),
        status = %overall_status.status,
        critical_issues = overall_status.critical_issues,
        warnings = overall_status.warnings,
        "validated product analysis"
    );

    Ok(ValidationOutcome {
        rule_table: table.name().to_string(),
        rule_table_version: table.version().to_string(),
        validation_results: results,
        overall_status,
        feedback,
    })
}

/// Validate against the built-in rule table with default options.
pub fn validate_with_builtin(
    analysis: &ProductAnalysis,
) -> Result<ValidationOutcome, TrueLabelError> {
    validate_analysis(
        analysis,
        rules::builtin::builtin_table(),
        &ValidateOptions::default(),
    )
}

/// Parse a product analysis from JSON.
pub fn parse_analysis(json: &str) -> Result<ProductAnalysis, TrueLabelError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(TrueLabelError::UnsupportedInput(format!(
            "top-level JSON value is {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn push_result(
    results: &mut Vec<validate::ValidationResult>,
    result: validate::ValidationResult,
    options: &ValidateOptions,
) {
    if result.status == ValidationStatus::NotApplicable {
        match options.unknown_parameters {
            UnknownParameterPolicy::Report => {
                tracing::warn!(
                    parameter = %result.parameter,
                    category = %result.category,
                    "no rule matched parameter; reporting as not applicable"
                );
            }
            UnknownParameterPolicy::Skip => {
                tracing::debug!(
                    parameter = %result.parameter,
                    category = %result.category,
                    "no rule matched parameter; skipping"
                );
                return;
            }
        }
    }
    results.push(result);
}
