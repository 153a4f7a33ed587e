use crate::rules::schema::Severity;
use crate::validate::outcome::{OverallStatus, OverallVerdict, ValidationResult, ValidationStatus};

/// Derive the product-level verdict from per-reading results.
///
/// Rejected if anything was rejected, conditional if anything warned,
/// approved otherwise. `NotApplicable` results are counted but never
/// change the verdict.
pub fn calculate_overall_status(results: &[ValidationResult]) -> OverallStatus {
    let count = |status: ValidationStatus| results.iter().filter(|r| r.status == status).count();

    let rejected = count(ValidationStatus::Rejected);
    let warnings = count(ValidationStatus::Warning);
    let not_applicable = count(ValidationStatus::NotApplicable);
    let critical_rejections = results
        .iter()
        .filter(|r| r.status == ValidationStatus::Rejected && r.severity == Some(Severity::Critical))
        .count();

    let (status, summary) = if rejected > 0 {
        let mut summary = if critical_rejections > 0 {
            format!(
                "Product rejected due to {} critical non-compliance(s)",
                critical_rejections
            )
        } else {
            format!("Product rejected due to {} non-compliance(s)", rejected)
        };
        if warnings > 0 {
            summary.push_str(&format!(" and {} warning(s)", warnings));
        }
        (OverallVerdict::Rejected, summary)
    } else if warnings > 0 {
        (
            OverallVerdict::Conditional,
            format!("Product conditionally approved with {} warning(s)", warnings),
        )
    } else {
        (
            OverallVerdict::Approved,
            "Product meets all regulatory requirements".to_string(),
        )
    };

    OverallStatus {
        status,
        summary,
        critical_issues: rejected,
        warnings,
        not_applicable,
    }
}
