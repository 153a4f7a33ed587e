use crate::model::AnalysisCategory;
use crate::rules::schema::Severity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Approved,
    Warning,
    Rejected,
    /// No rule matched the parameter name; never affects the overall verdict.
    NotApplicable,
}

impl ValidationStatus {
    /// Severity order for verdicts that came from a rule: approved < warning < rejected.
    pub fn rank(self) -> u8 {
        match self {
            ValidationStatus::NotApplicable => 0,
            ValidationStatus::Approved => 1,
            ValidationStatus::Warning => 2,
            ValidationStatus::Rejected => 3,
        }
    }

    /// Warning or rejected.
    pub fn is_issue(self) -> bool {
        matches!(self, ValidationStatus::Warning | ValidationStatus::Rejected)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Approved => write!(f, "approved"),
            ValidationStatus::Warning => write!(f, "warning"),
            ValidationStatus::Rejected => write!(f, "rejected"),
            ValidationStatus::NotApplicable => write!(f, "not applicable"),
        }
    }
}

/// Verdict for one reading of a product analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Parameter name as it appeared in the analysis.
    pub parameter: String,
    pub category: AnalysisCategory,
    /// Measured value (the lab-measured amount for nutritional readings).
    pub value: Decimal,
    /// Label claim, for nutritional readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<Decimal>,
    pub unit: String,
    pub status: ValidationStatus,
    /// Human-readable explanation of the verdict.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_reference: Option<String>,
    /// Key of the rule or nutrient that matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Signed deviation from the declared value, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_pct: Option<Decimal>,
}

/// Aggregate verdict for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallVerdict {
    Approved,
    Conditional,
    Rejected,
}

impl fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallVerdict::Approved => write!(f, "APPROVED"),
            OverallVerdict::Conditional => write!(f, "CONDITIONAL"),
            OverallVerdict::Rejected => write!(f, "REJECTED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatus {
    pub status: OverallVerdict,
    pub summary: String,
    /// Number of rejected results.
    pub critical_issues: usize,
    /// Number of warning results.
    pub warnings: usize,
    /// Number of readings that matched no rule.
    #[serde(default)]
    pub not_applicable: usize,
}

/// Advisory text grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub microbiological: Vec<String>,
    pub chemical: Vec<String>,
    pub nutritional: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self.microbiological.is_empty()
            && self.chemical.is_empty()
            && self.nutritional.is_empty()
            && self.recommendations.is_empty()
    }
}

/// Everything one validation run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Name of the rule table that was applied.
    pub rule_table: String,
    pub rule_table_version: String,
    pub validation_results: Vec<ValidationResult>,
    pub overall_status: OverallStatus,
    pub feedback: Feedback,
}
