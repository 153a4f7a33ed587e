use crate::model::{AnalysisCategory, FeedbackGroup};
use crate::rules::RuleTable;
use crate::validate::outcome::{Feedback, ValidationResult, ValidationStatus};

/// Group messages of non-approved results by feedback group and collect
/// deduplicated recommendations, in first-seen order.
pub fn generate_feedback(results: &[ValidationResult], table: &RuleTable) -> Feedback {
    let mut feedback = Feedback::default();
    let mut unmatched = Vec::new();

    for result in results {
        if result.status == ValidationStatus::NotApplicable {
            unmatched.push(result.parameter.as_str());
            continue;
        }
        if !result.status.is_issue() {
            continue;
        }

        let message = format!("{}: {}", result.parameter, result.message);
        match result.category.feedback_group() {
            FeedbackGroup::Microbiological => feedback.microbiological.push(message),
            FeedbackGroup::Chemical => feedback.chemical.push(message),
            FeedbackGroup::Nutritional => feedback.nutritional.push(message),
        }

        let recommendation = result
            .rule_key
            .as_deref()
            .and_then(|key| table.lookup(result.category, key))
            .and_then(|rule| rule.recommendation.clone())
            .unwrap_or_else(|| default_recommendation(result.category).to_string());
        if !feedback.recommendations.contains(&recommendation) {
            feedback.recommendations.push(recommendation);
        }
    }

    if !unmatched.is_empty() {
        feedback.recommendations.push(format!(
            "No regulatory rule matched: {}. Confirm the parameter names or extend the rule table",
            unmatched.join(", ")
        ));
    }

    feedback
}

fn default_recommendation(category: AnalysisCategory) -> &'static str {
    match category {
        AnalysisCategory::Microbiological => {
            "Review hygiene practices and implement stricter sanitation protocols"
        }
        AnalysisCategory::HeavyMetal => {
            "Investigate raw material sources and processing equipment for contamination"
        }
        AnalysisCategory::Pesticide => {
            "Review supplier pesticide application records and pre-harvest intervals"
        }
        AnalysisCategory::Mycotoxin => {
            "Improve storage conditions to prevent fungal growth and mycotoxin production"
        }
        AnalysisCategory::Nutritional => {
            "Review nutrition facts label declarations against current laboratory results"
        }
    }
}
