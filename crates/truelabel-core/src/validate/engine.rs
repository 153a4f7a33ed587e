use crate::error::TrueLabelError;
use crate::model::{AnalysisCategory, NutritionalReading, Reading};
use crate::rules::schema::{LimitDef, NutrientClass, NutrientDef, ParameterRuleDef};
use crate::rules::RuleTable;
use crate::validate::outcome::{ValidationResult, ValidationStatus};
use rust_decimal::Decimal;

/// Validate one measured reading against the rule for its category.
///
/// Unknown parameter names produce a `NotApplicable` result; the caller
/// decides whether to keep it.
pub fn validate_reading(
    table: &RuleTable,
    category: AnalysisCategory,
    reading: &Reading,
) -> Result<ValidationResult, TrueLabelError> {
    if category == AnalysisCategory::Nutritional {
        return Err(TrueLabelError::InvalidReading {
            parameter: reading.parameter.clone(),
            reason: "nutritional readings need a declared and an actual value".into(),
        });
    }
    if reading.value.is_sign_negative() && !reading.value.is_zero() {
        return Err(TrueLabelError::InvalidReading {
            parameter: reading.parameter.clone(),
            reason: format!("value must not be negative, got {}", reading.value),
        });
    }

    let result = match table.lookup(category, &reading.parameter) {
        Some(rule) => compare_limit(category, reading, rule),
        None => ValidationResult {
            parameter: reading.parameter.clone(),
            category,
            value: reading.value,
            declared_value: None,
            unit: reading.unit.clone(),
            status: ValidationStatus::NotApplicable,
            message: "No regulatory limit defined for this parameter".into(),
            regulatory_reference: None,
            rule_key: None,
            severity: None,
            deviation_pct: None,
        },
    };

    tracing::debug!(
        parameter = %reading.parameter,
        %category,
        value = %reading.value,
        status = %result.status,
        "validated reading"
    );
    Ok(result)
}

/// Compare a single value against a ceiling or a presence prohibition.
fn compare_limit(
    category: AnalysisCategory,
    reading: &Reading,
    rule: &ParameterRuleDef,
) -> ValidationResult {
    let value = reading.value;
    let (status, message) = match &rule.limit {
        LimitDef::PresenceForbidden => {
            if value.is_zero() {
                (ValidationStatus::Approved, "Absent (compliant)".to_string())
            } else {
                (
                    ValidationStatus::Rejected,
                    "Present (non-compliant)".to_string(),
                )
            }
        }
        LimitDef::Ceiling {
            max,
            warning_threshold,
        } => {
            if value > *max {
                (
                    ValidationStatus::Rejected,
                    format!("Exceeds maximum limit of {} {}", max, rule.unit),
                )
            } else if let Some(w) = warning_threshold.filter(|w| value > *w) {
                (
                    ValidationStatus::Warning,
                    format!("Above warning threshold of {} {}", w, rule.unit),
                )
            } else {
                (
                    ValidationStatus::Approved,
                    "Within acceptable limits".to_string(),
                )
            }
        }
    };

    ValidationResult {
        parameter: reading.parameter.clone(),
        category,
        value,
        declared_value: None,
        unit: unit_or(&reading.unit, &rule.unit),
        status,
        message,
        regulatory_reference: Some(rule.regulatory_reference.clone()),
        rule_key: Some(rule.key.clone()),
        severity: Some(rule.severity),
        deviation_pct: None,
    }
}

/// Validate a nutritional label claim against the measured value.
pub fn validate_nutritional_reading(
    table: &RuleTable,
    reading: &NutritionalReading,
) -> Result<ValidationResult, TrueLabelError> {
    if reading.declared_value <= Decimal::ZERO {
        return Err(TrueLabelError::InvalidReading {
            parameter: reading.parameter.clone(),
            reason: format!(
                "declared value must be positive, got {}",
                reading.declared_value
            ),
        });
    }
    if reading.actual_value.is_sign_negative() && !reading.actual_value.is_zero() {
        return Err(TrueLabelError::InvalidReading {
            parameter: reading.parameter.clone(),
            reason: format!(
                "actual value must not be negative, got {}",
                reading.actual_value
            ),
        });
    }

    let deviation = deviation_pct(reading.declared_value, reading.actual_value)
        .ok_or_else(|| out_of_range(reading))?;

    let result = match table.lookup_nutrient(&reading.parameter) {
        Some(nutrient) => compare_tolerance(table, reading, nutrient, deviation)?,
        None => ValidationResult {
            parameter: reading.parameter.clone(),
            category: AnalysisCategory::Nutritional,
            value: reading.actual_value,
            declared_value: Some(reading.declared_value),
            unit: reading.unit.clone(),
            status: ValidationStatus::NotApplicable,
            message: "No tolerance rule defined for this nutrient".into(),
            regulatory_reference: None,
            rule_key: None,
            severity: None,
            deviation_pct: Some(deviation),
        },
    };

    tracing::debug!(
        parameter = %reading.parameter,
        declared = %reading.declared_value,
        actual = %reading.actual_value,
        deviation = %deviation.round_dp(2),
        status = %result.status,
        "validated nutritional reading"
    );
    Ok(result)
}

fn compare_tolerance(
    table: &RuleTable,
    reading: &NutritionalReading,
    nutrient: &NutrientDef,
    deviation: Decimal,
) -> Result<ValidationResult, TrueLabelError> {
    let tol = table.tolerance();

    // Sodium only has an upper bound.
    let (tolerance, excess, allowed) = match nutrient.class {
        NutrientClass::Sodium => (
            tol.sodium_upper_pct,
            deviation.max(Decimal::ZERO),
            format!("+{}%", tol.sodium_upper_pct.normalize()),
        ),
        NutrientClass::Macronutrient => symmetric(tol.macronutrient_pct, deviation),
        NutrientClass::Energy => symmetric(tol.energy_pct, deviation),
        NutrientClass::Micronutrient => {
            if reading.declared_value >= tol.micronutrient_threshold {
                symmetric(tol.micronutrient_high_pct, deviation)
            } else {
                symmetric(tol.micronutrient_low_pct, deviation)
            }
        }
    };

    let warning_limit = tolerance
        .checked_mul(tol.warning_band_multiplier)
        .ok_or_else(|| out_of_range(reading))?;

    let status = if excess <= tolerance {
        ValidationStatus::Approved
    } else if excess <= warning_limit {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Rejected
    };

    let detail = format!(
        "declared: {}, actual: {}, deviation: {}, allowed: {}",
        reading.declared_value,
        reading.actual_value,
        format_pct(deviation),
        allowed
    );
    let below = deviation.is_sign_negative();
    let message = match (status, below) {
        (ValidationStatus::Approved, _) => format!("Within tolerance range ({detail})"),
        (ValidationStatus::Warning, true) => format!("Slightly below minimum tolerance ({detail})"),
        (ValidationStatus::Warning, false) => {
            format!("Slightly above maximum tolerance ({detail})")
        }
        (_, true) => format!("Below minimum tolerance ({detail})"),
        (_, false) => format!("Above maximum tolerance ({detail})"),
    };

    Ok(ValidationResult {
        parameter: reading.parameter.clone(),
        category: AnalysisCategory::Nutritional,
        value: reading.actual_value,
        declared_value: Some(reading.declared_value),
        unit: reading.unit.clone(),
        status,
        message,
        regulatory_reference: Some(tol.regulatory_reference.clone()),
        rule_key: Some(nutrient.key.clone()),
        severity: None,
        deviation_pct: Some(deviation),
    })
}

fn out_of_range(reading: &NutritionalReading) -> TrueLabelError {
    TrueLabelError::InvalidReading {
        parameter: reading.parameter.clone(),
        reason: format!(
            "deviation out of range (declared: {}, actual: {})",
            reading.declared_value, reading.actual_value
        ),
    }
}

fn symmetric(tolerance: Decimal, deviation: Decimal) -> (Decimal, Decimal, String) {
    (
        tolerance,
        deviation.abs(),
        format!("±{}%", tolerance.normalize()),
    )
}

/// Signed percentage deviation of `actual` from `declared`.
///
/// `None` when `declared` is zero or the result does not fit in a `Decimal`.
pub fn deviation_pct(declared: Decimal, actual: Decimal) -> Option<Decimal> {
    actual
        .checked_sub(declared)?
        .checked_div(declared)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

fn format_pct(pct: Decimal) -> String {
    let rounded = pct.round_dp(2).normalize();
    if rounded.is_zero() {
        "0%".to_string()
    } else if rounded.is_sign_positive() {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

fn unit_or(reading_unit: &str, rule_unit: &str) -> String {
    if reading_unit.trim().is_empty() {
        rule_unit.to_string()
    } else {
        reading_unit.to_string()
    }
}
